use futures::stream::StreamExt;
use shared::{DownMsg, UpMsg};
use zoon::*;

use crate::dashboard::Dashboard;
use crate::dataflow::Actor;
use crate::debug_utils::{DEBUG_DASHBOARD, debug_critical, debug_flagged};

/// Actor+Relay compatible Connection adapter
pub struct ConnectionAdapter {
    connection: Connection<UpMsg, DownMsg>,
}

impl ConnectionAdapter {
    pub fn new() -> (Self, impl futures::stream::Stream<Item = DownMsg>) {
        let (message_sender, message_stream) = futures::channel::mpsc::unbounded();

        let connection = Connection::new(move |down_msg, _| {
            let _ = message_sender.unbounded_send(down_msg);
        });

        (ConnectionAdapter { connection }, message_stream)
    }

    pub async fn send_up_msg(&self, up_msg: UpMsg) {
        if let Err(error) = self.connection.send_up_msg(up_msg).await {
            debug_critical(&format!("Failed to send message: {error:?}"));
        }
    }
}

/// Routes every DownMsg to the dashboard domain.
pub fn create_connection_message_handler(dashboard: &Dashboard) -> (ConnectionAdapter, Actor<()>) {
    let (connection_adapter, mut down_msg_stream) = ConnectionAdapter::new();
    let dashboard = dashboard.clone();

    let message_handler = Actor::new((), async move |_state| {
        while let Some(down_msg) = down_msg_stream.next().await {
            handle_down_msg(down_msg, &dashboard);
        }
    });

    (connection_adapter, message_handler)
}

fn handle_down_msg(down_msg: DownMsg, dashboard: &Dashboard) {
    match down_msg {
        DownMsg::DashboardConfigLoaded(config) => {
            debug_flagged(DEBUG_DASHBOARD, "Dashboard config received from backend");
            dashboard.config_loaded_relay.send(config);
        }
        DownMsg::ConfigError(error) => {
            // The bundled sample stays on screen.
            debug_critical(&format!("Backend could not provide a dashboard config: {error}"));
        }
    }
}
