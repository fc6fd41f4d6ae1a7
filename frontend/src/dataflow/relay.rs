//! Event streaming Relay
//!
//! Relay carries UI events to the Actor that owns the affected state,
//! over an unbounded channel.

use futures::channel::mpsc::{UnboundedReceiver, UnboundedSender, unbounded};
use std::sync::{Arc, OnceLock};

/// Type-safe event relay from UI components to an Actor.
///
/// # Event-Source Naming Convention
///
/// Relays follow the `{source}_{event}_relay` pattern:
/// - `next_clicked_relay` - User clicked the next-visualization button
/// - `period_selected_relay` - User picked a chart period
/// - `config_loaded_relay` - Backend delivered the dashboard config
///
/// # Examples
///
/// ```rust
/// let (period_selected_relay, mut stream) = relay::<String>();
///
/// period_selected_relay.send("2023".to_string());
///
/// while let Some(period) = stream.next().await {
///     println!("Period selected: {period}");
/// }
/// ```
#[derive(Clone, Debug)]
pub struct Relay<T = ()>
where
    T: Clone + Send + Sync + 'static,
{
    sender: UnboundedSender<T>,
    #[cfg(debug_assertions)]
    emit_location: Arc<OnceLock<&'static std::panic::Location<'static>>>,
}

#[derive(Debug, Clone)]
pub enum RelayError {
    /// The receiver has been dropped
    ChannelClosed,
    /// Relay sent from more than one code location (debug builds only)
    #[cfg(debug_assertions)]
    MultipleEmitters {
        previous: &'static std::panic::Location<'static>,
        current: &'static std::panic::Location<'static>,
    },
}

impl<T> Relay<T>
where
    T: Clone + Send + Sync + 'static,
{
    pub fn new() -> (Self, UnboundedReceiver<T>) {
        let (sender, receiver) = unbounded();
        (
            Relay {
                sender,
                #[cfg(debug_assertions)]
                emit_location: Arc::new(OnceLock::new()),
            },
            receiver,
        )
    }

    /// In debug builds, each relay may only be sent from one source location.
    #[cfg(debug_assertions)]
    #[track_caller]
    fn check_single_source(&self) -> Result<(), RelayError> {
        let caller = std::panic::Location::caller();
        match self.emit_location.set(caller) {
            Ok(()) => Ok(()),
            Err(previous) if previous == caller => Ok(()),
            Err(previous) => Err(RelayError::MultipleEmitters {
                previous,
                current: caller,
            }),
        }
    }

    /// Sends an event; it is dropped silently when nobody listens.
    ///
    /// Panics in debug builds when the relay was already sent from a
    /// different location.
    #[track_caller]
    pub fn send(&self, value: T) {
        #[cfg(debug_assertions)]
        if let Err(e) = self.check_single_source() {
            panic!("{:?}", e);
        }

        let _ = self.sender.unbounded_send(value);
    }

    #[track_caller]
    pub fn try_send(&self, value: T) -> Result<(), RelayError> {
        #[cfg(debug_assertions)]
        self.check_single_source()?;

        self.sender
            .unbounded_send(value)
            .map_err(|_| RelayError::ChannelClosed)
    }
}

impl<T> Default for Relay<T>
where
    T: Clone + Send + Sync + 'static,
{
    /// A disconnected relay; events are discarded.
    fn default() -> Self {
        let (relay, _receiver) = Self::new();
        relay
    }
}

/// Creates a Relay together with its receiving stream.
pub fn relay<T>() -> (Relay<T>, UnboundedReceiver<T>)
where
    T: Clone + Send + Sync + 'static,
{
    Relay::new()
}

#[cfg(test)]
mod tests {
    use super::*;
    use futures::StreamExt;

    #[tokio::test]
    async fn delivers_events_in_order() {
        let (period_selected_relay, mut stream) = relay::<String>();

        for period in ["2024", "2023", "2022"] {
            period_selected_relay.send(period.to_string());
        }

        assert_eq!(stream.next().await.as_deref(), Some("2024"));
        assert_eq!(stream.next().await.as_deref(), Some("2023"));
        assert_eq!(stream.next().await.as_deref(), Some("2022"));
    }

    #[tokio::test]
    async fn try_send_reports_closed_channel() {
        let (next_clicked_relay, receiver) = relay::<()>();
        drop(receiver);

        assert!(matches!(
            next_clicked_relay.try_send(()),
            Err(RelayError::ChannelClosed)
        ));
    }

    #[test]
    fn default_relay_discards_events() {
        let relay = Relay::<u32>::default();
        relay.send(7);
    }

    #[cfg(debug_assertions)]
    #[test]
    fn second_emitter_location_is_rejected() {
        let (relay, _stream) = relay::<u8>();
        assert!(relay.try_send(1).is_ok());
        assert!(matches!(
            relay.try_send(2),
            Err(RelayError::MultipleEmitters { .. })
        ));
    }
}
