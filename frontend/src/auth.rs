//! Local sign-in stand-in
//!
//! The signed-in user name is kept in `localStorage`, so a reload restores
//! the session. There is no password check.

use futures::{StreamExt, select};
use shared::AuthStatus;
use zoon::Signal;

use crate::dataflow::{Actor, Relay, relay};
use crate::debug_utils::{DEBUG_ROUTING, debug_critical, debug_flagged};

const SESSION_STORAGE_KEY: &str = "dashboard.user";

#[derive(Clone)]
pub struct Auth {
    pub status_actor: Actor<AuthStatus>,
    sign_in_requested_relay: Relay<String>,
    sign_out_requested_relay: Relay,
}

impl Auth {
    pub fn new() -> Self {
        let (sign_in_requested_relay, mut sign_in_requested_stream) = relay::<String>();
        let (sign_out_requested_relay, mut sign_out_requested_stream) = relay();

        let status_actor = Actor::new(AuthStatus::Loading, async move |state| {
            state.set(status_from_stored(load_stored_user()));

            loop {
                select! {
                    user = sign_in_requested_stream.next() => {
                        let Some(user) = user else { continue };
                        match signed_in(&user) {
                            Some(status) => {
                                store_user(Some(&user));
                                debug_flagged(DEBUG_ROUTING, &format!("Signed in as '{}'", user.trim()));
                                state.set(status);
                            }
                            None => debug_flagged(DEBUG_ROUTING, "Ignored sign-in with an empty user name"),
                        }
                    }
                    request = sign_out_requested_stream.next() => {
                        if request.is_some() {
                            store_user(None);
                            state.set(AuthStatus::SignedOut);
                        }
                    }
                    complete => break,
                }
            }
        });

        Self {
            status_actor,
            sign_in_requested_relay,
            sign_out_requested_relay,
        }
    }

    pub fn sign_in(&self, user: String) {
        self.sign_in_requested_relay.send(user);
    }

    pub fn sign_out(&self) {
        self.sign_out_requested_relay.send(());
    }

    pub fn status_signal(&self) -> impl Signal<Item = AuthStatus> + use<> {
        self.status_actor.signal()
    }
}

fn signed_in(user: &str) -> Option<AuthStatus> {
    let user = user.trim();
    (!user.is_empty()).then(|| AuthStatus::SignedIn {
        user: user.to_string(),
    })
}

fn status_from_stored(stored: Option<String>) -> AuthStatus {
    stored
        .as_deref()
        .and_then(signed_in)
        .unwrap_or(AuthStatus::SignedOut)
}

fn local_storage() -> Option<web_sys::Storage> {
    web_sys::window().and_then(|window| window.local_storage().ok().flatten())
}

fn load_stored_user() -> Option<String> {
    local_storage().and_then(|storage| storage.get_item(SESSION_STORAGE_KEY).ok().flatten())
}

fn store_user(user: Option<&str>) {
    let Some(storage) = local_storage() else {
        return;
    };
    let result = match user {
        Some(user) => storage.set_item(SESSION_STORAGE_KEY, user.trim()),
        None => storage.remove_item(SESSION_STORAGE_KEY),
    };
    if let Err(error) = result {
        debug_critical(&format!("Failed to persist session: {error:?}"));
    }
}
