//! Local UI state Atom
//!
//! Atom wraps an Actor and a setter Relay for small component-local state
//! such as a form field or a canvas clock.

use crate::dataflow::{Actor, Relay, relay};
use futures::StreamExt;
use zoon::Signal;

#[derive(Clone, Debug)]
pub struct Atom<T>
where
    T: Clone + Send + Sync + 'static,
{
    actor: Actor<T>,
    setter: Relay<T>,
}

impl<T> Atom<T>
where
    T: Clone + Send + Sync + PartialEq + 'static,
{
    pub fn new(initial: T) -> Self {
        let (setter, mut setter_stream) = relay();

        let actor = Actor::new(initial, async move |state| {
            while let Some(new_value) = setter_stream.next().await {
                state.set_neq(new_value);
            }
        });

        Self { actor, setter }
    }

    pub fn set(&self, value: T) {
        self.setter.send(value);
    }

    pub fn signal(&self) -> impl Signal<Item = T> + use<T> {
        self.actor.signal()
    }

    /// Current value, for event handlers that need it synchronously.
    pub fn get_cloned(&self) -> T {
        self.actor.state.lock_ref().clone()
    }
}

impl<T> Default for Atom<T>
where
    T: Clone + Send + Sync + Default + PartialEq + 'static,
{
    fn default() -> Self {
        Self::new(T::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use futures::StreamExt;
    use zoon::SignalExt;

    #[tokio::test]
    async fn set_replaces_value() {
        let username = Atom::new(String::new());
        for value in ["a", "analyst"] {
            username.set(value.to_string());
        }
        tokio::time::sleep(tokio::time::Duration::from_millis(10)).await;

        assert_eq!(username.get_cloned(), "analyst");
        let current = username.signal().to_stream().next().await;
        assert_eq!(current.as_deref(), Some("analyst"));
    }
}
