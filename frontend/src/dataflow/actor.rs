//! Single-value Actor
//!
//! An Actor owns a `Mutable<T>` and a task that consumes Relay streams
//! sequentially; views read its state only through signals.

use std::future::Future;
use std::sync::Arc;
use zoon::{Mutable, Signal, Task, TaskHandle};

/// Reactive state container mutated only by its own processing task.
///
/// # Examples
///
/// ```rust
/// let (next_clicked_relay, mut next_clicked_stream) = relay();
///
/// let index = Actor::new(0, async move |state| {
///     while let Some(()) = next_clicked_stream.next().await {
///         state.update_mut(|index| *index += 1);
///     }
/// });
///
/// next_clicked_relay.send(());
/// index.signal() // reactive current value
/// ```
#[derive(Clone, Debug)]
pub struct Actor<T = ()>
where
    T: Clone + Send + Sync + 'static,
{
    pub(crate) state: Mutable<T>,
    // Dropping the last clone stops the processor.
    #[allow(dead_code)]
    task_handle: Arc<TaskHandle>,
    #[cfg(debug_assertions)]
    #[allow(dead_code)]
    creation_location: &'static std::panic::Location<'static>,
}

impl<T> Actor<T>
where
    T: Clone + Send + Sync + 'static,
{
    #[track_caller]
    pub fn new<F, Fut>(initial_state: T, processor: F) -> Self
    where
        F: FnOnce(Mutable<T>) -> Fut + Send + 'static,
        Fut: Future<Output = ()> + Send + 'static,
    {
        let state = Mutable::new(initial_state);
        let task_handle = Arc::new(Task::start_droppable(processor(state.clone())));

        Self {
            state,
            task_handle,
            #[cfg(debug_assertions)]
            creation_location: std::panic::Location::caller(),
        }
    }

    pub fn signal(&self) -> impl Signal<Item = T> + use<T> {
        self.state.signal_cloned()
    }

    /// Maps the state by reference; use for large states.
    pub fn signal_ref<U, F>(&self, f: F) -> impl Signal<Item = U> + use<T, U, F>
    where
        U: PartialEq + Send + Sync + 'static,
        F: Fn(&T) -> U + Send + Sync + 'static,
    {
        self.state.signal_ref(f)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dataflow::relay;
    use futures::StreamExt;
    use zoon::SignalExt;

    #[tokio::test]
    async fn applies_events_sequentially() {
        let (increment_relay, mut increment_stream) = relay();

        let counter = Actor::new(0, async move |state| {
            while let Some(amount) = increment_stream.next().await {
                state.update_mut(|current| *current += amount);
            }
        });

        for amount in [5, 3] {
            increment_relay.send(amount);
        }
        tokio::time::sleep(tokio::time::Duration::from_millis(10)).await;

        assert_eq!(counter.signal().to_stream().next().await, Some(8));
    }
}
