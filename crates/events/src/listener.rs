//! Scoped event subscriptions.
//!
//! Every subscription must be disposed when its owning component is torn
//! down, or handlers keep acting on stale state. [`EventListener`] makes that
//! structural: the handler task runs only as long as the guard is held.

use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;
use tracing::debug;

use crate::bus::EventBus;
use crate::event::DomainEvent;

impl EventBus {
    /// Attach `handler` to every future event of type `E`.
    ///
    /// The handler runs on its own task, so a slow or panicking handler never
    /// affects the publisher or other subscribers. The returned
    /// [`EventListener`] owns the subscription: dropping it stops delivery.
    ///
    /// Must be called from within a tokio runtime.
    pub fn on<E, F>(&self, mut handler: F) -> EventListener
    where
        E: DomainEvent,
        F: FnMut(E) + Send + 'static,
    {
        let mut stream = self.subscribe::<E>();
        let cancel = CancellationToken::new();
        let token = cancel.clone();

        let task = tokio::spawn(async move {
            loop {
                tokio::select! {
                    _ = token.cancelled() => break,
                    event = stream.next() => match event {
                        Some(event) => handler(event),
                        None => break,
                    },
                }
            }
            debug!(
                event_type = core::any::type_name::<E>(),
                "event listener stopped"
            );
        });

        EventListener { cancel, task }
    }
}

/// Guard for a handler subscription created by [`EventBus::on`].
///
/// Dropping the guard cancels the handler task; no further events are
/// delivered to the handler afterwards.
#[derive(Debug)]
pub struct EventListener {
    cancel: CancellationToken,
    task: JoinHandle<()>,
}

impl EventListener {
    /// Stop the listener and wait for its task to finish.
    ///
    /// Prefer this over plain drop when the caller needs to know no handler
    /// invocation is still running.
    pub async fn shutdown(mut self) {
        self.cancel.cancel();
        // A panicked handler task already stopped delivery; nothing to do.
        let _ = (&mut self.task).await;
    }
}

impl Drop for EventListener {
    fn drop(&mut self) {
        self.cancel.cancel();
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;
    use std::sync::atomic::{AtomicU32, Ordering};

    use super::*;

    #[derive(Debug, Clone)]
    struct Tick;

    impl DomainEvent for Tick {
        fn event_type(&self) -> &'static str {
            "test.tick"
        }
    }

    #[tokio::test]
    async fn handler_runs_per_event() {
        let bus = EventBus::new();
        let seen = Arc::new(AtomicU32::new(0));

        let counter = seen.clone();
        let listener = bus.on::<Tick, _>(move |_| {
            counter.fetch_add(1, Ordering::SeqCst);
        });

        bus.dispatch(Tick);
        bus.dispatch(Tick);
        tokio::task::yield_now().await;

        assert_eq!(seen.load(Ordering::SeqCst), 2);
        listener.shutdown().await;
    }

    #[tokio::test]
    async fn dropping_the_guard_stops_delivery() {
        let bus = EventBus::new();
        let seen = Arc::new(AtomicU32::new(0));

        let counter = seen.clone();
        let listener = bus.on::<Tick, _>(move |_| {
            counter.fetch_add(1, Ordering::SeqCst);
        });

        bus.dispatch(Tick);
        tokio::task::yield_now().await;
        listener.shutdown().await;

        bus.dispatch(Tick);
        tokio::task::yield_now().await;

        assert_eq!(seen.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn panicking_handler_does_not_affect_other_subscribers() {
        let bus = EventBus::new();
        let seen = Arc::new(AtomicU32::new(0));

        let _bad = bus.on::<Tick, _>(|_| panic!("handler blew up"));
        let counter = seen.clone();
        let _good = bus.on::<Tick, _>(move |_| {
            counter.fetch_add(1, Ordering::SeqCst);
        });

        bus.dispatch(Tick);
        tokio::task::yield_now().await;
        bus.dispatch(Tick);
        tokio::task::yield_now().await;

        assert_eq!(seen.load(Ordering::SeqCst), 2);
    }
}
