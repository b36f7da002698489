//! Typed event bus (pub/sub mechanics only).
//!
//! The bus is process-wide shared state: any component may publish or
//! subscribe, and producer and subscriber never reference each other. Each
//! concrete event type gets its own broadcast channel, created lazily on the
//! first dispatch or subscription.
//!
//! ## Delivery Guarantees
//!
//! - **Live semantics**: subscribing does not replay past events.
//! - **Per-type ordering**: a single subscriber sees one type's events in
//!   dispatch order. No ordering across types.
//! - **Non-blocking publish**: a slow subscriber never stalls the producer.
//!   Subscribers that fall behind the channel capacity lose the oldest
//!   events (logged, not fatal); consumers needing durability must layer it
//!   themselves.
//! - **No persistence**: the bus distributes, it does not store.

use std::any::{Any, TypeId};
use std::collections::HashMap;
use std::sync::{Mutex, PoisonError};

use tokio::sync::broadcast;
use tracing::{debug, warn};

use crate::event::DomainEvent;

/// Default per-event-type channel capacity.
///
/// Bounds how far a subscriber may lag before it starts losing events.
const DEFAULT_CAPACITY: usize = 64;

/// In-process typed pub/sub bus.
///
/// One broadcast channel per concrete event type, keyed by `TypeId`. The
/// registry mutation is synchronous and short; all waiting happens on the
/// per-subscriber receivers, never inside the bus.
#[derive(Debug)]
pub struct EventBus {
    channels: Mutex<HashMap<TypeId, Box<dyn Any + Send + Sync>>>,
    capacity: usize,
}

impl EventBus {
    pub fn new() -> Self {
        Self::with_capacity(DEFAULT_CAPACITY)
    }

    /// Create a bus whose per-type channels hold up to `capacity` undelivered
    /// events per subscriber.
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            channels: Mutex::new(HashMap::new()),
            capacity: capacity.max(1),
        }
    }

    /// Deliver `event` to all current subscribers of its type.
    ///
    /// Dispatch with no subscribers is a no-op; the event is simply dropped.
    pub fn dispatch<E: DomainEvent>(&self, event: E) {
        let sender = self.sender::<E>();
        debug!(event_type = event.event_type(), "dispatching event");

        // send() only errors when there are no receivers, which is fine here.
        let _ = sender.send(event);
    }

    /// Subscribe to all future events of type `E`.
    pub fn subscribe<E: DomainEvent>(&self) -> EventStream<E> {
        EventStream {
            receiver: self.sender::<E>().subscribe(),
        }
    }

    fn sender<E: DomainEvent>(&self) -> broadcast::Sender<E> {
        let mut channels = self
            .channels
            .lock()
            .unwrap_or_else(PoisonError::into_inner);

        let entry = channels.entry(TypeId::of::<E>()).or_insert_with(|| {
            let (tx, _) = broadcast::channel::<E>(self.capacity);
            Box::new(tx)
        });

        match entry.downcast_ref::<broadcast::Sender<E>>() {
            Some(tx) => tx.clone(),
            // Unreachable: entries are only ever inserted under their own TypeId.
            None => {
                let (tx, _) = broadcast::channel::<E>(self.capacity);
                *entry = Box::new(tx.clone());
                tx
            }
        }
    }
}

impl Default for EventBus {
    fn default() -> Self {
        Self::new()
    }
}

/// Live stream of one event type, owned by a single subscriber.
///
/// Dropping the stream unsubscribes.
#[derive(Debug)]
pub struct EventStream<E> {
    receiver: broadcast::Receiver<E>,
}

impl<E: DomainEvent> EventStream<E> {
    /// Wait for the next event.
    ///
    /// Returns `None` only when the bus itself has been dropped. Lag gaps
    /// (events lost because this subscriber fell behind) are skipped with a
    /// warning rather than surfaced as errors.
    pub async fn next(&mut self) -> Option<E> {
        loop {
            match self.receiver.recv().await {
                Ok(event) => return Some(event),
                Err(broadcast::error::RecvError::Lagged(skipped)) => {
                    warn!(
                        skipped,
                        event_type = core::any::type_name::<E>(),
                        "subscriber lagged; events dropped"
                    );
                }
                Err(broadcast::error::RecvError::Closed) => return None,
            }
        }
    }

    /// Non-blocking poll for an already-delivered event.
    pub fn try_next(&mut self) -> Option<E> {
        loop {
            match self.receiver.try_recv() {
                Ok(event) => return Some(event),
                Err(broadcast::error::TryRecvError::Lagged(_)) => continue,
                Err(_) => return None,
            }
        }
    }
}
