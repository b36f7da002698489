//! Order-type tracking with event-driven invalidation.

use std::sync::Arc;

use tokio::sync::watch;
use tracing::debug;

use storefront_core::OrderType;
use storefront_events::checkout::{
    CartMergedEvent, CartRestoredEvent, CartSavedEvent, DeliveryAddressClearedEvent,
    DeliveryAddressSetEvent, DeliveryModeClearedEvent, DeliveryModeSetEvent, LoginEvent,
    LogoutEvent, OrderPlacedEvent, PaymentDetailsCreatedEvent, PaymentDetailsSetEvent,
    ReplenishmentOrderScheduledEvent,
};
use storefront_events::{DomainEvent, EventBus, EventListener};

/// Tracks the current checkout order type, resetting it to the default
/// whenever any of a fixed set of unrelated domain events implies the choice
/// is stale (the session changed, the cart changed, an order went through).
///
/// The tracked value is mutated only by [`set`](OrderTypeTracker::set) and by
/// the invalidation events; no other code writes it. Readers observe it as a
/// live multicast [`watch`] channel, so every reader sees the same resets.
///
/// The event subscriptions are owned by the tracker and disposed when it is
/// dropped.
#[derive(Debug)]
pub struct OrderTypeTracker {
    current: Arc<watch::Sender<OrderType>>,
    _listeners: Vec<EventListener>,
}

impl OrderTypeTracker {
    /// Subscribe to the invalidation event set and start at the default
    /// order type.
    ///
    /// Must be called from within a tokio runtime.
    pub fn new(bus: &EventBus) -> Self {
        let (current, _) = watch::channel(OrderType::default());
        let current = Arc::new(current);

        // The closed invalidation set: any of these firing means the chosen
        // order type can no longer be trusted.
        let listeners = vec![
            reset_on::<LoginEvent>(bus, &current),
            reset_on::<LogoutEvent>(bus, &current),
            reset_on::<DeliveryAddressSetEvent>(bus, &current),
            reset_on::<DeliveryAddressClearedEvent>(bus, &current),
            reset_on::<DeliveryModeSetEvent>(bus, &current),
            reset_on::<DeliveryModeClearedEvent>(bus, &current),
            reset_on::<PaymentDetailsCreatedEvent>(bus, &current),
            reset_on::<PaymentDetailsSetEvent>(bus, &current),
            reset_on::<CartMergedEvent>(bus, &current),
            reset_on::<CartSavedEvent>(bus, &current),
            reset_on::<CartRestoredEvent>(bus, &current),
            reset_on::<OrderPlacedEvent>(bus, &current),
            reset_on::<ReplenishmentOrderScheduledEvent>(bus, &current),
        ];

        Self {
            current,
            _listeners: listeners,
        }
    }

    /// Explicitly select the order type for the next submission.
    pub fn set(&self, order_type: OrderType) {
        self.current.send_replace(order_type);
    }

    /// The currently selected order type.
    pub fn current(&self) -> OrderType {
        *self.current.borrow()
    }

    /// Live view of the selected order type; all receivers observe the same
    /// explicit writes and event-driven resets.
    pub fn watch(&self) -> watch::Receiver<OrderType> {
        self.current.subscribe()
    }
}

fn reset_on<E: DomainEvent>(
    bus: &EventBus,
    current: &Arc<watch::Sender<OrderType>>,
) -> EventListener {
    let current = current.clone();
    bus.on::<E, _>(move |event| {
        debug!(event_type = event.event_type(), "resetting order type");
        current.send_replace(OrderType::default());
    })
}
