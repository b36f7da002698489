//! Checkout event catalog.
//!
//! The closed set of events the checkout feature publishes and reacts to.
//! Session and checkout-step events carry no payload; the order events carry
//! the accepted order so downstream consumers (confirmation views, analytics)
//! need no second lookup.

use serde::{Deserialize, Serialize};

use storefront_core::{CartId, Order, ReplenishmentOrder, SessionUser};

use crate::event::DomainEvent;

macro_rules! domain_event {
    ($t:ty, $tag:literal) => {
        impl DomainEvent for $t {
            fn event_type(&self) -> &'static str {
                $tag
            }
        }
    };
}

/// A user logged in.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LoginEvent;
domain_event!(LoginEvent, "auth.login");

/// A user logged out.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LogoutEvent;
domain_event!(LogoutEvent, "auth.logout");

/// A delivery address was set on the active cart.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeliveryAddressSetEvent;
domain_event!(DeliveryAddressSetEvent, "checkout.delivery_address.set");

/// The delivery address was cleared from the active cart.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeliveryAddressClearedEvent;
domain_event!(
    DeliveryAddressClearedEvent,
    "checkout.delivery_address.cleared"
);

/// A delivery mode was selected.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeliveryModeSetEvent;
domain_event!(DeliveryModeSetEvent, "checkout.delivery_mode.set");

/// The delivery mode selection was cleared.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeliveryModeClearedEvent;
domain_event!(DeliveryModeClearedEvent, "checkout.delivery_mode.cleared");

/// Payment details were created for the session.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PaymentDetailsCreatedEvent;
domain_event!(PaymentDetailsCreatedEvent, "checkout.payment_details.created");

/// Existing payment details were attached to the cart.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PaymentDetailsSetEvent;
domain_event!(PaymentDetailsSetEvent, "checkout.payment_details.set");

/// An anonymous cart was merged into the user's cart.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CartMergedEvent {
    pub cart_id: CartId,
}
domain_event!(CartMergedEvent, "cart.merged");

/// The active cart was saved for later.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CartSavedEvent {
    pub cart_id: CartId,
}
domain_event!(CartSavedEvent, "cart.saved");

/// A previously saved cart was restored as the active cart.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CartRestoredEvent {
    pub cart_id: CartId,
}
domain_event!(CartRestoredEvent, "cart.restored");

/// A one-off order was placed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrderPlacedEvent {
    pub user: SessionUser,
    pub cart_id: CartId,
    pub order: Order,
}
domain_event!(OrderPlacedEvent, "checkout.order.placed");

/// A replenishment order was scheduled.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReplenishmentOrderScheduledEvent {
    pub user: SessionUser,
    pub cart_id: CartId,
    pub replenishment_order: ReplenishmentOrder,
}
domain_event!(
    ReplenishmentOrderScheduledEvent,
    "checkout.replenishment_order.scheduled"
);
