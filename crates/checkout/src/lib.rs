//! `storefront-checkout` — checkout workflows built on commands and events.
//!
//! This crate wires the command primitive, the event bus, and the external
//! collaborator boundaries into the two checkout submission flows:
//!
//! - [`PlaceOrderService`] — one-off order placement
//! - [`ScheduledReplenishmentService`] — recurring replenishment scheduling
//!
//! Which flow a submission takes is transient derived state owned by
//! [`OrderTypeTracker`], which resets itself to the default whenever any of a
//! fixed set of cross-cutting events (login, logout, address/payment changes,
//! cart merges, order placement, ...) implies it is stale.
//!
//! [`PlaceOrderWorkflow`] selects the flow through a strategy table keyed by
//! [`OrderType`](storefront_core::OrderType) — extending checkout with a new
//! order type means registering a table entry, not editing a switch.

pub mod connector;
pub mod form;
pub mod order_type;
pub mod place_order;
pub mod replenishment;
pub mod session;
pub mod workflow;


pub use connector::{OrderConnector, ReplenishmentOrderConnector};
pub use form::ReplenishmentFormStore;
pub use order_type::OrderTypeTracker;
pub use place_order::PlaceOrderService;
pub use replenishment::ScheduledReplenishmentService;
pub use session::SessionProvider;
pub use workflow::{
    ConfirmationRoute, OrderOutcome, OrderStrategy, OrderStrategyRegistry, PlaceOrderWorkflow,
    PlacedOrder,
};
