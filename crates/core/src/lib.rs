//! `storefront-core` — domain foundation building blocks.
//!
//! This crate contains **pure domain** primitives (no infrastructure concerns):
//! identifiers, the domain error model, the checkout session snapshot, and the
//! order/replenishment value objects shared by the command and checkout layers.

pub mod error;
pub mod id;
pub mod order;
pub mod session;
pub mod value_object;

pub use error::{DomainError, DomainResult};
pub use id::{CartId, OrderId, ReplenishmentOrderId, UserId};
pub use order::{
    DayOfWeek, Order, OrderType, RecurrencePeriod, ReplenishmentOrder, ScheduleReplenishmentForm,
};
pub use session::{CheckoutContext, SessionUser};
pub use value_object::ValueObject;
