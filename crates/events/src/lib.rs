//! `storefront-events` — typed domain events and the in-process event bus.
//!
//! This crate decouples producers of domain occurrences from the consumers
//! that must react to them. Producers [`dispatch`](bus::EventBus::dispatch)
//! typed events; consumers either pull from an [`EventStream`](bus::EventStream)
//! or attach a handler through [`EventBus::on`](bus::EventBus::on), which
//! returns a guard tying the subscription's lifetime to the owning component.
//!
//! Delivery is **live**: a subscriber only sees events dispatched after it
//! subscribed. Within one event type, delivery order to a single subscriber
//! matches dispatch order; no ordering is promised across types.

pub mod bus;
pub mod checkout;
pub mod event;
pub mod listener;

pub use bus::{EventBus, EventStream};
pub use event::DomainEvent;
pub use listener::EventListener;
