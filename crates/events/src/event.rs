//! Domain event trait.

/// A domain-agnostic event.
///
/// Events are:
/// - **immutable** (treat them as facts)
/// - **tagged by their concrete type** (the bus routes on the Rust type)
/// - cheap to clone (every subscriber receives its own copy)
pub trait DomainEvent: Clone + core::fmt::Debug + Send + Sync + 'static {
    /// Stable event name/type identifier (e.g. "checkout.order.placed").
    fn event_type(&self) -> &'static str;
}
