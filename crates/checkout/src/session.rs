//! Identity/session boundary.

use async_trait::async_trait;

use storefront_core::CheckoutContext;

/// External identity/session provider.
///
/// Yields the current user and active-cart snapshot, consumed at the moment
/// an operation begins. The snapshot is then authorized via
/// [`CheckoutContext::authorize`]; if the conditions are not met the command
/// fails fast with a precondition error and the operation never starts.
#[async_trait]
pub trait SessionProvider: Send + Sync {
    async fn checkout_context(&self) -> CheckoutContext;
}
