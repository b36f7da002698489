//! Backend connector boundaries.
//!
//! Connectors are the opaque order-placement backends invoked by the command
//! operation factories. Their success/failure shape is opaque to the command
//! layer; failures are carried verbatim as operation-failure causes.

use async_trait::async_trait;

use storefront_core::{CartId, Order, ReplenishmentOrder, ScheduleReplenishmentForm, SessionUser};

/// Places one-off orders.
#[async_trait]
pub trait OrderConnector: Send + Sync {
    async fn place_order(
        &self,
        cart_id: CartId,
        user: &SessionUser,
        terms_checked: bool,
    ) -> anyhow::Result<Order>;
}

/// Schedules recurring replenishment orders.
#[async_trait]
pub trait ReplenishmentOrderConnector: Send + Sync {
    async fn schedule_replenishment_order(
        &self,
        cart_id: CartId,
        form: &ScheduleReplenishmentForm,
        terms_checked: bool,
        user: &SessionUser,
    ) -> anyhow::Result<ReplenishmentOrder>;
}
