//! Order submission workflow.
//!
//! One place-order workflow parameterized by an order strategy per
//! [`OrderType`], selected through a dispatch table. Adding a new order type
//! means registering a table entry; nothing here switches on the enum.

use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use tracing::debug;

use storefront_commands::{CommandError, CommandResult};
use storefront_core::{DomainError, Order, OrderType, ReplenishmentOrder};

use crate::form::ReplenishmentFormStore;
use crate::order_type::OrderTypeTracker;
use crate::place_order::PlaceOrderService;
use crate::replenishment::ScheduledReplenishmentService;

/// Where the UI navigates after a successful submission.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum ConfirmationRoute {
    OrderConfirmation,
    ReplenishmentConfirmation,
}

/// The accepted order, whichever flow produced it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PlacedOrder {
    OneOff(Order),
    Replenishment(ReplenishmentOrder),
}

/// Result of a successful workflow submission.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OrderOutcome {
    pub placed: PlacedOrder,
    pub confirmation_route: ConfirmationRoute,
}

/// One submission flavor: how to submit, and where to go on success.
#[async_trait]
pub trait OrderStrategy: Send + Sync {
    async fn submit(&self, terms_checked: bool) -> CommandResult<PlacedOrder>;

    fn confirmation_route(&self) -> ConfirmationRoute;
}

/// Dispatch table mapping each [`OrderType`] to its strategy.
#[derive(Default)]
pub struct OrderStrategyRegistry {
    entries: HashMap<OrderType, Arc<dyn OrderStrategy>>,
}

impl OrderStrategyRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn register(mut self, order_type: OrderType, strategy: Arc<dyn OrderStrategy>) -> Self {
        self.entries.insert(order_type, strategy);
        self
    }

    pub fn get(&self, order_type: OrderType) -> Option<&Arc<dyn OrderStrategy>> {
        self.entries.get(&order_type)
    }
}

impl core::fmt::Debug for OrderStrategyRegistry {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("OrderStrategyRegistry")
            .field("order_types", &self.entries.keys().collect::<Vec<_>>())
            .finish()
    }
}

/// The single submit path behind the place-order button.
///
/// Reads the currently tracked [`OrderType`], looks up its strategy, and runs
/// it. The workflow itself has no knowledge of the individual flows.
pub struct PlaceOrderWorkflow {
    tracker: Arc<OrderTypeTracker>,
    registry: OrderStrategyRegistry,
}

impl PlaceOrderWorkflow {
    pub fn new(tracker: Arc<OrderTypeTracker>, registry: OrderStrategyRegistry) -> Self {
        Self { tracker, registry }
    }

    /// Wire the two shipped strategies: one-off placement and scheduled
    /// replenishment.
    pub fn standard(
        tracker: Arc<OrderTypeTracker>,
        place_order: Arc<PlaceOrderService>,
        replenishment: Arc<ScheduledReplenishmentService>,
        forms: Arc<ReplenishmentFormStore>,
    ) -> Self {
        let registry = OrderStrategyRegistry::new()
            .register(
                OrderType::PlaceOrder,
                Arc::new(StandardOrderStrategy {
                    service: place_order,
                }),
            )
            .register(
                OrderType::ScheduleReplenishmentOrder,
                Arc::new(ReplenishmentOrderStrategy {
                    service: replenishment,
                    forms,
                }),
            );
        Self::new(tracker, registry)
    }

    /// Submit the current cart using the strategy for the tracked order type.
    pub async fn submit(&self, terms_checked: bool) -> CommandResult<OrderOutcome> {
        let order_type = self.tracker.current();
        let strategy = self.registry.get(order_type).ok_or_else(|| {
            CommandError::Precondition(DomainError::precondition(format!(
                "no order strategy registered for {order_type:?}"
            )))
        })?;

        debug!(?order_type, "submitting order");
        let placed = strategy.submit(terms_checked).await?;

        Ok(OrderOutcome {
            placed,
            confirmation_route: strategy.confirmation_route(),
        })
    }
}

/// One-off order placement strategy.
struct StandardOrderStrategy {
    service: Arc<PlaceOrderService>,
}

#[async_trait]
impl OrderStrategy for StandardOrderStrategy {
    async fn submit(&self, terms_checked: bool) -> CommandResult<PlacedOrder> {
        let order = self.service.place_order(terms_checked).await?;
        Ok(PlacedOrder::OneOff(order))
    }

    fn confirmation_route(&self) -> ConfirmationRoute {
        ConfirmationRoute::OrderConfirmation
    }
}

/// Scheduled replenishment strategy; submits the tracked form data and resets
/// it once the schedule is accepted.
struct ReplenishmentOrderStrategy {
    service: Arc<ScheduledReplenishmentService>,
    forms: Arc<ReplenishmentFormStore>,
}

#[async_trait]
impl OrderStrategy for ReplenishmentOrderStrategy {
    async fn submit(&self, terms_checked: bool) -> CommandResult<PlacedOrder> {
        let form = self.forms.current();
        let order = self
            .service
            .schedule_replenishment_order(form, terms_checked)
            .await?;
        self.forms.reset();
        Ok(PlacedOrder::Replenishment(order))
    }

    fn confirmation_route(&self) -> ConfirmationRoute {
        ConfirmationRoute::ReplenishmentConfirmation
    }
}

#[cfg(test)]
mod tests {
    use storefront_core::OrderType;
    use storefront_events::EventBus;

    use super::*;

    struct StubStrategy(ConfirmationRoute);

    #[async_trait]
    impl OrderStrategy for StubStrategy {
        async fn submit(&self, _terms_checked: bool) -> CommandResult<PlacedOrder> {
            Err(CommandError::failed(anyhow::anyhow!("stub")))
        }

        fn confirmation_route(&self) -> ConfirmationRoute {
            self.0
        }
    }

    #[tokio::test]
    async fn unregistered_order_type_is_a_precondition_failure() {
        let bus = EventBus::new();
        let tracker = Arc::new(OrderTypeTracker::new(&bus));
        let workflow = PlaceOrderWorkflow::new(tracker.clone(), OrderStrategyRegistry::new());

        let err = workflow.submit(true).await.unwrap_err();
        assert!(matches!(err, CommandError::Precondition(_)));
    }

    #[tokio::test]
    async fn dispatches_to_the_strategy_for_the_tracked_type() {
        let bus = EventBus::new();
        let tracker = Arc::new(OrderTypeTracker::new(&bus));
        let registry = OrderStrategyRegistry::new().register(
            OrderType::ScheduleReplenishmentOrder,
            Arc::new(StubStrategy(ConfirmationRoute::ReplenishmentConfirmation)),
        );
        let workflow = PlaceOrderWorkflow::new(tracker.clone(), registry);

        // Default type has no entry; the explicitly selected one does.
        assert!(workflow.submit(true).await.is_err());

        tracker.set(OrderType::ScheduleReplenishmentOrder);
        let err = workflow.submit(true).await.unwrap_err();
        assert!(matches!(err, CommandError::Failed(_)));
    }
}
