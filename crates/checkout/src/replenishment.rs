//! Scheduled replenishment ordering.

use std::sync::Arc;

use tokio::sync::watch;
use tracing::info;

use storefront_commands::{Command, CommandError, CommandOptions, CommandResult, CommandService};
use storefront_core::{ReplenishmentOrder, ScheduleReplenishmentForm};
use storefront_events::EventBus;
use storefront_events::checkout::ReplenishmentOrderScheduledEvent;

use crate::connector::ReplenishmentOrderConnector;
use crate::session::SessionProvider;

#[derive(Debug, Clone)]
struct ScheduleRequest {
    form: ScheduleReplenishmentForm,
    terms_checked: bool,
}

/// Schedules the active cart as a recurring replenishment order.
///
/// The submission path is one `CancelPrevious` command: validate the schedule
/// form, snapshot and authorize the session context, call the backend
/// connector, then announce the accepted order on the event bus. A newer
/// submission supersedes an in-flight one; the superseded caller observes a
/// cancellation and no stale outcome.
pub struct ScheduledReplenishmentService {
    command: Command<ScheduleRequest, ReplenishmentOrder>,
}

impl ScheduledReplenishmentService {
    pub fn new(
        session: Arc<dyn SessionProvider>,
        connector: Arc<dyn ReplenishmentOrderConnector>,
        bus: Arc<EventBus>,
    ) -> Self {
        let command = CommandService::new().create(
            move |request: ScheduleRequest| {
                let session = session.clone();
                let connector = connector.clone();
                let bus = bus.clone();
                async move {
                    request.form.validate()?;

                    let context = session.checkout_context().await;
                    let (user, cart_id) = context.authorize()?;

                    let replenishment_order = connector
                        .schedule_replenishment_order(
                            cart_id,
                            &request.form,
                            request.terms_checked,
                            &user,
                        )
                        .await
                        .map_err(CommandError::Failed)?;

                    info!(
                        %cart_id,
                        replenishment_order_id = %replenishment_order.id,
                        "replenishment order scheduled"
                    );
                    bus.dispatch(ReplenishmentOrderScheduledEvent {
                        user,
                        cart_id,
                        replenishment_order: replenishment_order.clone(),
                    });

                    Ok(replenishment_order)
                }
            },
            CommandOptions::default(),
        );

        Self { command }
    }

    /// Schedule a replenishment order for the active cart.
    pub async fn schedule_replenishment_order(
        &self,
        form: ScheduleReplenishmentForm,
        terms_checked: bool,
    ) -> CommandResult<ReplenishmentOrder> {
        self.command
            .execute(ScheduleRequest {
                form,
                terms_checked,
            })
            .await
    }

    /// Busy signal of the underlying command.
    pub fn busy(&self) -> watch::Receiver<bool> {
        self.command.busy()
    }
}

#[cfg(test)]
mod tests {
    use async_trait::async_trait;
    use chrono::Utc;

    use storefront_core::{
        CartId, CheckoutContext, DayOfWeek, ReplenishmentOrderId, SessionUser, UserId,
    };

    use super::*;

    struct FixedSession(CheckoutContext);

    #[async_trait]
    impl SessionProvider for FixedSession {
        async fn checkout_context(&self) -> CheckoutContext {
            self.0.clone()
        }
    }

    struct OkConnector;

    #[async_trait]
    impl ReplenishmentOrderConnector for OkConnector {
        async fn schedule_replenishment_order(
            &self,
            cart_id: CartId,
            form: &ScheduleReplenishmentForm,
            _terms_checked: bool,
            _user: &SessionUser,
        ) -> anyhow::Result<ReplenishmentOrder> {
            Ok(ReplenishmentOrder {
                id: ReplenishmentOrderId::new(),
                cart_id,
                schedule: form.clone(),
                active: true,
                scheduled_at: Utc::now(),
            })
        }
    }

    struct FailingConnector;

    #[async_trait]
    impl ReplenishmentOrderConnector for FailingConnector {
        async fn schedule_replenishment_order(
            &self,
            _cart_id: CartId,
            _form: &ScheduleReplenishmentForm,
            _terms_checked: bool,
            _user: &SessionUser,
        ) -> anyhow::Result<ReplenishmentOrder> {
            anyhow::bail!("backend unavailable")
        }
    }

    fn registered_session(cart_id: CartId) -> Arc<dyn SessionProvider> {
        Arc::new(FixedSession(CheckoutContext {
            user: SessionUser::Registered(UserId::new()),
            cart_id: Some(cart_id),
            guest_cart: false,
        }))
    }

    #[tokio::test]
    async fn scheduling_dispatches_the_event() {
        let bus = Arc::new(EventBus::new());
        let cart_id = CartId::new();
        let service = ScheduledReplenishmentService::new(
            registered_session(cart_id),
            Arc::new(OkConnector),
            bus.clone(),
        );

        let mut scheduled = bus.subscribe::<ReplenishmentOrderScheduledEvent>();
        let order = service
            .schedule_replenishment_order(ScheduleReplenishmentForm::daily(7), true)
            .await
            .unwrap();

        let event = scheduled.next().await.unwrap();
        assert_eq!(event.cart_id, cart_id);
        assert_eq!(event.replenishment_order, order);
        assert!(order.active);
    }

    #[tokio::test]
    async fn invalid_form_is_rejected_before_the_backend() {
        let bus = Arc::new(EventBus::new());
        let service = ScheduledReplenishmentService::new(
            registered_session(CartId::new()),
            Arc::new(FailingConnector),
            bus,
        );

        // Weekly with no days would never trigger; the failing connector
        // proves the backend is never consulted.
        let err = service
            .schedule_replenishment_order(ScheduleReplenishmentForm::weekly(vec![]), true)
            .await
            .unwrap_err();
        assert!(matches!(err, CommandError::Precondition(_)));
    }

    #[tokio::test]
    async fn backend_failure_is_surfaced_with_its_cause() {
        let bus = Arc::new(EventBus::new());
        let service = ScheduledReplenishmentService::new(
            registered_session(CartId::new()),
            Arc::new(FailingConnector),
            bus.clone(),
        );

        let mut scheduled = bus.subscribe::<ReplenishmentOrderScheduledEvent>();
        let err = service
            .schedule_replenishment_order(
                ScheduleReplenishmentForm::weekly(vec![DayOfWeek::Monday]),
                true,
            )
            .await
            .unwrap_err();

        match err {
            CommandError::Failed(cause) => {
                assert!(cause.to_string().contains("backend unavailable"))
            }
            other => panic!("expected Failed, got {other:?}"),
        }
        assert!(scheduled.try_next().is_none());
    }
}
