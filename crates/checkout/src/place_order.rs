//! One-off order placement.

use std::sync::Arc;

use tokio::sync::watch;
use tracing::info;

use storefront_commands::{Command, CommandError, CommandOptions, CommandResult, CommandService};
use storefront_core::{DomainError, Order};
use storefront_events::EventBus;
use storefront_events::checkout::OrderPlacedEvent;

use crate::connector::OrderConnector;
use crate::session::SessionProvider;

/// Places the active cart as a one-off order.
///
/// Owns a single `CancelPrevious` command created at construction: repeated
/// submissions supersede each other, so a double-clicked place-order button
/// can never deliver two outcomes. On success an
/// [`OrderPlacedEvent`] is dispatched for whoever cares (confirmation views,
/// the order-type tracker, analytics).
pub struct PlaceOrderService {
    command: Command<bool, Order>,
}

impl PlaceOrderService {
    pub fn new(
        session: Arc<dyn SessionProvider>,
        connector: Arc<dyn OrderConnector>,
        bus: Arc<EventBus>,
    ) -> Self {
        let command = CommandService::new().create(
            move |terms_checked: bool| {
                let session = session.clone();
                let connector = connector.clone();
                let bus = bus.clone();
                async move {
                    if !terms_checked {
                        return Err(CommandError::Precondition(DomainError::precondition(
                            "terms and conditions not accepted",
                        )));
                    }

                    let context = session.checkout_context().await;
                    let (user, cart_id) = context.authorize()?;

                    let order = connector
                        .place_order(cart_id, &user, terms_checked)
                        .await
                        .map_err(CommandError::Failed)?;

                    info!(%cart_id, order_id = %order.id, "order placed");
                    bus.dispatch(OrderPlacedEvent {
                        user,
                        cart_id,
                        order: order.clone(),
                    });

                    Ok(order)
                }
            },
            CommandOptions::default(),
        );

        Self { command }
    }

    /// Submit the active cart as a one-off order.
    pub async fn place_order(&self, terms_checked: bool) -> CommandResult<Order> {
        self.command.execute(terms_checked).await
    }

    /// Busy signal of the underlying command.
    pub fn busy(&self) -> watch::Receiver<bool> {
        self.command.busy()
    }
}
