//! Order-type and replenishment value objects.
//!
//! Checkout can submit a cart in one of two modes: place the order once, or
//! schedule it as a recurring replenishment. The mode is transient derived
//! state tracked per session; [`OrderType::default`] is the documented reset
//! value.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::{DomainError, DomainResult};
use crate::id::{CartId, OrderId, ReplenishmentOrderId};
use crate::value_object::ValueObject;

/// The kind of order a checkout submission produces.
#[derive(Debug, Copy, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OrderType {
    /// One-off order placement (the default mode).
    #[default]
    PlaceOrder,
    /// Recurring order on a replenishment schedule.
    ScheduleReplenishmentOrder,
}

/// How often a replenishment order recurs.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RecurrencePeriod {
    Daily,
    Weekly,
    Monthly,
}

#[derive(Debug, Copy, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DayOfWeek {
    Monday,
    Tuesday,
    Wednesday,
    Thursday,
    Friday,
    Saturday,
    Sunday,
}

/// Replenishment schedule submitted from the checkout form.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScheduleReplenishmentForm {
    /// Interval in days (used by `Daily` recurrence).
    pub number_of_days: Option<u32>,
    /// Day of month (used by `Monthly` recurrence).
    pub nth_day_of_month: Option<u32>,
    pub recurrence_period: RecurrencePeriod,
    /// Days the order recurs on (used by `Weekly` recurrence).
    pub days_of_week: Vec<DayOfWeek>,
    pub replenishment_start_date: Option<DateTime<Utc>>,
}

impl ScheduleReplenishmentForm {
    pub fn daily(number_of_days: u32) -> Self {
        Self {
            number_of_days: Some(number_of_days),
            nth_day_of_month: None,
            recurrence_period: RecurrencePeriod::Daily,
            days_of_week: Vec::new(),
            replenishment_start_date: None,
        }
    }

    pub fn weekly(days_of_week: Vec<DayOfWeek>) -> Self {
        Self {
            number_of_days: None,
            nth_day_of_month: None,
            recurrence_period: RecurrencePeriod::Weekly,
            days_of_week,
            replenishment_start_date: None,
        }
    }

    /// Validate the schedule before submission.
    ///
    /// A weekly recurrence with no days selected would never trigger, so it is
    /// rejected here rather than at the backend boundary.
    pub fn validate(&self) -> DomainResult<()> {
        if self.recurrence_period == RecurrencePeriod::Weekly && self.days_of_week.is_empty() {
            return Err(DomainError::validation(
                "weekly replenishment requires at least one day of week",
            ));
        }
        if self.recurrence_period == RecurrencePeriod::Monthly && self.nth_day_of_month.is_none() {
            return Err(DomainError::validation(
                "monthly replenishment requires a day of month",
            ));
        }
        Ok(())
    }
}

impl ValueObject for ScheduleReplenishmentForm {}

/// A one-off order accepted by the backend.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Order {
    pub id: OrderId,
    pub cart_id: CartId,
    pub placed_at: DateTime<Utc>,
}

impl ValueObject for Order {}

/// A scheduled replenishment order accepted by the backend.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReplenishmentOrder {
    pub id: ReplenishmentOrderId,
    pub cart_id: CartId,
    pub schedule: ScheduleReplenishmentForm,
    pub active: bool,
    pub scheduled_at: DateTime<Utc>,
}

impl ValueObject for ReplenishmentOrder {}
