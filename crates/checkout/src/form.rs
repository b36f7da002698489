//! Replenishment schedule form state.

use tokio::sync::watch;

use storefront_core::ScheduleReplenishmentForm;

/// Holds the schedule form data while the shopper walks through checkout.
///
/// The default schedule (every 14 days) mirrors what the form renders before
/// the shopper edits anything; [`reset`](ReplenishmentFormStore::reset)
/// returns to it after a successful submission.
#[derive(Debug)]
pub struct ReplenishmentFormStore {
    form: watch::Sender<ScheduleReplenishmentForm>,
}

impl ReplenishmentFormStore {
    pub fn new() -> Self {
        let (form, _) = watch::channel(Self::default_form());
        Self { form }
    }

    pub fn default_form() -> ScheduleReplenishmentForm {
        ScheduleReplenishmentForm::daily(14)
    }

    pub fn set(&self, form: ScheduleReplenishmentForm) {
        self.form.send_replace(form);
    }

    pub fn current(&self) -> ScheduleReplenishmentForm {
        self.form.borrow().clone()
    }

    pub fn watch(&self) -> watch::Receiver<ScheduleReplenishmentForm> {
        self.form.subscribe()
    }

    pub fn reset(&self) {
        self.form.send_replace(Self::default_form());
    }
}

impl Default for ReplenishmentFormStore {
    fn default() -> Self {
        Self::new()
    }
}
