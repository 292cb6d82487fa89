//! Status progression
//!
//! Orders do not advance on their own. A [`ProgressionPlan`] says when each automatic step is
//! due, and [`Order::advance_due`] applies the steps whose time has come.

use jiff::{SignedDuration, Timestamp};
use smallvec::SmallVec;

use crate::orders::{Order, OrderError, OrderStatus, StatusUpdate};

/// Delay between confirmation and preparation starting.
pub const PREPARING_AFTER: SignedDuration = SignedDuration::from_secs(3);

/// Seconds of each wait minute after which the order is marked ready (80% of the wait).
const READY_SECONDS_PER_WAIT_MINUTE: i64 = 48;

/// When an order's automatic steps are due.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ProgressionPlan {
    /// When preparation starts
    pub preparing_at: Timestamp,
    /// When the order is marked ready
    pub ready_at: Timestamp,
}

impl ProgressionPlan {
    /// The plan for an order created at `created_at` at a store with the given wait.
    ///
    /// # Errors
    ///
    /// Returns a [`jiff::Error`] if either time falls outside the supported range.
    pub fn new(created_at: Timestamp, wait_minutes: u16) -> Result<Self, jiff::Error> {
        let preparing_at = created_at.checked_add(PREPARING_AFTER)?;
        let ready_after =
            SignedDuration::from_secs(i64::from(wait_minutes) * READY_SECONDS_PER_WAIT_MINUTE);
        let ready_at = created_at.checked_add(ready_after)?.max(preparing_at);

        Ok(Self {
            preparing_at,
            ready_at,
        })
    }

    /// Steps due at `now`, in order.
    pub fn due(&self, now: Timestamp) -> SmallVec<[(OrderStatus, Timestamp); 2]> {
        [
            (OrderStatus::Preparing, self.preparing_at),
            (OrderStatus::Ready, self.ready_at),
        ]
        .into_iter()
        .filter(|(_, at)| *at <= now)
        .collect()
    }
}

impl Order {
    /// This order's progression plan.
    ///
    /// # Errors
    ///
    /// Returns [`OrderError::Time`] if a step falls outside the supported time range.
    pub fn progression_plan(&self) -> Result<ProgressionPlan, OrderError> {
        Ok(ProgressionPlan::new(
            self.created_at(),
            self.location().estimated_wait_minutes,
        )?)
    }

    /// The next planned step due at `now` that is ahead of the current status, without applying
    /// it.
    ///
    /// The step is stamped with its planned time, or the latest history time if that is later.
    /// Orders that are already ready, picked up or cancelled have no next step.
    ///
    /// # Errors
    ///
    /// Returns [`OrderError::Time`] if the plan cannot be computed.
    pub fn next_due(&self, now: Timestamp) -> Result<Option<StatusUpdate>, OrderError> {
        if !self.is_active() {
            return Ok(None);
        }

        let last = self.history().last().map(|update| update.at);

        Ok(self
            .progression_plan()?
            .due(now)
            .into_iter()
            .find(|(status, _)| *status > self.status())
            .map(|(status, planned)| StatusUpdate {
                status,
                at: last.map_or(planned, |last| planned.max(last)),
            }))
    }

    /// Apply every step [`next_due`](Self::next_due) reports, in order. Returns the statuses
    /// applied.
    ///
    /// # Errors
    ///
    /// Returns [`OrderError::Time`] if the plan cannot be computed.
    pub fn advance_due(
        &mut self,
        now: Timestamp,
    ) -> Result<SmallVec<[OrderStatus; 2]>, OrderError> {
        let mut applied = SmallVec::new();

        while let Some(update) = self.next_due(now)? {
            self.update_status(update.status, update.at)?;
            applied.push(update.status);
        }

        Ok(applied)
    }
}
