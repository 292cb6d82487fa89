//! Order status

use std::fmt::{Display, Formatter, Result as FmtResult};

use serde::{Deserialize, Serialize};

use crate::orders::OrderError;

/// Where an order is in its lifecycle.
///
/// Statuses move forward through `pending → confirmed → preparing → ready → picked-up`.
/// `cancelled` can be reached from any status that is not terminal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum OrderStatus {
    /// Received, payment not yet confirmed
    Pending,
    /// Paid and queued
    Confirmed,
    /// Being made
    Preparing,
    /// Waiting at the counter
    Ready,
    /// Collected
    PickedUp,
    /// Cancelled
    Cancelled,
}

impl OrderStatus {
    /// Steps shown on the order tracker, in order.
    pub const TRACKER_STEPS: [Self; 4] = [
        Self::Confirmed,
        Self::Preparing,
        Self::Ready,
        Self::PickedUp,
    ];

    /// No further status changes are accepted.
    pub const fn is_terminal(self) -> bool {
        matches!(self, Self::PickedUp | Self::Cancelled)
    }

    /// The order still belongs in the active view.
    pub const fn is_active(self) -> bool {
        !self.is_terminal()
    }

    /// Position on the order tracker; `None` for pending and cancelled.
    pub fn tracker_step(self) -> Option<usize> {
        Self::TRACKER_STEPS.iter().position(|step| *step == self)
    }

    /// Tracker label
    pub const fn label(self) -> &'static str {
        match self {
            Self::Pending => "Pending",
            Self::Confirmed => "Order Confirmed",
            Self::Preparing => "Preparing",
            Self::Ready => "Ready for Pickup",
            Self::PickedUp => "Picked Up",
            Self::Cancelled => "Cancelled",
        }
    }

    /// Check that moving from `self` to `next` is allowed.
    ///
    /// Re-applying the current status is accepted. Otherwise the move must be strictly forward,
    /// or to cancelled.
    ///
    /// # Errors
    ///
    /// - [`OrderError::TerminalStatus`]: `self` is picked-up or cancelled.
    /// - [`OrderError::InvalidTransition`]: `next` is behind `self`.
    pub fn check_transition(self, next: Self) -> Result<(), OrderError> {
        if self.is_terminal() {
            return Err(OrderError::TerminalStatus(self));
        }

        if next == self || next == Self::Cancelled || next > self {
            return Ok(());
        }

        Err(OrderError::InvalidTransition {
            from: self,
            to: next,
        })
    }

    /// Stable key
    pub const fn key(self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::Confirmed => "confirmed",
            Self::Preparing => "preparing",
            Self::Ready => "ready",
            Self::PickedUp => "picked-up",
            Self::Cancelled => "cancelled",
        }
    }
}

impl Display for OrderStatus {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        f.write_str(self.key())
    }
}
