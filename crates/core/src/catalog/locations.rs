//! Pickup locations

use jiff::SignedDuration;
use serde::Deserialize;

/// A store orders can be picked up from.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct Location {
    /// Catalog key
    pub id: String,

    /// Store name
    pub name: String,

    /// Street address
    pub address: String,

    /// Distance from the customer, as shown on the store list (e.g. "0.3 mi")
    #[serde(default)]
    pub distance: Option<String>,

    /// Typical wait from order to pickup, in minutes
    pub estimated_wait_minutes: u16,

    /// Whether the store is taking orders
    #[serde(default = "open_by_default")]
    pub is_open: bool,

    /// Opening hours label (e.g. "6:00 AM - 9:00 PM")
    #[serde(default)]
    pub hours: String,
}

fn open_by_default() -> bool {
    true
}

impl Location {
    /// Estimated wait as a duration.
    pub fn estimated_wait(&self) -> SignedDuration {
        SignedDuration::from_mins(i64::from(self.estimated_wait_minutes))
    }
}
