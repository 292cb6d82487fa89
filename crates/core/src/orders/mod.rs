//! Orders
//!
//! An [`Order`] is a snapshot of a cart taken at checkout. After creation only its status moves,
//! and every move is appended to its history.

use jiff::{SignedDuration, Timestamp};
use rusty_money::{Money, iso::Currency};
use smallvec::{SmallVec, smallvec};
use thiserror::Error;

use crate::{
    cart::{Cart, CartLine},
    catalog::locations::Location,
    ids::TypedUuid,
    payment::{PaymentError, PaymentMethod, Tip},
    pricing::PricingError,
    rewards::loyalty_points,
};

pub mod history;
pub mod schedule;
pub mod status;

pub use history::OrderHistory;
pub use schedule::ProgressionPlan;
pub use status::OrderStatus;

/// Identifies an order.
pub type OrderId = TypedUuid<Order>;

/// Errors raised when placing or updating orders.
#[derive(Debug, Error)]
pub enum OrderError {
    /// Checkout needs at least one cart line.
    #[error("cannot check out an empty cart")]
    EmptyCartCheckout,

    /// Checkout needs a pickup location.
    #[error("no pickup location selected")]
    MissingLocation,

    /// The pickup location is not taking orders.
    #[error("{0} is closed")]
    LocationClosed(String),

    /// Checkout needs a name to call out at pickup.
    #[error("pickup name cannot be blank")]
    MissingPickupName,

    /// The status would move backwards.
    #[error("cannot move order from {from} to {to}")]
    InvalidTransition {
        /// Current status
        from: OrderStatus,
        /// Requested status
        to: OrderStatus,
    },

    /// The order is picked up or cancelled.
    #[error("order is already {0}")]
    TerminalStatus(OrderStatus),

    /// No order with this id.
    #[error("no order with id {0}")]
    OrderNotFound(OrderId),

    /// The tip could not be resolved.
    #[error(transparent)]
    Payment(#[from] PaymentError),

    /// Totals could not be computed.
    #[error(transparent)]
    Pricing(#[from] PricingError),

    /// A timestamp fell outside the supported range.
    #[error(transparent)]
    Time(#[from] jiff::Error),
}

/// What the customer chose at checkout, besides the cart itself.
#[derive(Debug, Clone, PartialEq)]
pub struct CheckoutDetails {
    /// Gratuity
    pub tip: Tip,
    /// How the order is paid for
    pub payment: PaymentMethod,
    /// Name called out at pickup
    pub pickup_name: String,
    /// Where the order is picked up
    pub location: Option<Location>,
}

/// One recorded status change.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StatusUpdate {
    /// New status
    pub status: OrderStatus,
    /// When it was applied
    pub at: Timestamp,
}

/// A placed order.
#[derive(Debug, Clone, PartialEq)]
pub struct Order {
    id: OrderId,
    lines: Vec<CartLine>,
    subtotal: Money<'static, Currency>,
    tax: Money<'static, Currency>,
    tip: Money<'static, Currency>,
    total: Money<'static, Currency>,
    location: Location,
    status: OrderStatus,
    history: SmallVec<[StatusUpdate; 6]>,
    created_at: Timestamp,
    estimated_ready_at: Timestamp,
    pickup_name: String,
    payment: PaymentMethod,
}

impl Order {
    /// Snapshot `cart` into a confirmed order. The cart itself is not changed.
    ///
    /// Totals are taken from the cart as it is at `now`. The history starts with `pending` and
    /// `confirmed`, both at `now`, and the order is expected ready after the location's wait.
    ///
    /// # Errors
    ///
    /// - [`OrderError::EmptyCartCheckout`]: the cart has no lines.
    /// - [`OrderError::MissingLocation`]: no location was chosen.
    /// - [`OrderError::LocationClosed`]: the location is not taking orders.
    /// - [`OrderError::MissingPickupName`]: the pickup name is blank.
    /// - [`OrderError::Payment`]: the tip is negative or in another currency.
    /// - [`OrderError::Pricing`]: totals cannot be computed.
    pub fn place(
        cart: &Cart,
        details: CheckoutDetails,
        now: Timestamp,
    ) -> Result<Self, OrderError> {
        if cart.is_empty() {
            return Err(OrderError::EmptyCartCheckout);
        }

        let location = details.location.ok_or(OrderError::MissingLocation)?;

        if !location.is_open {
            return Err(OrderError::LocationClosed(location.name));
        }

        let pickup_name = details.pickup_name.trim();

        if pickup_name.is_empty() {
            return Err(OrderError::MissingPickupName);
        }

        let totals = cart.totals()?;
        let tip = details.tip.amount(totals.subtotal)?;
        let total = totals.total.add(tip).map_err(PricingError::from)?;

        let estimated_ready_at = now.checked_add(location.estimated_wait())?;

        Ok(Self {
            id: OrderId::generate(),
            lines: cart.lines().to_vec(),
            subtotal: totals.subtotal,
            tax: totals.tax,
            tip,
            total,
            location,
            status: OrderStatus::Confirmed,
            history: smallvec![
                StatusUpdate {
                    status: OrderStatus::Pending,
                    at: now,
                },
                StatusUpdate {
                    status: OrderStatus::Confirmed,
                    at: now,
                },
            ],
            created_at: now,
            estimated_ready_at,
            pickup_name: pickup_name.to_string(),
            payment: details.payment,
        })
    }

    /// Order id
    pub fn id(&self) -> OrderId {
        self.id
    }

    /// Lines as they were at checkout
    pub fn lines(&self) -> &[CartLine] {
        &self.lines
    }

    /// Σ line totals
    pub fn subtotal(&self) -> Money<'static, Currency> {
        self.subtotal
    }

    /// Sales tax
    pub fn tax(&self) -> Money<'static, Currency> {
        self.tax
    }

    /// Gratuity
    pub fn tip(&self) -> Money<'static, Currency> {
        self.tip
    }

    /// Subtotal plus tax plus tip
    pub fn total(&self) -> Money<'static, Currency> {
        self.total
    }

    /// Pickup location
    pub fn location(&self) -> &Location {
        &self.location
    }

    /// Current status
    pub fn status(&self) -> OrderStatus {
        self.status
    }

    /// Every status change, oldest first
    pub fn history(&self) -> &[StatusUpdate] {
        &self.history
    }

    /// When the order was placed
    pub fn created_at(&self) -> Timestamp {
        self.created_at
    }

    /// When the order should be ready
    pub fn estimated_ready_at(&self) -> Timestamp {
        self.estimated_ready_at
    }

    /// Name called out at pickup
    pub fn pickup_name(&self) -> &str {
        &self.pickup_name
    }

    /// How the order was paid for
    pub fn payment(&self) -> &PaymentMethod {
        &self.payment
    }

    /// Whether the order belongs in the active view.
    pub fn is_active(&self) -> bool {
        self.status.is_active()
    }

    /// Stars this order earns.
    pub fn loyalty_stars(&self) -> u32 {
        loyalty_points(&self.total)
    }

    /// Move to `status` at `at`, appending to the history.
    ///
    /// # Errors
    ///
    /// See [`OrderStatus::check_transition`].
    pub fn update_status(&mut self, status: OrderStatus, at: Timestamp) -> Result<(), OrderError> {
        self.status.check_transition(status)?;

        self.status = status;
        self.history.push(StatusUpdate { status, at });

        Ok(())
    }

    /// Whole minutes until the estimated ready time, rounded up.
    ///
    /// `None` once that time has passed, or when the order is ready, picked up or cancelled.
    pub fn remaining_minutes(&self, now: Timestamp) -> Option<i64> {
        if !self.is_active() || self.status == OrderStatus::Ready {
            return None;
        }

        let remaining = self.estimated_ready_at.duration_since(now);

        if remaining <= SignedDuration::ZERO {
            return None;
        }

        let seconds = remaining.as_secs();
        let minutes = seconds / 60;

        if seconds % 60 == 0 && remaining.subsec_nanos() == 0 {
            Some(minutes)
        } else {
            Some(minutes + 1)
        }
    }
}

#[cfg(test)]
mod tests {
    use rusty_money::iso::USD;
    use testresult::TestResult;

    use crate::{
        catalog::{
            CatalogError,
            items::{Category, MenuItem},
            options::{Size, Temperature},
        },
        customization::CustomizationRequest,
        pricing::PriceTable,
    };

    use super::*;

    fn location(wait: u16) -> Location {
        Location {
            id: "harbor".to_string(),
            name: "Harbor Street".to_string(),
            address: "12 Harbor St".to_string(),
            distance: None,
            estimated_wait_minutes: wait,
            is_open: true,
            hours: String::new(),
        }
    }

    fn details() -> CheckoutDetails {
        CheckoutDetails {
            tip: Tip::None,
            payment: PaymentMethod::apple_pay(),
            pickup_name: "Ada".to_string(),
            location: Some(location(10)),
        }
    }

    fn tea() -> Result<MenuItem, CatalogError> {
        MenuItem::builder("tea", "Earl Grey", Category::Tea, Money::from_minor(300, USD))
            .sizes([Size::Tall])
            .temperatures([Temperature::Hot])
            .build()
    }

    fn cart_with_tea() -> Result<Cart, Box<dyn std::error::Error>> {
        let mut cart = Cart::new(PriceTable::standard());
        cart.add(&tea()?, &CustomizationRequest::default(), 2)?;
        Ok(cart)
    }

    fn now() -> Result<Timestamp, jiff::Error> {
        "2026-03-01T08:00:00Z".parse()
    }

    #[test]
    fn place_seeds_pending_then_confirmed() -> TestResult {
        let cart = cart_with_tea()?;
        let now = now()?;

        let order = Order::place(&cart, details(), now)?;

        assert_eq!(order.status(), OrderStatus::Confirmed);
        assert_eq!(
            order.history(),
            [
                StatusUpdate {
                    status: OrderStatus::Pending,
                    at: now
                },
                StatusUpdate {
                    status: OrderStatus::Confirmed,
                    at: now
                },
            ]
        );
        assert_eq!(order.estimated_ready_at(), "2026-03-01T08:10:00Z".parse::<Timestamp>()?);
        assert_eq!(order.subtotal(), Money::from_minor(600, USD));
        assert_eq!(order.tax(), Money::from_minor(53, USD));
        assert_eq!(order.total(), Money::from_minor(653, USD));
        assert_eq!(order.lines().len(), 1);
        assert_eq!(cart.len(), 1);

        Ok(())
    }

    #[test]
    fn tip_is_added_to_total() -> TestResult {
        let cart = cart_with_tea()?;

        let order = Order::place(
            &cart,
            CheckoutDetails {
                tip: Tip::percent(20),
                ..details()
            },
            now()?,
        )?;

        assert_eq!(order.tip(), Money::from_minor(120, USD));
        assert_eq!(order.total(), Money::from_minor(773, USD));
        assert_eq!(order.loyalty_stars(), 15);

        Ok(())
    }

    #[test]
    fn empty_cart_cannot_check_out() -> TestResult {
        let cart = Cart::new(PriceTable::standard());

        let result = Order::place(&cart, details(), now()?);

        assert!(matches!(result, Err(OrderError::EmptyCartCheckout)));

        Ok(())
    }

    #[test]
    fn checkout_preconditions() -> TestResult {
        let cart = cart_with_tea()?;

        let no_location = Order::place(
            &cart,
            CheckoutDetails {
                location: None,
                ..details()
            },
            now()?,
        );

        let closed = Order::place(
            &cart,
            CheckoutDetails {
                location: Some(Location {
                    is_open: false,
                    ..location(10)
                }),
                ..details()
            },
            now()?,
        );

        let blank_name = Order::place(
            &cart,
            CheckoutDetails {
                pickup_name: "   ".to_string(),
                ..details()
            },
            now()?,
        );

        assert!(matches!(no_location, Err(OrderError::MissingLocation)));
        assert!(matches!(closed, Err(OrderError::LocationClosed(_))));
        assert!(matches!(blank_name, Err(OrderError::MissingPickupName)));

        Ok(())
    }

    #[test]
    fn status_updates_append_history() -> TestResult {
        let cart = cart_with_tea()?;
        let now = now()?;
        let mut order = Order::place(&cart, details(), now)?;

        order.update_status(OrderStatus::Preparing, now)?;
        order.update_status(OrderStatus::Preparing, now)?;

        let statuses: Vec<_> = order.history().iter().map(|u| u.status).collect();
        assert_eq!(
            statuses,
            [
                OrderStatus::Pending,
                OrderStatus::Confirmed,
                OrderStatus::Preparing,
                OrderStatus::Preparing
            ]
        );

        let result = order.update_status(OrderStatus::Confirmed, now);
        assert!(matches!(result, Err(OrderError::InvalidTransition { .. })));
        assert_eq!(order.history().len(), 4);

        Ok(())
    }

    #[test]
    fn remaining_minutes_round_up_and_stop_at_ready() -> TestResult {
        let cart = cart_with_tea()?;
        let now = now()?;
        let mut order = Order::place(&cart, details(), now)?;

        assert_eq!(order.remaining_minutes(now), Some(10));
        assert_eq!(
            order.remaining_minutes(now.checked_add(SignedDuration::from_secs(61))?),
            Some(9)
        );
        assert_eq!(
            order.remaining_minutes(now.checked_add(SignedDuration::from_mins(11))?),
            None
        );

        order.update_status(OrderStatus::Ready, now)?;
        assert_eq!(order.remaining_minutes(now), None);

        Ok(())
    }
}
