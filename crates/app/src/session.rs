//! Ordering session
//!
//! A [`Session`] owns one customer's cart, chosen pickup location, favorites and order history,
//! and reaches the outside world only through the collaborators in [`Services`].

use std::{
    fmt::{Debug, Formatter, Result as FmtResult},
    sync::Arc,
    time::Duration,
};

use moonbeam::{
    cart::{Cart, CartError, CartTotals, LineId},
    catalog::{Catalog, locations::Location},
    clock::Clock,
    customization::CustomizationRequest,
    orders::{
        CheckoutDetails, Order, OrderError, OrderHistory, OrderId, OrderStatus, StatusUpdate,
    },
    payment::{PaymentMethod, Tip},
    rewards::Rewards,
};
use rustc_hash::FxHashSet;
use tokio::time::timeout;
use tracing::{debug, error, info, warn};

use crate::{
    errors::SessionError,
    identity::IdentityProvider,
    loyalty::{LoyaltyError, LoyaltyLedger},
    payments::PaymentProcessor,
    persistence::OrderStore,
};

/// How long checkout waits for the payment processor by default.
pub const DEFAULT_PAYMENT_TIMEOUT: Duration = Duration::from_secs(10);

/// Collaborators a session talks to.
#[derive(Clone)]
pub struct Services {
    /// Time source
    pub clock: Arc<dyn Clock>,
    /// Who is signed in
    pub identity: Arc<dyn IdentityProvider>,
    /// Order and favorites storage
    pub orders: Arc<dyn OrderStore>,
    /// Payment processor
    pub payments: Arc<dyn PaymentProcessor>,
    /// Star balances
    pub loyalty: Arc<dyn LoyaltyLedger>,
}

impl Debug for Services {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        f.debug_struct("Services").finish_non_exhaustive()
    }
}

/// What the customer enters at checkout.
#[derive(Debug, Clone, PartialEq)]
pub struct CheckoutRequest {
    /// Gratuity
    pub tip: Tip,
    /// How to pay
    pub payment: PaymentMethod,
    /// Name called at pickup; defaults to the signed-in user's name
    pub pickup_name: Option<String>,
}

/// One customer's ordering state.
pub struct Session {
    catalog: Arc<Catalog>,
    services: Services,
    cart: Cart,
    location: Option<Location>,
    favorites: FxHashSet<String>,
    history: OrderHistory,
    payment_timeout: Duration,
}

impl Debug for Session {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        f.debug_struct("Session")
            .field("cart", &self.cart)
            .field("location", &self.location)
            .field("favorites", &self.favorites)
            .field("history", &self.history)
            .field("payment_timeout", &self.payment_timeout)
            .finish_non_exhaustive()
    }
}

impl Session {
    /// A fresh session with an empty cart priced from `catalog`.
    pub fn new(catalog: Arc<Catalog>, services: Services) -> Self {
        let cart = Cart::new(catalog.prices().clone());

        Self {
            catalog,
            services,
            cart,
            location: None,
            favorites: FxHashSet::default(),
            history: OrderHistory::new(),
            payment_timeout: DEFAULT_PAYMENT_TIMEOUT,
        }
    }

    /// Change how long checkout waits for payment.
    #[must_use]
    pub fn with_payment_timeout(mut self, payment_timeout: Duration) -> Self {
        self.payment_timeout = payment_timeout;
        self
    }

    /// The menu
    pub fn catalog(&self) -> &Catalog {
        &self.catalog
    }

    /// The cart
    pub fn cart(&self) -> &Cart {
        &self.cart
    }

    /// Cart subtotal, tax and total.
    ///
    /// # Errors
    ///
    /// Returns [`SessionError::Cart`] if the totals overflow.
    pub fn totals(&self) -> Result<CartTotals, SessionError> {
        self.cart
            .totals()
            .map_err(|err| logged(CartError::from(err)))
    }

    /// Chosen pickup location
    pub fn location(&self) -> Option<&Location> {
        self.location.as_ref()
    }

    /// Orders placed in this session, newest first.
    pub fn orders(&self) -> &OrderHistory {
        &self.history
    }

    /// Whether `item_id` is a favorite.
    pub fn is_favorite(&self, item_id: &str) -> bool {
        self.favorites.contains(item_id)
    }

    /// Choose where orders are picked up.
    ///
    /// # Errors
    ///
    /// Returns [`SessionError::UnknownLocation`] if the catalog has no such location.
    pub fn select_location(&mut self, location_id: &str) -> Result<&Location, SessionError> {
        let location = self
            .catalog
            .location(location_id)
            .ok_or_else(|| logged(SessionError::UnknownLocation(location_id.to_string())))?;

        info!(location = %location.id, "location selected");

        Ok(self.location.insert(location.clone()))
    }

    /// Add a customized item to the cart.
    ///
    /// # Errors
    ///
    /// - [`SessionError::UnknownItem`]: the catalog has no such item.
    /// - [`SessionError::Cart`]: see [`Cart::add`].
    pub fn add_to_cart(
        &mut self,
        item_id: &str,
        request: &CustomizationRequest,
        quantity: u32,
    ) -> Result<LineId, SessionError> {
        let item = self
            .catalog
            .item(item_id)
            .ok_or_else(|| logged(SessionError::UnknownItem(item_id.to_string())))?;

        let line = self.cart.add(item, request, quantity).map_err(logged)?;

        debug!(item = item_id, %line, quantity, "added to cart");

        Ok(line)
    }

    /// Remove a cart line. Absent lines are ignored.
    pub fn remove_from_cart(&mut self, line: LineId) {
        self.cart.remove(line);
    }

    /// Change a line's quantity; zero removes it.
    ///
    /// # Errors
    ///
    /// See [`Cart::update_quantity`].
    pub fn update_quantity(&mut self, line: LineId, quantity: u32) -> Result<(), SessionError> {
        self.cart
            .update_quantity(line, quantity)
            .map_err(logged)
    }

    /// Re-customize a cart line.
    ///
    /// # Errors
    ///
    /// See [`Cart::update_customization`].
    pub fn update_customization(
        &mut self,
        line: LineId,
        request: &CustomizationRequest,
    ) -> Result<(), SessionError> {
        self.cart
            .update_customization(line, request)
            .map_err(logged)
    }

    /// Empty the cart.
    pub fn clear_cart(&mut self) {
        self.cart.clear();
    }

    /// Place an order for the cart.
    ///
    /// The order is validated, paid for and saved, in that order. Only then is the cart cleared,
    /// the order added to the history and, for signed-in users, its stars credited. A failure at
    /// any step leaves the cart as it was; a payment authorized for an order that could not be
    /// saved is voided.
    ///
    /// # Errors
    ///
    /// - [`SessionError::Order`]: the cart is empty, no open location is chosen or the pickup
    ///   name is blank.
    /// - [`SessionError::PaymentFailure`]: the processor declined.
    /// - [`SessionError::PaymentTimeout`]: the processor did not answer in time.
    /// - [`SessionError::Persistence`]: the order could not be saved.
    pub async fn checkout(&mut self, request: CheckoutRequest) -> Result<&Order, SessionError> {
        let user = self.services.identity.current_user();

        let pickup_name = request
            .pickup_name
            .or_else(|| user.as_ref().map(|user| user.name.clone()))
            .unwrap_or_default();

        let details = CheckoutDetails {
            tip: request.tip,
            payment: request.payment,
            pickup_name,
            location: self.location.clone(),
        };

        let order = Order::place(&self.cart, details, self.services.clock.now()).map_err(logged)?;

        let authorization = timeout(
            self.payment_timeout,
            self.services
                .payments
                .authorize(order.payment(), order.total()),
        )
        .await
        .map_err(|_elapsed| logged(SessionError::PaymentTimeout(self.payment_timeout)))?
        .map_err(|err| logged(SessionError::PaymentFailure(err)))?;

        debug!(authorization = %authorization.id, "payment authorized");

        let user_id = user.as_ref().map(|user| user.id);

        if let Err(err) = self.services.orders.save_order(user_id, &order).await {
            if let Err(void) = self.services.payments.void(authorization).await {
                warn!(
                    authorization = %authorization.id,
                    error = %void,
                    "failed to void authorization"
                );
            }

            return Err(logged(err));
        }

        self.cart.clear();

        info!(
            order = %order.id(),
            total = %order.total(),
            location = %order.location().id,
            "order placed"
        );

        if let Some(user) = user {
            let stars = order.loyalty_stars();

            match self.services.loyalty.credit(user.id, stars).await {
                Ok(rewards) => {
                    info!(user = %user.id, stars, balance = rewards.stars(), "stars credited");
                }
                Err(err) => {
                    warn!(user = %user.id, stars, error = %err, "failed to credit stars");
                }
            }
        }

        let id = order.id();
        self.history.record(order);

        self.history
            .get(id)
            .ok_or_else(|| logged(OrderError::OrderNotFound(id)))
    }

    /// Move an order to `status`. The change is recorded first and only applied once recorded.
    ///
    /// # Errors
    ///
    /// - [`SessionError::Order`]: unknown order or a transition the order does not allow.
    /// - [`SessionError::Persistence`]: the change could not be recorded.
    pub async fn update_order_status(
        &mut self,
        id: OrderId,
        status: OrderStatus,
    ) -> Result<(), SessionError> {
        let now = self.services.clock.now();

        let current = self
            .history
            .get(id)
            .ok_or_else(|| logged(OrderError::OrderNotFound(id)))?
            .status();

        current.check_transition(status).map_err(logged)?;

        self.services
            .orders
            .append_status(id, StatusUpdate { status, at: now })
            .await
            .map_err(logged)?;

        self.history
            .update_status(id, status, now)
            .map_err(logged)?;

        info!(order = %id, %status, "order status updated");

        Ok(())
    }

    /// Cancel an active order.
    ///
    /// # Errors
    ///
    /// See [`Session::update_order_status`].
    pub async fn cancel_order(&mut self, id: OrderId) -> Result<(), SessionError> {
        self.update_order_status(id, OrderStatus::Cancelled).await
    }

    /// Apply every progression step that is due now and record each change.
    ///
    /// Each step is recorded before it is applied, so a step that fails to record stays due and
    /// is retried by the next call.
    ///
    /// # Errors
    ///
    /// - [`SessionError::Order`]: a progression time is out of range.
    /// - [`SessionError::Persistence`]: a change could not be recorded.
    pub async fn advance_orders(&mut self) -> Result<Vec<(OrderId, OrderStatus)>, SessionError> {
        let now = self.services.clock.now();
        let active: Vec<_> = self.history.active().map(Order::id).collect();
        let mut changes = Vec::new();

        for id in active {
            while let Some(update) = self.history.next_due(id, now).map_err(logged)? {
                self.services
                    .orders
                    .append_status(id, update)
                    .await
                    .map_err(logged)?;

                self.history
                    .update_status(id, update.status, update.at)
                    .map_err(logged)?;

                info!(order = %id, status = %update.status, "order advanced");
                changes.push((id, update.status));
            }
        }

        Ok(changes)
    }

    /// Whole minutes until an order should be ready; `None` once it is due or finished.
    pub fn remaining_minutes(&self, id: OrderId) -> Option<i64> {
        self.history
            .get(id)
            .and_then(|order| order.remaining_minutes(self.services.clock.now()))
    }

    /// Flip whether a menu item is a favorite and return the new state.
    ///
    /// # Errors
    ///
    /// - [`SessionError::UnknownItem`]: the catalog has no such item.
    /// - [`SessionError::NotSignedIn`]: favorites belong to signed-in users.
    /// - [`SessionError::Persistence`]: the change could not be recorded.
    pub async fn toggle_favorite(&mut self, item_id: &str) -> Result<bool, SessionError> {
        if self.catalog.item(item_id).is_none() {
            return Err(logged(SessionError::UnknownItem(item_id.to_string())));
        }

        let user = self
            .services
            .identity
            .current_user()
            .ok_or_else(|| logged(SessionError::NotSignedIn))?;

        let favorite = !self.favorites.contains(item_id);

        self.services
            .orders
            .set_favorite(user.id, item_id, favorite)
            .await
            .map_err(logged)?;

        if favorite {
            self.favorites.insert(item_id.to_string());
        } else {
            self.favorites.remove(item_id);
        }

        debug!(item = item_id, favorite, "favorite toggled");

        Ok(favorite)
    }

    /// The signed-in user's star balance; `None` for guests.
    ///
    /// # Errors
    ///
    /// Returns a [`LoyaltyError`] if the ledger cannot be read.
    pub async fn rewards(&self) -> Result<Option<Rewards>, LoyaltyError> {
        match self.services.identity.current_user() {
            Some(user) => Ok(Some(self.services.loyalty.balance(user.id).await?)),
            None => Ok(None),
        }
    }
}

/// Log a failed operation at a level matching its cause.
fn logged(err: impl Into<SessionError>) -> SessionError {
    let err = err.into();

    if err.is_internal() {
        error!(error = %err, "session operation failed");
    } else {
        warn!(error = %err, "session request rejected");
    }

    err
}
