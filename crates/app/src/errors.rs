//! Session errors

use std::time::Duration;

use moonbeam::{
    cart::CartError, customization::CustomizationError, orders::OrderError,
    pricing::PricingError,
};
use thiserror::Error;

use crate::{payments::PaymentProcessorError, persistence::PersistenceError};

/// Errors returned by [`Session`](crate::session::Session) operations.
#[derive(Debug, Error)]
pub enum SessionError {
    /// The catalog has no item with this id.
    #[error("unknown menu item: {0}")]
    UnknownItem(String),

    /// The catalog has no location with this id.
    #[error("unknown location: {0}")]
    UnknownLocation(String),

    /// The operation needs a signed-in user.
    #[error("sign in to use favorites")]
    NotSignedIn,

    /// Cart update rejected
    #[error(transparent)]
    Cart(#[from] CartError),

    /// Checkout or status change rejected
    #[error(transparent)]
    Order(#[from] OrderError),

    /// The payment processor refused the payment.
    #[error("payment failed")]
    PaymentFailure(#[source] PaymentProcessorError),

    /// The payment processor did not answer in time.
    #[error("payment timed out after {0:?}")]
    PaymentTimeout(Duration),

    /// The order store failed.
    #[error("failed to save")]
    Persistence(#[from] PersistenceError),
}

impl SessionError {
    /// A key missing from the catalog or price table. These point at bad catalog data rather
    /// than bad input.
    pub fn is_invalid_option(&self) -> bool {
        matches!(
            self,
            Self::Cart(
                CartError::Customization(CustomizationError::InvalidOption { .. })
                    | CartError::Pricing(PricingError::InvalidOption { .. })
            ) | Self::Order(OrderError::Pricing(PricingError::InvalidOption { .. }))
        )
    }

    /// Whether the error should be logged at error level rather than as a rejected request.
    pub fn is_internal(&self) -> bool {
        self.is_invalid_option() || matches!(self, Self::Persistence(_))
    }
}

#[cfg(test)]
mod tests {
    use moonbeam::catalog::options::OptionKind;

    use super::*;

    #[test]
    fn invalid_options_are_internal() {
        let pricing = SessionError::from(CartError::Pricing(PricingError::InvalidOption {
            kind: OptionKind::Syrup,
            key: "vanilla",
        }));

        let template = SessionError::from(CartError::Customization(
            CustomizationError::InvalidOption {
                kind: OptionKind::Size,
                key: "venti".to_string(),
            },
        ));

        assert!(pricing.is_invalid_option());
        assert!(template.is_internal());
    }

    #[test]
    fn user_mistakes_are_not_internal() {
        let empty = SessionError::from(OrderError::EmptyCartCheckout);
        let quantity = SessionError::from(CartError::InvalidQuantity);

        assert!(!empty.is_internal());
        assert!(!quantity.is_internal());
        assert!(!SessionError::PaymentTimeout(Duration::from_secs(10)).is_internal());
    }
}
