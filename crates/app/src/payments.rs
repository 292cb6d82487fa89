//! Payment processing

use std::time::Duration;

use async_trait::async_trait;
use mockall::automock;
use moonbeam::{
    ids::TypedUuid,
    payment::{PaymentKind, PaymentMethod},
};
use rusty_money::{Money, iso::Currency};
use thiserror::Error;
use tracing::debug;

/// Authorization identifier
pub type AuthorizationId = TypedUuid<Authorization>;

/// Reasons a payment is not authorized.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PaymentProcessorError {
    /// The stored-value card does not hold enough to cover the amount.
    #[error("insufficient balance: {available} available, {required} required")]
    InsufficientBalance {
        /// Balance on the card
        available: String,
        /// Amount requested
        required: String,
    },

    /// The amount is in a different currency from the stored balance.
    #[error("cannot pay {required} from a {available} balance")]
    CurrencyMismatch {
        /// Balance currency
        available: &'static str,
        /// Amount currency
        required: &'static str,
    },

    /// The processor refused the payment.
    #[error("payment declined: {0}")]
    Declined(String),
}

/// An approved payment.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Authorization {
    /// Processor reference
    pub id: AuthorizationId,

    /// Amount authorized
    pub amount: Money<'static, Currency>,
}

/// Takes payment for an order total.
#[automock]
#[async_trait]
pub trait PaymentProcessor: Send + Sync {
    /// Authorize `amount` against `method`.
    async fn authorize(
        &self,
        method: &PaymentMethod,
        amount: Money<'static, Currency>,
    ) -> Result<Authorization, PaymentProcessorError>;

    /// Release an authorization that will not be captured.
    async fn void(&self, authorization: Authorization) -> Result<(), PaymentProcessorError>;
}

/// Approves every payment after a fixed delay. Moonbeam cards with a known balance must cover
/// the amount.
#[derive(Debug, Clone, Copy)]
pub struct SimulatedPaymentProcessor {
    delay: Duration,
}

impl SimulatedPaymentProcessor {
    /// A processor that answers after `delay`.
    pub fn new(delay: Duration) -> Self {
        Self { delay }
    }
}

#[async_trait]
impl PaymentProcessor for SimulatedPaymentProcessor {
    async fn authorize(
        &self,
        method: &PaymentMethod,
        amount: Money<'static, Currency>,
    ) -> Result<Authorization, PaymentProcessorError> {
        debug!(
            method = %method,
            amount = %amount,
            delay_ms = self.delay.as_millis(),
            "authorizing payment"
        );

        tokio::time::sleep(self.delay).await;

        if let (PaymentKind::MoonbeamCard, Some(balance)) = (method.kind(), method.balance()) {
            if balance.currency() != amount.currency() {
                return Err(PaymentProcessorError::CurrencyMismatch {
                    available: balance.currency().iso_alpha_code,
                    required: amount.currency().iso_alpha_code,
                });
            }

            if balance.to_minor_units() < amount.to_minor_units() {
                return Err(PaymentProcessorError::InsufficientBalance {
                    available: balance.to_string(),
                    required: amount.to_string(),
                });
            }
        }

        Ok(Authorization {
            id: AuthorizationId::generate(),
            amount,
        })
    }

    async fn void(&self, authorization: Authorization) -> Result<(), PaymentProcessorError> {
        debug!(
            authorization = %authorization.id,
            amount = %authorization.amount,
            "voiding authorization"
        );

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use rusty_money::iso::USD;
    use testresult::TestResult;

    use super::*;

    #[tokio::test(start_paused = true)]
    async fn approves_after_the_delay() -> TestResult {
        let processor = SimulatedPaymentProcessor::new(Duration::from_millis(1500));
        let start = tokio::time::Instant::now();

        let authorization = processor
            .authorize(&PaymentMethod::apple_pay(), Money::from_minor(1463, USD))
            .await?;

        assert_eq!(authorization.amount, Money::from_minor(1463, USD));
        assert!(start.elapsed() >= Duration::from_millis(1500));

        Ok(())
    }

    #[tokio::test(start_paused = true)]
    async fn moonbeam_card_must_cover_the_total() {
        let processor = SimulatedPaymentProcessor::new(Duration::ZERO);
        let card = PaymentMethod::moonbeam_card(Money::from_minor(1000, USD));

        let result = processor
            .authorize(&card, Money::from_minor(1463, USD))
            .await;

        assert!(matches!(
            result,
            Err(PaymentProcessorError::InsufficientBalance { .. })
        ));

        let covered = processor.authorize(&card, Money::from_minor(999, USD)).await;

        assert!(covered.is_ok());
    }
}
