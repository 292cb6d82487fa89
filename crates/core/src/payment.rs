//! Payment methods and tips

use std::fmt::{Display, Formatter, Result as FmtResult};

use decimal_percentage::Percentage;
use rust_decimal::Decimal;
use rusty_money::{Money, iso::Currency};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::{
    ids::TypedUuid,
    pricing::{PricingError, percent_of_minor},
};

/// Identifies a saved payment method.
pub type PaymentMethodId = TypedUuid<PaymentMethod>;

/// Tip percentages offered at checkout.
pub const TIP_PRESETS: [u8; 5] = [0, 10, 15, 20, 25];

/// Payment method and tip errors
#[derive(Debug, Error, PartialEq)]
pub enum PaymentError {
    /// Card numbers are 12 to 19 digits, optionally grouped with spaces or dashes.
    #[error("invalid card number")]
    InvalidCardNumber,

    /// Tips cannot be negative.
    #[error("tip cannot be negative")]
    NegativeTip,

    /// A fixed tip in a different currency from the order.
    #[error("tip is in {actual}, order is in {expected}")]
    CurrencyMismatch {
        /// Order currency
        expected: &'static str,
        /// Tip currency
        actual: &'static str,
    },

    /// Wrapped pricing error.
    #[error(transparent)]
    Pricing(#[from] PricingError),
}

/// How an order is paid for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum PaymentKind {
    /// Credit or debit card
    Card,
    /// Stored-value house card
    MoonbeamCard,
    /// Apple Pay
    ApplePay,
    /// Google Pay
    GooglePay,
}

impl Display for PaymentKind {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        f.write_str(match self {
            Self::Card => "Card",
            Self::MoonbeamCard => "Moonbeam Card",
            Self::ApplePay => "Apple Pay",
            Self::GooglePay => "Google Pay",
        })
    }
}

/// Card network, detected from the leading digits.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum CardBrand {
    /// Starts with 4
    Visa,
    /// Starts with 51 to 55
    Mastercard,
    /// Starts with 34 or 37
    Amex,
    /// Starts with 6011 or 65
    Discover,
    /// Anything else
    Other,
}

impl Display for CardBrand {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        f.write_str(match self {
            Self::Visa => "Visa",
            Self::Mastercard => "Mastercard",
            Self::Amex => "Amex",
            Self::Discover => "Discover",
            Self::Other => "Card",
        })
    }
}

/// Detect the card network from a card number. Spaces and dashes are ignored.
pub fn detect_card_brand(number: &str) -> CardBrand {
    let digits: String = number
        .chars()
        .filter(|c| !matches!(c, ' ' | '-'))
        .collect();

    if digits.starts_with('4') {
        return CardBrand::Visa;
    }

    if ["51", "52", "53", "54", "55"]
        .iter()
        .any(|prefix| digits.starts_with(prefix))
    {
        return CardBrand::Mastercard;
    }

    if digits.starts_with("34") || digits.starts_with("37") {
        return CardBrand::Amex;
    }

    if digits.starts_with("6011") || digits.starts_with("65") {
        return CardBrand::Discover;
    }

    CardBrand::Other
}

/// A saved way to pay.
#[derive(Debug, Clone, PartialEq)]
pub struct PaymentMethod {
    id: PaymentMethodId,
    kind: PaymentKind,
    last_four: Option<String>,
    brand: Option<CardBrand>,
    balance: Option<Money<'static, Currency>>,
    is_default: bool,
}

impl PaymentMethod {
    /// A card, keeping only the brand and last four digits of `number`.
    ///
    /// # Errors
    ///
    /// Returns [`PaymentError::InvalidCardNumber`] unless `number` is 12 to 19 digits once
    /// spaces and dashes are removed.
    pub fn card(number: &str) -> Result<Self, PaymentError> {
        let digits: String = number
            .chars()
            .filter(|c| !matches!(c, ' ' | '-'))
            .collect();

        if !(12..=19).contains(&digits.len()) || !digits.chars().all(|c| c.is_ascii_digit()) {
            return Err(PaymentError::InvalidCardNumber);
        }

        let last_four: String = digits.chars().skip(digits.len() - 4).collect();

        Ok(Self {
            brand: Some(detect_card_brand(&digits)),
            last_four: Some(last_four),
            ..Self::of_kind(PaymentKind::Card)
        })
    }

    /// A stored-value house card with its current balance.
    pub fn moonbeam_card(balance: Money<'static, Currency>) -> Self {
        Self {
            balance: Some(balance),
            ..Self::of_kind(PaymentKind::MoonbeamCard)
        }
    }

    /// Apple Pay
    pub fn apple_pay() -> Self {
        Self::of_kind(PaymentKind::ApplePay)
    }

    /// Google Pay
    pub fn google_pay() -> Self {
        Self::of_kind(PaymentKind::GooglePay)
    }

    fn of_kind(kind: PaymentKind) -> Self {
        Self {
            id: PaymentMethodId::generate(),
            kind,
            last_four: None,
            brand: None,
            balance: None,
            is_default: false,
        }
    }

    /// Mark as the default method.
    #[must_use]
    pub fn with_default(mut self, is_default: bool) -> Self {
        self.is_default = is_default;
        self
    }

    /// Replace the stored-value balance.
    #[must_use]
    pub fn with_balance(mut self, balance: Money<'static, Currency>) -> Self {
        self.balance = Some(balance);
        self
    }

    /// Method id
    pub fn id(&self) -> PaymentMethodId {
        self.id
    }

    /// Kind of method
    pub fn kind(&self) -> PaymentKind {
        self.kind
    }

    /// Last four card digits
    pub fn last_four(&self) -> Option<&str> {
        self.last_four.as_deref()
    }

    /// Card network
    pub fn brand(&self) -> Option<CardBrand> {
        self.brand
    }

    /// Stored-value balance
    pub fn balance(&self) -> Option<Money<'static, Currency>> {
        self.balance
    }

    /// Whether this is the default method
    pub fn is_default(&self) -> bool {
        self.is_default
    }
}

impl Display for PaymentMethod {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        match (&self.brand, &self.last_four) {
            (Some(brand), Some(last_four)) => write!(f, "{brand} ending in {last_four}"),
            _ => write!(f, "{}", self.kind),
        }
    }
}

/// Gratuity added at checkout.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub enum Tip {
    /// No tip
    #[default]
    None,
    /// A fixed amount
    Amount(Money<'static, Currency>),
    /// A share of the subtotal
    Percent(Percentage),
}

impl Tip {
    /// A whole-number percentage of the subtotal, such as one of [`TIP_PRESETS`].
    pub fn percent(percent: u8) -> Self {
        Self::Percent(Percentage::from(Decimal::new(i64::from(percent), 2)))
    }

    /// Resolve the tip against an order subtotal, rounding percentages to whole minor units.
    ///
    /// # Errors
    ///
    /// - [`PaymentError::NegativeTip`]: the tip is below zero.
    /// - [`PaymentError::CurrencyMismatch`]: a fixed tip is in a different currency.
    /// - [`PaymentError::Pricing`]: the percentage cannot be represented.
    pub fn amount(
        &self,
        subtotal: Money<'static, Currency>,
    ) -> Result<Money<'static, Currency>, PaymentError> {
        let currency = subtotal.currency();

        let minor = match self {
            Self::None => 0,
            Self::Amount(amount) => {
                if amount.currency() != currency {
                    return Err(PaymentError::CurrencyMismatch {
                        expected: currency.iso_alpha_code,
                        actual: amount.currency().iso_alpha_code,
                    });
                }

                amount.to_minor_units()
            }
            Self::Percent(percent) => percent_of_minor(percent, subtotal.to_minor_units())?,
        };

        if minor < 0 {
            return Err(PaymentError::NegativeTip);
        }

        Ok(Money::from_minor(minor, currency))
    }
}
