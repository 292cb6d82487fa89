//! Pricing
//!
//! Drink prices are the item's base price plus additive surcharges looked up in a [`PriceTable`].
//! Surcharges are summed as exact decimals of minor units; the only rounding is the final
//! conversion to whole minor units, half away from zero.

use decimal_percentage::Percentage;
use rust_decimal::{Decimal, RoundingStrategy, prelude::ToPrimitive};
use rustc_hash::FxHashMap;
use rusty_money::{
    Money, MoneyError,
    iso::{self, Currency},
};
use thiserror::Error;

use crate::{
    catalog::options::{
        MilkType, OptionKind, Size, SweetenerType, SyrupFlavor, Topping, ToppingAmount,
    },
    customization::DrinkCustomization,
};

/// Pumps of the first syrup flavor that come with the drink at no charge.
pub const INCLUDED_SYRUP_PUMPS: u8 = 4;

/// Errors raised while pricing.
#[derive(Debug, Error, PartialEq)]
pub enum PricingError {
    /// The customization uses a key the price table has no entry for.
    #[error("no {kind} price for {key}")]
    InvalidOption {
        /// Option family
        kind: OptionKind,
        /// Missing key
        key: &'static str,
    },

    /// Amounts in different currencies were combined.
    #[error("currency mismatch: expected {expected}, found {actual}")]
    CurrencyMismatch {
        /// Currency of the price table
        expected: &'static str,
        /// Currency of the other amount
        actual: &'static str,
    },

    /// A computed amount was below zero.
    #[error("price cannot be negative: {0} minor units")]
    Negative(i64),

    /// Arithmetic overflowed or a value could not be represented.
    #[error("price arithmetic overflowed")]
    Overflow,

    /// Wrapped money arithmetic or currency mismatch error.
    #[error(transparent)]
    Money(#[from] MoneyError),
}

/// Surcharges, in minor units of a single currency.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PriceTable {
    currency: &'static Currency,
    sizes: FxHashMap<Size, i64>,
    milks: FxHashMap<MilkType, i64>,
    extra_shot: i64,
    syrups: FxHashMap<SyrupFlavor, i64>,
    toppings: FxHashMap<Topping, i64>,
    sweeteners: FxHashMap<SweetenerType, i64>,
}

impl PriceTable {
    /// An empty table. Every lookup fails until surcharges are added.
    pub fn new(currency: &'static Currency) -> Self {
        Self {
            currency,
            sizes: FxHashMap::default(),
            milks: FxHashMap::default(),
            extra_shot: 0,
            syrups: FxHashMap::default(),
            toppings: FxHashMap::default(),
            sweeteners: FxHashMap::default(),
        }
    }

    /// The house price list, in US dollars.
    pub fn standard() -> Self {
        let mut table = Self::new(iso::USD).with_extra_shot(90);

        for (size, minor) in [(Size::Tall, 0), (Size::Grande, 50), (Size::Venti, 100)] {
            table = table.with_size(size, minor);
        }

        for milk in MilkType::ALL {
            let minor = match milk {
                MilkType::Whole | MilkType::Skim | MilkType::TwoPercent => 0,
                MilkType::Oat | MilkType::Almond | MilkType::Soy | MilkType::Coconut => 80,
                MilkType::OatmilkFoam => 100,
            };

            table = table.with_milk(*milk, minor);
        }

        for flavor in SyrupFlavor::ALL {
            let minor = match flavor {
                SyrupFlavor::BrownSugar | SyrupFlavor::Lavender => 70,
                SyrupFlavor::Pistachio => 80,
                _ => 60,
            };

            table = table.with_syrup(*flavor, minor);
        }

        for topping in Topping::ALL {
            let minor = match topping {
                Topping::WhippedCream | Topping::CinnamonPowder | Topping::VanillaPowder => 0,
                Topping::CaramelDrizzle | Topping::MochaDrizzle => 60,
                Topping::ColdFoam => 125,
                Topping::SaltedCreamFoam => 150,
                Topping::ChocolateCurls => 50,
                Topping::CookieCrumbles => 75,
            };

            table = table.with_topping(*topping, minor);
        }

        for sweetener in SweetenerType::ALL {
            let minor = match sweetener {
                SweetenerType::Honey => 30,
                _ => 0,
            };

            table = table.with_sweetener(*sweetener, minor);
        }

        table
    }

    /// Currency every surcharge is in.
    pub fn currency(&self) -> &'static Currency {
        self.currency
    }

    /// Set a size surcharge.
    #[must_use]
    pub fn with_size(mut self, size: Size, minor: i64) -> Self {
        self.sizes.insert(size, minor);
        self
    }

    /// Set a milk surcharge.
    #[must_use]
    pub fn with_milk(mut self, milk: MilkType, minor: i64) -> Self {
        self.milks.insert(milk, minor);
        self
    }

    /// Set the price of one extra espresso shot.
    #[must_use]
    pub fn with_extra_shot(mut self, minor: i64) -> Self {
        self.extra_shot = minor;
        self
    }

    /// Set a syrup's per-flavor price.
    #[must_use]
    pub fn with_syrup(mut self, flavor: SyrupFlavor, minor: i64) -> Self {
        self.syrups.insert(flavor, minor);
        self
    }

    /// Set a topping surcharge.
    #[must_use]
    pub fn with_topping(mut self, topping: Topping, minor: i64) -> Self {
        self.toppings.insert(topping, minor);
        self
    }

    /// Set a sweetener's per-packet price.
    #[must_use]
    pub fn with_sweetener(mut self, sweetener: SweetenerType, minor: i64) -> Self {
        self.sweeteners.insert(sweetener, minor);
        self
    }

    /// Size surcharge, in minor units.
    ///
    /// # Errors
    ///
    /// Returns [`PricingError::InvalidOption`] if the table has no entry for `size`.
    pub fn size(&self, size: Size) -> Result<i64, PricingError> {
        lookup(&self.sizes, size, OptionKind::Size, size.key())
    }

    /// Milk surcharge, in minor units.
    ///
    /// # Errors
    ///
    /// Returns [`PricingError::InvalidOption`] if the table has no entry for `milk`.
    pub fn milk(&self, milk: MilkType) -> Result<i64, PricingError> {
        lookup(&self.milks, milk, OptionKind::Milk, milk.key())
    }

    /// Price of one extra shot, in minor units.
    pub fn extra_shot(&self) -> i64 {
        self.extra_shot
    }

    /// Syrup price, in minor units.
    ///
    /// # Errors
    ///
    /// Returns [`PricingError::InvalidOption`] if the table has no entry for `flavor`.
    pub fn syrup(&self, flavor: SyrupFlavor) -> Result<i64, PricingError> {
        lookup(&self.syrups, flavor, OptionKind::Syrup, flavor.key())
    }

    /// Topping surcharge at regular amount, in minor units.
    ///
    /// # Errors
    ///
    /// Returns [`PricingError::InvalidOption`] if the table has no entry for `topping`.
    pub fn topping(&self, topping: Topping) -> Result<i64, PricingError> {
        lookup(&self.toppings, topping, OptionKind::Topping, topping.key())
    }

    /// Sweetener price per packet, in minor units.
    ///
    /// # Errors
    ///
    /// Returns [`PricingError::InvalidOption`] if the table has no entry for `sweetener`.
    pub fn sweetener(&self, sweetener: SweetenerType) -> Result<i64, PricingError> {
        lookup(
            &self.sweeteners,
            sweetener,
            OptionKind::Sweetener,
            sweetener.key(),
        )
    }
}

impl Default for PriceTable {
    fn default() -> Self {
        Self::standard()
    }
}

fn lookup<K: std::hash::Hash + Eq>(
    table: &FxHashMap<K, i64>,
    key: K,
    kind: OptionKind,
    label: &'static str,
) -> Result<i64, PricingError> {
    table
        .get(&key)
        .copied()
        .ok_or(PricingError::InvalidOption { kind, key: label })
}

/// Unit price of a customized drink.
///
/// Adds, in order: the size surcharge, the milk surcharge, one extra-shot price per shot, each
/// syrup's flat price (except the first flavor when it has at most [`INCLUDED_SYRUP_PUMPS`]
/// pumps), each topping's surcharge (one and a half times for extra), and each sweetener's
/// price per packet.
///
/// # Errors
///
/// - [`PricingError::InvalidOption`]: an option in the customization is missing from the table.
/// - [`PricingError::CurrencyMismatch`]: the base price is not in the table's currency.
/// - [`PricingError::Negative`]: the result is below zero.
/// - [`PricingError::Overflow`]: the sum cannot be represented.
pub fn compute_price(
    prices: &PriceTable,
    base: Money<'static, Currency>,
    customization: &DrinkCustomization,
) -> Result<Money<'static, Currency>, PricingError> {
    ensure_currency(prices.currency, base.currency())?;

    let mut total = Decimal::from(base.to_minor_units());

    total = add(total, prices.size(customization.size())?)?;

    if let Some(milk) = customization.milk() {
        total = add(total, prices.milk(milk)?)?;
    }

    if customization.espresso_shots() > 0 {
        let shots = prices
            .extra_shot()
            .checked_mul(i64::from(customization.espresso_shots()))
            .ok_or(PricingError::Overflow)?;

        total = add(total, shots)?;
    }

    for (index, syrup) in customization.syrups().iter().enumerate() {
        let price = prices.syrup(syrup.flavor)?;

        if index == 0 && syrup.pumps <= INCLUDED_SYRUP_PUMPS {
            continue;
        }

        total = add(total, price)?;
    }

    for topping in customization.toppings() {
        let surcharge = Decimal::from(prices.topping(topping.topping)?);

        let surcharge = match topping.amount {
            ToppingAmount::Extra => surcharge
                .checked_mul(Decimal::new(15, 1))
                .ok_or(PricingError::Overflow)?,
            ToppingAmount::Light | ToppingAmount::Regular => surcharge,
        };

        total = total.checked_add(surcharge).ok_or(PricingError::Overflow)?;
    }

    for sweetener in customization.sweeteners() {
        let price = prices
            .sweetener(sweetener.sweetener)?
            .checked_mul(i64::from(sweetener.packets))
            .ok_or(PricingError::Overflow)?;

        total = add(total, price)?;
    }

    let minor = round_to_minor(total)?;

    if minor < 0 {
        return Err(PricingError::Negative(minor));
    }

    Ok(Money::from_minor(minor, prices.currency))
}

fn add(total: Decimal, minor: i64) -> Result<Decimal, PricingError> {
    total
        .checked_add(Decimal::from(minor))
        .ok_or(PricingError::Overflow)
}

fn round_to_minor(value: Decimal) -> Result<i64, PricingError> {
    value
        .round_dp_with_strategy(0, RoundingStrategy::MidpointAwayFromZero)
        .to_i64()
        .ok_or(PricingError::Overflow)
}

fn ensure_currency(expected: &Currency, actual: &Currency) -> Result<(), PricingError> {
    if expected == actual {
        return Ok(());
    }

    Err(PricingError::CurrencyMismatch {
        expected: expected.iso_alpha_code,
        actual: actual.iso_alpha_code,
    })
}

/// Sales tax rate applied to cart subtotals: 8.75%.
pub fn tax_rate() -> Percentage {
    Percentage::from(Decimal::new(875, 4))
}

/// Take a percentage of an amount in minor units, rounding half away from zero.
///
/// # Errors
///
/// Returns [`PricingError::Overflow`] if the result cannot be represented.
pub fn percent_of_minor(percent: &Percentage, minor: i64) -> Result<i64, PricingError> {
    // Percentage keeps its decimal private; multiplying by one unwraps it
    let rate = (*percent) * Decimal::ONE;

    let value = rate
        .checked_mul(Decimal::from(minor))
        .ok_or(PricingError::Overflow)?;

    round_to_minor(value)
}

/// Tax owed on `subtotal`.
///
/// # Errors
///
/// Returns [`PricingError::Overflow`] if the tax cannot be represented.
pub fn tax_on(subtotal: Money<'static, Currency>) -> Result<Money<'static, Currency>, PricingError> {
    let tax = percent_of_minor(&tax_rate(), subtotal.to_minor_units())?;

    Ok(Money::from_minor(tax, subtotal.currency()))
}

/// `unit × quantity`.
///
/// # Errors
///
/// Returns [`PricingError::Overflow`] if the product cannot be represented.
pub fn line_total(
    unit: Money<'static, Currency>,
    quantity: u32,
) -> Result<Money<'static, Currency>, PricingError> {
    let minor = unit
        .to_minor_units()
        .checked_mul(i64::from(quantity))
        .ok_or(PricingError::Overflow)?;

    Ok(Money::from_minor(minor, unit.currency()))
}

/// Sum amounts, all of which must be in `currency`. An empty iterator sums to zero.
///
/// # Errors
///
/// Returns [`PricingError::Money`] on a currency mismatch.
pub fn sum(
    amounts: impl IntoIterator<Item = Money<'static, Currency>>,
    currency: &'static Currency,
) -> Result<Money<'static, Currency>, PricingError> {
    let total = amounts
        .into_iter()
        .try_fold(Money::from_minor(0, currency), |acc, amount| acc.add(amount))?;

    Ok(total)
}
