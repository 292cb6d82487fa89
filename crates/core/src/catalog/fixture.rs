//! Catalog YAML schema

use rust_decimal::{Decimal, prelude::ToPrimitive};
use rustc_hash::FxHashMap;
use rusty_money::{
    Money,
    iso::{CAD, Currency, EUR, GBP, USD},
};
use serde::Deserialize;

use crate::{
    catalog::{
        CatalogError,
        items::{Category, MenuItem, PerSize},
        locations::Location,
        options::{MilkType, Size, SweetenerType, SyrupFlavor, Temperature, Topping},
    },
    customization::CustomizationRequest,
    pricing::PriceTable,
};

/// Top-level catalog file
#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub(super) struct CatalogFixture {
    /// Price table; the standard table when omitted
    #[serde(default)]
    pub prices: Option<PriceTableFixture>,

    /// Menu items, in menu order
    pub items: Vec<ItemFixture>,

    /// Pickup locations
    #[serde(default)]
    pub locations: Vec<Location>,
}

/// Surcharges, each written as "AMOUNT CURRENCY"
#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub(super) struct PriceTableFixture {
    pub sizes: FxHashMap<Size, String>,
    #[serde(default)]
    pub milks: FxHashMap<MilkType, String>,
    pub extra_shot: String,
    #[serde(default)]
    pub syrups: FxHashMap<SyrupFlavor, String>,
    #[serde(default)]
    pub toppings: FxHashMap<Topping, String>,
    #[serde(default)]
    pub sweeteners: FxHashMap<SweetenerType, String>,
}

impl TryFrom<PriceTableFixture> for PriceTable {
    type Error = CatalogError;

    fn try_from(fixture: PriceTableFixture) -> Result<Self, Self::Error> {
        let (extra_shot, currency) = parse_price(&fixture.extra_shot)?;
        let minor = |price: &str| -> Result<i64, CatalogError> {
            let (minor, found) = parse_price(price)?;
            ensure_currency(currency, found)?;
            Ok(minor)
        };

        let mut table = PriceTable::new(currency).with_extra_shot(extra_shot);

        for (size, price) in &fixture.sizes {
            table = table.with_size(*size, minor(price)?);
        }

        for (milk, price) in &fixture.milks {
            table = table.with_milk(*milk, minor(price)?);
        }

        for (flavor, price) in &fixture.syrups {
            table = table.with_syrup(*flavor, minor(price)?);
        }

        for (topping, price) in &fixture.toppings {
            table = table.with_topping(*topping, minor(price)?);
        }

        for (sweetener, price) in &fixture.sweeteners {
            table = table.with_sweetener(*sweetener, minor(price)?);
        }

        Ok(table)
    }
}

/// One menu item
#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub(super) struct ItemFixture {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub description: String,
    pub category: Category,
    /// Base price (e.g., "3.25 USD")
    pub price: String,
    #[serde(default)]
    pub calories: PerSize<u16>,
    #[serde(default)]
    pub caffeine: Option<PerSize<u16>>,
    pub sizes: Vec<Size>,
    pub temperatures: Vec<Temperature>,
    #[serde(default)]
    pub defaults: CustomizationRequest,
    #[serde(default)]
    pub new: bool,
    #[serde(default)]
    pub seasonal: bool,
    #[serde(default)]
    pub tags: Vec<String>,
}

impl TryFrom<ItemFixture> for MenuItem {
    type Error = CatalogError;

    fn try_from(fixture: ItemFixture) -> Result<Self, Self::Error> {
        let (minor_units, currency) = parse_price(&fixture.price)?;

        MenuItem::builder(
            fixture.id,
            fixture.name,
            fixture.category,
            Money::from_minor(minor_units, currency),
        )
        .description(fixture.description)
        .calories(fixture.calories)
        .caffeine(fixture.caffeine)
        .sizes(fixture.sizes)
        .temperatures(fixture.temperatures)
        .default_customization(fixture.defaults)
        .new_item(fixture.new)
        .seasonal(fixture.seasonal)
        .tags(fixture.tags)
        .build()
    }
}

/// Parse price string (e.g., "3.25 USD") into minor units and currency
///
/// # Errors
///
/// Returns an error if the string is not in the format "AMOUNT CURRENCY", if the amount is not
/// a decimal number, or if the currency code is not recognized.
pub fn parse_price(s: &str) -> Result<(i64, &'static Currency), CatalogError> {
    let mut parts = s.split_whitespace();

    let (Some(amount), Some(code), None) = (parts.next(), parts.next(), parts.next()) else {
        return Err(CatalogError::InvalidPrice(format!(
            "Expected format 'AMOUNT CURRENCY', got: {s}"
        )));
    };

    let minor_units = amount
        .parse::<Decimal>()
        .map_err(|_err| CatalogError::InvalidPrice(s.to_string()))?
        .checked_mul(Decimal::ONE_HUNDRED)
        .and_then(|value| value.round_dp(0).to_i64())
        .ok_or_else(|| CatalogError::InvalidPrice(s.to_string()))?;

    let currency = match code {
        "USD" => USD,
        "CAD" => CAD,
        "GBP" => GBP,
        "EUR" => EUR,
        other => return Err(CatalogError::UnknownCurrency(other.to_string())),
    };

    Ok((minor_units, currency))
}

pub(super) fn ensure_currency(
    expected: &'static Currency,
    found: &'static Currency,
) -> Result<(), CatalogError> {
    if expected == found {
        return Ok(());
    }

    Err(CatalogError::CurrencyMismatch(
        expected.iso_alpha_code.to_string(),
        found.iso_alpha_code.to_string(),
    ))
}
