//! Catalog
//!
//! The menu, its price table and the pickup locations. A catalog is loaded once at startup and is
//! read-only afterwards.

use std::{fs, path::Path};

use rustc_hash::FxHashMap;
use rusty_money::iso::Currency;
use thiserror::Error;

use crate::{
    catalog::{
        fixture::{CatalogFixture, ensure_currency},
        items::{Category, MenuItem},
        locations::Location,
    },
    customization::{CustomizationError, CustomizationRequest, normalize},
    pricing::{PriceTable, PricingError, compute_price},
};

mod fixture;
pub mod items;
pub mod locations;
pub mod options;

pub use fixture::parse_price;

/// Catalog loading errors
#[derive(Debug, Error)]
pub enum CatalogError {
    /// IO error reading the catalog file
    #[error("Failed to read catalog file: {0}")]
    Io(#[from] std::io::Error),

    /// YAML parsing error
    #[error("Failed to parse YAML: {0}")]
    Yaml(#[from] serde_norway::Error),

    /// Invalid price format
    #[error("Invalid price format: {0}")]
    InvalidPrice(String),

    /// Unknown currency code
    #[error("Unknown currency code: {0}")]
    UnknownCurrency(String),

    /// Currency mismatch between prices
    #[error("Currency mismatch: expected {0}, found {1}")]
    CurrencyMismatch(String, String),

    /// Item base price below zero
    #[error("Item {0} has a negative price")]
    NegativePrice(String),

    /// Item offered in no size
    #[error("Item {0} is not offered in any size")]
    NoSizes(String),

    /// Item offered at no temperature
    #[error("Item {0} is not offered at any temperature")]
    NoTemperatures(String),

    /// Two items share an id
    #[error("Duplicate item id: {0}")]
    DuplicateItem(String),

    /// Two locations share an id
    #[error("Duplicate location id: {0}")]
    DuplicateLocation(String),

    /// An item's default customization does not fit the item
    #[error("Item {item} has an invalid default customization: {source}")]
    Template {
        /// Item id
        item: String,
        /// Underlying error
        source: CustomizationError,
    },

    /// An item's default customization cannot be priced
    #[error("Item {item} cannot be priced: {source}")]
    Pricing {
        /// Item id
        item: String,
        /// Underlying error
        source: PricingError,
    },
}

/// Menu, price table and locations.
#[derive(Debug, Clone)]
pub struct Catalog {
    items: Vec<MenuItem>,
    item_index: FxHashMap<String, usize>,
    locations: Vec<Location>,
    prices: PriceTable,
}

impl Catalog {
    /// Build a catalog, checking that every item is priced in the table's currency and that
    /// every item's default customization normalizes and prices.
    ///
    /// # Errors
    ///
    /// Returns a [`CatalogError`] describing the first inconsistency found.
    pub fn new(
        items: Vec<MenuItem>,
        locations: Vec<Location>,
        prices: PriceTable,
    ) -> Result<Self, CatalogError> {
        let mut item_index = FxHashMap::default();

        for (index, item) in items.iter().enumerate() {
            if item_index.insert(item.id().to_string(), index).is_some() {
                return Err(CatalogError::DuplicateItem(item.id().to_string()));
            }

            ensure_currency(prices.currency(), item.price().currency())?;

            let customization = normalize(item, &CustomizationRequest::default()).map_err(
                |source| CatalogError::Template {
                    item: item.id().to_string(),
                    source,
                },
            )?;

            compute_price(&prices, item.price(), &customization).map_err(|source| {
                CatalogError::Pricing {
                    item: item.id().to_string(),
                    source,
                }
            })?;
        }

        let mut location_ids: Vec<&str> = Vec::with_capacity(locations.len());

        for location in &locations {
            if location_ids.contains(&location.id.as_str()) {
                return Err(CatalogError::DuplicateLocation(location.id.clone()));
            }

            location_ids.push(&location.id);
        }

        Ok(Self {
            items,
            item_index,
            locations,
            prices,
        })
    }

    /// Load a catalog from a YAML file.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or parsed, or if the catalog is inconsistent.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, CatalogError> {
        let contents = fs::read_to_string(path)?;

        Self::from_yaml(&contents)
    }

    /// Parse a catalog from YAML text.
    ///
    /// # Errors
    ///
    /// Returns an error if the YAML is malformed or the catalog is inconsistent.
    pub fn from_yaml(contents: &str) -> Result<Self, CatalogError> {
        let fixture: CatalogFixture = serde_norway::from_str(contents)?;

        let prices = match fixture.prices {
            Some(prices) => PriceTable::try_from(prices)?,
            None => PriceTable::standard(),
        };

        let items = fixture
            .items
            .into_iter()
            .map(MenuItem::try_from)
            .collect::<Result<Vec<_>, _>>()?;

        Self::new(items, fixture.locations, prices)
    }

    /// Every item, in menu order.
    pub fn items(&self) -> &[MenuItem] {
        &self.items
    }

    /// Look up an item by id.
    pub fn item(&self, id: &str) -> Option<&MenuItem> {
        self.item_index
            .get(id)
            .and_then(|&index| self.items.get(index))
    }

    /// Items in a category, in menu order.
    pub fn in_category(&self, category: Category) -> impl Iterator<Item = &MenuItem> {
        self.items
            .iter()
            .filter(move |item| item.category() == category)
    }

    /// Items matching a free-text query, in menu order.
    pub fn search<'a>(&'a self, query: &'a str) -> impl Iterator<Item = &'a MenuItem> {
        self.items.iter().filter(move |item| item.matches(query))
    }

    /// Every pickup location.
    pub fn locations(&self) -> &[Location] {
        &self.locations
    }

    /// Look up a location by id.
    pub fn location(&self, id: &str) -> Option<&Location> {
        self.locations.iter().find(|location| location.id == id)
    }

    /// Surcharge table
    pub fn prices(&self) -> &PriceTable {
        &self.prices
    }

    /// Currency every price is in.
    pub fn currency(&self) -> &'static Currency {
        self.prices.currency()
    }
}
