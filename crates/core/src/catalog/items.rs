//! Menu items

use std::fmt::{Display, Formatter, Result as FmtResult};

use rusty_money::{Money, iso::Currency};
use serde::{Deserialize, Serialize};
use smallvec::SmallVec;

use crate::{
    catalog::{
        CatalogError,
        options::{Size, Temperature},
    },
    customization::CustomizationRequest,
};

/// Menu section an item is listed under.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Category {
    /// Espresso drinks
    Espresso,
    /// Cold brew
    ColdBrew,
    /// Blended drinks
    Frappuccino,
    /// Tea
    Tea,
    /// Fruit refreshers
    Refreshers,
    /// Hot chocolate
    HotChocolate,
    /// Limited-time drinks
    Seasonal,
    /// Pastries
    Pastries,
    /// Sandwiches
    Sandwiches,
    /// Snacks
    Snacks,
    /// Desserts
    Desserts,
}

impl Category {
    /// Every category, in menu order.
    pub const ALL: &'static [Self] = &[
        Self::Espresso,
        Self::ColdBrew,
        Self::Frappuccino,
        Self::Tea,
        Self::Refreshers,
        Self::HotChocolate,
        Self::Seasonal,
        Self::Pastries,
        Self::Sandwiches,
        Self::Snacks,
        Self::Desserts,
    ];

    /// Whether the category holds food rather than drinks.
    #[must_use]
    pub const fn is_food(self) -> bool {
        matches!(
            self,
            Self::Pastries | Self::Sandwiches | Self::Snacks | Self::Desserts
        )
    }
}

impl Display for Category {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        let label = match self {
            Self::Espresso => "Espresso",
            Self::ColdBrew => "Cold Brew",
            Self::Frappuccino => "Frappuccino",
            Self::Tea => "Tea",
            Self::Refreshers => "Refreshers",
            Self::HotChocolate => "Hot Chocolate",
            Self::Seasonal => "Seasonal",
            Self::Pastries => "Pastries",
            Self::Sandwiches => "Sandwiches",
            Self::Snacks => "Snacks",
            Self::Desserts => "Desserts",
        };

        f.write_str(label)
    }
}

/// A value per cup size, such as calories. Sizes without an entry are unknown.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct PerSize<T> {
    /// Tall
    pub tall: Option<T>,
    /// Grande
    pub grande: Option<T>,
    /// Venti
    pub venti: Option<T>,
}

impl<T: Copy> PerSize<T> {
    /// The same value for every size.
    pub fn uniform(value: T) -> Self {
        Self {
            tall: Some(value),
            grande: Some(value),
            venti: Some(value),
        }
    }

    /// The entry for `size`.
    pub fn get(&self, size: Size) -> Option<T> {
        match size {
            Size::Tall => self.tall,
            Size::Grande => self.grande,
            Size::Venti => self.venti,
        }
    }
}

/// A catalog entry. Built once when the catalog loads and never changed afterwards.
#[derive(Debug, Clone, PartialEq)]
pub struct MenuItem {
    id: String,
    name: String,
    description: String,
    category: Category,
    price: Money<'static, Currency>,
    calories: PerSize<u16>,
    caffeine: Option<PerSize<u16>>,
    sizes: SmallVec<[Size; 3]>,
    temperatures: SmallVec<[Temperature; 3]>,
    default_customization: CustomizationRequest,
    is_new: bool,
    is_seasonal: bool,
    tags: Vec<String>,
}

impl MenuItem {
    /// Start building an item. Sizes and temperatures must be set before [`MenuItemBuilder::build`].
    pub fn builder(
        id: impl Into<String>,
        name: impl Into<String>,
        category: Category,
        price: Money<'static, Currency>,
    ) -> MenuItemBuilder {
        MenuItemBuilder {
            id: id.into(),
            name: name.into(),
            description: String::new(),
            category,
            price,
            calories: PerSize::default(),
            caffeine: None,
            sizes: SmallVec::new(),
            temperatures: SmallVec::new(),
            default_customization: CustomizationRequest::default(),
            is_new: false,
            is_seasonal: false,
            tags: Vec::new(),
        }
    }

    /// Catalog key
    pub fn id(&self) -> &str {
        &self.id
    }

    /// Display name
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Menu description
    pub fn description(&self) -> &str {
        &self.description
    }

    /// Menu section
    pub fn category(&self) -> Category {
        self.category
    }

    /// Base price before any customization
    pub fn price(&self) -> Money<'static, Currency> {
        self.price
    }

    /// Calories for a size, if known.
    pub fn calories(&self, size: Size) -> Option<u16> {
        self.calories.get(size)
    }

    /// Caffeine in milligrams for a size. `None` for caffeine-free items or unknown sizes.
    pub fn caffeine(&self, size: Size) -> Option<u16> {
        self.caffeine.and_then(|table| table.get(size))
    }

    /// Sizes the item is offered in, never empty.
    pub fn sizes(&self) -> &[Size] {
        &self.sizes
    }

    /// Temperatures the item is offered in, never empty.
    pub fn temperatures(&self) -> &[Temperature] {
        &self.temperatures
    }

    /// Whether `size` is offered.
    pub fn offers_size(&self, size: Size) -> bool {
        self.sizes.contains(&size)
    }

    /// Whether `temperature` is offered.
    pub fn offers_temperature(&self, temperature: Temperature) -> bool {
        self.temperatures.contains(&temperature)
    }

    /// Template used to fill fields a request leaves unset.
    pub fn default_customization(&self) -> &CustomizationRequest {
        &self.default_customization
    }

    /// Newly added to the menu
    pub fn is_new(&self) -> bool {
        self.is_new
    }

    /// Only available for a limited time
    pub fn is_seasonal(&self) -> bool {
        self.is_seasonal
    }

    /// Free-form tags
    pub fn tags(&self) -> &[String] {
        &self.tags
    }

    /// Case-insensitive match against the name, description and tags.
    pub fn matches(&self, query: &str) -> bool {
        let query = query.trim().to_lowercase();

        if query.is_empty() {
            return true;
        }

        self.name.to_lowercase().contains(&query)
            || self.description.to_lowercase().contains(&query)
            || self.tags.iter().any(|tag| tag.to_lowercase().contains(&query))
    }
}

/// Builder for [`MenuItem`].
#[derive(Debug, Clone)]
pub struct MenuItemBuilder {
    id: String,
    name: String,
    description: String,
    category: Category,
    price: Money<'static, Currency>,
    calories: PerSize<u16>,
    caffeine: Option<PerSize<u16>>,
    sizes: SmallVec<[Size; 3]>,
    temperatures: SmallVec<[Temperature; 3]>,
    default_customization: CustomizationRequest,
    is_new: bool,
    is_seasonal: bool,
    tags: Vec<String>,
}

impl MenuItemBuilder {
    /// Set the description.
    #[must_use]
    pub fn description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    /// Set the offered sizes. Repeats are dropped.
    #[must_use]
    pub fn sizes(mut self, sizes: impl IntoIterator<Item = Size>) -> Self {
        self.sizes.clear();

        for size in sizes {
            if !self.sizes.contains(&size) {
                self.sizes.push(size);
            }
        }

        self
    }

    /// Set the offered temperatures. Repeats are dropped.
    #[must_use]
    pub fn temperatures(mut self, temperatures: impl IntoIterator<Item = Temperature>) -> Self {
        self.temperatures.clear();

        for temperature in temperatures {
            if !self.temperatures.contains(&temperature) {
                self.temperatures.push(temperature);
            }
        }

        self
    }

    /// Set the calorie table.
    #[must_use]
    pub fn calories(mut self, calories: PerSize<u16>) -> Self {
        self.calories = calories;
        self
    }

    /// Set the caffeine table.
    #[must_use]
    pub fn caffeine(mut self, caffeine: Option<PerSize<u16>>) -> Self {
        self.caffeine = caffeine;
        self
    }

    /// Set the default customization template.
    #[must_use]
    pub fn default_customization(mut self, template: CustomizationRequest) -> Self {
        self.default_customization = template;
        self
    }

    /// Flag as new.
    #[must_use]
    pub fn new_item(mut self, is_new: bool) -> Self {
        self.is_new = is_new;
        self
    }

    /// Flag as seasonal.
    #[must_use]
    pub fn seasonal(mut self, is_seasonal: bool) -> Self {
        self.is_seasonal = is_seasonal;
        self
    }

    /// Set the tags.
    #[must_use]
    pub fn tags(mut self, tags: impl IntoIterator<Item = impl Into<String>>) -> Self {
        self.tags = tags.into_iter().map(Into::into).collect();
        self
    }

    /// Validate and build the item.
    ///
    /// # Errors
    ///
    /// - [`CatalogError::NegativePrice`]: the base price is below zero.
    /// - [`CatalogError::NoSizes`]: no sizes were set.
    /// - [`CatalogError::NoTemperatures`]: no temperatures were set.
    pub fn build(self) -> Result<MenuItem, CatalogError> {
        if self.price.to_minor_units() < 0 {
            return Err(CatalogError::NegativePrice(self.id));
        }

        if self.sizes.is_empty() {
            return Err(CatalogError::NoSizes(self.id));
        }

        if self.temperatures.is_empty() {
            return Err(CatalogError::NoTemperatures(self.id));
        }

        Ok(MenuItem {
            id: self.id,
            name: self.name,
            description: self.description,
            category: self.category,
            price: self.price,
            calories: self.calories,
            caffeine: self.caffeine,
            sizes: self.sizes,
            temperatures: self.temperatures,
            default_customization: self.default_customization,
            is_new: self.is_new,
            is_seasonal: self.is_seasonal,
            tags: self.tags,
        })
    }
}
