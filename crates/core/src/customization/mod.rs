//! Drink customization
//!
//! [`CustomizationRequest`] is the partially-filled shape the storefront (or a menu item's
//! default template) provides. [`normalize`] turns it into a [`DrinkCustomization`], which is
//! always fully populated and upholds the per-key uniqueness invariants.

use serde::Deserialize;
use smallvec::SmallVec;
use thiserror::Error;

use crate::catalog::options::{
    EspressoRoast, IceLevel, MilkType, OptionKind, Size, SweetenerType, SyrupFlavor, Temperature,
    Topping, ToppingAmount,
};

mod normalize;

pub use normalize::normalize;

/// Most extra espresso shots a drink can take.
pub const MAX_EXTRA_SHOTS: u8 = 6;

/// Most pumps of a single syrup flavor.
pub const MAX_SYRUP_PUMPS: u8 = 12;

/// Most packets of a single sweetener.
pub const MAX_SWEETENER_PACKETS: u8 = 12;

/// Errors raised while building or validating a customization.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum CustomizationError {
    /// A key that is not part of the catalog, or a catalog default that the item itself does not
    /// offer. Indicates bad data rather than bad input.
    #[error("invalid {kind} option: {key}")]
    InvalidOption {
        /// Option family
        kind: OptionKind,
        /// Offending key
        key: String,
    },

    /// The item is not offered with the requested size or temperature.
    #[error("{item} is not available in {kind} {key}")]
    UnsupportedOption {
        /// Menu item display name
        item: String,
        /// Option family
        kind: OptionKind,
        /// Requested key
        key: &'static str,
    },

    /// A count exceeded its bound.
    #[error("{field} must be at most {max}, got {value}")]
    OutOfRange {
        /// Which count
        field: &'static str,
        /// Requested value
        value: u8,
        /// Upper bound
        max: u8,
    },
}

/// A syrup flavor and how many pumps of it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
pub struct SyrupSelection {
    /// Flavor
    pub flavor: SyrupFlavor,
    /// Pump count
    pub pumps: u8,
}

/// A topping and how much of it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
pub struct ToppingSelection {
    /// Topping
    pub topping: Topping,
    /// Amount
    #[serde(default = "default_topping_amount")]
    pub amount: ToppingAmount,
}

/// A sweetener and how many packets of it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
pub struct SweetenerSelection {
    /// Sweetener
    #[serde(rename = "type")]
    pub sweetener: SweetenerType,
    /// Packet count
    pub packets: u8,
}

fn default_topping_amount() -> ToppingAmount {
    ToppingAmount::Regular
}

/// A possibly-partial customization. Unset fields are filled by [`normalize`].
///
/// A `None` selection list means "use the item's default"; `Some(vec![])` explicitly asks for
/// none.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct CustomizationRequest {
    /// Cup size
    pub size: Option<Size>,
    /// Serving temperature
    pub temperature: Option<Temperature>,
    /// Milk
    pub milk: Option<MilkType>,
    /// Espresso roast
    pub espresso_roast: Option<EspressoRoast>,
    /// Extra espresso shots
    pub espresso_shots: Option<u8>,
    /// Syrups
    pub syrups: Option<Vec<SyrupSelection>>,
    /// Toppings
    pub toppings: Option<Vec<ToppingSelection>>,
    /// Sweeteners
    pub sweeteners: Option<Vec<SweetenerSelection>>,
    /// Ice level
    pub ice_level: Option<IceLevel>,
    /// Free text for the barista
    pub instructions: Option<String>,
}

impl From<&DrinkCustomization> for CustomizationRequest {
    fn from(customization: &DrinkCustomization) -> Self {
        Self {
            size: Some(customization.size),
            temperature: Some(customization.temperature),
            milk: customization.milk,
            espresso_roast: customization.espresso_roast,
            espresso_shots: Some(customization.espresso_shots),
            syrups: Some(customization.syrups.to_vec()),
            toppings: Some(customization.toppings.to_vec()),
            sweeteners: Some(customization.sweeteners.to_vec()),
            ice_level: customization.ice_level,
            instructions: customization.instructions.clone(),
        }
    }
}

/// A fully-specified drink customization.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DrinkCustomization {
    size: Size,
    temperature: Temperature,
    milk: Option<MilkType>,
    espresso_roast: Option<EspressoRoast>,
    espresso_shots: u8,
    syrups: SmallVec<[SyrupSelection; 4]>,
    toppings: SmallVec<[ToppingSelection; 4]>,
    sweeteners: SmallVec<[SweetenerSelection; 4]>,
    ice_level: Option<IceLevel>,
    instructions: Option<String>,
}

impl DrinkCustomization {
    /// A plain drink of the given size and temperature.
    #[must_use]
    pub fn new(size: Size, temperature: Temperature) -> Self {
        Self {
            size,
            temperature,
            milk: None,
            espresso_roast: None,
            espresso_shots: 0,
            syrups: SmallVec::new(),
            toppings: SmallVec::new(),
            sweeteners: SmallVec::new(),
            ice_level: None,
            instructions: None,
        }
    }

    /// Cup size
    pub fn size(&self) -> Size {
        self.size
    }

    /// Serving temperature
    pub fn temperature(&self) -> Temperature {
        self.temperature
    }

    /// Milk, if any
    pub fn milk(&self) -> Option<MilkType> {
        self.milk
    }

    /// Espresso roast, if chosen
    pub fn espresso_roast(&self) -> Option<EspressoRoast> {
        self.espresso_roast
    }

    /// Extra espresso shots
    pub fn espresso_shots(&self) -> u8 {
        self.espresso_shots
    }

    /// Syrups in the order they were added
    pub fn syrups(&self) -> &[SyrupSelection] {
        &self.syrups
    }

    /// Toppings in the order they were added
    pub fn toppings(&self) -> &[ToppingSelection] {
        &self.toppings
    }

    /// Sweeteners in the order they were added
    pub fn sweeteners(&self) -> &[SweetenerSelection] {
        &self.sweeteners
    }

    /// Ice level, if any
    pub fn ice_level(&self) -> Option<IceLevel> {
        self.ice_level
    }

    /// Barista instructions, if any
    pub fn instructions(&self) -> Option<&str> {
        self.instructions.as_deref()
    }

    /// Set the milk.
    #[must_use]
    pub fn with_milk(mut self, milk: Option<MilkType>) -> Self {
        self.milk = milk;
        self
    }

    /// Set the espresso roast.
    #[must_use]
    pub fn with_espresso_roast(mut self, roast: Option<EspressoRoast>) -> Self {
        self.espresso_roast = roast;
        self
    }

    /// Set the ice level.
    #[must_use]
    pub fn with_ice_level(mut self, ice_level: Option<IceLevel>) -> Self {
        self.ice_level = ice_level;
        self
    }

    /// Set the barista instructions. Blank text clears them.
    #[must_use]
    pub fn with_instructions(mut self, instructions: Option<&str>) -> Self {
        self.instructions = instructions
            .map(str::trim)
            .filter(|text| !text.is_empty())
            .map(ToString::to_string);
        self
    }

    /// Set the number of extra espresso shots.
    ///
    /// # Errors
    ///
    /// Returns [`CustomizationError::OutOfRange`] above [`MAX_EXTRA_SHOTS`].
    pub fn set_espresso_shots(&mut self, shots: u8) -> Result<(), CustomizationError> {
        self.espresso_shots = bounded("espresso shots", shots, MAX_EXTRA_SHOTS)?;

        Ok(())
    }

    /// Set the pumps for a syrup flavor. Zero pumps removes the flavor; a flavor already present
    /// keeps its position.
    ///
    /// # Errors
    ///
    /// Returns [`CustomizationError::OutOfRange`] above [`MAX_SYRUP_PUMPS`].
    pub fn set_syrup(&mut self, flavor: SyrupFlavor, pumps: u8) -> Result<(), CustomizationError> {
        let pumps = bounded("syrup pumps", pumps, MAX_SYRUP_PUMPS)?;
        let existing = self.syrups.iter().position(|s| s.flavor == flavor);

        match (existing, pumps) {
            (Some(index), 0) => {
                self.syrups.remove(index);
            }
            (Some(index), pumps) => {
                if let Some(entry) = self.syrups.get_mut(index) {
                    entry.pumps = pumps;
                }
            }
            (None, 0) => {}
            (None, pumps) => self.syrups.push(SyrupSelection { flavor, pumps }),
        }

        Ok(())
    }

    /// Set the amount of a topping, or remove it with `None`.
    pub fn set_topping(&mut self, topping: Topping, amount: Option<ToppingAmount>) {
        let existing = self.toppings.iter().position(|t| t.topping == topping);

        match (existing, amount) {
            (Some(index), None) => {
                self.toppings.remove(index);
            }
            (Some(index), Some(amount)) => {
                if let Some(entry) = self.toppings.get_mut(index) {
                    entry.amount = amount;
                }
            }
            (None, None) => {}
            (None, Some(amount)) => self.toppings.push(ToppingSelection { topping, amount }),
        }
    }

    /// Set the packets of a sweetener. Zero packets removes it.
    ///
    /// # Errors
    ///
    /// Returns [`CustomizationError::OutOfRange`] above [`MAX_SWEETENER_PACKETS`].
    pub fn set_sweetener(
        &mut self,
        sweetener: SweetenerType,
        packets: u8,
    ) -> Result<(), CustomizationError> {
        let packets = bounded("sweetener packets", packets, MAX_SWEETENER_PACKETS)?;
        let existing = self.sweeteners.iter().position(|s| s.sweetener == sweetener);

        match (existing, packets) {
            (Some(index), 0) => {
                self.sweeteners.remove(index);
            }
            (Some(index), packets) => {
                if let Some(entry) = self.sweeteners.get_mut(index) {
                    entry.packets = packets;
                }
            }
            (None, 0) => {}
            (None, packets) => self.sweeteners.push(SweetenerSelection { sweetener, packets }),
        }

        Ok(())
    }

    /// Drop every syrup, topping and sweetener.
    pub fn clear_additions(&mut self) {
        self.syrups.clear();
        self.toppings.clear();
        self.sweeteners.clear();
    }
}

fn bounded(field: &'static str, value: u8, max: u8) -> Result<u8, CustomizationError> {
    if value > max {
        return Err(CustomizationError::OutOfRange { field, value, max });
    }

    Ok(value)
}
