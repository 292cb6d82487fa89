//! Customization normalizer

use crate::{
    catalog::{
        items::MenuItem,
        options::{OptionKind, Size, Temperature},
    },
    customization::{CustomizationError, CustomizationRequest, DrinkCustomization},
};

/// Size used when neither the request nor the item's template names one.
pub const DEFAULT_SIZE: Size = Size::Grande;

/// Build a complete customization for `item` from a partial request.
///
/// Unset fields fall back to the item's default template, then to [`DEFAULT_SIZE`] and the
/// item's first offered temperature. Selection lists are replayed through the keyed setters, so
/// duplicate keys collapse and zero quantities disappear. Ice is dropped from hot drinks.
///
/// # Errors
///
/// - [`CustomizationError::UnsupportedOption`]: the request names a size or temperature the item
///   is not offered in.
/// - [`CustomizationError::InvalidOption`]: the item's own template names an option the item
///   does not offer.
/// - [`CustomizationError::OutOfRange`]: a shot, pump or packet count is above its bound.
pub fn normalize(
    item: &MenuItem,
    request: &CustomizationRequest,
) -> Result<DrinkCustomization, CustomizationError> {
    let template = item.default_customization();

    let size = resolve_size(item, request.size, template.size)?;
    let temperature = resolve_temperature(item, request.temperature, template.temperature)?;

    let ice_level = match temperature {
        Temperature::Hot => None,
        Temperature::Iced | Temperature::Blended => request.ice_level.or(template.ice_level),
    };

    let instructions = request
        .instructions
        .as_deref()
        .or(template.instructions.as_deref());

    let mut customization = DrinkCustomization::new(size, temperature)
        .with_milk(request.milk.or(template.milk))
        .with_espresso_roast(request.espresso_roast.or(template.espresso_roast))
        .with_ice_level(ice_level)
        .with_instructions(instructions);

    customization.set_espresso_shots(
        request
            .espresso_shots
            .or(template.espresso_shots)
            .unwrap_or(0),
    )?;

    for syrup in request
        .syrups
        .as_deref()
        .or(template.syrups.as_deref())
        .unwrap_or_default()
    {
        customization.set_syrup(syrup.flavor, syrup.pumps)?;
    }

    for topping in request
        .toppings
        .as_deref()
        .or(template.toppings.as_deref())
        .unwrap_or_default()
    {
        customization.set_topping(topping.topping, Some(topping.amount));
    }

    for sweetener in request
        .sweeteners
        .as_deref()
        .or(template.sweeteners.as_deref())
        .unwrap_or_default()
    {
        customization.set_sweetener(sweetener.sweetener, sweetener.packets)?;
    }

    Ok(customization)
}

fn resolve_size(
    item: &MenuItem,
    requested: Option<Size>,
    template: Option<Size>,
) -> Result<Size, CustomizationError> {
    if let Some(size) = requested {
        if !item.offers_size(size) {
            return Err(CustomizationError::UnsupportedOption {
                item: item.name().to_string(),
                kind: OptionKind::Size,
                key: size.key(),
            });
        }

        return Ok(size);
    }

    if let Some(size) = template {
        if !item.offers_size(size) {
            return Err(CustomizationError::InvalidOption {
                kind: OptionKind::Size,
                key: size.key().to_string(),
            });
        }

        return Ok(size);
    }

    if item.offers_size(DEFAULT_SIZE) {
        return Ok(DEFAULT_SIZE);
    }

    Ok(item.sizes().first().copied().unwrap_or(DEFAULT_SIZE))
}

fn resolve_temperature(
    item: &MenuItem,
    requested: Option<Temperature>,
    template: Option<Temperature>,
) -> Result<Temperature, CustomizationError> {
    if let Some(temperature) = requested {
        if !item.offers_temperature(temperature) {
            return Err(CustomizationError::UnsupportedOption {
                item: item.name().to_string(),
                kind: OptionKind::Temperature,
                key: temperature.key(),
            });
        }

        return Ok(temperature);
    }

    if let Some(temperature) = template {
        if !item.offers_temperature(temperature) {
            return Err(CustomizationError::InvalidOption {
                kind: OptionKind::Temperature,
                key: temperature.key().to_string(),
            });
        }

        return Ok(temperature);
    }

    Ok(item
        .temperatures()
        .first()
        .copied()
        .unwrap_or(Temperature::Hot))
}
