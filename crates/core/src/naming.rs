//! Display names for order lines

use crate::{
    catalog::{
        items::MenuItem,
        options::{MilkType, Temperature},
    },
    customization::DrinkCustomization,
};

/// Human-readable label for a customized item, e.g. `Grande Iced Oatmilk +2 Shots Latte`.
///
/// Tokens, in this order and skipping any that are empty: the size label, `Iced` for iced drinks,
/// the milk label unless the milk is a default dairy, `+N Shot`/`+N Shots`, then the item name.
/// Food items are named by the item name alone.
pub fn generate_name(item: &MenuItem, customization: &DrinkCustomization) -> String {
    if item.category().is_food() {
        return item.name().to_string();
    }

    let shots = match customization.espresso_shots() {
        0 => String::new(),
        1 => "+1 Shot".to_string(),
        n => format!("+{n} Shots"),
    };

    let iced = match customization.temperature() {
        Temperature::Iced => "Iced",
        Temperature::Hot | Temperature::Blended => "",
    };

    let milk = customization
        .milk()
        .filter(|milk| !milk.is_default_dairy())
        .map_or("", MilkType::label);

    [customization.size().label(), iced, milk, shots.as_str(), item.name()]
        .into_iter()
        .filter(|token| !token.is_empty())
        .collect::<Vec<_>>()
        .join(" ")
}

#[cfg(test)]
mod tests {
    use rusty_money::{Money, iso::USD};
    use testresult::TestResult;

    use crate::catalog::{
        CatalogError,
        items::Category,
        options::{MilkType, Size},
    };

    use super::*;

    fn item(name: &str, category: Category) -> Result<MenuItem, CatalogError> {
        MenuItem::builder("item", name, category, Money::from_minor(300, USD))
            .sizes([Size::Tall, Size::Grande, Size::Venti])
            .temperatures([Temperature::Hot, Temperature::Iced, Temperature::Blended])
            .build()
    }

    #[test]
    fn grande_hot_oat_latte_with_two_shots() -> TestResult {
        let latte = item("Latte", Category::Espresso)?;
        let mut drink =
            DrinkCustomization::new(Size::Grande, Temperature::Hot).with_milk(Some(MilkType::Oat));
        drink.set_espresso_shots(2)?;

        assert_eq!(generate_name(&latte, &drink), "Grande Oatmilk +2 Shots Latte");

        Ok(())
    }

    #[test]
    fn iced_comes_before_milk_and_single_shot_is_singular() -> TestResult {
        let latte = item("Latte", Category::Espresso)?;
        let mut drink = DrinkCustomization::new(Size::Grande, Temperature::Iced)
            .with_milk(Some(MilkType::Almond));
        drink.set_espresso_shots(1)?;

        assert_eq!(
            generate_name(&latte, &drink),
            "Grande Iced Almondmilk +1 Shot Latte"
        );

        Ok(())
    }

    #[test]
    fn default_dairy_and_blended_are_not_called_out() -> TestResult {
        let frappe = item("Mocha Frappuccino", Category::Frappuccino)?;

        for milk in [None, Some(MilkType::Whole), Some(MilkType::TwoPercent)] {
            let drink = DrinkCustomization::new(Size::Venti, Temperature::Blended).with_milk(milk);

            assert_eq!(generate_name(&frappe, &drink), "Venti Mocha Frappuccino");
        }

        Ok(())
    }

    #[test]
    fn nonfat_and_foam_labels() -> TestResult {
        let latte = item("Latte", Category::Espresso)?;

        let skim = DrinkCustomization::new(Size::Tall, Temperature::Hot)
            .with_milk(Some(MilkType::Skim));
        let foam = DrinkCustomization::new(Size::Tall, Temperature::Hot)
            .with_milk(Some(MilkType::OatmilkFoam));

        assert_eq!(generate_name(&latte, &skim), "Tall Nonfat Latte");
        assert_eq!(generate_name(&latte, &foam), "Tall Oatmilk Foam Latte");

        Ok(())
    }

    #[test]
    fn food_is_named_plainly() -> TestResult {
        let croissant = item("Butter Croissant", Category::Pastries)?;
        let drink = DrinkCustomization::new(Size::Tall, Temperature::Hot);

        assert_eq!(generate_name(&croissant, &drink), "Butter Croissant");

        Ok(())
    }
}
