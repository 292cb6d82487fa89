//! Pricing properties over every drink in the bundled catalog

use moonbeam::{
    customization::{MAX_EXTRA_SHOTS, MAX_SWEETENER_PACKETS, MAX_SYRUP_PUMPS},
    prelude::*,
};
use rusty_money::{Money, iso::Currency};
use testresult::TestResult;

const CATALOG: &str = concat!(env!("CARGO_MANIFEST_DIR"), "/fixtures/catalog/moonbeam.yml");

fn drinks(catalog: &Catalog) -> impl Iterator<Item = &MenuItem> {
    catalog
        .items()
        .iter()
        .filter(|item| !item.category().is_food())
}

fn minor(price: Money<'_, Currency>) -> i64 {
    price.to_minor_units()
}

#[test]
fn plain_drinks_cost_base_plus_size() -> TestResult {
    let catalog = Catalog::load(CATALOG)?;
    let prices = catalog.prices();

    for item in drinks(&catalog) {
        for size in item.sizes() {
            for temperature in item.temperatures() {
                let drink = DrinkCustomization::new(*size, *temperature);
                let price = compute_price(prices, item.price(), &drink)?;

                assert_eq!(
                    minor(price),
                    minor(item.price()) + prices.size(*size)?,
                    "{} {size} {temperature}",
                    item.id()
                );
            }
        }
    }

    Ok(())
}

#[test]
fn price_never_decreases_as_quantities_grow() -> TestResult {
    let catalog = Catalog::load(CATALOG)?;
    let prices = catalog.prices();

    for item in drinks(&catalog) {
        let base = normalize(item, &CustomizationRequest::default())?;
        let price_of = |drink: &DrinkCustomization| compute_price(prices, item.price(), drink);

        let mut previous = minor(price_of(&base)?);
        for shots in 1..=MAX_EXTRA_SHOTS {
            let mut drink = base.clone();
            drink.set_espresso_shots(shots)?;
            let price = minor(price_of(&drink)?);
            assert!(price >= previous, "{} shots={shots}", item.id());
            previous = price;
        }

        for flavor in [SyrupFlavor::Caramel, SyrupFlavor::Pistachio] {
            let mut previous = minor(price_of(&base)?);
            for pumps in 0..=MAX_SYRUP_PUMPS {
                let mut drink = base.clone();
                drink.set_syrup(flavor, pumps)?;
                let price = minor(price_of(&drink)?);
                assert!(price >= previous, "{} {flavor} pumps={pumps}", item.id());
                previous = price;
            }
        }

        let mut previous = minor(price_of(&base)?);
        for packets in 0..=MAX_SWEETENER_PACKETS {
            let mut drink = base.clone();
            drink.set_sweetener(SweetenerType::Honey, packets)?;
            let price = minor(price_of(&drink)?);
            assert!(price >= previous, "{} honey packets={packets}", item.id());
            previous = price;
        }

        let mut previous = minor(price_of(&base)?);
        for amount in [
            None,
            Some(ToppingAmount::Light),
            Some(ToppingAmount::Regular),
            Some(ToppingAmount::Extra),
        ] {
            let mut drink = base.clone();
            drink.set_topping(Topping::ColdFoam, amount);
            let price = minor(price_of(&drink)?);
            assert!(price >= previous, "{} cold foam {amount:?}", item.id());
            previous = price;
        }
    }

    Ok(())
}

#[test]
fn clearing_additions_leaves_base_size_and_milk() -> TestResult {
    let catalog = Catalog::load(CATALOG)?;
    let prices = catalog.prices();

    for item in drinks(&catalog) {
        let mut drink = normalize(
            item,
            &CustomizationRequest {
                syrups: Some(vec![
                    SyrupSelection {
                        flavor: SyrupFlavor::Hazelnut,
                        pumps: 6,
                    },
                    SyrupSelection {
                        flavor: SyrupFlavor::BrownSugar,
                        pumps: 2,
                    },
                ]),
                toppings: Some(vec![ToppingSelection {
                    topping: Topping::CaramelDrizzle,
                    amount: ToppingAmount::Extra,
                }]),
                sweeteners: Some(vec![SweetenerSelection {
                    sweetener: SweetenerType::Honey,
                    packets: 2,
                }]),
                ..CustomizationRequest::default()
            },
        )?;

        drink.clear_additions();

        let milk = match drink.milk() {
            Some(milk) => prices.milk(milk)?,
            None => 0,
        };
        let shots = prices.extra_shot() * i64::from(drink.espresso_shots());
        let expected = minor(item.price()) + prices.size(drink.size())? + milk + shots;

        assert_eq!(
            minor(compute_price(prices, item.price(), &drink)?),
            expected,
            "{}",
            item.id()
        );
    }

    Ok(())
}

#[test]
fn subtotal_tracks_lines_through_adds_and_removes() -> TestResult {
    let catalog = Catalog::load(CATALOG)?;
    let mut cart = Cart::new(catalog.prices().clone());
    let mut added = Vec::new();

    for (quantity, item) in (1..).zip(catalog.items()) {
        added.push(cart.add(item, &CustomizationRequest::default(), quantity)?);

        if quantity % 3 == 0 && !added.is_empty() {
            cart.remove(added.remove(0));
        }

        let expected: i64 = cart
            .lines()
            .iter()
            .map(|line| minor(line.unit_price()) * i64::from(line.quantity()))
            .sum();

        assert_eq!(minor(cart.subtotal()?), expected);
    }

    Ok(())
}
