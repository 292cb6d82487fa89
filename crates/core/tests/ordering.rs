//! End-to-end ordering against the bundled catalog

use jiff::Timestamp;
use moonbeam::prelude::*;
use rusty_money::{Money, iso::USD};
use testresult::TestResult;

const CATALOG: &str = concat!(env!("CARGO_MANIFEST_DIR"), "/fixtures/catalog/moonbeam.yml");

fn catalog() -> Result<Catalog, CatalogError> {
    Catalog::load(CATALOG)
}

fn details(catalog: &Catalog, location: &str) -> CheckoutDetails {
    CheckoutDetails {
        tip: Tip::None,
        payment: PaymentMethod::apple_pay(),
        pickup_name: "Alex".to_string(),
        location: catalog.location(location).cloned(),
    }
}

#[test]
fn bundled_catalog_loads() -> TestResult {
    let catalog = catalog()?;

    assert_eq!(catalog.prices(), &PriceTable::standard());
    assert_eq!(catalog.currency(), USD);
    assert!(catalog.items().len() >= 15);
    assert_eq!(catalog.locations().len(), 3);

    for category in Category::ALL {
        assert!(
            catalog.in_category(*category).count() > 0,
            "no items in {category}"
        );
    }

    Ok(())
}

#[test]
fn three_item_checkout() -> TestResult {
    let catalog = catalog()?;
    let mut cart = Cart::new(catalog.prices().clone());

    let latte = catalog.item("latte").ok_or("latte missing")?;
    let cold_brew = catalog.item("cold-brew").ok_or("cold brew missing")?;
    let chai = catalog.item("chai").ok_or("chai missing")?;

    let latte_line = cart.add(
        latte,
        &CustomizationRequest {
            size: Some(Size::Grande),
            temperature: Some(Temperature::Iced),
            milk: Some(MilkType::Oat),
            espresso_shots: Some(1),
            ..CustomizationRequest::default()
        },
        1,
    )?;
    let cold_brew_line = cart.add(
        cold_brew,
        &CustomizationRequest {
            size: Some(Size::Venti),
            ..CustomizationRequest::default()
        },
        1,
    )?;
    let chai_line = cart.add(
        chai,
        &CustomizationRequest {
            size: Some(Size::Tall),
            temperature: Some(Temperature::Hot),
            ..CustomizationRequest::default()
        },
        1,
    )?;

    let unit = |id| cart.line(id).map(CartLine::unit_price);

    assert_eq!(unit(latte_line), Some(Money::from_minor(545, USD)));
    assert_eq!(unit(cold_brew_line), Some(Money::from_minor(425, USD)));
    assert_eq!(unit(chai_line), Some(Money::from_minor(375, USD)));

    assert_eq!(
        cart.line(latte_line).map(CartLine::name),
        Some("Grande Iced Oatmilk +1 Shot Latte")
    );

    let now: Timestamp = "2026-05-04T09:30:00Z".parse()?;
    let order = Order::place(&cart, details(&catalog, "downtown"), now)?;

    assert_eq!(order.subtotal(), Money::from_minor(13_45, USD));
    assert_eq!(order.tax(), Money::from_minor(1_18, USD));
    assert_eq!(order.tip(), Money::from_minor(0, USD));
    assert_eq!(order.total(), Money::from_minor(14_63, USD));
    assert_eq!(order.status(), OrderStatus::Confirmed);
    assert_eq!(order.loyalty_stars(), 29);

    let history: Vec<_> = order
        .history()
        .iter()
        .map(|update| (update.status, update.at))
        .collect();

    assert_eq!(
        history,
        [(OrderStatus::Pending, now), (OrderStatus::Confirmed, now)]
    );

    assert_eq!(order.estimated_ready_at(), "2026-05-04T09:40:00Z".parse::<Timestamp>()?);

    Ok(())
}

#[test]
fn tip_presets_apply_to_the_subtotal() -> TestResult {
    let catalog = catalog()?;
    let mut cart = Cart::new(catalog.prices().clone());
    let muffin = catalog.item("blueberry-muffin").ok_or("muffin missing")?;

    cart.add(muffin, &CustomizationRequest::default(), 2)?;

    let order = Order::place(
        &cart,
        CheckoutDetails {
            tip: Tip::percent(15),
            ..details(&catalog, "riverside")
        },
        "2026-05-04T09:30:00Z".parse()?,
    )?;

    assert_eq!(order.subtotal(), Money::from_minor(6_50, USD));
    assert_eq!(order.tip(), Money::from_minor(98, USD));
    assert_eq!(order.tax(), Money::from_minor(57, USD));
    assert_eq!(order.total(), Money::from_minor(8_05, USD));

    Ok(())
}

#[test]
fn grande_oatmilk_two_shot_latte_name() -> TestResult {
    let catalog = catalog()?;
    let latte = catalog.item("latte").ok_or("latte missing")?;

    let drink = normalize(
        latte,
        &CustomizationRequest {
            size: Some(Size::Grande),
            temperature: Some(Temperature::Hot),
            milk: Some(MilkType::Oat),
            espresso_shots: Some(2),
            ..CustomizationRequest::default()
        },
    )?;

    assert_eq!(generate_name(latte, &drink), "Grande Oatmilk +2 Shots Latte");

    Ok(())
}

#[test]
fn food_keeps_its_menu_name() -> TestResult {
    let catalog = catalog()?;
    let croissant = catalog.item("butter-croissant").ok_or("croissant missing")?;
    let mut cart = Cart::new(catalog.prices().clone());

    let line = cart.add(croissant, &CustomizationRequest::default(), 1)?;

    assert_eq!(cart.line(line).map(CartLine::name), Some("Butter Croissant"));
    assert_eq!(
        cart.line(line).map(CartLine::unit_price),
        Some(Money::from_minor(345, USD))
    );

    Ok(())
}

#[test]
fn identical_adds_stay_separate_lines() -> TestResult {
    let catalog = catalog()?;
    let americano = catalog.item("americano").ok_or("americano missing")?;
    let mut cart = Cart::new(catalog.prices().clone());

    let first = cart.add(americano, &CustomizationRequest::default(), 1)?;
    let second = cart.add(americano, &CustomizationRequest::default(), 1)?;

    assert_ne!(first, second);
    assert_eq!(cart.len(), 2);
    assert_eq!(cart.item_count(), 2);

    Ok(())
}

#[test]
fn zero_quantity_empties_a_single_line_cart() -> TestResult {
    let catalog = catalog()?;
    let matcha = catalog.item("matcha-latte").ok_or("matcha missing")?;
    let mut cart = Cart::new(catalog.prices().clone());

    let line = cart.add(matcha, &CustomizationRequest::default(), 3)?;
    cart.update_quantity(line, 0)?;

    assert!(cart.is_empty());
    assert_eq!(cart.subtotal()?, Money::from_minor(0, USD));

    Ok(())
}

#[test]
fn closed_and_missing_locations_are_rejected() -> TestResult {
    let catalog = catalog()?;
    let latte = catalog.item("latte").ok_or("latte missing")?;
    let mut cart = Cart::new(catalog.prices().clone());
    let now: Timestamp = "2026-05-04T09:30:00Z".parse()?;

    cart.add(latte, &CustomizationRequest::default(), 1)?;

    assert!(matches!(
        Order::place(&cart, details(&catalog, "university"), now),
        Err(OrderError::LocationClosed(_))
    ));
    assert!(matches!(
        Order::place(&cart, details(&catalog, "nowhere"), now),
        Err(OrderError::MissingLocation)
    ));
    assert_eq!(cart.len(), 1);

    Ok(())
}

#[test]
fn unsupported_sizes_are_rejected_without_touching_the_cart() -> TestResult {
    let catalog = catalog()?;
    let croissant = catalog.item("butter-croissant").ok_or("croissant missing")?;
    let mut cart = Cart::new(catalog.prices().clone());

    let result = cart.add(
        croissant,
        &CustomizationRequest {
            size: Some(Size::Venti),
            ..CustomizationRequest::default()
        },
        1,
    );

    assert!(matches!(
        result,
        Err(CartError::Customization(
            CustomizationError::UnsupportedOption { .. }
        ))
    ));
    assert!(cart.is_empty());

    Ok(())
}

#[test]
fn orders_progress_through_history() -> TestResult {
    let catalog = catalog()?;
    let refresher = catalog
        .item("strawberry-refresher")
        .ok_or("refresher missing")?;
    let mut cart = Cart::new(catalog.prices().clone());
    let clock = ManualClock::new("2026-05-04T09:30:00Z".parse()?);

    cart.add(refresher, &CustomizationRequest::default(), 1)?;

    let mut history = OrderHistory::new();
    let order = Order::place(&cart, details(&catalog, "riverside"), clock.now())?;
    let id = order.id();
    history.record(order);

    clock.advance(jiff::SignedDuration::from_mins(5));
    let changes = history.advance_due(clock.now())?;

    assert_eq!(
        changes,
        [(id, OrderStatus::Preparing), (id, OrderStatus::Ready)]
    );

    history.update_status(id, OrderStatus::PickedUp, clock.now())?;

    assert_eq!(history.active().count(), 0);
    assert_eq!(history.past().count(), 1);

    Ok(())
}
