//! Cart

use rusty_money::{Money, iso::Currency};
use thiserror::Error;

use crate::{
    catalog::items::MenuItem,
    customization::{CustomizationError, CustomizationRequest, DrinkCustomization, normalize},
    ids::TypedUuid,
    naming::generate_name,
    pricing::{PriceTable, PricingError, compute_price, line_total, sum, tax_on},
};

/// Identifies one line in a cart. Adding the same drink twice yields two ids.
pub type LineId = TypedUuid<CartLine>;

/// Errors raised by cart operations. A failed operation leaves the cart untouched.
#[derive(Debug, Error, PartialEq)]
pub enum CartError {
    /// Lines are added with a quantity of at least one.
    #[error("quantity must be at least 1")]
    InvalidQuantity,

    /// No line with this id.
    #[error("no cart line with id {0}")]
    LineNotFound(LineId),

    /// The customization could not be normalized.
    #[error(transparent)]
    Customization(#[from] CustomizationError),

    /// The customization could not be priced.
    #[error(transparent)]
    Pricing(#[from] PricingError),
}

/// One customized item in the cart, with its price frozen when it was added or last edited.
#[derive(Debug, Clone, PartialEq)]
pub struct CartLine {
    id: LineId,
    item: MenuItem,
    customization: DrinkCustomization,
    quantity: u32,
    unit_price: Money<'static, Currency>,
    name: String,
}

impl CartLine {
    /// Line id
    pub fn id(&self) -> LineId {
        self.id
    }

    /// The menu item this line was built from
    pub fn item(&self) -> &MenuItem {
        &self.item
    }

    /// Normalized customization
    pub fn customization(&self) -> &DrinkCustomization {
        &self.customization
    }

    /// How many of this drink
    pub fn quantity(&self) -> u32 {
        self.quantity
    }

    /// Price of one, frozen at add or edit time
    pub fn unit_price(&self) -> Money<'static, Currency> {
        self.unit_price
    }

    /// Generated display name
    pub fn name(&self) -> &str {
        &self.name
    }

    /// `unit_price × quantity`.
    ///
    /// # Errors
    ///
    /// Returns [`PricingError::Overflow`] if the product cannot be represented.
    pub fn total(&self) -> Result<Money<'static, Currency>, PricingError> {
        line_total(self.unit_price, self.quantity)
    }
}

/// Subtotal, tax and total of a cart at one moment.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CartTotals {
    /// Σ unit price × quantity
    pub subtotal: Money<'static, Currency>,
    /// Sales tax on the subtotal
    pub tax: Money<'static, Currency>,
    /// Subtotal plus tax
    pub total: Money<'static, Currency>,
}

/// Ordered cart lines. Insertion order is display order; lines are never merged.
#[derive(Debug, Clone)]
pub struct Cart {
    lines: Vec<CartLine>,
    prices: PriceTable,
}

impl Cart {
    /// An empty cart priced with `prices`.
    pub fn new(prices: PriceTable) -> Self {
        Self {
            lines: Vec::new(),
            prices,
        }
    }

    /// Normalize, price and name a drink, then append it as a new line.
    ///
    /// # Errors
    ///
    /// - [`CartError::InvalidQuantity`]: `quantity` is zero.
    /// - [`CartError::Customization`]: the request does not fit the item.
    /// - [`CartError::Pricing`]: the drink cannot be priced.
    pub fn add(
        &mut self,
        item: &MenuItem,
        request: &CustomizationRequest,
        quantity: u32,
    ) -> Result<LineId, CartError> {
        if quantity == 0 {
            return Err(CartError::InvalidQuantity);
        }

        let (customization, unit_price, name) = self.quote(item, request)?;
        let id = LineId::generate();

        self.lines.push(CartLine {
            id,
            item: item.clone(),
            customization,
            quantity,
            unit_price,
            name,
        });

        Ok(id)
    }

    /// Remove a line. Removing an absent line does nothing.
    pub fn remove(&mut self, id: LineId) {
        self.lines.retain(|line| line.id != id);
    }

    /// Set a line's quantity; zero removes the line. The unit price is unchanged.
    ///
    /// # Errors
    ///
    /// Returns [`CartError::LineNotFound`] when setting a non-zero quantity on an absent line.
    pub fn update_quantity(&mut self, id: LineId, quantity: u32) -> Result<(), CartError> {
        if quantity == 0 {
            self.remove(id);
            return Ok(());
        }

        let line = self.line_mut(id)?;
        line.quantity = quantity;

        Ok(())
    }

    /// Replace a line's customization, re-pricing and re-naming it from the line's own menu item.
    /// The quantity is unchanged.
    ///
    /// # Errors
    ///
    /// - [`CartError::LineNotFound`]: no line has this id.
    /// - [`CartError::Customization`]: the request does not fit the item.
    /// - [`CartError::Pricing`]: the drink cannot be priced.
    pub fn update_customization(
        &mut self,
        id: LineId,
        request: &CustomizationRequest,
    ) -> Result<(), CartError> {
        let item = &self.line(id).ok_or(CartError::LineNotFound(id))?.item;
        let (customization, unit_price, name) = self.quote(item, request)?;

        let line = self.line_mut(id)?;
        line.customization = customization;
        line.unit_price = unit_price;
        line.name = name;

        Ok(())
    }

    /// Remove every line.
    pub fn clear(&mut self) {
        self.lines.clear();
    }

    /// Lines in display order
    pub fn lines(&self) -> &[CartLine] {
        &self.lines
    }

    /// Look up a line.
    pub fn line(&self, id: LineId) -> Option<&CartLine> {
        self.lines.iter().find(|line| line.id == id)
    }

    /// Number of lines
    pub fn len(&self) -> usize {
        self.lines.len()
    }

    /// Whether the cart has no lines
    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    /// Total quantity across lines
    pub fn item_count(&self) -> u32 {
        self.lines.iter().map(|line| line.quantity).sum()
    }

    /// Currency every line is priced in
    pub fn currency(&self) -> &'static Currency {
        self.prices.currency()
    }

    /// Price table used for new and edited lines
    pub fn prices(&self) -> &PriceTable {
        &self.prices
    }

    /// Σ unit price × quantity over current lines.
    ///
    /// # Errors
    ///
    /// Returns a [`PricingError`] on overflow or currency mismatch.
    pub fn subtotal(&self) -> Result<Money<'static, Currency>, PricingError> {
        let line_totals = self
            .lines
            .iter()
            .map(CartLine::total)
            .collect::<Result<Vec<_>, _>>()?;

        sum(line_totals, self.currency())
    }

    /// Sales tax on the subtotal, rounded to whole minor units.
    ///
    /// # Errors
    ///
    /// Returns a [`PricingError`] if the subtotal cannot be computed.
    pub fn tax(&self) -> Result<Money<'static, Currency>, PricingError> {
        tax_on(self.subtotal()?)
    }

    /// Subtotal plus tax.
    ///
    /// # Errors
    ///
    /// Returns a [`PricingError`] if the subtotal cannot be computed.
    pub fn total(&self) -> Result<Money<'static, Currency>, PricingError> {
        Ok(self.totals()?.total)
    }

    /// Subtotal, tax and total, computed together.
    ///
    /// # Errors
    ///
    /// Returns a [`PricingError`] if the subtotal cannot be computed.
    pub fn totals(&self) -> Result<CartTotals, PricingError> {
        let subtotal = self.subtotal()?;
        let tax = tax_on(subtotal)?;
        let total = subtotal.add(tax)?;

        Ok(CartTotals {
            subtotal,
            tax,
            total,
        })
    }

    fn quote(
        &self,
        item: &MenuItem,
        request: &CustomizationRequest,
    ) -> Result<(DrinkCustomization, Money<'static, Currency>, String), CartError> {
        let customization = normalize(item, request)?;
        let unit_price = compute_price(&self.prices, item.price(), &customization)?;
        let name = generate_name(item, &customization);

        Ok((customization, unit_price, name))
    }

    fn line_mut(&mut self, id: LineId) -> Result<&mut CartLine, CartError> {
        self.lines
            .iter_mut()
            .find(|line| line.id == id)
            .ok_or(CartError::LineNotFound(id))
    }
}

#[cfg(test)]
mod tests {
    use rusty_money::iso::USD;
    use testresult::TestResult;

    use crate::catalog::{
        CatalogError,
        items::Category,
        options::{MilkType, Size, SyrupFlavor, Temperature},
    };
    use crate::customization::SyrupSelection;

    use super::*;

    fn latte() -> Result<MenuItem, CatalogError> {
        MenuItem::builder("latte", "Latte", Category::Espresso, Money::from_minor(325, USD))
            .sizes([Size::Tall, Size::Grande, Size::Venti])
            .temperatures([Temperature::Hot, Temperature::Iced])
            .build()
    }

    fn usd(minor: i64) -> Money<'static, Currency> {
        Money::from_minor(minor, USD)
    }

    fn cart() -> Cart {
        Cart::new(PriceTable::standard())
    }

    #[test]
    fn add_freezes_price_and_name() -> TestResult {
        let mut cart = cart();
        let request = CustomizationRequest {
            milk: Some(MilkType::Oat),
            ..CustomizationRequest::default()
        };

        let id = cart.add(&latte()?, &request, 2)?;
        let line = cart.line(id).ok_or("line missing")?;

        assert_eq!(line.unit_price(), usd(455));
        assert_eq!(line.name(), "Grande Oatmilk Latte");
        assert_eq!(line.quantity(), 2);
        assert_eq!(cart.subtotal()?, usd(910));

        Ok(())
    }

    #[test]
    fn same_drink_twice_makes_two_lines() -> TestResult {
        let mut cart = cart();
        let item = latte()?;

        let first = cart.add(&item, &CustomizationRequest::default(), 1)?;
        let second = cart.add(&item, &CustomizationRequest::default(), 1)?;

        assert_ne!(first, second);
        assert_eq!(cart.len(), 2);
        assert_eq!(cart.item_count(), 2);

        Ok(())
    }

    #[test]
    fn zero_quantity_add_is_rejected() -> TestResult {
        let mut cart = cart();

        let result = cart.add(&latte()?, &CustomizationRequest::default(), 0);

        assert_eq!(result, Err(CartError::InvalidQuantity));
        assert!(cart.is_empty());

        Ok(())
    }

    #[test]
    fn update_quantity_to_zero_removes_the_line() -> TestResult {
        let mut cart = cart();
        let id = cart.add(&latte()?, &CustomizationRequest::default(), 1)?;

        cart.update_quantity(id, 0)?;

        assert!(cart.is_empty());

        Ok(())
    }

    #[test]
    fn update_quantity_keeps_unit_price() -> TestResult {
        let mut cart = cart();
        let id = cart.add(&latte()?, &CustomizationRequest::default(), 1)?;

        cart.update_quantity(id, 3)?;

        let line = cart.line(id).ok_or("line missing")?;
        assert_eq!(line.unit_price(), usd(375));
        assert_eq!(cart.subtotal()?, usd(1125));

        Ok(())
    }

    #[test]
    fn update_quantity_on_missing_line_is_an_error() {
        let mut cart = cart();
        let id = LineId::generate();

        assert_eq!(cart.update_quantity(id, 2), Err(CartError::LineNotFound(id)));
        assert_eq!(cart.update_quantity(id, 0), Ok(()));
    }

    #[test]
    fn remove_missing_line_is_a_no_op() -> TestResult {
        let mut cart = cart();
        cart.add(&latte()?, &CustomizationRequest::default(), 1)?;

        cart.remove(LineId::generate());

        assert_eq!(cart.len(), 1);

        Ok(())
    }

    #[test]
    fn update_customization_reprices_and_renames_in_place() -> TestResult {
        let mut cart = cart();
        let item = latte()?;
        let first = cart.add(&item, &CustomizationRequest::default(), 2)?;
        let second = cart.add(&item, &CustomizationRequest::default(), 1)?;

        cart.update_customization(
            first,
            &CustomizationRequest {
                size: Some(Size::Venti),
                temperature: Some(Temperature::Iced),
                syrups: Some(vec![
                    SyrupSelection {
                        flavor: SyrupFlavor::Vanilla,
                        pumps: 2,
                    },
                    SyrupSelection {
                        flavor: SyrupFlavor::Caramel,
                        pumps: 2,
                    },
                ]),
                ..CustomizationRequest::default()
            },
        )?;

        let ids: Vec<_> = cart.lines().iter().map(CartLine::id).collect();
        assert_eq!(ids, [first, second]);

        let line = cart.line(first).ok_or("line missing")?;
        assert_eq!(line.quantity(), 2);
        assert_eq!(line.unit_price(), usd(485));
        assert_eq!(line.name(), "Venti Iced Latte");

        Ok(())
    }

    #[test]
    fn failed_update_leaves_line_untouched() -> TestResult {
        let mut cart = cart();
        let id = cart.add(&latte()?, &CustomizationRequest::default(), 1)?;
        let before = cart.line(id).cloned();

        let result = cart.update_customization(
            id,
            &CustomizationRequest {
                temperature: Some(Temperature::Blended),
                ..CustomizationRequest::default()
            },
        );

        assert!(matches!(
            result,
            Err(CartError::Customization(
                CustomizationError::UnsupportedOption { .. }
            ))
        ));
        assert_eq!(cart.line(id).cloned(), before);

        Ok(())
    }

    #[test]
    fn update_customization_on_missing_line_is_an_error() {
        let mut cart = cart();
        let id = LineId::generate();

        let result = cart.update_customization(id, &CustomizationRequest::default());

        assert_eq!(result, Err(CartError::LineNotFound(id)));
    }

    #[test]
    fn totals_of_empty_cart_are_zero() -> TestResult {
        let totals = cart().totals()?;

        assert_eq!(totals.subtotal, usd(0));
        assert_eq!(totals.tax, usd(0));
        assert_eq!(totals.total, usd(0));

        Ok(())
    }

    #[test]
    fn clear_empties_the_cart() -> TestResult {
        let mut cart = cart();
        cart.add(&latte()?, &CustomizationRequest::default(), 1)?;

        cart.clear();

        assert!(cart.is_empty());
        assert_eq!(cart.total()?, usd(0));

        Ok(())
    }
}
