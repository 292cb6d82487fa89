//! Receipt

use std::io;

use tabled::{
    builder::Builder,
    grid::config::HorizontalLine,
    settings::{
        Alignment, Color, Style, Theme,
        object::{Columns, Rows},
    },
};
use thiserror::Error;

use crate::{cart::CartLine, orders::Order, pricing::PricingError};

/// Errors that can occur when writing a receipt.
#[derive(Debug, Error)]
pub enum ReceiptError {
    /// A line total could not be computed.
    #[error(transparent)]
    Pricing(#[from] PricingError),

    /// IO error
    #[error("failed to write receipt")]
    Io(#[from] io::Error),
}

/// Write a receipt table for `order`, followed by its totals.
///
/// # Errors
///
/// Returns a [`ReceiptError`] if a line total overflows or `out` cannot be written.
pub fn write_receipt(mut out: impl io::Write, order: &Order) -> Result<(), ReceiptError> {
    let mut builder = Builder::default();

    builder.push_record(["", "Item", "Details", "Qty", "Each", "Total"]);

    for (idx, line) in order.lines().iter().enumerate() {
        builder.push_record([
            format!("#{:<3}", idx + 1),
            line.name().to_string(),
            line_details(line).join("\n"),
            line.quantity().to_string(),
            format!("{}", line.unit_price()),
            format!("{}", line.total()?),
        ]);
    }

    let mut table = builder.build();
    let mut theme = Theme::from(Style::modern_rounded());
    let separator = HorizontalLine::new(Some('─'), Some('┼'), Some('├'), Some('┤'));

    theme.remove_horizontal_lines();
    theme.insert_horizontal_line(1, separator);

    table.with(theme);
    table.modify(Rows::first(), Color::BOLD);
    table.modify(Columns::new(3..6), Alignment::right());

    writeln!(out, "\n{table}")?;

    let location = order.location();

    let summary = [
        ("Subtotal:", format!("{}", order.subtotal())),
        ("Tax:", format!("{}", order.tax())),
        ("Tip:", format!("{}", order.tip())),
        ("Total:", format!("{}", order.total())),
    ];

    let label_width = summary.iter().map(|(label, _)| label.len()).max().unwrap_or(0);
    let value_width = summary.iter().map(|(_, value)| value.len()).max().unwrap_or(0);

    for (label, value) in &summary {
        writeln!(out, " {label:>label_width$}  {value:>value_width$}")?;
    }

    writeln!(out)?;
    writeln!(out, " Order {} for {}", order.id(), order.pickup_name())?;
    writeln!(out, " Pickup at {} ({})", location.name, location.address)?;
    writeln!(out, " Paid with {}", order.payment())?;
    writeln!(out, " Stars earned: {}", order.loyalty_stars())?;

    Ok(())
}

/// One entry per modification on the line's drink.
fn line_details(line: &CartLine) -> Vec<String> {
    let customization = line.customization();
    let mut details = Vec::new();

    if let Some(roast) = customization.espresso_roast() {
        details.push(format!("{roast} roast"));
    }

    details.extend(
        customization
            .syrups()
            .iter()
            .map(|syrup| format!("{} pumps {}", syrup.pumps, syrup.flavor)),
    );

    details.extend(
        customization
            .toppings()
            .iter()
            .map(|topping| format!("{} {}", topping.amount, topping.topping)),
    );

    details.extend(
        customization
            .sweeteners()
            .iter()
            .map(|sweetener| format!("{} x {}", sweetener.packets, sweetener.sweetener)),
    );

    if let Some(ice) = customization.ice_level() {
        details.push(format!("ice: {ice}"));
    }

    if let Some(instructions) = customization.instructions() {
        details.push(format!("\"{instructions}\""));
    }

    details
}
