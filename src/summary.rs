//! Cart summary
//!
//! Totals breakdown for the cart view, plus its console rendering. This is
//! the only place currency values are rounded and formatted; everything
//! upstream stays in full-precision [`Decimal`] space.

use std::io;

use rust_decimal::Decimal;
use rusty_money::{Money, iso};
use tabled::{
    builder::Builder,
    settings::{Alignment, Color, Style, object::{Columns, Rows}},
};
use thiserror::Error;

use crate::{cart::models::CartLine, pricing};

/// Errors that can occur when writing the cart summary.
#[derive(Debug, Error)]
pub enum SummaryError {
    /// IO error
    #[error("IO error")]
    IO,
}

/// Totals breakdown as displayed in the cart view.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CartTotals {
    /// Subtotal over all lines: menu cost plus staffing fee, per quantity.
    pub subtotal: Decimal,

    /// Flat 10% service charge on the subtotal.
    pub service_charge: Decimal,

    /// Staffing fees summed again as their own display line.
    ///
    /// Already inside the subtotal too; the displayed grand total counts
    /// them twice on purpose (see [`pricing::cart_grand_total`]).
    pub waiter_fee_total: Decimal,

    /// Displayed grand total.
    pub grand_total: Decimal,
}

impl CartTotals {
    /// Compute the breakdown for the given lines.
    #[must_use]
    pub fn from_lines(lines: &[CartLine]) -> Self {
        let subtotal = pricing::cart_subtotal(lines);
        let service_charge = pricing::service_charge(subtotal);
        let waiter_fee_total = pricing::waiter_fee_total(lines);

        Self {
            subtotal,
            service_charge,
            waiter_fee_total,
            grand_total: subtotal + service_charge + waiter_fee_total,
        }
    }
}

/// Format a currency value for display: BRL, two decimal places.
#[must_use]
pub fn format_brl(value: Decimal) -> String {
    Money::from_decimal(pricing::round2(value), iso::BRL).to_string()
}

/// Write the cart breakdown: one row per line, then the totals.
///
/// # Errors
///
/// Returns an error if the summary cannot be written.
pub fn write_summary(mut out: impl io::Write, lines: &[CartLine]) -> Result<(), SummaryError> {
    let mut builder = Builder::default();

    builder.push_record(["Item", "Qtd", "Convidados", "Garçons", "Total"]);

    for line in lines {
        builder.push_record([
            line.title.clone(),
            line.quantity.to_string(),
            line.guest_count.to_string(),
            format_brl(line.waiter_fee),
            format_brl(pricing::line_total(line) * Decimal::from(line.quantity)),
        ]);
    }

    let mut table = builder.build();
    table.with(Style::sharp());
    table.modify(Rows::first(), Color::BOLD);
    table.modify(Columns::new(1..), Alignment::right());

    let totals = CartTotals::from_lines(lines);

    writeln!(out, "{table}").map_err(|_err| SummaryError::IO)?;
    writeln!(out, " Subtotal: {}", format_brl(totals.subtotal)).map_err(|_err| SummaryError::IO)?;
    writeln!(
        out,
        " Taxa de serviço (10%): {}",
        format_brl(totals.service_charge)
    )
    .map_err(|_err| SummaryError::IO)?;
    writeln!(
        out,
        " Adicional de garçons: {}",
        format_brl(totals.waiter_fee_total)
    )
    .map_err(|_err| SummaryError::IO)?;
    writeln!(out, " Total: {}", format_brl(totals.grand_total)).map_err(|_err| SummaryError::IO)?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use testresult::TestResult;

    use super::*;

    fn line(price: u32, quantity: u32, waiter_fee: u32) -> CartLine {
        CartLine {
            waiter_fee: Decimal::from(waiter_fee),
            ..CartLine::sample(1, price, 10, quantity)
        }
    }

    #[test]
    fn totals_break_down_the_displayed_components() {
        let lines = [line(100, 2, 50), line(30, 1, 0)];

        let totals = CartTotals::from_lines(&lines);

        assert_eq!(totals.subtotal, Decimal::from(330u32));
        assert_eq!(totals.service_charge, Decimal::from(33u32));
        assert_eq!(totals.waiter_fee_total, Decimal::from(100u32));
        assert_eq!(totals.grand_total, Decimal::from(463u32));
    }

    #[test]
    fn totals_of_an_empty_cart_are_zero() {
        let totals = CartTotals::from_lines(&[]);

        assert_eq!(totals.grand_total, Decimal::ZERO);
    }

    #[test]
    fn brl_formatting_uses_the_local_conventions() {
        let formatted = format_brl(Decimal::new(1234_56, 2));

        assert!(formatted.starts_with("R$"), "unexpected format: {formatted}");
        assert!(formatted.contains("234,56"), "unexpected format: {formatted}");
    }

    #[test]
    fn brl_formatting_rounds_to_two_places() {
        let formatted = format_brl(Decimal::new(10_005, 3));

        assert!(formatted.contains("10,01"), "unexpected format: {formatted}");
    }

    #[test]
    fn summary_lists_every_line_and_the_totals() -> TestResult {
        let lines = [line(100, 2, 50), line(30, 1, 0)];

        let mut rendered = Vec::new();
        write_summary(&mut rendered, &lines)?;
        let rendered = String::from_utf8(rendered)?;

        assert!(rendered.contains("Coquetel Corporativo"), "{rendered}");
        assert!(rendered.contains("Subtotal:"), "{rendered}");
        assert!(rendered.contains("Taxa de serviço (10%):"), "{rendered}");
        assert!(rendered.contains("Total:"), "{rendered}");

        Ok(())
    }
}
