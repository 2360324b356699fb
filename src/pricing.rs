//! Pricing rules
//!
//! Pure functions for staffing fees and cart totals. All arithmetic stays in
//! [`Decimal`] space; rounding to two decimal places happens only at display
//! time and when building the wire `totalAmount`.

use rust_decimal::{Decimal, RoundingStrategy};

use crate::cart::models::CartLine;

/// Cost of one billable staff member, in currency units.
pub const UNIT_STAFF_COST: u32 = 260;

/// Staffing fee for a booking: one staff member per started block of 10
/// guests, at [`UNIT_STAFF_COST`] each. Zero guests incur no fee.
pub fn staffing_fee(guest_count: u32) -> Decimal {
    if guest_count == 0 {
        return Decimal::ZERO;
    }

    Decimal::from(guest_count.div_ceil(10) * UNIT_STAFF_COST)
}

/// Menu cost of one line: per-guest unit price times the guest count.
pub fn line_menu_cost(unit_price_per_guest: Decimal, guest_count: u32) -> Decimal {
    unit_price_per_guest * Decimal::from(guest_count)
}

/// Total for a single line: its cached menu cost plus its staffing fee.
pub fn line_total(line: &CartLine) -> Decimal {
    line.price + line.waiter_fee
}

/// Subtotal over all lines: `(price + waiter_fee) * quantity`, summed.
pub fn cart_subtotal(lines: &[CartLine]) -> Decimal {
    lines
        .iter()
        .map(|line| (line.price + line.waiter_fee) * Decimal::from(line.quantity))
        .sum()
}

/// Flat 10% service charge, applied once to the aggregate subtotal.
pub fn service_charge(subtotal: Decimal) -> Decimal {
    subtotal * Decimal::new(1, 1)
}

/// Sum of staffing fees across all lines, weighted by quantity.
pub fn waiter_fee_total(lines: &[CartLine]) -> Decimal {
    lines
        .iter()
        .map(|line| line.waiter_fee * Decimal::from(line.quantity))
        .sum()
}

/// Grand total as displayed: subtotal + service charge + staffing fees.
///
/// The staffing fee is counted twice here, once inside the subtotal and once
/// as its own component. That matches the shipped breakdown; see DESIGN.md.
pub fn cart_grand_total(lines: &[CartLine]) -> Decimal {
    let subtotal = cart_subtotal(lines);

    subtotal + service_charge(subtotal) + waiter_fee_total(lines)
}

/// Round a currency value to two decimal places, half away from zero.
pub fn round2(value: Decimal) -> Decimal {
    value.round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero)
}
