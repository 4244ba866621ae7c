//! Spare-change calculation over outgoing transactions.

use crate::core::model::{Transaction, major_units};
use rust_decimal::prelude::ToPrimitive;
use rust_decimal::{Decimal, RoundingStrategy};

/// Intermediate precision used when converting minor units to major units.
const MAJOR_UNIT_SCALE: u32 = 4;

/// Round-up of a single amount, in major units.
fn round_up_of(minor_units: u64) -> Decimal {
    let major = major_units(minor_units)
        .round_dp_with_strategy(MAJOR_UNIT_SCALE, RoundingStrategy::MidpointAwayFromZero);
    major.ceil() - major
}

/// Sums the difference between each amount and the next whole major unit,
/// returning the total in minor units.
///
/// Whole-unit and missing amounts contribute nothing; an empty list yields 0.
pub fn calculate(transactions: &[Transaction]) -> u64 {
    let total: Decimal = transactions
        .iter()
        .map(|tx| round_up_of(tx.minor_units()))
        .sum();

    // Each transaction contributes at most 99 minor units.
    (total * Decimal::ONE_HUNDRED)
        .trunc()
        .to_u64()
        .unwrap_or_default()
}
