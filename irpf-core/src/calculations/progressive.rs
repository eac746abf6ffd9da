//! Progressive bracket lookup.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::TaxBracket;
use crate::calculations::common::rounded_non_negative;

/// The bracket matched for a taxable base and the tax it produces.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct BracketLookup {
    pub rate: Decimal,
    pub deduction: Decimal,
    /// `max(0, base × rate − deduction)`, rounded to cents.
    pub gross_tax: Decimal,
}

impl BracketLookup {
    const ZERO: Self = Self {
        rate: Decimal::ZERO,
        deduction: Decimal::ZERO,
        gross_tax: Decimal::ZERO,
    };
}

/// Applies the progressive table to a non-negative taxable base.
///
/// Scans `brackets` in order and uses the first one whose upper bound is at
/// or above `base`, so a base sitting exactly on a boundary belongs to the
/// lower bracket. If no bracket matches (a table without an open top tier)
/// the last bracket is used; an empty table yields zero tax.
///
/// ```
/// use rust_decimal_macros::dec;
/// use irpf_core::TaxTable;
/// use irpf_core::calculations::apply_progressive_table;
///
/// let table = TaxTable::irpf_2026();
/// let lookup = apply_progressive_table(&table.brackets, dec!(5160.81));
///
/// assert_eq!(lookup.rate, dec!(0.275));
/// assert_eq!(lookup.deduction, dec!(908.73));
/// assert_eq!(lookup.gross_tax, dec!(510.49));
/// ```
pub fn apply_progressive_table(
    brackets: &[TaxBracket],
    base: Decimal,
) -> BracketLookup {
    let Some(bracket) = brackets
        .iter()
        .find(|b| b.covers(base))
        .or_else(|| brackets.last())
    else {
        return BracketLookup::ZERO;
    };

    BracketLookup {
        rate: bracket.rate,
        deduction: bracket.deduction,
        gross_tax: rounded_non_negative(base * bracket.rate - bracket.deduction),
    }
}
