//! Taxable-base computation for each [`DeductionMethod`].

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::calculations::common::{round_half_up, rounded_non_negative};
use crate::{CalculationInput, DeductionMethod, TaxTable};

/// Deductions taken by one method and the resulting taxable base.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeductionBreakdown {
    pub contribution_deduction: Decimal,
    pub dependent_deduction: Decimal,
    pub standard_discount: Decimal,
    /// Gross income minus the deductions above, floored at zero.
    pub taxable_base: Decimal,
}

/// Itemized base: `gross − contribution − dependents × dependent_deduction`.
pub fn itemized_deductions(
    input: &CalculationInput,
    dependent_deduction: Decimal,
) -> DeductionBreakdown {
    let contribution_deduction = round_half_up(input.social_security_contribution());
    let dependent_deduction =
        round_half_up(Decimal::from(input.dependent_count()) * dependent_deduction);

    DeductionBreakdown {
        contribution_deduction,
        dependent_deduction,
        standard_discount: Decimal::ZERO,
        taxable_base: rounded_non_negative(
            input.gross_income() - contribution_deduction - dependent_deduction,
        ),
    }
}

/// Simplified base: `gross − standard_discount`. The discount is a fixed
/// amount and replaces the contribution and dependent deductions.
pub fn simplified_deductions(
    input: &CalculationInput,
    standard_discount: Decimal,
) -> DeductionBreakdown {
    let standard_discount = round_half_up(standard_discount);

    DeductionBreakdown {
        contribution_deduction: Decimal::ZERO,
        dependent_deduction: Decimal::ZERO,
        standard_discount,
        taxable_base: rounded_non_negative(input.gross_income() - standard_discount),
    }
}

/// Dispatches to the deduction step for `method`.
pub fn deductions_for(
    method: DeductionMethod,
    input: &CalculationInput,
    table: &TaxTable,
) -> DeductionBreakdown {
    match method {
        DeductionMethod::Legal => itemized_deductions(input, table.dependent_deduction),
        DeductionMethod::Simplified => simplified_deductions(input, table.standard_discount),
    }
}
