use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::DeductionMethod;

/// Which branch of the Lei 15.270/2025 reduction applied.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ReductionTier {
    /// Gross income at or below the exemption ceiling: tax is cancelled.
    FullExemption,
    /// Gross income between the two ceilings: linear taper.
    Tapered,
    /// Gross income above the taper ceiling.
    NoReduction,
}

/// Breakdown of one method's monthly calculation.
///
/// All currency amounts are rounded to cents; `effective_rate` is the
/// unrounded quotient `net_tax / gross_income`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CalculationResult {
    pub method: DeductionMethod,
    pub gross_income: Decimal,

    // Deductions applied to reach the taxable base
    pub contribution_deduction: Decimal,
    pub dependent_deduction: Decimal,
    pub standard_discount: Decimal,
    pub taxable_base: Decimal,

    // Progressive table
    pub bracket_rate: Decimal,
    pub bracket_deduction: Decimal,
    pub gross_tax: Decimal,

    // Statutory reduction
    pub reduction_tier: ReductionTier,
    pub statutory_reduction: Decimal,

    pub net_tax: Decimal,
    pub effective_rate: Decimal,
}

/// Both methods side by side, plus the one that yields the lower tax.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MethodComparison {
    pub itemized: CalculationResult,
    pub simplified: CalculationResult,
    pub selected_method: DeductionMethod,
}

impl MethodComparison {
    /// The result for [`Self::selected_method`].
    pub fn selected_result(&self) -> &CalculationResult {
        self.result_for(self.selected_method)
    }

    pub fn result_for(
        &self,
        method: DeductionMethod,
    ) -> &CalculationResult {
        match method {
            DeductionMethod::Legal => &self.itemized,
            DeductionMethod::Simplified => &self.simplified,
        }
    }

    /// Tax saved by the selected method relative to the other one.
    pub fn savings(&self) -> Decimal {
        (self.itemized.net_tax - self.simplified.net_tax).abs()
    }
}
