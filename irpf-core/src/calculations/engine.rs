//! Monthly IRPF calculation pipeline.
//!
//! One pipeline serves both deduction methods; the method only selects the
//! deduction step:
//!
//! | Step | Description |
//! |------|-------------|
//! | 1    | Deductions (itemized or simplified) and taxable base |
//! | 2    | Progressive table: bracket rate, bracket deduction, gross tax |
//! | 3    | Lei 15.270/2025 reduction, keyed on gross income |
//! | 4    | Net tax (step 2 − step 3) and effective rate |
//!
//! # Example
//!
//! ```
//! use rust_decimal_macros::dec;
//! use irpf_core::{DeductionMethod, IrpfEngine, TaxTable};
//!
//! let engine = IrpfEngine::new(TaxTable::irpf_2026()).unwrap();
//! let comparison = engine.compute(dec!(6000.00), dec!(649.60), 1).unwrap();
//!
//! assert_eq!(comparison.itemized.taxable_base, dec!(5160.81));
//! assert_eq!(comparison.itemized.net_tax, dec!(330.74));
//! assert_eq!(comparison.selected_method, DeductionMethod::Legal);
//! ```

use rust_decimal::Decimal;
use tracing::{debug, warn};

use crate::calculations::common::round_half_up;
use crate::calculations::deductions::deductions_for;
use crate::calculations::progressive::{BracketLookup, apply_progressive_table};
use crate::calculations::reduction::{StatutoryReduction, calculate_statutory_reduction};
use crate::calculations::selector::select_best_method;
use crate::{
    CalculationInput, CalculationResult, DeductionMethod, IrpfError, MethodComparison, TaxTable,
    TaxTableError,
};

/// Calculator bound to one validated [`TaxTable`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IrpfEngine {
    table: TaxTable,
}

impl IrpfEngine {
    /// Creates an engine after validating `table`.
    ///
    /// # Errors
    ///
    /// Returns [`TaxTableError`] when the table breaks one of the invariants
    /// checked by [`TaxTable::validate`].
    pub fn new(table: TaxTable) -> Result<Self, TaxTableError> {
        table.validate()?;
        debug!(year = table.year, brackets = table.brackets.len(), "tax table loaded");
        Ok(Self { table })
    }

    /// Engine for the canonical 2026 table.
    pub fn irpf_2026() -> Self {
        Self {
            table: TaxTable::irpf_2026(),
        }
    }

    pub fn table(&self) -> &TaxTable {
        &self.table
    }

    /// Validates raw values and compares both methods.
    ///
    /// # Errors
    ///
    /// Returns [`IrpfError::InvalidInput`] for a negative income,
    /// contribution or dependent count.
    pub fn compute(
        &self,
        gross_income: Decimal,
        contribution: Decimal,
        dependents: i32,
    ) -> Result<MethodComparison, IrpfError> {
        let input = CalculationInput::new(gross_income, contribution, dependents)?;
        Ok(self.select_best_method(&input))
    }

    /// Runs both methods on `input` and selects the lower net tax.
    pub fn select_best_method(
        &self,
        input: &CalculationInput,
    ) -> MethodComparison {
        select_best_method(self, input)
    }

    /// Runs the full pipeline for one method.
    pub fn calculate(
        &self,
        input: &CalculationInput,
        method: DeductionMethod,
    ) -> CalculationResult {
        if input.social_security_contribution() > input.gross_income() {
            warn!(
                gross_income = %input.gross_income(),
                contribution = %input.social_security_contribution(),
                "contribution exceeds gross income"
            );
        }

        let deductions = deductions_for(method, input, &self.table);
        let lookup = self.apply_progressive_table(deductions.taxable_base);
        let reduction = self.calculate_statutory_reduction(input.gross_income(), lookup.gross_tax);
        let net_tax = self.net_tax(lookup.gross_tax, reduction.amount);
        let effective_rate = self.effective_rate(net_tax, input.gross_income());

        debug!(
            %method,
            taxable_base = %deductions.taxable_base,
            gross_tax = %lookup.gross_tax,
            reduction = %reduction.amount,
            net_tax = %net_tax,
            "method calculated"
        );

        CalculationResult {
            method,
            gross_income: input.gross_income(),
            contribution_deduction: deductions.contribution_deduction,
            dependent_deduction: deductions.dependent_deduction,
            standard_discount: deductions.standard_discount,
            taxable_base: deductions.taxable_base,
            bracket_rate: lookup.rate,
            bracket_deduction: lookup.deduction,
            gross_tax: lookup.gross_tax,
            reduction_tier: reduction.tier,
            statutory_reduction: reduction.amount,
            net_tax,
            effective_rate,
        }
    }

    /// Looks up `base` in this engine's bracket table.
    pub fn apply_progressive_table(
        &self,
        base: Decimal,
    ) -> BracketLookup {
        apply_progressive_table(&self.table.brackets, base)
    }

    /// Applies this engine's reduction rule.
    pub fn calculate_statutory_reduction(
        &self,
        gross_income: Decimal,
        gross_tax: Decimal,
    ) -> StatutoryReduction {
        calculate_statutory_reduction(&self.table.reduction, gross_income, gross_tax)
    }

    fn net_tax(
        &self,
        gross_tax: Decimal,
        reduction: Decimal,
    ) -> Decimal {
        round_half_up(gross_tax - reduction)
    }

    fn effective_rate(
        &self,
        net_tax: Decimal,
        gross_income: Decimal,
    ) -> Decimal {
        if gross_income > Decimal::ZERO {
            net_tax / gross_income
        } else {
            Decimal::ZERO
        }
    }
}

impl Default for IrpfEngine {
    fn default() -> Self {
        Self::irpf_2026()
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use rust_decimal_macros::dec;

    use super::*;
    use crate::{ReductionTier, TaxBracket};

    fn input(
        gross: Decimal,
        contribution: Decimal,
        dependents: i32,
    ) -> CalculationInput {
        CalculationInput::new(gross, contribution, dependents).unwrap()
    }

    // =========================================================================
    // new tests
    // =========================================================================

    #[test]
    fn new_rejects_invalid_table() {
        let table = TaxTable::irpf_2026().with_brackets(vec![]);

        assert_eq!(IrpfEngine::new(table), Err(TaxTableError::NoBrackets));
    }

    #[test]
    fn default_engine_uses_2026_table() {
        assert_eq!(IrpfEngine::default().table(), &TaxTable::irpf_2026());
    }

    // =========================================================================
    // calculate tests
    // =========================================================================

    #[test]
    fn calculate_itemized_scenario() {
        let engine = IrpfEngine::irpf_2026();

        let result = engine.calculate(&input(dec!(6000.00), dec!(649.60), 1), DeductionMethod::Legal);

        assert_eq!(result.method, DeductionMethod::Legal);
        assert_eq!(result.contribution_deduction, dec!(649.60));
        assert_eq!(result.dependent_deduction, dec!(189.59));
        assert_eq!(result.standard_discount, dec!(0));
        assert_eq!(result.taxable_base, dec!(5160.81));
        assert_eq!(result.bracket_rate, dec!(0.275));
        assert_eq!(result.bracket_deduction, dec!(908.73));
        // 5160.81 * 0.275 - 908.73 = 510.49275
        assert_eq!(result.gross_tax, dec!(510.49));
        assert_eq!(result.reduction_tier, ReductionTier::Tapered);
        assert_eq!(result.statutory_reduction, dec!(179.75));
        assert_eq!(result.net_tax, dec!(330.74));
        assert_eq!(result.effective_rate, dec!(330.74) / dec!(6000.00));
    }

    #[test]
    fn calculate_simplified_scenario() {
        let engine = IrpfEngine::irpf_2026();

        let result =
            engine.calculate(&input(dec!(6000.00), dec!(649.60), 1), DeductionMethod::Simplified);

        assert_eq!(result.standard_discount, dec!(607.20));
        assert_eq!(result.taxable_base, dec!(5392.80));
        // 5392.80 * 0.275 - 908.73 = 574.29
        assert_eq!(result.gross_tax, dec!(574.29));
        assert_eq!(result.statutory_reduction, dec!(179.75));
        assert_eq!(result.net_tax, dec!(394.54));
    }

    #[test]
    fn calculate_low_income_is_fully_exempt() {
        let engine = IrpfEngine::irpf_2026();

        let result = engine.calculate(&input(dec!(5000.00), dec!(0), 0), DeductionMethod::Legal);

        // 5000 * 0.275 - 908.73 = 466.27, cancelled by the reduction
        assert_eq!(result.gross_tax, dec!(466.27));
        assert_eq!(result.reduction_tier, ReductionTier::FullExemption);
        assert_eq!(result.statutory_reduction, dec!(466.27));
        assert_eq!(result.net_tax, dec!(0));
        assert_eq!(result.effective_rate, dec!(0));
    }

    #[test]
    fn calculate_high_income_has_no_reduction() {
        let engine = IrpfEngine::irpf_2026();

        let result = engine.calculate(&input(dec!(7350.01), dec!(0), 0), DeductionMethod::Legal);

        assert_eq!(result.reduction_tier, ReductionTier::NoReduction);
        assert_eq!(result.statutory_reduction, dec!(0));
        assert_eq!(result.net_tax, result.gross_tax);
    }

    #[test]
    fn calculate_zero_income() {
        let engine = IrpfEngine::irpf_2026();

        let result = engine.calculate(&input(dec!(0), dec!(0), 0), DeductionMethod::Simplified);

        assert_eq!(result.taxable_base, dec!(0));
        assert_eq!(result.gross_tax, dec!(0));
        assert_eq!(result.net_tax, dec!(0));
        assert_eq!(result.effective_rate, dec!(0));
    }

    #[test]
    fn calculate_contribution_above_income_floors_base() {
        let engine = IrpfEngine::irpf_2026();

        let result = engine.calculate(&input(dec!(1000.00), dec!(1500.00), 0), DeductionMethod::Legal);

        assert_eq!(result.taxable_base, dec!(0));
        assert_eq!(result.net_tax, dec!(0));
    }

    #[test]
    fn calculate_uses_injected_table() {
        let table = TaxTable::irpf_2026().with_brackets(vec![
            TaxBracket::new(Some(dec!(1000)), dec!(0), dec!(0)),
            TaxBracket::new(None, dec!(0.10), dec!(100)),
        ]);
        let engine = IrpfEngine::new(table).unwrap();

        let result = engine.calculate(&input(dec!(9000.00), dec!(0), 0), DeductionMethod::Legal);

        // 9000 * 0.10 - 100 = 800, no reduction above 7350
        assert_eq!(result.gross_tax, dec!(800.00));
        assert_eq!(result.net_tax, dec!(800.00));
    }

    #[test]
    fn net_tax_identity_holds_across_incomes() {
        let engine = IrpfEngine::irpf_2026();
        let mut gross = dec!(0);
        while gross <= dec!(15000) {
            for method in DeductionMethod::all() {
                let result = engine.calculate(&input(gross, dec!(300), 2), *method);
                assert!(result.statutory_reduction >= dec!(0));
                assert!(result.statutory_reduction <= result.gross_tax);
                assert_eq!(result.net_tax, result.gross_tax - result.statutory_reduction);
                assert!(result.net_tax >= dec!(0));
            }
            gross += dec!(211.17);
        }
    }

    // =========================================================================
    // compute tests
    // =========================================================================

    #[test]
    fn compute_rejects_negative_dependents() {
        let engine = IrpfEngine::irpf_2026();

        let result = engine.compute(dec!(6000), dec!(0), -2);

        assert!(matches!(
            result,
            Err(IrpfError::InvalidInput {
                field: "dependent_count",
                ..
            })
        ));
    }

    #[test]
    fn compute_is_idempotent() {
        let engine = IrpfEngine::irpf_2026();

        let first = engine.compute(dec!(7123.45), dec!(781.38), 2).unwrap();
        let second = engine.compute(dec!(7123.45), dec!(781.38), 2).unwrap();

        assert_eq!(first, second);
    }
}
