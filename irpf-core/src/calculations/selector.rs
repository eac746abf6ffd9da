//! Automatic choice between the itemized and simplified methods.

use tracing::debug;

use crate::calculations::engine::IrpfEngine;
use crate::{CalculationInput, DeductionMethod, MethodComparison};

/// Runs the pipeline for both methods and keeps the lower net tax.
///
/// The comparison is non-strict: when both methods owe the same amount the
/// itemized (LEGAL) method is selected.
///
/// ```
/// use rust_decimal_macros::dec;
/// use irpf_core::{CalculationInput, DeductionMethod, IrpfEngine};
/// use irpf_core::calculations::select_best_method;
///
/// let engine = IrpfEngine::irpf_2026();
/// let input = CalculationInput::new(dec!(10000.00), dec!(0), 0).unwrap();
///
/// let comparison = select_best_method(&engine, &input);
///
/// assert_eq!(comparison.selected_method, DeductionMethod::Simplified);
/// assert_eq!(comparison.selected_result().net_tax, dec!(1674.29));
/// ```
pub fn select_best_method(
    engine: &IrpfEngine,
    input: &CalculationInput,
) -> MethodComparison {
    let itemized = engine.calculate(input, DeductionMethod::Legal);
    let simplified = engine.calculate(input, DeductionMethod::Simplified);

    let selected_method = if itemized.net_tax <= simplified.net_tax {
        DeductionMethod::Legal
    } else {
        DeductionMethod::Simplified
    };

    debug!(
        %selected_method,
        legal = %itemized.net_tax,
        simplified = %simplified.net_tax,
        "method selected"
    );

    MethodComparison {
        itemized,
        simplified,
        selected_method,
    }
}
