//! Brazilian monthly IRPF withholding under the 2026 rules.
//!
//! ```
//! use rust_decimal_macros::dec;
//! use irpf_core::DeductionMethod;
//!
//! let comparison = irpf_core::compute(dec!(10000.00), dec!(0), 0).unwrap();
//!
//! assert_eq!(comparison.selected_method, DeductionMethod::Simplified);
//! assert_eq!(comparison.selected_result().net_tax, dec!(1674.29));
//! ```

pub mod calculations;
pub mod models;

use rust_decimal::Decimal;

pub use calculations::IrpfEngine;
pub use models::*;

/// Compares both methods using the canonical 2026 table.
///
/// # Errors
///
/// Returns [`IrpfError::InvalidInput`] for a negative income, contribution
/// or dependent count.
pub fn compute(
    gross_income: Decimal,
    contribution: Decimal,
    dependents: i32,
) -> Result<MethodComparison, IrpfError> {
    IrpfEngine::irpf_2026().compute(gross_income, contribution, dependents)
}
