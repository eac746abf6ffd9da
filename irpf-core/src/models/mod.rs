mod calculation_input;
mod calculation_result;
mod deduction_method;
mod tax_bracket;
mod tax_table;

pub use calculation_input::{CalculationInput, IrpfError};
pub use calculation_result::{CalculationResult, MethodComparison, ReductionTier};
pub use deduction_method::DeductionMethod;
pub use tax_bracket::TaxBracket;
pub use tax_table::{ReductionRule, TaxTable, TaxTableError};
