use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// One tier of the monthly progressive table.
///
/// Tax for a base inside this tier is `base × rate − deduction` (the
/// "parcela a deduzir" quick-deduction form).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TaxBracket {
    /// Inclusive upper bound of the tier. `None` marks the open top tier.
    pub upper_bound: Option<Decimal>,
    pub rate: Decimal,
    pub deduction: Decimal,
}

impl TaxBracket {
    pub fn new(
        upper_bound: Option<Decimal>,
        rate: Decimal,
        deduction: Decimal,
    ) -> Self {
        Self {
            upper_bound,
            rate,
            deduction,
        }
    }

    /// Returns true when `base` falls at or below this tier's upper bound.
    pub fn covers(
        &self,
        base: Decimal,
    ) -> bool {
        self.upper_bound.is_none_or(|upper| base <= upper)
    }
}
