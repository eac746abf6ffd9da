//! Tax-year constants for the monthly IRPF calculation.
//!
//! A [`TaxTable`] bundles the progressive bracket table with the deduction
//! constants and the Lei 15.270/2025 reduction rule. It is plain data so it
//! can be deserialized from a TOML file for a different tax year.

use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::TaxBracket;

/// Errors found while validating a [`TaxTable`].
#[derive(Debug, Error, PartialEq, Eq)]
pub enum TaxTableError {
    #[error("tax table has no brackets")]
    NoBrackets,

    /// Only the last bracket may be open-ended, and it must be.
    #[error("last bracket must be unbounded")]
    BoundedTopBracket,

    #[error("bracket {index} is unbounded but is not the last bracket")]
    UnboundedInnerBracket { index: usize },

    #[error("bracket {index} upper bound {upper_bound} does not exceed the previous bound")]
    UnorderedBrackets { index: usize, upper_bound: Decimal },

    #[error("bracket {index} rate must be in [0, 1), got {rate}")]
    InvalidRate { index: usize, rate: Decimal },

    #[error("bracket {index} deduction must be non-negative, got {deduction}")]
    NegativeBracketDeduction { index: usize, deduction: Decimal },

    #[error("{field} must be non-negative, got {value}")]
    NegativeConstant { field: &'static str, value: Decimal },

    #[error("taper ceiling {taper_ceiling} is below exemption ceiling {exemption_ceiling}")]
    InvertedReductionRange {
        exemption_ceiling: Decimal,
        taper_ceiling: Decimal,
    },
}

/// Parameters of the statutory reduction introduced by Lei 15.270/2025.
///
/// Up to `exemption_ceiling` the reduction cancels the tax entirely. Between
/// the two ceilings it tapers as `taper_constant − taper_factor × gross`.
/// Above `taper_ceiling` there is no reduction.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReductionRule {
    pub exemption_ceiling: Decimal,
    pub taper_ceiling: Decimal,
    pub taper_constant: Decimal,
    pub taper_factor: Decimal,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TaxTable {
    pub year: i32,
    pub brackets: Vec<TaxBracket>,
    /// Monthly deduction per dependent (itemized method).
    pub dependent_deduction: Decimal,
    /// Flat monthly discount replacing itemized deductions (simplified method).
    pub standard_discount: Decimal,
    pub reduction: ReductionRule,
}

impl TaxTable {
    /// The monthly table in force from January 2026 (IN RFB 2.299/2025,
    /// Anexo II) with the Lei 15.270/2025 reduction.
    ///
    /// ```
    /// use rust_decimal_macros::dec;
    /// use irpf_core::TaxTable;
    ///
    /// let table = TaxTable::irpf_2026();
    ///
    /// assert_eq!(table.brackets.len(), 5);
    /// assert_eq!(table.standard_discount, dec!(607.20));
    /// assert!(table.validate().is_ok());
    /// ```
    pub fn irpf_2026() -> Self {
        Self {
            year: 2026,
            brackets: vec![
                TaxBracket::new(Some(dec!(2428.80)), dec!(0.000), dec!(0.00)),
                TaxBracket::new(Some(dec!(2826.65)), dec!(0.075), dec!(182.16)),
                TaxBracket::new(Some(dec!(3751.05)), dec!(0.150), dec!(394.16)),
                TaxBracket::new(Some(dec!(4664.68)), dec!(0.225), dec!(675.49)),
                TaxBracket::new(None, dec!(0.275), dec!(908.73)),
            ],
            dependent_deduction: dec!(189.59),
            // 25% of the first bracket's upper bound (2428.80).
            standard_discount: dec!(607.20),
            reduction: ReductionRule {
                exemption_ceiling: dec!(5000.00),
                taper_ceiling: dec!(7350.00),
                taper_constant: dec!(978.62),
                taper_factor: dec!(0.133145),
            },
        }
    }

    /// Replaces the bracket list, keeping every other constant.
    pub fn with_brackets(
        mut self,
        brackets: Vec<TaxBracket>,
    ) -> Self {
        self.brackets = brackets;
        self
    }

    /// Checks the structural invariants the calculation pipeline relies on.
    ///
    /// # Errors
    ///
    /// Returns [`TaxTableError`] if:
    /// - the bracket list is empty
    /// - the last bracket is bounded, or an inner bracket is unbounded
    /// - upper bounds are not strictly increasing
    /// - a rate is outside `[0, 1)` or a bracket deduction is negative
    /// - a deduction or reduction constant is negative
    /// - the taper ceiling is below the exemption ceiling
    pub fn validate(&self) -> Result<(), TaxTableError> {
        let last = self.brackets.len().checked_sub(1).ok_or(TaxTableError::NoBrackets)?;

        let mut previous: Option<Decimal> = None;
        for (index, bracket) in self.brackets.iter().enumerate() {
            match bracket.upper_bound {
                None if index != last => {
                    return Err(TaxTableError::UnboundedInnerBracket { index });
                }
                None => {}
                Some(_) if index == last => return Err(TaxTableError::BoundedTopBracket),
                Some(upper_bound) => {
                    if previous.is_some_and(|p| upper_bound <= p) {
                        return Err(TaxTableError::UnorderedBrackets { index, upper_bound });
                    }
                    previous = Some(upper_bound);
                }
            }

            if bracket.rate < Decimal::ZERO || bracket.rate >= Decimal::ONE {
                return Err(TaxTableError::InvalidRate {
                    index,
                    rate: bracket.rate,
                });
            }
            if bracket.deduction < Decimal::ZERO {
                return Err(TaxTableError::NegativeBracketDeduction {
                    index,
                    deduction: bracket.deduction,
                });
            }
        }

        let constants = [
            ("dependent_deduction", self.dependent_deduction),
            ("standard_discount", self.standard_discount),
            ("reduction.exemption_ceiling", self.reduction.exemption_ceiling),
            ("reduction.taper_ceiling", self.reduction.taper_ceiling),
            ("reduction.taper_constant", self.reduction.taper_constant),
            ("reduction.taper_factor", self.reduction.taper_factor),
        ];
        if let Some((field, value)) = constants.into_iter().find(|(_, v)| *v < Decimal::ZERO) {
            return Err(TaxTableError::NegativeConstant { field, value });
        }

        if self.reduction.taper_ceiling < self.reduction.exemption_ceiling {
            return Err(TaxTableError::InvertedReductionRange {
                exemption_ceiling: self.reduction.exemption_ceiling,
                taper_ceiling: self.reduction.taper_ceiling,
            });
        }

        Ok(())
    }
}

impl Default for TaxTable {
    fn default() -> Self {
        Self::irpf_2026()
    }
}
