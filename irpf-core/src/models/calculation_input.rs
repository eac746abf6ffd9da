use rust_decimal::Decimal;
use rust_decimal::prelude::FromPrimitive;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Errors raised when caller-supplied values fall outside the input domain.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum IrpfError {
    #[error("invalid input: {field} must be {expected}, got {value}")]
    InvalidInput {
        field: &'static str,
        expected: &'static str,
        value: String,
    },
}

impl IrpfError {
    fn negative(
        field: &'static str,
        value: impl ToString,
    ) -> Self {
        Self::InvalidInput {
            field,
            expected: "non-negative",
            value: value.to_string(),
        }
    }
}

/// Validated inputs for one monthly calculation.
///
/// Built only through [`CalculationInput::new`]; deserialization runs the
/// same checks.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "RawCalculationInput")]
pub struct CalculationInput {
    gross_income: Decimal,
    /// INSS withheld for the month.
    social_security_contribution: Decimal,
    dependent_count: u32,
}

/// Unchecked wire shape of [`CalculationInput`].
#[derive(Debug, Deserialize)]
struct RawCalculationInput {
    gross_income: Decimal,
    #[serde(default)]
    social_security_contribution: Decimal,
    #[serde(default)]
    dependent_count: i64,
}

impl TryFrom<RawCalculationInput> for CalculationInput {
    type Error = IrpfError;

    fn try_from(raw: RawCalculationInput) -> Result<Self, Self::Error> {
        let dependent_count = i32::try_from(raw.dependent_count).map_err(|_| {
            IrpfError::InvalidInput {
                field: "dependent_count",
                expected: "a count that fits in 32 bits",
                value: raw.dependent_count.to_string(),
            }
        })?;
        Self::new(raw.gross_income, raw.social_security_contribution, dependent_count)
    }
}

impl CalculationInput {
    /// Builds an input, rejecting negative amounts or a negative dependent count.
    ///
    /// ```
    /// use rust_decimal_macros::dec;
    /// use irpf_core::{CalculationInput, IrpfError};
    ///
    /// let input = CalculationInput::new(dec!(6000.00), dec!(649.60), 1).unwrap();
    /// assert_eq!(input.dependent_count(), 1);
    ///
    /// let err = CalculationInput::new(dec!(-1), dec!(0), 0).unwrap_err();
    /// assert!(matches!(err, IrpfError::InvalidInput { field: "gross_income", .. }));
    /// ```
    pub fn new(
        gross_income: Decimal,
        social_security_contribution: Decimal,
        dependent_count: i32,
    ) -> Result<Self, IrpfError> {
        if gross_income < Decimal::ZERO {
            return Err(IrpfError::negative("gross_income", gross_income));
        }
        if social_security_contribution < Decimal::ZERO {
            return Err(IrpfError::negative(
                "social_security_contribution",
                social_security_contribution,
            ));
        }
        let dependent_count = u32::try_from(dependent_count)
            .map_err(|_| IrpfError::negative("dependent_count", dependent_count))?;

        Ok(Self {
            gross_income,
            social_security_contribution,
            dependent_count,
        })
    }

    /// Builds an input from floating-point amounts, rejecting NaN and
    /// infinities before the usual domain checks.
    pub fn try_from_f64(
        gross_income: f64,
        social_security_contribution: f64,
        dependent_count: i32,
    ) -> Result<Self, IrpfError> {
        let gross_income = finite_decimal("gross_income", gross_income)?;
        let social_security_contribution =
            finite_decimal("social_security_contribution", social_security_contribution)?;

        Self::new(gross_income, social_security_contribution, dependent_count)
    }

    pub fn gross_income(&self) -> Decimal {
        self.gross_income
    }

    pub fn social_security_contribution(&self) -> Decimal {
        self.social_security_contribution
    }

    pub fn dependent_count(&self) -> u32 {
        self.dependent_count
    }
}

fn finite_decimal(
    field: &'static str,
    value: f64,
) -> Result<Decimal, IrpfError> {
    if !value.is_finite() {
        return Err(IrpfError::InvalidInput {
            field,
            expected: "a finite number",
            value: value.to_string(),
        });
    }
    Decimal::from_f64(value).ok_or_else(|| IrpfError::InvalidInput {
        field,
        expected: "representable as a decimal",
        value: value.to_string(),
    })
}
