//! Monthly tax reduction introduced by Lei 15.270/2025.
//!
//! The reduction is keyed on gross income, not on the taxable base, and is
//! applied on top of the tax from the progressive table:
//!
//! | Gross income                 | Reduction                               |
//! |------------------------------|-----------------------------------------|
//! | up to 5,000.00               | the whole tax (due amount becomes zero) |
//! | 5,000.01 to 7,350.00         | 978.62 − 0.133145 × gross, capped at tax |
//! | above 7,350.00               | none                                    |

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::calculations::common::rounded_non_negative;
use crate::{ReductionRule, ReductionTier};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct StatutoryReduction {
    pub tier: ReductionTier,
    /// Always within `0..=gross_tax`.
    pub amount: Decimal,
}

/// Classifies gross income against the reduction ceilings. Both ceilings
/// are inclusive.
pub fn reduction_tier(
    rule: &ReductionRule,
    gross_income: Decimal,
) -> ReductionTier {
    if gross_income <= rule.exemption_ceiling {
        ReductionTier::FullExemption
    } else if gross_income <= rule.taper_ceiling {
        ReductionTier::Tapered
    } else {
        ReductionTier::NoReduction
    }
}

/// Computes the statutory reduction for `gross_tax`, never exceeding it.
///
/// ```
/// use rust_decimal_macros::dec;
/// use irpf_core::{ReductionTier, TaxTable};
/// use irpf_core::calculations::calculate_statutory_reduction;
///
/// let table = TaxTable::irpf_2026();
/// let reduction = calculate_statutory_reduction(&table.reduction, dec!(6000.00), dec!(510.49));
///
/// assert_eq!(reduction.tier, ReductionTier::Tapered);
/// assert_eq!(reduction.amount, dec!(179.75));
/// ```
pub fn calculate_statutory_reduction(
    rule: &ReductionRule,
    gross_income: Decimal,
    gross_tax: Decimal,
) -> StatutoryReduction {
    let gross_tax = gross_tax.max(Decimal::ZERO);
    let tier = reduction_tier(rule, gross_income);

    let amount = match tier {
        ReductionTier::FullExemption => gross_tax,
        ReductionTier::Tapered => {
            let tapered =
                rounded_non_negative(rule.taper_constant - rule.taper_factor * gross_income);
            tapered.min(gross_tax)
        }
        ReductionTier::NoReduction => Decimal::ZERO,
    };

    StatutoryReduction { tier, amount }
}
