//! Rounding and clamping shared by every step of the monthly pipeline.

use rust_decimal::{Decimal, RoundingStrategy};

/// Rounds a currency amount to cents, half away from zero.
///
/// # Examples
///
/// ```
/// use rust_decimal_macros::dec;
/// use irpf_core::calculations::common::round_half_up;
///
/// assert_eq!(round_half_up(dec!(510.49275)), dec!(510.49));
/// assert_eq!(round_half_up(dec!(0.005)), dec!(0.01));
/// assert_eq!(round_half_up(dec!(-0.005)), dec!(-0.01));
/// ```
pub fn round_half_up(value: Decimal) -> Decimal {
    value.round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero)
}

/// Floors a value at zero.
///
/// ```
/// use rust_decimal_macros::dec;
/// use irpf_core::calculations::common::non_negative;
///
/// assert_eq!(non_negative(dec!(-182.16)), dec!(0));
/// assert_eq!(non_negative(dec!(182.16)), dec!(182.16));
/// ```
pub fn non_negative(value: Decimal) -> Decimal {
    value.max(Decimal::ZERO)
}

/// Rounds to cents, then floors at zero.
pub fn rounded_non_negative(value: Decimal) -> Decimal {
    non_negative(round_half_up(value))
}
