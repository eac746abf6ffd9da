use rust_decimal::Decimal;
use thiserror::Error;

/// Error returned when a string cannot be parsed as a [`Decimal`].
#[derive(Debug, Error)]
pub enum ParseDecimalError {
    #[error("invalid amount '{input}': {source}")]
    Invalid {
        input: String,
        #[source]
        source: rust_decimal::Error,
    },

    #[error("invalid amount '{input}': '.' must separate groups of three digits")]
    Grouping { input: String },
}

/// True when `digits` reads as dot-grouped thousands, e.g. `6.000` or
/// `1.234.567`: a leading group of one to three digits (no leading zero)
/// followed only by groups of exactly three.
fn is_thousands_grouped(digits: &str) -> bool {
    let digits = digits.strip_prefix('-').unwrap_or(digits);
    let mut groups = digits.split('.');
    let all_digits = |group: &str| group.bytes().all(|b| b.is_ascii_digit());

    let head_ok = groups.next().is_some_and(|head| {
        (1..=3).contains(&head.len()) && all_digits(head) && !head.starts_with('0')
    });
    let mut tail = groups.peekable();
    let has_tail = tail.peek().is_some();

    head_ok && has_tail && tail.all(|group| group.len() == 3 && all_digits(group))
}

/// Normalizes amount input: trims whitespace and an optional `R$` prefix,
/// then rewrites Brazilian notation (`.` groups thousands, `,` separates
/// cents) as a plain decimal.
///
/// Without a comma, a dotted value is read as thousands only when it is
/// grouped in threes (`6.000`); anything else (`649.60`) stays a plain
/// decimal.
fn normalize_decimal_input(s: &str) -> Result<String, ParseDecimalError> {
    let trimmed = s.trim();
    let amount = trimmed.strip_prefix("R$").unwrap_or(trimmed).trim();

    let normalized = match amount.split_once(',') {
        Some((units, cents)) => {
            if units.contains('.') && !is_thousands_grouped(units) {
                return Err(ParseDecimalError::Grouping {
                    input: s.to_string(),
                });
            }
            format!("{}.{cents}", units.replace('.', ""))
        }
        None if is_thousands_grouped(amount) => amount.replace('.', ""),
        None => amount.to_string(),
    };
    Ok(normalized)
}

/// Parses a currency amount into a [`Decimal`].
///
/// Accepts `6000.00`, `6.000`, `6.000,00` and `R$ 6.000,00`. Empty or
/// whitespace-only input is treated as 0. Sign is preserved so the engine
/// can reject negative amounts itself.
pub fn parse_decimal(s: &str) -> Result<Decimal, ParseDecimalError> {
    let normalized = normalize_decimal_input(s).inspect_err(|e| {
        tracing::error!(input = %s, "invalid amount: {}", e);
    })?;
    if normalized.is_empty() {
        return Ok(Decimal::ZERO);
    }
    normalized.parse().map_err(|e| {
        tracing::error!(input = %s, "invalid amount: {}", e);
        ParseDecimalError::Invalid {
            input: s.to_string(),
            source: e,
        }
    })
}
