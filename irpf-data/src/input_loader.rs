//! CSV loader for batch calculation inputs.
//!
//! ## CSV Format
//!
//! Headers are matched by name, so column order does not matter.
//!
//! | Column          | Required | Type    | Notes                        |
//! |-----------------|----------|---------|------------------------------|
//! | `gross_income`  | yes      | decimal | e.g. `6000.00`               |
//! | `contribution`  | no       | decimal | INSS; empty cell reads as 0  |
//! | `dependents`    | no       | integer | empty cell reads as 0        |
//!
//! ### Example
//!
//! ```csv
//! gross_income,contribution,dependents
//! 6000.00,649.60,1
//! 10000.00,,
//! ```

use std::path::Path;

use irpf_core::{CalculationInput, IrpfError};
use rust_decimal::Decimal;
use serde::Deserialize;
use tracing::debug;

use crate::decimal_cell::{deserialize_decimal, deserialize_optional_decimal};

#[derive(Debug, Deserialize)]
struct CsvRow {
    #[serde(deserialize_with = "deserialize_decimal")]
    gross_income: Decimal,
    #[serde(default, deserialize_with = "deserialize_optional_decimal")]
    contribution: Option<Decimal>,
    #[serde(default)]
    dependents: Option<i32>,
}

/// Errors that can occur while loading batch input data.
#[derive(Debug, thiserror::Error)]
pub enum InputLoadError {
    /// The CSV is structurally invalid or a cell has the wrong type.
    #[error("CSV parse error: {0}")]
    Parse(#[from] csv::Error),

    /// A row parsed but holds values outside the input domain.
    /// `row` is 1-based (header = row 0).
    #[error("invalid values on row {row}: {source}")]
    InvalidRow {
        row: usize,
        #[source]
        source: IrpfError,
    },

    #[error("cannot read input file: {0}")]
    Io(#[from] std::io::Error),
}

fn convert_row(
    row: CsvRow,
    row_number: usize,
) -> Result<CalculationInput, InputLoadError> {
    CalculationInput::new(
        row.gross_income,
        row.contribution.unwrap_or(Decimal::ZERO),
        row.dependents.unwrap_or(0),
    )
    .map_err(|source| InputLoadError::InvalidRow {
        row: row_number,
        source,
    })
}

/// Parse CSV text and return the inputs in file order.
///
/// # Errors
///
/// * [`InputLoadError::Parse`] if the CSV is malformed.
/// * [`InputLoadError::InvalidRow`] if a row has a negative amount or count.
pub fn load_from_str(input: &str) -> Result<Vec<CalculationInput>, InputLoadError> {
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .trim(csv::Trim::All)
        .flexible(false)
        .from_reader(input.as_bytes());

    reader
        .deserialize::<CsvRow>()
        .enumerate()
        .map(|(idx, result)| {
            let row = result?;
            convert_row(row, idx + 1)
        })
        .collect()
}

/// Read a file from disk and delegate to [`load_from_str`].
pub fn load_from_file(path: &Path) -> Result<Vec<CalculationInput>, InputLoadError> {
    let contents = std::fs::read_to_string(path)?;
    let inputs = load_from_str(&contents)?;
    debug!(path = %path.display(), rows = inputs.len(), "loaded batch inputs");
    Ok(inputs)
}
