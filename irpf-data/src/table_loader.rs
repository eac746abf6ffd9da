use std::io::Read;
use std::path::{Path, PathBuf};

use irpf_core::{TaxBracket, TaxTable, TaxTableError};
use rust_decimal::Decimal;
use serde::Deserialize;
use thiserror::Error;
use tracing::{debug, info};

use crate::decimal_cell::{deserialize_decimal, deserialize_optional_decimal};

/// Errors that can occur when loading tax table data.
#[derive(Debug, Error)]
pub enum TaxTableLoaderError {
    #[error("CSV parse error: {0}")]
    CsvParse(String),

    #[error("TOML parse error: {0}")]
    TomlParse(String),

    #[error("cannot read '{}': {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid tax table: {0}")]
    InvalidTable(#[from] TaxTableError),
}

impl From<csv::Error> for TaxTableLoaderError {
    fn from(err: csv::Error) -> Self {
        TaxTableLoaderError::CsvParse(err.to_string())
    }
}

impl From<toml::de::Error> for TaxTableLoaderError {
    fn from(err: toml::de::Error) -> Self {
        TaxTableLoaderError::TomlParse(err.to_string())
    }
}

/// A single record from a bracket CSV file.
///
/// - `upper_bound`: inclusive upper bound of the bracket (empty for the open top bracket)
/// - `rate`: the bracket rate as a decimal (e.g., 0.075 for 7.5%)
/// - `deduction`: the amount subtracted after applying the rate
#[derive(Debug, Clone, Deserialize, PartialEq)]
pub struct TaxBracketRecord {
    #[serde(deserialize_with = "deserialize_optional_decimal")]
    pub upper_bound: Option<Decimal>,
    #[serde(deserialize_with = "deserialize_decimal")]
    pub rate: Decimal,
    #[serde(deserialize_with = "deserialize_decimal")]
    pub deduction: Decimal,
}

impl From<TaxBracketRecord> for TaxBracket {
    fn from(record: TaxBracketRecord) -> Self {
        TaxBracket::new(record.upper_bound, record.rate, record.deduction)
    }
}

/// Loader for tax tables from TOML files and bracket lists from CSV files.
///
/// A TOML file carries a complete [`TaxTable`]; a CSV file carries only the
/// brackets and is layered over a base table with [`TaxTableLoader::build`].
/// Every table handed back has passed [`TaxTable::validate`].
pub struct TaxTableLoader;

impl TaxTableLoader {
    /// Parse bracket records from a CSV reader, in file order.
    pub fn parse_brackets<R: Read>(reader: R) -> Result<Vec<TaxBracket>, TaxTableLoaderError> {
        let mut csv_reader = csv::ReaderBuilder::new()
            .has_headers(true)
            .trim(csv::Trim::All)
            .from_reader(reader);
        let mut brackets = Vec::new();

        for result in csv_reader.deserialize() {
            let record: TaxBracketRecord = result?;
            brackets.push(record.into());
        }

        Ok(brackets)
    }

    /// Parse and validate a complete table from TOML text.
    pub fn parse_table(input: &str) -> Result<TaxTable, TaxTableLoaderError> {
        let table: TaxTable = toml::from_str(input)?;
        table.validate()?;
        Ok(table)
    }

    pub fn load_table_file(path: &Path) -> Result<TaxTable, TaxTableLoaderError> {
        let contents = read_file(path)?;
        let table = Self::parse_table(&contents)?;
        info!(path = %path.display(), year = table.year, "loaded tax table");
        Ok(table)
    }

    pub fn load_brackets_file(path: &Path) -> Result<Vec<TaxBracket>, TaxTableLoaderError> {
        let contents = read_file(path)?;
        let brackets = Self::parse_brackets(contents.as_bytes())?;
        info!(path = %path.display(), count = brackets.len(), "loaded brackets");
        Ok(brackets)
    }

    /// Resolves the table to use for a run.
    ///
    /// Starts from `table_path` (or the canonical 2026 table when absent),
    /// then replaces its brackets with those in `brackets_path` if given.
    pub fn build(
        table_path: Option<&Path>,
        brackets_path: Option<&Path>,
    ) -> Result<TaxTable, TaxTableLoaderError> {
        let mut table = match table_path {
            Some(path) => Self::load_table_file(path)?,
            None => {
                debug!("using built-in 2026 table");
                TaxTable::irpf_2026()
            }
        };

        if let Some(path) = brackets_path {
            table = table.with_brackets(Self::load_brackets_file(path)?);
            table.validate()?;
        }

        Ok(table)
    }
}

fn read_file(path: &Path) -> Result<String, TaxTableLoaderError> {
    std::fs::read_to_string(path).map_err(|source| TaxTableLoaderError::Io {
        path: path.to_path_buf(),
        source,
    })
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use rust_decimal_macros::dec;

    use super::*;

    const TEST_CSV: &str = r#"upper_bound,rate,deduction
2428.80,0,0
2826.65,0.075,182.16
3751.05,0.15,394.16
4664.68,0.225,675.49
,0.275,908.73
"#;

    const TEST_TOML: &str = r#"
year = 2026
dependent_deduction = "189.59"
standard_discount = "607.20"

[reduction]
exemption_ceiling = "5000.00"
taper_ceiling = "7350.00"
taper_constant = "978.62"
taper_factor = "0.133145"

[[brackets]]
upper_bound = "2428.80"
rate = "0"
deduction = "0"

[[brackets]]
upper_bound = "2826.65"
rate = "0.075"
deduction = "182.16"

[[brackets]]
upper_bound = "3751.05"
rate = "0.15"
deduction = "394.16"

[[brackets]]
upper_bound = "4664.68"
rate = "0.225"
deduction = "675.49"

[[brackets]]
rate = "0.275"
deduction = "908.73"
"#;

    // =========================================================================
    // parse_brackets tests
    // =========================================================================

    #[test]
    fn test_parse_csv_single_bracket() {
        let csv = "upper_bound,rate,deduction\n2428.80,0,0";

        let brackets = TaxTableLoader::parse_brackets(csv.as_bytes()).expect("Failed to parse CSV");

        assert_eq!(brackets, vec![TaxBracket::new(Some(dec!(2428.80)), dec!(0), dec!(0))]);
    }

    #[test]
    fn test_parse_csv_unbounded_top_bracket() {
        let csv = "upper_bound,rate,deduction\n,0.275,908.73";

        let brackets = TaxTableLoader::parse_brackets(csv.as_bytes()).expect("Failed to parse CSV");

        assert_eq!(brackets[0].upper_bound, None);
        assert_eq!(brackets[0].rate, dec!(0.275));
        assert_eq!(brackets[0].deduction, dec!(908.73));
    }

    #[test]
    fn test_parse_csv_full_table_matches_canonical() {
        let brackets =
            TaxTableLoader::parse_brackets(TEST_CSV.as_bytes()).expect("Failed to parse CSV");

        assert_eq!(brackets, TaxTable::irpf_2026().brackets);
    }

    #[test]
    fn test_parse_csv_tolerates_whitespace() {
        let csv = "upper_bound , rate , deduction\n 2428.80 , 0 , 0 \n , 0.275 , 908.73";

        let brackets = TaxTableLoader::parse_brackets(csv.as_bytes()).expect("Failed to parse CSV");

        assert_eq!(brackets.len(), 2);
        assert_eq!(brackets[0].upper_bound, Some(dec!(2428.80)));
    }

    #[test]
    fn test_parse_csv_keeps_full_precision() {
        let csv = "upper_bound,rate,deduction\n123456789012345678.91,0.133145,98765432109876543.21";

        let brackets = TaxTableLoader::parse_brackets(csv.as_bytes()).expect("Failed to parse CSV");

        assert_eq!(brackets[0].upper_bound, Some(dec!(123456789012345678.91)));
        assert_eq!(brackets[0].rate, dec!(0.133145));
        assert_eq!(brackets[0].deduction, dec!(98765432109876543.21));
    }

    #[test]
    fn test_parse_csv_invalid_rate() {
        let csv = "upper_bound,rate,deduction\n2428.80,seven,0";

        let result = TaxTableLoader::parse_brackets(csv.as_bytes());

        assert!(matches!(result, Err(TaxTableLoaderError::CsvParse(_))));
    }

    #[test]
    fn test_parse_csv_invalid_decimal() {
        let csv = "upper_bound,rate,deduction\nabc,0,0";

        let result = TaxTableLoader::parse_brackets(csv.as_bytes());

        assert!(matches!(result, Err(TaxTableLoaderError::CsvParse(_))));
    }

    #[test]
    fn test_parse_csv_missing_column() {
        let csv = "upper_bound,rate\n2428.80,0";

        let result = TaxTableLoader::parse_brackets(csv.as_bytes());

        assert!(matches!(result, Err(TaxTableLoaderError::CsvParse(_))));
    }

    #[test]
    fn test_parse_csv_empty_body() {
        let csv = "upper_bound,rate,deduction\n";

        let brackets = TaxTableLoader::parse_brackets(csv.as_bytes()).expect("Failed to parse CSV");

        assert!(brackets.is_empty());
    }

    // =========================================================================
    // parse_table tests
    // =========================================================================

    #[test]
    fn test_parse_toml_matches_canonical() {
        let table = TaxTableLoader::parse_table(TEST_TOML).expect("Failed to parse TOML");

        assert_eq!(table, TaxTable::irpf_2026());
    }

    #[test]
    fn test_parse_toml_rejects_invalid_table() {
        let toml = TEST_TOML.replace("taper_ceiling = \"7350.00\"", "taper_ceiling = \"100\"");

        let result = TaxTableLoader::parse_table(&toml);

        assert!(matches!(
            result,
            Err(TaxTableLoaderError::InvalidTable(
                TaxTableError::InvertedReductionRange { .. }
            ))
        ));
    }

    #[test]
    fn test_parse_toml_missing_field() {
        let toml = TEST_TOML.replace("standard_discount = \"607.20\"", "");

        let result = TaxTableLoader::parse_table(&toml);

        assert!(matches!(result, Err(TaxTableLoaderError::TomlParse(_))));
    }

    // =========================================================================
    // build tests
    // =========================================================================

    #[test]
    fn test_build_without_files_uses_canonical_table() {
        let table = TaxTableLoader::build(None, None).expect("Failed to build table");

        assert_eq!(table, TaxTable::irpf_2026());
    }

    #[test]
    fn test_build_missing_file_reports_path() {
        let result = TaxTableLoader::build(Some(Path::new("/nonexistent/irpf.toml")), None);

        match result {
            Err(TaxTableLoaderError::Io { path, .. }) => {
                assert_eq!(path, PathBuf::from("/nonexistent/irpf.toml"));
            }
            other => panic!("expected Io error, got {other:?}"),
        }
    }
}
