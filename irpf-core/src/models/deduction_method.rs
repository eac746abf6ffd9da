use std::fmt;

use serde::{Deserialize, Serialize};

/// How the taxable base is derived from gross income.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum DeductionMethod {
    /// Itemized: social-security contribution plus per-dependent deductions.
    Legal,
    /// Flat standard discount in place of itemized deductions.
    Simplified,
}

impl DeductionMethod {
    pub fn all() -> &'static [DeductionMethod] {
        &[DeductionMethod::Legal, DeductionMethod::Simplified]
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Legal => "LEGAL",
            Self::Simplified => "SIMPLIFIED",
        }
    }

    /// Label used on Brazilian-facing reports.
    pub fn label_pt(&self) -> &'static str {
        match self {
            Self::Legal => "LEGAL",
            Self::Simplified => "SIMPLIFICADO",
        }
    }
}

impl fmt::Display for DeductionMethod {
    fn fmt(
        &self,
        f: &mut fmt::Formatter<'_>,
    ) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    #[test]
    fn labels_differ_only_for_simplified() {
        assert_eq!(DeductionMethod::Legal.label_pt(), DeductionMethod::Legal.as_str());
        assert_eq!(DeductionMethod::Simplified.label_pt(), "SIMPLIFICADO");
        assert_eq!(DeductionMethod::Simplified.to_string(), "SIMPLIFIED");
    }

    #[test]
    fn serializes_as_upper_case_tag() {
        let json = serde_json::to_string(&DeductionMethod::Simplified).unwrap();

        assert_eq!(json, "\"SIMPLIFIED\"");
    }
}
