use serde::{Deserialize, Serialize};

use super::enums::{AbnormalFlag, Classification, Panel};

/// Low–high interval defining normal values for a test.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReferenceRange {
    pub low: f64,
    pub high: f64,
    pub unit: String,
}

impl ReferenceRange {
    pub fn new(low: f64, high: f64, unit: impl Into<String>) -> Self {
        Self {
            low,
            high,
            unit: unit.into(),
        }
    }

    pub fn is_valid(&self) -> bool {
        self.low < self.high
    }

    /// Parse a range as printed in a report: "230-480", "<4.40", ">1.20".
    /// One-sided bounds are closed with 0 or `f64::MAX`.
    pub fn parse_printed(text: &str, unit: &str) -> Option<Self> {
        let compact: String = text.chars().filter(|c| !c.is_whitespace()).collect();
        let compact = compact.replace('–', "-");

        let range = if let Some(rest) = compact.strip_prefix('<') {
            let high: f64 = rest.trim_start_matches('=').parse().ok()?;
            Self::new(0.0, high, unit)
        } else if let Some(rest) = compact.strip_prefix('>') {
            let low: f64 = rest.trim_start_matches('=').parse().ok()?;
            Self::new(low, f64::MAX, unit)
        } else {
            let (low, high) = compact.split_once('-')?;
            Self::new(low.parse().ok()?, high.parse().ok()?, unit)
        };

        range.is_valid().then_some(range)
    }
}

/// A line that names a canonical test.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TestMention {
    pub line_index: usize,
    pub canonical_name: String,
    pub raw_line: String,
}

/// A test with its recovered value, before validation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExtractedCandidate {
    /// Index of the line that named the test.
    pub line_index: usize,
    /// Index of the line the value was read from.
    pub value_line_index: usize,
    #[serde(rename = "test_name")]
    pub canonical_name: String,
    /// The raw line that named the test.
    #[serde(rename = "original_name")]
    pub raw_matched_text: String,
    pub display_name: String,
    pub panel: Panel,
    pub value: f64,
    pub flag: AbnormalFlag,
    /// Empty when no unit was found near the value.
    pub unit: String,
    /// Empty when no printed range was found near the value.
    #[serde(rename = "reference_range")]
    pub reference_range_text: String,
    pub source_lines: Vec<String>,
}

/// Where the range used for classification came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RangeSource {
    Catalog,
    Document,
}

/// The range a result was classified against, after sex selection.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AppliedRange {
    #[serde(flatten)]
    pub range: ReferenceRange,
    pub source: RangeSource,
}

/// How the extracted unit was reconciled with the reference unit.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum UnitConversion {
    /// Units already agree, or no reference range applies.
    NotNeeded,
    /// No unit was found in the document; the reference unit is assumed.
    Assumed,
    Converted { from: String, to: String, factor: f64 },
    /// No conversion rule exists; the value was compared as-is.
    Unsupported { from: String, to: String },
}

/// A validated candidate with its classification. Immutable once produced.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClassifiedResult {
    #[serde(flatten)]
    pub candidate: ExtractedCandidate,
    pub classification: Classification,
    pub status: String,
    pub interpretation: String,
    pub applied_range: Option<AppliedRange>,
    /// The value compared against the range, in the reference unit when converted.
    pub compared_value: f64,
    pub unit_conversion: UnitConversion,
    /// Known limitations that may affect this classification.
    pub caveats: Vec<String>,
}

impl ClassifiedResult {
    pub fn canonical_name(&self) -> &str {
        &self.candidate.canonical_name
    }

    pub fn is(&self, canonical_name: &str) -> bool {
        self.candidate.canonical_name == canonical_name
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_printed_span() {
        let range = ReferenceRange::parse_printed("230-480", "umol/L").unwrap();
        assert_eq!(range.low, 230.0);
        assert_eq!(range.high, 480.0);
        assert_eq!(range.unit, "umol/L");
    }

    #[test]
    fn parse_printed_en_dash_and_spaces() {
        let range = ReferenceRange::parse_printed("3.5 – 5.0", "mmol/L").unwrap();
        assert_eq!(range.low, 3.5);
        assert_eq!(range.high, 5.0);
    }

    #[test]
    fn parse_printed_upper_bound() {
        let range = ReferenceRange::parse_printed("<4.40", "mmol/L").unwrap();
        assert_eq!(range.low, 0.0);
        assert_eq!(range.high, 4.4);
    }

    #[test]
    fn parse_printed_lower_bound() {
        let range = ReferenceRange::parse_printed("> 1.20", "mmol/L").unwrap();
        assert_eq!(range.low, 1.2);
        assert_eq!(range.high, f64::MAX);
    }

    #[test]
    fn parse_printed_rejects_inverted_and_garbage() {
        assert!(ReferenceRange::parse_printed("480-230", "").is_none());
        assert!(ReferenceRange::parse_printed("<0", "").is_none());
        assert!(ReferenceRange::parse_printed("normal", "").is_none());
        assert!(ReferenceRange::parse_printed("", "").is_none());
    }
}
