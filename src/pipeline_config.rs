//! Analysis configuration.
//!
//! Controls how test names are recognized and how far from a test mention
//! the extractor looks for its value, unit and printed reference range.

use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::models::ParseEnumError;

// ═══════════════════════════════════════════════════════════
// Types
// ═══════════════════════════════════════════════════════════

/// How test-name patterns are applied to a line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MatchMode {
    /// The pattern must match the whole line (surrounding whitespace and
    /// a trailing colon allowed). For one-item-per-line reports.
    Strict,
    /// The pattern may match anywhere in the line, on word boundaries.
    /// Handles inline rows such as "Glucose 120 mg/dL (70-100)".
    #[default]
    Lenient,
}

impl MatchMode {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Strict => "strict",
            Self::Lenient => "lenient",
        }
    }
}

impl FromStr for MatchMode {
    type Err = ParseEnumError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "strict" => Ok(Self::Strict),
            "lenient" => Ok(Self::Lenient),
            _ => Err(ParseEnumError {
                field: "MatchMode".into(),
                value: s.into(),
            }),
        }
    }
}

/// Line distances searched around an anchor line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SearchWindow {
    pub backward: usize,
    pub forward: usize,
}

impl SearchWindow {
    pub const fn new(backward: usize, forward: usize) -> Self {
        Self { backward, forward }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AnalysisConfig {
    pub match_mode: MatchMode,
    /// Around the mention line, for the numeric result.
    pub value_window: SearchWindow,
    /// Around the value line, for the unit.
    pub unit_window: SearchWindow,
    /// Around the value line, for a printed reference range.
    pub range_window: SearchWindow,
}

// ═══════════════════════════════════════════════════════════
// Presets
// ═══════════════════════════════════════════════════════════

impl Default for AnalysisConfig {
    fn default() -> Self {
        Self::lenient()
    }
}

impl AnalysisConfig {
    pub fn lenient() -> Self {
        Self {
            match_mode: MatchMode::Lenient,
            value_window: SearchWindow::new(3, 8),
            unit_window: SearchWindow::new(2, 4),
            range_window: SearchWindow::new(3, 5),
        }
    }

    pub fn strict() -> Self {
        Self {
            match_mode: MatchMode::Strict,
            ..Self::lenient()
        }
    }

    pub fn with_mode(mode: MatchMode) -> Self {
        match mode {
            MatchMode::Strict => Self::strict(),
            MatchMode::Lenient => Self::lenient(),
        }
    }
}
