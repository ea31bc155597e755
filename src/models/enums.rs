use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("Invalid {field} value: '{value}'")]
pub struct ParseEnumError {
    pub field: String,
    pub value: String,
}

/// Macro to generate enum with as_str + std::str::FromStr pattern.
/// The serde name of each variant is its string form.
macro_rules! str_enum {
    ($name:ident { $($variant:ident => $s:literal),+ $(,)? }) => {
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
        pub enum $name {
            $(#[serde(rename = $s)] $variant),+
        }

        impl $name {
            pub fn as_str(&self) -> &'static str {
                match self {
                    $(Self::$variant => $s),+
                }
            }
        }

        impl std::str::FromStr for $name {
            type Err = ParseEnumError;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                match s {
                    $($s => Ok(Self::$variant)),+,
                    _ => Err(ParseEnumError {
                        field: stringify!($name).into(),
                        value: s.into(),
                    }),
                }
            }
        }

        impl std::fmt::Display for $name {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                f.write_str(self.as_str())
            }
        }
    };
}

str_enum!(Classification {
    Normal => "NORMAL",
    Low => "LOW",
    High => "HIGH",
    CriticalLow => "CRITICAL_LOW",
    CriticalHigh => "CRITICAL_HIGH",
    Unknown => "UNKNOWN",
});

impl Classification {
    /// LOW or CRITICAL_LOW.
    pub fn is_low(&self) -> bool {
        matches!(self, Self::Low | Self::CriticalLow)
    }

    /// HIGH or CRITICAL_HIGH.
    pub fn is_high(&self) -> bool {
        matches!(self, Self::High | Self::CriticalHigh)
    }

    pub fn is_critical(&self) -> bool {
        matches!(self, Self::CriticalLow | Self::CriticalHigh)
    }

    /// Any tier outside the reference range. UNKNOWN is not abnormal.
    pub fn is_abnormal(&self) -> bool {
        self.is_low() || self.is_high()
    }

    /// Human-readable status line shown next to a result.
    pub fn status_message(&self) -> &'static str {
        match self {
            Self::Normal => "Within normal range",
            Self::Low => "Below normal range",
            Self::High => "Above normal range",
            Self::CriticalLow => "Critically low - requires immediate attention",
            Self::CriticalHigh => "Critically high - requires immediate attention",
            Self::Unknown => "No reference range available",
        }
    }
}

// Abnormality marker printed by the originating lab.
str_enum!(AbnormalFlag {
    None => "",
    High => "HI",
    Low => "LO",
});

impl AbnormalFlag {
    /// Parse a flag token as printed in a report ("HI", "lo", ...).
    pub fn from_token(token: &str) -> Self {
        if token.eq_ignore_ascii_case("HI") {
            Self::High
        } else if token.eq_ignore_ascii_case("LO") {
            Self::Low
        } else {
            Self::None
        }
    }

    pub fn is_set(&self) -> bool {
        !matches!(self, Self::None)
    }
}

impl Default for AbnormalFlag {
    fn default() -> Self {
        Self::None
    }
}

str_enum!(RiskLevel {
    Low => "LOW",
    Moderate => "MODERATE",
    High => "HIGH",
});

str_enum!(WarningSeverity {
    Moderate => "MODERATE",
    High => "HIGH",
});

str_enum!(WarningType {
    Cardiovascular => "CARDIOVASCULAR",
    Metabolic => "METABOLIC",
    Joint => "JOINT",
});

str_enum!(Sex {
    Male => "male",
    Female => "female",
});

impl Sex {
    /// Loose parse of a profile value ("M", "Female", " male ").
    /// Anything unrecognised is treated as unspecified.
    pub fn parse_loose(value: &str) -> Option<Self> {
        match value.trim().to_ascii_lowercase().as_str() {
            "m" | "male" | "man" => Some(Self::Male),
            "f" | "female" | "woman" => Some(Self::Female),
            _ => None,
        }
    }
}

str_enum!(Panel {
    Lipid => "lipid",
    Metabolic => "metabolic",
    BloodCount => "blood_count",
    Chemistry => "chemistry",
    Liver => "liver",
    Thyroid => "thyroid",
    Other => "other",
});

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    #[test]
    fn classification_round_trip() {
        for (variant, s) in [
            (Classification::Normal, "NORMAL"),
            (Classification::Low, "LOW"),
            (Classification::High, "HIGH"),
            (Classification::CriticalLow, "CRITICAL_LOW"),
            (Classification::CriticalHigh, "CRITICAL_HIGH"),
            (Classification::Unknown, "UNKNOWN"),
        ] {
            assert_eq!(variant.as_str(), s);
            assert_eq!(Classification::from_str(s).unwrap(), variant);
        }
    }

    #[test]
    fn classification_serializes_as_str() {
        let json = serde_json::to_string(&Classification::CriticalHigh).unwrap();
        assert_eq!(json, "\"CRITICAL_HIGH\"");
        let back: Classification = serde_json::from_str("\"LOW\"").unwrap();
        assert_eq!(back, Classification::Low);
    }

    #[test]
    fn classification_predicates() {
        assert!(Classification::CriticalLow.is_low());
        assert!(Classification::CriticalLow.is_critical());
        assert!(Classification::High.is_high());
        assert!(!Classification::High.is_critical());
        assert!(!Classification::Normal.is_abnormal());
        assert!(!Classification::Unknown.is_abnormal());
    }

    #[test]
    fn flag_tokens() {
        assert_eq!(AbnormalFlag::from_token("hi"), AbnormalFlag::High);
        assert_eq!(AbnormalFlag::from_token("LO"), AbnormalFlag::Low);
        assert_eq!(AbnormalFlag::from_token("H"), AbnormalFlag::None);
        assert_eq!(serde_json::to_string(&AbnormalFlag::None).unwrap(), "\"\"");
        assert_eq!(serde_json::to_string(&AbnormalFlag::High).unwrap(), "\"HI\"");
    }

    #[test]
    fn risk_level_ordering() {
        assert!(RiskLevel::Low < RiskLevel::Moderate);
        assert!(RiskLevel::Moderate < RiskLevel::High);
    }

    #[test]
    fn sex_parse_loose() {
        assert_eq!(Sex::parse_loose(" Female "), Some(Sex::Female));
        assert_eq!(Sex::parse_loose("M"), Some(Sex::Male));
        assert_eq!(Sex::parse_loose("unspecified"), None);
    }

    #[test]
    fn unknown_value_rejected() {
        let err = Panel::from_str("kidney").unwrap_err();
        assert_eq!(err.field, "Panel");
        assert_eq!(err.value, "kidney");
    }
}
