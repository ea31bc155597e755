//! Bundled test definitions, unit aliases and conversion rules.
//!
//! Table order is significant: a line matches the first definition whose
//! pattern matches, so more specific names (HbA1c before hemoglobin,
//! non-HDL before HDL before total cholesterol) come first.

use crate::models::{Panel, ReferenceRange};

use super::catalog::{ConversionRule, PlausibleRange, RangeSpec, TestDefinition, UnitAlias};

/// Ceiling of the generic plausibility interval used for tests
/// without a specific one.
pub const DEFAULT_PLAUSIBLE_CEILING: f64 = 10_000.0;

enum BuiltinRange {
    None,
    Shared(f64, f64),
    BySex { male: (f64, f64), female: (f64, f64) },
}

struct BuiltinTest {
    canonical_name: &'static str,
    display_name: &'static str,
    panel: Panel,
    patterns: &'static [&'static str],
    abbreviations: &'static [&'static str],
    /// Lines matching any of these never name this test.
    excludes: &'static [&'static str],
    unit: &'static str,
    /// Wide enough to cover both conventional and SI reporting units.
    plausible: (f64, f64),
    range: BuiltinRange,
}

#[rustfmt::skip]
const BUILTIN_TESTS: &[BuiltinTest] = &[
    // Diabetes
    BuiltinTest { canonical_name: "hba1c", display_name: "HbA1c", panel: Panel::Metabolic, patterns: &[r"hba1c", r"hb\s*a1c", r"a1c", r"glycated\s+ha?emoglobin"], abbreviations: &[], excludes: &[], unit: "%", plausible: (2.0, 20.0), range: BuiltinRange::Shared(4.0, 5.6) },
    // Complete blood count
    BuiltinTest { canonical_name: "hemoglobin", display_name: "Hemoglobin", panel: Panel::BloodCount, patterns: &[r"ha?emoglobin", r"hgb"], abbreviations: &["hb"], excludes: &[], unit: "g/dL", plausible: (1.0, 250.0), range: BuiltinRange::BySex { male: (13.5, 17.5), female: (12.0, 15.5) } },
    BuiltinTest { canonical_name: "hematocrit", display_name: "Hematocrit", panel: Panel::BloodCount, patterns: &[r"ha?ematocrit", r"hct"], abbreviations: &[], excludes: &[], unit: "%", plausible: (5.0, 75.0), range: BuiltinRange::BySex { male: (41.0, 50.0), female: (36.0, 46.0) } },
    BuiltinTest { canonical_name: "white_blood_cells", display_name: "White Blood Cells", panel: Panel::BloodCount, patterns: &[r"white\s*blood\s*cells?", r"wbc", r"leukocytes?"], abbreviations: &[], excludes: &[], unit: "K/uL", plausible: (0.1, 500.0), range: BuiltinRange::Shared(4.5, 11.0) },
    BuiltinTest { canonical_name: "red_blood_cells", display_name: "Red Blood Cells", panel: Panel::BloodCount, patterns: &[r"red\s*blood\s*cells?", r"rbc", r"erythrocytes?"], abbreviations: &[], excludes: &[], unit: "M/uL", plausible: (0.5, 10.0), range: BuiltinRange::Shared(4.5, 5.9) },
    BuiltinTest { canonical_name: "platelets", display_name: "Platelets", panel: Panel::BloodCount, patterns: &[r"platelets?", r"plt", r"thrombocytes?"], abbreviations: &[], excludes: &[], unit: "K/uL", plausible: (1.0, 2000.0), range: BuiltinRange::Shared(150.0, 450.0) },
    // Metabolic panel
    BuiltinTest { canonical_name: "glucose", display_name: "Glucose", panel: Panel::Metabolic, patterns: &[r"glucose", r"blood\s*sugar"], abbreviations: &["glu"], excludes: &[], unit: "mg/dL", plausible: (0.5, 1000.0), range: BuiltinRange::Shared(70.0, 100.0) },
    BuiltinTest { canonical_name: "creatine_kinase", display_name: "Creatine Kinase", panel: Panel::Chemistry, patterns: &[r"creatine\s*kinase", r"cpk"], abbreviations: &["ck"], excludes: &[], unit: "U/L", plausible: (1.0, 100_000.0), range: BuiltinRange::None },
    BuiltinTest { canonical_name: "creatinine", display_name: "Creatinine", panel: Panel::Chemistry, patterns: &[r"creatinine", r"creat"], abbreviations: &[], excludes: &[], unit: "mg/dL", plausible: (0.05, 2000.0), range: BuiltinRange::Shared(0.7, 1.3) },
    BuiltinTest { canonical_name: "bun", display_name: "Blood Urea Nitrogen", panel: Panel::Chemistry, patterns: &[r"blood\s*urea\s*nitrogen", r"bun", r"urea"], abbreviations: &[], excludes: &[], unit: "mg/dL", plausible: (0.5, 300.0), range: BuiltinRange::Shared(7.0, 20.0) },
    BuiltinTest { canonical_name: "sodium", display_name: "Sodium", panel: Panel::Chemistry, patterns: &[r"sodium"], abbreviations: &["na"], excludes: &[], unit: "mEq/L", plausible: (80.0, 200.0), range: BuiltinRange::Shared(135.0, 145.0) },
    BuiltinTest { canonical_name: "potassium", display_name: "Potassium", panel: Panel::Chemistry, patterns: &[r"potassium"], abbreviations: &["k"], excludes: &[], unit: "mEq/L", plausible: (0.5, 15.0), range: BuiltinRange::Shared(3.5, 5.0) },
    BuiltinTest { canonical_name: "chloride", display_name: "Chloride", panel: Panel::Chemistry, patterns: &[r"chloride"], abbreviations: &["cl"], excludes: &[], unit: "mEq/L", plausible: (60.0, 150.0), range: BuiltinRange::Shared(96.0, 106.0) },
    BuiltinTest { canonical_name: "co2", display_name: "CO2", panel: Panel::Chemistry, patterns: &[r"co2", r"bicarbonate", r"hco3"], abbreviations: &[], excludes: &[], unit: "mEq/L", plausible: (1.0, 60.0), range: BuiltinRange::Shared(22.0, 28.0) },
    BuiltinTest { canonical_name: "calcium", display_name: "Calcium", panel: Panel::Chemistry, patterns: &[r"calcium"], abbreviations: &["ca"], excludes: &[], unit: "mg/dL", plausible: (0.5, 20.0), range: BuiltinRange::Shared(8.5, 10.5) },
    BuiltinTest { canonical_name: "total_protein", display_name: "Total Protein", panel: Panel::Chemistry, patterns: &[r"total\s*protein"], abbreviations: &["tp"], excludes: &[], unit: "g/dL", plausible: (1.0, 150.0), range: BuiltinRange::Shared(6.0, 8.3) },
    // Liver
    BuiltinTest { canonical_name: "albumin", display_name: "Albumin", panel: Panel::Liver, patterns: &[r"albumin", r"alb"], abbreviations: &[], excludes: &[], unit: "g/dL", plausible: (0.5, 60.0), range: BuiltinRange::Shared(3.4, 5.4) },
    BuiltinTest { canonical_name: "total_bilirubin", display_name: "Total Bilirubin", panel: Panel::Liver, patterns: &[r"(?:total\s*)?bilirubin", r"tbil"], abbreviations: &[], excludes: &[r"(?:in)?direct", r"(?:un)?conjugated"], unit: "mg/dL", plausible: (0.0, 1000.0), range: BuiltinRange::Shared(0.3, 1.2) },
    BuiltinTest { canonical_name: "alkaline_phosphatase", display_name: "Alkaline Phosphatase", panel: Panel::Liver, patterns: &[r"alkaline\s*phosphatase", r"alp"], abbreviations: &[], excludes: &[], unit: "U/L", plausible: (0.0, 5000.0), range: BuiltinRange::Shared(44.0, 147.0) },
    BuiltinTest { canonical_name: "alt", display_name: "ALT", panel: Panel::Liver, patterns: &[r"alt", r"alanine\s*aminotransferase", r"sgpt"], abbreviations: &[], excludes: &[], unit: "U/L", plausible: (0.0, 10_000.0), range: BuiltinRange::Shared(7.0, 55.0) },
    BuiltinTest { canonical_name: "ast", display_name: "AST", panel: Panel::Liver, patterns: &[r"ast", r"aspartate\s*aminotransferase", r"sgot"], abbreviations: &[], excludes: &[], unit: "U/L", plausible: (0.0, 10_000.0), range: BuiltinRange::Shared(8.0, 48.0) },
    // Lipids
    BuiltinTest { canonical_name: "non_hdl_cholesterol", display_name: "Non-HDL Cholesterol", panel: Panel::Lipid, patterns: &[r"non[\s-]*hdl(?:\s*cholesterol)?"], abbreviations: &[], excludes: &[r"ratio"], unit: "mg/dL", plausible: (0.1, 600.0), range: BuiltinRange::None },
    BuiltinTest { canonical_name: "hdl", display_name: "HDL Cholesterol", panel: Panel::Lipid, patterns: &[r"hdl(?:[\s-]*(?:cholesterol|c))?", r"high\s*density\s*lipoprotein"], abbreviations: &[], excludes: &[r"ratio"], unit: "mg/dL", plausible: (0.1, 200.0), range: BuiltinRange::Shared(40.0, 60.0) },
    BuiltinTest { canonical_name: "ldl", display_name: "LDL Cholesterol", panel: Panel::Lipid, patterns: &[r"ldl(?:[\s-]*(?:cholesterol|c))?", r"low\s*density\s*lipoprotein"], abbreviations: &[], excludes: &[r"ratio"], unit: "mg/dL", plausible: (0.1, 500.0), range: BuiltinRange::Shared(0.0, 100.0) },
    BuiltinTest { canonical_name: "total_cholesterol", display_name: "Total Cholesterol", panel: Panel::Lipid, patterns: &[r"(?:total\s*)?cholesterol", r"chol"], abbreviations: &[], excludes: &[r"ratio"], unit: "mg/dL", plausible: (0.5, 1000.0), range: BuiltinRange::Shared(0.0, 200.0) },
    BuiltinTest { canonical_name: "triglycerides", display_name: "Triglycerides", panel: Panel::Lipid, patterns: &[r"triglycerides?", r"trig"], abbreviations: &[], excludes: &[], unit: "mg/dL", plausible: (0.1, 5000.0), range: BuiltinRange::Shared(0.0, 150.0) },
    // Thyroid
    BuiltinTest { canonical_name: "tsh", display_name: "TSH", panel: Panel::Thyroid, patterns: &[r"tsh", r"thyroid\s*stimulating\s*hormone"], abbreviations: &[], excludes: &[], unit: "mIU/L", plausible: (0.01, 200.0), range: BuiltinRange::Shared(0.4, 4.0) },
    BuiltinTest { canonical_name: "t4", display_name: "T4", panel: Panel::Thyroid, patterns: &[r"(?:free\s*)?t4", r"ft4", r"thyroxine"], abbreviations: &[], excludes: &[], unit: "ng/dL", plausible: (0.1, 100.0), range: BuiltinRange::Shared(0.8, 1.8) },
    BuiltinTest { canonical_name: "t3", display_name: "T3", panel: Panel::Thyroid, patterns: &[r"(?:free\s*)?t3", r"ft3", r"triiodothyronine"], abbreviations: &[], excludes: &[], unit: "pg/mL", plausible: (0.1, 50.0), range: BuiltinRange::None },
    // Urate has no bundled range: reports print their own.
    BuiltinTest { canonical_name: "urate", display_name: "Urate", panel: Panel::Metabolic, patterns: &[r"urate", r"uric\s*acid"], abbreviations: &[], excludes: &[], unit: "umol/L", plausible: (0.5, 1500.0), range: BuiltinRange::None },
];

#[rustfmt::skip]
const BUILTIN_UNITS: &[(&str, &[&str])] = &[
    ("mg/dL", &["mg/dl", "mg/100ml"]),
    ("g/dL", &["g/dl", "gm/dl"]),
    ("g/L", &["g/l"]),
    ("mg/L", &["mg/l"]),
    ("mmol/L", &["mmol/l"]),
    ("umol/L", &["umol/l", "µmol/l", "μmol/l"]),
    ("nmol/L", &["nmol/l"]),
    ("pmol/L", &["pmol/l"]),
    ("mEq/L", &["meq/l"]),
    ("U/L", &["u/l", "iu/l"]),
    ("mIU/L", &["miu/l", "mu/l", "uiu/ml", "µiu/ml", "μiu/ml"]),
    ("K/uL", &["k/ul", "k/µl", "x10^3/ul", "x10^9/l", "10^9/l"]),
    ("M/uL", &["m/ul", "m/µl", "x10^6/ul", "x10^12/l", "10^12/l"]),
    ("ng/dL", &["ng/dl"]),
    ("ng/mL", &["ng/ml"]),
    ("pg/mL", &["pg/ml"]),
    ("%", &["%", "percent"]),
];

/// Only glucose carries conversion factors. Other unit mismatches are
/// compared as-is and reported as unsupported.
const BUILTIN_CONVERSIONS: &[(&str, &str, &str, f64)] = &[
    ("glucose", "mg/dL", "mmol/L", 0.0555),
    ("glucose", "mmol/L", "mg/dL", 18.0),
];

fn range(low: f64, high: f64, unit: &str) -> ReferenceRange {
    ReferenceRange::new(low, high, unit)
}

pub fn definitions() -> Vec<TestDefinition> {
    BUILTIN_TESTS
        .iter()
        .map(|t| TestDefinition {
            canonical_name: t.canonical_name.into(),
            display_name: t.display_name.into(),
            panel: t.panel,
            name_patterns: t.patterns.iter().map(|p| p.to_string()).collect(),
            abbreviations: t.abbreviations.iter().map(|a| a.to_string()).collect(),
            exclude_patterns: t.excludes.iter().map(|e| e.to_string()).collect(),
            unit: t.unit.into(),
            plausible_range: Some(PlausibleRange {
                min: t.plausible.0,
                max: t.plausible.1,
            }),
            reference_range: match t.range {
                BuiltinRange::None => None,
                BuiltinRange::Shared(low, high) => Some(RangeSpec::Shared(range(low, high, t.unit))),
                BuiltinRange::BySex { male, female } => Some(RangeSpec::BySex {
                    male: range(male.0, male.1, t.unit),
                    female: range(female.0, female.1, t.unit),
                }),
            },
        })
        .collect()
}

pub fn unit_aliases() -> Vec<UnitAlias> {
    BUILTIN_UNITS
        .iter()
        .map(|(unit, aliases)| UnitAlias {
            unit: unit.to_string(),
            aliases: aliases.iter().map(|a| a.to_string()).collect(),
        })
        .collect()
}

pub fn conversions() -> Vec<ConversionRule> {
    BUILTIN_CONVERSIONS
        .iter()
        .map(|(test, from, to, factor)| ConversionRule {
            test: test.to_string(),
            from: from.to_string(),
            to: to.to_string(),
            factor: *factor,
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn canonical_names_unique() {
        let mut seen = HashSet::new();
        for test in BUILTIN_TESTS {
            assert!(seen.insert(test.canonical_name), "duplicate {}", test.canonical_name);
        }
    }

    #[test]
    fn bundled_ranges_are_ordered() {
        for def in definitions() {
            let plausible = def.plausible_range.unwrap();
            assert!(plausible.min < plausible.max, "{}", def.canonical_name);
            match def.reference_range {
                Some(RangeSpec::Shared(r)) => assert!(r.is_valid(), "{}", def.canonical_name),
                Some(RangeSpec::BySex { male, female }) => {
                    assert!(male.is_valid() && female.is_valid(), "{}", def.canonical_name)
                }
                None => {}
            }
        }
    }

    #[test]
    fn specific_lipids_precede_total_cholesterol() {
        let position = |name: &str| {
            BUILTIN_TESTS
                .iter()
                .position(|t| t.canonical_name == name)
                .unwrap()
        };
        assert!(position("non_hdl_cholesterol") < position("hdl"));
        assert!(position("hdl") < position("total_cholesterol"));
        assert!(position("ldl") < position("total_cholesterol"));
        assert!(position("hba1c") < position("hemoglobin"));
    }

    #[test]
    fn glucose_conversions_are_inverse_pairs() {
        let rules = conversions();
        assert_eq!(rules.len(), 2);
        assert!(rules.iter().all(|r| r.test == "glucose"));
    }
}
