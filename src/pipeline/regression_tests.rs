//! End-to-end regression over a stacked lipid report, one field per line,
//! SI units and lab flags. Every row is classified against the range the
//! report prints in its own unit, so the classifications agree with the
//! lab's HI/LO flags.

use super::LabAnalyzer;
use crate::models::{
    AbnormalFlag, AnalysisReport, Classification, RangeSource, RiskLevel, UnitConversion,
    WarningType,
};

const LIPID_REPORT: &str = "\
LIPID STUDIES
Collected: 02/08/2025
Urate HI 590 230-480 umol/L
Triglycerides
HI 1.98 FASTING
Desired: <1.00 mmol/L
Cholesterol
HI 5.20
Desired: <4.40 mmol/L
HDL Cholesterol
LO 0.95
Desired: >1.20 mmol/L
LDL Cholesterol
HI 3.43
Desired: <2.80 mmol/L
Non-HDL Cholesterol
HI 4.25
Desired: <3.10 mmol/L
";

struct Expected {
    test: &'static str,
    value: f64,
    flag: AbnormalFlag,
    unit: &'static str,
    range_text: &'static str,
    classification: Classification,
}

const EXPECTED: &[Expected] = &[
    Expected { test: "urate", value: 590.0, flag: AbnormalFlag::High, unit: "umol/L", range_text: "230-480", classification: Classification::High },
    Expected { test: "triglycerides", value: 1.98, flag: AbnormalFlag::High, unit: "mmol/L", range_text: "<1.00", classification: Classification::High },
    Expected { test: "total_cholesterol", value: 5.20, flag: AbnormalFlag::High, unit: "mmol/L", range_text: "<4.40", classification: Classification::High },
    Expected { test: "hdl", value: 0.95, flag: AbnormalFlag::Low, unit: "mmol/L", range_text: ">1.20", classification: Classification::Low },
    Expected { test: "ldl", value: 3.43, flag: AbnormalFlag::High, unit: "mmol/L", range_text: "<2.80", classification: Classification::High },
    Expected { test: "non_hdl_cholesterol", value: 4.25, flag: AbnormalFlag::High, unit: "mmol/L", range_text: "<3.10", classification: Classification::High },
];

fn report() -> AnalysisReport {
    LabAnalyzer::default().analyze(LIPID_REPORT, None, None)
}

#[test]
fn extracts_every_row_in_order() {
    let report = report();
    assert!(report.success);
    let names: Vec<_> = report.results.iter().map(|r| r.canonical_name()).collect();
    let expected: Vec<_> = EXPECTED.iter().map(|e| e.test).collect();
    assert_eq!(names, expected);
}

#[test]
fn row_values_units_and_classifications() {
    let report = report();
    for e in EXPECTED {
        let r = report.result(e.test).unwrap_or_else(|| panic!("missing {}", e.test));
        assert_eq!(r.candidate.value, e.value, "{}", e.test);
        assert_eq!(r.candidate.flag, e.flag, "{}", e.test);
        assert_eq!(r.candidate.unit, e.unit, "{}", e.test);
        assert_eq!(r.candidate.reference_range_text, e.range_text, "{}", e.test);
        assert_eq!(r.classification, e.classification, "{}", e.test);
    }
}

#[test]
fn printed_ranges_fill_catalog_gaps() {
    let report = report();
    let urate = report.result("urate").unwrap();
    assert_eq!(urate.applied_range.as_ref().unwrap().source, RangeSource::Document);

    let non_hdl = report.result("non_hdl_cholesterol").unwrap();
    let applied = non_hdl.applied_range.as_ref().unwrap();
    assert_eq!(applied.source, RangeSource::Document);
    assert_eq!((applied.range.low, applied.range.high), (0.0, 3.10));
}

#[test]
fn si_lipids_use_printed_ranges_with_caveat() {
    let report = report();
    for test in ["triglycerides", "total_cholesterol", "hdl", "ldl"] {
        let r = report.result(test).unwrap();
        let applied = r.applied_range.as_ref().unwrap();
        assert_eq!(applied.source, RangeSource::Document, "{test}");
        assert_eq!(applied.range.unit, "mmol/L", "{test}");
        assert_eq!(r.unit_conversion, UnitConversion::NotNeeded, "{test}");
        // The unit substitution only; the HI/LO flags agree.
        assert_eq!(r.caveats.len(), 1, "{test}");
    }

    let urate = report.result("urate").unwrap();
    assert!(urate.caveats.is_empty());
}

#[test]
fn flags_agree_with_classifications() {
    for r in &report().results {
        match r.candidate.flag {
            AbnormalFlag::High => assert!(r.classification.is_high(), "{}", r.canonical_name()),
            AbnormalFlag::Low => assert!(r.classification.is_low(), "{}", r.canonical_name()),
            AbnormalFlag::None => {}
        }
    }
}

#[test]
fn counts_risk_and_warnings() {
    let report = report();
    assert_eq!(report.counts.total_tests, 6);
    assert_eq!(report.counts.normal_count, 0);
    assert_eq!(report.counts.abnormal_count, 6);
    assert_eq!(report.counts.critical_count, 0);
    assert_eq!(report.counts.unknown_count, 0);
    assert!(report.critical_findings.is_empty());
    assert_eq!(report.abnormal_findings.len(), 6);

    assert_eq!(report.risk_assessment.risk_level, RiskLevel::High);
    for factor in ["Elevated LDL cholesterol", "Low HDL cholesterol", "Elevated triglycerides"] {
        assert!(
            report.risk_assessment.risk_factors.contains(&factor.to_string()),
            "{factor}"
        );
    }

    let warnings: Vec<_> = report.early_warnings.iter().map(|w| w.warning_type).collect();
    assert_eq!(
        warnings,
        vec![WarningType::Cardiovascular, WarningType::Metabolic, WarningType::Joint]
    );

    assert!(report.summary.starts_with("Your lab results show 6 values"), "{}", report.summary);
    assert!(report.summary.contains("5 cholesterol-related results"));
    assert!(report.summary.contains("1 metabolism-related result that"));
    assert!(!report.summary.contains("URGENT"));
}

#[test]
fn report_json_shape() {
    let json = serde_json::to_value(report()).unwrap();
    assert_eq!(json["success"], true);
    assert_eq!(json["total_tests"], 6);
    assert_eq!(json["risk_assessment"]["risk_level"], "HIGH");
    assert_eq!(json["results"][0]["test_name"], "urate");
    assert_eq!(json["results"][0]["original_name"], "Urate HI 590 230-480 umol/L");
    assert_eq!(json["results"][0]["reference_range"], "230-480");
    assert_eq!(json["results"][0]["flag"], "HI");
    assert_eq!(json["early_warnings"][0]["type"], "CARDIOVASCULAR");
    assert_eq!(json["early_warnings"][2]["type"], "JOINT");
    assert!(json.get("error").is_none());
}
