use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::enums::{Classification, RiskLevel, Sex, WarningSeverity, WarningType};
use super::lab::ClassifiedResult;

/// Optional demographics supplied alongside the document text.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PatientProfile {
    pub age: Option<u32>,
    pub sex: Option<Sex>,
}

impl PatientProfile {
    pub fn new(age: Option<u32>, sex: Option<&str>) -> Self {
        Self {
            age,
            sex: sex.and_then(Sex::parse_loose),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RiskAssessment {
    pub risk_level: RiskLevel,
    pub risk_factors: Vec<String>,
    pub recommendations: Vec<String>,
}

impl Default for RiskAssessment {
    fn default() -> Self {
        Self {
            risk_level: RiskLevel::Low,
            risk_factors: Vec::new(),
            recommendations: Vec::new(),
        }
    }
}

/// Output of a cross-test pattern detector.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EarlyWarning {
    #[serde(rename = "type")]
    pub warning_type: WarningType,
    pub severity: WarningSeverity,
    pub message: String,
    pub action: String,
}

/// Derived counts over a result list.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResultCounts {
    pub total_tests: usize,
    pub normal_count: usize,
    /// LOW, HIGH and both critical tiers.
    pub abnormal_count: usize,
    /// Subset of `abnormal_count`.
    pub critical_count: usize,
    pub unknown_count: usize,
}

impl ResultCounts {
    pub fn tally(results: &[ClassifiedResult]) -> Self {
        let mut counts = Self {
            total_tests: results.len(),
            ..Self::default()
        };
        for result in results {
            match result.classification {
                Classification::Normal => counts.normal_count += 1,
                Classification::Unknown => counts.unknown_count += 1,
                c => {
                    counts.abnormal_count += 1;
                    if c.is_critical() {
                        counts.critical_count += 1;
                    }
                }
            }
        }
        counts
    }

    /// Abnormal results that are not critical.
    pub fn other_abnormal(&self) -> usize {
        self.abnormal_count - self.critical_count
    }
}

/// Aggregate narrative produced by the intelligence layer.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ReportNarrative {
    pub summary: String,
    pub risk_assessment: RiskAssessment,
    pub recommendations: Vec<String>,
    pub early_warnings: Vec<EarlyWarning>,
}

/// Per-document analysis outcome. Built once, never mutated.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnalysisReport {
    pub report_id: Uuid,
    pub analyzed_at: NaiveDateTime,
    pub success: bool,
    pub results: Vec<ClassifiedResult>,
    #[serde(flatten)]
    pub counts: ResultCounts,
    pub critical_findings: Vec<String>,
    pub abnormal_findings: Vec<String>,
    pub summary: String,
    pub risk_assessment: RiskAssessment,
    pub recommendations: Vec<String>,
    pub early_warnings: Vec<EarlyWarning>,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub error: Option<String>,
}

impl AnalysisReport {
    pub fn completed(results: Vec<ClassifiedResult>, narrative: ReportNarrative) -> Self {
        let counts = ResultCounts::tally(&results);
        let critical_findings = results
            .iter()
            .filter(|r| r.classification.is_critical())
            .map(|r| r.canonical_name().to_string())
            .collect();
        let abnormal_findings = results
            .iter()
            .filter(|r| r.classification.is_abnormal())
            .map(|r| r.canonical_name().to_string())
            .collect();

        Self {
            report_id: Uuid::new_v4(),
            analyzed_at: chrono::Local::now().naive_local(),
            success: true,
            results,
            counts,
            critical_findings,
            abnormal_findings,
            summary: narrative.summary,
            risk_assessment: narrative.risk_assessment,
            recommendations: narrative.recommendations,
            early_warnings: narrative.early_warnings,
            error: None,
        }
    }

    pub fn failed(error: impl Into<String>) -> Self {
        Self {
            report_id: Uuid::new_v4(),
            analyzed_at: chrono::Local::now().naive_local(),
            success: false,
            results: Vec::new(),
            counts: ResultCounts::default(),
            critical_findings: Vec::new(),
            abnormal_findings: Vec::new(),
            summary: String::new(),
            risk_assessment: RiskAssessment::default(),
            recommendations: Vec::new(),
            early_warnings: Vec::new(),
            error: Some(error.into()),
        }
    }

    pub fn result(&self, canonical_name: &str) -> Option<&ClassifiedResult> {
        self.results.iter().find(|r| r.is(canonical_name))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::test_support::classified;

    #[test]
    fn tally_partitions_total() {
        let results = vec![
            classified("glucose", 120.0, Classification::High),
            classified("hdl", 10.0, Classification::CriticalLow),
            classified("ldl", 90.0, Classification::Normal),
            classified("urate", 300.0, Classification::Unknown),
        ];
        let counts = ResultCounts::tally(&results);
        assert_eq!(counts.total_tests, 4);
        assert_eq!(counts.normal_count, 1);
        assert_eq!(counts.abnormal_count, 2);
        assert_eq!(counts.critical_count, 1);
        assert_eq!(counts.unknown_count, 1);
        assert_eq!(
            counts.normal_count + counts.abnormal_count + counts.unknown_count,
            counts.total_tests
        );
        assert_eq!(counts.other_abnormal(), 1);
    }

    #[test]
    fn failed_report_shape() {
        let report = AnalysisReport::failed("No lab results found in the text");
        assert!(!report.success);
        assert!(report.results.is_empty());
        assert_eq!(report.counts.total_tests, 0);

        let json = serde_json::to_value(&report).unwrap();
        assert_eq!(json["success"], false);
        assert_eq!(json["error"], "No lab results found in the text");
        assert_eq!(json["total_tests"], 0);
    }

    #[test]
    fn completed_report_omits_error_and_lists_findings() {
        let results = vec![
            classified("hdl", 10.0, Classification::CriticalLow),
            classified("ldl", 130.0, Classification::High),
        ];
        let report = AnalysisReport::completed(results, ReportNarrative::default());
        assert!(report.success);
        assert_eq!(report.critical_findings, vec!["hdl"]);
        assert_eq!(report.abnormal_findings, vec!["hdl", "ldl"]);

        let json = serde_json::to_value(&report).unwrap();
        assert!(json.get("error").is_none());
        assert_eq!(json["results"][0]["test_name"], "hdl");
        assert_eq!(json["results"][0]["classification"], "CRITICAL_LOW");
        assert_eq!(json["abnormal_count"], 2);
    }
}
