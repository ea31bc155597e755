use std::sync::Arc;

use super::classify::classify_candidate;
use super::extraction::{extract_candidates, find_mentions, split_lines};
use super::validation::validate_candidates;
use super::AnalysisError;
use crate::intelligence::aggregate;
use crate::models::{AnalysisReport, ClassifiedResult, PatientProfile};
use crate::pipeline_config::AnalysisConfig;
use crate::reference::LabCatalog;

/// Deterministic multi-pass lab report analyzer.
///
/// Holds no per-document state: one analyzer can serve any number of
/// documents, concurrently, through a cheap `Clone`.
#[derive(Debug, Clone)]
pub struct LabAnalyzer {
    catalog: Arc<LabCatalog>,
    config: AnalysisConfig,
}

impl Default for LabAnalyzer {
    fn default() -> Self {
        Self::new(LabCatalog::builtin(), AnalysisConfig::default())
    }
}

impl LabAnalyzer {
    pub fn new(catalog: Arc<LabCatalog>, config: AnalysisConfig) -> Self {
        Self { catalog, config }
    }

    pub fn catalog(&self) -> &Arc<LabCatalog> {
        &self.catalog
    }

    pub fn config(&self) -> &AnalysisConfig {
        &self.config
    }

    /// Analyze one document. Never fails: a document with no usable lab
    /// results yields a report with `success == false`.
    pub fn analyze(&self, text: &str, age: Option<u32>, sex: Option<&str>) -> AnalysisReport {
        self.analyze_with_profile(text, &PatientProfile::new(age, sex))
    }

    pub fn analyze_with_profile(&self, text: &str, profile: &PatientProfile) -> AnalysisReport {
        match self.run(text, profile) {
            Ok(report) => report,
            Err(e) => {
                tracing::info!(error = %e, text_length = text.len(), "Lab analysis produced no results");
                AnalysisReport::failed(e.to_string())
            }
        }
    }

    fn run(&self, text: &str, profile: &PatientProfile) -> Result<AnalysisReport, AnalysisError> {
        // Step 1: Locate test mentions
        let lines = split_lines(text);
        let mentions = find_mentions(&lines, &self.catalog, self.config.match_mode);
        tracing::debug!(
            lines = lines.len(),
            mentions = mentions.len(),
            mode = self.config.match_mode.as_str(),
            "Matched test names"
        );
        if mentions.is_empty() {
            return Err(AnalysisError::NoLabResults);
        }

        // Step 2: Claim values, then resolve unit and printed range
        let candidates = extract_candidates(&lines, &mentions, &self.catalog, &self.config);
        tracing::debug!(candidates = candidates.len(), "Extracted candidate values");

        // Step 3: Drop implausible values and repeated tests. Misses and
        // rejections are local: the report stays successful, possibly empty.
        let validated = validate_candidates(candidates, &self.catalog);
        tracing::debug!(validated = validated.len(), "Validated candidates");

        // Step 4: Classify against reference ranges
        let results: Vec<ClassifiedResult> = validated
            .into_iter()
            .map(|c| classify_candidate(c, &self.catalog, profile.sex))
            .collect();

        // Step 5: Aggregate
        let narrative = aggregate(&results, profile);
        let report = AnalysisReport::completed(results, narrative);

        tracing::info!(
            report_id = %report.report_id,
            total = report.counts.total_tests,
            abnormal = report.counts.abnormal_count,
            critical = report.counts.critical_count,
            risk = report.risk_assessment.risk_level.as_str(),
            "Lab analysis complete"
        );

        Ok(report)
    }
}
