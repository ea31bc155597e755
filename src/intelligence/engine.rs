use crate::models::{ClassifiedResult, PatientProfile, ReportNarrative};

use super::recommendations::generate_recommendations;
use super::risk::assess_risk;
use super::summary::generate_summary;
use super::warnings::detect_early_warnings;

/// Build the report narrative from the full classified result list.
/// Pure: the same results and profile always give the same narrative.
pub fn aggregate(results: &[ClassifiedResult], profile: &PatientProfile) -> ReportNarrative {
    let narrative = ReportNarrative {
        summary: generate_summary(results),
        risk_assessment: assess_risk(results, profile.age),
        recommendations: generate_recommendations(results, profile.age),
        early_warnings: detect_early_warnings(results),
    };

    tracing::debug!(
        results = results.len(),
        risk = narrative.risk_assessment.risk_level.as_str(),
        warnings = narrative.early_warnings.len(),
        recommendations = narrative.recommendations.len(),
        "Aggregated lab results"
    );

    narrative
}
