//! Concurrent multi-document analysis.
//!
//! Each document runs as an independent blocking task sharing one
//! analyzer (and so one `Arc<LabCatalog>`). Reports come back in input order.

use serde::{Deserialize, Serialize};

use super::orchestrator::LabAnalyzer;
use super::AnalysisError;
use crate::models::{AnalysisReport, PatientProfile};

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct BatchDocument {
    pub text: String,
    #[serde(default)]
    pub profile: PatientProfile,
}

impl BatchDocument {
    pub fn new(text: impl Into<String>, profile: PatientProfile) -> Self {
        Self {
            text: text.into(),
            profile,
        }
    }
}

pub async fn analyze_batch(analyzer: &LabAnalyzer, documents: Vec<BatchDocument>) -> Vec<AnalysisReport> {
    let total = documents.len();
    tracing::info!(documents = total, "Starting batch analysis");

    let handles: Vec<_> = documents
        .into_iter()
        .map(|doc| {
            let analyzer = analyzer.clone();
            tokio::task::spawn_blocking(move || analyzer.analyze_with_profile(&doc.text, &doc.profile))
        })
        .collect();

    let mut reports = Vec::with_capacity(total);
    for (index, handle) in handles.into_iter().enumerate() {
        let report = match handle.await {
            Ok(report) => report,
            Err(e) => {
                tracing::warn!(index, error = %e, "Batch analysis task failed");
                AnalysisReport::failed(AnalysisError::TaskFailed(e.to_string()).to_string())
            }
        };
        reports.push(report);
    }

    let succeeded = reports.iter().filter(|r| r.success).count();
    tracing::info!(documents = total, succeeded, "Batch analysis complete");

    reports
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn preserves_input_order() {
        let docs = vec![
            BatchDocument::new("Glucose 120 mg/dL", PatientProfile::default()),
            BatchDocument::new("nothing to see here", PatientProfile::default()),
            BatchDocument::new("Urate HI 590 230-480 umol/L", PatientProfile::default()),
        ];
        let reports = analyze_batch(&LabAnalyzer::default(), docs).await;
        assert_eq!(reports.len(), 3);
        assert!(reports[0].result("glucose").is_some());
        assert!(!reports[1].success);
        assert!(reports[2].result("urate").is_some());
    }

    #[tokio::test]
    async fn profiles_are_per_document() {
        let text = "Hemoglobin 13.0 g/dL";
        let docs = vec![
            BatchDocument::new(text, PatientProfile::new(None, Some("male"))),
            BatchDocument::new(text, PatientProfile::new(None, Some("female"))),
        ];
        let reports = analyze_batch(&LabAnalyzer::default(), docs).await;
        assert_ne!(
            reports[0].results[0].classification,
            reports[1].results[0].classification
        );
    }

    #[tokio::test]
    async fn empty_batch() {
        let reports = analyze_batch(&LabAnalyzer::default(), Vec::new()).await;
        assert!(reports.is_empty());
    }

    #[test]
    fn batch_document_profile_defaults() {
        let doc: BatchDocument = serde_json::from_str(r#"{"text": "Glucose 90"}"#).unwrap();
        assert_eq!(doc.profile, PatientProfile::default());
    }
}
