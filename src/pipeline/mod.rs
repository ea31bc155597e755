pub mod extraction;
pub mod validation;
pub mod classify;
pub mod orchestrator;
pub mod batch;

#[cfg(test)]
mod regression_tests;

pub use batch::{analyze_batch, BatchDocument};
pub use orchestrator::LabAnalyzer;

use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum AnalysisError {
    #[error("No lab results found in the text")]
    NoLabResults,

    #[error("Analysis task failed: {0}")]
    TaskFailed(String),
}
