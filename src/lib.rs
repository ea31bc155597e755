pub mod config;
pub mod intelligence;
pub mod models;
pub mod pipeline;
pub mod pipeline_config;
pub mod reference;

pub use models::{AnalysisReport, ClassifiedResult, PatientProfile};
pub use pipeline::{analyze_batch, AnalysisError, BatchDocument, LabAnalyzer};
pub use pipeline_config::{AnalysisConfig, MatchMode, SearchWindow};
pub use reference::{CatalogError, LabCatalog};

use tracing_subscriber::EnvFilter;

/// Install the global tracing subscriber. For binaries only; the library
/// itself never initializes logging.
pub fn init_tracing() {
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            EnvFilter::try_from_env(config::LOG_ENV)
                .unwrap_or_else(|_| EnvFilter::new(config::default_log_filter())),
        )
        .init();
}
