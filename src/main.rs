//! labscan - lab report analysis CLI
//!
//! Reads OCR text from a file (or stdin), extracts and classifies lab
//! results, and prints the analysis report as JSON.
//!
//! ```bash
//! labscan report.txt --age 52 --sex female
//! ocr-tool scan.pdf | labscan --mode strict --compact
//! ```

use std::io::{self, Read};
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use std::sync::Arc;

use clap::{Parser, ValueEnum};
use thiserror::Error;

use labscan::config;
use labscan::{AnalysisConfig, CatalogError, LabAnalyzer, LabCatalog, MatchMode};

#[derive(Error, Debug)]
enum CliError {
    #[error("Failed to read {0}: {1}")]
    Input(String, io::Error),

    #[error(transparent)]
    Catalog(#[from] CatalogError),

    #[error("Failed to encode report: {0}")]
    Output(#[from] serde_json::Error),
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum ModeArg {
    Strict,
    Lenient,
}

impl From<ModeArg> for MatchMode {
    fn from(mode: ModeArg) -> Self {
        match mode {
            ModeArg::Strict => MatchMode::Strict,
            ModeArg::Lenient => MatchMode::Lenient,
        }
    }
}

/// Extract and classify lab results from OCR text
#[derive(Parser, Debug)]
#[command(name = "labscan", version, about)]
struct Args {
    /// Text file to analyze (reads stdin when omitted)
    #[arg(value_name = "FILE")]
    file: Option<PathBuf>,

    /// Patient age in years
    #[arg(long)]
    age: Option<u32>,

    /// Patient sex (male/female)
    #[arg(long)]
    sex: Option<String>,

    /// Test-name matching mode
    #[arg(long, value_enum, default_value = "lenient")]
    mode: ModeArg,

    /// Catalog JSON replacing the bundled tables (falls back to $LABSCAN_CATALOG)
    #[arg(long, value_name = "PATH")]
    catalog: Option<PathBuf>,

    /// Print single-line JSON
    #[arg(long)]
    compact: bool,
}

fn read_input(file: Option<&Path>) -> Result<String, CliError> {
    match file {
        Some(path) => std::fs::read_to_string(path)
            .map_err(|e| CliError::Input(path.display().to_string(), e)),
        None => {
            let mut text = String::new();
            io::stdin()
                .read_to_string(&mut text)
                .map_err(|e| CliError::Input("stdin".into(), e))?;
            Ok(text)
        }
    }
}

fn load_catalog(path: Option<PathBuf>) -> Result<Arc<LabCatalog>, CliError> {
    match path.or_else(config::catalog_path_from_env) {
        Some(path) => Ok(Arc::new(LabCatalog::load(&path)?)),
        None => Ok(LabCatalog::builtin()),
    }
}

fn run(args: Args) -> Result<bool, CliError> {
    let catalog = load_catalog(args.catalog)?;
    let analyzer = LabAnalyzer::new(catalog, AnalysisConfig::with_mode(args.mode.into()));

    let text = read_input(args.file.as_deref())?;
    let report = analyzer.analyze(&text, args.age, args.sex.as_deref());

    let json = if args.compact {
        serde_json::to_string(&report)?
    } else {
        serde_json::to_string_pretty(&report)?
    };
    println!("{json}");

    Ok(report.success)
}

fn main() -> ExitCode {
    labscan::init_tracing();
    let args = Args::parse();
    tracing::debug!("{} v{}", config::APP_NAME, config::APP_VERSION);

    match run(args) {
        Ok(true) => ExitCode::SUCCESS,
        Ok(false) => ExitCode::from(2),
        Err(e) => {
            tracing::error!(error = %e, "labscan failed");
            eprintln!("error: {e}");
            ExitCode::FAILURE
        }
    }
}
