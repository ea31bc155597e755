//! Lab reference catalog: test definitions, reference and plausibility
//! ranges, unit aliases and conversion rules.

pub mod builtin;
pub mod catalog;
pub mod units;

pub use catalog::{
    ConversionRule, LabCatalog, PlausibleRange, RangeSpec, TestDefinition, UnitAlias,
};

use thiserror::Error;

#[derive(Error, Debug)]
pub enum CatalogError {
    #[error("Catalog load failed ({0}): {1}")]
    Load(String, String),

    #[error("Catalog parse failed: {0}")]
    Parse(String),

    #[error("Invalid pattern for {0}: {1}")]
    InvalidPattern(String, String),

    #[error("Catalog validation failed: {0}")]
    Validation(String),
}
