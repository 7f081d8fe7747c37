//! Core contracts for Zonalyss.
//!
//! This crate defines the verification configuration, the per-dataset
//! verification record, and the data layout shared by the engine and the CLI.

pub mod config;
pub mod error;
pub mod layout;
pub mod result;

pub use config::{
    DEFAULT_DATASETS, ENRICHMENT_COLUMNS, GeoLevel, PropertyAlias, REQUIRED_GEO_COLUMNS,
    REQUIRED_METRIC_COLUMNS, ScoreBounds, VerifyConfig, ZONE_ID, ZONE_NAME,
};
pub use error::{Error, Result};
pub use layout::DataLayout;
pub use result::{
    CoverageOutcome, CoverageReport, ScoreStats, ScoreSummary, VerificationInfo,
    VerificationReport, VerificationResult,
};

/// Current contract version for serialized verification reports.
pub const REPORT_VERSION: &str = "0.1";
