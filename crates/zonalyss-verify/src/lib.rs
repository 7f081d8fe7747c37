//! Geo/metrics consistency verification.
//!
//! Cross-checks a GeoJSON boundary collection against per-dataset metrics
//! CSVs: required columns, missing values, duplicate zone ids, score
//! distribution and identifier coverage. Every problem is recorded in a
//! [`zonalyss_core::VerificationResult`]; rendering and persistence only
//! consume those records.

pub mod coverage;
pub mod engine;
pub mod errors;
pub mod geo;
pub mod metrics;
pub mod persist;
pub mod report;
pub mod source;
pub mod stats;
pub mod values;

pub use coverage::{CoverageAnalysis, analyze_coverage, coverage_outcome};
pub use engine::Verifier;
pub use errors::{GeoParseError, LoadError, ReportError, SourceError};
pub use geo::GeoIndex;
pub use metrics::{MetricsTable, MetricsValidation, validate_metrics};
pub use persist::{ReportFormat, write_report};
pub use report::{render_console, render_markdown};
pub use source::{ContentSource, FsSource, MemorySource};
pub use stats::{summarize, summarize_column};
