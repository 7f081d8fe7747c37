use std::collections::BTreeMap;

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::config::GeoLevel;

/// Distribution of a numeric column over its non-missing values.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct ScoreStats {
    pub count: u64,
    pub min: f64,
    pub p25: f64,
    pub median: f64,
    pub p75: f64,
    pub max: f64,
    pub mean: f64,
}

/// Score distribution, or the empty summary when there is nothing to describe.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(untagged)]
pub enum ScoreSummary {
    Stats(ScoreStats),
    /// Serialized as `{}`.
    Empty {},
}

impl ScoreSummary {
    pub fn empty() -> Self {
        ScoreSummary::Empty {}
    }

    pub fn is_empty(&self) -> bool {
        matches!(self, ScoreSummary::Empty {})
    }

    pub fn stats(&self) -> Option<&ScoreStats> {
        match self {
            ScoreSummary::Stats(stats) => Some(stats),
            ScoreSummary::Empty {} => None,
        }
    }
}

/// Set-overlap between boundary and metrics zone identifiers.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct CoverageReport {
    pub geo_unique: usize,
    pub metrics_unique: usize,
    pub matched: usize,
    pub geo_coverage_pct: f64,
    pub metrics_coverage_pct: f64,
    /// Identifiers present in the boundary data but absent from the metrics.
    pub missing_in_metrics: usize,
    /// Identifiers present in the metrics but absent from the boundary data.
    pub missing_in_geo: usize,
}

/// Coverage numbers, or a note explaining why none could be computed.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(untagged)]
pub enum CoverageOutcome {
    Computed(CoverageReport),
    Unavailable { note: String },
}

impl CoverageOutcome {
    pub fn report(&self) -> Option<&CoverageReport> {
        match self {
            CoverageOutcome::Computed(report) => Some(report),
            CoverageOutcome::Unavailable { .. } => None,
        }
    }
}

/// Diagnostics collected for a dataset. Entries stay `None` for steps that did not run.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct VerificationInfo {
    /// Missing-value counts per checked column that exists in the table.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub nulls: Option<BTreeMap<String, u64>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub score_stats: Option<ScoreSummary>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub merge: Option<CoverageOutcome>,
}

impl VerificationInfo {
    pub fn is_empty(&self) -> bool {
        self.nulls.is_none() && self.score_stats.is_none() && self.merge.is_none()
    }

    /// Null counts greater than zero, in column order.
    pub fn non_zero_nulls(&self) -> BTreeMap<String, u64> {
        self.nulls
            .iter()
            .flatten()
            .filter(|(_, count)| **count > 0)
            .map(|(column, count)| (column.clone(), *count))
            .collect()
    }
}

/// Outcome of verifying one dataset category at one level.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct VerificationResult {
    pub dataset: String,
    /// Conditions that make the dataset unusable.
    pub errors: Vec<String>,
    /// Conditions worth surfacing that do not fail the run.
    pub warnings: Vec<String>,
    pub info: VerificationInfo,
}

impl VerificationResult {
    pub fn new(dataset: impl Into<String>) -> Self {
        Self {
            dataset: dataset.into(),
            errors: Vec::new(),
            warnings: Vec::new(),
            info: VerificationInfo::default(),
        }
    }

    pub fn push_error(&mut self, message: impl Into<String>) {
        self.errors.push(message.into());
    }

    pub fn push_warning(&mut self, message: impl Into<String>) {
        self.warnings.push(message.into());
    }

    pub fn has_errors(&self) -> bool {
        !self.errors.is_empty()
    }
}

/// Structured report for one verification run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct VerificationReport {
    /// Contract version for this report format.
    pub report_version: String,
    pub run_id: String,
    pub level: GeoLevel,
    /// RFC 3339 timestamp of the run.
    pub generated_at: String,
    /// One entry per dataset, in configured order.
    pub results: Vec<VerificationResult>,
}

impl VerificationReport {
    /// A run fails when any dataset recorded an error. Warnings never fail it.
    pub fn failed(&self) -> bool {
        self.results.iter().any(VerificationResult::has_errors)
    }

    pub fn error_count(&self) -> usize {
        self.results.iter().map(|result| result.errors.len()).sum()
    }

    pub fn warning_count(&self) -> usize {
        self.results.iter().map(|result| result.warnings.len()).sum()
    }
}
