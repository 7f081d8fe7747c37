use std::collections::BTreeSet;

use zonalyss_core::{CoverageOutcome, CoverageReport};

use crate::geo::GeoIndex;
use crate::metrics::MetricsTable;

pub const MISSING_ZONE_ID_NOTE: &str = "zone_id not in both tables";

/// Identifier sets behind a coverage report.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CoverageAnalysis {
    geo_ids: BTreeSet<String>,
    metrics_ids: BTreeSet<String>,
}

impl CoverageAnalysis {
    /// Build from canonical identifiers. Missing identifiers are skipped.
    pub fn from_ids(
        geo_ids: impl IntoIterator<Item = Option<String>>,
        metrics_ids: impl IntoIterator<Item = Option<String>>,
    ) -> Self {
        Self {
            geo_ids: geo_ids.into_iter().flatten().collect(),
            metrics_ids: metrics_ids.into_iter().flatten().collect(),
        }
    }

    pub fn report(&self) -> CoverageReport {
        let matched = self.geo_ids.intersection(&self.metrics_ids).count();
        CoverageReport {
            geo_unique: self.geo_ids.len(),
            metrics_unique: self.metrics_ids.len(),
            matched,
            geo_coverage_pct: percentage(matched, self.geo_ids.len()),
            metrics_coverage_pct: percentage(matched, self.metrics_ids.len()),
            missing_in_metrics: self.geo_ids.difference(&self.metrics_ids).count(),
            missing_in_geo: self.metrics_ids.difference(&self.geo_ids).count(),
        }
    }

    /// Boundary identifiers with no metrics row. Debug use; not part of the report.
    pub fn missing_in_metrics_ids(&self) -> Vec<&str> {
        self.geo_ids
            .difference(&self.metrics_ids)
            .map(String::as_str)
            .collect()
    }

    /// Metrics identifiers with no boundary feature. Debug use; not part of the report.
    pub fn missing_in_geo_ids(&self) -> Vec<&str> {
        self.metrics_ids
            .difference(&self.geo_ids)
            .map(String::as_str)
            .collect()
    }
}

/// Coverage between the two tables, or a note when either lacks `zone_id`.
pub fn analyze_coverage(geo: &GeoIndex, metrics: &MetricsTable) -> Option<CoverageAnalysis> {
    let geo_ids = geo.zone_ids()?;
    let metrics_ids = metrics.zone_ids()?;
    Some(CoverageAnalysis::from_ids(geo_ids, metrics_ids))
}

pub fn coverage_outcome(geo: &GeoIndex, metrics: &MetricsTable) -> CoverageOutcome {
    match analyze_coverage(geo, metrics) {
        Some(analysis) => CoverageOutcome::Computed(analysis.report()),
        None => CoverageOutcome::Unavailable {
            note: MISSING_ZONE_ID_NOTE.to_string(),
        },
    }
}

/// `100 * part / total` rounded to two decimals, ties to even; an empty side
/// counts as 0%.
fn percentage(part: usize, total: usize) -> f64 {
    let pct = 100.0 * part as f64 / total.max(1) as f64;
    (pct * 100.0).round_ties_even() / 100.0
}
