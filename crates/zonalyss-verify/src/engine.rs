use std::time::Instant;

use tracing::{debug, info, warn};
use uuid::Uuid;
use zonalyss_core::{
    DataLayout, GeoLevel, REPORT_VERSION, ScoreSummary, VerificationReport, VerificationResult,
    VerifyConfig, ZONE_ID,
};

use crate::coverage::coverage_outcome;
use crate::errors::{GeoParseError, LoadError, SourceError};
use crate::geo::GeoIndex;
use crate::metrics::validate_metrics;
use crate::source::ContentSource;
use crate::stats::{NumericColumn, summarize};

/// Verifies boundary and metrics datasets for a geographic level.
#[derive(Debug, Clone)]
pub struct Verifier {
    config: VerifyConfig,
}

impl Verifier {
    pub fn new(config: VerifyConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &VerifyConfig {
        &self.config
    }

    /// Verify every configured dataset, keeping the configured order.
    pub fn verify_level<S: ContentSource>(
        &self,
        source: &S,
        level: GeoLevel,
    ) -> VerificationReport {
        let started = Instant::now();
        let run_id = Uuid::new_v4().to_string();
        info!(
            run_id = %run_id,
            level = %level,
            datasets = self.config.datasets.len(),
            "verification started"
        );

        let results = self
            .config
            .datasets
            .iter()
            .map(|dataset| self.verify_dataset(source, level, dataset))
            .collect::<Vec<_>>();

        let report = VerificationReport {
            report_version: REPORT_VERSION.to_string(),
            run_id,
            level,
            generated_at: chrono::Utc::now().to_rfc3339(),
            results,
        };

        info!(
            run_id = %report.run_id,
            errors = report.error_count(),
            warnings = report.warning_count(),
            failed = report.failed(),
            duration_ms = started.elapsed().as_millis() as u64,
            "verification finished"
        );
        report
    }

    /// Verify one dataset. Every failure is recorded in the result, never returned.
    pub fn verify_dataset<S: ContentSource>(
        &self,
        source: &S,
        level: GeoLevel,
        dataset: &str,
    ) -> VerificationResult {
        let mut out = VerificationResult::new(dataset);
        let layout = DataLayout::new(level);
        let geo_path = layout.geo_path();
        let metrics_path = layout.metrics_path(dataset);
        let geo_id = source.describe(&geo_path);
        let metrics_id = source.describe(&metrics_path);

        let geo_text = match source.read_text(&geo_path) {
            Ok(text) => text,
            Err(SourceError::NotFound(_)) => {
                out.push_error(format!("GeoJSON not found: {geo_id}"));
                return finish(out);
            }
            Err(err) => {
                out.push_error(GeoParseError::new(&geo_id, err).to_string());
                return finish(out);
            }
        };

        let metrics_text = match source.read_text(&metrics_path) {
            Ok(text) => text,
            Err(SourceError::NotFound(_)) => {
                out.push_error(format!("Metrics CSV not found: {metrics_id}"));
                return finish(out);
            }
            Err(err) => {
                out.push_error(load_error_message(&LoadError::new(&metrics_id, err)));
                return finish(out);
            }
        };

        let geo = match GeoIndex::from_geojson(&geo_id, &geo_text, &self.config.id_aliases) {
            Ok(geo) => geo,
            Err(err) => {
                out.push_error(err.to_string());
                return finish(out);
            }
        };
        debug!(dataset, features = geo.len(), "boundary data indexed");

        let missing_geo = geo.missing_columns(&self.config.required_geo_columns);
        if !missing_geo.is_empty() {
            out.push_error(format!(
                "GeoJSON properties missing columns: {missing_geo:?}"
            ));
        }

        let validation = match validate_metrics(&metrics_id, &metrics_text, &self.config) {
            Ok(validation) => validation,
            Err(err) => {
                out.push_error(load_error_message(&err));
                return finish(out);
            }
        };
        debug!(dataset, rows = validation.table.len(), "metrics table loaded");

        if !validation.missing_required_columns.is_empty() {
            out.push_error(format!(
                "Metrics missing required columns: {:?}",
                validation.missing_required_columns
            ));
        }

        out.info.nulls = Some(validation.null_counts);
        if let Some(duplicates) = validation.duplicate_rows.filter(|count| *count > 0) {
            out.push_warning(format!(
                "Found {duplicates} duplicate {ZONE_ID} rows in metrics."
            ));
        }

        let score = validation
            .table
            .column(&self.config.score_column)
            .map(NumericColumn::from_cells);
        out.info.score_stats = Some(
            score
                .as_ref()
                .map_or_else(ScoreSummary::empty, |column| summarize(&column.values)),
        );
        out.info.merge = Some(coverage_outcome(&geo, &validation.table));

        if let Some(column) = &score {
            if column.non_numeric > 0 {
                out.push_warning(format!(
                    "Found {} non-numeric {} values.",
                    column.non_numeric, self.config.score_column
                ));
            }
            let bounds = self.config.score_bounds;
            if column.values.iter().any(|value| !bounds.contains(*value)) {
                out.push_warning(format!(
                    "{}s outside {bounds} detected.",
                    capitalize(&self.config.score_column)
                ));
            }
        }

        finish(out)
    }
}

fn load_error_message(err: &LoadError) -> String {
    format!("Failed loading metrics CSV: {err}")
}

fn finish(out: VerificationResult) -> VerificationResult {
    if out.has_errors() {
        warn!(
            dataset = %out.dataset,
            errors = out.errors.len(),
            warnings = out.warnings.len(),
            "dataset verified with errors"
        );
    } else {
        info!(
            dataset = %out.dataset,
            warnings = out.warnings.len(),
            "dataset verified"
        );
    }
    out
}

fn capitalize(value: &str) -> String {
    let mut chars = value.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}
