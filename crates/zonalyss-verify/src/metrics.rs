use std::collections::{BTreeMap, HashSet};

use zonalyss_core::{VerifyConfig, ZONE_ID};

use crate::errors::LoadError;
use crate::values::{canonical_id, is_missing};

/// A loaded metrics CSV: header plus raw cell text.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct MetricsTable {
    headers: Vec<String>,
    rows: Vec<Vec<String>>,
}

impl MetricsTable {
    /// Parse CSV text with a header row.
    pub fn from_csv(source_id: &str, text: &str) -> Result<Self, LoadError> {
        let mut reader = csv::ReaderBuilder::new()
            .has_headers(true)
            .from_reader(text.as_bytes());

        let headers = reader
            .headers()
            .map_err(|err| LoadError::new(source_id, err))?
            .iter()
            .map(|header| header.trim().to_string())
            .collect::<Vec<_>>();
        if headers.iter().all(|header| header.is_empty()) {
            return Err(LoadError::new(source_id, "no columns to parse from file"));
        }

        let mut rows = Vec::new();
        for record in reader.records() {
            let record = record.map_err(|err| LoadError::new(source_id, err))?;
            rows.push(record.iter().map(str::to_string).collect());
        }

        Ok(Self { headers, rows })
    }

    pub fn headers(&self) -> &[String] {
        &self.headers
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn column_index(&self, name: &str) -> Option<usize> {
        self.headers.iter().position(|header| header == name)
    }

    pub fn has_column(&self, name: &str) -> bool {
        self.column_index(name).is_some()
    }

    /// Raw cells of `name`, `None` when the column is absent.
    pub fn column(&self, name: &str) -> Option<Vec<&str>> {
        let idx = self.column_index(name)?;
        Some(
            self.rows
                .iter()
                .map(|row| row.get(idx).map(String::as_str).unwrap_or_default())
                .collect(),
        )
    }

    /// Canonical `zone_id` per row, `None` when the column is absent.
    pub fn zone_ids(&self) -> Option<Vec<Option<String>>> {
        self.column(ZONE_ID)
            .map(|cells| cells.into_iter().map(canonical_id).collect())
    }

    pub fn missing_columns(&self, required: &[String]) -> Vec<String> {
        required
            .iter()
            .filter(|column| !self.has_column(column))
            .cloned()
            .collect()
    }

    /// Missing-value count for each listed column present in the table.
    pub fn null_counts(&self, columns: &[String]) -> BTreeMap<String, u64> {
        columns
            .iter()
            .filter_map(|name| {
                let cells = self.column(name)?;
                let nulls = cells.iter().filter(|cell| is_missing(cell)).count() as u64;
                Some((name.clone(), nulls))
            })
            .collect()
    }

    /// Rows whose key repeats the key of an earlier row. Missing keys compare equal.
    pub fn duplicate_rows(&self, key: &str) -> Option<u64> {
        let cells = self.column(key)?;
        let mut seen = HashSet::with_capacity(cells.len());
        let duplicates = cells
            .into_iter()
            .filter(|cell| !seen.insert(canonical_id(cell)))
            .count();
        Some(duplicates as u64)
    }
}

/// Schema and completeness diagnostics for a metrics table.
#[derive(Debug, Clone, PartialEq)]
pub struct MetricsValidation {
    pub table: MetricsTable,
    pub missing_required_columns: Vec<String>,
    pub null_counts: BTreeMap<String, u64>,
    /// `None` when the table has no `zone_id` column.
    pub duplicate_rows: Option<u64>,
}

/// Load a metrics table and check it against the configured contract.
pub fn validate_metrics(
    source_id: &str,
    text: &str,
    config: &VerifyConfig,
) -> Result<MetricsValidation, LoadError> {
    let table = MetricsTable::from_csv(source_id, text)?;
    let missing_required_columns = table.missing_columns(&config.required_metric_columns);
    let null_counts = table.null_counts(&config.null_count_columns());
    let duplicate_rows = table.duplicate_rows(ZONE_ID);

    Ok(MetricsValidation {
        table,
        missing_required_columns,
        null_counts,
        duplicate_rows,
    })
}
