use std::collections::BTreeSet;
use std::fmt;
use std::str::FromStr;

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// Canonical zone identifier column.
pub const ZONE_ID: &str = "zone_id";
/// Canonical zone display name column.
pub const ZONE_NAME: &str = "zone_name";

/// Dataset categories verified when no configuration overrides them.
pub const DEFAULT_DATASETS: &[&str] = &["apartments", "houses", "desks"];

/// Columns every metrics table must expose.
pub const REQUIRED_METRIC_COLUMNS: &[&str] = &[ZONE_ID, ZONE_NAME, "score"];

/// Properties every boundary feature table must expose after aliasing.
pub const REQUIRED_GEO_COLUMNS: &[&str] = &[ZONE_ID, ZONE_NAME];

/// Optional metrics columns that take part in null diagnostics.
pub const ENRICHMENT_COLUMNS: &[&str] = &[
    "income",
    "employment_rate",
    "pop_growth",
    "avg_price_m2",
    "rent_index",
    "vacancy_rate",
];

/// Geographic granularity of a verification run.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, JsonSchema,
)]
#[serde(rename_all = "snake_case")]
pub enum GeoLevel {
    Communes,
    Quartiers,
}

impl GeoLevel {
    pub const ALL: [GeoLevel; 2] = [GeoLevel::Communes, GeoLevel::Quartiers];

    pub fn as_str(self) -> &'static str {
        match self {
            GeoLevel::Communes => "communes",
            GeoLevel::Quartiers => "quartiers",
        }
    }

    /// Capitalized label used in report headings.
    pub fn title(self) -> &'static str {
        match self {
            GeoLevel::Communes => "Communes",
            GeoLevel::Quartiers => "Quartiers",
        }
    }
}

impl fmt::Display for GeoLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for GeoLevel {
    type Err = Error;

    fn from_str(value: &str) -> Result<Self> {
        GeoLevel::ALL
            .into_iter()
            .find(|level| level.as_str().eq_ignore_ascii_case(value.trim()))
            .ok_or_else(|| Error::UnknownLevel(value.to_string()))
    }
}

/// Maps a provider-specific property name onto a canonical column.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct PropertyAlias {
    /// Property name as found in the boundary data (e.g. `INSEE_COM`).
    pub source: String,
    /// Canonical column the property is renamed to (e.g. `zone_id`).
    pub canonical: String,
}

impl PropertyAlias {
    pub fn new(source: impl Into<String>, canonical: impl Into<String>) -> Self {
        Self {
            source: source.into(),
            canonical: canonical.into(),
        }
    }
}

/// Inclusive range a score is expected to fall in.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(default)]
pub struct ScoreBounds {
    pub min: f64,
    pub max: f64,
}

impl ScoreBounds {
    pub fn contains(&self, value: f64) -> bool {
        value >= self.min && value <= self.max
    }
}

impl Default for ScoreBounds {
    fn default() -> Self {
        Self {
            min: 0.0,
            max: 100.0,
        }
    }
}

impl fmt::Display for ScoreBounds {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{},{}]", self.min, self.max)
    }
}

/// Configuration for a verification run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(default)]
pub struct VerifyConfig {
    /// Dataset categories, in report order.
    pub datasets: Vec<String>,
    /// Columns a metrics table must expose.
    pub required_metric_columns: Vec<String>,
    /// Columns the boundary properties must expose after aliasing.
    pub required_geo_columns: Vec<String>,
    /// Optional metrics columns included in null diagnostics.
    pub enrichment_columns: Vec<String>,
    /// Property aliases applied to boundary data, first match wins.
    pub id_aliases: Vec<PropertyAlias>,
    /// Numeric column summarized and bounds-checked.
    pub score_column: String,
    pub score_bounds: ScoreBounds,
}

impl Default for VerifyConfig {
    fn default() -> Self {
        Self {
            datasets: to_strings(DEFAULT_DATASETS),
            required_metric_columns: to_strings(REQUIRED_METRIC_COLUMNS),
            required_geo_columns: to_strings(REQUIRED_GEO_COLUMNS),
            enrichment_columns: to_strings(ENRICHMENT_COLUMNS),
            id_aliases: vec![
                PropertyAlias::new("INSEE_COM", ZONE_ID),
                PropertyAlias::new("NOM_COM", ZONE_NAME),
                PropertyAlias::new("CODE_IRIS", ZONE_ID),
                PropertyAlias::new("NOM_IRIS", ZONE_NAME),
            ],
            score_column: "score".to_string(),
            score_bounds: ScoreBounds::default(),
        }
    }
}

impl VerifyConfig {
    /// Check internal consistency of the configuration.
    pub fn validate(&self) -> Result<()> {
        if self.datasets.is_empty() {
            return Err(Error::InvalidConfig("no datasets configured".to_string()));
        }

        let mut seen = BTreeSet::new();
        for dataset in &self.datasets {
            if dataset.is_empty()
                || dataset.contains(['/', '\\'])
                || dataset.starts_with('.')
            {
                return Err(Error::InvalidConfig(format!(
                    "invalid dataset name: '{dataset}'"
                )));
            }
            if !seen.insert(dataset.as_str()) {
                return Err(Error::InvalidConfig(format!(
                    "duplicate dataset name: {dataset}"
                )));
            }
        }

        if self.score_column.trim().is_empty() {
            return Err(Error::InvalidConfig("score column is empty".to_string()));
        }

        let bounds = self.score_bounds;
        if !bounds.min.is_finite() || !bounds.max.is_finite() || bounds.min > bounds.max {
            return Err(Error::InvalidConfig(format!(
                "invalid score bounds: {bounds}"
            )));
        }

        for alias in &self.id_aliases {
            if alias.source.is_empty() || alias.canonical.is_empty() {
                return Err(Error::InvalidConfig(format!(
                    "empty property alias: '{}' -> '{}'",
                    alias.source, alias.canonical
                )));
            }
        }

        Ok(())
    }

    /// Columns checked for missing values: required first, then enrichment.
    pub fn null_count_columns(&self) -> Vec<String> {
        let mut seen = BTreeSet::new();
        self.required_metric_columns
            .iter()
            .chain(&self.enrichment_columns)
            .filter(|column| seen.insert(column.as_str()))
            .cloned()
            .collect()
    }
}

fn to_strings(values: &[&str]) -> Vec<String> {
    values.iter().map(|value| value.to_string()).collect()
}
