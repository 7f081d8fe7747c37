use serde::Deserialize;
use serde_json::{Map, Value};
use zonalyss_core::{PropertyAlias, ZONE_ID};

use crate::errors::GeoParseError;
use crate::values::canonical_id_value;

#[derive(Debug, Deserialize)]
struct FeatureCollection {
    #[serde(default)]
    features: Vec<Feature>,
}

#[derive(Debug, Deserialize)]
struct Feature {
    #[serde(default)]
    properties: Option<Map<String, Value>>,
}

/// Tabular projection of boundary feature properties. Geometry is dropped.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct GeoIndex {
    columns: Vec<String>,
    rows: Vec<Map<String, Value>>,
}

impl GeoIndex {
    /// Parse a GeoJSON feature collection and normalize its property names.
    pub fn from_geojson(
        source_id: &str,
        text: &str,
        aliases: &[PropertyAlias],
    ) -> Result<Self, GeoParseError> {
        let collection: FeatureCollection =
            serde_json::from_str(text).map_err(|err| GeoParseError::new(source_id, err))?;
        let rows = collection
            .features
            .into_iter()
            .map(|feature| feature.properties.unwrap_or_default())
            .collect();
        Ok(Self::from_rows(rows, aliases))
    }

    /// Build an index from property rows, then apply `aliases`.
    pub fn from_rows(rows: Vec<Map<String, Value>>, aliases: &[PropertyAlias]) -> Self {
        let mut columns: Vec<String> = Vec::new();
        for row in &rows {
            for key in row.keys() {
                if !columns.contains(key) {
                    columns.push(key.clone());
                }
            }
        }

        let mut index = Self { columns, rows };
        index.apply_aliases(aliases);
        index
    }

    fn apply_aliases(&mut self, aliases: &[PropertyAlias]) {
        for alias in aliases {
            if self.has_column(&alias.canonical) || !self.has_column(&alias.source) {
                continue;
            }
            for column in &mut self.columns {
                if *column == alias.source {
                    *column = alias.canonical.clone();
                }
            }
            for row in &mut self.rows {
                if let Some(value) = row.remove(&alias.source) {
                    row.insert(alias.canonical.clone(), value);
                }
            }
        }
    }

    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    pub fn has_column(&self, name: &str) -> bool {
        self.columns.iter().any(|column| column == name)
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn rows(&self) -> &[Map<String, Value>] {
        &self.rows
    }

    /// Canonical `zone_id` per feature, `None` when the column is absent.
    pub fn zone_ids(&self) -> Option<Vec<Option<String>>> {
        if !self.has_column(ZONE_ID) {
            return None;
        }
        Some(
            self.rows
                .iter()
                .map(|row| row.get(ZONE_ID).and_then(canonical_id_value))
                .collect(),
        )
    }

    /// Required columns absent from the projection, in the order given.
    pub fn missing_columns(&self, required: &[String]) -> Vec<String> {
        required
            .iter()
            .filter(|column| !self.has_column(column))
            .cloned()
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use zonalyss_core::VerifyConfig;

    fn aliases() -> Vec<PropertyAlias> {
        VerifyConfig::default().id_aliases
    }

    #[test]
    fn renames_provider_properties() {
        let text = r#"{
            "type": "FeatureCollection",
            "features": [
                {"type": "Feature", "geometry": null,
                 "properties": {"INSEE_COM": "69123", "NOM_COM": "Lyon", "POP": 522969}}
            ]
        }"#;
        let index = GeoIndex::from_geojson("test", text, &aliases()).expect("parse geojson");
        assert_eq!(index.columns(), ["zone_id", "zone_name", "POP"]);
        assert_eq!(index.zone_ids(), Some(vec![Some("69123".to_string())]));
        let required = ["zone_id".to_string(), "zone_name".to_string()];
        assert!(index.missing_columns(&required).is_empty());
    }

    #[test]
    fn keeps_canonical_columns_over_aliases() {
        let text = r#"{"features": [
            {"properties": {"zone_id": "A", "INSEE_COM": "B"}}
        ]}"#;
        let index = GeoIndex::from_geojson("test", text, &aliases()).expect("parse geojson");
        assert_eq!(index.zone_ids(), Some(vec![Some("A".to_string())]));
        assert!(index.has_column("INSEE_COM"));
    }

    #[test]
    fn first_matching_alias_wins() {
        let text = r#"{"features": [
            {"properties": {"INSEE_COM": "75056", "CODE_IRIS": "751010101"}}
        ]}"#;
        let index = GeoIndex::from_geojson("test", text, &aliases()).expect("parse geojson");
        assert_eq!(index.zone_ids(), Some(vec![Some("75056".to_string())]));
        assert!(index.has_column("CODE_IRIS"));
    }

    #[test]
    fn null_properties_become_empty_rows() {
        let text = r#"{"features": [{"properties": null}, {"properties": {"zone_id": 1}}]}"#;
        let index = GeoIndex::from_geojson("test", text, &aliases()).expect("parse geojson");
        assert_eq!(index.len(), 2);
        assert_eq!(index.zone_ids(), Some(vec![None, Some("1".to_string())]));
    }

    #[test]
    fn missing_features_yield_empty_index() {
        let index = GeoIndex::from_geojson("test", "{}", &aliases()).expect("parse geojson");
        assert!(index.is_empty());
        assert_eq!(index.zone_ids(), None);
    }

    #[test]
    fn rejects_malformed_json() {
        let err = GeoIndex::from_geojson("geo.json", "{\"features\": [", &aliases())
            .expect_err("malformed json");
        assert_eq!(err.source_id, "geo.json");
        assert!(err.to_string().starts_with("Failed to read GeoJSON at geo.json:"));
    }

    #[test]
    fn rejects_non_object_documents() {
        assert!(GeoIndex::from_geojson("geo.json", "[1, 2]", &aliases()).is_err());
    }
}
