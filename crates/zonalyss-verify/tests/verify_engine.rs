use std::path::{Path, PathBuf};

use zonalyss_core::{CoverageOutcome, GeoLevel, VerifyConfig};
use zonalyss_verify::{FsSource, MemorySource, ReportFormat, Verifier, render_console, write_report};

const GEO_PATH: &str = "data/communes/geo/communes.geojson";

fn geojson(ids: &[&str]) -> String {
    let features = ids
        .iter()
        .map(|id| {
            format!(
                r#"{{"type":"Feature","geometry":null,"properties":{{"INSEE_COM":"{id}","NOM_COM":"Zone {id}"}}}}"#
            )
        })
        .collect::<Vec<_>>()
        .join(",");
    format!(r#"{{"type":"FeatureCollection","features":[{features}]}}"#)
}

fn single_dataset_config() -> VerifyConfig {
    VerifyConfig {
        datasets: vec!["houses".to_string()],
        ..VerifyConfig::default()
    }
}

fn verify_houses(geo: Option<String>, metrics: Option<&str>) -> zonalyss_core::VerificationResult {
    let mut source = MemorySource::new();
    if let Some(geo) = geo {
        source.insert(GEO_PATH, geo);
    }
    if let Some(metrics) = metrics {
        source.insert("data/communes/metrics_houses.csv", metrics);
    }
    Verifier::new(single_dataset_config()).verify_dataset(&source, GeoLevel::Communes, "houses")
}

fn fixture_root() -> PathBuf {
    Path::new(env!("CARGO_MANIFEST_DIR")).join("tests/fixtures/sample")
}

fn temp_root(name: &str) -> PathBuf {
    let dir = std::env::temp_dir().join(format!(
        "zonalyss_verify_{}_{}",
        name,
        std::process::id()
    ));
    let _ = std::fs::remove_dir_all(&dir);
    std::fs::create_dir_all(&dir).expect("create temp dir");
    dir
}

#[test]
fn duplicate_ids_and_partial_coverage() {
    let result = verify_houses(
        Some(geojson(&["A", "B", "C"])),
        Some("zone_id,zone_name,score\nA,Alpha,10\nA,Alpha,90\nB,Beta,50\n"),
    );

    assert!(result.errors.is_empty(), "unexpected errors: {:?}", result.errors);
    assert_eq!(
        result.warnings,
        vec!["Found 1 duplicate zone_id rows in metrics.".to_string()]
    );

    let coverage = result
        .info
        .merge
        .as_ref()
        .and_then(CoverageOutcome::report)
        .expect("coverage computed");
    assert_eq!(coverage.geo_unique, 3);
    assert_eq!(coverage.metrics_unique, 2);
    assert_eq!(coverage.matched, 2);
    assert_eq!(coverage.geo_coverage_pct, 66.67);
    assert_eq!(coverage.metrics_coverage_pct, 100.0);
    assert_eq!(coverage.missing_in_metrics, 1);
    assert_eq!(coverage.missing_in_geo, 0);
}

#[test]
fn duplicate_warning_counts_rows() {
    let result = verify_houses(
        Some(geojson(&["A", "B"])),
        Some("zone_id,zone_name,score\nA,a,1\nA,a,2\nA,a,3\nB,b,4\nB,b,5\n"),
    );
    let duplicate_warnings = result
        .warnings
        .iter()
        .filter(|warning| warning.contains("duplicate"))
        .collect::<Vec<_>>();
    assert_eq!(
        duplicate_warnings,
        vec!["Found 3 duplicate zone_id rows in metrics."]
    );
}

#[test]
fn missing_geojson_stops_verification() {
    let result = verify_houses(None, Some("zone_id,zone_name,score\nA,a,1\n"));
    assert_eq!(result.errors.len(), 1);
    assert!(result.errors[0].starts_with("GeoJSON not found"));
    assert!(result.warnings.is_empty());
    assert!(result.info.is_empty());
}

#[test]
fn missing_metrics_stops_verification() {
    let result = verify_houses(Some(geojson(&["A"])), None);
    assert_eq!(
        result.errors,
        vec!["Metrics CSV not found: data/communes/metrics_houses.csv".to_string()]
    );
    assert!(result.info.is_empty());
}

#[test]
fn malformed_geojson_is_fatal_for_the_dataset() {
    let result = verify_houses(
        Some("{\"features\": [".to_string()),
        Some("zone_id,zone_name,score\nA,a,1\n"),
    );
    assert_eq!(result.errors.len(), 1);
    assert!(result.errors[0].starts_with(&format!("Failed to read GeoJSON at {GEO_PATH}:")));
    assert!(result.info.is_empty());
}

#[test]
fn unreadable_metrics_is_fatal_for_the_dataset() {
    let result = verify_houses(Some(geojson(&["A"])), Some("zone_id,score\nA,1,extra\n"));
    assert_eq!(result.errors.len(), 1);
    assert!(result.errors[0].starts_with("Failed loading metrics CSV:"));
    assert!(result.info.is_empty());
}

#[test]
fn missing_score_column_is_an_error_with_empty_stats() {
    let result = verify_houses(Some(geojson(&["A"])), Some("zone_id,zone_name\nA,a\n"));
    assert_eq!(
        result.errors,
        vec![r#"Metrics missing required columns: ["score"]"#.to_string()]
    );
    let stats = result.info.score_stats.as_ref().expect("score stats present");
    assert!(stats.is_empty());
    assert!(result.info.nulls.is_some());
    assert!(result.info.merge.as_ref().and_then(CoverageOutcome::report).is_some());
}

#[test]
fn missing_zone_id_keeps_diagnostics_going() {
    let result = verify_houses(Some(geojson(&["A"])), Some("zone_name,score\na,150\n"));
    assert_eq!(
        result.errors,
        vec![r#"Metrics missing required columns: ["zone_id"]"#.to_string()]
    );
    assert_eq!(
        result.warnings,
        vec!["Scores outside [0,100] detected.".to_string()]
    );
    assert_eq!(
        result.info.merge,
        Some(CoverageOutcome::Unavailable {
            note: "zone_id not in both tables".to_string()
        })
    );
}

#[test]
fn geo_without_aliases_reports_missing_properties() {
    let geo = r#"{"features":[{"properties":{"CODE":"A"}}]}"#.to_string();
    let result = verify_houses(Some(geo), Some("zone_id,zone_name,score\nA,a,1\n"));
    assert_eq!(
        result.errors,
        vec![r#"GeoJSON properties missing columns: ["zone_id", "zone_name"]"#.to_string()]
    );
    assert!(result.info.score_stats.is_some());
}

#[test]
fn out_of_range_scores_warn_once() {
    let result = verify_houses(
        Some(geojson(&["A", "B", "C"])),
        Some("zone_id,zone_name,score\nA,a,-5\nB,b,105\nC,c,200\n"),
    );
    assert!(result.errors.is_empty());
    assert_eq!(
        result.warnings,
        vec!["Scores outside [0,100] detected.".to_string()]
    );
}

#[test]
fn non_numeric_scores_warn_without_tripping_bounds() {
    let result = verify_houses(
        Some(geojson(&["A", "B", "C", "D"])),
        Some("zone_id,zone_name,score\nA,a,10\nB,b,high\nC,c,x\nD,d,NA\n"),
    );
    assert!(result.errors.is_empty());
    assert_eq!(
        result.warnings,
        vec!["Found 2 non-numeric score values.".to_string()]
    );

    let nulls = result.info.nulls.as_ref().expect("null counts");
    assert_eq!(nulls.get("score"), Some(&1));
    let stats = result
        .info
        .score_stats
        .as_ref()
        .and_then(|summary| summary.stats())
        .expect("numeric summary");
    assert_eq!(stats.count, 1);
    assert_eq!((stats.min, stats.max), (10.0, 10.0));
}

#[test]
fn custom_bounds_are_honoured() {
    let mut config = single_dataset_config();
    config.score_bounds.min = -10.0;
    let source = MemorySource::new()
        .with_file(GEO_PATH, geojson(&["A"]))
        .with_file("data/communes/metrics_houses.csv", "zone_id,zone_name,score\nA,a,-5\n");
    let result = Verifier::new(config).verify_dataset(&source, GeoLevel::Communes, "houses");
    assert!(result.warnings.is_empty());
}

#[test]
fn coverage_is_order_insensitive() {
    let forward = verify_houses(
        Some(geojson(&["A", "B", "C", "D"])),
        Some("zone_id,zone_name,score\nA,a,1\nB,b,2\nE,e,3\n"),
    );
    let reversed = verify_houses(
        Some(geojson(&["D", "C", "B", "A"])),
        Some("zone_id,zone_name,score\nE,e,3\nB,b,2\nA,a,1\n"),
    );
    assert_eq!(forward.info.merge, reversed.info.merge);
}

#[test]
fn numeric_and_text_ids_match() {
    let geo = r#"{"features":[{"properties":{"zone_id":75056,"zone_name":"Paris"}}]}"#.to_string();
    let result = verify_houses(Some(geo), Some("zone_id,zone_name,score\n75056.0,Paris,50\n"));
    let coverage = result
        .info
        .merge
        .as_ref()
        .and_then(CoverageOutcome::report)
        .expect("coverage computed");
    assert_eq!(coverage.matched, 1);
}

#[test]
fn fixture_level_report() {
    let source = FsSource::new(fixture_root());
    let report = Verifier::new(VerifyConfig::default()).verify_level(&source, GeoLevel::Communes);

    let datasets = report
        .results
        .iter()
        .map(|result| result.dataset.as_str())
        .collect::<Vec<_>>();
    assert_eq!(datasets, vec!["apartments", "houses", "desks"]);
    assert!(report.failed());

    let apartments = &report.results[0];
    assert!(apartments.errors.is_empty());
    assert!(apartments.warnings.is_empty());
    let coverage = apartments.info.merge.as_ref().and_then(CoverageOutcome::report);
    assert_eq!(coverage.map(|c| c.geo_coverage_pct), Some(100.0));
    let stats = apartments
        .info
        .score_stats
        .as_ref()
        .and_then(|summary| summary.stats())
        .expect("apartments score stats");
    assert_eq!(stats.count, 4);
    assert_eq!(stats.min, 64.0);
    assert_eq!(stats.max, 81.0);

    let houses = &report.results[1];
    assert!(houses.errors.is_empty());
    assert_eq!(
        houses.warnings,
        vec![
            "Found 1 duplicate zone_id rows in metrics.".to_string(),
            "Scores outside [0,100] detected.".to_string(),
        ]
    );
    let coverage = houses
        .info
        .merge
        .as_ref()
        .and_then(CoverageOutcome::report)
        .expect("houses coverage");
    assert_eq!(coverage.matched, 2);
    assert_eq!(coverage.geo_coverage_pct, 50.0);
    assert_eq!(coverage.metrics_coverage_pct, 66.67);
    assert_eq!(coverage.missing_in_metrics, 2);
    assert_eq!(coverage.missing_in_geo, 1);
    let non_zero = houses.info.non_zero_nulls();
    assert_eq!(non_zero.get("zone_name"), Some(&1));
    assert_eq!(non_zero.get("income"), Some(&1));
    assert_eq!(non_zero.get("rent_index"), Some(&1));
    assert_eq!(non_zero.get("score"), None);

    let desks = &report.results[2];
    assert_eq!(desks.errors.len(), 1);
    assert!(desks.errors[0].starts_with("Metrics CSV not found:"));
    assert!(desks.errors[0].ends_with("metrics_desks.csv"));

    let console = render_console(&report);
    assert!(console.contains("--- Dataset: desks ---"));
}

#[test]
fn reports_are_persisted_under_reports_dir() {
    let root = temp_root("persist");
    let source = MemorySource::new().with_file(GEO_PATH, geojson(&["A"])).with_file(
        "data/communes/metrics_houses.csv",
        "zone_id,zone_name,score\nA,a,50\n",
    );
    let report = Verifier::new(single_dataset_config()).verify_level(&source, GeoLevel::Communes);
    assert!(!report.failed());

    let md_path = write_report(&root, &report, ReportFormat::Markdown).expect("write markdown");
    assert_eq!(md_path, root.join("reports/verification_communes.md"));
    let markdown = std::fs::read_to_string(&md_path).expect("read markdown");
    assert!(markdown.contains("## Dataset: houses"));
    assert!(markdown.contains("- status: passed"));

    let json_path = write_report(&root, &report, ReportFormat::Json).expect("write json");
    let stored: zonalyss_core::VerificationReport =
        serde_json::from_str(&std::fs::read_to_string(&json_path).expect("read json"))
            .expect("parse json report");
    assert_eq!(stored, report);
}
