use serde::Serialize;
use zonalyss_core::{VerificationReport, VerificationResult};

const BANNER_WIDTH: usize = 72;

/// Render the console form of a report.
pub fn render_console(report: &VerificationReport) -> String {
    let banner = "=".repeat(BANNER_WIDTH);
    let mut lines = vec![
        banner.clone(),
        format!("Zonalyss Verification - Level: {}", report.level),
        banner,
    ];

    for result in &report.results {
        lines.push(String::new());
        lines.push(format!("--- Dataset: {} ---", result.dataset));
        if !result.errors.is_empty() {
            lines.push("Errors:".to_string());
            lines.extend(result.errors.iter().map(|error| format!("  - {error}")));
        }
        if !result.warnings.is_empty() {
            lines.push("Warnings:".to_string());
            lines.extend(result.warnings.iter().map(|warning| format!("  - {warning}")));
        }
        lines.push("Summary:".to_string());
        lines.extend(
            summary_lines(result)
                .into_iter()
                .map(|line| format!("  - {line}")),
        );
    }

    lines.join("\n")
}

/// Render the markdown form of a report, as persisted under `reports/`.
pub fn render_markdown(report: &VerificationReport) -> String {
    let mut lines = Vec::new();

    lines.push(format!(
        "# Zonalyss Data Verification - {}",
        report.level.title()
    ));
    lines.push(String::new());
    lines.push("## Run summary".to_string());
    lines.push(format!("- run_id: {}", report.run_id));
    lines.push(format!("- generated_at: {}", report.generated_at));
    lines.push(format!("- datasets: {}", report.results.len()));
    lines.push(format!("- errors: {}", report.error_count()));
    lines.push(format!("- warnings: {}", report.warning_count()));
    lines.push(format!(
        "- status: {}",
        if report.failed() { "failed" } else { "passed" }
    ));
    lines.push(String::new());

    for result in &report.results {
        lines.push(format!("## Dataset: {}", result.dataset));
        if !result.errors.is_empty() {
            lines.push("**Errors:**".to_string());
            lines.extend(result.errors.iter().map(|error| format!("- {error}")));
        }
        if !result.warnings.is_empty() {
            lines.push("**Warnings:**".to_string());
            lines.extend(result.warnings.iter().map(|warning| format!("- {warning}")));
        }
        lines.push("**Summary:**".to_string());
        lines.extend(summary_lines(result).into_iter().map(|line| format!("- {line}")));
        lines.push(String::new());
    }

    lines.join("\n")
}

fn summary_lines(result: &VerificationResult) -> Vec<String> {
    let info = &result.info;
    vec![
        format!("Merge coverage: {}", compact_json(info.merge.as_ref())),
        format!("Score stats: {}", compact_json(info.score_stats.as_ref())),
        format!(
            "Nulls (non-zero): {}",
            compact_json(Some(&info.non_zero_nulls()))
        ),
    ]
}

/// Single-line JSON; steps that did not run render as `{}`.
fn compact_json<T: Serialize>(value: Option<&T>) -> String {
    value
        .and_then(|value| serde_json::to_string(value).ok())
        .unwrap_or_else(|| "{}".to_string())
}
