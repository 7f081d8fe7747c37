use std::fs;
use std::path::{Path, PathBuf};

use zonalyss_core::{DataLayout, VerificationReport};

use crate::errors::ReportError;
use crate::report::render_markdown;

/// Persisted renderings of a [`VerificationReport`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReportFormat {
    /// `reports/verification_<level>.md`
    Markdown,
    /// `reports/verification_<level>.json`, pretty-printed.
    Json,
}

impl ReportFormat {
    pub fn relative_path(self, layout: &DataLayout) -> PathBuf {
        match self {
            Self::Markdown => layout.markdown_report_path(),
            Self::Json => layout.json_report_path(),
        }
    }

    pub fn render(self, report: &VerificationReport) -> Result<Vec<u8>, ReportError> {
        match self {
            Self::Markdown => Ok(render_markdown(report).into_bytes()),
            Self::Json => Ok(serde_json::to_vec_pretty(report)?),
        }
    }
}

/// Render `report` as `format` and store it below `root`, replacing any
/// previous report for the same level.
///
/// The bytes land in a staging file next to the target first, so readers never
/// see a half-written report.
pub fn write_report(
    root: &Path,
    report: &VerificationReport,
    format: ReportFormat,
) -> Result<PathBuf, ReportError> {
    let layout = DataLayout::new(report.level);
    let path = root.join(format.relative_path(&layout));
    let data = format.render(report)?;

    fs::create_dir_all(root.join(layout.reports_dir()))?;
    let staging = staging_path(&path)?;
    if let Err(err) = fs::write(&staging, &data).and_then(|()| fs::rename(&staging, &path)) {
        let _ = fs::remove_file(&staging);
        return Err(err.into());
    }
    Ok(path)
}

fn staging_path(path: &Path) -> Result<PathBuf, ReportError> {
    let name = path
        .file_name()
        .ok_or_else(|| ReportError::InvalidPath(path.to_path_buf()))?;
    Ok(path.with_file_name(format!(".{}.partial", name.to_string_lossy())))
}
