use std::path::{Path, PathBuf};

use crate::config::GeoLevel;

/// Root-relative locations of the files consulted for one level.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DataLayout {
    level: GeoLevel,
}

impl DataLayout {
    pub fn new(level: GeoLevel) -> Self {
        Self { level }
    }

    pub fn level(&self) -> GeoLevel {
        self.level
    }

    /// `data/<level>/geo/<level>.geojson`
    pub fn geo_path(&self) -> PathBuf {
        let level = self.level.as_str();
        Path::new("data")
            .join(level)
            .join("geo")
            .join(format!("{level}.geojson"))
    }

    /// `data/<level>/metrics_<dataset>.csv`
    pub fn metrics_path(&self, dataset: &str) -> PathBuf {
        Path::new("data")
            .join(self.level.as_str())
            .join(format!("metrics_{dataset}.csv"))
    }

    pub fn reports_dir(&self) -> PathBuf {
        PathBuf::from("reports")
    }

    /// `reports/verification_<level>.md`
    pub fn markdown_report_path(&self) -> PathBuf {
        self.reports_dir()
            .join(format!("verification_{}.md", self.level.as_str()))
    }

    /// `reports/verification_<level>.json`
    pub fn json_report_path(&self) -> PathBuf {
        self.reports_dir()
            .join(format!("verification_{}.json", self.level.as_str()))
    }
}
