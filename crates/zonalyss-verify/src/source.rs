use std::collections::BTreeMap;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use crate::errors::SourceError;

/// Provides the text of data files addressed by root-relative locations.
pub trait ContentSource {
    /// Read the full content at `location`.
    fn read_text(&self, location: &Path) -> Result<String, SourceError>;

    /// Human-readable identifier for `location`, used in messages.
    fn describe(&self, location: &Path) -> String {
        location.display().to_string()
    }
}

impl<S: ContentSource + ?Sized> ContentSource for &S {
    fn read_text(&self, location: &Path) -> Result<String, SourceError> {
        (**self).read_text(location)
    }

    fn describe(&self, location: &Path) -> String {
        (**self).describe(location)
    }
}

/// Reads files from the local filesystem below a root directory.
#[derive(Debug, Clone)]
pub struct FsSource {
    root: PathBuf,
}

impl FsSource {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn resolve(&self, location: &Path) -> PathBuf {
        self.root.join(location)
    }
}

impl ContentSource for FsSource {
    fn read_text(&self, location: &Path) -> Result<String, SourceError> {
        let path = self.resolve(location);
        std::fs::read_to_string(&path).map_err(|err| match err.kind() {
            ErrorKind::NotFound => SourceError::NotFound(path),
            _ => SourceError::Io { path, source: err },
        })
    }

    fn describe(&self, location: &Path) -> String {
        self.resolve(location).display().to_string()
    }
}

/// In-memory file map, keyed by root-relative location.
#[derive(Debug, Clone, Default)]
pub struct MemorySource {
    files: BTreeMap<PathBuf, String>,
}

impl MemorySource {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_file(mut self, location: impl Into<PathBuf>, content: impl Into<String>) -> Self {
        self.insert(location, content);
        self
    }

    pub fn insert(&mut self, location: impl Into<PathBuf>, content: impl Into<String>) {
        self.files.insert(location.into(), content.into());
    }
}

impl ContentSource for MemorySource {
    fn read_text(&self, location: &Path) -> Result<String, SourceError> {
        self.files
            .get(location)
            .cloned()
            .ok_or_else(|| SourceError::NotFound(location.to_path_buf()))
    }
}
