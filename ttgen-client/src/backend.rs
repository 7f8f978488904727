//! Backend port
//!
//! Everything the orchestrator and controller need from the timetable server.
//! [`crate::http::HttpBackend`] is the production implementation; tests plug in
//! in-memory fakes.

use async_trait::async_trait;
use std::path::Path;
use ttgen_common::api::{CourseListing, DurationConstants};
use ttgen_common::{Result, UploadCategory};

/// A file read into memory for upload
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UploadFile {
    /// File name as sent to the server (no directory part)
    pub name: String,
    pub contents: Vec<u8>,
}

impl UploadFile {
    pub fn new(name: impl Into<String>, contents: impl Into<Vec<u8>>) -> Self {
        Self {
            name: name.into(),
            contents: contents.into(),
        }
    }

    /// Read a file from disk, keeping only its final path component as name
    pub async fn from_path(path: &Path) -> Result<Self> {
        let contents = tokio::fs::read(path).await?;
        let name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| path.display().to_string());
        Ok(Self { name, contents })
    }

    pub fn has_extension(&self, extension: &str) -> bool {
        self.name.ends_with(extension)
    }
}

/// Operations offered by the timetable server
#[async_trait]
pub trait TimetableBackend: Send + Sync {
    /// Upload one data file to its category endpoint
    async fn upload(&self, category: UploadCategory, file: &UploadFile) -> Result<()>;

    /// Current course table plus the department and semester lists
    async fn fetch_courses(&self) -> Result<CourseListing>;

    /// Store duration settings ahead of generation
    async fn save_config(&self, durations: &DurationConstants) -> Result<()>;

    /// Generate all timetables, returning the zip archive
    async fn generate(&self, durations: &DurationConstants) -> Result<Vec<u8>>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_from_path_uses_file_name() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("rooms.csv");
        tokio::fs::write(&path, b"Room,Capacity\nL101,60\n").await.unwrap();

        let file = UploadFile::from_path(&path).await.unwrap();
        assert_eq!(file.name, "rooms.csv");
        assert_eq!(file.contents, b"Room,Capacity\nL101,60\n");
        assert!(file.has_extension(".csv"));
        assert!(!file.has_extension(".CSV"));
    }

    #[tokio::test]
    async fn test_from_path_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let result = UploadFile::from_path(&dir.path().join("absent.csv")).await;
        assert!(matches!(result, Err(ttgen_common::Error::Io(_))));
    }
}
