use anyhow::{Context, Result};
use async_trait::async_trait;
use std::path::PathBuf;
use std::time::SystemTime;

/// Where pattern lines come from.
///
/// Only the reload watcher reads through this; the hot classification path
/// never touches the source.
#[async_trait]
pub trait PatternSource: Send + Sync {
    /// Reads all pattern lines. An error means the source is unreadable,
    /// which is distinct from an empty source.
    async fn read_lines(&self) -> Result<Vec<String>>;

    /// Modification marker used for change detection.
    async fn modified(&self) -> Result<SystemTime>;

    /// Identifier for log messages.
    fn describe(&self) -> String;
}

/// Pattern file on the local filesystem.
pub struct FilePatternSource {
    path: PathBuf,
}

impl FilePatternSource {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

#[async_trait]
impl PatternSource for FilePatternSource {
    async fn read_lines(&self) -> Result<Vec<String>> {
        let contents = tokio::fs::read_to_string(&self.path)
            .await
            .with_context(|| format!("Failed to read pattern file '{}'", self.path.display()))?;
        Ok(contents.lines().map(str::to_string).collect())
    }

    async fn modified(&self) -> Result<SystemTime> {
        let metadata = tokio::fs::metadata(&self.path)
            .await
            .with_context(|| format!("Failed to stat pattern file '{}'", self.path.display()))?;
        metadata
            .modified()
            .context("Filesystem reports no modification time")
    }

    fn describe(&self) -> String {
        self.path.display().to_string()
    }
}
