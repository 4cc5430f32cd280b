//! RAII guard for staged upload inputs.
//!
//! Every upload consumes a temporary local file written from request bytes.
//! The guard removes that file when dropped, so the temp input is gone on
//! every exit path: success, provider failure, or validation failure.

use std::path::{Path, PathBuf};

/// A temporary local file that deletes itself on drop.
#[derive(Debug)]
pub struct StagedFile {
    path: PathBuf,
}

impl StagedFile {
    /// Write `bytes` to a fresh uniquely-named file under `dir`, creating
    /// the directory if needed.
    pub async fn create(dir: &Path, bytes: &[u8]) -> std::io::Result<Self> {
        tokio::fs::create_dir_all(dir).await?;
        let path = dir.join(uuid::Uuid::new_v4().to_string());
        tokio::fs::write(&path, bytes).await?;
        Ok(Self { path })
    }

    /// Path of the staged file, valid for the lifetime of the guard.
    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl Drop for StagedFile {
    fn drop(&mut self) {
        if let Err(e) = std::fs::remove_file(&self.path) {
            if e.kind() != std::io::ErrorKind::NotFound {
                tracing::warn!(path = %self.path.display(), error = %e, "Failed to remove staged upload file");
            }
        }
    }
}
