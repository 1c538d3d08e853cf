//! Scoped ownership of temporary media files.

use std::path::{Path, PathBuf};

use murmur_core::ChunkSpec;
use tracing::warn;

/// A temporary file owned by one transcription job.
///
/// The file is deleted when the artifact is dropped, which makes cleanup on
/// both success and error paths automatic. Call [`TempArtifact::keep`] to
/// hand the file off instead.
#[derive(Debug)]
pub struct TempArtifact {
    path: PathBuf,
    keep: bool,
}

impl TempArtifact {
    /// Take ownership of an existing file.
    #[must_use]
    pub fn adopt(path: PathBuf) -> Self {
        Self { path, keep: false }
    }

    /// Reserve a fresh uniquely-named path in the system temp directory.
    ///
    /// The file exists (empty) after this call so the name stays reserved
    /// until ffmpeg overwrites it.
    pub fn create(suffix: &str) -> std::io::Result<Self> {
        let file = tempfile::Builder::new()
            .prefix("murmur-")
            .suffix(suffix)
            .tempfile()?;
        let (_, temp_path) = file.keep().map_err(|e| e.error)?;
        Ok(Self {
            path: temp_path,
            keep: false,
        })
    }

    /// Path of the owned file.
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Disarm deletion and return the path; the caller now owns the file.
    #[must_use]
    pub fn keep(mut self) -> PathBuf {
        self.keep = true;
        self.path.clone()
    }
}

impl Drop for TempArtifact {
    fn drop(&mut self) {
        if self.keep || !self.path.exists() {
            return;
        }
        if let Err(e) = std::fs::remove_file(&self.path) {
            warn!(path = %self.path.display(), error = %e, "failed to remove temp artifact");
        }
    }
}

/// A planned chunk together with its materialized audio segment.
///
/// Exists only for the lifetime of one upload; dropping it removes the
/// segment file.
#[derive(Debug)]
pub struct ChunkArtifact {
    /// The time window this segment covers.
    pub spec: ChunkSpec,
    /// The cut audio segment.
    pub artifact: TempArtifact,
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────
