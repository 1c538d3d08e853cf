//! The seam between the pipeline and the external media tools.

use std::path::Path;

use async_trait::async_trait;
use murmur_core::{EnvironmentError, MediaError, MediaKind};

use crate::artifact::TempArtifact;

/// Media operations the pipeline needs, abstracted for testability.
///
/// The production implementation is [`crate::FfmpegMediaOps`]; tests
/// substitute in-process fakes.
#[async_trait]
pub trait MediaOps: Send + Sync {
    /// Classify a file as audio or video by extension.
    fn kind(&self, path: &Path) -> MediaKind;

    /// Duration of the file in seconds, or `None` when probing fails for
    /// any reason. Never an error: downstream logic falls back to treating
    /// the file as a single chunk.
    async fn duration_secs(&self, path: &Path) -> Option<f64>;

    /// Check that the media tool can be invoked at all.
    async fn ensure_available(&self) -> Result<(), EnvironmentError>;

    /// Extract the audio track of a video into a fresh mono 16 kHz WAV.
    async fn extract_audio(&self, video: &Path) -> Result<TempArtifact, MediaError>;

    /// Cut `[start, end)` seconds out of an audio file via stream copy
    /// (no re-encode).
    async fn trim(
        &self,
        audio: &Path,
        start_secs: f64,
        end_secs: f64,
    ) -> Result<TempArtifact, MediaError>;

    /// Convert any audio to the canonical mono 16 kHz WAV form.
    async fn normalize(&self, input: &Path) -> Result<TempArtifact, MediaError>;
}
