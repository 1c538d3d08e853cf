//! Production [`MediaOps`] backed by ffprobe and ffmpeg.

use std::path::Path;

use async_trait::async_trait;
use murmur_core::{EnvironmentError, MediaError, MediaKind};
use murmur_settings::MediaSettings;

use crate::artifact::TempArtifact;
use crate::convert::MediaConverter;
use crate::probe::MediaProbe;
use crate::traits::MediaOps;

/// The real media stack: ffprobe for probing, ffmpeg for conversion.
#[derive(Debug, Clone)]
pub struct FfmpegMediaOps {
    probe: MediaProbe,
    converter: MediaConverter,
}

impl FfmpegMediaOps {
    /// Create from the media settings.
    #[must_use]
    pub fn new(settings: &MediaSettings) -> Self {
        Self {
            probe: MediaProbe::new(settings),
            converter: MediaConverter::new(settings),
        }
    }
}

#[async_trait]
impl MediaOps for FfmpegMediaOps {
    fn kind(&self, path: &Path) -> MediaKind {
        self.probe.kind(path)
    }

    async fn duration_secs(&self, path: &Path) -> Option<f64> {
        self.probe.duration_secs(path).await
    }

    async fn ensure_available(&self) -> Result<(), EnvironmentError> {
        self.converter.ensure_available().await
    }

    async fn extract_audio(&self, video: &Path) -> Result<TempArtifact, MediaError> {
        self.converter.extract_audio(video).await
    }

    async fn trim(
        &self,
        audio: &Path,
        start_secs: f64,
        end_secs: f64,
    ) -> Result<TempArtifact, MediaError> {
        self.converter.trim(audio, start_secs, end_secs).await
    }

    async fn normalize(&self, input: &Path) -> Result<TempArtifact, MediaError> {
        self.converter.normalize(input).await
    }
}
