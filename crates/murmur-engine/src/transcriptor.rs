//! The `Transcriptor` facade: one call in, one transcript out.

use std::path::Path;
use std::sync::Arc;

use murmur_client::{ClientConfig, ResponseFormat, TranscribeRequest, TranscriptionClient};
use murmur_core::transcript::merge_chunk_texts;
use murmur_core::{
    MediaError, MediaFile, MediaKind, MediaOperation, MediaSource, MurmurError,
    TranscriptionReport, ValidationError, plan_chunks,
};
use murmur_media::{FfmpegMediaOps, MediaOps, materialize_chunks};
use murmur_settings::Settings;
use tracing::{debug, info, warn};

use crate::resolve::resolve_source;

/// Per-call options. Unset fields fall back to the configured defaults.
#[derive(Debug, Clone)]
pub struct TranscribeOptions {
    /// Language override; `auto` lets the service detect.
    pub language: Option<String>,
    /// Model override.
    pub model: Option<String>,
    /// Optional context prompt.
    pub prompt: String,
    /// Requested output format.
    pub response_format: ResponseFormat,
    /// Whether oversized files may be split. Ignored (forced on) for
    /// bytes and URL sources.
    pub allow_chunking: bool,
}

impl Default for TranscribeOptions {
    fn default() -> Self {
        Self {
            language: None,
            model: None,
            prompt: String::new(),
            response_format: ResponseFormat::Json,
            allow_chunking: true,
        }
    }
}

/// Orchestrates one transcription job end to end.
///
/// Holds no per-job state: every [`Transcriptor::transcribe`] call owns its
/// own set of temporary files and deletes them before returning, on the
/// error path included.
pub struct Transcriptor {
    settings: Settings,
    client: TranscriptionClient,
    media: Arc<dyn MediaOps>,
    http: reqwest::Client,
}

impl std::fmt::Debug for Transcriptor {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Transcriptor")
            .field("settings", &self.settings)
            .field("client", &self.client)
            .field("media", &"Arc<dyn MediaOps>")
            .field("http", &self.http)
            .finish()
    }
}

impl Transcriptor {
    /// Create a transcriptor backed by the real ffmpeg/ffprobe stack.
    ///
    /// # Errors
    ///
    /// [`ValidationError::MissingApiKey`] when the key is empty.
    pub fn new(settings: Settings, api_key: &str) -> Result<Self, MurmurError> {
        let media = Arc::new(FfmpegMediaOps::new(&settings.media));
        Self::with_media_ops(settings, api_key, media)
    }

    /// Create a transcriptor with a custom media stack (used by tests).
    pub fn with_media_ops(
        settings: Settings,
        api_key: &str,
        media: Arc<dyn MediaOps>,
    ) -> Result<Self, MurmurError> {
        let client = TranscriptionClient::new(ClientConfig::from_settings(&settings, api_key))
            .map_err(MurmurError::from)?;
        Ok(Self {
            settings,
            client,
            media,
            http: reqwest::Client::new(),
        })
    }

    /// Transcribe one media source.
    ///
    /// Flow: resolve → classify → (extract audio) → probe → size decision →
    /// direct or chunked upload → merge. An upload failure anywhere aborts
    /// the whole job; no partial transcript is ever returned.
    pub async fn transcribe(
        &self,
        source: MediaSource,
        opts: &TranscribeOptions,
    ) -> Result<TranscriptionReport, MurmurError> {
        // The media tool must be invocable before any processing begins.
        self.media.ensure_available().await?;

        let allow_chunking = opts.allow_chunking || source.forces_chunking();
        let resolved = resolve_source(source, &self.http).await?;

        // Video inputs are reduced to their audio track; the extracted
        // artifact replaces the working file for every later step.
        let kind = self.media.kind(&resolved.path);
        let (working_path, _extracted) = if kind == MediaKind::Video {
            info!(path = %resolved.path.display(), "video input, extracting audio");
            let artifact = self.media.extract_audio(&resolved.path).await?;
            (artifact.path().to_path_buf(), Some(artifact))
        } else {
            (resolved.path.clone(), None)
        };

        let duration_secs = self.media.duration_secs(&working_path).await;

        let size_bytes = tokio::fs::metadata(&working_path)
            .await
            .map_err(|_| ValidationError::FileNotFound(working_path.clone()))?
            .len();

        let file = MediaFile {
            path: working_path,
            size_bytes,
            kind,
            duration_secs,
        };

        let request = self.request_for(opts);

        let oversized = file.size_bytes > self.settings.chunking.max_upload_bytes;
        let (text, chunk_count) = if oversized && allow_chunking {
            if let Some(duration) = file.duration_secs {
                info!(
                    size_mb = file.size_mb(),
                    duration_secs = duration,
                    "file exceeds upload limit, splitting into chunks"
                );
                self.transcribe_chunked(&file.path, duration, &request)
                    .await?
            } else {
                // Without a duration there are no windows to compute.
                warn!(
                    size_mb = file.size_mb(),
                    "duration unknown, sending oversized file whole"
                );
                self.transcribe_whole(&file.path, &request).await?
            }
        } else {
            self.transcribe_whole(&file.path, &request).await?
        };

        Ok(TranscriptionReport {
            text,
            language: request.language,
            duration_secs: file.duration_secs,
            model: request.model,
            chunk_count,
            success: true,
        })
    }

    /// Merge per-call options with configured defaults.
    fn request_for(&self, opts: &TranscribeOptions) -> TranscribeRequest {
        TranscribeRequest {
            model: opts
                .model
                .clone()
                .unwrap_or_else(|| self.settings.api.model.clone()),
            language: opts
                .language
                .clone()
                .unwrap_or_else(|| self.settings.api.language.clone()),
            prompt: opts.prompt.clone(),
            response_format: opts.response_format,
        }
    }

    async fn transcribe_whole(
        &self,
        audio: &Path,
        request: &TranscribeRequest,
    ) -> Result<(String, usize), MurmurError> {
        let output = self.client.transcribe_file(audio, request).await?;
        Ok((output.text, 1))
    }

    async fn transcribe_chunked(
        &self,
        audio: &Path,
        duration_secs: f64,
        request: &TranscribeRequest,
    ) -> Result<(String, usize), MurmurError> {
        let specs = plan_chunks(
            duration_secs,
            self.settings.chunking.window_secs,
            self.settings.chunking.overlap_secs,
        )?;

        let artifacts = materialize_chunks(
            self.media.as_ref(),
            &specs,
            audio,
            self.settings.chunking.on_chunk_failure,
        )
        .await?;

        if artifacts.is_empty() {
            return Err(MediaError::new(
                audio.display().to_string(),
                MediaOperation::Trim,
                "no chunk could be materialized",
            )
            .into());
        }

        info!(
            planned = specs.len(),
            materialized = artifacts.len(),
            "transcribing chunks sequentially"
        );

        let total = artifacts.len();
        let mut texts = Vec::with_capacity(total);
        for artifact in artifacts {
            debug!(index = artifact.spec.index, "uploading chunk");
            let output = self
                .client
                .transcribe_file(artifact.artifact.path(), request)
                .await?;
            texts.push(output.text);
            // The artifact drops here, removing its segment file whether or
            // not the next iteration runs.
        }

        Ok((merge_chunk_texts(&texts), total))
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────
