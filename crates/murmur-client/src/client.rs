//! The transcription service client: one multipart upload per audio segment.

use std::path::Path;
use std::time::Duration;

use murmur_core::retry::{backoff_delay_ms, parse_retry_after_header};
use murmur_core::{ApiError, ValidationError};
use reqwest::multipart;
use tracing::{debug, warn};

use crate::types::{
    ClientConfig, JsonBody, ResponseFormat, TranscribeRequest, TranscriptOutput, VerboseBody,
};

/// Client for the external speech-to-text endpoint.
///
/// Synchronous from the pipeline's point of view: each call blocks until
/// the upload completes or fails. There is no connection state beyond the
/// pooled `reqwest::Client`.
#[derive(Debug, Clone)]
pub struct TranscriptionClient {
    http: reqwest::Client,
    config: ClientConfig,
}

impl TranscriptionClient {
    /// Create a client.
    ///
    /// # Errors
    ///
    /// [`ValidationError::MissingApiKey`] when the key is empty.
    pub fn new(config: ClientConfig) -> Result<Self, ValidationError> {
        if config.api_key.trim().is_empty() {
            return Err(ValidationError::MissingApiKey);
        }
        Ok(Self {
            http: reqwest::Client::new(),
            config,
        })
    }

    /// The configured endpoint URL.
    #[must_use]
    pub fn base_url(&self) -> &str {
        &self.config.base_url
    }

    /// Upload one audio segment and return its transcript.
    ///
    /// Retries retryable failures (rate limit, server, network) up to the
    /// configured maximum, honoring `Retry-After` when the service sends
    /// one. With retries at their default of zero, any failure is final.
    pub async fn transcribe_file(
        &self,
        path: &Path,
        request: &TranscribeRequest,
    ) -> Result<TranscriptOutput, ApiError> {
        let bytes = tokio::fs::read(path).await.map_err(|e| {
            ApiError::new(
                &request.model,
                format!("could not read audio segment {}", path.display()),
            )
            .with_source(e)
        })?;
        let file_name = path
            .file_name()
            .and_then(|n| n.to_str())
            .unwrap_or("audio.wav")
            .to_string();

        let mut attempt: u32 = 0;
        loop {
            let result = self
                .send_once(bytes.clone(), file_name.clone(), request)
                .await;

            match result {
                Ok(output) => return Ok(output),
                Err(e) if e.retryable && attempt < self.config.retry.max_retries => {
                    let delay_ms = e.retry_after_ms.unwrap_or_else(|| {
                        backoff_delay_ms(
                            attempt,
                            self.config.retry.base_delay_ms,
                            self.config.retry.max_delay_ms,
                            self.config.retry.jitter_factor,
                            rand::random::<f64>(),
                        )
                    });
                    attempt += 1;
                    warn!(
                        attempt,
                        max_retries = self.config.retry.max_retries,
                        delay_ms,
                        error = %e,
                        "retrying upload"
                    );
                    tokio::time::sleep(Duration::from_millis(delay_ms)).await;
                }
                Err(e) => return Err(e),
            }
        }
    }

    async fn send_once(
        &self,
        bytes: Vec<u8>,
        file_name: String,
        request: &TranscribeRequest,
    ) -> Result<TranscriptOutput, ApiError> {
        let model = &request.model;

        let mime = mime_for(&file_name);
        let part = multipart::Part::bytes(bytes)
            .file_name(file_name)
            .mime_str(mime)
            .map_err(|e| ApiError::new(model, "could not build multipart body").with_source(e))?;

        let mut form = multipart::Form::new()
            .part("file", part)
            .text("model", model.clone())
            .text(
                "response_format",
                request.response_format.wire_name().to_owned(),
            );
        if !request.language.is_empty() && request.language != "auto" {
            form = form.text("language", request.language.clone());
        }
        if !request.prompt.is_empty() {
            form = form.text("prompt", request.prompt.clone());
        }

        debug!(model = %model, format = request.response_format.wire_name(), "uploading segment");

        let response = self
            .http
            .post(&self.config.base_url)
            .bearer_auth(&self.config.api_key)
            .timeout(Duration::from_secs(self.config.timeout_secs))
            .multipart(form)
            .send()
            .await
            .map_err(|e| {
                if e.is_timeout() {
                    ApiError::network(model, "request timed out").with_source(e)
                } else {
                    ApiError::network(model, format!("request failed: {e}"))
                }
            })?;

        let status = response.status();
        if !status.is_success() {
            let retry_after = response
                .headers()
                .get("retry-after")
                .and_then(|v| v.to_str().ok())
                .and_then(parse_retry_after_header);
            let body = response.text().await.unwrap_or_default();
            let mut err = ApiError::new(model, format!("status {status}"))
                .with_status(status.as_u16())
                .with_body(body);
            if let Some(ms) = retry_after {
                err = err.with_retry_after(ms);
            }
            return Err(err);
        }

        parse_success(response, request).await
    }
}

/// Decode a 200 response according to the requested format.
async fn parse_success(
    response: reqwest::Response,
    request: &TranscribeRequest,
) -> Result<TranscriptOutput, ApiError> {
    let model = &request.model;
    match request.response_format {
        ResponseFormat::Text => {
            let text = response.text().await.map_err(|e| {
                ApiError::network(model, "could not read response body").with_source(e)
            })?;
            Ok(TranscriptOutput {
                text: text.trim().to_string(),
                segments: None,
            })
        }
        ResponseFormat::Json => {
            let body: JsonBody = response
                .json()
                .await
                .map_err(|e| ApiError::new(model, "unparseable JSON response").with_source(e))?;
            Ok(TranscriptOutput {
                text: body.text,
                segments: None,
            })
        }
        ResponseFormat::Verbose => {
            let body: VerboseBody = response
                .json()
                .await
                .map_err(|e| ApiError::new(model, "unparseable verbose response").with_source(e))?;
            let segments: Vec<murmur_core::TranscriptSegment> =
                body.segments.into_iter().map(Into::into).collect();
            let text = murmur_core::transcript::render_verbose(&body.text, &segments);
            Ok(TranscriptOutput {
                text,
                segments: Some(segments),
            })
        }
    }
}

/// MIME type for an upload by file extension.
fn mime_for(file_name: &str) -> &'static str {
    match Path::new(file_name)
        .extension()
        .and_then(|e| e.to_str())
        .map(str::to_lowercase)
        .as_deref()
    {
        Some("wav") => "audio/wav",
        Some("mp3") => "audio/mpeg",
        Some("m4a") => "audio/mp4",
        Some("flac") => "audio/flac",
        Some("ogg" | "opus") => "audio/ogg",
        _ => "application/octet-stream",
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────
