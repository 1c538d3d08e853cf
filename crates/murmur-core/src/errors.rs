//! Error hierarchy for the transcription pipeline.
//!
//! Four domains, mirroring the failure modes of the pipeline:
//!
//! - [`ValidationError`]: bad input or configuration — surfaced immediately,
//!   never retried
//! - [`MediaError`]: the external media tool failed on a specific file
//! - [`EnvironmentError`]: the external media tool cannot be invoked at all
//! - [`ApiError`]: the transcription service returned a non-success status
//!   or the request failed in transport
//!
//! [`MurmurError`] is the top-level enum the engine and CLI work with. All
//! errors carry a machine-readable code; API errors additionally carry an
//! [`ErrorCategory`] used for retry decisions.

use std::fmt;
use std::path::PathBuf;

use serde::{Deserialize, Serialize};
use thiserror::Error;

// ─────────────────────────────────────────────────────────────────────────────
// Category
// ─────────────────────────────────────────────────────────────────────────────

/// Classification of an API failure, inferred from the HTTP status.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorCategory {
    /// Invalid or expired credentials.
    Authentication,
    /// Insufficient permissions.
    Authorization,
    /// Rate limit exceeded.
    RateLimit,
    /// Network connectivity issue or timeout.
    Network,
    /// Server-side error (5xx).
    Server,
    /// Malformed request (4xx).
    InvalidRequest,
    /// Unrecognized error.
    Unknown,
}

impl fmt::Display for ErrorCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Authentication => write!(f, "authentication"),
            Self::Authorization => write!(f, "authorization"),
            Self::RateLimit => write!(f, "rate_limit"),
            Self::Network => write!(f, "network"),
            Self::Server => write!(f, "server"),
            Self::InvalidRequest => write!(f, "invalid_request"),
            Self::Unknown => write!(f, "unknown"),
        }
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// MurmurError — top-level enum
// ─────────────────────────────────────────────────────────────────────────────

/// Top-level error type for a transcription job.
#[derive(Debug, Error)]
pub enum MurmurError {
    /// Bad input or configuration.
    #[error("{0}")]
    Validation(#[from] ValidationError),

    /// External media tool failed on a file.
    #[error("{0}")]
    Media(#[from] MediaError),

    /// External media tool is not available at all.
    #[error("{0}")]
    Environment(#[from] EnvironmentError),

    /// Transcription service failure.
    #[error("{0}")]
    Api(#[from] ApiError),
}

impl MurmurError {
    /// Machine-readable error code.
    #[must_use]
    pub fn code(&self) -> &str {
        match self {
            Self::Validation(e) => e.code(),
            Self::Media(e) => &e.code,
            Self::Environment(e) => &e.code,
            Self::Api(e) => &e.code,
        }
    }

    /// Short name of the error domain, for the CLI envelope's `type` field.
    #[must_use]
    pub fn kind_name(&self) -> &'static str {
        match self {
            Self::Validation(_) => "ValidationError",
            Self::Media(_) => "MediaProcessingError",
            Self::Environment(_) => "EnvironmentUnavailable",
            Self::Api(_) => "ApiError",
        }
    }

    /// Whether retrying could plausibly succeed.
    #[must_use]
    pub fn is_retryable(&self) -> bool {
        matches!(self, Self::Api(e) if e.retryable)
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// ValidationError
// ─────────────────────────────────────────────────────────────────────────────

/// Invalid input or configuration. Never retried.
#[derive(Debug, Error)]
pub enum ValidationError {
    /// No API key was provided.
    #[error("API key is required")]
    MissingApiKey,

    /// The input path does not exist.
    #[error("file not found: {}", .0.display())]
    FileNotFound(PathBuf),

    /// The source cannot be handled (e.g. an unparseable URL).
    #[error("unsupported input: {0}")]
    UnsupportedInput(String),

    /// Chunk window does not exceed the overlap, making the stride
    /// non-positive.
    #[error(
        "chunk window must be longer than the overlap \
         (window {window_secs}s, overlap {overlap_secs}s)"
    )]
    WindowTooShort {
        /// Configured window length in seconds.
        window_secs: f64,
        /// Configured overlap in seconds.
        overlap_secs: f64,
    },
}

impl ValidationError {
    /// Machine-readable error code.
    #[must_use]
    pub fn code(&self) -> &'static str {
        match self {
            Self::MissingApiKey => "MISSING_API_KEY",
            Self::FileNotFound(_) => "FILE_NOT_FOUND",
            Self::UnsupportedInput(_) => "UNSUPPORTED_INPUT",
            Self::WindowTooShort { .. } => "WINDOW_TOO_SHORT",
        }
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// MediaError
// ─────────────────────────────────────────────────────────────────────────────

/// Media tool operation kind.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MediaOperation {
    /// Reading the container duration.
    Probe,
    /// Extracting the audio track from a video.
    ExtractAudio,
    /// Cutting a time window out of an audio file.
    Trim,
    /// Converting to the canonical mono 16 kHz WAV form.
    Normalize,
}

impl fmt::Display for MediaOperation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Probe => write!(f, "probe"),
            Self::ExtractAudio => write!(f, "extract_audio"),
            Self::Trim => write!(f, "trim"),
            Self::Normalize => write!(f, "normalize"),
        }
    }
}

/// External media tool failure on a specific file.
///
/// Carries the tool's stderr diagnostic verbatim so the caller sees what
/// ffmpeg actually complained about.
#[derive(Debug, Error)]
#[error("media {operation} failed for {path}: {message}")]
pub struct MediaError {
    /// File the operation ran against.
    pub path: String,
    /// Operation that failed.
    pub operation: MediaOperation,
    /// Human-readable message.
    pub message: String,
    /// Machine-readable error code.
    pub code: String,
    /// The tool's stderr output, if any.
    pub stderr: Option<String>,
    /// Original cause.
    #[source]
    pub source: Option<Box<dyn std::error::Error + Send + Sync>>,
}

impl MediaError {
    /// Create a new media error.
    #[must_use]
    pub fn new(
        path: impl Into<String>,
        operation: MediaOperation,
        message: impl Into<String>,
    ) -> Self {
        let op_upper = operation.to_string().to_uppercase();
        Self {
            path: path.into(),
            operation,
            message: message.into(),
            code: format!("MEDIA_{op_upper}_ERROR"),
            stderr: None,
            source: None,
        }
    }

    /// Attach the tool's stderr output.
    #[must_use]
    pub fn with_stderr(mut self, stderr: impl Into<String>) -> Self {
        self.stderr = Some(stderr.into());
        self
    }

    /// Set the error cause.
    #[must_use]
    pub fn with_source(mut self, source: impl std::error::Error + Send + Sync + 'static) -> Self {
        self.source = Some(Box::new(source));
        self
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// EnvironmentError
// ─────────────────────────────────────────────────────────────────────────────

/// A required external tool cannot be invoked at all.
///
/// Distinct from [`MediaError`]: this is about the environment, not about
/// any particular file, and is raised before processing begins.
#[derive(Debug, Error)]
#[error("{tool} is not available: {message}")]
pub struct EnvironmentError {
    /// Name of the missing tool.
    pub tool: String,
    /// Human-readable message.
    pub message: String,
    /// Machine-readable error code.
    pub code: String,
}

impl EnvironmentError {
    /// Create a new environment error.
    #[must_use]
    pub fn new(tool: impl Into<String>, message: impl Into<String>) -> Self {
        let tool: String = tool.into();
        let code = format!("{}_UNAVAILABLE", tool.to_uppercase());
        Self {
            tool,
            message: message.into(),
            code,
        }
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// ApiError
// ─────────────────────────────────────────────────────────────────────────────

/// Transcription service failure: a non-success HTTP status or a transport
/// error. Timeouts are treated identically to transport errors.
#[derive(Debug, Error)]
#[error("transcription API error ({model}): {message}")]
pub struct ApiError {
    /// Model the request was for.
    pub model: String,
    /// Human-readable message.
    pub message: String,
    /// Machine-readable error code.
    pub code: String,
    /// Error category.
    pub category: ErrorCategory,
    /// HTTP status code, when the service responded.
    pub status_code: Option<u16>,
    /// Raw response body, verbatim.
    pub body: Option<String>,
    /// Whether this error is retryable.
    pub retryable: bool,
    /// Milliseconds to wait before retrying, from `Retry-After`.
    pub retry_after_ms: Option<u64>,
    /// Original cause.
    #[source]
    pub source: Option<Box<dyn std::error::Error + Send + Sync>>,
}

impl ApiError {
    /// Create a new API error.
    #[must_use]
    pub fn new(model: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            model: model.into(),
            message: message.into(),
            code: "API_ERROR".to_owned(),
            category: ErrorCategory::Unknown,
            status_code: None,
            body: None,
            retryable: false,
            retry_after_ms: None,
            source: None,
        }
    }

    /// Create a network/transport error (connection failure or timeout).
    #[must_use]
    pub fn network(model: impl Into<String>, message: impl Into<String>) -> Self {
        let mut err = Self::new(model, message);
        err.code = "NETWORK_ERROR".to_owned();
        err.category = ErrorCategory::Network;
        err.retryable = true;
        err
    }

    /// Set the HTTP status code and infer category and retryability.
    #[must_use]
    pub fn with_status(mut self, status: u16) -> Self {
        self.status_code = Some(status);
        self.category = match status {
            401 => ErrorCategory::Authentication,
            403 => ErrorCategory::Authorization,
            429 => ErrorCategory::RateLimit,
            s if s >= 500 => ErrorCategory::Server,
            s if s >= 400 => ErrorCategory::InvalidRequest,
            _ => self.category,
        };
        self.code = format!("API_STATUS_{status}");
        self.retryable = matches!(
            self.category,
            ErrorCategory::RateLimit | ErrorCategory::Server
        );
        self
    }

    /// Attach the raw response body.
    #[must_use]
    pub fn with_body(mut self, body: impl Into<String>) -> Self {
        self.body = Some(body.into());
        self
    }

    /// Set the retry-after hint in milliseconds.
    #[must_use]
    pub fn with_retry_after(mut self, ms: u64) -> Self {
        self.retry_after_ms = Some(ms);
        self
    }

    /// Set the error cause.
    #[must_use]
    pub fn with_source(mut self, source: impl std::error::Error + Send + Sync + 'static) -> Self {
        self.source = Some(Box::new(source));
        self
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    // -- ValidationError --

    #[test]
    fn validation_codes() {
        assert_eq!(ValidationError::MissingApiKey.code(), "MISSING_API_KEY");
        assert_eq!(
            ValidationError::FileNotFound(PathBuf::from("/x")).code(),
            "FILE_NOT_FOUND"
        );
        assert_eq!(
            ValidationError::WindowTooShort {
                window_secs: 10.0,
                overlap_secs: 15.0
            }
            .code(),
            "WINDOW_TOO_SHORT"
        );
    }

    #[test]
    fn validation_display_includes_path() {
        let err = ValidationError::FileNotFound(PathBuf::from("/tmp/missing.mp3"));
        assert!(err.to_string().contains("/tmp/missing.mp3"));
    }

    // -- MediaError --

    #[test]
    fn media_error_code_from_operation() {
        let err = MediaError::new("/tmp/a.mp4", MediaOperation::ExtractAudio, "exit code 1");
        assert_eq!(err.code, "MEDIA_EXTRACT_AUDIO_ERROR");
        assert!(err.to_string().contains("extract_audio"));
        assert!(err.to_string().contains("/tmp/a.mp4"));
    }

    #[test]
    fn media_error_with_stderr() {
        let err = MediaError::new("/tmp/a.wav", MediaOperation::Trim, "exit code 1")
            .with_stderr("Invalid data found when processing input");
        assert_eq!(
            err.stderr.as_deref(),
            Some("Invalid data found when processing input")
        );
    }

    #[test]
    fn media_error_with_source() {
        let cause = std::io::Error::new(std::io::ErrorKind::NotFound, "no such file");
        let err =
            MediaError::new("/tmp/a.wav", MediaOperation::Probe, "spawn failed").with_source(cause);
        assert!(err.source.is_some());
    }

    // -- EnvironmentError --

    #[test]
    fn environment_error_code() {
        let err = EnvironmentError::new("ffmpeg", "binary not found on PATH");
        assert_eq!(err.code, "FFMPEG_UNAVAILABLE");
        assert!(err.to_string().contains("ffmpeg"));
    }

    // -- ApiError --

    #[test]
    fn api_error_429_is_retryable() {
        let err = ApiError::new("whisper-large-v3-turbo", "rate limited").with_status(429);
        assert_eq!(err.category, ErrorCategory::RateLimit);
        assert_eq!(err.code, "API_STATUS_429");
        assert!(err.retryable);
    }

    #[test]
    fn api_error_401_is_not_retryable() {
        let err = ApiError::new("whisper-large-v3-turbo", "unauthorized").with_status(401);
        assert_eq!(err.category, ErrorCategory::Authentication);
        assert!(!err.retryable);
    }

    #[test]
    fn api_error_500_is_retryable() {
        let err = ApiError::new("whisper-large-v3-turbo", "boom").with_status(500);
        assert_eq!(err.category, ErrorCategory::Server);
        assert!(err.retryable);
    }

    #[test]
    fn api_error_400_is_invalid_request() {
        let err = ApiError::new("whisper-large-v3-turbo", "bad form").with_status(400);
        assert_eq!(err.category, ErrorCategory::InvalidRequest);
        assert!(!err.retryable);
    }

    #[test]
    fn api_error_keeps_body_verbatim() {
        let err = ApiError::new("m", "bad request")
            .with_status(422)
            .with_body("{\"error\":{\"message\":\"unsupported format\"}}");
        assert_eq!(
            err.body.as_deref(),
            Some("{\"error\":{\"message\":\"unsupported format\"}}")
        );
    }

    #[test]
    fn api_network_error_is_retryable() {
        let err = ApiError::network("m", "connection refused");
        assert_eq!(err.category, ErrorCategory::Network);
        assert_eq!(err.code, "NETWORK_ERROR");
        assert!(err.retryable);
        assert!(err.status_code.is_none());
    }

    // -- MurmurError --

    #[test]
    fn murmur_error_kind_names() {
        let v: MurmurError = ValidationError::MissingApiKey.into();
        assert_eq!(v.kind_name(), "ValidationError");
        let m: MurmurError = MediaError::new("/a", MediaOperation::Trim, "x").into();
        assert_eq!(m.kind_name(), "MediaProcessingError");
        let e: MurmurError = EnvironmentError::new("ffmpeg", "missing").into();
        assert_eq!(e.kind_name(), "EnvironmentUnavailable");
        let a: MurmurError = ApiError::new("m", "x").into();
        assert_eq!(a.kind_name(), "ApiError");
    }

    #[test]
    fn murmur_error_retryability_follows_api_category() {
        let retryable: MurmurError = ApiError::new("m", "x").with_status(503).into();
        assert!(retryable.is_retryable());
        let fatal: MurmurError = ApiError::new("m", "x").with_status(401).into();
        assert!(!fatal.is_retryable());
        let validation: MurmurError = ValidationError::MissingApiKey.into();
        assert!(!validation.is_retryable());
    }

    #[test]
    fn murmur_error_code_passthrough() {
        let err: MurmurError = ApiError::new("m", "x").with_status(429).into();
        assert_eq!(err.code(), "API_STATUS_429");
    }

    #[test]
    fn errors_are_std_errors() {
        let err: MurmurError = ValidationError::MissingApiKey.into();
        let _: &dyn std::error::Error = &err;
    }

    #[test]
    fn category_display() {
        assert_eq!(ErrorCategory::RateLimit.to_string(), "rate_limit");
        assert_eq!(ErrorCategory::Network.to_string(), "network");
    }
}
