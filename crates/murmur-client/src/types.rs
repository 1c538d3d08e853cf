//! Request/response types for the transcription endpoint.

use murmur_core::{RetryConfig, TranscriptSegment};
use murmur_settings::Settings;
use serde::Deserialize;

/// Client configuration: endpoint, credentials, timeout, retry policy.
#[derive(Debug, Clone)]
pub struct ClientConfig {
    /// Full URL of the transcriptions endpoint.
    pub base_url: String,
    /// Bearer token for the service.
    pub api_key: String,
    /// Request timeout in seconds, fixed per request.
    pub timeout_secs: u64,
    /// Upload retry policy.
    pub retry: RetryConfig,
}

impl ClientConfig {
    /// Build a config from loaded settings plus the caller's API key.
    #[must_use]
    pub fn from_settings(settings: &Settings, api_key: impl Into<String>) -> Self {
        Self {
            base_url: settings.api.base_url.clone(),
            api_key: api_key.into(),
            timeout_secs: settings.api.timeout_secs,
            retry: settings.retry.clone(),
        }
    }
}

/// Output format requested from the service.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum ResponseFormat {
    /// JSON body with a `text` field.
    #[default]
    Json,
    /// Plain text body.
    Text,
    /// JSON body with `text` plus timestamped `segments`.
    Verbose,
}

impl ResponseFormat {
    /// The service's wire name for this format.
    #[must_use]
    pub fn wire_name(&self) -> &'static str {
        match self {
            Self::Json => "json",
            Self::Text => "text",
            Self::Verbose => "verbose_json",
        }
    }

    /// Parse a user-facing format name (`json` | `text` | `verbose`).
    #[must_use]
    pub fn parse(name: &str) -> Option<Self> {
        match name {
            "json" => Some(Self::Json),
            "text" => Some(Self::Text),
            "verbose" | "verbose_json" => Some(Self::Verbose),
            _ => None,
        }
    }
}

/// Per-call request parameters.
#[derive(Debug, Clone)]
pub struct TranscribeRequest {
    /// Model identifier sent in the form.
    pub model: String,
    /// Language code; `auto` omits the field and lets the service detect.
    pub language: String,
    /// Optional context prompt; omitted when empty.
    pub prompt: String,
    /// Requested output format.
    pub response_format: ResponseFormat,
}

impl TranscribeRequest {
    /// Request with defaults taken from settings.
    #[must_use]
    pub fn from_settings(settings: &Settings) -> Self {
        Self {
            model: settings.api.model.clone(),
            language: settings.api.language.clone(),
            prompt: String::new(),
            response_format: ResponseFormat::Json,
        }
    }
}

/// One transcribed segment, parsed from a service call.
#[derive(Debug, Clone)]
pub struct TranscriptOutput {
    /// The transcript. In verbose mode this is the rendered timestamped
    /// block (full text first, then one line per segment).
    pub text: String,
    /// Raw segments, present only for verbose responses.
    pub segments: Option<Vec<TranscriptSegment>>,
}

// ── Wire DTOs ───────────────────────────────────────────────────────────────

/// JSON response body (`response_format=json`).
#[derive(Debug, Deserialize)]
pub(crate) struct JsonBody {
    #[serde(default)]
    pub text: String,
}

/// Verbose response body (`response_format=verbose_json`).
#[derive(Debug, Deserialize)]
pub(crate) struct VerboseBody {
    #[serde(default)]
    pub text: String,
    #[serde(default)]
    pub segments: Vec<WireSegment>,
}

/// One segment of a verbose response.
#[derive(Debug, Deserialize)]
pub(crate) struct WireSegment {
    #[serde(default)]
    pub start: f64,
    #[serde(default)]
    pub end: f64,
    #[serde(default)]
    pub text: String,
}

impl From<WireSegment> for TranscriptSegment {
    fn from(seg: WireSegment) -> Self {
        Self {
            start_secs: seg.start,
            end_secs: seg.end,
            text: seg.text,
        }
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn wire_names() {
        assert_eq!(ResponseFormat::Json.wire_name(), "json");
        assert_eq!(ResponseFormat::Text.wire_name(), "text");
        assert_eq!(ResponseFormat::Verbose.wire_name(), "verbose_json");
    }

    #[test]
    fn parse_accepts_both_verbose_spellings() {
        assert_eq!(ResponseFormat::parse("verbose"), Some(ResponseFormat::Verbose));
        assert_eq!(
            ResponseFormat::parse("verbose_json"),
            Some(ResponseFormat::Verbose)
        );
        assert_eq!(ResponseFormat::parse("yaml"), None);
    }

    #[test]
    fn config_from_settings_copies_endpoint_and_retry() {
        let settings = Settings::default();
        let config = ClientConfig::from_settings(&settings, "gsk_test");
        assert_eq!(config.base_url, settings.api.base_url);
        assert_eq!(config.api_key, "gsk_test");
        assert_eq!(config.timeout_secs, 600);
        assert_eq!(config.retry.max_retries, 0);
    }

    #[test]
    fn request_from_settings_defaults() {
        let settings = Settings::default();
        let request = TranscribeRequest::from_settings(&settings);
        assert_eq!(request.model, "whisper-large-v3-turbo");
        assert_eq!(request.language, "es");
        assert!(request.prompt.is_empty());
        assert_eq!(request.response_format, ResponseFormat::Json);
    }

    #[test]
    fn verbose_body_parses_segments() {
        let body: VerboseBody = serde_json::from_str(
            r#"{"text": "hola", "segments": [{"start": 0.0, "end": 2.5, "text": "hola"}]}"#,
        )
        .unwrap();
        assert_eq!(body.segments.len(), 1);
        let seg: TranscriptSegment = body.segments.into_iter().next().unwrap().into();
        assert!((seg.end_secs - 2.5).abs() < f64::EPSILON);
    }

    #[test]
    fn json_body_tolerates_missing_text() {
        let body: JsonBody = serde_json::from_str("{}").unwrap();
        assert!(body.text.is_empty());
    }
}
