//! Settings types: API endpoint, chunking, media tools, retry, logging.

use murmur_core::chunk::OnChunkFailure;
use murmur_core::retry::RetryConfig;
use serde::{Deserialize, Serialize};

/// Top-level settings for the murmur pipeline.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Settings {
    /// Transcription service settings.
    pub api: ApiSettings,
    /// Chunking thresholds and policy.
    pub chunking: ChunkingSettings,
    /// External media tool settings.
    pub media: MediaSettings,
    /// Upload retry policy.
    pub retry: RetryConfig,
    /// Logging settings.
    pub logging: LoggingSettings,
}

/// Transcription service settings.
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ApiSettings {
    /// Full URL of the transcriptions endpoint.
    pub base_url: String,
    /// Default model identifier.
    pub model: String,
    /// Default language code; `auto` lets the service detect.
    pub language: String,
    /// Request timeout in seconds. Fixed per request, no per-byte scaling.
    pub timeout_secs: u64,
}

impl Default for ApiSettings {
    fn default() -> Self {
        Self {
            base_url: "https://api.groq.com/openai/v1/audio/transcriptions".to_string(),
            model: "whisper-large-v3-turbo".to_string(),
            language: "es".to_string(),
            timeout_secs: 600,
        }
    }
}

/// Chunking thresholds and failure policy.
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ChunkingSettings {
    /// Window length in seconds.
    pub window_secs: f64,
    /// Overlap between consecutive windows in seconds.
    pub overlap_secs: f64,
    /// Upload size limit in bytes; larger files are chunked.
    pub max_upload_bytes: u64,
    /// What to do when a chunk fails to materialize.
    pub on_chunk_failure: OnChunkFailure,
}

impl Default for ChunkingSettings {
    fn default() -> Self {
        Self {
            window_secs: murmur_core::chunk::DEFAULT_WINDOW_SECS,
            overlap_secs: murmur_core::chunk::DEFAULT_OVERLAP_SECS,
            max_upload_bytes: 25 * 1024 * 1024,
            on_chunk_failure: OnChunkFailure::BestEffort,
        }
    }
}

/// External media tool settings.
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct MediaSettings {
    /// ffmpeg binary name or path.
    pub ffmpeg_path: String,
    /// ffprobe binary name or path.
    pub ffprobe_path: String,
    /// Timeout for a single tool invocation in seconds.
    pub tool_timeout_secs: u64,
}

impl Default for MediaSettings {
    fn default() -> Self {
        Self {
            ffmpeg_path: "ffmpeg".to_string(),
            ffprobe_path: "ffprobe".to_string(),
            tool_timeout_secs: 600,
        }
    }
}

/// Logging settings.
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct LoggingSettings {
    /// Tracing filter level (`trace` | `debug` | `info` | `warn` | `error`).
    pub level: String,
}

impl Default for LoggingSettings {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
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
    fn default_api_settings() {
        let api = ApiSettings::default();
        assert!(api.base_url.contains("audio/transcriptions"));
        assert_eq!(api.model, "whisper-large-v3-turbo");
        assert_eq!(api.language, "es");
        assert_eq!(api.timeout_secs, 600);
    }

    #[test]
    fn default_chunking_settings() {
        let chunking = ChunkingSettings::default();
        assert!((chunking.window_secs - 240.0).abs() < f64::EPSILON);
        assert!((chunking.overlap_secs - 15.0).abs() < f64::EPSILON);
        assert_eq!(chunking.max_upload_bytes, 26_214_400);
        assert_eq!(chunking.on_chunk_failure, OnChunkFailure::BestEffort);
    }

    #[test]
    fn default_retry_is_disabled() {
        let settings = Settings::default();
        assert_eq!(settings.retry.max_retries, 0);
    }

    #[test]
    fn settings_roundtrip_camel_case() {
        let settings = Settings::default();
        let json = serde_json::to_string(&settings).unwrap();
        assert!(json.contains("baseUrl"));
        assert!(json.contains("maxUploadBytes"));
        assert!(json.contains("onChunkFailure"));
        let back: Settings = serde_json::from_str(&json).unwrap();
        assert_eq!(back.api.model, settings.api.model);
    }

    #[test]
    fn partial_json_uses_field_defaults() {
        let settings: Settings =
            serde_json::from_str(r#"{"api": {"language": "en"}}"#).unwrap();
        assert_eq!(settings.api.language, "en");
        assert_eq!(settings.api.model, "whisper-large-v3-turbo");
        assert_eq!(settings.chunking.max_upload_bytes, 26_214_400);
    }
}
