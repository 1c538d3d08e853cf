//! Audio extraction, normalization, and window trimming via ffmpeg.

use std::path::Path;
use std::time::Duration;

use murmur_core::{EnvironmentError, MediaError, MediaOperation};
use murmur_settings::MediaSettings;
use tracing::debug;

use crate::artifact::TempArtifact;

/// ffmpeg wrapper for the three conversions the pipeline needs.
///
/// Every operation writes into a fresh [`TempArtifact`]; when ffmpeg exits
/// non-zero the artifact is dropped (removing any partial output) before
/// the error — carrying ffmpeg's stderr — propagates.
#[derive(Debug, Clone)]
pub struct MediaConverter {
    ffmpeg: String,
    timeout: Duration,
}

impl MediaConverter {
    /// Create a converter from the media settings.
    #[must_use]
    pub fn new(settings: &MediaSettings) -> Self {
        Self {
            ffmpeg: settings.ffmpeg_path.clone(),
            timeout: Duration::from_secs(settings.tool_timeout_secs),
        }
    }

    /// Check that ffmpeg can be invoked at all (`ffmpeg -version`).
    ///
    /// # Errors
    ///
    /// [`EnvironmentError`] when the binary cannot be spawned or does not
    /// report a version — distinct from a processing failure on a file.
    pub async fn ensure_available(&self) -> Result<(), EnvironmentError> {
        let output = tokio::process::Command::new(&self.ffmpeg)
            .arg("-version")
            .output()
            .await
            .map_err(|e| {
                EnvironmentError::new(
                    "ffmpeg",
                    format!(
                        "cannot invoke {}: {e}. Install ffmpeg and ensure it is on PATH",
                        self.ffmpeg
                    ),
                )
            })?;

        if output.status.success() {
            Ok(())
        } else {
            Err(EnvironmentError::new(
                "ffmpeg",
                format!(
                    "version check exited with code {}",
                    output.status.code().unwrap_or(-1)
                ),
            ))
        }
    }

    /// Extract the audio track of a video into a fresh mono 16 kHz WAV.
    pub async fn extract_audio(&self, video: &Path) -> Result<TempArtifact, MediaError> {
        let out = new_artifact(video, MediaOperation::ExtractAudio, ".wav")?;
        let args = extract_audio_args(video, out.path());
        self.run(args, out, video, MediaOperation::ExtractAudio).await
    }

    /// Convert any audio to the canonical mono 16 kHz WAV form.
    pub async fn normalize(&self, input: &Path) -> Result<TempArtifact, MediaError> {
        let out = new_artifact(input, MediaOperation::Normalize, ".wav")?;
        let args = normalize_args(input, out.path());
        self.run(args, out, input, MediaOperation::Normalize).await
    }

    /// Cut `[start, end)` seconds out of an audio file.
    ///
    /// Uses stream copy — no re-encode — so the segment keeps the source
    /// fidelity and the cut is fast. The output keeps the source extension
    /// since the container is unchanged.
    pub async fn trim(
        &self,
        audio: &Path,
        start_secs: f64,
        end_secs: f64,
    ) -> Result<TempArtifact, MediaError> {
        let suffix = audio
            .extension()
            .and_then(|e| e.to_str())
            .map_or_else(|| ".wav".to_string(), |e| format!(".{e}"));
        let out = new_artifact(audio, MediaOperation::Trim, &suffix)?;
        let args = trim_args(audio, out.path(), start_secs, end_secs);
        self.run(args, out, audio, MediaOperation::Trim).await
    }

    /// Run ffmpeg with `args`; return the artifact on exit code 0, or drop
    /// it (removing partial output) and surface stderr otherwise.
    async fn run(
        &self,
        args: Vec<String>,
        out: TempArtifact,
        input: &Path,
        operation: MediaOperation,
    ) -> Result<TempArtifact, MediaError> {
        debug!(tool = %self.ffmpeg, ?operation, input = %input.display(), "running ffmpeg");

        let mut cmd = tokio::process::Command::new(&self.ffmpeg);
        let _ = cmd.args(&args);

        let output = match tokio::time::timeout(self.timeout, cmd.output()).await {
            Ok(Ok(output)) => output,
            Ok(Err(e)) => {
                return Err(MediaError::new(
                    input.display().to_string(),
                    operation,
                    "could not invoke ffmpeg",
                )
                .with_source(e));
            }
            Err(_) => {
                return Err(MediaError::new(
                    input.display().to_string(),
                    operation,
                    format!("ffmpeg timed out after {}s", self.timeout.as_secs()),
                ));
            }
        };

        if output.status.success() {
            Ok(out)
        } else {
            let stderr = String::from_utf8_lossy(&output.stderr).into_owned();
            // `out` drops here, removing whatever ffmpeg managed to write.
            Err(MediaError::new(
                input.display().to_string(),
                operation,
                format!("exit code {}", output.status.code().unwrap_or(-1)),
            )
            .with_stderr(stderr))
        }
    }
}

fn new_artifact(
    input: &Path,
    operation: MediaOperation,
    suffix: &str,
) -> Result<TempArtifact, MediaError> {
    TempArtifact::create(suffix).map_err(|e| {
        MediaError::new(
            input.display().to_string(),
            operation,
            "could not create temp output",
        )
        .with_source(e)
    })
}

// ── Argument builders (pure, testable) ──────────────────────────────────────

fn path_arg(path: &Path) -> String {
    path.display().to_string()
}

fn extract_audio_args(video: &Path, out: &Path) -> Vec<String> {
    vec![
        "-i".into(),
        path_arg(video),
        "-vn".into(),
        "-acodec".into(),
        "pcm_s16le".into(),
        "-ar".into(),
        "16000".into(),
        "-ac".into(),
        "1".into(),
        "-y".into(),
        path_arg(out),
    ]
}

fn normalize_args(input: &Path, out: &Path) -> Vec<String> {
    vec![
        "-i".into(),
        path_arg(input),
        "-acodec".into(),
        "pcm_s16le".into(),
        "-ar".into(),
        "16000".into(),
        "-ac".into(),
        "1".into(),
        "-y".into(),
        path_arg(out),
    ]
}

fn trim_args(audio: &Path, out: &Path, start_secs: f64, end_secs: f64) -> Vec<String> {
    vec![
        "-i".into(),
        path_arg(audio),
        "-ss".into(),
        start_secs.to_string(),
        "-t".into(),
        (end_secs - start_secs).to_string(),
        "-acodec".into(),
        "copy".into(),
        "-y".into(),
        path_arg(out),
    ]
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use assert_matches::assert_matches;
    use std::path::PathBuf;

    #[test]
    fn extract_args_drop_video_and_downmix() {
        let args = extract_audio_args(&PathBuf::from("/in/talk.mp4"), &PathBuf::from("/out/a.wav"));
        assert_eq!(
            args,
            vec![
                "-i", "/in/talk.mp4", "-vn", "-acodec", "pcm_s16le", "-ar", "16000", "-ac", "1",
                "-y", "/out/a.wav"
            ]
        );
    }

    #[test]
    fn normalize_args_keep_audio_stream() {
        let args = normalize_args(&PathBuf::from("/in/a.ogg"), &PathBuf::from("/out/a.wav"));
        assert!(!args.contains(&"-vn".to_string()));
        assert!(args.contains(&"16000".to_string()));
        assert!(args.contains(&"pcm_s16le".to_string()));
    }

    #[test]
    fn trim_args_use_stream_copy() {
        let args = trim_args(
            &PathBuf::from("/in/a.wav"),
            &PathBuf::from("/out/chunk.wav"),
            225.0,
            465.0,
        );
        let ss = args.iter().position(|a| a == "-ss").unwrap();
        assert_eq!(args[ss + 1], "225");
        let t = args.iter().position(|a| a == "-t").unwrap();
        assert_eq!(args[t + 1], "240");
        assert!(args.contains(&"copy".to_string()));
        // Stream copy must never re-encode.
        assert!(!args.contains(&"pcm_s16le".to_string()));
    }

    #[tokio::test]
    async fn ensure_available_reports_missing_binary() {
        let settings = MediaSettings {
            ffmpeg_path: "/nonexistent/ffmpeg-missing".to_string(),
            ..MediaSettings::default()
        };
        let converter = MediaConverter::new(&settings);
        let err = converter.ensure_available().await.unwrap_err();
        assert_eq!(err.code, "FFMPEG_UNAVAILABLE");
        assert!(err.to_string().contains("cannot invoke"));
    }

    #[tokio::test]
    async fn failed_operation_carries_cause_and_operation() {
        let settings = MediaSettings {
            ffmpeg_path: "/nonexistent/ffmpeg-missing".to_string(),
            ..MediaSettings::default()
        };
        let converter = MediaConverter::new(&settings);
        let err = converter
            .extract_audio(Path::new("/tmp/input.mp4"))
            .await
            .unwrap_err();
        assert_matches!(err.operation, MediaOperation::ExtractAudio);
        assert_eq!(err.code, "MEDIA_EXTRACT_AUDIO_ERROR");
        assert!(err.source.is_some());
    }
}
