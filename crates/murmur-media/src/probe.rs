//! Duration probing and extension classification via ffprobe.

use std::path::Path;
use std::time::Duration;

use murmur_core::MediaKind;
use murmur_settings::MediaSettings;
use tracing::{debug, warn};

/// ffprobe wrapper. Classification is pure; duration probing shells out.
#[derive(Debug, Clone)]
pub struct MediaProbe {
    ffprobe: String,
    timeout: Duration,
}

impl MediaProbe {
    /// Create a probe from the media settings.
    #[must_use]
    pub fn new(settings: &MediaSettings) -> Self {
        Self {
            ffprobe: settings.ffprobe_path.clone(),
            timeout: Duration::from_secs(settings.tool_timeout_secs),
        }
    }

    /// Classify a file by extension. No content sniffing.
    #[must_use]
    pub fn kind(&self, path: &Path) -> MediaKind {
        MediaKind::of(path)
    }

    /// Duration of the file in seconds.
    ///
    /// Best effort: a missing binary, a non-zero exit, a timeout, or
    /// unparseable output all log a warning and return `None`.
    pub async fn duration_secs(&self, path: &Path) -> Option<f64> {
        let mut cmd = tokio::process::Command::new(&self.ffprobe);
        let _ = cmd
            .arg("-v")
            .arg("error")
            .arg("-show_entries")
            .arg("format=duration")
            .arg("-of")
            .arg("default=noprint_wrappers=1:nokey=1")
            .arg(path);

        let output = match tokio::time::timeout(self.timeout, cmd.output()).await {
            Ok(Ok(output)) => output,
            Ok(Err(e)) => {
                warn!(path = %path.display(), error = %e, "could not invoke ffprobe");
                return None;
            }
            Err(_) => {
                warn!(path = %path.display(), "ffprobe timed out");
                return None;
            }
        };

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            warn!(
                path = %path.display(),
                exit_code = output.status.code().unwrap_or(-1),
                stderr = %stderr.trim(),
                "ffprobe failed, duration unknown"
            );
            return None;
        }

        let stdout = String::from_utf8_lossy(&output.stdout);
        let duration = parse_duration(&stdout);
        if duration.is_none() {
            warn!(path = %path.display(), output = %stdout.trim(), "unparseable ffprobe output");
        } else {
            debug!(path = %path.display(), duration_secs = ?duration, "probed duration");
        }
        duration
    }
}

/// Parse ffprobe's `format=duration` output into seconds.
fn parse_duration(stdout: &str) -> Option<f64> {
    let value: f64 = stdout.trim().parse().ok()?;
    (value.is_finite() && value > 0.0).then_some(value)
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    #[test]
    fn parse_duration_plain_seconds() {
        assert_eq!(parse_duration("600.123456\n"), Some(600.123_456));
        assert_eq!(parse_duration("  42.0  "), Some(42.0));
    }

    #[test]
    fn parse_duration_rejects_garbage() {
        assert_eq!(parse_duration("N/A"), None);
        assert_eq!(parse_duration(""), None);
        assert_eq!(parse_duration("inf"), None);
        assert_eq!(parse_duration("-3.0"), None);
        assert_eq!(parse_duration("0"), None);
    }

    #[test]
    fn kind_delegates_to_extension_sets() {
        let probe = MediaProbe::new(&MediaSettings::default());
        assert_eq!(probe.kind(&PathBuf::from("a.mp4")), MediaKind::Video);
        assert_eq!(probe.kind(&PathBuf::from("a.mp3")), MediaKind::Audio);
        assert_eq!(probe.kind(&PathBuf::from("a.bin")), MediaKind::Unknown);
    }

    #[tokio::test]
    async fn missing_binary_degrades_to_none() {
        let settings = MediaSettings {
            ffprobe_path: "/nonexistent/ffprobe-missing".to_string(),
            ..MediaSettings::default()
        };
        let probe = MediaProbe::new(&settings);
        let duration = probe.duration_secs(Path::new("/tmp/whatever.mp3")).await;
        assert_eq!(duration, None);
    }
}
