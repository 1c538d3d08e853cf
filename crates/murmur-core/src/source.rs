//! Media inputs: where the bytes come from and what they resolve to.

use std::path::{Path, PathBuf};

/// Where the media bytes to transcribe come from.
///
/// Resolved exactly once at the start of an orchestration call; downstream
/// code only ever sees the resolved [`MediaFile`].
#[derive(Debug, Clone)]
pub enum MediaSource {
    /// A file already on the local filesystem.
    Path(PathBuf),
    /// In-memory bytes (e.g. an upload held by a web framework).
    Bytes {
        /// The raw media bytes.
        data: Vec<u8>,
        /// Original file name, if known. Used only for extension-based
        /// classification of the buffered copy.
        name_hint: Option<String>,
    },
    /// A remote file to download before processing.
    Url(String),
}

impl MediaSource {
    /// Source from a filesystem path.
    pub fn path(path: impl Into<PathBuf>) -> Self {
        Self::Path(path.into())
    }

    /// Source from in-memory bytes.
    #[must_use]
    pub fn bytes(data: Vec<u8>, name_hint: Option<String>) -> Self {
        Self::Bytes { data, name_hint }
    }

    /// Source from a remote URL.
    pub fn url(url: impl Into<String>) -> Self {
        Self::Url(url.into())
    }

    /// Whether this source always permits chunking.
    ///
    /// Bytes and URL inputs are materialized as temporary files the caller
    /// never sees, so there is no reason to honor a no-chunking request.
    #[must_use]
    pub fn forces_chunking(&self) -> bool {
        !matches!(self, Self::Path(_))
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Kind classification
// ─────────────────────────────────────────────────────────────────────────────

/// Recognized video file extensions.
pub const VIDEO_EXTENSIONS: &[&str] = &[
    "mp4", "mov", "avi", "mkv", "webm", "flv", "wmv", "m4v", "mpg", "mpeg",
];

/// Recognized audio file extensions.
pub const AUDIO_EXTENSIONS: &[&str] = &[
    "mp3", "wav", "m4a", "flac", "ogg", "aac", "wma", "opus",
];

/// Broad media classification, decided purely from the file extension.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum MediaKind {
    /// Audio container.
    Audio,
    /// Video container; audio must be extracted before upload.
    Video,
    /// Extension not in either set. Treated as audio downstream.
    Unknown,
}

impl MediaKind {
    /// Classify a path by extension. No content sniffing.
    #[must_use]
    pub fn of(path: &Path) -> Self {
        let Some(ext) = path.extension().and_then(|e| e.to_str()) else {
            return Self::Unknown;
        };
        let ext = ext.to_lowercase();
        if VIDEO_EXTENSIONS.contains(&ext.as_str()) {
            Self::Video
        } else if AUDIO_EXTENSIONS.contains(&ext.as_str()) {
            Self::Audio
        } else {
            Self::Unknown
        }
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Resolved file
// ─────────────────────────────────────────────────────────────────────────────

/// A [`MediaSource`] resolved to a concrete on-disk file.
///
/// Owned exclusively by the orchestration call that created it; when the
/// file was materialized (buffered bytes, download, extracted audio) the
/// owning temp artifact deletes it on drop.
#[derive(Debug, Clone)]
pub struct MediaFile {
    /// Absolute path of the resolved file.
    pub path: PathBuf,
    /// Size in bytes.
    pub size_bytes: u64,
    /// Extension-based classification.
    pub kind: MediaKind,
    /// Duration in seconds, when probing succeeded.
    pub duration_secs: Option<f64>,
}

impl MediaFile {
    /// File size in megabytes.
    #[must_use]
    #[allow(clippy::cast_precision_loss)]
    pub fn size_mb(&self) -> f64 {
        self.size_bytes as f64 / (1024.0 * 1024.0)
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn kind_audio_extensions() {
        for ext in AUDIO_EXTENSIONS {
            let path = PathBuf::from(format!("clip.{ext}"));
            assert_eq!(MediaKind::of(&path), MediaKind::Audio, "failed for {ext}");
        }
    }

    #[test]
    fn kind_video_extensions() {
        for ext in VIDEO_EXTENSIONS {
            let path = PathBuf::from(format!("clip.{ext}"));
            assert_eq!(MediaKind::of(&path), MediaKind::Video, "failed for {ext}");
        }
    }

    #[test]
    fn kind_is_case_insensitive() {
        assert_eq!(MediaKind::of(Path::new("MEETING.MP4")), MediaKind::Video);
        assert_eq!(MediaKind::of(Path::new("Voice.Mp3")), MediaKind::Audio);
    }

    #[test]
    fn kind_unknown_extension() {
        assert_eq!(MediaKind::of(Path::new("notes.txt")), MediaKind::Unknown);
    }

    #[test]
    fn kind_no_extension() {
        assert_eq!(MediaKind::of(Path::new("recording")), MediaKind::Unknown);
    }

    #[test]
    fn path_source_does_not_force_chunking() {
        assert!(!MediaSource::path("/tmp/a.mp3").forces_chunking());
    }

    #[test]
    fn bytes_and_url_sources_force_chunking() {
        assert!(MediaSource::bytes(vec![0u8; 4], None).forces_chunking());
        assert!(MediaSource::url("https://example.com/a.mp3").forces_chunking());
    }

    #[test]
    fn size_mb_conversion() {
        let file = MediaFile {
            path: PathBuf::from("/tmp/a.wav"),
            size_bytes: 26 * 1024 * 1024,
            kind: MediaKind::Audio,
            duration_secs: None,
        };
        assert!((file.size_mb() - 26.0).abs() < f64::EPSILON);
    }
}
