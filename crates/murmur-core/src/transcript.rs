//! Transcription results and verbose-transcript rendering.

/// Result of one top-level transcription job. Immutable once built.
#[derive(Debug, Clone, PartialEq)]
pub struct TranscriptionReport {
    /// The full transcript. For chunked jobs, per-chunk texts joined with
    /// a blank line, in chunk-index order.
    pub text: String,
    /// Language requested (or `auto`).
    pub language: String,
    /// Source duration in seconds, when probing succeeded.
    pub duration_secs: Option<f64>,
    /// Model that produced the transcript.
    pub model: String,
    /// Number of audio segments actually sent to the service (>= 1).
    pub chunk_count: usize,
    /// Whether the job succeeded. A report is only built on success.
    pub success: bool,
}

/// One timestamped segment of a verbose service response.
#[derive(Debug, Clone, PartialEq)]
pub struct TranscriptSegment {
    /// Segment start in seconds.
    pub start_secs: f64,
    /// Segment end in seconds.
    pub end_secs: f64,
    /// Segment text.
    pub text: String,
}

impl TranscriptSegment {
    /// Render as `[MM:SS - MM:SS] text`.
    #[must_use]
    pub fn timestamped_line(&self) -> String {
        format!(
            "[{} - {}] {}",
            format_clock(self.start_secs),
            format_clock(self.end_secs),
            self.text.trim()
        )
    }
}

/// Format seconds as `MM:SS` (minutes are not wrapped at 60).
#[must_use]
#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
pub fn format_clock(secs: f64) -> String {
    let total = secs.max(0.0) as u64;
    format!("{:02}:{:02}", total / 60, total % 60)
}

/// Render a verbose transcript: the full text first, then one timestamped
/// line per segment.
#[must_use]
pub fn render_verbose(text: &str, segments: &[TranscriptSegment]) -> String {
    let mut out = String::from(text.trim());
    if !segments.is_empty() {
        out.push_str("\n\n");
        let lines: Vec<String> = segments
            .iter()
            .map(TranscriptSegment::timestamped_line)
            .collect();
        out.push_str(&lines.join("\n"));
    }
    out
}

/// Join per-chunk transcripts with a blank line, preserving order.
#[must_use]
pub fn merge_chunk_texts(texts: &[String]) -> String {
    texts.join("\n\n")
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────
