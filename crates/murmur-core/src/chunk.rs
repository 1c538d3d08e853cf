//! Time-window planning for oversized uploads.
//!
//! The external service rejects uploads above a fixed size, so long inputs
//! are cut into overlapping windows and transcribed one window at a time.
//! Planning is pure arithmetic over the probed duration; cutting the actual
//! audio lives in `murmur-media`.

use serde::{Deserialize, Serialize};

use crate::errors::ValidationError;

/// Default window length in seconds (4 minutes).
pub const DEFAULT_WINDOW_SECS: f64 = 240.0;
/// Default overlap between consecutive windows in seconds.
pub const DEFAULT_OVERLAP_SECS: f64 = 15.0;

/// One planned time window of the source audio.
///
/// Invariants: `0 <= start < end <= duration` and
/// `end - start <= window length`. Consecutive specs overlap by the
/// configured overlap, except possibly the final pair.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ChunkSpec {
    /// Zero-based position in the plan; also the upload order.
    pub index: usize,
    /// Window start in seconds from the beginning of the source.
    pub start_secs: f64,
    /// Window end in seconds (exclusive).
    pub end_secs: f64,
}

impl ChunkSpec {
    /// Window length in seconds.
    #[must_use]
    pub fn length_secs(&self) -> f64 {
        self.end_secs - self.start_secs
    }
}

/// Policy for a chunk that fails to materialize (ffmpeg could not cut it).
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum OnChunkFailure {
    /// Drop the failed chunk with a warning and keep going. The report's
    /// chunk count reflects what was actually sent.
    #[default]
    BestEffort,
    /// Fail the whole job on the first chunk that cannot be cut.
    Abort,
}

/// Plan the ordered sequence of windows covering `duration_secs`.
///
/// `stride = window - overlap` is the advance between window starts; the
/// plan has a window starting at every multiple of the stride until one
/// reaches the end of the source. The final window is clamped to the
/// source duration, so it may be shorter than `window_secs` and overlap
/// its predecessor by more than `overlap_secs`.
///
/// Returns an empty plan for a non-positive duration.
///
/// # Errors
///
/// [`ValidationError::WindowTooShort`] when `window_secs <= overlap_secs`,
/// which would make the stride non-positive.
pub fn plan_chunks(
    duration_secs: f64,
    window_secs: f64,
    overlap_secs: f64,
) -> Result<Vec<ChunkSpec>, ValidationError> {
    if window_secs <= overlap_secs || overlap_secs < 0.0 {
        return Err(ValidationError::WindowTooShort {
            window_secs,
            overlap_secs,
        });
    }
    if duration_secs <= 0.0 {
        return Ok(Vec::new());
    }

    let stride = window_secs - overlap_secs;
    let mut specs = Vec::new();

    for index in 0.. {
        #[allow(clippy::cast_precision_loss)]
        let start_secs = index as f64 * stride;
        if start_secs >= duration_secs {
            break;
        }
        let end_secs = (start_secs + window_secs).min(duration_secs);
        specs.push(ChunkSpec {
            index,
            start_secs,
            end_secs,
        });
        if end_secs >= duration_secs {
            break;
        }
    }

    Ok(specs)
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────
