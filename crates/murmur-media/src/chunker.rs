//! Materializing planned chunks as standalone audio segments.

use std::path::Path;

use murmur_core::{ChunkSpec, MediaError, OnChunkFailure};
use tracing::{debug, warn};

use crate::artifact::ChunkArtifact;
use crate::traits::MediaOps;

/// Cut one audio segment per planned spec, in order.
///
/// Under [`OnChunkFailure::BestEffort`] a spec whose cut fails is dropped
/// with a warning and iteration continues — the job degrades instead of
/// aborting, and the caller's chunk count reflects what was actually
/// produced. Under [`OnChunkFailure::Abort`] the first failure propagates.
///
/// # Errors
///
/// [`MediaError`] from the failing cut, only under the abort policy.
pub async fn materialize_chunks(
    media: &dyn MediaOps,
    specs: &[ChunkSpec],
    source: &Path,
    policy: OnChunkFailure,
) -> Result<Vec<ChunkArtifact>, MediaError> {
    let mut artifacts = Vec::with_capacity(specs.len());

    for spec in specs {
        match media.trim(source, spec.start_secs, spec.end_secs).await {
            Ok(artifact) => {
                debug!(
                    index = spec.index,
                    start_secs = spec.start_secs,
                    end_secs = spec.end_secs,
                    "materialized chunk"
                );
                artifacts.push(ChunkArtifact {
                    spec: *spec,
                    artifact,
                });
            }
            Err(e) if policy == OnChunkFailure::BestEffort => {
                warn!(
                    index = spec.index,
                    start_secs = spec.start_secs,
                    end_secs = spec.end_secs,
                    error = %e,
                    "dropping chunk that failed to materialize"
                );
            }
            Err(e) => return Err(e),
        }
    }

    Ok(artifacts)
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────
