//! Resolving a media source to a local file.
//!
//! Paths are validated; bytes and URLs are materialized into temp files
//! owned by the returned guard, so dropping the resolution removes them.

use std::path::{Path, PathBuf};

use futures::StreamExt;
use murmur_core::{ApiError, MediaSource, MurmurError, ValidationError};
use murmur_media::TempArtifact;
use tracing::{debug, info};

/// A source resolved to a concrete local file.
#[derive(Debug)]
pub struct ResolvedInput {
    /// Path of the resolved file.
    pub path: PathBuf,
    /// Owner of the backing temp file for buffered/downloaded sources.
    /// `None` when the caller's own file is used directly.
    pub guard: Option<TempArtifact>,
}

/// Resolve a [`MediaSource`] into a local file.
///
/// # Errors
///
/// - [`ValidationError::FileNotFound`] for a missing path
/// - [`ApiError`] (network category or status) for a failed download
pub async fn resolve_source(
    source: MediaSource,
    http: &reqwest::Client,
) -> Result<ResolvedInput, MurmurError> {
    match source {
        MediaSource::Path(path) => {
            if !path.exists() {
                return Err(ValidationError::FileNotFound(path).into());
            }
            Ok(ResolvedInput { path, guard: None })
        }
        MediaSource::Bytes { data, name_hint } => {
            let suffix = suffix_from_name(name_hint.as_deref());
            let artifact = TempArtifact::create(&suffix).map_err(io_to_validation)?;
            tokio::fs::write(artifact.path(), &data)
                .await
                .map_err(io_to_validation)?;
            debug!(bytes = data.len(), path = %artifact.path().display(), "buffered stream input");
            Ok(ResolvedInput {
                path: artifact.path().to_path_buf(),
                guard: Some(artifact),
            })
        }
        MediaSource::Url(url) => download(&url, http).await,
    }
}

/// Download a remote file into a temp artifact, streaming to disk.
async fn download(url: &str, http: &reqwest::Client) -> Result<ResolvedInput, MurmurError> {
    info!(url, "downloading remote media");

    let response = http
        .get(url)
        .send()
        .await
        .map_err(|e| ApiError::network("download", format!("could not fetch {url}: {e}")))?;

    let status = response.status();
    if !status.is_success() {
        let body = response.text().await.unwrap_or_default();
        return Err(ApiError::new("download", format!("fetch of {url} returned {status}"))
            .with_status(status.as_u16())
            .with_body(body)
            .into());
    }

    let suffix = suffix_from_name(Some(url));
    let artifact = TempArtifact::create(&suffix).map_err(io_to_validation)?;
    let mut file = tokio::fs::File::create(artifact.path())
        .await
        .map_err(io_to_validation)?;

    let mut stream = response.bytes_stream();
    let mut total: u64 = 0;
    while let Some(chunk) = stream.next().await {
        let chunk = chunk
            .map_err(|e| ApiError::network("download", format!("download interrupted: {e}")))?;
        total += chunk.len() as u64;
        tokio::io::AsyncWriteExt::write_all(&mut file, &chunk)
            .await
            .map_err(io_to_validation)?;
    }
    tokio::io::AsyncWriteExt::flush(&mut file)
        .await
        .map_err(io_to_validation)?;

    debug!(url, bytes = total, path = %artifact.path().display(), "download complete");
    Ok(ResolvedInput {
        path: artifact.path().to_path_buf(),
        guard: Some(artifact),
    })
}

/// Temp-file suffix preserving the source extension, so extension-based
/// classification still works on the materialized copy.
fn suffix_from_name(name: Option<&str>) -> String {
    name.and_then(|n| {
        let trimmed = n.split(['?', '#']).next().unwrap_or(n);
        Path::new(trimmed)
            .extension()
            .and_then(|e| e.to_str())
            .filter(|e| e.len() <= 5 && e.chars().all(char::is_alphanumeric))
            .map(|e| format!(".{}", e.to_lowercase()))
    })
    .unwrap_or_else(|| ".tmp".to_string())
}

fn io_to_validation(e: std::io::Error) -> MurmurError {
    ValidationError::UnsupportedInput(format!("could not stage input: {e}")).into()
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────
