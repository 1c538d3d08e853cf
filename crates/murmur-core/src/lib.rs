//! # murmur-core
//!
//! Domain types and pure logic shared by every murmur crate:
//!
//! - [`MediaSource`] / [`MediaFile`]: where the bytes come from and what
//!   they resolved to on disk
//! - [`chunk`]: time-window planning around the upload size limit
//! - [`TranscriptionReport`] / [`TranscriptSegment`]: what a finished job
//!   returns
//! - [`errors`]: the error hierarchy (validation / media / environment / API)
//! - [`retry`]: retry configuration and backoff math for the upload step
//!
//! Everything here is sync and side-effect free; subprocess and network
//! work lives in `murmur-media` and `murmur-client`.

pub mod chunk;
pub mod errors;
pub mod retry;
pub mod source;
pub mod transcript;

pub use chunk::{ChunkSpec, OnChunkFailure, plan_chunks};
pub use errors::{
    ApiError, EnvironmentError, ErrorCategory, MediaError, MediaOperation, MurmurError,
    ValidationError,
};
pub use retry::RetryConfig;
pub use source::{MediaFile, MediaKind, MediaSource};
pub use transcript::{TranscriptSegment, TranscriptionReport};
