//! # murmur-media
//!
//! Wrappers around the external media tools (ffprobe/ffmpeg) and the chunk
//! materialization loop.
//!
//! Everything the pipeline needs from the tools is behind the [`MediaOps`]
//! trait so the engine can be tested without ffmpeg on the machine:
//!
//! - classify a file (audio/video, by extension)
//! - probe its duration (best effort — failures degrade to "unknown")
//! - extract/normalize audio to mono 16 kHz WAV
//! - cut a time window out of an audio file without re-encoding
//!
//! Temporary outputs are owned by [`TempArtifact`] values that delete the
//! underlying file on drop, on success and failure paths alike.

pub mod artifact;
pub mod chunker;
pub mod convert;
pub mod ffmpeg;
pub mod probe;
pub mod traits;

pub use artifact::{ChunkArtifact, TempArtifact};
pub use chunker::materialize_chunks;
pub use convert::MediaConverter;
pub use ffmpeg::FfmpegMediaOps;
pub use probe::MediaProbe;
pub use traits::MediaOps;
