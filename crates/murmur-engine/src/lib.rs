//! # murmur-engine
//!
//! The orchestration facade that turns a [`murmur_core::MediaSource`] into
//! a finished [`murmur_core::TranscriptionReport`]:
//!
//! 1. resolve the source to a local file (validate / buffer / download)
//! 2. extract audio when the input is a video
//! 3. probe duration (best effort)
//! 4. decide whether the file needs chunking (size vs the upload limit)
//! 5. either upload the whole file once, or cut overlapping windows and
//!    upload them strictly in index order, one at a time
//! 6. merge per-chunk texts with blank lines, preserving order
//!
//! Processing is deliberately sequential — no overlap between cutting and
//! uploading, and no concurrent uploads — so output order falls out of the
//! loop and wall-clock time scales linearly with chunk count. Every
//! temporary file created along the way is owned by a
//! [`murmur_media::TempArtifact`] and removed on success and failure alike.

pub mod resolve;
pub mod transcriptor;

pub use transcriptor::{TranscribeOptions, Transcriptor};
