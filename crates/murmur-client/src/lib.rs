//! # murmur-client
//!
//! HTTP client for the external speech-to-text service.
//!
//! One call uploads one audio segment as a multipart form and returns the
//! transcribed text (or a rendered timestamped transcript in verbose mode).
//! Non-success statuses surface as [`murmur_core::ApiError`] carrying the
//! status code and raw body verbatim; transport failures and timeouts are
//! treated identically to server errors for retry purposes.
//!
//! Retries are governed by [`murmur_core::RetryConfig`] and are off by
//! default — a failed upload fails the call.

pub mod client;
pub mod types;

pub use client::TranscriptionClient;
pub use types::{ClientConfig, ResponseFormat, TranscribeRequest, TranscriptOutput};
