//! # murmur-settings
//!
//! Configuration management with layered sources for the murmur pipeline.
//!
//! Settings are loaded from three layers (in priority order):
//! 1. **Compiled defaults** — [`Settings::default()`]
//! 2. **User file** — `~/.murmur/settings.json` (deep-merged over defaults)
//! 3. **Environment variables** — `MURMUR_*` overrides (highest priority)
//!
//! Every constant the pipeline depends on — service endpoint, upload size
//! threshold, chunk window/overlap, request timeout, retry policy — lives
//! here so tests and embedders can substitute their own values.

#![deny(unsafe_code)]

pub mod errors;
pub mod loader;
pub mod types;

pub use errors::{Result, SettingsError};
pub use loader::{deep_merge, load_settings, load_settings_from_path, settings_path};
pub use types::*;
