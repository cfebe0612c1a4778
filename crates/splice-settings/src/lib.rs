//! # splice-settings
//!
//! Configuration management with layered sources.
//!
//! Settings are loaded from three layers (in priority order):
//! 1. **Compiled defaults**: [`SpliceSettings::default()`]
//! 2. **Settings file**: `./splice.json` or `$SPLICE_SETTINGS` (deep-merged over defaults)
//! 3. **Environment variables**: `SPLICE_*` plus the `WEBPACK` / `RSPACK`
//!    bundler flags (highest priority)
//!
//! # Usage
//!
//! ```no_run
//! let settings = splice_settings::load_settings().unwrap_or_default();
//! println!("watching {:?}", settings.injection.capabilities);
//! ```

#![deny(unsafe_code)]

pub mod errors;
pub mod loader;
pub mod types;

pub use errors::{Result, SettingsError};
pub use loader::{
    apply_env_overrides, deep_merge, load_settings, load_settings_from_path,
    load_settings_with_env, require_bundler_env, settings_path,
};
pub use types::*;

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────
