//! Settings loading with deep merge and environment variable overrides.
//!
//! Loading flow:
//! 1. Start with compiled [`SpliceSettings::default()`]
//! 2. If the settings file exists, deep-merge its values over the defaults
//! 3. Apply environment variable overrides (highest priority)
//! 4. With `host.strictBundler`, require the environment to name the bundler
//! 5. Validate
//!
//! Deep merge rules:
//! - Objects are merged recursively (source overrides target per-key)
//! - Arrays and primitives are replaced entirely by source
//! - Null values in source are skipped (preserving target)

use std::path::{Path, PathBuf};

use serde_json::Value;
use splice_core::FragmentFormat;
use tracing::{debug, warn};

use crate::errors::Result;
use crate::types::{BundlerFlavor, SpliceSettings};

/// Default settings file name, resolved against the working directory.
pub const SETTINGS_FILE: &str = "splice.json";

/// Resolve the settings file path: `SPLICE_SETTINGS` if set, else `./splice.json`.
pub fn settings_path() -> PathBuf {
    read_env_string("SPLICE_SETTINGS").map_or_else(|| PathBuf::from(SETTINGS_FILE), PathBuf::from)
}

/// Load settings from the default path with env var overrides.
pub fn load_settings() -> Result<SpliceSettings> {
    load_settings_from_path(&settings_path())
}

/// Load settings from a specific path with env var overrides.
///
/// A missing file yields defaults. Invalid JSON or a failed validation is
/// an error.
pub fn load_settings_from_path(path: &Path) -> Result<SpliceSettings> {
    load_settings_with_env(path, |name| std::env::var(name).ok())
}

/// Load settings from `path`, reading overrides through `env` instead of the
/// process environment.
pub fn load_settings_with_env<F>(path: &Path, env: F) -> Result<SpliceSettings>
where
    F: Fn(&str) -> Option<String>,
{
    let defaults = serde_json::to_value(SpliceSettings::default())?;

    let merged = if path.exists() {
        debug!(?path, "loading settings from file");
        let content = std::fs::read_to_string(path)?;
        let user: Value = serde_json::from_str(&content)?;
        deep_merge(defaults, user)
    } else {
        debug!(?path, "settings file not found, using defaults");
        defaults
    };

    let mut settings: SpliceSettings = serde_json::from_value(merged)?;
    apply_env_overrides(&mut settings, &env);
    if settings.host.strict_bundler {
        settings.bundler = require_bundler_env(&env)?;
    }
    settings.validate()?;
    Ok(settings)
}

/// Bundler named by the environment, with no fallback.
///
/// `SPLICE_BUNDLER` wins; otherwise the `WEBPACK` / `RSPACK` flags decide.
/// Nothing set (or an unparsable `SPLICE_BUNDLER` with no flags) is
/// [`SettingsError::UnknownBundler`](crate::SettingsError::UnknownBundler).
pub fn require_bundler_env<F>(env: F) -> Result<BundlerFlavor>
where
    F: Fn(&str) -> Option<String>,
{
    let read = |name: &str| env(name).filter(|v| !v.is_empty());
    if let Some(flavor) = read("SPLICE_BUNDLER").and_then(|v| v.parse::<BundlerFlavor>().ok()) {
        return Ok(flavor);
    }
    BundlerFlavor::from_env_flags(read("WEBPACK").as_deref(), read("RSPACK").as_deref())
}

/// Recursive deep merge of two JSON values.
pub fn deep_merge(target: Value, source: Value) -> Value {
    match (target, source) {
        (Value::Object(mut target_map), Value::Object(source_map)) => {
            for (key, source_val) in source_map {
                if source_val.is_null() {
                    continue;
                }
                let merged = if let Some(target_val) = target_map.remove(&key) {
                    deep_merge(target_val, source_val)
                } else {
                    source_val
                };
                let _ = target_map.insert(key, merged);
            }
            Value::Object(target_map)
        }
        (_, source) => source,
    }
}

/// Apply environment overrides read through `env`.
///
/// Invalid values are logged and ignored (fall back to file/default).
/// `SPLICE_BUNDLER` takes precedence over the `WEBPACK` / `RSPACK` flags.
pub fn apply_env_overrides<F>(settings: &mut SpliceSettings, env: F)
where
    F: Fn(&str) -> Option<String>,
{
    let read = |name: &str| env(name).filter(|v| !v.is_empty());

    // ── Bundler ─────────────────────────────────────────────────────
    if let Some(v) = read("SPLICE_BUNDLER") {
        match v.parse::<BundlerFlavor>() {
            Ok(flavor) => settings.bundler = flavor,
            Err(_) => warn!(key = "SPLICE_BUNDLER", value = %v, "invalid bundler env var, ignoring"),
        }
    } else if let Ok(flavor) =
        BundlerFlavor::from_env_flags(read("WEBPACK").as_deref(), read("RSPACK").as_deref())
    {
        settings.bundler = flavor;
    }

    // ── Output ──────────────────────────────────────────────────────
    if let Some(v) = read("SPLICE_OUTPUT_PATH") {
        settings.output.path = Some(v);
    }

    // ── Injection ───────────────────────────────────────────────────
    if let Some(v) = read("SPLICE_FRAGMENT_FORMAT") {
        match v.parse::<FragmentFormat>() {
            Ok(format) => settings.injection.format = format,
            Err(_) => warn!(key = "SPLICE_FRAGMENT_FORMAT", value = %v, "invalid format env var, ignoring"),
        }
    }

    // ── Host ────────────────────────────────────────────────────────
    if let Some(v) = read("SPLICE_HOT") {
        match parse_bool(&v) {
            Some(hot) => settings.host.hot = hot,
            None => warn!(key = "SPLICE_HOT", value = %v, "invalid boolean env var, ignoring"),
        }
    }
    if let Some(v) = read("SPLICE_STRICT_BUNDLER") {
        match parse_bool(&v) {
            Some(strict) => settings.host.strict_bundler = strict,
            None => warn!(key = "SPLICE_STRICT_BUNDLER", value = %v, "invalid boolean env var, ignoring"),
        }
    }

    // ── Logging ─────────────────────────────────────────────────────
    if let Some(v) = read("SPLICE_LOG_LEVEL") {
        settings.logging.level = v;
    }
    if let Some(v) = read("SPLICE_LOG_JSON") {
        match parse_bool(&v) {
            Some(json) => settings.logging.json = json,
            None => warn!(key = "SPLICE_LOG_JSON", value = %v, "invalid boolean env var, ignoring"),
        }
    }
}

/// Parse a string as a boolean.
///
/// Accepts (case-insensitive): `true`/`1`/`yes`/`on` or `false`/`0`/`no`/`off`.
pub fn parse_bool(val: &str) -> Option<bool> {
    match val.to_lowercase().as_str() {
        "true" | "1" | "yes" | "on" => Some(true),
        "false" | "0" | "no" | "off" => Some(false),
        _ => None,
    }
}

fn read_env_string(name: &str) -> Option<String> {
    std::env::var(name).ok().filter(|v| !v.is_empty())
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────
