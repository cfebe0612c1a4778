//! Settings type definitions.
//!
//! All types use `#[serde(rename_all = "camelCase")]` and implement
//! [`Default`] with production values. Every section is `#[serde(default)]`
//! so partial JSON fills in the rest.

mod bundler;
mod injection;

pub use bundler::*;
pub use injection::*;

use serde::{Deserialize, Serialize};

use crate::errors::Result;

/// Root settings type.
///
/// ```json
/// {
///   "bundler": "webpack",
///   "injection": { "capabilities": ["ensureChunkHandlers"] }
/// }
/// ```
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct SpliceSettings {
    /// Settings schema version.
    pub version: String,
    /// Application name.
    pub name: String,
    /// Which bundler flavor the host emulates.
    pub bundler: BundlerFlavor,
    /// Output location for written reports.
    pub output: OutputSettings,
    /// Runtime injection plugin configuration.
    pub injection: InjectionSettings,
    /// Simulated host behavior.
    pub host: HostSettings,
    /// Logging configuration.
    pub logging: LoggingSettings,
}

impl Default for SpliceSettings {
    fn default() -> Self {
        Self {
            version: "0.1.0".to_string(),
            name: "splice".to_string(),
            bundler: BundlerFlavor::default(),
            output: OutputSettings::default(),
            injection: InjectionSettings::default(),
            host: HostSettings::default(),
            logging: LoggingSettings::default(),
        }
    }
}

impl SpliceSettings {
    /// Check cross-field constraints the type system cannot express.
    pub fn validate(&self) -> Result<()> {
        self.injection.validate()?;
        self.output.validate()
    }
}

/// Logging configuration.
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct LoggingSettings {
    /// Minimum level (`trace`, `debug`, `info`, `warn`, `error`) or an
    /// `EnvFilter` directive.
    pub level: String,
    /// Emit JSON lines instead of compact text.
    pub json: bool,
}

impl Default for LoggingSettings {
    fn default() -> Self {
        Self {
            level: "warn".to_string(),
            json: false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_validate() {
        assert!(SpliceSettings::default().validate().is_ok());
    }

    #[test]
    fn default_json_shape() {
        insta::assert_json_snapshot!(SpliceSettings::default(), @r###"
        {
          "version": "0.1.0",
          "name": "splice",
          "bundler": "rspack",
          "output": {
            "filename": "[name].js"
          },
          "injection": {
            "pluginName": "runtime-injection",
            "moduleName": "chunk loading runtime",
            "stage": "attach",
            "capabilities": [
              "ensureChunkHandlers",
              "hmrDownloadUpdateHandlers"
            ],
            "format": "names"
          },
          "host": {
            "hot": true,
            "strictBundler": false
          },
          "logging": {
            "level": "warn",
            "json": false
          }
        }
        "###);
    }

    #[test]
    fn partial_json_fills_defaults() {
        let settings: SpliceSettings =
            serde_json::from_str(r#"{"host": {"hot": false}}"#).unwrap();
        assert!(!settings.host.hot);
        assert_eq!(settings.logging.level, "warn");
        assert_eq!(settings.injection.capabilities.len(), 2);
    }
}
