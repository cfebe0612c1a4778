use std::fmt;
use std::path::PathBuf;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::errors::{Result, SettingsError};

/// Bundler the host emulates.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BundlerFlavor {
    /// webpack.
    Webpack,
    /// rspack.
    #[default]
    Rspack,
}

impl BundlerFlavor {
    /// Detect the flavor from the `WEBPACK` / `RSPACK` flag values.
    ///
    /// A flag counts as set when present and non-empty. `RSPACK` wins when
    /// both are set. Neither set is [`SettingsError::UnknownBundler`].
    pub fn from_env_flags(webpack: Option<&str>, rspack: Option<&str>) -> Result<Self> {
        let is_set = |flag: Option<&str>| flag.is_some_and(|v| !v.is_empty());
        if is_set(rspack) {
            Ok(Self::Rspack)
        } else if is_set(webpack) {
            Ok(Self::Webpack)
        } else {
            Err(SettingsError::UnknownBundler)
        }
    }

    /// Default output directory name for this flavor.
    #[must_use]
    pub fn dist_dir(self) -> &'static str {
        match self {
            Self::Webpack => "webpack-dist",
            Self::Rspack => "rspack-dist",
        }
    }
}

impl fmt::Display for BundlerFlavor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Webpack => write!(f, "webpack"),
            Self::Rspack => write!(f, "rspack"),
        }
    }
}

impl FromStr for BundlerFlavor {
    type Err = SettingsError;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_lowercase().as_str() {
            "webpack" => Ok(Self::Webpack),
            "rspack" => Ok(Self::Rspack),
            _ => Err(SettingsError::InvalidValue(format!("unknown bundler flavor: {s}"))),
        }
    }
}

/// Where reports are written.
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct OutputSettings {
    /// Output directory. Defaults to the flavor's dist directory.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub path: Option<String>,
    /// Per-chunk filename template; `[name]` is replaced by the chunk name.
    pub filename: String,
}

impl Default for OutputSettings {
    fn default() -> Self {
        Self {
            path: None,
            filename: "[name].js".to_string(),
        }
    }
}

impl OutputSettings {
    /// Output directory for `flavor`.
    #[must_use]
    pub fn resolve_path(&self, flavor: BundlerFlavor) -> PathBuf {
        self.path
            .as_ref()
            .map_or_else(|| PathBuf::from(flavor.dist_dir()), PathBuf::from)
    }

    /// Render the filename template for one chunk.
    #[must_use]
    pub fn render_filename(&self, chunk_name: &str) -> String {
        self.filename.replace("[name]", chunk_name)
    }

    pub(crate) fn validate(&self) -> Result<()> {
        if !self.filename.contains("[name]") {
            return Err(SettingsError::InvalidValue(format!(
                "output.filename must contain [name]: {}",
                self.filename
            )));
        }
        Ok(())
    }
}
