use serde::{Deserialize, Serialize};
use splice_core::{FragmentFormat, RuntimeGlobal, RuntimeModuleStage};

use crate::errors::{Result, SettingsError};

/// Runtime injection plugin configuration.
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct InjectionSettings {
    /// Name the plugin registers its hook handlers under.
    pub plugin_name: String,
    /// Name given to every injected runtime fragment.
    pub module_name: String,
    /// Stage of the injected fragment.
    pub stage: RuntimeModuleStage,
    /// Runtime globals whose presence in a chunk triggers injection.
    pub capabilities: Vec<RuntimeGlobal>,
    /// How requirements are rendered inside the fragment.
    pub format: FragmentFormat,
}

impl Default for InjectionSettings {
    fn default() -> Self {
        Self {
            plugin_name: "runtime-injection".to_string(),
            module_name: "chunk loading runtime".to_string(),
            stage: RuntimeModuleStage::Attach,
            capabilities: vec![
                RuntimeGlobal::EnsureChunkHandlers,
                RuntimeGlobal::HmrDownloadUpdateHandlers,
            ],
            format: FragmentFormat::Names,
        }
    }
}

impl InjectionSettings {
    pub(crate) fn validate(&self) -> Result<()> {
        if self.capabilities.is_empty() {
            return Err(SettingsError::InvalidValue(
                "injection.capabilities must not be empty".to_string(),
            ));
        }
        if self.plugin_name.trim().is_empty() {
            return Err(SettingsError::InvalidValue(
                "injection.pluginName must not be blank".to_string(),
            ));
        }
        Ok(())
    }
}

/// Simulated host behavior.
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct HostSettings {
    /// Wire hot-update requirements into chunks, as the hot module
    /// replacement plugin does.
    pub hot: bool,
    /// Require the environment to name the bundler (`SPLICE_BUNDLER`,
    /// `WEBPACK` or `RSPACK`). Loading fails with
    /// [`SettingsError::UnknownBundler`] otherwise.
    pub strict_bundler: bool,
}

impl Default for HostSettings {
    fn default() -> Self {
        Self {
            hot: true,
            strict_bundler: false,
        }
    }
}
