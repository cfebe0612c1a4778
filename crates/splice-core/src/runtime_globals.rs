//! Runtime globals: the capability tokens a chunk's generated code may need.
//!
//! Each global has a stable camelCase name (used in configuration, manifests
//! and fragments) and the runtime expression the bundler emits for it.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::errors::CoreError;

macro_rules! runtime_globals {
    ($($(#[$meta:meta])* $variant:ident => $name:literal, $expr:literal;)+) => {
        /// A runtime capability identifier.
        #[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
        #[serde(try_from = "String", into = "&'static str")]
        pub enum RuntimeGlobal {
            $($(#[$meta])* $variant,)+
        }

        impl RuntimeGlobal {
            /// Every known runtime global, in declaration order.
            #[must_use]
            pub fn all() -> &'static [RuntimeGlobal] {
                &[$(Self::$variant,)+]
            }

            /// Stable camelCase name.
            #[must_use]
            pub fn name(self) -> &'static str {
                match self {
                    $(Self::$variant => $name,)+
                }
            }

            /// Runtime expression emitted for this global.
            #[must_use]
            pub fn expression(self) -> &'static str {
                match self {
                    $(Self::$variant => $expr,)+
                }
            }
        }

        impl FromStr for RuntimeGlobal {
            type Err = CoreError;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                match s {
                    $($name => Ok(Self::$variant),)+
                    other => Err(CoreError::UnknownRuntimeGlobal(other.to_string())),
                }
            }
        }
    };
}

runtime_globals! {
    /// The module require function itself.
    Require => "require", "__webpack_require__";
    /// Module factory table.
    ModuleFactories => "moduleFactories", "__webpack_require__.m";
    /// Module instance cache.
    ModuleCache => "moduleCache", "__webpack_require__.c";
    /// Object own-property shorthand.
    HasOwnProperty => "hasOwnProperty", "__webpack_require__.o";
    /// Ensure/load another chunk on demand.
    EnsureChunk => "ensureChunk", "__webpack_require__.e";
    /// Handlers invoked by `ensureChunk`, one per loading strategy.
    EnsureChunkHandlers => "ensureChunkHandlers", "__webpack_require__.f";
    /// `ensureChunk` also loads entry chunks.
    EnsureChunkIncludeEntries => "ensureChunkIncludeEntries", "__webpack_require__.f (include entries)";
    /// Public path prefix for emitted files.
    PublicPath => "publicPath", "__webpack_require__.p";
    /// Script filename for a chunk id.
    GetChunkScriptFilename => "getChunkScriptFilename", "__webpack_require__.u";
    /// Hot-update script filename for a chunk id.
    GetChunkUpdateScriptFilename => "getChunkUpdateScriptFilename", "__webpack_require__.hu";
    /// Hot-update manifest filename.
    GetUpdateManifestFilename => "getUpdateManifestFilename", "__webpack_require__.hmrF";
    /// Script loader.
    LoadScript => "loadScript", "__webpack_require__.l";
    /// Full compilation hash.
    GetFullHash => "getFullHash", "__webpack_require__.h";
    /// Global object.
    Global => "global", "__webpack_require__.g";
    /// Deferred startup until chunks are loaded.
    OnChunksLoaded => "onChunksLoaded", "__webpack_require__.O";
    /// Module execution interceptors.
    InterceptModuleExecution => "interceptModuleExecution", "__webpack_require__.i";
    /// Hot-update manifest download.
    HmrDownloadManifest => "hmrDownloadManifest", "__webpack_require__.hmrM";
    /// Hot-update chunk download handlers.
    HmrDownloadUpdateHandlers => "hmrDownloadUpdateHandlers", "__webpack_require__.hmrC";
    /// Per-module hot data.
    HmrModuleData => "hmrModuleData", "__webpack_require__.hmrD";
    /// Hot-update module invalidation handlers.
    HmrInvalidateModuleHandlers => "hmrInvalidateModuleHandlers", "__webpack_require__.hmrI";
    /// Hot runtime state prefix.
    HmrRuntimeStatePrefix => "hmrRuntimeStatePrefix", "__webpack_require__.hmrS";
}

impl RuntimeGlobal {
    /// Whether this global belongs to the hot-update runtime.
    #[must_use]
    pub fn is_hot_update(self) -> bool {
        matches!(
            self,
            Self::HmrDownloadManifest
                | Self::HmrDownloadUpdateHandlers
                | Self::HmrModuleData
                | Self::HmrInvalidateModuleHandlers
                | Self::HmrRuntimeStatePrefix
                | Self::GetChunkUpdateScriptFilename
                | Self::GetUpdateManifestFilename
        )
    }
}

impl fmt::Display for RuntimeGlobal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl From<RuntimeGlobal> for &'static str {
    fn from(global: RuntimeGlobal) -> Self {
        global.name()
    }
}

impl TryFrom<String> for RuntimeGlobal {
    type Error = CoreError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}
