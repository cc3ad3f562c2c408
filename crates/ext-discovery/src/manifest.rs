//! Package manifest parsing for `extensions.toml` files.
//!
//! A package declares the extensions it provides in an `[extensions]`
//! section mapping extension-point name → { extension name → descriptor }.
//! A descriptor is either a bare module identifier or a table with the
//! module, an optional named export within it, and an optional `auto` flag.
//!
//! # Example TOML
//!
//! ```toml
//! [extensions."cloud.provider"]
//! aws = { module = "aws_provider", export = "create", auto = false }
//! local = "local_provider"
//!
//! [extensions."cloud.dns"]
//! route53 = { module = "aws_provider", export = "create_dns" }
//! ```

use std::collections::BTreeMap;
use std::path::Path;

use serde::Deserialize;

use crate::error::{Error, Result};
use crate::loader::ModuleSpec;

/// Extension declarations loaded from a package's `extensions.toml`.
///
/// Entries within a point are registered in sorted name order; packages
/// needing a specific fallback order should rely on explicit alternatives
/// at connect time rather than registration order across packages.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct PackageManifest {
    /// Extension point name → { extension name → descriptor }.
    #[serde(default)]
    pub extensions: BTreeMap<String, BTreeMap<String, ExtensionDescriptor>>,
}

/// One declared extension implementation.
#[derive(Debug, Clone, Deserialize, PartialEq, Eq)]
#[serde(untagged)]
pub enum ExtensionDescriptor {
    /// Bare module identifier.
    Module(String),
    /// Full descriptor table.
    Detailed {
        /// Module identifier; when absent the package itself is the module.
        #[serde(default)]
        module: Option<String>,
        /// Named export within the module providing the factory.
        #[serde(default)]
        export: Option<String>,
        /// Auto-enablement flag recorded at registration. Defaults to true.
        #[serde(default)]
        auto: Option<bool>,
    },
}

impl ExtensionDescriptor {
    /// The module/export pair handed to the loader.
    pub fn spec(&self) -> ModuleSpec {
        match self {
            ExtensionDescriptor::Module(module) => ModuleSpec {
                module: Some(module.clone()),
                export: None,
            },
            ExtensionDescriptor::Detailed { module, export, .. } => ModuleSpec {
                module: module.clone(),
                export: export.clone(),
            },
        }
    }

    /// Whether the extension participates in implicit resolution.
    pub fn auto(&self) -> bool {
        match self {
            ExtensionDescriptor::Module(_) => true,
            ExtensionDescriptor::Detailed { auto, .. } => auto.unwrap_or(true),
        }
    }
}

impl PackageManifest {
    /// Parse a manifest from a TOML string.
    pub fn from_toml(content: &str) -> Result<Self> {
        Ok(toml::from_str(content)?)
    }

    /// Read and parse a manifest from a file path.
    pub fn from_path(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Err(Error::ManifestNotFound(path.to_path_buf()));
        }
        let content = std::fs::read_to_string(path)?;
        Self::from_toml(&content)
    }

    /// Whether the manifest declares no extensions at all.
    pub fn is_empty(&self) -> bool {
        self.extensions.values().all(BTreeMap::is_empty)
    }
}
