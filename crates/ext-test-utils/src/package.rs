//! Throwaway package directories for discovery tests.

use std::fs;
use std::path::{Path, PathBuf};

use ext_discovery::MANIFEST_FILENAME;
use tempfile::TempDir;

/// Builds a temporary tree of package directories with extension manifests.
///
/// The tree lives until the builder is dropped.
pub struct PackageDirBuilder {
    root: TempDir,
}

impl PackageDirBuilder {
    pub fn new() -> Self {
        Self {
            root: TempDir::new().expect("create temp package root"),
        }
    }

    /// The scan root containing all built packages.
    pub fn root(&self) -> &Path {
        self.root.path()
    }

    /// Create a package directory with the given `extensions.toml` content.
    pub fn package(&self, name: &str, manifest_toml: &str) -> PathBuf {
        let dir = self.root.path().join(name);
        fs::create_dir_all(&dir).expect("create package dir");
        fs::write(dir.join(MANIFEST_FILENAME), manifest_toml).expect("write manifest");
        dir
    }

    /// Create a package directory without any manifest.
    pub fn package_without_manifest(&self, name: &str) -> PathBuf {
        let dir = self.root.path().join(name);
        fs::create_dir_all(&dir).expect("create package dir");
        dir
    }
}

impl Default for PackageDirBuilder {
    fn default() -> Self {
        Self::new()
    }
}
