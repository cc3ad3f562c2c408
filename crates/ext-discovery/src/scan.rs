//! Directory scanning for packages that declare extensions.

use std::path::Path;
use std::sync::Arc;

use ext_registry::{Factory, Registry};

use crate::MANIFEST_FILENAME;
use crate::loader::{ExtensionLoader, LazyFactory};
use crate::manifest::PackageManifest;

/// Scans package directories and registers their declared extensions.
///
/// Every registration is a [`LazyFactory`]: nothing is loaded until the
/// extension is first connected. Malformed or unreadable sources are
/// skipped without aborting the scan — discovery is best-effort by design.
pub struct Scanner<H, D, I> {
    loader: Arc<dyn ExtensionLoader<H, D, I>>,
    manifest_name: String,
}

impl<H, D, I> Scanner<H, D, I>
where
    H: Send + Sync + 'static,
    D: Send + Sync + 'static,
    I: Send + 'static,
{
    pub fn new(loader: Arc<dyn ExtensionLoader<H, D, I>>) -> Self {
        Self {
            loader,
            manifest_name: MANIFEST_FILENAME.to_string(),
        }
    }

    /// Look for a differently named manifest file.
    pub fn with_manifest_name(mut self, name: impl Into<String>) -> Self {
        self.manifest_name = name.into();
        self
    }

    /// Register the extensions declared by a single package directory.
    ///
    /// A missing or malformed manifest leaves the registry untouched.
    pub fn load_package(&self, dir: &Path, registry: &mut Registry<H, D, I>) {
        let path = dir.join(&self.manifest_name);
        let manifest = match PackageManifest::from_path(&path) {
            Ok(manifest) => manifest,
            Err(err) => {
                tracing::debug!(
                    package = %dir.display(),
                    error = %err,
                    "skipping package without usable manifest"
                );
                return;
            }
        };

        for (point, entries) in &manifest.extensions {
            for (name, descriptor) in entries {
                let factory = Factory::from_async(LazyFactory::new(
                    Arc::clone(&self.loader),
                    dir,
                    descriptor.spec(),
                ))
                .with_auto(descriptor.auto());
                registry.register_unchecked(point.clone(), name.clone(), factory);
            }
        }
    }

    /// Scan the immediate subdirectories of each root as packages.
    ///
    /// Subdirectories are visited in name order so registration order is
    /// deterministic. Unreadable roots are skipped.
    pub fn scan_dirs(
        &self,
        roots: impl IntoIterator<Item = impl AsRef<Path>>,
        registry: &mut Registry<H, D, I>,
    ) {
        for root in roots {
            let root = root.as_ref();
            let entries = match std::fs::read_dir(root) {
                Ok(entries) => entries,
                Err(err) => {
                    tracing::debug!(root = %root.display(), error = %err, "skipping unreadable scan root");
                    continue;
                }
            };
            let mut packages: Vec<_> = entries
                .flatten()
                .map(|entry| entry.path())
                .filter(|path| path.is_dir())
                .collect();
            packages.sort();
            for package in packages {
                self.load_package(&package, registry);
            }
        }
    }
}
