//! Lazily-resolving factories backed by a host-supplied module loader.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use async_trait::async_trait;
use ext_registry::{ExtensionFactory, ExtensionInfo, Factory, FactoryError};
use tokio::sync::OnceCell;

/// What a descriptor asks the loader to resolve.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ModuleSpec {
    /// Module identifier, relative to the package directory; `None` means
    /// the package itself is the module.
    pub module: Option<String>,
    /// Named export within the module providing the factory.
    pub export: Option<String>,
}

/// Resolves a module descriptor into a live factory.
///
/// How implementation code is located and loaded is environment-specific
/// (dynamic libraries, embedded interpreters, statically linked catalogs);
/// the host application supplies an implementation of this trait and the
/// discovery layer never looks behind it.
pub trait ExtensionLoader<H, D, I>: Send + Sync {
    /// Resolve `spec` against a package directory.
    ///
    /// An `Err` here is terminal for the registration: the lazy factory
    /// degrades it to a permanent no-op and the error is never surfaced to
    /// the registry or its consumers.
    fn load(
        &self,
        package_dir: &Path,
        spec: &ModuleSpec,
    ) -> std::result::Result<Factory<H, D, I>, FactoryError>;
}

/// A factory that resolves its implementation on first invocation.
///
/// The loader runs at most once per registration; the outcome — the loaded
/// factory, or a reserved no-op if loading failed — is cached for every
/// subsequent invocation. This keeps never-connected extensions free and
/// makes unavailable implementations indistinguishable from ones that
/// declined to produce an instance.
pub struct LazyFactory<H, D, I> {
    loader: Arc<dyn ExtensionLoader<H, D, I>>,
    package_dir: PathBuf,
    spec: ModuleSpec,
    resolved: OnceCell<Factory<H, D, I>>,
}

impl<H, D, I> LazyFactory<H, D, I>
where
    H: Send + Sync + 'static,
    D: Send + Sync + 'static,
    I: Send + 'static,
{
    pub fn new(
        loader: Arc<dyn ExtensionLoader<H, D, I>>,
        package_dir: impl Into<PathBuf>,
        spec: ModuleSpec,
    ) -> Self {
        Self {
            loader,
            package_dir: package_dir.into(),
            spec,
            resolved: OnceCell::new(),
        }
    }

    async fn resolve(&self) -> &Factory<H, D, I> {
        self.resolved
            .get_or_init(|| async {
                match self.loader.load(&self.package_dir, &self.spec) {
                    Ok(factory) => factory,
                    Err(err) => {
                        tracing::debug!(
                            package = %self.package_dir.display(),
                            module = ?self.spec.module,
                            error = %err,
                            "extension module failed to load"
                        );
                        Factory::reserved()
                    }
                }
            })
            .await
    }
}

#[async_trait]
impl<H, D, I> ExtensionFactory<H, D, I> for LazyFactory<H, D, I>
where
    H: Send + Sync + 'static,
    D: Send + Sync + 'static,
    I: Send + 'static,
{
    async fn create(
        &self,
        data: Option<&D>,
        host: &H,
        info: &ExtensionInfo,
    ) -> std::result::Result<Option<I>, FactoryError> {
        self.resolve().await.create(data, host, info).await
    }
}
