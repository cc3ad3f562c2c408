//! Discovery of extensions from installed packages.
//!
//! This crate is the discovery collaborator of `ext-registry`: it scans
//! package directories for declarative [`PackageManifest`]s and registers a
//! lazily-resolving factory per declared extension. Actual loading of
//! implementation code is environment-specific and stays behind the
//! [`ExtensionLoader`] trait supplied by the host application.
//!
//! Malformed or unreadable sources are skipped silently (debug-logged)
//! without aborting the scan of other sources, and a loading failure
//! degrades to "no instance" rather than propagating — the registry never
//! learns why a named implementation was unavailable. Both are deliberate
//! degradation paths, not oversights.

pub mod error;
pub mod loader;
pub mod manifest;
pub mod scan;

/// The canonical filename for package extension manifests.
///
/// A package that provides extensions places a file with this name at its
/// root so the scanner can discover and register them.
pub const MANIFEST_FILENAME: &str = "extensions.toml";

pub use error::{Error, Result};
pub use loader::{ExtensionLoader, LazyFactory, ModuleSpec};
pub use manifest::{ExtensionDescriptor, PackageManifest};
pub use scan::Scanner;
