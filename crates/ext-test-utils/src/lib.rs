//! Shared test utilities for the extension-manager workspace.
//!
//! Fixtures are concrete over the simplest useful types — unit host,
//! `String` data, `String` instances — which is what every test suite in
//! the workspace uses.
//!
//! - [`factory`] — scripted factories with invocation logging
//! - [`loader`] — a stub module loader for discovery tests
//! - [`package`] — throwaway package directories with manifests

pub mod factory;
pub mod loader;
pub mod package;

use ext_discovery::Scanner;
use ext_registry::Registry;

/// The registry type shared by the workspace's test suites.
pub type TestRegistry = Registry<(), String, String>;

/// The scanner type matching [`TestRegistry`].
pub type TestScanner = Scanner<(), String, String>;

pub use factory::{CallLog, CallRecord, ScriptedFactory};
pub use loader::StubLoader;
pub use package::PackageDirBuilder;
