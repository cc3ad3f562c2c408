//! Runtime extension registry.
//!
//! Components declare named extension points, implementations register
//! factories against those points, and consumers resolve live instances at
//! runtime with policies for selecting one, selecting many, falling back
//! across ordered alternatives, and opting extensions in or out of implicit
//! resolution.
//!
//! The crate has three parts:
//!
//! - [`Factory`] — normalization of registered producers (synchronous,
//!   asynchronous, or reserved placeholders) into one async interface
//! - [`Registry`] — the per-point table of registered names and factories
//! - [`Registry::connect_one`] / [`Registry::connect_all`] — the resolution
//!   engine turning a request into zero, one, or many instances
//!
//! Discovery of extensions from installed packages lives in the companion
//! `ext-discovery` crate; this crate only requires that a
//! `(point, name, factory)` triple is supplied to [`Registry::register`] by
//! some means.

pub mod connect;
pub mod error;
pub mod factory;
pub mod registry;

pub use connect::{ConnectOptions, OnError, Resolved, Select};
pub use error::{Error, FactoryError, Result};
pub use factory::{ExtensionFactory, ExtensionInfo, Factory};
pub use registry::Registry;
