use std::path::PathBuf;

/// Errors that can occur while reading package manifests.
///
/// The scanner itself absorbs these (skip and continue); they surface only
/// through the direct [`PackageManifest`](crate::PackageManifest) API.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// Failed to parse manifest TOML.
    #[error("failed to parse extension manifest: {0}")]
    ManifestParse(#[from] toml::de::Error),

    /// Manifest file not found at the expected path.
    #[error("extension manifest not found: {0}")]
    ManifestNotFound(PathBuf),

    /// I/O error reading a manifest.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, Error>;
