/// Arbitrary error reported by an extension factory.
///
/// Factories soft-fail by returning one of these from
/// [`ExtensionFactory::create`](crate::ExtensionFactory::create); the
/// resolution engine routes it to the caller's `on_error` hook and drops the
/// candidate without failing the overall connect call.
pub type FactoryError = Box<dyn std::error::Error + Send + Sync>;

/// Errors surfaced by the registry itself.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// `register` was given a non-callable (reserved) factory.
    ///
    /// Reserved placeholders are only accepted through
    /// [`Registry::register_unchecked`](crate::Registry::register_unchecked),
    /// the surface meant for collaborator-supplied pre-wrapped factories.
    #[error("extension factory is not callable")]
    InvalidFactory,

    /// A required connect call produced an empty result.
    ///
    /// Produced, never panicked: the empty result is implied by the error,
    /// so callers still know exactly what was (not) resolved.
    #[error("Extension not found for {point}")]
    ExtensionNotFound {
        /// The extension point that resolved to nothing.
        point: String,
    },
}

pub type Result<T> = std::result::Result<T, Error>;
