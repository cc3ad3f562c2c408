//! Factory normalization.
//!
//! Registered producers come in three shapes: a synchronous function that
//! returns its instance directly, an already-asynchronous producer that
//! reports `(error, instance)` through its completion, and a non-callable
//! placeholder that exists only to reserve a name. All three are normalized
//! once, at registration time, into the single [`ExtensionFactory`]
//! interface stored in the registry; the constructor chosen on [`Factory`]
//! fixes the calling convention for the registration up front.

use std::fmt;
use std::sync::Arc;

use async_trait::async_trait;

use crate::error::FactoryError;

/// Identifies the registration a factory invocation is serving.
///
/// Passed to every factory call and to the `on_error` hook.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExtensionInfo {
    /// Name of the extension point being resolved.
    pub extension: String,
    /// Name the factory was registered under.
    pub name: String,
}

/// An asynchronous producer of extension instances.
///
/// `Ok(Some(instance))` is a successful creation. `Ok(None)` means the
/// factory declined to produce an instance without that being an error
/// (for example, the implementation does not support the current
/// environment). `Err` is a reported per-candidate failure: the resolution
/// engine absorbs it, optionally forwarding it to the caller's `on_error`
/// hook, and the candidate is treated as absent.
///
/// A panic from `create` is *not* a reported failure. It unwinds through
/// the whole connect call, deliberately distinguished from the soft path
/// above: only factories that explicitly report an error get soft-failure
/// treatment.
#[async_trait]
pub trait ExtensionFactory<H, D, I>: Send + Sync {
    /// Create an instance for one candidate.
    ///
    /// `data` is the opaque payload from the connect options, passed
    /// unmodified to every factory in a given call; `host` is the consumer
    /// of the extension point.
    async fn create(
        &self,
        data: Option<&D>,
        host: &H,
        info: &ExtensionInfo,
    ) -> std::result::Result<Option<I>, FactoryError>;
}

/// Adapter for synchronous producers. Panics are left to unwind.
struct SyncFn<F>(F);

#[async_trait]
impl<H, D, I, F> ExtensionFactory<H, D, I> for SyncFn<F>
where
    H: Send + Sync + 'static,
    D: Send + Sync + 'static,
    I: Send + 'static,
    F: Fn(Option<&D>, &H, &ExtensionInfo) -> Option<I> + Send + Sync + 'static,
{
    async fn create(
        &self,
        data: Option<&D>,
        host: &H,
        info: &ExtensionInfo,
    ) -> std::result::Result<Option<I>, FactoryError> {
        Ok((self.0)(data, host, info))
    }
}

/// Placeholder for a registration that reserves a name without providing an
/// implementation. Always completes with no instance and no error.
struct Reserved;

#[async_trait]
impl<H, D, I> ExtensionFactory<H, D, I> for Reserved
where
    H: Send + Sync + 'static,
    D: Send + Sync + 'static,
    I: Send + 'static,
{
    async fn create(
        &self,
        _data: Option<&D>,
        _host: &H,
        _info: &ExtensionInfo,
    ) -> std::result::Result<Option<I>, FactoryError> {
        Ok(None)
    }
}

/// A normalized factory as stored in the registry.
///
/// Carries the producer itself plus two per-registration flags: `auto`
/// (whether the extension participates in implicit "all names" resolution,
/// default `true`) and whether the registration is callable at all
/// (`false` only for [`Factory::reserved`] placeholders).
pub struct Factory<H, D, I> {
    inner: Arc<dyn ExtensionFactory<H, D, I>>,
    auto: bool,
    callable: bool,
}

impl<H, D, I> Factory<H, D, I>
where
    H: Send + Sync + 'static,
    D: Send + Sync + 'static,
    I: Send + 'static,
{
    /// Normalize a synchronous producer.
    ///
    /// The function is invoked inline with `(data, host, info)`; its return
    /// value is the instance and it has no way to report a soft error. A
    /// panic unwinds through the connect call.
    pub fn from_fn<F>(f: F) -> Self
    where
        F: Fn(Option<&D>, &H, &ExtensionInfo) -> Option<I> + Send + Sync + 'static,
    {
        Self {
            inner: Arc::new(SyncFn(f)),
            auto: true,
            callable: true,
        }
    }

    /// Use an already-asynchronous producer unchanged.
    pub fn from_async<F>(factory: F) -> Self
    where
        F: ExtensionFactory<H, D, I> + 'static,
    {
        Self {
            inner: Arc::new(factory),
            auto: true,
            callable: true,
        }
    }

    /// A non-callable placeholder: completes with no instance, no error.
    ///
    /// Rejected by [`Registry::register`](crate::Registry::register); reaches
    /// a registry only through
    /// [`register_unchecked`](crate::Registry::register_unchecked).
    pub fn reserved() -> Self {
        Self {
            inner: Arc::new(Reserved),
            auto: true,
            callable: false,
        }
    }

    /// Invoke the normalized producer.
    pub async fn create(
        &self,
        data: Option<&D>,
        host: &H,
        info: &ExtensionInfo,
    ) -> std::result::Result<Option<I>, FactoryError> {
        self.inner.create(data, host, info).await
    }
}

// Flag accessors stay free of the producer bounds so the registry can use
// them for any type parameters.
impl<H, D, I> Factory<H, D, I> {
    /// Set the auto-enablement flag recorded for this registration.
    ///
    /// A factory with `auto = false` is invisible to implicit "all names"
    /// resolution but reachable when explicitly named.
    pub fn with_auto(mut self, auto: bool) -> Self {
        self.auto = auto;
        self
    }

    /// Whether this registration participates in implicit resolution.
    pub fn auto(&self) -> bool {
        self.auto
    }

    /// Whether this registration carries a real producer.
    pub fn is_callable(&self) -> bool {
        self.callable
    }
}

impl<H, D, I> Clone for Factory<H, D, I> {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
            auto: self.auto,
            callable: self.callable,
        }
    }
}

impl<H, D, I> fmt::Debug for Factory<H, D, I> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Factory")
            .field("auto", &self.auto)
            .field("callable", &self.callable)
            .finish_non_exhaustive()
    }
}
