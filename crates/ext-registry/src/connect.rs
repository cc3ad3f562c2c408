//! The resolution engine: turning a connect request into instances.
//!
//! Each connect call is a self-contained one-shot pipeline: select the
//! candidate names, instantiate them under the requested cardinality policy,
//! drop absent candidates, and deliver the aggregate. Nothing persists
//! across calls and created instances are not cached or managed afterwards.

use std::fmt;

use futures::future::join_all;

use crate::error::{Error, FactoryError, Result};
use crate::factory::ExtensionInfo;
use crate::registry::{PointTable, Registry};

/// One successfully created extension.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Resolved<I> {
    /// The created instance. Never absent in a resolved entry; candidates
    /// that produce nothing are dropped before aggregation.
    pub instance: I,
    /// The name the winning registration was made under.
    pub name: String,
}

/// Candidate selection for a connect call.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum Select {
    /// All names registered against the point, in registration order.
    #[default]
    Auto,
    /// Exactly one explicitly named candidate.
    Name(String),
    /// An ordered list of explicitly named alternatives, used verbatim —
    /// names that were never registered silently yield no instance.
    Alternatives(Vec<String>),
}

impl From<&str> for Select {
    fn from(name: &str) -> Self {
        Select::Name(name.to_string())
    }
}

impl From<String> for Select {
    fn from(name: String) -> Self {
        Select::Name(name)
    }
}

impl From<Vec<String>> for Select {
    fn from(names: Vec<String>) -> Self {
        Select::Alternatives(names)
    }
}

/// Hook observing per-candidate failures.
///
/// Invoked once per candidate whose factory reports an error. The error may
/// indicate the extension does not support the current environment, not a
/// failure of the connecting process; it never appears in the connect
/// result. A panic raised by the hook itself is not caught and unwinds
/// through the whole connect call.
pub type OnError = Box<dyn Fn(&FactoryError, &ExtensionInfo) + Send + Sync>;

/// Options for a connect call.
pub struct ConnectOptions<D> {
    data: Option<D>,
    select: Select,
    required: bool,
    on_error: Option<OnError>,
}

impl<D> ConnectOptions<D> {
    pub fn new() -> Self {
        Self {
            data: None,
            select: Select::Auto,
            required: false,
            on_error: None,
        }
    }

    /// Opaque payload handed unmodified to every invoked factory.
    pub fn data(mut self, data: D) -> Self {
        self.data = Some(data);
        self
    }

    /// Explicitly select one named candidate.
    pub fn name(mut self, name: impl Into<String>) -> Self {
        self.select = Select::Name(name.into());
        self
    }

    /// Explicitly select an ordered list of alternatives.
    pub fn alternatives<S: Into<String>>(mut self, names: impl IntoIterator<Item = S>) -> Self {
        self.select = Select::Alternatives(names.into_iter().map(Into::into).collect());
        self
    }

    /// Set the candidate selection directly.
    pub fn select(mut self, select: impl Into<Select>) -> Self {
        self.select = select.into();
        self
    }

    /// Treat an empty result as [`Error::ExtensionNotFound`].
    pub fn required(mut self) -> Self {
        self.required = true;
        self
    }

    /// Observe per-candidate failures. See [`OnError`].
    pub fn on_error(mut self, hook: impl Fn(&FactoryError, &ExtensionInfo) + Send + Sync + 'static) -> Self {
        self.on_error = Some(Box::new(hook));
        self
    }
}

impl<D> Default for ConnectOptions<D> {
    fn default() -> Self {
        Self::new()
    }
}

impl<D: fmt::Debug> fmt::Debug for ConnectOptions<D> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ConnectOptions")
            .field("data", &self.data)
            .field("select", &self.select)
            .field("required", &self.required)
            .field("on_error", &self.on_error.is_some())
            .finish()
    }
}

impl<H, D, I> Registry<H, D, I>
where
    H: Send + Sync + 'static,
    D: Send + Sync + 'static,
    I: Send + 'static,
{
    /// Resolve the first candidate that produces an instance.
    ///
    /// Candidates are tried strictly in order — registration order, or the
    /// explicit order from the options — and candidate N+1 is not invoked
    /// until candidate N has fully completed without producing an instance.
    /// This is the alternatives/fallback policy: callers list preferred
    /// implementations first. Candidates after the first success are never
    /// invoked.
    ///
    /// `Ok(None)` means no candidate produced an instance; with
    /// [`ConnectOptions::required`] that becomes
    /// [`Error::ExtensionNotFound`] instead.
    pub async fn connect_one(
        &self,
        host: &H,
        point: &str,
        options: ConnectOptions<D>,
    ) -> Result<Option<Resolved<I>>> {
        let mut found = None;
        if let Some((table, names, explicit)) = self.candidates(point, &options.select) {
            for name in names {
                if let Some(resolved) = self
                    .instantiate_one(table, point, name, explicit, host, &options)
                    .await
                {
                    found = Some(resolved);
                    break;
                }
            }
        }
        match found {
            None if options.required => Err(Error::ExtensionNotFound {
                point: point.to_string(),
            }),
            other => Ok(other),
        }
    }

    /// Resolve every candidate that produces an instance.
    ///
    /// All candidates are instantiated concurrently; completion order is
    /// unspecified, but the returned list always matches candidate order
    /// (registration order, or the explicit order from the options).
    /// Candidates that produce no instance are dropped.
    ///
    /// With [`ConnectOptions::required`], an empty result becomes
    /// [`Error::ExtensionNotFound`].
    pub async fn connect_all(
        &self,
        host: &H,
        point: &str,
        options: ConnectOptions<D>,
    ) -> Result<Vec<Resolved<I>>> {
        let mut resolved = Vec::new();
        if let Some((table, names, explicit)) = self.candidates(point, &options.select) {
            let creations = names
                .into_iter()
                .map(|name| self.instantiate_one(table, point, name, explicit, host, &options));
            resolved = join_all(creations).await.into_iter().flatten().collect();
        }
        if resolved.is_empty() && options.required {
            return Err(Error::ExtensionNotFound {
                point: point.to_string(),
            });
        }
        Ok(resolved)
    }

    /// Compute the candidate name list for a connect call.
    ///
    /// `None` when the extension point has no registrations at all — in that
    /// case nothing is instantiated even under explicit selection, matching
    /// the empty-result path.
    fn candidates<'a>(
        &'a self,
        point: &str,
        select: &'a Select,
    ) -> Option<(&'a PointTable<H, D, I>, Vec<&'a str>, bool)> {
        let table = self.point(point)?;
        let (names, explicit) = match select {
            Select::Auto => (table.order.iter().map(String::as_str).collect(), false),
            Select::Name(name) => (vec![name.as_str()], true),
            Select::Alternatives(names) => (names.iter().map(String::as_str).collect(), true),
        };
        Some((table, names, explicit))
    }

    /// Instantiate a single candidate, absorbing reported failures.
    ///
    /// A candidate resolves to `None` without its factory being invoked when
    /// the name was never registered, or when the factory was registered
    /// with `auto = false` and was not explicitly named. A factory that
    /// reports an error is routed to the `on_error` hook and also resolves
    /// to `None`; its instance is treated as absent regardless of what it
    /// produced.
    async fn instantiate_one(
        &self,
        table: &PointTable<H, D, I>,
        point: &str,
        name: &str,
        explicit: bool,
        host: &H,
        options: &ConnectOptions<D>,
    ) -> Option<Resolved<I>> {
        let factory = table.factories.get(name)?;
        if !explicit && !factory.auto() {
            return None;
        }
        let info = ExtensionInfo {
            extension: point.to_string(),
            name: name.to_string(),
        };
        match factory.create(options.data.as_ref(), host, &info).await {
            Ok(Some(instance)) => Some(Resolved {
                instance,
                name: info.name,
            }),
            Ok(None) => None,
            Err(err) => {
                tracing::debug!(
                    point = %info.extension,
                    name = %info.name,
                    error = %err,
                    "extension factory reported an error"
                );
                if let Some(hook) = &options.on_error {
                    hook(&err, &info);
                }
                None
            }
        }
    }
}
