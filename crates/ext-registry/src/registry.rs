//! The extension table: per-point registration order and name→factory map.

use std::collections::HashMap;
use std::fmt;

use crate::error::{Error, Result};
use crate::factory::Factory;

/// Registered state of one extension point.
///
/// `order` and `factories` are always modified together: every name in
/// `order` has an entry in `factories`, and a name's position in `order` is
/// fixed by its first registration.
pub(crate) struct PointTable<H, D, I> {
    pub(crate) order: Vec<String>,
    pub(crate) factories: HashMap<String, Factory<H, D, I>>,
}

impl<H, D, I> Default for PointTable<H, D, I> {
    fn default() -> Self {
        Self {
            order: Vec::new(),
            factories: HashMap::new(),
        }
    }
}

/// A registry of extension points and the factories registered against them.
///
/// Registries are constructed and passed explicitly; there is no process-wide
/// instance. Registration takes `&mut self` and resolution takes `&self`, so
/// the borrow checker enforces the exclusivity between in-flight connects and
/// table mutation. Callers that need shared concurrent mutation wrap the
/// registry in their own `RwLock`.
///
/// There is no removal operation: overriding a `(point, name)` pair with a
/// new factory is the only mutation, and it preserves the name's original
/// position in registration order.
pub struct Registry<H, D, I> {
    points: HashMap<String, PointTable<H, D, I>>,
}

impl<H, D, I> Registry<H, D, I> {
    /// Create an empty registry.
    pub fn new() -> Self {
        Self {
            points: HashMap::new(),
        }
    }

    /// Register an extension against an extension point.
    ///
    /// Fails with [`Error::InvalidFactory`] if the factory is a reserved
    /// (non-callable) placeholder; this is the direct API boundary check.
    /// Returns the registry for chaining.
    pub fn register(
        &mut self,
        point: impl Into<String>,
        name: impl Into<String>,
        factory: Factory<H, D, I>,
    ) -> Result<&mut Self> {
        if !factory.is_callable() {
            return Err(Error::InvalidFactory);
        }
        self.insert(point.into(), name.into(), factory);
        Ok(self)
    }

    /// Register a pre-wrapped factory without the callable check.
    ///
    /// This is the surface used by discovery collaborators, whose factories
    /// may legitimately normalize to a reserved no-op (for example, entries
    /// that only reserve a name, or lazily-loaded implementations that turn
    /// out to be unavailable).
    pub fn register_unchecked(
        &mut self,
        point: impl Into<String>,
        name: impl Into<String>,
        factory: Factory<H, D, I>,
    ) -> &mut Self {
        self.insert(point.into(), name.into(), factory);
        self
    }

    fn insert(&mut self, point: String, name: String, factory: Factory<H, D, I>) {
        let table = self.points.entry(point.clone()).or_default();
        let replaced = table.factories.contains_key(&name);
        if !replaced {
            table.order.push(name.clone());
        }
        tracing::debug!(point = %point, name = %name, replaced, "registered extension");
        table.factories.insert(name, factory);
    }

    pub(crate) fn point(&self, point: &str) -> Option<&PointTable<H, D, I>> {
        self.points.get(point)
    }

    /// Names registered against a point, in registration order.
    pub fn names(&self, point: &str) -> &[String] {
        self.points
            .get(point)
            .map(|table| table.order.as_slice())
            .unwrap_or_default()
    }

    /// Whether a specific `(point, name)` registration exists.
    pub fn contains(&self, point: &str, name: &str) -> bool {
        self.points
            .get(point)
            .is_some_and(|table| table.factories.contains_key(name))
    }

    /// All extension points with at least one registration.
    pub fn points(&self) -> impl Iterator<Item = &str> {
        self.points.keys().map(String::as_str)
    }

    /// Number of extension points with at least one registration.
    pub fn len(&self) -> usize {
        self.points.len()
    }

    /// Whether the registry has no registrations at all.
    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }
}

impl<H, D, I> Default for Registry<H, D, I> {
    fn default() -> Self {
        Self::new()
    }
}

impl<H, D, I> fmt::Debug for Registry<H, D, I> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut map = f.debug_map();
        for (point, table) in &self.points {
            map.entry(point, &table.order);
        }
        map.finish()
    }
}
