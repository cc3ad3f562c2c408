//! A stub module loader for discovery tests.

use std::path::Path;
use std::sync::{Arc, Mutex};

use ext_discovery::{ExtensionLoader, ModuleSpec};
use ext_registry::{Factory, FactoryError};

/// Loader that fabricates string instances from module identifiers.
///
/// Resolution rules:
///
/// - module `"missing"` (or no module at all) fails to load
/// - otherwise the instance is the module id, or `"module::export"` when
///   the descriptor names an export
///
/// Every load attempt is recorded so tests can assert load-once behavior.
#[derive(Default)]
pub struct StubLoader {
    loads: Mutex<Vec<ModuleSpec>>,
}

impl StubLoader {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    /// Specs the loader has been asked to resolve, in order.
    pub fn loads(&self) -> Vec<ModuleSpec> {
        self.loads.lock().unwrap().clone()
    }
}

impl ExtensionLoader<(), String, String> for StubLoader {
    fn load(
        &self,
        _package_dir: &Path,
        spec: &ModuleSpec,
    ) -> std::result::Result<Factory<(), String, String>, FactoryError> {
        self.loads.lock().unwrap().push(spec.clone());
        let module = match spec.module.as_deref() {
            None | Some("missing") => return Err("module not found".into()),
            Some(module) => module,
        };
        let instance = match &spec.export {
            Some(export) => format!("{module}::{export}"),
            None => module.to_string(),
        };
        Ok(Factory::from_fn(move |_, _, _| Some(instance.clone())))
    }
}
