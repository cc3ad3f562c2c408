//! Scripted factories with invocation logging.

use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;
use ext_registry::{ExtensionFactory, ExtensionInfo, Factory, FactoryError};

/// One recorded factory invocation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CallRecord {
    /// Extension point being resolved.
    pub extension: String,
    /// Name the factory was registered under.
    pub name: String,
    /// Data payload the factory received, if any.
    pub data: Option<String>,
}

/// Shared log of factory invocations, in invocation order.
#[derive(Debug, Clone, Default)]
pub struct CallLog {
    calls: Arc<Mutex<Vec<CallRecord>>>,
}

impl CallLog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record(&self, info: &ExtensionInfo, data: Option<&String>) {
        self.calls.lock().unwrap().push(CallRecord {
            extension: info.extension.clone(),
            name: info.name.clone(),
            data: data.cloned(),
        });
    }

    /// Names invoked so far, in order.
    pub fn names(&self) -> Vec<String> {
        self.calls
            .lock()
            .unwrap()
            .iter()
            .map(|call| call.name.clone())
            .collect()
    }

    pub fn records(&self) -> Vec<CallRecord> {
        self.calls.lock().unwrap().clone()
    }

    pub fn len(&self) -> usize {
        self.calls.lock().unwrap().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// The outcome a [`ScriptedFactory`] produces on every invocation.
#[derive(Debug, Clone)]
enum Outcome {
    Instance(String),
    Absent,
    Error(String),
}

/// A factory with a preprogrammed outcome.
///
/// Records every invocation into its [`CallLog`] before completing, and can
/// delay completion to exercise out-of-order scenarios.
pub struct ScriptedFactory {
    outcome: Outcome,
    delay: Option<Duration>,
    log: CallLog,
}

impl ScriptedFactory {
    /// Always produce the given instance.
    pub fn returning(instance: impl Into<String>) -> Self {
        Self::with_outcome(Outcome::Instance(instance.into()))
    }

    /// Complete with no instance and no error.
    pub fn absent() -> Self {
        Self::with_outcome(Outcome::Absent)
    }

    /// Report an error through the factory's error channel.
    pub fn failing(message: impl Into<String>) -> Self {
        Self::with_outcome(Outcome::Error(message.into()))
    }

    fn with_outcome(outcome: Outcome) -> Self {
        Self {
            outcome,
            delay: None,
            log: CallLog::new(),
        }
    }

    /// Delay completion by `delay` after recording the invocation.
    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = Some(delay);
        self
    }

    /// Record invocations into a shared log.
    pub fn with_log(mut self, log: CallLog) -> Self {
        self.log = log;
        self
    }

    /// Normalize into a registrable factory.
    pub fn into_factory(self) -> Factory<(), String, String> {
        Factory::from_async(self)
    }
}

#[async_trait]
impl ExtensionFactory<(), String, String> for ScriptedFactory {
    async fn create(
        &self,
        data: Option<&String>,
        _host: &(),
        info: &ExtensionInfo,
    ) -> std::result::Result<Option<String>, FactoryError> {
        self.log.record(info, data);
        if let Some(delay) = self.delay {
            tokio::time::sleep(delay).await;
        }
        match &self.outcome {
            Outcome::Instance(instance) => Ok(Some(instance.clone())),
            Outcome::Absent => Ok(None),
            Outcome::Error(message) => Err(message.clone().into()),
        }
    }
}
