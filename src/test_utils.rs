//! Test utilities and recording implementations.
//!
//! Mediators and commands that record what they were handed so tests can
//! assert on delivery order and lifecycle hooks without writing their own
//! trait impls.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Weak};

use parking_lot::Mutex;

use crate::facade::Facade;
use crate::interfaces::{command, mediator, Command, CommandError, Mediator, MediatorError};
use crate::notification::Notification;

/// Shared, ordered log of `"<handler>:<notification>"` entries.
pub type CallLog = Arc<Mutex<Vec<String>>>;

/// Create an empty call log.
pub fn call_log() -> CallLog {
    Arc::new(Mutex::new(Vec::new()))
}

/// Mediator that records every notification it handles.
pub struct RecordingMediator {
    name: String,
    interests: Vec<String>,
    handled: Mutex<Vec<String>>,
    log: Option<CallLog>,
    fail_on: Mutex<Option<String>>,
    attached: AtomicUsize,
    detached: AtomicUsize,
    interest_queries: AtomicUsize,
}

impl RecordingMediator {
    pub fn new(name: &str, interests: &[&str]) -> Self {
        Self {
            name: name.to_string(),
            interests: interests.iter().map(|s| s.to_string()).collect(),
            handled: Mutex::new(Vec::new()),
            log: None,
            fail_on: Mutex::new(None),
            attached: AtomicUsize::new(0),
            detached: AtomicUsize::new(0),
            interest_queries: AtomicUsize::new(0),
        }
    }

    /// Also append to a log shared with other handlers.
    pub fn with_log(mut self, log: &CallLog) -> Self {
        self.log = Some(Arc::clone(log));
        self
    }

    /// Make `handle` fail for notifications named `topic`.
    pub fn fail_on(&self, topic: &str) {
        *self.fail_on.lock() = Some(topic.to_string());
    }

    pub fn handled(&self) -> Vec<String> {
        self.handled.lock().clone()
    }

    pub fn handled_count(&self, topic: &str) -> usize {
        self.handled.lock().iter().filter(|t| *t == topic).count()
    }

    pub fn attach_count(&self) -> usize {
        self.attached.load(Ordering::SeqCst)
    }

    pub fn detach_count(&self) -> usize {
        self.detached.load(Ordering::SeqCst)
    }

    pub fn interest_queries(&self) -> usize {
        self.interest_queries.load(Ordering::SeqCst)
    }
}

impl Mediator for RecordingMediator {
    fn name(&self) -> &str {
        &self.name
    }

    fn interests(&self) -> Vec<String> {
        self.interest_queries.fetch_add(1, Ordering::SeqCst);
        self.interests.clone()
    }

    fn handle(&self, notification: &Notification) -> mediator::Result<()> {
        if self.fail_on.lock().as_deref() == Some(notification.name()) {
            return Err(MediatorError::Failed(format!(
                "{} refused {}",
                self.name,
                notification.name()
            )));
        }

        self.handled.lock().push(notification.name().to_string());
        if let Some(log) = &self.log {
            log.lock()
                .push(format!("{}:{}", self.name, notification.name()));
        }
        Ok(())
    }

    fn on_attach(&self) {
        self.attached.fetch_add(1, Ordering::SeqCst);
    }

    fn on_detach(&self) {
        self.detached.fetch_add(1, Ordering::SeqCst);
    }
}

/// Mediator that removes itself from the facade the first time it handles
/// a notification.
pub struct SelfRemovingMediator {
    inner: RecordingMediator,
    facade: Weak<Facade>,
}

impl SelfRemovingMediator {
    pub fn new(name: &str, interests: &[&str], facade: &Arc<Facade>) -> Self {
        Self {
            inner: RecordingMediator::new(name, interests),
            facade: Arc::downgrade(facade),
        }
    }

    pub fn with_log(mut self, log: &CallLog) -> Self {
        self.inner = self.inner.with_log(log);
        self
    }

    pub fn handled(&self) -> Vec<String> {
        self.inner.handled()
    }
}

impl Mediator for SelfRemovingMediator {
    fn name(&self) -> &str {
        self.inner.name()
    }

    fn interests(&self) -> Vec<String> {
        self.inner.interests()
    }

    fn handle(&self, notification: &Notification) -> mediator::Result<()> {
        self.inner.handle(notification)?;
        let facade = self
            .facade
            .upgrade()
            .ok_or_else(|| MediatorError::Unexpected("facade dropped".to_string()))?;
        facade.remove_mediator(self.inner.name());
        Ok(())
    }
}

/// Command that records every execution.
pub struct RecordingCommand {
    label: String,
    executed: Mutex<Vec<String>>,
    log: Option<CallLog>,
    fail: bool,
}

impl RecordingCommand {
    pub fn new(label: &str) -> Self {
        Self {
            label: label.to_string(),
            executed: Mutex::new(Vec::new()),
            log: None,
            fail: false,
        }
    }

    /// A command whose every execution fails.
    pub fn failing(label: &str) -> Self {
        Self {
            fail: true,
            ..Self::new(label)
        }
    }

    pub fn with_log(mut self, log: &CallLog) -> Self {
        self.log = Some(Arc::clone(log));
        self
    }

    pub fn executed(&self) -> Vec<String> {
        self.executed.lock().clone()
    }

    pub fn execution_count(&self) -> usize {
        self.executed.lock().len()
    }
}

impl Command for RecordingCommand {
    fn execute(&self, notification: &Notification) -> command::Result<()> {
        self.executed.lock().push(notification.name().to_string());
        if let Some(log) = &self.log {
            log.lock()
                .push(format!("{}:{}", self.label, notification.name()));
        }
        if self.fail {
            return Err(CommandError::Failed(format!("{} failed", self.label)));
        }
        Ok(())
    }
}
