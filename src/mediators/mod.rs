//! Interest-driven mediator registry.
//!
//! Registering a mediator snapshots its interests and subscribes one shared
//! dispatcher entry under every interested topic. Removing it unsubscribes
//! that entry from every captured topic before the detach hook runs.

use std::any::Any;
use std::collections::{HashMap, HashSet};
use std::sync::{Arc, Weak};

use parking_lot::RwLock;
use serde::Deserialize;
use tracing::{debug, info, warn};

use crate::bus::{BusError, NotificationBus, SubscriberEntry, SubscriberId};
use crate::interfaces::{mediator, Mediator};
use crate::notification::Notification;

/// Name used when a [`DataMediator`] is created with an empty name.
pub const DEFAULT_MEDIATOR_NAME: &str = "Mediator";

/// Result type for registry operations.
pub type Result<T> = std::result::Result<T, RegistryError>;

/// Errors from mediator registration.
#[derive(Debug, thiserror::Error)]
pub enum RegistryError {
    #[error("Mediator '{0}' is already registered")]
    DuplicateMediator(String),
}

/// How a second registration under an existing name is treated.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DuplicateMediatorPolicy {
    /// First registration wins; later ones are a silent no-op.
    #[default]
    Ignore,
    /// Later registrations fail with [`RegistryError::DuplicateMediator`].
    Reject,
}

/// A registered mediator and the interests captured at registration.
struct MediatorRecord {
    mediator: Arc<dyn Mediator>,
    interests: Vec<String>,
    subscriber: SubscriberId,
}

/// Name -> mediator registry wired to the notification bus.
pub struct MediatorRegistry {
    bus: Arc<NotificationBus>,
    records: RwLock<HashMap<String, MediatorRecord>>,
    duplicate_policy: DuplicateMediatorPolicy,
}

impl MediatorRegistry {
    pub fn new(bus: Arc<NotificationBus>) -> Self {
        Self::with_policy(bus, DuplicateMediatorPolicy::default())
    }

    pub fn with_policy(bus: Arc<NotificationBus>, duplicate_policy: DuplicateMediatorPolicy) -> Self {
        Self {
            bus,
            records: RwLock::new(HashMap::new()),
            duplicate_policy,
        }
    }

    /// Register a mediator under its name.
    ///
    /// Interests are queried once here and never again for this record.
    /// `name`, `interests` and `on_attach` all run without the registry lock
    /// held, so they may call back into the registry.
    pub fn register_mediator(&self, mediator: Arc<dyn Mediator>) -> Result<()> {
        let name = mediator.name().to_string();

        if self.records.read().contains_key(&name) {
            return self.duplicate(name);
        }

        let interests = capture_interests(mediator.as_ref());

        {
            let mut records = self.records.write();

            // A concurrent registration may have won while interests were read
            if records.contains_key(&name) {
                return self.duplicate(name);
            }

            let subscriber = SubscriberId::new();

            if !interests.is_empty() {
                let entry = dispatcher(subscriber, &mediator);
                for topic in &interests {
                    // capture_interests already dropped empty names
                    if let Err(e) = self.bus.subscribe(topic, entry.clone()) {
                        warn!(mediator.name = %name, topic = %topic, error = %e, "Skipped interest");
                    }
                }
            }

            info!(
                mediator.name = %name,
                mediator.interests = ?interests,
                "Registered mediator"
            );

            records.insert(
                name,
                MediatorRecord {
                    mediator: Arc::clone(&mediator),
                    interests,
                    subscriber,
                },
            );
        }

        mediator.on_attach();
        Ok(())
    }

    /// Remove a mediator and every subscription it holds.
    ///
    /// Returns the removed instance, or `None` for an unknown name.
    pub fn remove_mediator(&self, name: &str) -> Option<Arc<dyn Mediator>> {
        let record = {
            let mut records = self.records.write();
            let record = records.remove(name)?;

            for topic in &record.interests {
                self.bus.unsubscribe(topic, record.subscriber);
            }
            record
        };

        info!(mediator.name = %name, "Removed mediator");

        record.mediator.on_detach();
        Some(record.mediator)
    }

    pub fn retrieve_mediator(&self, name: &str) -> Option<Arc<dyn Mediator>> {
        self.records
            .read()
            .get(name)
            .map(|record| Arc::clone(&record.mediator))
    }

    pub fn has_mediator(&self, name: &str) -> bool {
        self.records.read().contains_key(name)
    }

    /// Interests captured when `name` was registered.
    pub fn interests_of(&self, name: &str) -> Option<Vec<String>> {
        self.records
            .read()
            .get(name)
            .map(|record| record.interests.clone())
    }

    /// Bus identity of the dispatcher installed for `name`.
    pub fn subscriber_of(&self, name: &str) -> Option<SubscriberId> {
        self.records.read().get(name).map(|record| record.subscriber)
    }

    pub fn mediator_count(&self) -> usize {
        self.records.read().len()
    }

    fn duplicate(&self, name: String) -> Result<()> {
        match self.duplicate_policy {
            DuplicateMediatorPolicy::Ignore => {
                debug!(mediator.name = %name, "Mediator already registered, ignoring");
                Ok(())
            }
            DuplicateMediatorPolicy::Reject => Err(RegistryError::DuplicateMediator(name)),
        }
    }
}

/// Mediator holding a named view component slot.
///
/// Accepts every notification it is handed without acting on it.
pub struct DataMediator {
    name: String,
    interests: Vec<String>,
    view: RwLock<Option<Arc<dyn Any + Send + Sync>>>,
}

impl DataMediator {
    /// Create an empty mediator. An empty name falls back to [`DEFAULT_MEDIATOR_NAME`].
    pub fn new(name: impl Into<String>) -> Self {
        let name = name.into();
        Self {
            name: if name.is_empty() {
                DEFAULT_MEDIATOR_NAME.to_string()
            } else {
                name
            },
            interests: Vec::new(),
            view: RwLock::new(None),
        }
    }

    pub fn with_interests(mut self, interests: &[&str]) -> Self {
        self.interests = interests.iter().map(|s| s.to_string()).collect();
        self
    }

    pub fn with_view<T: Any + Send + Sync>(self, view: T) -> Self {
        self.set_view(view);
        self
    }

    pub fn set_view<T: Any + Send + Sync>(&self, view: T) {
        *self.view.write() = Some(Arc::new(view));
    }

    pub fn view(&self) -> Option<Arc<dyn Any + Send + Sync>> {
        self.view.read().clone()
    }

    /// Typed view of the component slot.
    pub fn view_as<T: Any + Send + Sync>(&self) -> Option<Arc<T>> {
        self.view().and_then(|view| view.downcast::<T>().ok())
    }
}

impl Mediator for DataMediator {
    fn name(&self) -> &str {
        &self.name
    }

    fn interests(&self) -> Vec<String> {
        self.interests.clone()
    }

    fn handle(&self, _notification: &Notification) -> mediator::Result<()> {
        Ok(())
    }
}

/// Build a dispatcher entry that calls straight into a mediator.
///
/// The entry holds only a weak reference; a mediator dropped elsewhere is
/// skipped rather than kept alive by the bus.
pub fn dispatcher(id: SubscriberId, mediator: &Arc<dyn Mediator>) -> SubscriberEntry {
    let weak: Weak<dyn Mediator> = Arc::downgrade(mediator);
    SubscriberEntry::with_id(id, move |notification| {
        let Some(mediator) = weak.upgrade() else {
            return Ok(());
        };
        mediator
            .handle(notification)
            .map_err(|source| BusError::MediatorFailed {
                name: mediator.name().to_string(),
                source,
            })
    })
}

/// Query interests once, dropping empty names and duplicates in order.
fn capture_interests(mediator: &dyn Mediator) -> Vec<String> {
    let mut seen = HashSet::new();
    let mut interests = Vec::new();

    for topic in mediator.interests() {
        if topic.is_empty() {
            warn!(mediator.name = %mediator.name(), "Ignoring empty interest");
            continue;
        }
        if seen.insert(topic.clone()) {
            interests.push(topic);
        }
    }

    interests
}
