//! Topic-keyed notification bus.
//!
//! This module contains:
//! - `NotificationBus`: topic name -> ordered subscriber entries, synchronous fan-out
//! - `SubscriberEntry` / `SubscriberId`: callback plus the identity used for removal
//! - `BusError`: failures surfaced to the publisher
//! - `FaultPolicy`: whether one failing subscriber stops the rest of a fan-out

use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

use parking_lot::RwLock;
use serde::Deserialize;
use tracing::debug;
use uuid::Uuid;

use crate::interfaces::{CommandError, MediatorError};
use crate::notification::Notification;

pub mod dispatch;

pub use dispatch::{dispatch_to_subscribers, DispatchReport};

/// Result type for bus operations.
pub type Result<T> = std::result::Result<T, BusError>;

/// Errors that can occur during bus operations.
#[derive(Debug, thiserror::Error)]
pub enum BusError {
    #[error("Topic name must not be empty")]
    EmptyTopic,

    #[error("Command for topic '{topic}' failed")]
    CommandFailed {
        topic: String,
        #[source]
        source: CommandError,
    },

    #[error("Mediator '{name}' failed")]
    MediatorFailed {
        name: String,
        #[source]
        source: MediatorError,
    },

    #[error("Subscriber failed: {0}")]
    SubscriberFailed(String),
}

/// How a fan-out reacts to a failing subscriber.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FaultPolicy {
    /// Stop at the first failure and return it to the publisher.
    #[default]
    Propagate,
    /// Log each failure and keep delivering to the remaining subscribers.
    Isolate,
}

/// Opaque identity of a subscription.
///
/// Minted fresh for every logical subscriber, so a dropped and re-created
/// subscriber can never be mistaken for the old one.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SubscriberId(Uuid);

impl SubscriberId {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for SubscriberId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for SubscriberId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

/// Callback invoked for each delivered notification.
pub type Callback = Arc<dyn Fn(&Notification) -> Result<()> + Send + Sync>;

/// A callback registered under one or more topics.
///
/// Cloning an entry keeps its identity, so the same entry can be subscribed
/// to several topics and removed from each with one `unsubscribe` per topic.
#[derive(Clone)]
pub struct SubscriberEntry {
    id: SubscriberId,
    callback: Callback,
}

impl SubscriberEntry {
    /// Wrap a callback under a freshly minted identity.
    pub fn new<F>(callback: F) -> Self
    where
        F: Fn(&Notification) -> Result<()> + Send + Sync + 'static,
    {
        Self::with_id(SubscriberId::new(), callback)
    }

    /// Wrap a callback under an existing identity.
    pub fn with_id<F>(id: SubscriberId, callback: F) -> Self
    where
        F: Fn(&Notification) -> Result<()> + Send + Sync + 'static,
    {
        Self {
            id,
            callback: Arc::new(callback),
        }
    }

    pub fn id(&self) -> SubscriberId {
        self.id
    }

    /// Invoke the callback.
    pub fn notify(&self, notification: &Notification) -> Result<()> {
        (self.callback)(notification)
    }
}

impl fmt::Debug for SubscriberEntry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SubscriberEntry")
            .field("id", &self.id)
            .finish_non_exhaustive()
    }
}

/// Topic-keyed observer registry with synchronous fan-out.
///
/// Invariants:
/// - delivery order for a topic is subscription order
/// - a topic whose last entry is removed is dropped from the map
/// - `publish` iterates a snapshot taken under the read lock, and the lock is
///   released before any callback runs, so callbacks may subscribe or
///   unsubscribe (themselves included) without affecting the in-flight fan-out
pub struct NotificationBus {
    topics: RwLock<HashMap<String, Vec<SubscriberEntry>>>,
    fault_policy: FaultPolicy,
}

impl NotificationBus {
    /// Create an empty bus that propagates subscriber failures.
    pub fn new() -> Self {
        Self::with_fault_policy(FaultPolicy::default())
    }

    pub fn with_fault_policy(fault_policy: FaultPolicy) -> Self {
        Self {
            topics: RwLock::new(HashMap::new()),
            fault_policy,
        }
    }

    pub fn fault_policy(&self) -> FaultPolicy {
        self.fault_policy
    }

    /// Append an entry to a topic's subscriber list.
    ///
    /// Returns the entry's identity for later removal.
    pub fn subscribe(&self, topic: &str, entry: SubscriberEntry) -> Result<SubscriberId> {
        if topic.is_empty() {
            return Err(BusError::EmptyTopic);
        }

        let id = entry.id();
        let count = {
            let mut topics = self.topics.write();
            let entries = topics.entry(topic.to_string()).or_default();
            entries.push(entry);
            entries.len()
        };

        debug!(
            topic = %topic,
            subscriber = %id,
            subscriber_count = count,
            "Subscribed to topic"
        );

        Ok(id)
    }

    /// Remove every entry under `topic` carrying `id`.
    ///
    /// Unknown topics and identities are a no-op. Returns the number of
    /// entries removed.
    pub fn unsubscribe(&self, topic: &str, id: SubscriberId) -> usize {
        let removed = {
            let mut topics = self.topics.write();
            let Some(entries) = topics.get_mut(topic) else {
                return 0;
            };

            let before = entries.len();
            entries.retain(|entry| entry.id() != id);
            let removed = before - entries.len();

            if entries.is_empty() {
                topics.remove(topic);
            }
            debug_assert!(topics
                .get(topic)
                .is_none_or(|entries| entries.iter().all(|entry| entry.id() != id)));
            removed
        };

        if removed > 0 {
            debug!(
                topic = %topic,
                subscriber = %id,
                removed,
                "Unsubscribed from topic"
            );
        }

        removed
    }

    /// Fan a notification out to every subscriber of `topic`.
    ///
    /// No subscribers is not an error. Subscriber failures are handled per
    /// the bus [`FaultPolicy`].
    pub fn publish(&self, topic: &str, notification: &Notification) -> Result<DispatchReport> {
        if topic.is_empty() {
            return Err(BusError::EmptyTopic);
        }

        // Snapshot under read lock, then release before any callback runs
        let snapshot: Vec<SubscriberEntry> = {
            let topics = self.topics.read();
            match topics.get(topic) {
                Some(entries) => entries.clone(),
                None => return Ok(DispatchReport::default()),
            }
        };

        debug!(
            topic = %topic,
            subscriber_count = snapshot.len(),
            "Publishing notification"
        );

        dispatch_to_subscribers(topic, &snapshot, notification, self.fault_policy)
    }

    /// Deliver a notification straight to the given entries.
    ///
    /// Bypasses topic lookup; used to address a caller-chosen group.
    pub fn publish_to_subset(
        &self,
        notification: &Notification,
        subscribers: &[SubscriberEntry],
    ) -> Result<DispatchReport> {
        debug!(
            topic = %notification.name(),
            subscriber_count = subscribers.len(),
            "Publishing notification to explicit subscribers"
        );

        dispatch_to_subscribers(
            notification.name(),
            subscribers,
            notification,
            self.fault_policy,
        )
    }

    /// Whether `topic` currently holds an entry with identity `id`.
    pub fn has_subscription(&self, topic: &str, id: SubscriberId) -> bool {
        self.topics
            .read()
            .get(topic)
            .is_some_and(|entries| entries.iter().any(|entry| entry.id() == id))
    }

    /// Whether any subscriber is registered for `topic`.
    pub fn has_topic(&self, topic: &str) -> bool {
        self.topics.read().contains_key(topic)
    }

    /// Number of entries registered for `topic`.
    pub fn subscriber_count(&self, topic: &str) -> usize {
        self.topics.read().get(topic).map_or(0, Vec::len)
    }

    /// Number of topics with at least one subscriber.
    pub fn topic_count(&self) -> usize {
        self.topics.read().len()
    }
}

impl Default for NotificationBus {
    fn default() -> Self {
        Self::new()
    }
}
