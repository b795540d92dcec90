//! Late-bound command table.
//!
//! Maps a topic to at most one command. The first binding for a topic
//! installs a single resolver on the bus; that resolver looks up whatever
//! command is bound *when the notification arrives*, so rebinding a topic
//! never touches the bus subscription.

use std::collections::HashMap;
use std::sync::{Arc, Weak};

use parking_lot::RwLock;
use tracing::{debug, info};

use crate::bus::{BusError, NotificationBus, Result, SubscriberEntry, SubscriberId};
use crate::interfaces::{command, Command};
use crate::notification::Notification;

pub mod macro_command;

pub use macro_command::MacroCommand;

type Bindings = RwLock<HashMap<String, Arc<dyn Command>>>;

/// Topic -> command bindings backed by one resolver subscription per topic.
pub struct CommandTable {
    bus: Arc<NotificationBus>,
    bindings: Arc<Bindings>,
    /// Identity shared by every resolver this table installs.
    resolver_id: SubscriberId,
}

impl CommandTable {
    pub fn new(bus: Arc<NotificationBus>) -> Self {
        Self {
            bus,
            bindings: Arc::new(RwLock::new(HashMap::new())),
            resolver_id: SubscriberId::new(),
        }
    }

    /// Bind `command` to `topic`, replacing any existing binding.
    ///
    /// The bus resolver is installed only on the first binding for a topic.
    /// Returns the command that was replaced, if any; the table never drops
    /// a command on the caller's behalf.
    pub fn register_command(
        &self,
        topic: &str,
        command: Arc<dyn Command>,
    ) -> Result<Option<Arc<dyn Command>>> {
        // Hold the bindings lock across subscribe so two first-time
        // registrations for one topic cannot both install a resolver.
        let mut bindings = self.bindings.write();

        if !bindings.contains_key(topic) {
            let entry = Self::resolver(self.resolver_id, Arc::downgrade(&self.bindings), topic);
            self.bus.subscribe(topic, entry)?;
            info!(topic = %topic, "Installed command resolver");
        }

        let previous = bindings.insert(topic.to_string(), command);
        debug!(topic = %topic, replaced = previous.is_some(), "Command bound");

        Ok(previous)
    }

    /// Unbind `topic` and drop its bus resolver.
    ///
    /// Returns the removed command, or `None` if the topic was unbound.
    pub fn remove_command(&self, topic: &str) -> Option<Arc<dyn Command>> {
        let mut bindings = self.bindings.write();
        let removed = bindings.remove(topic)?;

        self.bus.unsubscribe(topic, self.resolver_id);
        info!(topic = %topic, "Removed command");

        Some(removed)
    }

    pub fn has_command(&self, topic: &str) -> bool {
        self.bindings.read().contains_key(topic)
    }

    /// Current binding for `topic`.
    pub fn retrieve_command(&self, topic: &str) -> Option<Arc<dyn Command>> {
        self.bindings.read().get(topic).cloned()
    }

    /// Run the command bound to `topic`, if any.
    ///
    /// An unbound topic is a no-op.
    pub fn execute_command(&self, topic: &str, notification: &Notification) -> command::Result<()> {
        resolve_and_execute(&self.bindings, topic, notification)
    }

    pub fn command_count(&self) -> usize {
        self.bindings.read().len()
    }

    /// Identity of the resolver entries this table installs on the bus.
    pub fn resolver_id(&self) -> SubscriberId {
        self.resolver_id
    }

    fn resolver(id: SubscriberId, bindings: Weak<Bindings>, topic: &str) -> SubscriberEntry {
        let topic = topic.to_string();
        SubscriberEntry::with_id(id, move |notification| {
            let Some(bindings) = bindings.upgrade() else {
                return Ok(());
            };
            resolve_and_execute(&bindings, &topic, notification).map_err(|source| {
                BusError::CommandFailed {
                    topic: topic.clone(),
                    source,
                }
            })
        })
    }
}

/// Look up the current binding and run it outside the lock.
fn resolve_and_execute(
    bindings: &Bindings,
    topic: &str,
    notification: &Notification,
) -> command::Result<()> {
    let command = bindings.read().get(topic).cloned();
    match command {
        Some(command) => command.execute(notification),
        None => Ok(()),
    }
}
