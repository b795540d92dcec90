//! Courier facade for in-process use.
//!
//! Composition root that owns one notification bus, one command table, one
//! mediator registry and one proxy store, and forwards the public API to
//! them. Construct one per application (or per test) and pass it by
//! reference; there is no global instance.
//!
//! # Example
//!
//! ```ignore
//! use courier::config::DispatchConfig;
//! use courier::facade::Facade;
//!
//! let facade = Facade::builder(DispatchConfig::default())
//!     .with_proxy(Arc::new(DataProxy::new("MyProxy")))
//!     .with_command("Startup", Arc::new(StartupCommand))
//!     .with_mediator(Arc::new(HudMediator::new()))
//!     .build()?;
//!
//! facade.publish("Startup")?;
//! ```

use std::any::Any;
use std::sync::Arc;

use crate::bus::{self, BusError, DispatchReport, NotificationBus, SubscriberEntry, SubscriberId};
use crate::commands::CommandTable;
use crate::config::DispatchConfig;
use crate::interfaces::{command, Command, Mediator, Notifier, Proxy};
use crate::mediators::{self, MediatorRegistry, RegistryError};
use crate::notification::Notification;
use crate::proxies::ProxyStore;

/// Builder for a pre-populated [`Facade`].
pub struct FacadeBuilder {
    config: DispatchConfig,
    proxies: Vec<Arc<dyn Proxy>>,
    commands: Vec<(String, Arc<dyn Command>)>,
    mediators: Vec<Arc<dyn Mediator>>,
}

impl FacadeBuilder {
    /// Create a new builder with given config.
    pub fn new(config: DispatchConfig) -> Self {
        Self {
            config,
            proxies: Vec::new(),
            commands: Vec::new(),
            mediators: Vec::new(),
        }
    }

    pub fn with_proxy(mut self, proxy: Arc<dyn Proxy>) -> Self {
        self.proxies.push(proxy);
        self
    }

    pub fn with_command(mut self, topic: impl Into<String>, command: Arc<dyn Command>) -> Self {
        self.commands.push((topic.into(), command));
        self
    }

    pub fn with_mediator(mut self, mediator: Arc<dyn Mediator>) -> Self {
        self.mediators.push(mediator);
        self
    }

    /// Build the facade, registering proxies, then commands, then mediators.
    pub fn build(self) -> Result<Facade, FacadeError> {
        let facade = Facade::with_config(&self.config);

        for proxy in self.proxies {
            facade.register_proxy(proxy);
        }
        for (topic, command) in self.commands {
            facade.register_command(&topic, command)?;
        }
        for mediator in self.mediators {
            facade.register_mediator(mediator)?;
        }

        Ok(facade)
    }
}

/// Unified publish/registration API over the dispatch core.
pub struct Facade {
    bus: Arc<NotificationBus>,
    commands: CommandTable,
    mediators: MediatorRegistry,
    proxies: ProxyStore,
}

impl Facade {
    /// Create a facade with default dispatch settings.
    pub fn new() -> Self {
        Self::with_config(&DispatchConfig::default())
    }

    /// Create a facade, constructing the bus, command table, mediator
    /// registry and proxy store in dependency order.
    pub fn with_config(config: &DispatchConfig) -> Self {
        let bus = Arc::new(NotificationBus::with_fault_policy(config.fault_policy));
        let commands = CommandTable::new(Arc::clone(&bus));
        let mediators = MediatorRegistry::with_policy(Arc::clone(&bus), config.duplicate_mediator);

        Self {
            bus,
            commands,
            mediators,
            proxies: ProxyStore::new(),
        }
    }

    pub fn builder(config: DispatchConfig) -> FacadeBuilder {
        FacadeBuilder::new(config)
    }

    // ------------------------------------------------------------------
    // Publishing
    // ------------------------------------------------------------------

    /// Publish a bare notification named `name`.
    pub fn publish(&self, name: &str) -> bus::Result<DispatchReport> {
        self.publish_notification(&Notification::new(name))
    }

    /// Publish a notification with a body and optional kind tag.
    pub fn publish_with<T: Any + Send + Sync>(
        &self,
        name: &str,
        body: T,
        kind: Option<&str>,
    ) -> bus::Result<DispatchReport> {
        let mut notification = Notification::new(name).with_body(body);
        if let Some(kind) = kind {
            notification.set_kind(kind);
        }
        self.publish_notification(&notification)
    }

    /// Publish an already built notification under its own name.
    pub fn publish_notification(&self, notification: &Notification) -> bus::Result<DispatchReport> {
        self.bus.publish(notification.name(), notification)
    }

    /// Deliver a notification to the given mediators only.
    pub fn publish_to(
        &self,
        notification: &Notification,
        mediators: &[Arc<dyn Mediator>],
    ) -> bus::Result<DispatchReport> {
        let entries: Vec<SubscriberEntry> = mediators
            .iter()
            .map(|mediator| mediators::dispatcher(SubscriberId::new(), mediator))
            .collect();
        self.bus.publish_to_subset(notification, &entries)
    }

    /// Deliver a bare notification named `name` to the given mediators only.
    pub fn publish_name_to(
        &self,
        name: &str,
        mediators: &[Arc<dyn Mediator>],
    ) -> bus::Result<DispatchReport> {
        if name.is_empty() {
            return Err(BusError::EmptyTopic);
        }
        self.publish_to(&Notification::new(name), mediators)
    }

    // ------------------------------------------------------------------
    // Commands
    // ------------------------------------------------------------------

    pub fn register_command(
        &self,
        topic: &str,
        command: Arc<dyn Command>,
    ) -> bus::Result<Option<Arc<dyn Command>>> {
        self.commands.register_command(topic, command)
    }

    pub fn remove_command(&self, topic: &str) -> Option<Arc<dyn Command>> {
        self.commands.remove_command(topic)
    }

    pub fn has_command(&self, topic: &str) -> bool {
        self.commands.has_command(topic)
    }

    pub fn retrieve_command(&self, topic: &str) -> Option<Arc<dyn Command>> {
        self.commands.retrieve_command(topic)
    }

    pub fn execute_command(&self, topic: &str, notification: &Notification) -> command::Result<()> {
        self.commands.execute_command(topic, notification)
    }

    // ------------------------------------------------------------------
    // Mediators
    // ------------------------------------------------------------------

    pub fn register_mediator(&self, mediator: Arc<dyn Mediator>) -> mediators::Result<()> {
        self.mediators.register_mediator(mediator)
    }

    pub fn retrieve_mediator(&self, name: &str) -> Option<Arc<dyn Mediator>> {
        self.mediators.retrieve_mediator(name)
    }

    pub fn remove_mediator(&self, name: &str) -> Option<Arc<dyn Mediator>> {
        self.mediators.remove_mediator(name)
    }

    pub fn has_mediator(&self, name: &str) -> bool {
        self.mediators.has_mediator(name)
    }

    // ------------------------------------------------------------------
    // Proxies
    // ------------------------------------------------------------------

    pub fn register_proxy(&self, proxy: Arc<dyn Proxy>) -> Option<Arc<dyn Proxy>> {
        self.proxies.register_proxy(proxy)
    }

    pub fn retrieve_proxy(&self, name: &str) -> Option<Arc<dyn Proxy>> {
        self.proxies.retrieve_proxy(name)
    }

    pub fn remove_proxy(&self, name: &str) -> Option<Arc<dyn Proxy>> {
        self.proxies.remove_proxy(name)
    }

    pub fn has_proxy(&self, name: &str) -> bool {
        self.proxies.has_proxy(name)
    }

    // ------------------------------------------------------------------
    // Component access
    // ------------------------------------------------------------------

    /// Get direct access to the notification bus.
    pub fn bus(&self) -> &Arc<NotificationBus> {
        &self.bus
    }

    /// Get direct access to the command table.
    pub fn commands(&self) -> &CommandTable {
        &self.commands
    }

    /// Get direct access to the mediator registry.
    pub fn mediators(&self) -> &MediatorRegistry {
        &self.mediators
    }

    /// Get direct access to the proxy store.
    pub fn proxies(&self) -> &ProxyStore {
        &self.proxies
    }
}

impl Default for Facade {
    fn default() -> Self {
        Self::new()
    }
}

impl Notifier for Facade {
    fn send_notification(&self, notification: &Notification) -> bus::Result<DispatchReport> {
        self.publish_notification(notification)
    }

    fn send_notification_to(
        &self,
        notification: &Notification,
        mediators: &[Arc<dyn Mediator>],
    ) -> bus::Result<DispatchReport> {
        self.publish_to(notification, mediators)
    }
}

/// Errors from facade construction and combined operations.
#[derive(Debug, thiserror::Error)]
pub enum FacadeError {
    #[error("Bus error: {0}")]
    Bus(#[from] BusError),

    #[error("Registry error: {0}")]
    Registry(#[from] RegistryError),
}
