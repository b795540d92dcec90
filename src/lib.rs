//! Courier - in-process notification dispatch
//!
//! A synchronous publish/subscribe engine with named commands, interest-driven
//! mediators and a named proxy store, all reachable through one [`Facade`].
//!
//! Publishing a notification walks a snapshot of the topic's subscriber list
//! in registration order and invokes each one exactly once, so handlers may
//! freely register, rebind or remove other handlers while a dispatch is
//! running.

pub mod bus;
pub mod commands;
pub mod config;
pub mod facade;
pub mod interfaces;
pub mod mediators;
pub mod notification;
pub mod proxies;
pub mod utils;

#[cfg(any(test, feature = "test-utils"))]
pub mod test_utils;

pub use bus::{BusError, DispatchReport, FaultPolicy, NotificationBus, SubscriberEntry, SubscriberId};
pub use commands::{CommandTable, MacroCommand};
pub use config::{Config, DispatchConfig};
pub use facade::{Facade, FacadeBuilder, FacadeError};
pub use interfaces::{Command, CommandError, Mediator, MediatorError, Notifier, Proxy};
pub use mediators::{DataMediator, DuplicateMediatorPolicy, MediatorRegistry, RegistryError};
pub use notification::Notification;
pub use proxies::{DataProxy, ProxyStore};
