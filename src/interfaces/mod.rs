//! Capability traits for courier collaborators.
//!
//! These traits define the contracts for:
//! - Commands (single late-bound handler per topic)
//! - Mediators (named, multi-topic subscribers with attach/detach hooks)
//! - Proxies (named model objects held by the proxy store)
//! - Notifiers (anything that can publish on behalf of a handler)

pub mod command;
pub mod mediator;
pub mod notifier;
pub mod proxy;

pub use command::{Command, CommandError};
pub use mediator::{Mediator, MediatorError};
pub use notifier::Notifier;
pub use proxy::Proxy;
