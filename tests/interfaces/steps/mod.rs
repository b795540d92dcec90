//! Cucumber step definitions for interface tests.

pub mod mediator_registry;
pub mod notification_bus;
