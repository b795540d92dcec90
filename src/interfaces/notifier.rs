//! Notifier interface.
//!
//! Lets commands and mediators publish without holding the concrete facade.
//! Handlers typically keep a `Weak<dyn Notifier>` to avoid a reference cycle
//! through the registries.

use std::sync::Arc;

use crate::bus::{DispatchReport, Result};
use crate::interfaces::Mediator;
use crate::notification::Notification;

pub trait Notifier: Send + Sync {
    /// Publish to every subscriber of the notification's topic.
    fn send_notification(&self, notification: &Notification) -> Result<DispatchReport>;

    /// Deliver directly to the given mediators, bypassing topic lookup.
    fn send_notification_to(
        &self,
        notification: &Notification,
        mediators: &[Arc<dyn Mediator>],
    ) -> Result<DispatchReport>;
}
