//! Mediator interface.
//!
//! Mediators are named subscribers that declare a set of topics. The
//! registry snapshots that set once at registration and subscribes the
//! mediator to every topic in it.

use crate::notification::Notification;

/// Result type for mediator handling.
pub type Result<T> = std::result::Result<T, MediatorError>;

/// Errors from mediator handling.
#[derive(Debug, thiserror::Error)]
pub enum MediatorError {
    #[error("Mediator failed: {0}")]
    Failed(String),

    #[error("Unexpected notification '{0}'")]
    Unexpected(String),
}

/// Named multi-topic subscriber.
///
/// # Example
///
/// ```ignore
/// struct HudMediator;
///
/// impl Mediator for HudMediator {
///     fn name(&self) -> &str { "hud" }
///     fn interests(&self) -> Vec<String> { vec!["walk".into(), "talk".into()] }
///
///     fn handle(&self, notification: &Notification) -> mediator::Result<()> {
///         match notification.name() {
///             "walk" => Ok(()),
///             "talk" => Ok(()),
///             other => Err(MediatorError::Unexpected(other.to_string())),
///         }
///     }
/// }
/// ```
pub trait Mediator: Send + Sync {
    /// Registry key. Must stay stable while registered.
    fn name(&self) -> &str;

    /// Topics this mediator wants to receive.
    ///
    /// Queried once at registration. Duplicates are ignored.
    fn interests(&self) -> Vec<String> {
        Vec::new()
    }

    /// Handle a notification for one of the captured interests.
    fn handle(&self, notification: &Notification) -> Result<()>;

    /// Called after registration completes.
    fn on_attach(&self) {}

    /// Called after removal completes.
    fn on_detach(&self) {}
}
