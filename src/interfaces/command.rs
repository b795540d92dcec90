//! Command interface.
//!
//! A command is the single handler bound to a topic in the command table.
//! The table resolves the binding at dispatch time, so a command can be
//! swapped without touching the bus subscription.

use crate::notification::Notification;

/// Result type for command execution.
pub type Result<T> = std::result::Result<T, CommandError>;

/// Errors from command execution.
#[derive(Debug, thiserror::Error)]
pub enum CommandError {
    #[error("Command failed: {0}")]
    Failed(String),

    #[error("Sub-command {index} failed")]
    SubCommand {
        index: usize,
        #[source]
        source: Box<CommandError>,
    },
}

/// Handler executed when its bound topic is published.
///
/// `execute` takes `&self`; commands that keep state across executions
/// should use interior mutability.
///
/// # Example
///
/// ```ignore
/// struct StartupCommand;
///
/// impl Command for StartupCommand {
///     fn execute(&self, notification: &Notification) -> command::Result<()> {
///         println!("Execute command {}", notification.name());
///         Ok(())
///     }
/// }
/// ```
pub trait Command: Send + Sync {
    /// Handle a notification published on the bound topic.
    fn execute(&self, notification: &Notification) -> Result<()>;
}

impl<F> Command for F
where
    F: Fn(&Notification) -> Result<()> + Send + Sync,
{
    fn execute(&self, notification: &Notification) -> Result<()> {
        self(notification)
    }
}
