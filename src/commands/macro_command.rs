//! Composite command.
//!
//! Runs an ordered list of sub-commands against the same notification.

use std::sync::Arc;

use crate::interfaces::{command, Command, CommandError};
use crate::notification::Notification;

/// Command that executes its sub-commands in insertion order.
///
/// The first failing sub-command stops the sequence; its position is
/// reported in [`CommandError::SubCommand`].
#[derive(Default)]
pub struct MacroCommand {
    sub_commands: Vec<Arc<dyn Command>>,
}

impl MacroCommand {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a sub-command.
    pub fn add_sub_command(&mut self, command: Arc<dyn Command>) {
        self.sub_commands.push(command);
    }

    /// Builder-style variant of [`add_sub_command`](Self::add_sub_command).
    pub fn with_sub_command(mut self, command: Arc<dyn Command>) -> Self {
        self.add_sub_command(command);
        self
    }

    pub fn len(&self) -> usize {
        self.sub_commands.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sub_commands.is_empty()
    }
}

impl Command for MacroCommand {
    fn execute(&self, notification: &Notification) -> command::Result<()> {
        for (index, sub_command) in self.sub_commands.iter().enumerate() {
            sub_command
                .execute(notification)
                .map_err(|source| CommandError::SubCommand {
                    index,
                    source: Box::new(source),
                })?;
        }
        Ok(())
    }
}
