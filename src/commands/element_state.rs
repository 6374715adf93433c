use crate::commands::{CommandContext, ElementCommand};
use crate::error::Result;
use crate::protocol::actions;
use crate::result::{self, CommandResult};
use async_trait::async_trait;

/// Determine whether an element is enabled
#[derive(Default)]
pub struct IsEnabledCommand;

#[async_trait]
impl ElementCommand for IsEnabledCommand {
    fn name(&self) -> &str {
        "is_enabled"
    }

    async fn protocol_action(&self, context: &CommandContext<'_>) -> Result<CommandResult> {
        let raw = context.execute_protocol_action(actions::IS_ELEMENT_ENABLED, vec![]).await?;
        Ok(result::passthrough(raw))
    }
}

/// Determine whether a checkbox, radio button or option is selected
#[derive(Default)]
pub struct IsSelectedCommand;

#[async_trait]
impl ElementCommand for IsSelectedCommand {
    fn name(&self) -> &str {
        "is_selected"
    }

    async fn protocol_action(&self, context: &CommandContext<'_>) -> Result<CommandResult> {
        let raw = context.execute_protocol_action(actions::IS_ELEMENT_SELECTED, vec![]).await?;
        Ok(result::passthrough(raw))
    }
}

/// Determine whether an element exists; a missing element yields `false` rather than an error
#[derive(Default)]
pub struct IsPresentCommand;

#[async_trait]
impl ElementCommand for IsPresentCommand {
    fn name(&self) -> &str {
        "is_present"
    }

    fn on_not_found(&self) -> Option<CommandResult> {
        Some(CommandResult::success(false))
    }

    async fn protocol_action(&self, _context: &CommandContext<'_>) -> Result<CommandResult> {
        Ok(CommandResult::success(true))
    }
}
