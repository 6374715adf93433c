use crate::commands::{self, CommandContext, ElementCommand};
use crate::error::Result;
use crate::protocol::actions;
use crate::result::{self, CommandResult};
use async_trait::async_trait;
use serde_json::{Value, json};

/// Retrieve the visible text of an element
#[derive(Default)]
pub struct GetTextCommand;

#[async_trait]
impl ElementCommand for GetTextCommand {
    fn name(&self) -> &str {
        "get_text"
    }

    async fn protocol_action(&self, context: &CommandContext<'_>) -> Result<CommandResult> {
        let raw = context.execute_protocol_action(actions::GET_ELEMENT_TEXT, vec![]).await?;
        Ok(result::passthrough(raw))
    }
}

/// Retrieve the tag name of an element
#[derive(Default)]
pub struct GetTagNameCommand;

#[async_trait]
impl ElementCommand for GetTagNameCommand {
    fn name(&self) -> &str {
        "get_tag_name"
    }

    async fn protocol_action(&self, context: &CommandContext<'_>) -> Result<CommandResult> {
        let raw = context.execute_protocol_action(actions::GET_ELEMENT_TAG_NAME, vec![]).await?;
        Ok(result::passthrough(raw))
    }
}

/// Retrieve an attribute value: `get_attribute(selector, attribute)`
#[derive(Default)]
pub struct GetAttributeCommand;

#[async_trait]
impl ElementCommand for GetAttributeCommand {
    fn name(&self) -> &str {
        "get_attribute"
    }

    fn extra_args_count(&self) -> usize {
        1
    }

    fn validate_extra_args(&self, extra_args: &[Value]) -> Result<()> {
        commands::string_arg(extra_args, 0).map(|_| ())
    }

    async fn protocol_action(&self, context: &CommandContext<'_>) -> Result<CommandResult> {
        let attribute = context.extra_arg_str(0)?;
        let raw = context
            .execute_protocol_action(actions::GET_ELEMENT_ATTRIBUTE, vec![json!(attribute)])
            .await?;
        Ok(result::passthrough(raw))
    }
}

/// Retrieve a DOM property value: `get_property(selector, property)`
#[derive(Default)]
pub struct GetPropertyCommand;

#[async_trait]
impl ElementCommand for GetPropertyCommand {
    fn name(&self) -> &str {
        "get_property"
    }

    fn extra_args_count(&self) -> usize {
        1
    }

    fn validate_extra_args(&self, extra_args: &[Value]) -> Result<()> {
        commands::string_arg(extra_args, 0).map(|_| ())
    }

    async fn protocol_action(&self, context: &CommandContext<'_>) -> Result<CommandResult> {
        let property = context.extra_arg_str(0)?;
        let raw = context
            .execute_protocol_action(actions::GET_ELEMENT_PROPERTY, vec![json!(property)])
            .await?;
        Ok(result::passthrough(raw))
    }
}
