use crate::capabilities::{BrowserName, QuirkRule};
use crate::commands::{CommandContext, ElementCommand};
use crate::error::Result;
use crate::protocol::actions;
use crate::result::{self, CommandResult};
use async_trait::async_trait;
use serde_json::json;

/// Safari 12+ driven through a locally managed safaridriver reports displayedness
/// unreliably; the element's `hidden` property is read instead.
pub const HIDDEN_PROPERTY_QUIRK: QuirkRule = QuirkRule::new(BrowserName::Safari, 12).requires_managed_process(true);

/// Determine whether an element is currently displayed
///
/// ```text
/// is_visible("#main ul li a.first")
/// is_visible("css selector", "#main ul li a.first")
/// is_visible({"selector": "#main ul li a", "index": 1, "suppressNotFoundErrors": true})
/// ```
///
/// The result value is a boolean.
#[derive(Default)]
pub struct IsVisibleCommand;

#[async_trait]
impl ElementCommand for IsVisibleCommand {
    fn name(&self) -> &str {
        "is_visible"
    }

    async fn protocol_action(&self, context: &CommandContext<'_>) -> Result<CommandResult> {
        if context.applies_quirk(&HIDDEN_PROPERTY_QUIRK) {
            log::debug!("is_visible: reading the hidden property for {}", context.selector);
            let raw = context
                .execute_protocol_action(actions::GET_ELEMENT_PROPERTY, vec![json!("hidden")])
                .await?;
            return Ok(result::normalize(raw, result::invert_hidden));
        }

        let raw = context.execute_protocol_action(actions::IS_ELEMENT_DISPLAYED, vec![]).await?;
        Ok(result::passthrough(raw))
    }
}
