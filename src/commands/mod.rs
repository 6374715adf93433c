//! Element command base and registry
//!
//! Every element command follows the same lifecycle:
//! 1. parse the call arguments into a [`SelectorDescriptor`]
//! 2. locate the element, polling until the lookup timeout elapses
//! 3. run the command's [`ElementCommand::protocol_action`] hook
//! 4. deliver one [`CommandResult`]
//!
//! A missing element yields the command's [`ElementCommand::on_not_found`]
//! result when it has one. Otherwise it fails with
//! [`CommandError::ElementNotFound`] or, when the selector asks for
//! suppression, yields `{status: -1, value: null}`.
//! Protocol failures from the hook are returned unmodified and never retried.

pub mod element_data;
pub mod element_state;
pub mod is_visible;

pub use element_data::{GetAttributeCommand, GetPropertyCommand, GetTagNameCommand, GetTextCommand};
pub use element_state::{IsEnabledCommand, IsPresentCommand, IsSelectedCommand};
pub use is_visible::IsVisibleCommand;

use crate::{browser::{Session, Settings},
            capabilities::{self, Capabilities, QuirkRule},
            error::{CommandError, Result},
            protocol::{ElementId, ProtocolResult},
            result::CommandResult,
            selector::{self, SelectorDescriptor}};
use async_trait::async_trait;
use indexmap::IndexMap;
use serde_json::Value;
use std::{sync::Arc, time::Duration};
use tokio::time::{Instant, sleep};

/// A command that targets one element and issues one protocol action
#[async_trait]
pub trait ElementCommand: Send + Sync {
    /// Name the command is registered under
    fn name(&self) -> &str;

    /// Number of positional arguments consumed after the selector
    fn extra_args_count(&self) -> usize {
        0
    }

    /// Whether the element must be located before the protocol action runs
    fn requires_element(&self) -> bool {
        true
    }

    /// Check the trailing arguments before any lookup happens
    fn validate_extra_args(&self, _extra_args: &[Value]) -> Result<()> {
        Ok(())
    }

    /// Result delivered when no element is found, taking precedence over suppression
    fn on_not_found(&self) -> Option<CommandResult> {
        None
    }

    /// Issue the command's protocol action and shape its result
    async fn protocol_action(&self, context: &CommandContext<'_>) -> Result<CommandResult>;
}

/// Per-invocation state handed to [`ElementCommand::protocol_action`]
pub struct CommandContext<'a> {
    pub session: &'a Session,

    /// Selector the invocation was resolved from
    pub selector: SelectorDescriptor,

    /// Located element, `None` for element-independent commands
    pub element: Option<ElementId>,

    /// Trailing positional arguments, `extra_args_count` of them
    pub extra_args: Vec<Value>,

    /// Capabilities snapshot taken when the invocation started
    pub capabilities: Option<Arc<Capabilities>>,
}

impl CommandContext<'_> {
    pub fn settings(&self) -> &Settings {
        self.session.settings()
    }

    pub fn capabilities(&self) -> Option<&Capabilities> {
        self.capabilities.as_deref()
    }

    /// Evaluate a quirk rule against this invocation's capabilities snapshot
    pub fn applies_quirk(&self, rule: &QuirkRule) -> bool {
        capabilities::applies_quirk(self.capabilities(), rule)
    }

    /// Trailing argument `index` as a string
    pub fn extra_arg_str(&self, index: usize) -> Result<&str> {
        string_arg(&self.extra_args, index)
    }

    /// Issue a protocol action, prefixing the located element id to `args`
    pub async fn execute_protocol_action(&self, action: &str, args: Vec<Value>) -> Result<ProtocolResult> {
        let mut full_args = Vec::with_capacity(args.len() + 1);
        if let Some(element) = &self.element {
            full_args.push(Value::String(element.0.clone()));
        }
        full_args.extend(args);

        log::debug!("Executing protocol action '{}' for {}", action, self.selector);
        self.session.executor().execute_protocol_action(action, full_args).await
    }
}

/// Trailing argument `index` of `extra_args` as a string
pub fn string_arg(extra_args: &[Value], index: usize) -> Result<&str> {
    extra_args
        .get(index)
        .and_then(Value::as_str)
        .ok_or_else(|| CommandError::InvalidArgument(format!("Argument {} must be a string", index + 1)))
}

/// Run `command` with raw call arguments against `session`
pub async fn execute<C>(command: &C, session: &Session, args: &[Value]) -> Result<CommandResult>
where
    C: ElementCommand + ?Sized,
{
    let settings = session.settings();
    let parsed = selector::parse(args, command.extra_args_count(), settings.default_locator_strategy)?;
    command.validate_extra_args(&parsed.extra_args)?;
    let capabilities = session.capabilities();

    let element = if command.requires_element() {
        match locate_element(session, &parsed.selector).await? {
            Some(element) => Some(element),
            None => {
                if let Some(result) = command.on_not_found() {
                    log::debug!("{}: no element for {}", command.name(), parsed.selector);
                    return Ok(result);
                }
                return not_found(command, &parsed.selector, settings);
            }
        }
    } else {
        None
    };

    let context = CommandContext {
        session,
        selector: parsed.selector,
        element,
        extra_args: parsed.extra_args,
        capabilities,
    };

    command.protocol_action(&context).await
}

/// Suppressed negative result or `ElementNotFound`, per the selector
fn not_found<C>(command: &C, selector: &SelectorDescriptor, settings: &Settings) -> Result<CommandResult>
where
    C: ElementCommand + ?Sized,
{
    if selector.suppress_not_found {
        log::debug!("{}: no element for {}, returning negative result", command.name(), selector);
        return Ok(CommandResult::not_found());
    }

    let timeout_ms = selector.timeout_ms.unwrap_or(settings.default_timeout_ms);
    Err(CommandError::ElementNotFound(format!(
        "Timed out while waiting for element {} to be present for {} milliseconds",
        selector, timeout_ms
    )))
}

/// Callback-style execution: `callback` sees the outcome, which is also returned
pub async fn execute_with_callback<C, F>(
    command: &C,
    session: &Session,
    args: &[Value],
    callback: F,
) -> Result<CommandResult>
where
    C: ElementCommand + ?Sized,
    F: FnOnce(&Result<CommandResult>),
{
    let outcome = execute(command, session, args).await;
    callback(&outcome);
    outcome
}

/// Poll the locator until the selected match exists or the lookup timeout elapses
async fn locate_element(session: &Session, selector: &SelectorDescriptor) -> Result<Option<ElementId>> {
    let settings = session.settings();
    let timeout = Duration::from_millis(selector.timeout_ms.unwrap_or(settings.default_timeout_ms));
    let interval = Duration::from_millis(selector.retry_interval_ms.unwrap_or(settings.retry_interval_ms).max(1));
    let deadline = Instant::now() + timeout;
    let position = selector.position();
    let mut attempts = 0u32;

    loop {
        attempts += 1;
        let mut found = session.locator().find_elements(selector.strategy, &selector.value).await?;
        if found.len() > position {
            log::trace!("Located {} after {} attempt(s)", selector, attempts);
            return Ok(Some(found.swap_remove(position)));
        }

        let now = Instant::now();
        if now >= deadline {
            log::debug!(
                "Lookup for {} gave up after {} attempt(s): {} match(es)",
                selector,
                attempts,
                found.len()
            );
            return Ok(None);
        }

        sleep(interval.min(deadline - now)).await;
    }
}

/// Registry of element commands keyed by name, in registration order
#[derive(Default)]
pub struct CommandRegistry {
    commands: IndexMap<String, Arc<dyn ElementCommand>>,
}

impl CommandRegistry {
    /// Create an empty registry
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a registry with the built-in commands
    pub fn with_defaults() -> Self {
        let mut registry = Self::new();
        registry.register(IsVisibleCommand);
        registry.register(IsEnabledCommand);
        registry.register(IsSelectedCommand);
        registry.register(IsPresentCommand);
        registry.register(GetTextCommand);
        registry.register(GetTagNameCommand);
        registry.register(GetAttributeCommand);
        registry.register(GetPropertyCommand);
        registry
    }

    /// Register a command, replacing any command with the same name
    pub fn register<C: ElementCommand + 'static>(&mut self, command: C) {
        self.commands.insert(command.name().to_string(), Arc::new(command));
    }

    pub fn get(&self, name: &str) -> Option<Arc<dyn ElementCommand>> {
        self.commands.get(name).cloned()
    }

    pub fn contains(&self, name: &str) -> bool {
        self.commands.contains_key(name)
    }

    /// Registered command names, in registration order
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.commands.keys().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.commands.len()
    }

    pub fn is_empty(&self) -> bool {
        self.commands.is_empty()
    }

    /// Execute a command by name
    pub async fn execute(&self, name: &str, args: &[Value], session: &Session) -> Result<CommandResult> {
        let command = self
            .get(name)
            .ok_or_else(|| CommandError::UnknownCommand(name.to_string()))?;
        execute(command.as_ref(), session, args).await
    }
}
