use crate::{browser::config::Settings,
            capabilities::Capabilities,
            commands::CommandRegistry,
            error::Result,
            protocol::{ElementLocator, ProtocolExecutor},
            result::CommandResult,
            selector::SelectorArg};
use serde_json::Value;
use std::sync::Arc;

/// An automation session as seen by element commands
pub struct Session {
    settings: Settings,

    /// Issues protocol actions on behalf of commands
    executor: Arc<dyn ProtocolExecutor>,

    /// Resolves selectors to remote elements
    locator: Arc<dyn ElementLocator>,

    /// Capabilities snapshot, absent until the session is established
    capabilities: Option<Arc<Capabilities>>,

    /// Commands available through `execute_command`
    command_registry: CommandRegistry,
}

impl Session {
    /// Create a session from separate collaborators
    pub fn new(settings: Settings, executor: Arc<dyn ProtocolExecutor>, locator: Arc<dyn ElementLocator>) -> Self {
        Self {
            settings,
            executor,
            locator,
            capabilities: None,
            command_registry: CommandRegistry::with_defaults(),
        }
    }

    /// Create a session from one backend implementing both collaborator traits
    pub fn with_backend<B>(settings: Settings, backend: Arc<B>) -> Self
    where
        B: ProtocolExecutor + ElementLocator + 'static,
    {
        let executor: Arc<dyn ProtocolExecutor> = backend.clone();
        let locator: Arc<dyn ElementLocator> = backend;
        Self::new(settings, executor, locator)
    }

    /// Ingest the capabilities object returned when the driver session was created
    ///
    /// The process-management flag is taken from `settings.webdriver.start_process`.
    pub fn establish(&mut self, raw_capabilities: &Value) {
        let capabilities = Capabilities::from_session_value(raw_capabilities, self.settings.webdriver.start_process);
        log::debug!(
            "Session established: {} {:?} (managed process: {})",
            capabilities.browser_name,
            capabilities.effective_version(),
            capabilities.uses_managed_process
        );
        self.capabilities = Some(Arc::new(capabilities));
    }

    /// Builder method: use an already typed capabilities snapshot
    pub fn with_capabilities(mut self, capabilities: Capabilities) -> Self {
        self.capabilities = Some(Arc::new(capabilities));
        self
    }

    /// Shared capabilities snapshot, if the session is established
    pub fn capabilities(&self) -> Option<Arc<Capabilities>> {
        self.capabilities.clone()
    }

    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    pub fn executor(&self) -> &dyn ProtocolExecutor {
        self.executor.as_ref()
    }

    pub fn locator(&self) -> &dyn ElementLocator {
        self.locator.as_ref()
    }

    /// Get the command registry
    pub fn command_registry(&self) -> &CommandRegistry {
        &self.command_registry
    }

    /// Get mutable command registry
    pub fn command_registry_mut(&mut self) -> &mut CommandRegistry {
        &mut self.command_registry
    }

    /// Execute a registered command by name with raw call arguments
    pub async fn execute_command(&self, name: &str, args: &[Value]) -> Result<CommandResult> {
        self.command_registry.execute(name, args, self).await
    }

    /// Determine whether the element matching `selector` is displayed
    pub async fn is_visible(&self, selector: impl Into<SelectorArg>) -> Result<CommandResult> {
        let selector: SelectorArg = selector.into();
        let arg = serde_json::to_value(selector)?;
        self.execute_command("is_visible", &[arg]).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scripted::ScriptedBackend;
    use serde_json::json;

    fn session() -> Session {
        Session::with_backend(Settings::new().start_process(true), Arc::new(ScriptedBackend::new()))
    }

    #[test]
    fn test_capabilities_absent_before_establish() {
        let session = session();
        assert!(session.capabilities().is_none());
    }

    #[test]
    fn test_establish_uses_start_process_setting() {
        let mut session = session();
        session.establish(&json!({"browserName": "safari", "browserVersion": "13.1"}));

        let caps = session.capabilities().expect("capabilities should be set");
        assert_eq!(caps.browser_name, "safari");
        assert_eq!(caps.major_version(), Some(13));
        assert!(caps.uses_managed_process);
    }

    #[test]
    fn test_capabilities_snapshot_is_shared() {
        let mut session = session();
        session.establish(&json!({"browserName": "chrome"}));

        let first = session.capabilities().unwrap();
        let second = session.capabilities().unwrap();
        assert!(Arc::ptr_eq(&first, &second));
    }

    #[test]
    fn test_default_commands_registered() {
        let session = session();
        assert!(session.command_registry().contains("is_visible"));
        assert!(session.command_registry().contains("is_present"));
    }
}
