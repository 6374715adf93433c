//! In-memory automation backend
//!
//! [`ScriptedBackend`] implements both [`ProtocolExecutor`] and
//! [`ElementLocator`] from canned data: a table of selector values to element
//! ids and a table of protocol action names to results. Every protocol call
//! and lookup is recorded so callers can check what was issued. It backs the
//! test suite and the `element-probe` binary.

use crate::browser::Settings;
use crate::error::{CommandError, Result};
use crate::protocol::{ElementId, ElementLocator, ProtocolExecutor, ProtocolResult};
use crate::selector::LocatorStrategy;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::HashMap;
use std::sync::{Mutex, PoisonError};

/// Elements registered for one selector value
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScriptedElements {
    /// Element ids in document order
    pub ids: Vec<String>,

    /// Lookup attempt (1-based) from which the elements are reported; earlier attempts see nothing
    #[serde(default)]
    pub appear_after: usize,
}

/// Canned outcome of one protocol action
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum ScriptedResponse {
    Result(ProtocolResult),
    Failure(String),
}

/// Scenario document loaded by the probe binary
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Scenario {
    #[serde(default)]
    pub settings: Settings,

    /// Raw session capabilities, omitted for a session that was never established
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub capabilities: Option<Value>,

    #[serde(default)]
    pub elements: HashMap<String, ScriptedElements>,

    #[serde(default)]
    pub responses: HashMap<String, ScriptedResponse>,
}

#[derive(Debug, Default)]
struct Recorder {
    calls: Vec<(String, Vec<Value>)>,
    lookups: HashMap<String, usize>,
}

/// Backend answering from canned tables
#[derive(Debug, Default)]
pub struct ScriptedBackend {
    elements: HashMap<String, ScriptedElements>,
    responses: HashMap<String, ScriptedResponse>,
    recorder: Mutex<Recorder>,
}

impl ScriptedBackend {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a backend from a scenario's element and response tables
    pub fn from_scenario(scenario: &Scenario) -> Self {
        Self {
            elements: scenario.elements.clone(),
            responses: scenario.responses.clone(),
            recorder: Mutex::default(),
        }
    }

    /// Builder method: elements matching `selector` from the first lookup on
    pub fn with_elements(self, selector: &str, ids: &[&str]) -> Self {
        self.with_elements_after(selector, ids, 1)
    }

    /// Builder method: elements matching `selector` from lookup attempt `attempt` on
    pub fn with_elements_after(mut self, selector: &str, ids: &[&str], attempt: usize) -> Self {
        self.elements.insert(
            selector.to_string(),
            ScriptedElements {
                ids: ids.iter().map(|id| id.to_string()).collect(),
                appear_after: attempt,
            },
        );
        self
    }

    /// Builder method: result returned for `action`
    pub fn with_response(mut self, action: &str, result: ProtocolResult) -> Self {
        self.responses
            .insert(action.to_string(), ScriptedResponse::Result(result));
        self
    }

    /// Builder method: `action` is rejected with `reason`
    pub fn with_failure(mut self, action: &str, reason: &str) -> Self {
        self.responses
            .insert(action.to_string(), ScriptedResponse::Failure(reason.to_string()));
        self
    }

    fn recorder(&self) -> std::sync::MutexGuard<'_, Recorder> {
        self.recorder.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Protocol calls issued so far, in order
    pub fn calls(&self) -> Vec<(String, Vec<Value>)> {
        self.recorder().calls.clone()
    }

    /// Names of the protocol actions issued so far, in order
    pub fn actions(&self) -> Vec<String> {
        self.recorder()
            .calls
            .iter()
            .map(|(action, _)| action.clone())
            .collect()
    }

    /// Number of lookups made for `selector`
    pub fn lookups(&self, selector: &str) -> usize {
        self.recorder().lookups.get(selector).copied().unwrap_or(0)
    }
}

#[async_trait]
impl ProtocolExecutor for ScriptedBackend {
    async fn execute_protocol_action(&self, action: &str, args: Vec<Value>) -> Result<ProtocolResult> {
        self.recorder().calls.push((action.to_string(), args));

        match self.responses.get(action) {
            Some(ScriptedResponse::Result(result)) => Ok(result.clone()),
            Some(ScriptedResponse::Failure(reason)) => Err(CommandError::protocol(action, reason)),
            None => Err(CommandError::protocol(action, "no scripted response")),
        }
    }
}

#[async_trait]
impl ElementLocator for ScriptedBackend {
    async fn find_elements(&self, strategy: LocatorStrategy, value: &str) -> Result<Vec<ElementId>> {
        let attempt = {
            let mut recorder = self.recorder();
            let count = recorder.lookups.entry(value.to_string()).or_insert(0);
            *count += 1;
            *count
        };

        log::trace!("Scripted lookup #{} for {} \"{}\"", attempt, strategy, value);

        Ok(self
            .elements
            .get(value)
            .filter(|elements| attempt >= elements.appear_after)
            .map(|elements| elements.ids.iter().map(|id| ElementId::new(id.as_str())).collect::<Vec<_>>())
            .unwrap_or_default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[tokio::test]
    async fn test_lookup_counts_and_delay() {
        let backend = ScriptedBackend::new().with_elements_after("#x", &["e-1"], 2);

        let first = backend.find_elements(LocatorStrategy::Css, "#x").await.unwrap();
        let second = backend.find_elements(LocatorStrategy::Css, "#x").await.unwrap();

        assert!(first.is_empty());
        assert_eq!(second, vec![ElementId::new("e-1")]);
        assert_eq!(backend.lookups("#x"), 2);
    }

    #[tokio::test]
    async fn test_unscripted_action_fails() {
        let backend = ScriptedBackend::new();
        let err = backend.execute_protocol_action("getTitle", vec![]).await.unwrap_err();
        assert!(matches!(err, CommandError::ProtocolError { .. }));
        assert_eq!(backend.actions(), vec!["getTitle"]);
    }

    #[test]
    fn test_scenario_from_json() {
        let scenario: Scenario = serde_json::from_value(json!({
            "settings": {"webdriver": {"startProcess": true}},
            "capabilities": {"browserName": "safari", "browserVersion": "13"},
            "elements": {"#x": {"ids": ["e-1"]}},
            "responses": {
                "getElementProperty": {"result": {"value": false}},
                "isElementDisplayed": {"failure": "no such window"}
            }
        }))
        .unwrap();

        assert!(scenario.settings.webdriver.start_process);
        assert_eq!(scenario.elements["#x"].ids, vec!["e-1"]);
        assert_eq!(
            scenario.responses["getElementProperty"],
            ScriptedResponse::Result(ProtocolResult::from_value(false))
        );

        let backend = ScriptedBackend::from_scenario(&scenario);
        assert_eq!(backend.lookups("#x"), 0);
    }
}
