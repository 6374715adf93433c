//! Boundary with the remote automation protocol
//!
//! The transport that actually talks to the browser driver lives outside this
//! crate. It is reached through two collaborator traits:
//! - [`ProtocolExecutor`]: issues one named protocol action
//! - [`ElementLocator`]: returns the elements currently matching a selector

use crate::error::Result;
use crate::selector::LocatorStrategy;
use async_trait::async_trait;
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;
use std::fmt;

/// Names of the protocol actions issued by the built-in commands
pub mod actions {
    pub const IS_ELEMENT_DISPLAYED: &str = "isElementDisplayed";
    pub const IS_ELEMENT_ENABLED: &str = "isElementEnabled";
    pub const IS_ELEMENT_SELECTED: &str = "isElementSelected";
    pub const GET_ELEMENT_PROPERTY: &str = "getElementProperty";
    pub const GET_ELEMENT_ATTRIBUTE: &str = "getElementAttribute";
    pub const GET_ELEMENT_TEXT: &str = "getElementText";
    pub const GET_ELEMENT_TAG_NAME: &str = "getElementTagName";
}

/// Opaque reference to a remote element
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ElementId(pub String);

impl ElementId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ElementId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for ElementId {
    fn from(id: &str) -> Self {
        Self(id.to_string())
    }
}

/// Raw outcome of a protocol action
///
/// `status` is a legacy field: it may be missing or carry a non-numeric
/// value, both of which deserialize to `None`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ProtocolResult {
    #[serde(
        default,
        deserialize_with = "deserialize_status",
        skip_serializing_if = "Option::is_none"
    )]
    pub status: Option<i64>,

    #[serde(default)]
    pub value: Value,
}

impl ProtocolResult {
    /// Result without a status field
    pub fn from_value(value: impl Into<Value>) -> Self {
        Self {
            status: None,
            value: value.into(),
        }
    }

    /// Result with an explicit status
    pub fn with_status(status: i64, value: impl Into<Value>) -> Self {
        Self {
            status: Some(status),
            value: value.into(),
        }
    }
}

fn deserialize_status<'de, D>(deserializer: D) -> std::result::Result<Option<i64>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = Option::<Value>::deserialize(deserializer)?;
    Ok(raw.and_then(|v| v.as_i64()))
}

/// Issues named actions against the remote automation backend
#[async_trait]
pub trait ProtocolExecutor: Send + Sync {
    /// Execute one protocol action; for element actions the first argument is the element id
    async fn execute_protocol_action(&self, action: &str, args: Vec<Value>) -> Result<ProtocolResult>;
}

/// Looks up elements in the current document
#[async_trait]
pub trait ElementLocator: Send + Sync {
    /// Return every element currently matching the selector, in document order
    ///
    /// An empty vector means "nothing matched yet"; callers handle waiting.
    async fn find_elements(&self, strategy: LocatorStrategy, value: &str) -> Result<Vec<ElementId>>;
}
