use crate::protocol::ProtocolResult;
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Status reported when a suppressed lookup found no element
pub const STATUS_NOT_FOUND: i64 = -1;

/// Value delivered to the caller of an element command
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CommandResult {
    pub status: i64,
    pub value: Value,
}

impl CommandResult {
    /// Successful result carrying `value`
    pub fn success(value: impl Into<Value>) -> Self {
        Self {
            status: 0,
            value: value.into(),
        }
    }

    /// Negative result for a suppressed not-found lookup
    pub fn not_found() -> Self {
        Self {
            status: STATUS_NOT_FOUND,
            value: Value::Null,
        }
    }

    pub fn is_success(&self) -> bool {
        self.status == 0
    }

    /// Value as a boolean, for predicate commands
    pub fn as_bool(&self) -> Option<bool> {
        self.value.as_bool()
    }
}

/// Map a raw protocol result onto the command result contract
///
/// An absent status counts as success.
pub fn normalize<F>(raw: ProtocolResult, value_transform: F) -> CommandResult
where
    F: FnOnce(Value) -> Value,
{
    CommandResult {
        status: raw.status.unwrap_or(0),
        value: value_transform(raw.value),
    }
}

/// Normalize without touching the value
pub fn passthrough(raw: ProtocolResult) -> CommandResult {
    normalize(raw, |value| value)
}

/// Turn a "hidden" property into a "displayed" boolean: only an explicit `false` means visible
pub fn invert_hidden(hidden: Value) -> Value {
    Value::Bool(hidden == Value::Bool(false))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_absent_status_is_success() {
        let result = passthrough(ProtocolResult::from_value(true));
        assert_eq!(result, CommandResult::success(true));
        assert!(result.is_success());
    }

    #[test]
    fn test_status_preserved() {
        let result = passthrough(ProtocolResult::with_status(13, "unknown error"));
        assert_eq!(result.status, 13);
        assert_eq!(result.value, json!("unknown error"));
    }

    #[test]
    fn test_invert_hidden() {
        assert_eq!(invert_hidden(json!(false)), json!(true));
        assert_eq!(invert_hidden(json!(true)), json!(false));
        assert_eq!(invert_hidden(Value::Null), json!(false));
        assert_eq!(invert_hidden(json!("false")), json!(false));
    }

    #[test]
    fn test_normalize_with_transform() {
        let result = normalize(ProtocolResult::from_value(true), invert_hidden);
        assert_eq!(result, CommandResult { status: 0, value: json!(false) });
        assert_eq!(result.as_bool(), Some(false));
    }

    #[test]
    fn test_not_found() {
        let result = CommandResult::not_found();
        assert_eq!(result.status, -1);
        assert!(result.value.is_null());
        assert!(!result.is_success());
    }
}
