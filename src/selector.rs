//! Selector model
//!
//! Element commands accept several call shapes:
//! - `(selector)` with the session's default locator strategy
//! - `(using, selector)` with an explicit locator strategy
//! - `(selector_object)` carrying the selector plus lookup options
//!
//! All of them are parsed into one immutable [`SelectorDescriptor`].

use crate::error::{CommandError, Result};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::{fmt, str::FromStr};

/// Method used to identify elements within a document
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema)]
pub enum LocatorStrategy {
    #[default]
    #[serde(rename = "css selector", alias = "css")]
    Css,
    #[serde(rename = "xpath")]
    XPath,
    #[serde(rename = "link text")]
    LinkText,
    #[serde(rename = "partial link text")]
    PartialLinkText,
    #[serde(rename = "tag name")]
    TagName,
}

impl LocatorStrategy {
    /// Every recognized strategy
    pub const ALL: [LocatorStrategy; 5] = [
        LocatorStrategy::Css,
        LocatorStrategy::XPath,
        LocatorStrategy::LinkText,
        LocatorStrategy::PartialLinkText,
        LocatorStrategy::TagName,
    ];

    /// Protocol name of the strategy
    pub fn as_str(&self) -> &'static str {
        match self {
            LocatorStrategy::Css => "css selector",
            LocatorStrategy::XPath => "xpath",
            LocatorStrategy::LinkText => "link text",
            LocatorStrategy::PartialLinkText => "partial link text",
            LocatorStrategy::TagName => "tag name",
        }
    }
}

impl fmt::Display for LocatorStrategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for LocatorStrategy {
    type Err = CommandError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "css selector" | "css" => Ok(LocatorStrategy::Css),
            "xpath" => Ok(LocatorStrategy::XPath),
            "link text" => Ok(LocatorStrategy::LinkText),
            "partial link text" => Ok(LocatorStrategy::PartialLinkText),
            "tag name" => Ok(LocatorStrategy::TagName),
            _ => Err(CommandError::InvalidArgument(format!(
                "Unrecognized locator strategy '{}'",
                s
            ))),
        }
    }
}

/// Selector object form, e.g. `{"selector": "#main li", "index": 1, "timeout": 2000}`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct SelectorObject {
    /// The selector value (CSS, XPath, link text, ...)
    pub selector: String,

    /// Locator strategy override
    #[serde(default, alias = "using", skip_serializing_if = "Option::is_none")]
    pub locate_strategy: Option<String>,

    /// 0-based position among the matching elements
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub index: Option<i64>,

    /// Lookup timeout in milliseconds, overrides the session default
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub timeout: Option<u64>,

    /// Lookup polling interval in milliseconds, overrides the session default
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub retry_interval: Option<u64>,

    /// Report a missing element as a negative result instead of an error
    #[serde(default)]
    pub suppress_not_found_errors: bool,
}

impl SelectorObject {
    pub fn new(selector: impl Into<String>) -> Self {
        Self {
            selector: selector.into(),
            locate_strategy: None,
            index: None,
            timeout: None,
            retry_interval: None,
            suppress_not_found_errors: false,
        }
    }

    /// JSON schema of the selector object
    pub fn json_schema() -> Value {
        serde_json::to_value(schemars::schema_for!(SelectorObject)).unwrap_or(Value::Null)
    }
}

/// Selector as supplied by a caller: a bare string or a selector object
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(untagged)]
pub enum SelectorArg {
    /// Bare selector value
    Plain(String),
    /// Selector with options
    Object(SelectorObject),
}

impl From<&str> for SelectorArg {
    fn from(selector: &str) -> Self {
        SelectorArg::Plain(selector.to_string())
    }
}

impl From<String> for SelectorArg {
    fn from(selector: String) -> Self {
        SelectorArg::Plain(selector)
    }
}

impl From<SelectorObject> for SelectorArg {
    fn from(object: SelectorObject) -> Self {
        SelectorArg::Object(object)
    }
}

impl TryFrom<&Value> for SelectorArg {
    type Error = CommandError;

    fn try_from(value: &Value) -> Result<Self> {
        match value {
            Value::String(s) => Ok(SelectorArg::Plain(s.clone())),
            Value::Object(_) => serde_json::from_value(value.clone())
                .map(SelectorArg::Object)
                .map_err(|e| CommandError::InvalidArgument(format!("Invalid selector object: {}", e))),
            other => Err(CommandError::InvalidArgument(format!(
                "Selector must be a string or an object, got {}",
                other
            ))),
        }
    }
}

/// Canonical, validated description of how to locate one element
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SelectorDescriptor {
    pub strategy: LocatorStrategy,
    pub value: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub index: Option<usize>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub timeout_ms: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub retry_interval_ms: Option<u64>,
    #[serde(default)]
    pub suppress_not_found: bool,
}

impl SelectorDescriptor {
    /// Create a descriptor, rejecting an empty selector value
    pub fn new(strategy: LocatorStrategy, value: impl Into<String>) -> Result<Self> {
        let value = value.into();
        if value.trim().is_empty() {
            return Err(CommandError::InvalidArgument(
                "Selector value must not be empty".to_string(),
            ));
        }

        Ok(Self {
            strategy,
            value,
            index: None,
            timeout_ms: None,
            retry_interval_ms: None,
            suppress_not_found: false,
        })
    }

    /// Builder method: select the n-th match (0-based)
    pub fn with_index(mut self, index: usize) -> Self {
        self.index = Some(index);
        self
    }

    /// Builder method: override the lookup timeout
    pub fn with_timeout_ms(mut self, timeout_ms: u64) -> Self {
        self.timeout_ms = Some(timeout_ms);
        self
    }

    /// Builder method: report a missing element as a negative result
    pub fn suppress_not_found(mut self, suppress: bool) -> Self {
        self.suppress_not_found = suppress;
        self
    }

    /// Parse the arguments of a command that consumes no trailing arguments
    pub fn parse(args: &[Value], default_strategy: LocatorStrategy) -> Result<Self> {
        parse(args, 0, default_strategy).map(|parsed| parsed.selector)
    }

    /// Build a descriptor from a typed selector argument
    ///
    /// A strategy carried by a selector object wins over `using`, which wins over `default_strategy`.
    pub fn from_arg(
        arg: SelectorArg,
        using: Option<LocatorStrategy>,
        default_strategy: LocatorStrategy,
    ) -> Result<Self> {
        let strategy = using.unwrap_or(default_strategy);

        match arg {
            SelectorArg::Plain(value) => Self::new(strategy, value),
            SelectorArg::Object(object) => {
                let strategy = match object.locate_strategy.as_deref() {
                    Some(name) => name.parse()?,
                    None => strategy,
                };

                let index = match object.index {
                    Some(i) if i < 0 => {
                        return Err(CommandError::InvalidArgument(format!(
                            "Selector index must be >= 0, got {}",
                            i
                        )));
                    }
                    Some(i) => Some(i as usize),
                    None => None,
                };

                let mut descriptor = Self::new(strategy, object.selector)?;
                descriptor.index = index;
                descriptor.timeout_ms = object.timeout;
                descriptor.retry_interval_ms = object.retry_interval;
                descriptor.suppress_not_found = object.suppress_not_found_errors;
                Ok(descriptor)
            }
        }
    }

    /// Position of the targeted element among the matches
    pub fn position(&self) -> usize {
        self.index.unwrap_or(0)
    }
}

impl fmt::Display for SelectorDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} \"{}\"", self.strategy, self.value)?;
        if let Some(index) = self.index {
            write!(f, "[{}]", index)?;
        }
        Ok(())
    }
}

/// Selector plus the trailing positional arguments a command consumes
#[derive(Debug, Clone, PartialEq)]
pub struct ParsedArgs {
    pub selector: SelectorDescriptor,
    pub extra_args: Vec<Value>,
}

/// Parse caller-supplied arguments
///
/// The call shape is decided by the argument count: `extra_args_count + 2`
/// arguments mean `(using, selector, extras..)`, `extra_args_count + 1` mean
/// `(selector, extras..)`.
pub fn parse(
    args: &[Value],
    extra_args_count: usize,
    default_strategy: LocatorStrategy,
) -> Result<ParsedArgs> {
    let (using, selector, rest) = if args.len() == extra_args_count + 2 {
        (Some(&args[0]), &args[1], &args[2..])
    } else if args.len() == extra_args_count + 1 {
        (None, &args[0], &args[1..])
    } else {
        return Err(CommandError::InvalidArgument(format!(
            "Expected {} or {} arguments, got {}",
            extra_args_count + 1,
            extra_args_count + 2,
            args.len()
        )));
    };

    let using = match using {
        Some(Value::String(name)) => Some(name.parse::<LocatorStrategy>()?),
        Some(other) => {
            return Err(CommandError::InvalidArgument(format!(
                "Locator strategy must be a string, got {}",
                other
            )));
        }
        None => None,
    };

    let selector = SelectorDescriptor::from_arg(SelectorArg::try_from(selector)?, using, default_strategy)?;
    log::trace!("Parsed selector {}", selector);

    Ok(ParsedArgs {
        selector,
        extra_args: rest.to_vec(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_parse_bare_selector_uses_default_strategy() {
        let descriptor = SelectorDescriptor::parse(&[json!("#main ul li a.first")], LocatorStrategy::Css).unwrap();

        assert_eq!(descriptor.strategy, LocatorStrategy::Css);
        assert_eq!(descriptor.value, "#main ul li a.first");
        assert_eq!(descriptor.index, None);
        assert!(!descriptor.suppress_not_found);
    }

    #[test]
    fn test_parse_explicit_strategy() {
        let descriptor =
            SelectorDescriptor::parse(&[json!("xpath"), json!("//div[@id='x']")], LocatorStrategy::Css).unwrap();

        assert_eq!(descriptor.strategy, LocatorStrategy::XPath);
        assert_eq!(descriptor.value, "//div[@id='x']");
    }

    #[test]
    fn test_parse_selector_object() {
        let args = [json!({
            "selector": "#main ul li a",
            "index": 1,
            "timeout": 2000,
            "suppressNotFoundErrors": true
        })];

        let descriptor = SelectorDescriptor::parse(&args, LocatorStrategy::Css).unwrap();
        assert_eq!(descriptor.value, "#main ul li a");
        assert_eq!(descriptor.index, Some(1));
        assert_eq!(descriptor.position(), 1);
        assert_eq!(descriptor.timeout_ms, Some(2000));
        assert!(descriptor.suppress_not_found);
    }

    #[test]
    fn test_selector_object_strategy_override() {
        let args = [json!({"selector": "Sign in", "locateStrategy": "link text"})];
        let descriptor = SelectorDescriptor::parse(&args, LocatorStrategy::Css).unwrap();
        assert_eq!(descriptor.strategy, LocatorStrategy::LinkText);
    }

    #[test]
    fn test_unknown_strategy_rejected() {
        let err = SelectorDescriptor::parse(&[json!("shadow"), json!("#x")], LocatorStrategy::Css).unwrap_err();
        assert!(matches!(err, CommandError::InvalidArgument(_)));
    }

    #[test]
    fn test_missing_selector_rejected() {
        let err = SelectorDescriptor::parse(&[json!({"index": 0})], LocatorStrategy::Css).unwrap_err();
        assert!(matches!(err, CommandError::InvalidArgument(_)));

        let err = SelectorDescriptor::parse(&[json!("   ")], LocatorStrategy::Css).unwrap_err();
        assert!(matches!(err, CommandError::InvalidArgument(_)));
    }

    #[test]
    fn test_negative_index_rejected() {
        let err = SelectorDescriptor::parse(&[json!({"selector": "#x", "index": -1})], LocatorStrategy::Css)
            .unwrap_err();
        assert!(matches!(err, CommandError::InvalidArgument(_)));
    }

    #[test]
    fn test_non_string_selector_rejected() {
        let err = SelectorDescriptor::parse(&[json!(42)], LocatorStrategy::Css).unwrap_err();
        assert!(matches!(err, CommandError::InvalidArgument(_)));
    }

    #[test]
    fn test_parse_with_extra_args() {
        let parsed = parse(&[json!("#link"), json!("href")], 1, LocatorStrategy::Css).unwrap();
        assert_eq!(parsed.selector.value, "#link");
        assert_eq!(parsed.extra_args, vec![json!("href")]);

        let parsed = parse(&[json!("css"), json!("#link"), json!("href")], 1, LocatorStrategy::XPath).unwrap();
        assert_eq!(parsed.selector.strategy, LocatorStrategy::Css);
        assert_eq!(parsed.extra_args, vec![json!("href")]);
    }

    #[test]
    fn test_wrong_argument_count_rejected() {
        let err = parse(&[], 0, LocatorStrategy::Css).unwrap_err();
        assert!(matches!(err, CommandError::InvalidArgument(_)));

        let err = parse(&[json!("a"), json!("b"), json!("c")], 0, LocatorStrategy::Css).unwrap_err();
        assert!(matches!(err, CommandError::InvalidArgument(_)));
    }

    #[test]
    fn test_strategy_serialization() {
        let strategy: LocatorStrategy = serde_json::from_value(json!("css")).unwrap();
        assert_eq!(strategy, LocatorStrategy::Css);
        assert_eq!(serde_json::to_value(LocatorStrategy::PartialLinkText).unwrap(), json!("partial link text"));

        for strategy in LocatorStrategy::ALL {
            assert_eq!(strategy.as_str().parse::<LocatorStrategy>().unwrap(), strategy);
        }
    }

    #[test]
    fn test_selector_arg_untagged() {
        let plain: SelectorArg = serde_json::from_value(json!("#x")).unwrap();
        assert_eq!(plain, SelectorArg::Plain("#x".to_string()));

        let object: SelectorArg = serde_json::from_value(json!({"selector": "#x", "index": 2})).unwrap();
        match object {
            SelectorArg::Object(object) => assert_eq!(object.index, Some(2)),
            _ => panic!("Expected selector object"),
        }
    }

    #[test]
    fn test_selector_object_schema() {
        let schema = SelectorObject::json_schema();
        assert!(schema.is_object());
        assert!(schema.to_string().contains("suppressNotFoundErrors"));
    }

    #[test]
    fn test_descriptor_display() {
        let descriptor = SelectorDescriptor::new(LocatorStrategy::Css, "#x").unwrap().with_index(1);
        assert_eq!(descriptor.to_string(), "css selector \"#x\"[1]");
    }
}
