//! Session capabilities and browser quirk rules
//!
//! Capabilities are normalized once when they are ingested from the session:
//! the legacy `version` field takes precedence over `browserVersion`, and the
//! major version is parsed a single time. Quirk rules are then evaluated
//! against the typed snapshot.
//!
//! Version matching is a heuristic. An absent or unparseable version never
//! satisfies a rule, so such sessions always take the standard protocol path.

use serde::Serialize;
use serde_json::Value;
use std::fmt;

/// Browser families that quirk rules can target
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BrowserName {
    Chrome,
    Firefox,
    Safari,
    Edge,
}

impl BrowserName {
    pub fn as_str(&self) -> &'static str {
        match self {
            BrowserName::Chrome => "chrome",
            BrowserName::Firefox => "firefox",
            BrowserName::Safari => "safari",
            BrowserName::Edge => "MicrosoftEdge",
        }
    }

    /// Case-insensitive exact match against a reported browser name
    pub fn matches(&self, reported: &str) -> bool {
        reported.eq_ignore_ascii_case(self.as_str())
    }
}

impl fmt::Display for BrowserName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Read-only snapshot of the automated browser's reported capabilities
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Capabilities {
    /// Reported browser name, empty when the session did not report one
    pub browser_name: String,

    /// Modern `browserVersion` capability
    #[serde(skip_serializing_if = "Option::is_none")]
    pub browser_version: Option<String>,

    /// Legacy `version` capability
    #[serde(skip_serializing_if = "Option::is_none")]
    pub legacy_version: Option<String>,

    /// Whether the browser driver runs as a locally managed process
    pub uses_managed_process: bool,

    #[serde(skip)]
    major_version: Option<i64>,
}

impl Capabilities {
    pub fn new(browser_name: impl Into<String>) -> Self {
        Self {
            browser_name: browser_name.into(),
            browser_version: None,
            legacy_version: None,
            uses_managed_process: false,
            major_version: None,
        }
    }

    /// Builder method: set the modern `browserVersion`
    pub fn with_browser_version(mut self, version: impl Into<String>) -> Self {
        self.browser_version = Some(version.into());
        self.major_version = parse_major_version(self.effective_version());
        self
    }

    /// Builder method: set the legacy `version`
    pub fn with_legacy_version(mut self, version: impl Into<String>) -> Self {
        self.legacy_version = Some(version.into());
        self.major_version = parse_major_version(self.effective_version());
        self
    }

    /// Builder method: mark the browser as a locally managed process
    pub fn managed_process(mut self, managed: bool) -> Self {
        self.uses_managed_process = managed;
        self
    }

    /// Ingest the untyped capabilities object returned when a session is created
    ///
    /// Missing or non-string fields are tolerated; they simply leave the
    /// corresponding value unset so that no quirk rule can match on them.
    pub fn from_session_value(raw: &Value, uses_managed_process: bool) -> Self {
        let browser_name = raw
            .get("browserName")
            .and_then(Value::as_str)
            .unwrap_or_default()
            .to_string();

        let mut capabilities = Self::new(browser_name).managed_process(uses_managed_process);
        capabilities.browser_version = raw.get("browserVersion").and_then(version_string);
        capabilities.legacy_version = raw.get("version").and_then(version_string);
        capabilities.major_version = parse_major_version(capabilities.effective_version());

        if capabilities.browser_name.is_empty() {
            log::debug!("Session capabilities carry no browserName; quirk rules will not apply");
        }

        capabilities
    }

    /// The version used for compatibility decisions: legacy `version` when set, else `browserVersion`
    pub fn effective_version(&self) -> Option<&str> {
        self.legacy_version
            .as_deref()
            .or(self.browser_version.as_deref())
    }

    /// Leading integer of the effective version, if it parses
    pub fn major_version(&self) -> Option<i64> {
        self.major_version
    }
}

/// Empty strings and zero count as absent, other numbers are accepted as-is
fn version_string(value: &Value) -> Option<String> {
    match value {
        Value::String(s) if !s.is_empty() => Some(s.clone()),
        Value::Number(n) if n.as_f64() != Some(0.0) => Some(n.to_string()),
        _ => None,
    }
}

/// Parse the leading integer of a version string: `"13.1.2"` gives 13, `"abc"` gives `None`
pub fn parse_major_version(version: Option<&str>) -> Option<i64> {
    let trimmed = version?.trim_start();
    let (negative, unsigned) = match trimmed.as_bytes().first() {
        Some(b'-') => (true, &trimmed[1..]),
        Some(b'+') => (false, &trimmed[1..]),
        _ => (false, trimmed),
    };

    let digits_len = unsigned.bytes().take_while(u8::is_ascii_digit).count();
    if digits_len == 0 {
        return None;
    }

    let magnitude = unsigned[..digits_len].parse::<i64>().unwrap_or(i64::MAX);
    Some(if negative { -magnitude } else { magnitude })
}

/// Conditions under which a command swaps its canonical protocol call for an alternate one
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct QuirkRule {
    /// Browser family the quirk applies to
    pub browser: BrowserName,

    /// Minimum major version (inclusive)
    pub min_major_version: i64,

    /// Required process-management mode, `None` when either mode qualifies
    pub managed_process: Option<bool>,
}

impl QuirkRule {
    pub const fn new(browser: BrowserName, min_major_version: i64) -> Self {
        Self {
            browser,
            min_major_version,
            managed_process: None,
        }
    }

    /// Builder method: require a specific process-management mode
    pub const fn requires_managed_process(mut self, managed: bool) -> Self {
        self.managed_process = Some(managed);
        self
    }
}

/// Decide whether `rule` applies to the session
///
/// Absent capabilities, an unknown browser name, or an unparseable version
/// all resolve to `false`.
pub fn applies_quirk(capabilities: Option<&Capabilities>, rule: &QuirkRule) -> bool {
    let Some(capabilities) = capabilities else {
        return false;
    };

    let Some(major) = capabilities.major_version() else {
        return false;
    };

    let applies = rule.browser.matches(&capabilities.browser_name)
        && major >= rule.min_major_version
        && rule
            .managed_process
            .is_none_or(|required| required == capabilities.uses_managed_process);

    log::trace!(
        "Quirk rule {:?} against {} {:?} (managed: {}): {}",
        rule,
        capabilities.browser_name,
        capabilities.effective_version(),
        capabilities.uses_managed_process,
        applies
    );

    applies
}
