use crate::error::Result;
use crate::selector::LocatorStrategy;
use serde::{Deserialize, Serialize};

/// Default element lookup timeout
pub const DEFAULT_TIMEOUT_MS: u64 = 5000;

/// Default interval between element lookup attempts
pub const DEFAULT_RETRY_INTERVAL_MS: u64 = 500;

/// Browser driver settings
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WebdriverSettings {
    /// Whether the driver is spawned and managed locally rather than already running remotely
    #[serde(default, alias = "start_process")]
    pub start_process: bool,
}

/// Session settings consulted by element commands
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Settings {
    /// Element lookup timeout in milliseconds
    #[serde(default = "default_timeout_ms")]
    pub default_timeout_ms: u64,

    /// Element lookup polling interval in milliseconds
    #[serde(default = "default_retry_interval_ms")]
    pub retry_interval_ms: u64,

    /// Strategy applied to bare selectors
    #[serde(default)]
    pub default_locator_strategy: LocatorStrategy,

    #[serde(default)]
    pub webdriver: WebdriverSettings,
}

fn default_timeout_ms() -> u64 {
    DEFAULT_TIMEOUT_MS
}

fn default_retry_interval_ms() -> u64 {
    DEFAULT_RETRY_INTERVAL_MS
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            default_timeout_ms: DEFAULT_TIMEOUT_MS,
            retry_interval_ms: DEFAULT_RETRY_INTERVAL_MS,
            default_locator_strategy: LocatorStrategy::Css,
            webdriver: WebdriverSettings::default(),
        }
    }
}

impl Settings {
    pub fn new() -> Self {
        Self::default()
    }

    /// Load settings from a JSON document; missing fields take their defaults
    pub fn from_json_str(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    /// Builder method: set the lookup timeout
    pub fn default_timeout_ms(mut self, timeout_ms: u64) -> Self {
        self.default_timeout_ms = timeout_ms;
        self
    }

    /// Builder method: set the lookup polling interval
    pub fn retry_interval_ms(mut self, interval_ms: u64) -> Self {
        self.retry_interval_ms = interval_ms;
        self
    }

    /// Builder method: set the strategy for bare selectors
    pub fn default_locator_strategy(mut self, strategy: LocatorStrategy) -> Self {
        self.default_locator_strategy = strategy;
        self
    }

    /// Builder method: set `webdriver.start_process`
    pub fn start_process(mut self, start_process: bool) -> Self {
        self.webdriver.start_process = start_process;
        self
    }
}
