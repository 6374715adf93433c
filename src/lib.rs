//! # element-commands
//!
//! The command-execution core of a WebDriver-style browser automation client.
//! It turns element queries such as "is this element visible?" into calls against
//! a remote automation protocol, branches around browser-specific quirks, and
//! normalizes the protocol's responses into one result shape.
//!
//! ## Features
//!
//! - **Selector Model**: bare selectors, `(strategy, selector)` pairs and selector objects with options
//! - **Element Command Base**: element lookup with timeouts, polling and not-found suppression
//! - **Capability Inspector**: per-browser, per-version quirk rules evaluated against session capabilities
//! - **Result Normalizer**: `{status, value}` results regardless of which protocol call was made
//!
//! The transport that talks to the browser driver is not part of this crate; it is
//! plugged in through the [`ProtocolExecutor`] and [`ElementLocator`] traits.
//!
//! ## Usage
//!
//! ```rust,no_run
//! use element_commands::scripted::ScriptedBackend;
//! use element_commands::protocol::{actions, ProtocolResult};
//! use element_commands::{Session, Settings};
//! use serde_json::json;
//! use std::sync::Arc;
//!
//! # async fn run() -> element_commands::Result<()> {
//! let backend = Arc::new(
//!     ScriptedBackend::new()
//!         .with_elements("#main ul li a.first", &["element-1"])
//!         .with_response(actions::IS_ELEMENT_DISPLAYED, ProtocolResult::from_value(true)),
//! );
//!
//! let mut session = Session::with_backend(Settings::new(), backend);
//! session.establish(&json!({"browserName": "chrome", "browserVersion": "100"}));
//!
//! // Bare selector
//! let result = session.is_visible("#main ul li a.first").await?;
//! assert_eq!(result.value, json!(true));
//!
//! // Explicit strategy, through the registry
//! session
//!     .execute_command("is_visible", &[json!("css selector"), json!("#main ul li a.first")])
//!     .await?;
//!
//! // Selector object with options
//! session
//!     .execute_command(
//!         "is_visible",
//!         &[json!({"selector": "#main ul li a", "index": 1, "suppressNotFoundErrors": true})],
//!     )
//!     .await?;
//! # Ok(())
//! # }
//! ```
//!
//! ## Module Overview
//!
//! - [`selector`]: call shapes and the canonical selector descriptor
//! - [`commands`]: the element command trait, execution lifecycle, registry and built-in commands
//! - [`capabilities`]: typed session capabilities and quirk rules
//! - [`protocol`]: protocol results and the collaborator traits
//! - [`result`]: command results and normalization
//! - [`browser`]: session and settings
//! - [`scripted`]: in-memory backend for tests and the probe binary
//! - [`error`]: error types and result aliases

pub mod browser;
pub mod capabilities;
pub mod commands;
pub mod error;
pub mod protocol;
pub mod result;
pub mod scripted;
pub mod selector;

pub use browser::{Session, Settings, WebdriverSettings};
pub use capabilities::{BrowserName, Capabilities, QuirkRule, applies_quirk};
pub use commands::{CommandContext, CommandRegistry, ElementCommand, IsVisibleCommand};
pub use error::{CommandError, Result};
pub use protocol::{ElementId, ElementLocator, ProtocolExecutor, ProtocolResult};
pub use result::{CommandResult, normalize};
pub use selector::{LocatorStrategy, SelectorArg, SelectorDescriptor, SelectorObject};
