//! Session state shared by element commands
//!
//! A [`Session`] bundles the settings, the protocol collaborators, the
//! capabilities snapshot reported by the browser driver and the command
//! registry.

pub mod config;
pub mod session;

pub use config::{Settings, WebdriverSettings};
pub use session::Session;
