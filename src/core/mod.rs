//! Core module - shared infrastructure for browser-pilot
//!
//! Foundational types, configuration, credentials and error handling.

pub mod config;
pub mod credentials;
pub mod error;
pub mod types;

pub use config::{file_url, Config};
pub use credentials::load_api_key;
pub use error::{ActionError, PageError, PilotError, Result};
pub use types::*;
