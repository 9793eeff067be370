//! Common error handling utilities for the diagnosis prediction service
//!
//! This crate holds the error vocabulary shared by the service crates:
//!
//! - **`CareError`**: process-level failures (configuration, artifact loading,
//!   binding the listener) that end the process during startup
//! - **Error codes**: stable identifiers placed in API error bodies so clients
//!   can branch on them without matching message text
//!
//! # Example
//!
//! ```rust
//! use error_common::{codes, CareError};
//!
//! fn require_port(raw: &str) -> error_common::Result<u16> {
//!     raw.parse()
//!         .map_err(|_| CareError::ConfigError(format!("invalid port: {raw}")))
//! }
//!
//! assert!(require_port("8080").is_ok());
//! assert_eq!(codes::validation::UNKNOWN_SYMPTOM, "VALIDATION_1004");
//! ```

pub mod codes;
pub mod types;

pub use types::*;
