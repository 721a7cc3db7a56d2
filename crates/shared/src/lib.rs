//! # zabbix-web-shared
//!
//! Foundational types shared by every crate in the workspace:
//!
//! - [`ErrorEnvelope`] and [`ErrorCode`] for structured, serializable errors
//! - [`SecretString`] and [`is_secret_key`] for keeping credentials out of
//!   logs and operator-facing output
//!
//! This crate has no workspace dependencies.

#![deny(clippy::unwrap_used)]
#![deny(clippy::expect_used)]

pub mod errors;
pub mod redaction;

pub use errors::{ErrorClass, ErrorCode, ErrorEnvelope, ErrorKind, ErrorMetadata};
pub use redaction::{REDACTED, SecretString, is_secret_key, redact_if_secret};

/// Returns the shared crate version.
#[must_use]
pub const fn shared_crate_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}
