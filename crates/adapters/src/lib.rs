//! # zabbix-web-adapters
//!
//! Adapter implementations for ports (currently the local filesystem probe).
//! This crate depends on `ports` only; it must never import `config` or the CLI.

pub mod fs;

pub use fs::LocalFileProbe;

/// Returns the adapters crate version.
#[must_use]
pub const fn adapters_crate_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}
