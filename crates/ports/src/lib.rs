//! # zabbix-web-ports
//!
//! Port traits for the zabbix-web-config hexagonal architecture.
//!
//! Configuration resolution is pure over its inputs; the only outside
//! capability it needs is asking whether a file exists. That capability is
//! defined here so the resolver never touches the filesystem directly.

pub mod filesystem;

pub use filesystem::*;

/// Returns the ports crate version.
#[must_use]
pub const fn ports_crate_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}
