//! # zabbix-web-config
//!
//! Turns a captured environment plus filesystem probes into the
//! [`ResolvedConfig`] record the Zabbix web frontend reads at startup.
//! This crate depends on `ports` and `shared` only.

/// Post-resolution diagnostics.
pub mod diagnostics;
/// Environment capture and field coercion.
pub mod env;
/// Env file loading and effective-config helpers.
pub mod load;
/// GUI maintenance mode.
pub mod maintenance;
/// Environment + probe -> resolved config.
pub mod resolver;
/// Resolved config record and JSON Schema export.
pub mod schema;
/// Placeholder templates.
pub mod template;

pub use diagnostics::{
    Diagnostic, KNOWN_DATABASE_TYPES, KNOWN_HISTORY_TYPES, Severity, diagnose, has_errors,
};
pub use env::{EnvValue, KNOWN_ENV_VARS, RawEnvironment};
pub use load::{EnvFileError, load_effective_config, load_env_file};
pub use maintenance::{MaintenanceMode, resolve_maintenance};
pub use resolver::{
    ConfigResolver, POSTGRES_DATABASE_TYPE, Profile, SSO_IDP_CERT_PATH, SSO_SP_CERT_PATH,
    SSO_SP_KEY_PATH,
};
pub use schema::{ResolvedConfig, SecretExposure, config_schema};
pub use template::{Rendered, placeholders, render_placeholders};

/// Returns the config crate version.
#[must_use]
pub const fn config_crate_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}
