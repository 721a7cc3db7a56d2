//! GUI maintenance mode.
//!
//! When `ZBX_DENY_GUI_ACCESS` is exactly `"true"`, the frontend refuses
//! interactive access except from an allow-list of client addresses.

use crate::env::{
    ENV_ZBX_DENY_GUI_ACCESS, ENV_ZBX_GUI_ACCESS_IP_RANGE, ENV_ZBX_GUI_WARNING_MSG, RawEnvironment,
};
use schemars::JsonSchema;
use serde::Serialize;

/// Maintenance-mode settings, present only while GUI access is denied.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct MaintenanceMode {
    /// Client addresses that may still use the GUI.
    pub allowed_ip_ranges: Vec<String>,
    /// Message shown to everyone else.
    pub warning_message: String,
}

impl MaintenanceMode {
    /// Returns true when `ip` is on the allow-list (exact match).
    #[must_use]
    pub fn allows(&self, ip: &str) -> bool {
        self.allowed_ip_ranges.iter().any(|allowed| allowed == ip)
    }
}

/// Resolve maintenance mode from the environment.
///
/// Returns `None` unless `ZBX_DENY_GUI_ACCESS` is exactly `"true"`. A
/// malformed allow-list degrades to an empty list, which denies everyone.
#[must_use]
pub fn resolve_maintenance(env: &RawEnvironment) -> Option<MaintenanceMode> {
    if !env.resolve_bool_field(ENV_ZBX_DENY_GUI_ACCESS) {
        return None;
    }

    Some(MaintenanceMode {
        allowed_ip_ranges: env.resolve_string_list(ENV_ZBX_GUI_ACCESS_IP_RANGE),
        warning_message: env.resolve_string_field(ENV_ZBX_GUI_WARNING_MSG),
    })
}
