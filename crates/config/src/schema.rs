//! Resolved configuration record and its JSON views.
//!
//! The full serialization is what the PHP frontend consumes, so it includes
//! the database password verbatim. Operator-facing output goes through
//! [`ResolvedConfig::to_json_value`] with [`SecretExposure::Redacted`].

use crate::env::EnvValue;
use crate::maintenance::MaintenanceMode;
use schemars::{JsonSchema, Schema, schema_for};
use serde::{Serialize, Serializer};
use serde_json::Value;
use std::collections::BTreeMap;
use zabbix_web_shared::{REDACTED, SecretString};

const PASSWORD_KEY: &str = "databasePassword";

/// Fully resolved frontend configuration.
///
/// Built once at process startup by [`crate::ConfigResolver::resolve`] and
/// never mutated afterwards. Keys serialize in camelCase.
#[derive(Debug, Clone, PartialEq, Serialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct ResolvedConfig {
    /// Database driver type, verbatim from `DB_SERVER_TYPE`.
    pub database_type: String,
    /// Database host.
    pub database_host: String,
    /// Database port, kept as text (`""` selects the driver default).
    pub database_port: String,
    /// Database name.
    pub database_name: String,
    /// Database user.
    pub database_user: String,
    /// Database password.
    #[serde(serialize_with = "serialize_exposed")]
    #[schemars(with = "String")]
    pub database_password: SecretString,
    /// Database schema (PostgreSQL only).
    pub database_schema: String,
    /// Use TLS to the database.
    pub tls_encryption_enabled: bool,
    /// Verify the database host name against its certificate.
    pub tls_verify_host: bool,
    /// TLS client key file.
    pub tls_key_file: String,
    /// TLS client certificate file.
    pub tls_cert_file: String,
    /// TLS CA file.
    pub tls_ca_file: String,
    /// TLS cipher list.
    pub tls_cipher_list: String,
    /// Store float history with the IEEE 754 double range.
    pub use_ieee754_double_range: bool,
    /// Zabbix server host.
    pub server_host: String,
    /// Zabbix server port.
    pub server_port: String,
    /// Installation display name.
    pub server_name: String,
    /// History storage endpoint: one URL, or a map of value type to URL.
    pub history_storage_url: EnvValue,
    /// Value types kept in history storage.
    pub history_storage_types: Vec<String>,
    /// SAML service provider private key path, or `""`.
    pub sso_service_private_key_path: String,
    /// SAML service provider certificate path, or `""`.
    pub sso_service_cert_path: String,
    /// SAML identity provider certificate path, or `""`.
    pub sso_idp_cert_path: String,
    /// Extra SAML settings.
    pub sso_settings: BTreeMap<String, Value>,
    /// GUI maintenance mode, when enabled.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub maintenance: Option<MaintenanceMode>,
}

/// Whether secrets appear in a JSON view.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SecretExposure {
    /// Replace non-empty secrets with the redaction placeholder.
    #[default]
    Redacted,
    /// Emit secrets verbatim.
    Revealed,
}

impl ResolvedConfig {
    /// Serialize to a JSON value, redacting the password unless revealed.
    ///
    /// An empty password stays `""` so operators can tell it is unset.
    pub fn to_json_value(&self, exposure: SecretExposure) -> serde_json::Result<Value> {
        let mut value = serde_json::to_value(self)?;
        if exposure == SecretExposure::Redacted && !self.database_password.is_empty() {
            if let Some(object) = value.as_object_mut() {
                object.insert(PASSWORD_KEY.to_string(), Value::String(REDACTED.to_string()));
            }
        }
        Ok(value)
    }
}

fn serialize_exposed<S>(secret: &SecretString, serializer: S) -> Result<S::Ok, S::Error>
where
    S: Serializer,
{
    serializer.serialize_str(secret.expose())
}

/// JSON Schema for [`ResolvedConfig`].
#[must_use]
pub fn config_schema() -> Schema {
    schema_for!(ResolvedConfig)
}
