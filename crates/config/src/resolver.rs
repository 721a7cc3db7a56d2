//! Environment + filesystem probe -> [`ResolvedConfig`].

use crate::env::{
    ENV_DB_DOUBLE_IEEE754, ENV_DB_SERVER_DBNAME, ENV_DB_SERVER_HOST, ENV_DB_SERVER_PASS,
    ENV_DB_SERVER_PORT, ENV_DB_SERVER_SCHEMA, ENV_DB_SERVER_TYPE, ENV_DB_SERVER_USER,
    ENV_ZBX_DB_CA_FILE, ENV_ZBX_DB_CERT_FILE, ENV_ZBX_DB_CIPHER_LIST, ENV_ZBX_DB_ENCRYPTION,
    ENV_ZBX_DB_KEY_FILE, ENV_ZBX_DB_VERIFY_HOST, ENV_ZBX_HISTORYSTORAGETYPES,
    ENV_ZBX_HISTORYSTORAGEURL, ENV_ZBX_SERVER_HOST, ENV_ZBX_SERVER_NAME, ENV_ZBX_SERVER_PORT,
    ENV_ZBX_SSO_IDP_CERT, ENV_ZBX_SSO_SETTINGS, ENV_ZBX_SSO_SP_CERT, ENV_ZBX_SSO_SP_KEY, EnvValue,
    RawEnvironment,
};
use crate::maintenance::resolve_maintenance;
use crate::schema::ResolvedConfig;
use serde::Serialize;
use std::fmt;
use zabbix_web_ports::FileProbe;
use zabbix_web_shared::SecretString;

/// Fixed location of the SAML service provider private key.
pub const SSO_SP_KEY_PATH: &str = "/etc/zabbix/web/certs/sp.key";
/// Fixed location of the SAML service provider certificate.
pub const SSO_SP_CERT_PATH: &str = "/etc/zabbix/web/certs/sp.crt";
/// Fixed location of the SAML identity provider certificate.
pub const SSO_IDP_CERT_PATH: &str = "/etc/zabbix/web/certs/idp.crt";

/// Database type used by the PostgreSQL image when `DB_SERVER_TYPE` is empty.
pub const POSTGRES_DATABASE_TYPE: &str = "POSTGRESQL";

/// Image flavour whose defaults apply during resolution.
///
/// `Environment` reads every field from the environment. `Postgres` matches
/// images that bake the database type and IEEE 754 setting into the template.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum Profile {
    /// Every field comes from the environment.
    #[default]
    Environment,
    /// PostgreSQL image defaults.
    Postgres,
}

impl Profile {
    /// Stable lowercase name.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Environment => "environment",
            Self::Postgres => "postgres",
        }
    }
}

impl fmt::Display for Profile {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        formatter.write_str(self.as_str())
    }
}

/// Resolves a [`ResolvedConfig`] from a captured environment and a file probe.
///
/// Resolution is infallible and deterministic: the same environment and
/// filesystem state always produce an equal record.
pub struct ConfigResolver<'a> {
    env: &'a RawEnvironment,
    probe: &'a dyn FileProbe,
    profile: Profile,
}

impl<'a> ConfigResolver<'a> {
    /// Create a resolver using the default [`Profile::Environment`].
    #[must_use]
    pub fn new(env: &'a RawEnvironment, probe: &'a dyn FileProbe) -> Self {
        Self {
            env,
            probe,
            profile: Profile::default(),
        }
    }

    /// Select the image profile.
    #[must_use]
    pub const fn with_profile(mut self, profile: Profile) -> Self {
        self.profile = profile;
        self
    }

    /// The active profile.
    #[must_use]
    pub const fn profile(&self) -> Profile {
        self.profile
    }

    /// Resolve the full configuration record.
    #[must_use]
    pub fn resolve(&self) -> ResolvedConfig {
        let env = self.env;
        let config = ResolvedConfig {
            database_type: self.database_type(),
            database_host: env.resolve_string_field(ENV_DB_SERVER_HOST),
            database_port: env.resolve_string_field(ENV_DB_SERVER_PORT),
            database_name: env.resolve_string_field(ENV_DB_SERVER_DBNAME),
            database_user: env.resolve_string_field(ENV_DB_SERVER_USER),
            database_password: SecretString::from(env.resolve_string_field(ENV_DB_SERVER_PASS)),
            database_schema: env.resolve_string_field(ENV_DB_SERVER_SCHEMA),
            tls_encryption_enabled: env.resolve_bool_field(ENV_ZBX_DB_ENCRYPTION),
            tls_verify_host: env.resolve_bool_field(ENV_ZBX_DB_VERIFY_HOST),
            tls_key_file: env.resolve_string_field(ENV_ZBX_DB_KEY_FILE),
            tls_cert_file: env.resolve_string_field(ENV_ZBX_DB_CERT_FILE),
            tls_ca_file: env.resolve_string_field(ENV_ZBX_DB_CA_FILE),
            tls_cipher_list: env.resolve_string_field(ENV_ZBX_DB_CIPHER_LIST),
            use_ieee754_double_range: self.use_ieee754_double_range(),
            server_host: env.resolve_string_field(ENV_ZBX_SERVER_HOST),
            server_port: env.resolve_string_field(ENV_ZBX_SERVER_PORT),
            server_name: env.resolve_string_field(ENV_ZBX_SERVER_NAME),
            history_storage_url: env
                .resolve_json_or_raw(ENV_ZBX_HISTORYSTORAGEURL, EnvValue::default()),
            history_storage_types: env.resolve_string_list(ENV_ZBX_HISTORYSTORAGETYPES),
            sso_service_private_key_path: self
                .resolve_certificate_path(SSO_SP_KEY_PATH, ENV_ZBX_SSO_SP_KEY),
            sso_service_cert_path: self
                .resolve_certificate_path(SSO_SP_CERT_PATH, ENV_ZBX_SSO_SP_CERT),
            sso_idp_cert_path: self.resolve_certificate_path(SSO_IDP_CERT_PATH, ENV_ZBX_SSO_IDP_CERT),
            sso_settings: env.resolve_json_object(ENV_ZBX_SSO_SETTINGS),
            maintenance: resolve_maintenance(env),
        };

        tracing::debug!(
            profile = %self.profile,
            database_type = %config.database_type,
            tls = config.tls_encryption_enabled,
            history_types = config.history_storage_types.len(),
            maintenance = config.maintenance.is_some(),
            "resolved frontend configuration"
        );
        config
    }

    /// Pick a certificate path: the fixed path if it exists, else the path
    /// named by `env_var` if that exists, else `""`.
    ///
    /// An unset or empty `env_var` never matches, even if `""` would
    /// otherwise probe as an existing path.
    #[must_use]
    pub fn resolve_certificate_path(&self, fixed_path: &str, env_var: &str) -> String {
        if self.probe.exists_str(fixed_path) {
            return fixed_path.to_string();
        }

        match self.env.get(env_var) {
            Some(candidate) if self.probe.exists_str(candidate) => candidate.to_string(),
            Some(candidate) if !candidate.is_empty() => {
                tracing::debug!(env_var, path = candidate, "certificate path does not exist");
                String::new()
            },
            _ => String::new(),
        }
    }

    fn database_type(&self) -> String {
        match self.profile {
            Profile::Environment => self.env.resolve_string_field(ENV_DB_SERVER_TYPE),
            Profile::Postgres => self
                .env
                .resolve_string_or(ENV_DB_SERVER_TYPE, POSTGRES_DATABASE_TYPE),
        }
    }

    fn use_ieee754_double_range(&self) -> bool {
        match self.profile {
            Profile::Environment => self.env.resolve_bool_field(ENV_DB_DOUBLE_IEEE754),
            Profile::Postgres => true,
        }
    }
}

impl fmt::Debug for ConfigResolver<'_> {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        formatter
            .debug_struct("ConfigResolver")
            .field("env", self.env)
            .field("profile", &self.profile)
            .finish_non_exhaustive()
    }
}
