//! Raw environment capture and per-field coercion.
//!
//! Every operation here is infallible: a missing or malformed variable
//! degrades to a documented default instead of failing startup.
//!
//! - strings resolve verbatim, or to `""` when unset
//! - booleans are `true` only for the exact, case-sensitive literal `"true"`
//! - JSON-ish values tolerate single-quoted pseudo-JSON (`['a','b']`)

use schemars::JsonSchema;
use serde::Serialize;
use serde_json::Value;
use std::collections::BTreeMap;
use std::fmt;
use zabbix_web_shared::redact_if_secret;

/// Env var: database driver type (`POSTGRESQL`, `MYSQL`, ...).
pub const ENV_DB_SERVER_TYPE: &str = "DB_SERVER_TYPE";
/// Env var: database host.
pub const ENV_DB_SERVER_HOST: &str = "DB_SERVER_HOST";
/// Env var: database port.
pub const ENV_DB_SERVER_PORT: &str = "DB_SERVER_PORT";
/// Env var: database name.
pub const ENV_DB_SERVER_DBNAME: &str = "DB_SERVER_DBNAME";
/// Env var: database user.
pub const ENV_DB_SERVER_USER: &str = "DB_SERVER_USER";
/// Env var: database password (secret).
pub const ENV_DB_SERVER_PASS: &str = "DB_SERVER_PASS";
/// Env var: database schema (PostgreSQL).
pub const ENV_DB_SERVER_SCHEMA: &str = "DB_SERVER_SCHEMA";
/// Env var: Zabbix server host.
pub const ENV_ZBX_SERVER_HOST: &str = "ZBX_SERVER_HOST";
/// Env var: Zabbix server port.
pub const ENV_ZBX_SERVER_PORT: &str = "ZBX_SERVER_PORT";
/// Env var: Zabbix installation display name.
pub const ENV_ZBX_SERVER_NAME: &str = "ZBX_SERVER_NAME";
/// Env var: enable TLS to the database (`"true"` only).
pub const ENV_ZBX_DB_ENCRYPTION: &str = "ZBX_DB_ENCRYPTION";
/// Env var: TLS client key file.
pub const ENV_ZBX_DB_KEY_FILE: &str = "ZBX_DB_KEY_FILE";
/// Env var: TLS client certificate file.
pub const ENV_ZBX_DB_CERT_FILE: &str = "ZBX_DB_CERT_FILE";
/// Env var: TLS CA file.
pub const ENV_ZBX_DB_CA_FILE: &str = "ZBX_DB_CA_FILE";
/// Env var: verify the database host name (`"true"` only).
pub const ENV_ZBX_DB_VERIFY_HOST: &str = "ZBX_DB_VERIFY_HOST";
/// Env var: TLS cipher list.
pub const ENV_ZBX_DB_CIPHER_LIST: &str = "ZBX_DB_CIPHER_LIST";
/// Env var: IEEE 754 double range for float history (`"true"` only).
pub const ENV_DB_DOUBLE_IEEE754: &str = "DB_DOUBLE_IEEE754";
/// Env var: history storage URL, either a plain URL or a JSON map.
pub const ENV_ZBX_HISTORYSTORAGEURL: &str = "ZBX_HISTORYSTORAGEURL";
/// Env var: JSON array of value types kept in history storage.
pub const ENV_ZBX_HISTORYSTORAGETYPES: &str = "ZBX_HISTORYSTORAGETYPES";
/// Env var: SAML service provider certificate path.
pub const ENV_ZBX_SSO_SP_CERT: &str = "ZBX_SSO_SP_CERT";
/// Env var: SAML service provider private key path.
pub const ENV_ZBX_SSO_SP_KEY: &str = "ZBX_SSO_SP_KEY";
/// Env var: SAML identity provider certificate path.
pub const ENV_ZBX_SSO_IDP_CERT: &str = "ZBX_SSO_IDP_CERT";
/// Env var: extra SAML settings as a JSON object.
pub const ENV_ZBX_SSO_SETTINGS: &str = "ZBX_SSO_SETTINGS";
/// Env var: enable GUI maintenance mode (`"true"` only).
pub const ENV_ZBX_DENY_GUI_ACCESS: &str = "ZBX_DENY_GUI_ACCESS";
/// Env var: JSON array of addresses allowed during maintenance.
pub const ENV_ZBX_GUI_ACCESS_IP_RANGE: &str = "ZBX_GUI_ACCESS_IP_RANGE";
/// Env var: warning shown to blocked users during maintenance.
pub const ENV_ZBX_GUI_WARNING_MSG: &str = "ZBX_GUI_WARNING_MSG";

/// Every variable the resolver reads, in resolution order.
pub const KNOWN_ENV_VARS: &[&str] = &[
    ENV_DB_SERVER_TYPE,
    ENV_DB_SERVER_HOST,
    ENV_DB_SERVER_PORT,
    ENV_DB_SERVER_DBNAME,
    ENV_DB_SERVER_USER,
    ENV_DB_SERVER_PASS,
    ENV_DB_SERVER_SCHEMA,
    ENV_ZBX_SERVER_HOST,
    ENV_ZBX_SERVER_PORT,
    ENV_ZBX_SERVER_NAME,
    ENV_ZBX_DB_ENCRYPTION,
    ENV_ZBX_DB_KEY_FILE,
    ENV_ZBX_DB_CERT_FILE,
    ENV_ZBX_DB_CA_FILE,
    ENV_ZBX_DB_VERIFY_HOST,
    ENV_ZBX_DB_CIPHER_LIST,
    ENV_DB_DOUBLE_IEEE754,
    ENV_ZBX_HISTORYSTORAGEURL,
    ENV_ZBX_HISTORYSTORAGETYPES,
    ENV_ZBX_SSO_SP_CERT,
    ENV_ZBX_SSO_SP_KEY,
    ENV_ZBX_SSO_IDP_CERT,
    ENV_ZBX_SSO_SETTINGS,
    ENV_ZBX_DENY_GUI_ACCESS,
    ENV_ZBX_GUI_ACCESS_IP_RANGE,
    ENV_ZBX_GUI_WARNING_MSG,
];

/// A value that is either the raw env string or a parsed JSON structure.
///
/// `ZBX_HISTORYSTORAGEURL` may hold one URL for every value type, or a JSON
/// object mapping value types to URLs; callers match on the variant instead
/// of sniffing the runtime type.
#[derive(Debug, Clone, PartialEq, Serialize, JsonSchema)]
#[serde(untagged)]
pub enum EnvValue {
    /// Raw string, used verbatim.
    Raw(String),
    /// Parsed JSON value (object, array, or scalar).
    Structured(Value),
}

impl EnvValue {
    /// Borrow the value as a string when it is one (raw or a JSON string).
    #[must_use]
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Self::Raw(raw) => Some(raw),
            Self::Structured(Value::String(text)) => Some(text),
            Self::Structured(_) => None,
        }
    }

    /// Returns true for the empty raw string.
    #[must_use]
    pub fn is_empty_raw(&self) -> bool {
        matches!(self, Self::Raw(raw) if raw.is_empty())
    }
}

impl Default for EnvValue {
    fn default() -> Self {
        Self::Raw(String::new())
    }
}

impl From<Value> for EnvValue {
    fn from(value: Value) -> Self {
        Self::Structured(value)
    }
}

/// Snapshot of the process environment, keyed by variable name.
///
/// Absence of a key means the variable is unset. The snapshot is read-only
/// once built; resolution never consults the live process environment.
#[derive(Clone, Default, PartialEq, Eq)]
pub struct RawEnvironment {
    vars: BTreeMap<String, String>,
}

enum JsonProbe {
    Empty,
    Parsed(Value),
    Null,
    Malformed,
}

impl RawEnvironment {
    /// Create an empty environment (every variable unset).
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Build from a key/value map (useful for tests and fixtures).
    #[must_use]
    pub fn from_map(map: &BTreeMap<String, String>) -> Self {
        Self { vars: map.clone() }
    }

    /// Build from any iterator of name/value pairs. Later pairs win.
    pub fn from_pairs<I, K, V>(pairs: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        Self {
            vars: pairs
                .into_iter()
                .map(|(key, value)| (key.into(), value.into()))
                .collect(),
        }
    }

    /// Capture the variables in [`KNOWN_ENV_VARS`] from the process environment.
    ///
    /// Values that are not valid UTF-8 are treated as unset.
    #[must_use]
    pub fn from_std_env() -> Self {
        let mut vars = BTreeMap::new();
        for name in KNOWN_ENV_VARS {
            if let Ok(value) = std::env::var(name) {
                vars.insert((*name).to_string(), value);
            }
        }
        Self { vars }
    }

    /// Capture every UTF-8 variable from the process environment.
    #[must_use]
    pub fn from_process() -> Self {
        let vars = std::env::vars_os()
            .filter_map(|(key, value)| Some((key.into_string().ok()?, value.into_string().ok()?)))
            .collect();
        Self { vars }
    }

    /// Return a copy with one variable set (builder style).
    #[must_use]
    pub fn with_var(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.vars.insert(name.into(), value.into());
        self
    }

    /// Layer this environment over `base`; variables set here win.
    #[must_use]
    pub fn merged_over(&self, base: &Self) -> Self {
        let mut vars = base.vars.clone();
        vars.extend(self.vars.iter().map(|(k, v)| (k.clone(), v.clone())));
        Self { vars }
    }

    /// Look up a variable. `None` means unset.
    #[must_use]
    pub fn get(&self, name: &str) -> Option<&str> {
        self.vars.get(name).map(String::as_str)
    }

    /// Number of captured variables.
    #[must_use]
    pub fn len(&self) -> usize {
        self.vars.len()
    }

    /// Returns true when no variable is set.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.vars.is_empty()
    }

    /// Verbatim value, or `""` when unset.
    #[must_use]
    pub fn resolve_string_field(&self, name: &str) -> String {
        self.get(name).unwrap_or_default().to_string()
    }

    /// Verbatim value when set and non-empty, otherwise the literal default.
    #[must_use]
    pub fn resolve_string_or(&self, name: &str, literal: &str) -> String {
        match self.get(name) {
            Some(value) if !value.is_empty() => value.to_string(),
            _ => literal.to_string(),
        }
    }

    /// `true` iff the variable is exactly `"true"`.
    ///
    /// `"TRUE"`, `"1"`, `"yes"`, `""`, and unset all resolve to `false`.
    #[must_use]
    pub fn resolve_bool_field(&self, name: &str) -> bool {
        self.get(name) == Some("true")
    }

    /// Resolve a URL-shaped field that may be JSON or a plain string.
    ///
    /// - unset or empty: `default`
    /// - parses to non-null JSON: the parsed structure
    /// - parses to `null`: `default`
    /// - does not parse: the raw string as-is
    #[must_use]
    pub fn resolve_json_or_raw(&self, name: &str, default: EnvValue) -> EnvValue {
        match self.probe_json(name) {
            JsonProbe::Parsed(value) => EnvValue::Structured(value),
            JsonProbe::Malformed => {
                let raw = self.resolve_string_field(name);
                tracing::debug!(env_var = name, "value is not JSON; keeping raw string");
                EnvValue::Raw(raw)
            },
            JsonProbe::Null => {
                tracing::warn!(env_var = name, "value parsed to null; using default");
                default
            },
            JsonProbe::Empty => default,
        }
    }

    /// Resolve a structured-only field; anything but non-null JSON yields `default`.
    #[must_use]
    pub fn resolve_json_or_default(&self, name: &str, default: Value) -> Value {
        match self.probe_json(name) {
            JsonProbe::Parsed(value) => value,
            JsonProbe::Malformed | JsonProbe::Null => {
                warn_degraded(name, "value is not valid JSON");
                default
            },
            JsonProbe::Empty => default,
        }
    }

    /// Resolve an ordered list of strings (e.g. `['uint','dbl']`).
    ///
    /// Only a JSON array whose elements are all strings is accepted; any
    /// other shape degrades to an empty list.
    #[must_use]
    pub fn resolve_string_list(&self, name: &str) -> Vec<String> {
        match self.resolve_json_or_default(name, Value::Array(Vec::new())) {
            Value::Array(items) => {
                let strings: Option<Vec<String>> = items
                    .into_iter()
                    .map(|item| match item {
                        Value::String(text) => Some(text),
                        _ => None,
                    })
                    .collect();
                strings.unwrap_or_else(|| {
                    warn_degraded(name, "array contains non-string elements");
                    Vec::new()
                })
            },
            _ => {
                warn_degraded(name, "expected a JSON array");
                Vec::new()
            },
        }
    }

    /// Resolve a JSON object; any other shape degrades to an empty map.
    #[must_use]
    pub fn resolve_json_object(&self, name: &str) -> BTreeMap<String, Value> {
        match self.resolve_json_or_default(name, Value::Object(serde_json::Map::new())) {
            Value::Object(map) => map.into_iter().collect(),
            _ => {
                warn_degraded(name, "expected a JSON object");
                BTreeMap::new()
            },
        }
    }

    fn probe_json(&self, name: &str) -> JsonProbe {
        let raw = self.get(name).unwrap_or_default();
        if raw.is_empty() {
            return JsonProbe::Empty;
        }

        match serde_json::from_str::<Value>(&normalize_quotes(raw)) {
            Ok(Value::Null) => JsonProbe::Null,
            Ok(value) => JsonProbe::Parsed(value),
            Err(_) => JsonProbe::Malformed,
        }
    }
}

// Never logs the value: structured fields can carry SAML settings.
fn warn_degraded(name: &str, reason: &str) {
    tracing::warn!(
        env_var = name,
        reason,
        "malformed structured value; using default"
    );
}

impl fmt::Debug for RawEnvironment {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut map = formatter.debug_map();
        for (key, value) in &self.vars {
            map.entry(key, &redact_if_secret(key, value));
        }
        map.finish()
    }
}

/// Replace single quotes with double quotes so `['a','b']` parses as JSON.
fn normalize_quotes(raw: &str) -> String {
    raw.replace('\'', "\"")
}
