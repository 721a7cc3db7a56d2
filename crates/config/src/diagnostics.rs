//! Post-resolution checks on a [`ResolvedConfig`].
//!
//! Resolution never fails, so a typo such as `DB_SERVER_PORT=54 32` only
//! surfaces here. Diagnostics are advisory: they never change the record.

use crate::env::EnvValue;
use crate::schema::ResolvedConfig;
use serde::Serialize;
use serde_json::Value;
use std::fmt;
use url::Url;

/// Database types the frontend ships drivers for.
pub const KNOWN_DATABASE_TYPES: &[&str] = &["MYSQL", "POSTGRESQL", "ORACLE"];

/// History value types that can be routed to external storage.
pub const KNOWN_HISTORY_TYPES: &[&str] = &["uint", "dbl", "str", "log", "text"];

/// How serious a diagnostic is.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum Severity {
    /// Likely misconfiguration; the frontend may still start.
    Warning,
    /// The frontend cannot work with this value.
    Error,
}

impl fmt::Display for Severity {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Warning => formatter.write_str("warning"),
            Self::Error => formatter.write_str("error"),
        }
    }
}

/// One finding about a resolved field.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Diagnostic {
    /// Severity.
    pub severity: Severity,
    /// Serialized field name (e.g. `databasePort`).
    pub field: &'static str,
    /// Stable machine-readable code (e.g. `invalid_port`).
    pub code: &'static str,
    /// Human-readable explanation.
    pub message: String,
}

impl Diagnostic {
    fn error(field: &'static str, code: &'static str, message: impl Into<String>) -> Self {
        Self {
            severity: Severity::Error,
            field,
            code,
            message: message.into(),
        }
    }

    fn warning(field: &'static str, code: &'static str, message: impl Into<String>) -> Self {
        Self {
            severity: Severity::Warning,
            field,
            code,
            message: message.into(),
        }
    }
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            formatter,
            "{} {} ({}): {}",
            self.severity, self.field, self.code, self.message
        )
    }
}

/// Returns true when any diagnostic is an error.
#[must_use]
pub fn has_errors(diagnostics: &[Diagnostic]) -> bool {
    diagnostics
        .iter()
        .any(|diagnostic| diagnostic.severity == Severity::Error)
}

/// Check a resolved configuration. Findings are returned in field order.
#[must_use]
pub fn diagnose(config: &ResolvedConfig) -> Vec<Diagnostic> {
    let mut out = Vec::new();

    check_database_type(&config.database_type, &mut out);
    if config.database_host.is_empty() {
        out.push(Diagnostic::error(
            "databaseHost",
            "missing_value",
            "DB_SERVER_HOST is not set",
        ));
    }
    check_port("databasePort", &config.database_port, &mut out);
    check_tls(config, &mut out);
    check_port("serverPort", &config.server_port, &mut out);
    check_history(config, &mut out);

    if let Some(maintenance) = &config.maintenance {
        if maintenance.allowed_ip_ranges.is_empty() {
            out.push(Diagnostic::warning(
                "maintenance",
                "no_allowed_ranges",
                "GUI access is denied and no client address is allowed",
            ));
        }
    }

    out
}

fn check_database_type(database_type: &str, out: &mut Vec<Diagnostic>) {
    if database_type.is_empty() {
        out.push(Diagnostic::error(
            "databaseType",
            "missing_value",
            "DB_SERVER_TYPE is not set",
        ));
    } else if !KNOWN_DATABASE_TYPES.contains(&database_type) {
        out.push(Diagnostic::warning(
            "databaseType",
            "unknown_database_type",
            format!(
                "`{database_type}` is not one of {}",
                KNOWN_DATABASE_TYPES.join(", ")
            ),
        ));
    }
}

fn check_port(field: &'static str, port: &str, out: &mut Vec<Diagnostic>) {
    if port.is_empty() {
        return;
    }
    let valid = port.bytes().all(|byte| byte.is_ascii_digit())
        && port.parse::<u16>().is_ok_and(|value| value > 0);
    if !valid {
        out.push(Diagnostic::error(
            field,
            "invalid_port",
            format!("`{port}` is not a port number between 1 and 65535"),
        ));
    }
}

fn check_tls(config: &ResolvedConfig, out: &mut Vec<Diagnostic>) {
    if !config.tls_encryption_enabled {
        if config.tls_verify_host {
            out.push(Diagnostic::warning(
                "tlsVerifyHost",
                "tls_disabled",
                "host verification has no effect while ZBX_DB_ENCRYPTION is not `true`",
            ));
        }
        return;
    }

    let has_key = !config.tls_key_file.is_empty();
    let has_cert = !config.tls_cert_file.is_empty();
    if has_key != has_cert {
        let (field, missing) = if has_key {
            ("tlsCertFile", "ZBX_DB_CERT_FILE")
        } else {
            ("tlsKeyFile", "ZBX_DB_KEY_FILE")
        };
        out.push(Diagnostic::warning(
            field,
            "incomplete_client_cert",
            format!("client key and certificate must be set together; {missing} is empty"),
        ));
    }
}

fn check_history(config: &ResolvedConfig, out: &mut Vec<Diagnostic>) {
    match &config.history_storage_url {
        EnvValue::Raw(raw) => {
            if !raw.is_empty() && !is_http_url(raw) {
                out.push(invalid_history_url(raw));
            }
        },
        EnvValue::Structured(Value::Object(map)) => {
            for (value_type, url) in map {
                match url.as_str() {
                    Some(url) if is_http_url(url) => {},
                    Some(url) => out.push(invalid_history_url(url)),
                    None => out.push(Diagnostic::error(
                        "historyStorageUrl",
                        "invalid_url",
                        format!("URL for `{value_type}` is not a string"),
                    )),
                }
            }
        },
        EnvValue::Structured(Value::String(url)) => {
            if !is_http_url(url) {
                out.push(invalid_history_url(url));
            }
        },
        EnvValue::Structured(_) => out.push(Diagnostic::error(
            "historyStorageUrl",
            "invalid_url",
            "expected a URL or an object of value type to URL",
        )),
    }

    for value_type in &config.history_storage_types {
        if !KNOWN_HISTORY_TYPES.contains(&value_type.as_str()) {
            out.push(Diagnostic::warning(
                "historyStorageTypes",
                "unknown_history_type",
                format!(
                    "`{value_type}` is not one of {}",
                    KNOWN_HISTORY_TYPES.join(", ")
                ),
            ));
        }
    }

    if !config.history_storage_types.is_empty() && config.history_storage_url.is_empty_raw() {
        out.push(Diagnostic::warning(
            "historyStorageUrl",
            "missing_value",
            "history storage types are set but ZBX_HISTORYSTORAGEURL is empty",
        ));
    }
}

fn invalid_history_url(url: &str) -> Diagnostic {
    Diagnostic::error(
        "historyStorageUrl",
        "invalid_url",
        format!("{} is not an http(s) URL", sanitize_url(url)),
    )
}

fn is_http_url(raw: &str) -> bool {
    Url::parse(raw).is_ok_and(|url| matches!(url.scheme(), "http" | "https"))
}

/// Strip credentials from a URL before it appears in a message.
fn sanitize_url(raw: &str) -> String {
    match Url::parse(raw) {
        Ok(mut parsed) => {
            if !parsed.username().is_empty() || parsed.password().is_some() {
                if parsed.set_username("").is_err() || parsed.set_password(None).is_err() {
                    return "[invalid url]".to_string();
                }
            }
            format!("`{parsed}`")
        },
        Err(error) => format!("[invalid url: {error}]"),
    }
}
