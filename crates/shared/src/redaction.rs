//! Secret detection and redaction utilities.
//!
//! Container environments mix credentials (`DB_SERVER_PASS`) with variables
//! that merely *name* key material on disk (`ZBX_DB_KEY_FILE`,
//! `ZBX_SSO_SP_KEY`). Only the former are redacted: a file path is safe to
//! print, the password is not.

/// The redacted placeholder string.
pub const REDACTED: &str = "[REDACTED]";

const SECRET_MARKERS: [&str; 5] = ["PASS", "TOKEN", "SECRET", "CREDENTIAL", "API_KEY"];

const PATH_MARKERS: [&str; 6] = ["_FILE", "_PATH", "_CERT", "_SP_KEY", "_DIR", "_CA"];

/// Checks if a key/variable name likely refers to a secret value.
///
/// Matching is case-insensitive. Names that refer to a file location are
/// never treated as secrets, even when they contain `KEY`.
///
/// # Examples
///
/// ```
/// use zabbix_web_shared::is_secret_key;
///
/// assert!(is_secret_key("DB_SERVER_PASS"));
/// assert!(is_secret_key("password"));
/// assert!(!is_secret_key("ZBX_DB_KEY_FILE"));
/// assert!(!is_secret_key("DB_SERVER_HOST"));
/// ```
pub fn is_secret_key(key: &str) -> bool {
    let key = key.to_ascii_uppercase();
    if PATH_MARKERS.iter().any(|marker| key.ends_with(marker)) {
        return false;
    }
    SECRET_MARKERS.iter().any(|marker| key.contains(marker))
}

/// Redacts a value if the key is likely a secret.
///
/// # Examples
///
/// ```
/// use zabbix_web_shared::redact_if_secret;
///
/// assert_eq!(redact_if_secret("DB_SERVER_PASS", "zabbix"), "[REDACTED]");
/// assert_eq!(redact_if_secret("DB_SERVER_HOST", "postgres"), "postgres");
/// ```
pub fn redact_if_secret(key: &str, value: &str) -> String {
    if is_secret_key(key) {
        REDACTED.to_string()
    } else {
        value.to_string()
    }
}

/// A secret string wrapper that redacts on Display/Debug.
#[derive(Clone, Default, PartialEq, Eq, Hash)]
pub struct SecretString(Box<str>);

impl SecretString {
    /// Wrap a secret value.
    pub fn new(value: impl Into<Box<str>>) -> Self {
        Self(value.into())
    }

    /// Borrow the underlying secret.
    pub fn expose(&self) -> &str {
        &self.0
    }

    /// Returns true when no secret is configured.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl std::fmt::Debug for SecretString {
    fn fmt(&self, formatter: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        formatter.write_str(REDACTED)
    }
}

impl std::fmt::Display for SecretString {
    fn fmt(&self, formatter: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        formatter.write_str(REDACTED)
    }
}

impl From<String> for SecretString {
    fn from(value: String) -> Self {
        Self(value.into_boxed_str())
    }
}
