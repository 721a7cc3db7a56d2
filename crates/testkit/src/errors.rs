//! Test fixtures for error codes and envelopes surfaced by the loaders.

use zabbix_web_shared::{ErrorClass, ErrorCode, ErrorEnvelope};

/// Code for an env file that could not be read.
pub fn env_file_read_code() -> ErrorCode {
    ErrorCode::new("config", "env_file_read")
}

/// An invalid input error fixture.
pub fn invalid_input_error() -> ErrorEnvelope {
    ErrorEnvelope::expected(ErrorCode::invalid_input(), "invalid input")
}

/// A missing env file error fixture.
pub fn missing_env_file_error(path: &str) -> ErrorEnvelope {
    ErrorEnvelope::unexpected(
        env_file_read_code(),
        format!("failed to read env file {path}: No such file or directory (os error 2)"),
        ErrorClass::NonRetriable,
    )
    .with_metadata("path", path)
}
