//! Tracing subscriber setup for the CLI.
//!
//! Logs go to stderr so stdout stays clean for rendered output and JSON.

use crate::format::LogFormat;
use std::io::{self, Write};
use tracing_subscriber::EnvFilter;
use tracing_subscriber::filter::LevelFilter;

/// Environment variable holding `EnvFilter` directives.
pub const LOG_ENV_VAR: &str = "ZBX_WEBCONF_LOG";

/// Build the log filter from directives, defaulting to `warn`.
pub fn build_filter(directives: Option<&str>) -> EnvFilter {
    EnvFilter::builder()
        .with_default_directive(LevelFilter::WARN.into())
        .parse_lossy(directives.unwrap_or_default())
}

/// Install the global subscriber. A second call is a no-op.
pub fn init_tracing(format: LogFormat) {
    let directives = std::env::var(LOG_ENV_VAR).ok();
    let builder = tracing_subscriber::fmt()
        .with_env_filter(build_filter(directives.as_deref()))
        .with_writer(io::stderr)
        .with_target(false);

    let result = match format {
        LogFormat::Text => builder.compact().try_init(),
        LogFormat::Json => builder.json().try_init(),
    };
    if let Err(error) = result {
        let _ = writeln!(io::stderr(), "warning: logging disabled: {error}");
    }
}
