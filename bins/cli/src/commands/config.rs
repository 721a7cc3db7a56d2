//! `config show`, `config check`, and `config schema`.

use crate::error::{CliError, ExitCode};
use crate::format::{OutputMode, to_pretty_json_line};
use crate::{CliOutput, format_error_output, log_info};
use serde_json::Value;
use std::fmt::Write as _;
use std::path::Path;
use zabbix_web_config::{
    Profile, RawEnvironment, ResolvedConfig, SecretExposure, Severity, config_schema, diagnose,
    has_errors, load_effective_config,
};
use zabbix_web_ports::FileProbe;

/// Where the environment comes from and how to resolve it.
#[derive(Clone, Copy)]
pub struct Sources<'a> {
    pub env: &'a RawEnvironment,
    pub env_file: Option<&'a Path>,
    pub probe: &'a dyn FileProbe,
    pub profile: Profile,
}

fn resolve(mode: OutputMode, sources: Sources<'_>) -> Result<ResolvedConfig, CliOutput> {
    load_effective_config(sources.env, sources.env_file, sources.probe, sources.profile).map_err(
        |error| {
            let exit_code = ExitCode::for_envelope(&error);
            format_error_output(mode, &error, exit_code)
        },
    )
}

/// Resolve and print the effective config.
pub fn config_show_with_env(
    mode: OutputMode,
    sources: Sources<'_>,
    exposure: SecretExposure,
) -> Result<CliOutput, CliError> {
    let config = match resolve(mode, sources) {
        Ok(config) => config,
        Err(output) => return Ok(output),
    };
    let config_value = config.to_json_value(exposure)?;

    let mut stderr = String::new();
    log_info(&mut stderr, "config show completed", mode.quiet);

    let stdout = if mode.is_json() {
        let payload = serde_json::json!({
            "status": "ok",
            "profile": sources.profile,
            "envFile": sources.env_file.map(|path| path.to_string_lossy().to_string()),
            "config": config_value,
        });
        to_pretty_json_line(&payload)?
    } else {
        let mut out = format!("status: ok\nprofile: {}\n", sources.profile);
        if let Value::Object(fields) = &config_value {
            for (key, value) in fields {
                let _ = writeln!(out, "{key}: {}", display_value(value));
            }
        }
        out
    };

    Ok(CliOutput {
        stdout,
        stderr,
        exit_code: ExitCode::Ok,
    })
}

/// Resolve, run diagnostics, and fail when any finding is an error.
pub fn config_check_with_env(mode: OutputMode, sources: Sources<'_>) -> Result<CliOutput, CliError> {
    let config = match resolve(mode, sources) {
        Ok(config) => config,
        Err(output) => return Ok(output),
    };
    let diagnostics = diagnose(&config);
    let failed = has_errors(&diagnostics);
    let errors = diagnostics
        .iter()
        .filter(|diagnostic| diagnostic.severity == Severity::Error)
        .count();
    let warnings = diagnostics.len() - errors;
    let status = if failed { "error" } else { "ok" };

    let mut stderr = String::new();
    log_info(&mut stderr, "config check completed", mode.quiet);

    let stdout = if mode.is_json() {
        let payload = serde_json::json!({
            "status": status,
            "profile": sources.profile,
            "errors": errors,
            "warnings": warnings,
            "diagnostics": diagnostics,
        });
        to_pretty_json_line(&payload)?
    } else {
        let mut out = format!("status: {status}\nerrors: {errors}\nwarnings: {warnings}\n");
        for diagnostic in &diagnostics {
            let _ = writeln!(out, "{diagnostic}");
        }
        out
    };

    Ok(CliOutput {
        stdout,
        stderr,
        exit_code: if failed {
            ExitCode::InvalidInput
        } else {
            ExitCode::Ok
        },
    })
}

/// Print the JSON Schema of the resolved config.
pub fn config_schema_output(mode: OutputMode) -> Result<CliOutput, CliError> {
    let schema = serde_json::to_value(config_schema())?;

    let mut stderr = String::new();
    log_info(&mut stderr, "config schema completed", mode.quiet);

    Ok(CliOutput {
        stdout: to_pretty_json_line(&schema)?,
        stderr,
        exit_code: ExitCode::Ok,
    })
}

fn display_value(value: &Value) -> String {
    match value {
        Value::String(text) => text.clone(),
        other => other.to_string(),
    }
}
