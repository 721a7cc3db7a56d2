//! `render`: fill `{NAME}` placeholders in a baked config template.

use crate::error::{CliError, ExitCode};
use crate::format::{OutputMode, to_pretty_json_line};
use crate::{CliOutput, format_error_output, log_info};
use std::fs;
use std::path::Path;
use zabbix_web_config::{RawEnvironment, load_env_file, render_placeholders};
use zabbix_web_shared::ErrorEnvelope;

/// Template input and optional destination file.
#[derive(Debug, Clone, Copy)]
pub struct RenderTarget<'a> {
    pub template: &'a Path,
    pub out: Option<&'a Path>,
}

/// Render a template against `env` (with an optional env file layered under it).
pub fn render_with_env(
    mode: OutputMode,
    env: &RawEnvironment,
    env_file: Option<&Path>,
    target: RenderTarget<'_>,
) -> Result<CliOutput, CliError> {
    let env = match env_file.map(load_env_file).transpose() {
        Ok(Some(file_env)) => env.merged_over(&file_env),
        Ok(None) => env.clone(),
        Err(error) => {
            let error = ErrorEnvelope::from(error);
            let exit_code = ExitCode::for_envelope(&error);
            return Ok(format_error_output(mode, &error, exit_code));
        },
    };

    let bytes = fs::read(target.template)?;
    let template = String::from_utf8(bytes).map_err(|_| {
        CliError::InvalidInput(format!(
            "template {} is not valid UTF-8",
            target.template.display()
        ))
    })?;

    let rendered = render_placeholders(&template, &env);
    for name in &rendered.missing {
        tracing::warn!(placeholder = %name, "placeholder has no value; rendered as empty");
    }

    if let Some(out) = target.out {
        fs::write(out, &rendered.text)?;
    }

    let mut stderr = String::new();
    log_info(&mut stderr, "render completed", mode.quiet);

    let stdout = if mode.is_json() {
        let text = target.out.is_none().then_some(rendered.text.as_str());
        let payload = serde_json::json!({
            "status": "ok",
            "template": target.template.to_string_lossy(),
            "out": target.out.map(|path| path.to_string_lossy().to_string()),
            "substituted": rendered.substituted,
            "missing": rendered.missing,
            "text": text,
        });
        to_pretty_json_line(&payload)?
    } else if let Some(out) = target.out {
        format!("status: ok\nout: {}\n", out.to_string_lossy())
    } else {
        rendered.text
    };

    Ok(CliOutput {
        stdout,
        stderr,
        exit_code: ExitCode::Ok,
    })
}
