//! CLI binary entrypoint.

mod commands;
mod error;
mod format;
mod logging;

use clap::{Args, Parser, Subcommand, ValueEnum};
use commands::{
    RenderTarget, Sources, config_check_with_env, config_schema_output, config_show_with_env,
    render_with_env,
};
use error::{CliError, ExitCode};
use format::{OutputArgs, OutputMode, to_pretty_json_line};
use std::io::{self, Write};
use std::path::PathBuf;
use zabbix_web_adapters::LocalFileProbe;
use zabbix_web_config::{Profile, RawEnvironment, SecretExposure};
use zabbix_web_shared::ErrorEnvelope;

#[derive(Debug, Parser)]
#[command(
    name = "zbx-webconf",
    version,
    about = "Resolve and inspect Zabbix web frontend configuration",
    long_about = None
)]
struct Cli {
    #[command(flatten)]
    output: OutputArgs,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Config-related commands.
    Config {
        #[command(subcommand)]
        command: ConfigCommands,
    },
    /// Fill `{NAME}` placeholders in a config template.
    Render {
        /// Template file to render.
        #[arg(long)]
        template: PathBuf,
        /// Write the rendered text here instead of stdout.
        #[arg(long)]
        out: Option<PathBuf>,
        /// Optional `.env` file layered under the process environment.
        #[arg(long)]
        env_file: Option<PathBuf>,
    },
}

#[derive(Debug, Subcommand)]
enum ConfigCommands {
    /// Show the effective config.
    Show {
        #[command(flatten)]
        source: SourceArgs,
        /// Print the database password instead of a placeholder.
        #[arg(long)]
        reveal_secrets: bool,
    },
    /// Resolve the config and report diagnostics.
    Check {
        #[command(flatten)]
        source: SourceArgs,
    },
    /// Print the JSON Schema of the resolved config.
    Schema,
}

#[derive(Debug, Args)]
struct SourceArgs {
    /// Optional `.env` file layered under the process environment.
    #[arg(long)]
    env_file: Option<PathBuf>,
    /// Image profile whose defaults apply.
    #[arg(long, value_enum, default_value_t = ProfileArg::Environment)]
    profile: ProfileArg,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum ProfileArg {
    /// Every field comes from the environment.
    #[value(alias = "env")]
    Environment,
    /// PostgreSQL image defaults.
    #[value(alias = "postgresql")]
    Postgres,
}

impl std::fmt::Display for ProfileArg {
    fn fmt(&self, formatter: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        formatter.write_str(Profile::from(*self).as_str())
    }
}

impl From<ProfileArg> for Profile {
    fn from(value: ProfileArg) -> Self {
        match value {
            ProfileArg::Environment => Self::Environment,
            ProfileArg::Postgres => Self::Postgres,
        }
    }
}

pub(crate) struct CliOutput {
    stdout: String,
    stderr: String,
    exit_code: ExitCode,
}

fn main() -> std::process::ExitCode {
    let cli = Cli::parse();
    logging::init_tracing(cli.output.log_format);
    let mode = OutputMode::from_args(&cli.output);

    match run(&cli.command, mode) {
        Ok(output) => match write_output(&output) {
            Ok(()) => std::process::ExitCode::from(output.exit_code.as_u8()),
            Err(error) => exit_with_error(&error),
        },
        Err(error) => exit_with_error(&error),
    }
}

fn exit_with_error(error: &CliError) -> std::process::ExitCode {
    let _ = writeln!(io::stderr(), "error: {error}");
    std::process::ExitCode::from(error.exit_code().as_u8())
}

fn run(command: &Commands, mode: OutputMode) -> Result<CliOutput, CliError> {
    let probe = LocalFileProbe::new();
    match command {
        Commands::Config { command } => match command {
            ConfigCommands::Show {
                source,
                reveal_secrets,
            } => {
                let env = RawEnvironment::from_std_env();
                let exposure = if *reveal_secrets {
                    SecretExposure::Revealed
                } else {
                    SecretExposure::Redacted
                };
                config_show_with_env(mode, source.sources(&env, &probe), exposure)
            },
            ConfigCommands::Check { source } => {
                let env = RawEnvironment::from_std_env();
                config_check_with_env(mode, source.sources(&env, &probe))
            },
            ConfigCommands::Schema => config_schema_output(mode),
        },
        Commands::Render {
            template,
            out,
            env_file,
        } => render_with_env(
            mode,
            &RawEnvironment::from_process(),
            env_file.as_deref(),
            RenderTarget {
                template,
                out: out.as_deref(),
            },
        ),
    }
}

impl SourceArgs {
    fn sources<'a>(&'a self, env: &'a RawEnvironment, probe: &'a LocalFileProbe) -> Sources<'a> {
        Sources {
            env,
            env_file: self.env_file.as_deref(),
            probe,
            profile: self.profile.into(),
        }
    }
}

pub(crate) fn log_info(stderr: &mut String, message: &str, quiet: bool) {
    if quiet {
        return;
    }
    stderr.push_str("info: ");
    stderr.push_str(message);
    stderr.push('\n');
}

pub(crate) fn format_error_output(
    mode: OutputMode,
    error: &ErrorEnvelope,
    exit_code: ExitCode,
) -> CliOutput {
    let mut stderr = String::new();
    log_info(&mut stderr, "command failed", mode.quiet);

    let stdout = if mode.is_json() {
        let payload = serde_json::json!({
            "status": "error",
            "error": error,
        });

        // This is a CLI boundary, so JSON serialization errors are internal.
        to_pretty_json_line(&payload).unwrap_or_else(|_| {
            "{\"status\":\"error\",\"error\":{\"code\":\"core:internal\",\"message\":\"internal error\"}}\n".to_string()
        })
    } else {
        format!("status: error\nerror: {}: {}\n", error.code, error.message)
    };

    CliOutput {
        stdout,
        stderr,
        exit_code,
    }
}

fn write_output(output: &CliOutput) -> Result<(), CliError> {
    let mut stdout = io::stdout();
    stdout.write_all(output.stdout.as_bytes())?;
    stdout.flush()?;

    if !output.stderr.is_empty() {
        let mut stderr = io::stderr();
        stderr.write_all(output.stderr.as_bytes())?;
        stderr.flush()?;
    }

    Ok(())
}
