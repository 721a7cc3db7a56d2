//! Loading helpers: `.env` files and one-call effective config.
//!
//! Precedence (highest wins):
//! - process environment
//! - env file (when given)
//! - unset

use crate::env::RawEnvironment;
use crate::resolver::{ConfigResolver, Profile};
use crate::schema::ResolvedConfig;
use std::io;
use std::path::{Path, PathBuf};
use zabbix_web_ports::FileProbe;
use zabbix_web_shared::{ErrorCode, ErrorEnvelope};

/// Failure to load an env file.
#[derive(Debug, thiserror::Error)]
pub enum EnvFileError {
    /// The file could not be opened or read.
    #[error("failed to read env file {}: {source}", path.display())]
    Read {
        /// Path that was read.
        path: PathBuf,
        /// Underlying I/O error.
        #[source]
        source: io::Error,
    },
    /// A line is not valid `KEY=value` syntax.
    #[error("invalid syntax in env file {} for `{variable}` at column {column}", path.display())]
    Parse {
        /// Path that was parsed.
        path: PathBuf,
        /// Variable name on the offending line (best effort).
        variable: String,
        /// Character offset of the error within the line.
        column: usize,
    },
    /// A `${VAR}` substitution could not be expanded.
    #[error("failed to expand env file {}: {message}", path.display())]
    Substitution {
        /// Path that was parsed.
        path: PathBuf,
        /// Parser message.
        message: String,
    },
}

impl EnvFileError {
    /// Path of the env file involved.
    #[must_use]
    pub fn path(&self) -> &Path {
        match self {
            Self::Read { path, .. } | Self::Parse { path, .. } | Self::Substitution { path, .. } => {
                path
            },
        }
    }
}

impl From<EnvFileError> for ErrorEnvelope {
    fn from(error: EnvFileError) -> Self {
        let path = error.path().display().to_string();
        let message = error.to_string();
        let envelope = match error {
            EnvFileError::Read { source, .. } => {
                let class = ErrorEnvelope::from(source).class;
                Self::unexpected(ErrorCode::new("config", "env_file_read"), message, class)
            },
            EnvFileError::Parse { .. } | EnvFileError::Substitution { .. } => {
                Self::expected(ErrorCode::new("config", "env_file_parse"), message)
            },
        };
        envelope.with_metadata("path", path)
    }
}

/// Parse a `.env` file into a [`RawEnvironment`].
///
/// Uses dotenvy syntax (`KEY=value`, quotes, `export`, `#` comments). The
/// process environment is never modified.
///
/// Unquoted and double-quoted values expand `$NAME` and `${NAME}`, looking
/// the name up in the process environment first and then in earlier lines of
/// the file; unknown names expand to nothing. Single-quoted values and `\$`
/// inside double quotes stay literal, so a password containing `$` must be
/// written as `DB_SERVER_PASS='pa$word'`.
pub fn load_env_file(path: &Path) -> Result<RawEnvironment, EnvFileError> {
    let entries = dotenvy::from_path_iter(path).map_err(|error| map_dotenv_error(path, error))?;

    let mut pairs = Vec::new();
    for entry in entries {
        pairs.push(entry.map_err(|error| map_dotenv_error(path, error))?);
    }

    let env = RawEnvironment::from_pairs(pairs);
    tracing::debug!(path = %path.display(), variables = env.len(), "loaded env file");
    Ok(env)
}

fn map_dotenv_error(path: &Path, error: dotenvy::Error) -> EnvFileError {
    match error {
        dotenvy::Error::Io(source) => EnvFileError::Read {
            path: path.to_path_buf(),
            source,
        },
        dotenvy::Error::LineParse(line, column) => EnvFileError::Parse {
            path: path.to_path_buf(),
            variable: variable_name(&line),
            column,
        },
        other => EnvFileError::Substitution {
            path: path.to_path_buf(),
            message: other.to_string(),
        },
    }
}

/// Variable name of a `.env` line, without its value.
fn variable_name(line: &str) -> String {
    let line = line.trim_start();
    let line = line.strip_prefix("export ").unwrap_or(line);
    line.split('=')
        .next()
        .unwrap_or_default()
        .trim()
        .to_string()
}

/// Resolve the effective config: the optional env file layered under `env`.
pub fn load_effective_config(
    env: &RawEnvironment,
    env_file: Option<&Path>,
    probe: &dyn FileProbe,
    profile: Profile,
) -> Result<ResolvedConfig, ErrorEnvelope> {
    let merged = match env_file {
        Some(path) => env.merged_over(&load_env_file(path)?),
        None => env.clone(),
    };
    Ok(ConfigResolver::new(&merged, probe)
        .with_profile(profile)
        .resolve())
}
