//! `zbx-webconf config show` end-to-end tests.

use std::path::{Path, PathBuf};
use std::process::Command;
use std::{fs, io};

fn workspace_root() -> PathBuf {
    let manifest_dir = Path::new(env!("CARGO_MANIFEST_DIR"));
    manifest_dir
        .parent()
        .and_then(Path::parent)
        .map(Path::to_path_buf)
        .unwrap_or_else(|| manifest_dir.to_path_buf())
}

fn zbx_webconf() -> Command {
    let mut command = Command::new(env!("CARGO_BIN_EXE_zbx-webconf"));
    command.env_clear();
    command
}

fn parse_json(stdout: &[u8]) -> io::Result<serde_json::Value> {
    serde_json::from_slice(stdout).map_err(io::Error::other)
}

#[test]
fn show_json_resolves_process_environment() -> io::Result<()> {
    let output = zbx_webconf()
        .args(["--output", "json", "config", "show"])
        .env("DB_SERVER_TYPE", "POSTGRESQL")
        .env("DB_SERVER_HOST", "postgres-server")
        .env("DB_SERVER_PASS", "hunter2")
        .env("ZBX_DB_ENCRYPTION", "TRUE")
        .env("ZBX_HISTORYSTORAGETYPES", "['uint','dbl']")
        .env("ZBX_SSO_SETTINGS", "{not json")
        .output()?;
    assert!(output.status.success());

    let value = parse_json(&output.stdout)?;
    assert_eq!(value["status"], "ok");
    assert_eq!(value["profile"], "environment");
    assert_eq!(value["config"]["databaseHost"], "postgres-server");
    assert_eq!(value["config"]["databasePassword"], "[REDACTED]");
    assert_eq!(value["config"]["tlsEncryptionEnabled"], false);
    assert_eq!(
        value["config"]["historyStorageTypes"],
        serde_json::json!(["uint", "dbl"])
    );
    assert_eq!(value["config"]["ssoSettings"], serde_json::json!({}));
    assert!(!String::from_utf8_lossy(&output.stdout).contains("hunter2"));
    assert!(!String::from_utf8_lossy(&output.stderr).contains("hunter2"));
    Ok(())
}

#[test]
fn show_reveal_secrets_prints_password() -> io::Result<()> {
    let output = zbx_webconf()
        .args(["config", "show", "--reveal-secrets", "--output", "json"])
        .env("DB_SERVER_PASS", "hunter2")
        .output()?;
    assert!(output.status.success());

    let value = parse_json(&output.stdout)?;
    assert_eq!(value["config"]["databasePassword"], "hunter2");
    Ok(())
}

#[test]
fn show_text_layers_env_file_under_process_env() -> io::Result<()> {
    let dir = tempfile::tempdir()?;
    let env_file = dir.path().join("zabbix.env");
    fs::write(
        &env_file,
        "DB_SERVER_HOST=from-file\nDB_SERVER_PORT=5432\nZBX_HISTORYSTORAGEURL=http://elastic:9200\n",
    )?;

    let output = zbx_webconf()
        .args(["--quiet", "config", "show", "--env-file"])
        .arg(&env_file)
        .env("DB_SERVER_HOST", "from-process")
        .output()?;
    assert!(output.status.success());

    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.starts_with("status: ok\n"));
    assert!(stdout.contains("databaseHost: from-process\n"));
    assert!(stdout.contains("databasePort: 5432\n"));
    assert!(stdout.contains("historyStorageUrl: http://elastic:9200\n"));
    assert!(output.stderr.is_empty());
    Ok(())
}

#[test]
fn show_postgres_profile_bakes_database_type() -> io::Result<()> {
    let output = zbx_webconf()
        .args(["--output", "json", "config", "show", "--profile", "postgres"])
        .output()?;
    assert!(output.status.success());

    let value = parse_json(&output.stdout)?;
    assert_eq!(value["profile"], "postgres");
    assert_eq!(value["config"]["databaseType"], "POSTGRESQL");
    assert_eq!(value["config"]["useIeee754DoubleRange"], true);
    Ok(())
}

#[test]
fn show_missing_env_file_is_invalid_input() -> io::Result<()> {
    let missing = workspace_root().join("missing.env");
    let output = zbx_webconf()
        .args(["--output", "json", "config", "show", "--env-file"])
        .arg(&missing)
        .output()?;
    assert_eq!(output.status.code(), Some(2));

    let value = parse_json(&output.stdout)?;
    assert_eq!(value["status"], "error");
    assert_eq!(value["error"]["code"]["code"], "env_file_read");
    Ok(())
}

#[test]
fn schema_describes_resolved_config() -> io::Result<()> {
    let output = zbx_webconf().args(["config", "schema"]).output()?;
    assert!(output.status.success());

    let value = parse_json(&output.stdout)?;
    let properties = value
        .get("properties")
        .and_then(serde_json::Value::as_object)
        .ok_or_else(|| io::Error::other("missing properties"))?;
    assert!(properties.contains_key("ssoServicePrivateKeyPath"));
    assert!(properties.contains_key("maintenance"));
    Ok(())
}
