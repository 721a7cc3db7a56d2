//! `zbx-webconf config check` end-to-end tests.

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

fn fixture_path(relative: &str) -> PathBuf {
    workspace_root()
        .join("crates")
        .join("testkit")
        .join("fixtures")
        .join(relative)
}

/// Write a JSON env fixture out as a `.env` file with every value kept literal.
fn fixture_env_file(dir: &Path, name: &str) -> io::Result<PathBuf> {
    let contents = fs::read_to_string(fixture_path(&format!("env/{name}.json")))?;
    let vars: serde_json::Map<String, serde_json::Value> =
        serde_json::from_str(&contents).map_err(io::Error::other)?;

    let mut env_file = String::new();
    for (key, value) in vars {
        let value = value
            .as_str()
            .ok_or_else(|| io::Error::other("fixture values must be strings"))?;
        let escaped = value
            .replace('\\', "\\\\")
            .replace('"', "\\\"")
            .replace('$', "\\$");
        env_file.push_str(&format!("{key}=\"{escaped}\"\n"));
    }

    let path = dir.join(format!("{name}.env"));
    fs::write(&path, env_file)?;
    Ok(path)
}

fn zbx_webconf() -> Command {
    let mut command = Command::new(env!("CARGO_BIN_EXE_zbx-webconf"));
    command.env_clear();
    command
}

#[test]
fn check_passes_for_appliance_fixture() -> io::Result<()> {
    let dir = tempfile::tempdir()?;
    let env_file = fixture_env_file(dir.path(), "appliance.valid")?;

    let output = zbx_webconf()
        .args(["--output", "json", "config", "check", "--env-file"])
        .arg(&env_file)
        .output()?;
    assert_eq!(output.status.code(), Some(0));

    let value: serde_json::Value =
        serde_json::from_slice(&output.stdout).map_err(io::Error::other)?;
    assert_eq!(value["status"], "ok");
    assert_eq!(value["errors"], 0);
    Ok(())
}

#[test]
fn fixture_values_reach_config_verbatim() -> io::Result<()> {
    let dir = tempfile::tempdir()?;
    let env_file = fixture_env_file(dir.path(), "appliance.valid")?;

    let output = zbx_webconf()
        .args(["--output", "json", "config", "show", "--reveal-secrets", "--env-file"])
        .arg(&env_file)
        .output()?;
    assert!(output.status.success());

    let value: serde_json::Value =
        serde_json::from_slice(&output.stdout).map_err(io::Error::other)?;
    assert_eq!(value["config"]["databasePassword"], "zabbix$pwd");
    assert_eq!(value["config"]["ssoSettings"]["strict"], true);
    Ok(())
}

#[test]
fn degraded_values_are_not_logged() -> io::Result<()> {
    let output = zbx_webconf()
        .args(["config", "check"])
        .env("DB_SERVER_TYPE", "MYSQL")
        .env("DB_SERVER_HOST", "mysql-server")
        .env("ZBX_SSO_SETTINGS", "{'idp_entityid': 'urn:private-idp'")
        .output()?;
    assert_eq!(output.status.code(), Some(0));

    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("ZBX_SSO_SETTINGS"));
    assert!(!stderr.contains("urn:private-idp"));
    Ok(())
}

#[test]
fn check_fails_for_malformed_fixture() -> io::Result<()> {
    let dir = tempfile::tempdir()?;
    let env_file = fixture_env_file(dir.path(), "malformed")?;

    let output = zbx_webconf()
        .args(["config", "check", "--env-file"])
        .arg(&env_file)
        .output()?;
    assert_eq!(output.status.code(), Some(2));

    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.starts_with("status: error\n"));
    assert!(stdout.contains("error databasePort (invalid_port)"));
    assert!(stdout.contains("warning databaseType (unknown_database_type)"));
    Ok(())
}

#[test]
fn check_with_empty_environment_reports_missing_database() -> io::Result<()> {
    let output = zbx_webconf()
        .args(["--output", "json", "config", "check"])
        .output()?;
    assert_eq!(output.status.code(), Some(2));

    let value: serde_json::Value =
        serde_json::from_slice(&output.stdout).map_err(io::Error::other)?;
    let fields: Vec<&str> = value["diagnostics"]
        .as_array()
        .ok_or_else(|| io::Error::other("missing diagnostics"))?
        .iter()
        .filter_map(|diagnostic| diagnostic["field"].as_str())
        .collect();
    assert_eq!(fields, vec!["databaseType", "databaseHost"]);
    Ok(())
}

#[test]
fn malformed_env_file_is_invalid_input() -> io::Result<()> {
    let dir = tempfile::tempdir()?;
    let env_file = dir.path().join("broken.env");
    fs::write(&env_file, "DB_SERVER_PASS=\"hunter2\n")?;

    let output = zbx_webconf()
        .args(["config", "check", "--env-file"])
        .arg(&env_file)
        .output()?;
    assert_eq!(output.status.code(), Some(2));

    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("config:env_file_parse"));
    assert!(!stdout.contains("hunter2"));
    Ok(())
}

#[test]
fn json_logs_go_to_stderr() -> io::Result<()> {
    let output = zbx_webconf()
        .args(["--log-format", "json", "--output", "json", "config", "check"])
        .env("ZBX_WEBCONF_LOG", "warn")
        .env("DB_SERVER_TYPE", "MYSQL")
        .env("DB_SERVER_HOST", "mysql-server")
        .env("ZBX_SSO_SETTINGS", "{not json")
        .output()?;
    assert_eq!(output.status.code(), Some(0));

    let stderr = String::from_utf8_lossy(&output.stderr);
    let log_line = stderr
        .lines()
        .find(|line| line.starts_with('{'))
        .ok_or_else(|| io::Error::other("expected a JSON log line"))?;
    let event: serde_json::Value = serde_json::from_str(log_line).map_err(io::Error::other)?;
    assert_eq!(event["level"], "WARN");
    assert_eq!(event["fields"]["env_var"], "ZBX_SSO_SETTINGS");

    let stdout: serde_json::Value =
        serde_json::from_slice(&output.stdout).map_err(io::Error::other)?;
    assert_eq!(stdout["status"], "ok");
    Ok(())
}
