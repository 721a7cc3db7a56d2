//! `zbx-webconf render` end-to-end tests.

use std::process::Command;
use std::{fs, io};

const PGSQL_TEMPLATE: &str = "<?php
global $DB, $HISTORY;

$DB['TYPE']     = 'POSTGRESQL';
$DB['SERVER']   = '{DB_SERVER_HOST}';
$DB['PORT']     = '{DB_SERVER_PORT}';
$DB['PASSWORD'] = '{DB_SERVER_PASS}';
$DB['ENCRYPTION'] = {ZBX_DB_ENCRYPTION};
$HISTORY['url']   = '{ZBX_HISTORYSTORAGEURL}';
$HISTORY['types'] = {ZBX_HISTORYSTORAGETYPES};
";

fn zbx_webconf() -> Command {
    let mut command = Command::new(env!("CARGO_BIN_EXE_zbx-webconf"));
    command.env_clear();
    command
}

#[test]
fn render_prints_filled_template() -> io::Result<()> {
    let dir = tempfile::tempdir()?;
    let template = dir.path().join("zabbix.conf.php");
    fs::write(&template, PGSQL_TEMPLATE)?;

    let output = zbx_webconf()
        .args(["render", "--template"])
        .arg(&template)
        .env("DB_SERVER_HOST", "postgres-server")
        .env("DB_SERVER_PORT", "5432")
        .env("DB_SERVER_PASS", "zabbix")
        .env("ZBX_DB_ENCRYPTION", "false")
        .env("ZBX_HISTORYSTORAGEURL", "http://elastic:9200")
        .env("ZBX_HISTORYSTORAGETYPES", "['uint','dbl']")
        .output()?;
    assert!(output.status.success());

    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("$DB['SERVER']   = 'postgres-server';"));
    assert!(stdout.contains("$DB['ENCRYPTION'] = false;"));
    assert!(stdout.contains("$HISTORY['types'] = ['uint','dbl'];"));
    assert!(!stdout.contains('{'));
    Ok(())
}

#[test]
fn render_json_reports_missing_placeholders() -> io::Result<()> {
    let dir = tempfile::tempdir()?;
    let template = dir.path().join("zabbix.conf.php");
    let out = dir.path().join("rendered.php");
    fs::write(&template, PGSQL_TEMPLATE)?;

    let output = zbx_webconf()
        .args(["--output", "json", "render", "--template"])
        .arg(&template)
        .arg("--out")
        .arg(&out)
        .env("DB_SERVER_HOST", "postgres-server")
        .output()?;
    assert!(output.status.success());

    let value: serde_json::Value =
        serde_json::from_slice(&output.stdout).map_err(io::Error::other)?;
    assert_eq!(value["status"], "ok");
    assert_eq!(value["substituted"], serde_json::json!(["DB_SERVER_HOST"]));
    assert_eq!(value["missing"].as_array().map(Vec::len), Some(5));
    assert!(value["text"].is_null());

    let rendered = fs::read_to_string(&out)?;
    assert!(rendered.contains("$DB['PORT']     = '';"));

    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("DB_SERVER_PORT"));
    Ok(())
}

#[test]
fn render_missing_template_is_io_error() -> io::Result<()> {
    let dir = tempfile::tempdir()?;
    let output = zbx_webconf()
        .args(["render", "--template"])
        .arg(dir.path().join("absent.php"))
        .output()?;
    assert_eq!(output.status.code(), Some(3));
    assert!(String::from_utf8_lossy(&output.stderr).starts_with("error: io error:"));
    Ok(())
}
