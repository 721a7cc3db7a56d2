//! Env fixtures stored as JSON objects under `fixtures/env/`.

use std::collections::BTreeMap;
use std::fs;
use std::path::PathBuf;

/// Directory holding this crate's fixtures.
pub fn fixtures_dir() -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("fixtures")
}

/// Path of a named env fixture (e.g. `appliance.valid`).
pub fn env_fixture_path(name: &str) -> PathBuf {
    fixtures_dir().join("env").join(format!("{name}.json"))
}

/// Load a named env fixture as a variable map.
pub fn env_fixture(name: &str) -> Result<BTreeMap<String, String>, Box<dyn std::error::Error>> {
    let contents = fs::read_to_string(env_fixture_path(name))?;
    Ok(serde_json::from_str(&contents)?)
}

/// Names of every env fixture, sorted.
pub fn env_fixture_names() -> Result<Vec<String>, Box<dyn std::error::Error>> {
    let mut names = Vec::new();
    for entry in fs::read_dir(fixtures_dir().join("env"))? {
        let path = entry?.path();
        if path.extension().is_some_and(|ext| ext == "json") {
            if let Some(stem) = path.file_stem().and_then(|stem| stem.to_str()) {
                names.push(stem.to_string());
            }
        }
    }
    names.sort();
    Ok(names)
}
