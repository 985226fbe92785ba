#![allow(dead_code)]

use ferrum_models::FhirJsonCodec;
use serde_json::Value;
use std::fs;
use std::path::PathBuf;
use std::sync::OnceLock;

static CODEC: OnceLock<FhirJsonCodec> = OnceLock::new();

/// Shared lenient codec over the full R4 registry
pub fn codec() -> &'static FhirJsonCodec {
    CODEC.get_or_init(FhirJsonCodec::r4)
}

pub fn test_data_dir() -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .join("tests")
        .join("data")
}

pub fn load_fixture_str(name: &str) -> String {
    let path = test_data_dir().join(name);
    fs::read_to_string(&path).unwrap_or_else(|_| panic!("Failed to read {}", path.display()))
}

pub fn load_fixture(name: &str) -> Value {
    serde_json::from_str(&load_fixture_str(name))
        .unwrap_or_else(|e| panic!("Fixture {name} is not valid JSON: {e}"))
}

/// Every `*.json` fixture name, sorted
pub fn fixture_names() -> Vec<String> {
    let mut names: Vec<String> = fs::read_dir(test_data_dir())
        .expect("test data directory is missing")
        .flatten()
        .filter_map(|entry| entry.file_name().to_str().map(str::to_string))
        .filter(|name| name.ends_with(".json"))
        .collect();
    names.sort();
    names
}
