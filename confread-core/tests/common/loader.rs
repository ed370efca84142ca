//! Fixture loading from YAML files

use serde::Deserialize;
use std::path::Path;

/// A single test case from a fixture file
#[derive(Debug, Clone, Deserialize)]
pub struct TestCase {
    pub id: String,
    pub desc: String,
    pub input: String,
    /// Sections expected in file order (ignored when `error` is set)
    #[serde(default)]
    pub sections: Vec<ExpectedSection>,
    /// Expected scan failure
    #[serde(default)]
    pub error: Option<ExpectedError>,
}

/// A section and its entries, in file order
#[derive(Debug, Clone, Deserialize)]
pub struct ExpectedSection {
    pub name: String,
    #[serde(default)]
    pub keys: Vec<(String, String)>,
}

/// A syntax error: 1-based line and the `SyntaxErrorCode` variant name
#[derive(Debug, Clone, Deserialize)]
pub struct ExpectedError {
    pub line: usize,
    pub code: String,
}

/// Load all test cases from a YAML fixture file
pub fn load_fixtures(path: &Path) -> Vec<TestCase> {
    let content = std::fs::read_to_string(path)
        .unwrap_or_else(|e| panic!("Failed to read fixture file {:?}: {}", path, e));
    serde_yaml::from_str(&content)
        .unwrap_or_else(|e| panic!("Failed to parse fixture file {:?}: {}", path, e))
}

/// Load fixtures from the standard fixtures directory
pub fn load_fixtures_by_name(name: &str) -> Vec<TestCase> {
    let path = Path::new(env!("CARGO_MANIFEST_DIR"))
        .join("tests")
        .join("fixtures")
        .join(format!("{}.yaml", name));
    load_fixtures(&path)
}
