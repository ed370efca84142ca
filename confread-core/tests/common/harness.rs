//! Test harness for running fixtures with stochastic variations

use crate::common::{Gen, TestCase};
use confread_core::{Document, ScanError};

/// Result of running a test
#[derive(Debug)]
pub struct TestResult {
    pub passed: bool,
    pub input: String,
    pub expected: Vec<String>,
    pub actual: Vec<String>,
    pub seed: u64,
}

/// Render a scan result as comparable lines (section headers, then entries)
pub fn render(result: &Result<Document, ScanError>) -> Vec<String> {
    match result {
        Ok(doc) => {
            let mut out = Vec::new();
            for section in doc.sections() {
                out.push(format!("[{}]", section.name()));
                for key in section.keys() {
                    out.push(format!("{}={}", key.key(), key.value()));
                }
            }
            out
        }
        Err(ScanError::Syntax { line, code }) => vec![format!("Error line {} {:?}", line, code)],
        Err(other) => vec![format!("Failure {:?}", other.kind())],
    }
}

/// Render what a test case expects, with syntax errors shifted by `line_offset`
fn expected_lines(case: &TestCase, line_offset: usize) -> Vec<String> {
    if let Some(err) = &case.error {
        return vec![format!("Error line {} {}", err.line + line_offset, err.code)];
    }
    let mut out = Vec::new();
    for section in &case.sections {
        out.push(format!("[{}]", section.name));
        for (k, v) in &section.keys {
            out.push(format!("{}={}", k, v));
        }
    }
    out
}

/// Run a single test case (canonical, no variations)
pub fn run_test(case: &TestCase) -> TestResult {
    let actual = render(&Document::parse(&case.input));
    let expected = expected_lines(case, 0);
    TestResult {
        passed: actual == expected,
        input: case.input.clone(),
        expected,
        actual,
        seed: 0,
    }
}

/// Run a test case with stochastic variations
///
/// Applies independent variations:
/// - Filler lines (blank or comment) above the input
/// - Spaces and tabs sprinkled through every line
/// - Trailing comments on lines of inputs that scan cleanly
pub fn run_with_variations(case: &TestCase, gen: &mut Gen) -> TestResult {
    let mut input = String::new();

    let leading = gen.geometric(0.4);
    for _ in 0..leading {
        input.push_str(&gen.filler_line());
        input.push('\n');
    }

    for line in case.input.lines() {
        input.push_str(&gen.spread(line));
        if case.error.is_none() && gen.chance(0.3) {
            input.push_str(" ; trailing comment");
        }
        input.push('\n');
    }

    let actual = render(&Document::parse(&input));
    let expected = expected_lines(case, leading);
    TestResult {
        passed: actual == expected,
        input,
        expected,
        actual,
        seed: gen.seed,
    }
}

impl TestResult {
    /// Print detailed failure info
    pub fn print_failure(&self, case_id: &str) {
        eprintln!("\n=== FAILED: {} ===", case_id);
        eprintln!(
            "Seed: {} (set CONFREAD_TEST_SEED={} to reproduce)",
            self.seed, self.seed
        );
        eprintln!("\nInput:\n{}", self.input);
        eprintln!("\nExpected:");
        for (i, e) in self.expected.iter().enumerate() {
            eprintln!("  {}: {}", i, e);
        }
        eprintln!("\nActual:");
        for (i, e) in self.actual.iter().enumerate() {
            eprintln!("  {}: {}", i, e);
        }
    }
}
