//! Test infrastructure for the confread scanner
//!
//! Provides fixture loading, stochastic input variations, and a harness that
//! compares scanned documents against fixture expectations.

mod generators;
mod harness;
mod loader;

#[allow(unused_imports)]
pub use generators::Gen;
#[allow(unused_imports)]
pub use harness::{render, run_test, run_with_variations};
#[allow(unused_imports)]
pub use loader::{load_fixtures_by_name, ExpectedError, ExpectedSection, TestCase};
