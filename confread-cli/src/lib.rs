//! Command-line front end for confread.
//!
//! Scans one configuration file and either dumps every section and key or
//! prints a single section or value.

use std::io::{self, Write};
use std::path::PathBuf;

use clap::{ArgAction, Parser};
use confread_core::{Document, Limits, LogReporter, ScanError, Scanner};
use thiserror::Error;

pub mod logging;

/// Command-line arguments for the `confread` tool.
#[derive(Debug, Parser)]
#[command(name = "confread", version, about = "Dump or query an INI-style config file")]
pub struct Args {
    /// Config file to scan.
    pub path: PathBuf,
    /// Print the entries of this section.
    #[arg(short, long)]
    pub section: Option<String>,
    /// Print only this key's value (requires --section).
    #[arg(short, long, requires = "section")]
    pub key: Option<String>,
    /// Require the value to be a positive 32-bit integer.
    #[arg(short, long, requires = "key")]
    pub unsigned: bool,
    /// Override the maximum stored value length in bytes.
    #[arg(long)]
    pub max_value_len: Option<usize>,
    /// Increase log verbosity (-v, -vv, -vvv).
    #[arg(short, long, action = ArgAction::Count)]
    pub verbose: u8,
}

/// Why a run failed.
#[derive(Debug, Error)]
pub enum RunError {
    #[error(transparent)]
    Scan(#[from] ScanError),

    #[error("no section named '{0}'")]
    MissingSection(String),

    #[error("no key '{key}' in section '{section}'")]
    MissingKey { section: String, key: String },

    #[error("value of '{key}' in section '{section}' is not a positive integer: {value}")]
    NotUnsigned {
        section: String,
        key: String,
        value: String,
    },

    #[error("failed to write output: {0}")]
    Output(#[from] io::Error),
}

impl RunError {
    /// Scan failures are already logged by the reporter.
    pub fn already_reported(&self) -> bool {
        matches!(self, RunError::Scan(_))
    }
}

/// Scan `args.path` and write the requested view to `out`.
pub fn run<W: Write>(args: &Args, out: &mut W) -> Result<(), RunError> {
    let mut limits = Limits::default();
    if let Some(len) = args.max_value_len {
        limits = limits.with_max_value_len(len);
    }

    let doc = Scanner::new()
        .with_limits(limits)
        .scan_with(&args.path, &mut LogReporter)?;
    tracing::info!(path = %args.path.display(), sections = doc.len(), "config loaded");

    match (&args.section, &args.key) {
        (None, _) => doc.debug_dump(out)?,
        (Some(section), None) => print_section(&doc, section, out)?,
        (Some(section), Some(key)) => print_value(&doc, section, key, args.unsigned, out)?,
    }
    Ok(())
}

fn print_section<W: Write>(doc: &Document, section: &str, out: &mut W) -> Result<(), RunError> {
    let found = doc
        .find_section(section)
        .ok_or_else(|| RunError::MissingSection(section.to_string()))?;
    for key in found.keys() {
        writeln!(out, "{}={}", key.key(), key.value())?;
    }
    Ok(())
}

fn print_value<W: Write>(
    doc: &Document,
    section: &str,
    key: &str,
    unsigned: bool,
    out: &mut W,
) -> Result<(), RunError> {
    if doc.find_section(section).is_none() {
        return Err(RunError::MissingSection(section.to_string()));
    }
    let value = doc.value(section, key).ok_or_else(|| RunError::MissingKey {
        section: section.to_string(),
        key: key.to_string(),
    })?;

    if unsigned {
        let n = doc
            .value_as_unsigned(section, key)
            .ok_or_else(|| RunError::NotUnsigned {
                section: section.to_string(),
                key: key.to_string(),
                value: value.to_string(),
            })?;
        writeln!(out, "{n}")?;
    } else {
        writeln!(out, "{value}")?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write as _;
    use tempfile::NamedTempFile;

    fn config_file() -> NamedTempFile {
        let mut file = NamedTempFile::new().expect("create temp file");
        file.write_all(b"[general]\ncom-port = /dev/ttyUSB0\nbaud = 9600\n[zone-map]\n1 = Front Door\n")
            .expect("write temp file");
        file
    }

    fn args(path: PathBuf, extra: &[&str]) -> Args {
        let path = path.to_string_lossy().into_owned();
        let mut argv = vec!["confread", path.as_str()];
        argv.extend_from_slice(extra);
        Args::try_parse_from(argv).expect("valid arguments")
    }

    fn output(args: &Args) -> Result<String, RunError> {
        let mut out = Vec::new();
        run(args, &mut out)?;
        Ok(String::from_utf8(out).expect("utf-8 output"))
    }

    #[test]
    fn dump_everything() {
        let file = config_file();
        let text = output(&args(file.path().to_path_buf(), &[])).unwrap();
        assert!(text.contains("**** Section: general"));
        assert!(text.contains("Key: com-port"));
        assert!(text.contains("**** Section: zone-map"));
    }

    #[test]
    fn print_one_section() {
        let file = config_file();
        let text = output(&args(file.path().to_path_buf(), &["--section", "zone-map"])).unwrap();
        assert_eq!(text, "1=FrontDoor\n");
    }

    #[test]
    fn print_one_value() {
        let file = config_file();
        let text = output(&args(
            file.path().to_path_buf(),
            &["-s", "general", "-k", "com-port"],
        ))
        .unwrap();
        assert_eq!(text, "/dev/ttyUSB0\n");
    }

    #[test]
    fn print_unsigned_value() {
        let file = config_file();
        let path = file.path().to_path_buf();
        let text = output(&args(path.clone(), &["-s", "general", "-k", "baud", "-u"])).unwrap();
        assert_eq!(text, "9600\n");

        let err = output(&args(path, &["-s", "general", "-k", "com-port", "-u"])).unwrap_err();
        assert!(matches!(err, RunError::NotUnsigned { .. }));
    }

    #[test]
    fn missing_section_and_key() {
        let file = config_file();
        let path = file.path().to_path_buf();
        let err = output(&args(path.clone(), &["-s", "nope"])).unwrap_err();
        assert!(matches!(err, RunError::MissingSection(_)));

        let err = output(&args(path, &["-s", "general", "-k", "nope"])).unwrap_err();
        assert!(matches!(err, RunError::MissingKey { .. }));
    }

    #[test]
    fn value_length_override() {
        let file = config_file();
        let text = output(&args(
            file.path().to_path_buf(),
            &["-s", "general", "-k", "com-port", "--max-value-len", "4"],
        ))
        .unwrap();
        assert_eq!(text, "/dev\n");
    }

    #[test]
    fn scan_failure_is_already_reported() {
        let err = output(&args(PathBuf::from("/nonexistent/confread.conf"), &[])).unwrap_err();
        assert!(err.already_reported());
    }

    #[test]
    fn key_requires_section() {
        let result = Args::try_parse_from(["confread", "x.conf", "--key", "k"]);
        assert!(result.is_err());
    }
}
