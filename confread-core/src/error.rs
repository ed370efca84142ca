//! Scan failures and the reporting channel.
//!
//! A scan fails on the first problem it meets. The failure is returned as a
//! [`ScanError`] and, when scanning through [`crate::scan`], also handed to a
//! [`Reporter`] exactly once before the call returns.

use std::collections::TryReserveError;
use std::io;
use std::path::PathBuf;

use thiserror::Error;

/// Why a line was rejected.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u8)]
pub enum SyntaxErrorCode {
    /// `[name` with no closing `]`
    UnclosedSection = 0,
    /// A key with no `=` on the line
    MissingEquals,
    /// Line starts with something that is not a key, section, or comment
    InvalidCharacter,
    /// Anything but a comment after `[name]`
    TrailingAfterSection,
    /// A key not followed by `=value`
    ExpectedValue,
    /// Anything but a comment after `key=value`
    TrailingAfterValue,
    /// `=value` with no key
    UnexpectedValue,
}

impl SyntaxErrorCode {
    /// Get a human-readable message for this error code.
    pub fn message(self) -> &'static str {
        match self {
            Self::UnclosedSection => "section not closed off",
            Self::MissingEquals => "key not followed by '='",
            Self::InvalidCharacter => "invalid character at start of line",
            Self::TrailingAfterSection => "only a comment may follow a section",
            Self::ExpectedValue => "expected a value after the key",
            Self::TrailingAfterValue => "only a comment may follow a value",
            Self::UnexpectedValue => "value without a key",
        }
    }
}

impl std::fmt::Display for SyntaxErrorCode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.message())
    }
}

/// Broad failure category.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    /// Memory could not be reserved.
    Alloc,
    /// A line violated the grammar.
    Syntax,
    /// Reading an opened file failed.
    Read,
    /// The file could not be opened.
    Open,
}

/// A failed scan.
#[derive(Debug, Error)]
pub enum ScanError {
    #[error("memory allocation error while building the document")]
    Alloc(#[from] TryReserveError),

    #[error("syntax error in config file on line: {line} ({code})")]
    Syntax { line: usize, code: SyntaxErrorCode },

    #[error("I/O error reading config file: {source}")]
    Read {
        #[source]
        source: io::Error,
    },

    #[error("could not open config file at: {}", path.display())]
    Open {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}

impl ScanError {
    /// The failure category.
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::Alloc(_) => ErrorKind::Alloc,
            Self::Syntax { .. } => ErrorKind::Syntax,
            Self::Read { .. } => ErrorKind::Read,
            Self::Open { .. } => ErrorKind::Open,
        }
    }

    /// 1-based source line for syntax errors.
    pub fn line(&self) -> Option<usize> {
        match self {
            Self::Syntax { line, .. } => Some(*line),
            _ => None,
        }
    }

    /// Path that failed to open.
    pub fn path(&self) -> Option<&std::path::Path> {
        match self {
            Self::Open { path, .. } => Some(path),
            _ => None,
        }
    }

    pub(crate) fn syntax(line: usize, code: SyntaxErrorCode) -> Self {
        Self::Syntax { line, code }
    }
}

/// Receives scan failures as they happen.
pub trait Reporter {
    fn report(&mut self, error: &ScanError);
}

impl<F> Reporter for F
where
    F: FnMut(&ScanError),
{
    fn report(&mut self, error: &ScanError) {
        self(error)
    }
}

/// Default reporter: logs every failure at error level.
#[derive(Debug, Clone, Copy, Default)]
pub struct LogReporter;

impl Reporter for LogReporter {
    fn report(&mut self, error: &ScanError) {
        match error {
            ScanError::Alloc(e) => {
                tracing::error!("Memory allocation error in confread: {e}");
            }
            ScanError::Syntax { line, code } => {
                tracing::error!(line, reason = %code, "Syntax error in config file on line: {line}");
            }
            ScanError::Read { source } => {
                tracing::error!("I/O error in confread: {source}");
            }
            ScanError::Open { path, source } => {
                tracing::error!(error = %source, "Could not open config file at: {}", path.display());
            }
        }
    }
}
