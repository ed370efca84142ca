//! Building a [`Document`] from lines of text.
//!
//! The builder reads one physical line at a time with spaces and tabs
//! already removed, and applies the line grammar:
//!
//! ```text
//! line    := blank | comment | section tail | key value tail
//! section := '[' name ']'
//! key     := alnum (any but '=')*
//! value   := '=' (any but ';' '#')*
//! tail    := blank | comment
//! ```
//!
//! The first violation, read failure, or allocation failure ends the scan;
//! the partly built document is dropped and only the error comes back.

use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;

use crate::document::Document;
use crate::error::{LogReporter, Reporter, ScanError, SyntaxErrorCode};
use crate::limits::Limits;
use crate::line::LineReader;
use crate::token::{LineScanner, Token};

/// Scan the file at `path`.
///
/// On failure the error is passed to `reporter` (or to [`LogReporter`] when
/// `None`) and then returned.
///
/// ```no_run
/// use confread_core::scan;
///
/// let doc = scan("/etc/xplademco.conf", None)?;
/// let port = doc.value("general", "com-port");
/// # Ok::<(), confread_core::ScanError>(())
/// ```
pub fn scan<P: AsRef<Path>>(
    path: P,
    reporter: Option<&mut dyn Reporter>,
) -> Result<Document, ScanError> {
    let mut default = LogReporter;
    let reporter: &mut dyn Reporter = match reporter {
        Some(r) => r,
        None => &mut default,
    };
    Scanner::new().scan_with(path, reporter)
}

/// Configurable entry point for scanning.
#[derive(Debug, Clone, Default)]
pub struct Scanner {
    limits: Limits,
}

impl Scanner {
    /// Scanner with default limits.
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace the limits.
    pub fn with_limits(mut self, limits: Limits) -> Self {
        self.limits = limits;
        self
    }

    pub fn limits(&self) -> Limits {
        self.limits
    }

    /// Scan a file, reporting any failure before returning it.
    pub fn scan_with<P: AsRef<Path>>(
        &self,
        path: P,
        reporter: &mut dyn Reporter,
    ) -> Result<Document, ScanError> {
        let result = self.scan_path(path);
        if let Err(e) = &result {
            reporter.report(e);
        }
        result
    }

    /// Scan a file without reporting.
    pub fn scan_path<P: AsRef<Path>>(&self, path: P) -> Result<Document, ScanError> {
        let path = path.as_ref();
        tracing::debug!(path = %path.display(), "scanning config file");
        let file = File::open(path).map_err(|source| ScanError::Open {
            path: path.to_path_buf(),
            source,
        })?;
        self.scan_reader(BufReader::new(file))
    }

    /// Scan lines from any buffered reader.
    ///
    /// Memory held for a line is bounded by [`Limits::max_retained_line`],
    /// whatever the length of the physical line.
    pub fn scan_reader<R: BufRead>(&self, reader: R) -> Result<Document, ScanError> {
        let mut lines = LineReader::new(reader, self.limits);
        let mut builder = DocumentBuilder::new(self.limits);

        while let Some((number, line)) = lines.next_line()? {
            builder.line(line, number)?;
        }

        let doc = builder.finish();
        tracing::debug!(sections = doc.len(), lines = lines.number(), "scan complete");
        Ok(doc)
    }

    /// Scan text already in memory.
    pub fn scan_str(&self, text: &str) -> Result<Document, ScanError> {
        self.scan_reader(text.as_bytes())
    }
}

impl Document {
    /// Parse text with default limits.
    pub fn parse(text: &str) -> Result<Self, ScanError> {
        Scanner::new().scan_str(text)
    }
}

// ============================================================================
// DocumentBuilder (line consumer)
// ============================================================================

/// Folds tokenized lines into a document.
struct DocumentBuilder {
    doc: Document,
    limits: Limits,
    /// Text of the last section, key, or value token.
    text: String,
}

impl DocumentBuilder {
    fn new(limits: Limits) -> Self {
        DocumentBuilder {
            doc: Document::new(),
            limits,
            text: String::new(),
        }
    }

    fn line(&mut self, line: &str, number: usize) -> Result<(), ScanError> {
        let _span = tracing::trace_span!("line", number).entered();
        let mut scanner = LineScanner::new(line, self.limits);

        match scanner.next_token(Some(&mut self.text))? {
            Token::Blank | Token::Comment => Ok(()),

            Token::Section => {
                let name = std::mem::take(&mut self.text);
                if !scanner.next_token(None)?.ends_line() {
                    return Err(ScanError::syntax(number, SyntaxErrorCode::TrailingAfterSection));
                }
                tracing::debug!(section = %name, line = number, "section");
                self.doc.push_section(name, number)?;
                Ok(())
            }

            Token::Key => {
                let key = std::mem::take(&mut self.text);
                if scanner.next_token(Some(&mut self.text))? != Token::Value {
                    return Err(ScanError::syntax(number, SyntaxErrorCode::ExpectedValue));
                }
                let value = std::mem::take(&mut self.text);
                if !scanner.next_token(None)?.ends_line() {
                    return Err(ScanError::syntax(number, SyntaxErrorCode::TrailingAfterValue));
                }

                tracing::debug!(key = %key, value = %value, line = number, "key");
                if !self.doc.push_key(key, value, number)? {
                    tracing::debug!(line = number, "key before any section, not stored");
                }
                Ok(())
            }

            Token::Value => Err(ScanError::syntax(number, SyntaxErrorCode::UnexpectedValue)),

            Token::Error(code) => Err(ScanError::syntax(number, code)),
        }
    }

    fn finish(self) -> Document {
        self.doc
    }
}

// ============================================================================
// Tests
// ============================================================================
