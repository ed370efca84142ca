//! confread core
//!
//! Reads line-oriented, INI-style configuration files into an immutable,
//! queryable [`Document`] of sections and key/value pairs.
//!
//! ```text
//! ; comment, or # comment
//! [section-name]
//! key = value        ; spaces and tabs anywhere on a line are removed
//! ```
//!
//! # Architecture
//!
//! - **hash.rs** - one-at-a-time string hash used to pre-filter lookups
//! - **line.rs** - bounded physical line reader that drops blanks
//! - **cursor.rs** - line cursor and the stop-set copy primitive
//! - **token.rs** - single-character dispatch line tokenizer
//! - **scan.rs** - grammar driver building a `Document` from lines
//! - **document.rs** - owned store, handles, and the query API
//! - **error.rs** - scan failures and the reporting channel
//! - **limits.rs** - field and line length limits
//! - **value.rs** - numeric interpretation of values

pub mod cursor;
pub mod document;
pub mod error;
pub mod hash;
pub mod limits;
mod line;
pub mod scan;
pub mod token;
pub mod value;

pub use document::{Document, KeyId, KeyRef, SectionId, SectionRef};
pub use error::{ErrorKind, LogReporter, Reporter, ScanError, SyntaxErrorCode};
pub use limits::Limits;
pub use scan::{scan, Scanner};
pub use token::Token;
