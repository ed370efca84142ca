//! Line tokens - what the scanner finds at the cursor.
//!
//! Tokenizing is a single-character dispatch: the byte under the cursor
//! decides the token, and the text belonging to a section, key, or value
//! token is copied into a caller-supplied buffer. The only state carried
//! between tokens on one line is the cursor position.

use std::collections::TryReserveError;

use crate::cursor::LineCursor;
use crate::error::SyntaxErrorCode;
use crate::limits::Limits;

/// One token scanned from a line.
///
/// Section, key, and value tokens leave their text in the buffer passed to
/// [`LineScanner::next_token`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Token {
    /// End of line.
    Blank,
    /// `;` or `#` - the rest of the line is ignored.
    Comment,
    /// `[name]`
    Section,
    /// `name` up to (not including) `=`
    Key,
    /// `=text` up to a comment or end of line
    Value,
    /// Nothing valid here.
    Error(SyntaxErrorCode),
}

impl Token {
    /// Check if nothing more is expected on the line.
    #[inline]
    pub fn ends_line(self) -> bool {
        matches!(self, Token::Blank | Token::Comment)
    }
}

const SECTION_STOPS: &[u8] = b"]";
const KEY_STOPS: &[u8] = b"=";
const VALUE_STOPS: &[u8] = b";#";

/// Tokenizer over a single whitespace-free line.
#[derive(Debug, Clone)]
pub struct LineScanner<'a> {
    cursor: LineCursor<'a>,
    limits: Limits,
}

impl<'a> LineScanner<'a> {
    /// Scan `line`, which must already have spaces, tabs, and the line
    /// terminator removed.
    pub fn new(line: &'a str, limits: Limits) -> Self {
        Self {
            cursor: LineCursor::new(line),
            limits,
        }
    }

    /// The cursor, for inspecting how far the line was consumed.
    pub fn cursor(&self) -> &LineCursor<'a> {
        &self.cursor
    }

    /// Scan the next token.
    ///
    /// Text for section, key, and value tokens goes into `text` when given,
    /// and is skipped otherwise.
    pub fn next_token(&mut self, text: Option<&mut String>) -> Result<Token, TryReserveError> {
        let token = match self.cursor.peek() {
            None => Token::Blank,
            Some(b';' | b'#') => Token::Comment,
            Some(b'[') => {
                self.cursor.bump();
                let stop =
                    self.cursor
                        .copy_until(text, self.limits.max_section_len, SECTION_STOPS)?;
                if stop == Some(b']') {
                    self.cursor.bump();
                    Token::Section
                } else {
                    Token::Error(SyntaxErrorCode::UnclosedSection)
                }
            }
            Some(b'=') => {
                self.cursor.bump();
                self.cursor
                    .copy_until(text, self.limits.max_value_len, VALUE_STOPS)?;
                Token::Value
            }
            Some(b) if b.is_ascii_alphanumeric() => {
                match self.cursor.copy_until(text, self.limits.max_key_len, KEY_STOPS)? {
                    Some(b'=') => Token::Key,
                    _ => Token::Error(SyntaxErrorCode::MissingEquals),
                }
            }
            Some(_) => Token::Error(SyntaxErrorCode::InvalidCharacter),
        };
        tracing::trace!(?token, at = self.cursor.position(), "token");
        Ok(token)
    }
}
