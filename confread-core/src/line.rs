//! Physical line reading with bounded memory.
//!
//! Lines are read straight from the underlying [`BufRead`] buffer. Spaces
//! and tabs are dropped as they arrive, and each field keeps only as many
//! bytes as its limit allows (plus the tail of a split character), so the
//! retained line never grows past [`Limits::max_retained_line`] however long
//! the physical line is. Delimiters are always kept, so compaction never
//! changes which tokens the tokenizer finds.

use std::collections::TryReserveError;
use std::io::{self, BufRead};

use memchr::memchr;

use crate::error::ScanError;
use crate::limits::Limits;

/// Longest UTF-8 continuation tail a field may keep past its limit.
const MAX_CHAR_TAIL: usize = 3;

/// Which part of the line the next kept byte belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Part {
    /// Nothing but blanks seen yet.
    Start,
    /// Inside `[name`.
    Section,
    /// Right after `]`; only the first byte decides the tail.
    AfterSection,
    /// Inside a key, before `=`.
    Key,
    /// After `=`, up to a comment marker.
    Value,
    /// The rest of the line cannot change the outcome.
    Done,
}

/// Byte budget for the field currently being kept.
#[derive(Debug, Clone, Copy)]
struct Field {
    kept: usize,
    open: bool,
}

impl Field {
    const fn new() -> Self {
        Field { kept: 0, open: true }
    }

    /// Decide whether byte `b` of this field is kept under `max`.
    fn admit(&mut self, b: u8, max: usize) -> bool {
        let continuation = b & 0xC0 == 0x80;
        let fits = self.kept < max
            || (continuation && self.kept < max.saturating_add(MAX_CHAR_TAIL));
        if self.open && fits {
            self.kept += 1;
            true
        } else {
            self.open = false;
            false
        }
    }
}

/// Line compaction state, kept apart from the reader so it can be fed while
/// the reader's buffer is borrowed.
#[derive(Debug)]
struct Compactor {
    limits: Limits,
    buf: Vec<u8>,
    part: Part,
    field: Field,
    pending_cr: bool,
    dropped: usize,
}

impl Compactor {
    fn new(limits: Limits) -> Self {
        Compactor {
            limits,
            buf: Vec::new(),
            part: Part::Start,
            field: Field::new(),
            pending_cr: false,
            dropped: 0,
        }
    }

    fn reset(&mut self) {
        self.buf.clear();
        self.part = Part::Start;
        self.field = Field::new();
        self.pending_cr = false;
        self.dropped = 0;
    }

    fn push(&mut self, b: u8) -> Result<(), TryReserveError> {
        self.buf.try_reserve(1)?;
        self.buf.push(b);
        Ok(())
    }

    fn enter(&mut self, part: Part) {
        self.part = part;
        self.field = Field::new();
    }

    /// Feed bytes of one line, none of them `\n`.
    fn feed(&mut self, bytes: &[u8]) -> Result<(), TryReserveError> {
        for &b in bytes {
            if self.pending_cr {
                self.pending_cr = false;
                self.byte(b'\r')?;
            }
            if b == b'\r' {
                self.pending_cr = true;
            } else {
                self.byte(b)?;
            }
        }
        Ok(())
    }

    fn byte(&mut self, b: u8) -> Result<(), TryReserveError> {
        if b == b' ' || b == b'\t' {
            return Ok(());
        }
        match self.part {
            Part::Start => {
                self.push(b)?;
                match b {
                    b'[' => self.enter(Part::Section),
                    b if b.is_ascii_alphanumeric() => {
                        self.enter(Part::Key);
                        self.field.kept = 1;
                    }
                    _ => self.enter(Part::Done),
                }
            }
            Part::Section => {
                if b == b']' {
                    self.push(b)?;
                    self.enter(Part::AfterSection);
                } else {
                    self.keep(b, self.limits.max_section_len)?;
                }
            }
            Part::AfterSection => {
                self.push(b)?;
                self.enter(Part::Done);
            }
            Part::Key => {
                if b == b'=' {
                    self.push(b)?;
                    self.enter(Part::Value);
                } else {
                    self.keep(b, self.limits.max_key_len)?;
                }
            }
            Part::Value => {
                if b == b';' || b == b'#' {
                    self.push(b)?;
                    self.enter(Part::Done);
                } else {
                    self.keep(b, self.limits.max_value_len)?;
                }
            }
            Part::Done => {}
        }
        Ok(())
    }

    fn keep(&mut self, b: u8, max: usize) -> Result<(), TryReserveError> {
        if self.field.admit(b, max) {
            self.push(b)
        } else {
            self.dropped += 1;
            Ok(())
        }
    }
}

/// Reads physical lines and hands out their compacted text.
#[derive(Debug)]
pub(crate) struct LineReader<R> {
    reader: R,
    line: Compactor,
    number: usize,
}

impl<R: BufRead> LineReader<R> {
    pub(crate) fn new(reader: R, limits: Limits) -> Self {
        LineReader {
            reader,
            line: Compactor::new(limits),
            number: 0,
        }
    }

    /// Number of the line last returned, 1-based.
    pub(crate) fn number(&self) -> usize {
        self.number
    }

    /// Read the next line, without its terminator, spaces, or tabs, along
    /// with its 1-based number.
    ///
    /// Returns `None` at end of input. A final line without `\n` counts.
    pub(crate) fn next_line(&mut self) -> Result<Option<(usize, &str)>, ScanError> {
        self.line.reset();
        let mut seen = false;

        loop {
            let chunk = match self.reader.fill_buf() {
                Ok(chunk) => chunk,
                Err(e) if e.kind() == io::ErrorKind::Interrupted => continue,
                Err(source) => return Err(ScanError::Read { source }),
            };
            if chunk.is_empty() {
                if !seen {
                    return Ok(None);
                }
                break;
            }
            seen = true;

            let (part, used, ended) = match memchr(b'\n', chunk) {
                Some(i) => (&chunk[..i], i + 1, true),
                None => (chunk, chunk.len(), false),
            };
            self.line.feed(part)?;
            self.reader.consume(used);
            if ended {
                break;
            }
        }

        self.number += 1;
        if self.line.dropped > 0 {
            tracing::warn!(
                line = self.number,
                dropped = self.line.dropped,
                "field longer than limit, truncated"
            );
        }

        let text = std::str::from_utf8(&self.line.buf).map_err(|e| ScanError::Read {
            source: io::Error::new(io::ErrorKind::InvalidData, e),
        })?;
        Ok(Some((self.number, text)))
    }

    #[cfg(test)]
    fn retained_capacity(&self) -> usize {
        self.line.buf.capacity()
    }
}
