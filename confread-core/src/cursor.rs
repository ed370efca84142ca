//! Line cursor and the stop-set copy primitive.
//!
//! The tokenizer consumes a line by repeatedly copying (or skipping) text up
//! to a set of terminator bytes. Terminators are always ASCII, so every
//! position the cursor stops at is a character boundary.

use std::collections::TryReserveError;

use memchr::{memchr, memchr2, memchr3};

use crate::limits::truncate_at_boundary;

/// A read position within one line.
#[derive(Debug, Clone)]
pub struct LineCursor<'a> {
    line: &'a str,
    pos: usize,
}

impl<'a> LineCursor<'a> {
    /// Start at the beginning of `line`.
    pub fn new(line: &'a str) -> Self {
        Self { line, pos: 0 }
    }

    /// Byte under the cursor, or `None` at end of line.
    #[inline]
    pub fn peek(&self) -> Option<u8> {
        self.line.as_bytes().get(self.pos).copied()
    }

    /// Step over the byte under the cursor.
    ///
    /// Only called after `peek` returned an ASCII delimiter.
    #[inline]
    pub fn bump(&mut self) {
        debug_assert!(self.peek().is_some_and(|b| b.is_ascii()));
        if self.pos < self.line.len() {
            self.pos += 1;
        }
    }

    /// Unconsumed remainder of the line.
    #[inline]
    pub fn rest(&self) -> &'a str {
        &self.line[self.pos..]
    }

    /// Byte offset of the cursor.
    #[inline]
    pub fn position(&self) -> usize {
        self.pos
    }

    /// Check if the whole line has been consumed.
    #[inline]
    pub fn is_at_end(&self) -> bool {
        self.pos >= self.line.len()
    }

    /// Copy up to the first byte in `stops`, leaving the cursor on it.
    ///
    /// With `Some(dest)`, `dest` is cleared and receives at most `max_len`
    /// bytes of the consumed text; the rest is consumed and dropped. With
    /// `None` the text is skipped.
    ///
    /// Returns the terminator found, or `None` if the line ran out first.
    pub fn copy_until(
        &mut self,
        dest: Option<&mut String>,
        max_len: usize,
        stops: &[u8],
    ) -> Result<Option<u8>, TryReserveError> {
        debug_assert!(stops.iter().all(u8::is_ascii));

        let rest = self.rest();
        let (taken, stop) = match find_stop(rest.as_bytes(), stops) {
            Some(i) => (&rest[..i], rest.as_bytes().get(i).copied()),
            None => (rest, None),
        };
        self.pos += taken.len();

        if let Some(dest) = dest {
            dest.clear();
            let kept = truncate_at_boundary(taken, max_len);
            dest.try_reserve(kept.len())?;
            dest.push_str(kept);
            if kept.len() < taken.len() {
                tracing::warn!(
                    kept = kept.len(),
                    dropped = taken.len() - kept.len(),
                    "field longer than limit, truncated"
                );
            }
        }

        Ok(stop)
    }
}

/// Offset of the first byte of `hay` that is in `stops`.
fn find_stop(hay: &[u8], stops: &[u8]) -> Option<usize> {
    match *stops {
        [] => None,
        [a] => memchr(a, hay),
        [a, b] => memchr2(a, b, hay),
        [a, b, c] => memchr3(a, b, c, hay),
        _ => hay.iter().position(|b| stops.contains(b)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_copy_stops_on_terminator() {
        let mut cur = LineCursor::new("section]rest");
        let mut dest = String::new();
        let stop = cur.copy_until(Some(&mut dest), 64, b"]").unwrap();
        assert_eq!(stop, Some(b']'));
        assert_eq!(dest, "section");
        assert_eq!(cur.peek(), Some(b']'));
        assert_eq!(cur.rest(), "]rest");
    }

    #[test]
    fn test_copy_runs_off_end() {
        let mut cur = LineCursor::new("section");
        let mut dest = String::new();
        let stop = cur.copy_until(Some(&mut dest), 64, b"]").unwrap();
        assert_eq!(stop, None);
        assert_eq!(dest, "section");
        assert!(cur.is_at_end());
    }

    #[test]
    fn test_first_of_several_stops_wins() {
        let mut cur = LineCursor::new("value#c;d");
        let mut dest = String::new();
        assert_eq!(cur.copy_until(Some(&mut dest), 64, b";#").unwrap(), Some(b'#'));
        assert_eq!(dest, "value");
    }

    #[test]
    fn test_skip_without_destination() {
        let mut cur = LineCursor::new("abc=def");
        assert_eq!(cur.copy_until(None, 0, b"=").unwrap(), Some(b'='));
        assert_eq!(cur.position(), 3);
    }

    #[test]
    fn test_truncates_but_consumes() {
        let mut cur = LineCursor::new("abcdefgh=1");
        let mut dest = String::new();
        let stop = cur.copy_until(Some(&mut dest), 3, b"=").unwrap();
        assert_eq!(dest, "abc");
        assert_eq!(stop, Some(b'='));
        assert_eq!(cur.rest(), "=1");
    }

    #[test]
    fn test_truncation_respects_char_boundary() {
        let mut cur = LineCursor::new("aéb");
        let mut dest = String::new();
        cur.copy_until(Some(&mut dest), 2, b"]").unwrap();
        assert_eq!(dest, "a");
    }

    #[test]
    fn test_destination_is_cleared() {
        let mut cur = LineCursor::new("new");
        let mut dest = String::from("stale contents");
        cur.copy_until(Some(&mut dest), 64, b"=").unwrap();
        assert_eq!(dest, "new");
    }

    #[test]
    fn test_many_stops_fallback() {
        let mut cur = LineCursor::new("abcd!x");
        assert_eq!(cur.copy_until(None, 0, b"!?.,").unwrap(), Some(b'!'));
        assert_eq!(cur.position(), 4);
    }

    #[test]
    fn test_empty_stop_set_consumes_line() {
        let mut cur = LineCursor::new("abc");
        assert_eq!(cur.copy_until(None, 0, b"").unwrap(), None);
        assert!(cur.is_at_end());
    }
}
