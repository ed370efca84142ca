//! Length limits applied while scanning.
//!
//! Every limit is a maximum byte count for stored text. Input beyond a
//! limit is dropped, never rejected, and truncation always lands on a UTF-8
//! character boundary. Physical lines have no length limit of their own;
//! the field limits also bound what is buffered per line.

/// Default maximum length of a section name.
pub const DEFAULT_MAX_SECTION_LEN: usize = 127;
/// Default maximum length of a key.
pub const DEFAULT_MAX_KEY_LEN: usize = 127;
/// Default maximum length of a value.
pub const DEFAULT_MAX_VALUE_LEN: usize = 767;

/// Scanner limits.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Limits {
    /// Bytes kept from a `[section]` name.
    pub max_section_len: usize,
    /// Bytes kept from a key.
    pub max_key_len: usize,
    /// Bytes kept from a value.
    pub max_value_len: usize,
}

impl Limits {
    /// Limits that never truncate anything.
    pub const fn unbounded() -> Self {
        Self {
            max_section_len: usize::MAX,
            max_key_len: usize::MAX,
            max_value_len: usize::MAX,
        }
    }

    /// Override the value limit.
    pub const fn with_max_value_len(mut self, len: usize) -> Self {
        self.max_value_len = len;
        self
    }

    /// Most bytes buffered for one line after blanks are removed.
    ///
    /// Each field may run up to three bytes past its limit to finish a
    /// character, plus one byte per delimiter.
    pub const fn max_retained_line(&self) -> usize {
        let section = self.max_section_len.saturating_add(6);
        let entry = self
            .max_key_len
            .saturating_add(self.max_value_len)
            .saturating_add(9);
        if section > entry {
            section
        } else {
            entry
        }
    }
}

impl Default for Limits {
    fn default() -> Self {
        Self {
            max_section_len: DEFAULT_MAX_SECTION_LEN,
            max_key_len: DEFAULT_MAX_KEY_LEN,
            max_value_len: DEFAULT_MAX_VALUE_LEN,
        }
    }
}

/// Largest prefix of `s` that fits in `max` bytes without splitting a character.
pub(crate) fn truncate_at_boundary(s: &str, max: usize) -> &str {
    if s.len() <= max {
        return s;
    }
    let mut end = max;
    while !s.is_char_boundary(end) {
        end -= 1;
    }
    &s[..end]
}
