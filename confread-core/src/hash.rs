//! String hashing for name lookups.
//!
//! Jenkins one-at-a-time over raw bytes. The hash is only a pre-filter:
//! different hashes prove two names differ, equal hashes prove nothing and
//! are always followed by an exact comparison.

/// Hash a name. The empty string hashes to 0.
#[inline]
pub fn hash(name: &str) -> u32 {
    hash_bytes(name.as_bytes())
}

/// Hash raw bytes.
pub fn hash_bytes(bytes: &[u8]) -> u32 {
    let mut h: u32 = 0;
    for &b in bytes {
        h = h.wrapping_add(u32::from(b));
        h = h.wrapping_add(h << 10);
        h ^= h >> 6;
    }
    h = h.wrapping_add(h << 3);
    h ^= h >> 11;
    h.wrapping_add(h << 15)
}

/// A name paired with its precomputed hash.
///
/// Comparison checks the hash first and falls back to the bytes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct HashedName {
    text: String,
    hash: u32,
}

impl HashedName {
    pub(crate) fn new(text: String) -> Self {
        let hash = hash(&text);
        Self { text, hash }
    }

    #[inline]
    pub(crate) fn as_str(&self) -> &str {
        &self.text
    }

    #[inline]
    pub(crate) fn hash(&self) -> u32 {
        self.hash
    }

    /// Check against a query whose hash was computed once by the caller.
    #[inline]
    pub(crate) fn matches(&self, query: &str, query_hash: u32) -> bool {
        self.hash == query_hash && self.text == query
    }
}
