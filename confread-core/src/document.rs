//! The parsed document and its read-only query API.
//!
//! A [`Document`] owns its sections in file order, and each section owns its
//! key entries in file order. Nothing is mutated after the scan that built
//! it; dropping the document releases everything at once.
//!
//! Two handle styles are offered:
//!
//! - [`SectionRef`] / [`KeyRef`] borrow the document, so the compiler rejects
//!   any use after the document is gone.
//! - [`SectionId`] / [`KeyId`] are plain `Copy` values that can be stored
//!   anywhere. Each carries the tag of the document that minted it and is
//!   checked on every use; an id from another or a dropped document, or one
//!   that is out of range, resolves to `None`.
//!
//! # Example
//!
//! ```
//! use confread_core::Document;
//!
//! let doc = Document::parse("[general]\ncom-port = /dev/ttyUSB0\n").unwrap();
//! let general = doc.find_section("general").unwrap();
//! assert_eq!(general.find_key("com-port").unwrap().value(), "/dev/ttyUSB0");
//! assert_eq!(doc.value("general", "com-port"), Some("/dev/ttyUSB0"));
//! ```
//!
//! Borrowed handles cannot outlive their document:
//!
//! ```compile_fail
//! use confread_core::Document;
//!
//! let doc = Document::parse("[a]\nk=v\n").unwrap();
//! let section = doc.find_section("a").unwrap();
//! drop(doc);
//! println!("{}", section.name());
//! ```

use std::collections::TryReserveError;
use std::io::{self, Write};
use std::sync::atomic::{AtomicU64, Ordering};

use crate::hash::{hash, HashedName};
use crate::value::parse_unsigned;

// ============================================================================
// Core Types
// ============================================================================

static NEXT_TAG: AtomicU64 = AtomicU64::new(1);

/// Identity of one document, stamped into every id it hands out.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
struct DocTag(u64);

impl DocTag {
    fn mint() -> Self {
        DocTag(NEXT_TAG.fetch_add(1, Ordering::Relaxed))
    }
}

/// Stable handle to a section.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SectionId {
    doc: DocTag,
    index: usize,
}

/// Stable handle to a key entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct KeyId {
    doc: DocTag,
    section: usize,
    index: usize,
}

#[derive(Debug)]
struct Section {
    name: HashedName,
    line: usize,
    keys: Vec<KeyEntry>,
}

#[derive(Debug)]
struct KeyEntry {
    key: HashedName,
    value: String,
    line: usize,
}

// ============================================================================
// Document
// ============================================================================

/// A parsed configuration file.
#[derive(Debug)]
pub struct Document {
    tag: DocTag,
    sections: Vec<Section>,
}

impl Document {
    pub(crate) fn new() -> Self {
        Self {
            tag: DocTag::mint(),
            sections: Vec::new(),
        }
    }

    /// Append a section at the end.
    pub(crate) fn push_section(&mut self, name: String, line: usize) -> Result<(), TryReserveError> {
        self.sections.try_reserve(1)?;
        self.sections.push(Section {
            name: HashedName::new(name),
            line,
            keys: Vec::new(),
        });
        Ok(())
    }

    /// Append a key entry to the most recent section.
    ///
    /// Returns `false` without storing anything when no section exists.
    pub(crate) fn push_key(
        &mut self,
        key: String,
        value: String,
        line: usize,
    ) -> Result<bool, TryReserveError> {
        let Some(section) = self.sections.last_mut() else {
            return Ok(false);
        };
        section.keys.try_reserve(1)?;
        section.keys.push(KeyEntry {
            key: HashedName::new(key),
            value,
            line,
        });
        Ok(true)
    }

    /// Number of sections, duplicates included.
    pub fn len(&self) -> usize {
        self.sections.len()
    }

    /// Check if the document has no sections.
    pub fn is_empty(&self) -> bool {
        self.sections.is_empty()
    }

    /// Iterate over sections in file order.
    pub fn sections(&self) -> impl ExactSizeIterator<Item = SectionRef<'_>> + '_ {
        (0..self.sections.len()).map(move |index| SectionRef { doc: self, index })
    }

    /// The first section in the file.
    pub fn first_section(&self) -> Option<SectionRef<'_>> {
        self.section_at(0)
    }

    /// The first section named `name`.
    pub fn find_section(&self, name: &str) -> Option<SectionRef<'_>> {
        let h = hash(name);
        self.sections
            .iter()
            .position(|s| s.name.matches(name, h))
            .map(|index| SectionRef { doc: self, index })
    }

    /// The first key named `key` in the first section named `section`.
    pub fn key_entry(&self, section: &str, key: &str) -> Option<KeyRef<'_>> {
        self.find_section(section)?.find_key(key)
    }

    /// The first key entry of the first section named `section`.
    pub fn first_key_in(&self, section: &str) -> Option<KeyRef<'_>> {
        self.find_section(section)?.first_key()
    }

    /// Look a value up by section and key name.
    pub fn value(&self, section: &str, key: &str) -> Option<&str> {
        self.key_entry(section, key).map(|k| k.value())
    }

    /// Number of key entries in the first section named `section`, or 0.
    pub fn entry_count(&self, section: &str) -> usize {
        self.find_section(section).map_or(0, |s| s.len())
    }

    /// Read a value as a strictly positive integer that fits in `T`.
    pub fn value_as<T>(&self, section: &str, key: &str) -> Option<T>
    where
        T: TryFrom<u64>,
    {
        parse_unsigned(self.value(section, key)?)
    }

    /// Read a value as a strictly positive `u32`.
    pub fn value_as_unsigned(&self, section: &str, key: &str) -> Option<u32> {
        self.value_as(section, key)
    }

    // ---- id-based access ----

    /// Resolve a section id minted by this document.
    pub fn section(&self, id: SectionId) -> Option<SectionRef<'_>> {
        if id.doc != self.tag {
            return None;
        }
        self.section_at(id.index)
    }

    /// Resolve a key id minted by this document.
    pub fn key(&self, id: KeyId) -> Option<KeyRef<'_>> {
        if id.doc != self.tag {
            return None;
        }
        self.section_at(id.section)?.key_at(id.index)
    }

    /// Id of the first section.
    pub fn first_section_id(&self) -> Option<SectionId> {
        self.first_section().map(|s| s.id())
    }

    /// Id of the section after `id`.
    pub fn next_section_id(&self, id: SectionId) -> Option<SectionId> {
        self.section(id)?.next_section().map(|s| s.id())
    }

    /// Id of the first key in section `id`.
    pub fn first_key_id(&self, id: SectionId) -> Option<KeyId> {
        self.section(id)?.first_key().map(|k| k.id())
    }

    /// Id of the key after `id` in the same section.
    pub fn next_key_id(&self, id: KeyId) -> Option<KeyId> {
        self.key(id)?.next_key().map(|k| k.id())
    }

    pub fn section_name(&self, id: SectionId) -> Option<&str> {
        self.section(id).map(|s| s.name())
    }

    pub fn section_line(&self, id: SectionId) -> Option<usize> {
        self.section(id).map(|s| s.line())
    }

    pub fn key_name(&self, id: KeyId) -> Option<&str> {
        self.key(id).map(|k| k.key())
    }

    pub fn key_value(&self, id: KeyId) -> Option<&str> {
        self.key(id).map(|k| k.value())
    }

    pub fn key_line(&self, id: KeyId) -> Option<usize> {
        self.key(id).map(|k| k.line())
    }

    /// Write every section and key, with hashes and line numbers.
    pub fn debug_dump<W: Write>(&self, out: &mut W) -> io::Result<()> {
        for section in self.sections() {
            writeln!(
                out,
                "**** Section: {} Hash: {:08X} Line Number: {} ****",
                section.name(),
                section.hash(),
                section.line()
            )?;
            for key in section.keys() {
                writeln!(
                    out,
                    "Key: {} Hash: {:08X} Line Number: {} Value: {}",
                    key.key(),
                    key.hash(),
                    key.line(),
                    key.value()
                )?;
            }
        }
        Ok(())
    }

    fn section_at(&self, index: usize) -> Option<SectionRef<'_>> {
        (index < self.sections.len()).then_some(SectionRef { doc: self, index })
    }
}

// ============================================================================
// SectionRef
// ============================================================================

/// A borrowed view of one section.
#[derive(Clone, Copy)]
pub struct SectionRef<'doc> {
    doc: &'doc Document,
    index: usize,
}

impl<'doc> SectionRef<'doc> {
    fn data(&self) -> &'doc Section {
        &self.doc.sections[self.index]
    }

    /// Stable id for this section.
    pub fn id(&self) -> SectionId {
        SectionId {
            doc: self.doc.tag,
            index: self.index,
        }
    }

    /// Section name, as stored (possibly truncated).
    pub fn name(&self) -> &'doc str {
        self.data().name.as_str()
    }

    /// 1-based line of the `[name]` header.
    pub fn line(&self) -> usize {
        self.data().line
    }

    /// Precomputed hash of the name.
    pub fn hash(&self) -> u32 {
        self.data().name.hash()
    }

    /// Number of key entries.
    pub fn len(&self) -> usize {
        self.data().keys.len()
    }

    pub fn is_empty(&self) -> bool {
        self.data().keys.is_empty()
    }

    /// The section after this one in file order.
    pub fn next_section(&self) -> Option<SectionRef<'doc>> {
        self.doc.section_at(self.index + 1)
    }

    /// The first key entry.
    pub fn first_key(&self) -> Option<KeyRef<'doc>> {
        self.key_at(0)
    }

    /// Iterate over key entries in file order.
    pub fn keys(&self) -> impl ExactSizeIterator<Item = KeyRef<'doc>> + 'doc {
        let doc = self.doc;
        let section = self.index;
        (0..self.len()).map(move |index| KeyRef {
            doc,
            section,
            index,
        })
    }

    /// The first key entry named `key`.
    pub fn find_key(&self, key: &str) -> Option<KeyRef<'doc>> {
        let h = hash(key);
        self.data()
            .keys
            .iter()
            .position(|k| k.key.matches(key, h))
            .map(|index| KeyRef {
                doc: self.doc,
                section: self.index,
                index,
            })
    }

    /// Value of the first key named `key`.
    pub fn value(&self, key: &str) -> Option<&'doc str> {
        self.find_key(key).map(|k| k.value())
    }

    fn key_at(&self, index: usize) -> Option<KeyRef<'doc>> {
        (index < self.len()).then_some(KeyRef {
            doc: self.doc,
            section: self.index,
            index,
        })
    }
}

impl std::fmt::Debug for SectionRef<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SectionRef")
            .field("name", &self.name())
            .field("line", &self.line())
            .field("keys", &self.len())
            .finish()
    }
}

// ============================================================================
// KeyRef
// ============================================================================

/// A borrowed view of one key entry.
#[derive(Clone, Copy)]
pub struct KeyRef<'doc> {
    doc: &'doc Document,
    section: usize,
    index: usize,
}

impl<'doc> KeyRef<'doc> {
    fn data(&self) -> &'doc KeyEntry {
        &self.doc.sections[self.section].keys[self.index]
    }

    /// Stable id for this key entry.
    pub fn id(&self) -> KeyId {
        KeyId {
            doc: self.doc.tag,
            section: self.section,
            index: self.index,
        }
    }

    pub fn key(&self) -> &'doc str {
        self.data().key.as_str()
    }

    pub fn value(&self) -> &'doc str {
        &self.data().value
    }

    /// 1-based line the entry was declared on.
    pub fn line(&self) -> usize {
        self.data().line
    }

    /// Precomputed hash of the key.
    pub fn hash(&self) -> u32 {
        self.data().key.hash()
    }

    /// Read the value as a strictly positive integer that fits in `T`.
    pub fn value_as<T: TryFrom<u64>>(&self) -> Option<T> {
        parse_unsigned(self.value())
    }

    /// The section holding this entry.
    pub fn section(&self) -> SectionRef<'doc> {
        SectionRef {
            doc: self.doc,
            index: self.section,
        }
    }

    /// The next entry in the same section.
    pub fn next_key(&self) -> Option<KeyRef<'doc>> {
        self.section().key_at(self.index + 1)
    }
}

impl std::fmt::Debug for KeyRef<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("KeyRef")
            .field("key", &self.key())
            .field("value", &self.value())
            .field("line", &self.line())
            .finish()
    }
}

// ============================================================================
// Tests
// ============================================================================
