//! Code point to glyph entry cache.
//!
//! Entries are added lazily the first time a code point is drawn and are
//! never removed, so a cached atlas location is valid for as long as the
//! renderer lives. Code points no font can draw are stored as
//! `GlyphEntry::MISSING` so the fallback chain is consulted only once.

use crate::glyph::GlyphEntry;
use std::collections::HashMap;

#[derive(Debug, Default)]
pub struct GlyphCache {
    entries: HashMap<u16, GlyphEntry>,
}

impl GlyphCache {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, codepoint: u16) -> Option<GlyphEntry> {
        self.entries.get(&codepoint).copied()
    }

    /// Store an entry. An existing entry for the same code point is kept.
    pub fn insert(&mut self, codepoint: u16, entry: GlyphEntry) -> GlyphEntry {
        *self.entries.entry(codepoint).or_insert(entry)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
