//! Font fallback.
//!
//! The `FontChain` holds the loaded fonts in insertion order. The first font
//! whose cmap maps a code point supplies its glyph; later fonts are only
//! consulted for code points the earlier ones lack.

use super::font_driver::{GlyphId, GlyphSource};
use log::*;

/// A glyph found in the chain: the index of the font that has it and the
/// font's own glyph id (never 0).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ResolvedGlyph {
    pub font_index: usize,
    pub glyph_id: GlyphId,
}

/// Ordered list of glyph sources.
#[derive(Default)]
pub struct FontChain {
    fonts: Vec<Box<dyn GlyphSource>>,
}

impl std::fmt::Debug for FontChain {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_list()
            .entries(self.fonts.iter().map(|font| font.name()))
            .finish()
    }
}

impl FontChain {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a font at the lowest priority.
    pub fn push(&mut self, font: Box<dyn GlyphSource>) {
        info!(
            "FontChain: added '{}' at position {}",
            font.name(),
            self.fonts.len()
        );
        self.fonts.push(font);
    }

    pub fn len(&self) -> usize {
        self.fonts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fonts.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<&dyn GlyphSource> {
        self.fonts.get(index).map(|font| font.as_ref())
    }

    /// Find the first font that maps `codepoint`.
    ///
    /// # Returns
    /// `None` if no font in the chain has a glyph for it.
    pub fn resolve(&self, codepoint: u32) -> Option<ResolvedGlyph> {
        for (font_index, font) in self.fonts.iter().enumerate() {
            let glyph_id = font.index_of(codepoint);
            if glyph_id != 0 {
                debug!(
                    "FontChain: U+{:04X} -> glyph {} in '{}'",
                    codepoint,
                    glyph_id,
                    font.name()
                );
                return Some(ResolvedGlyph {
                    font_index,
                    glyph_id,
                });
            }
        }
        trace!("FontChain: no font maps U+{:04X}", codepoint);
        None
    }
}
