// src/glyph.rs

//! Cached glyph records and per-call text flags.

use bitflags::bitflags;

bitflags! {
    /// Options for a single `render` call.
    ///
    /// The empty set draws one line, stopping at the right edge, without shadow.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
    pub struct TextFlags: u8 {
        /// Continue on the next row instead of stopping at the right edge.
        const WRAP   = 1 << 0;
        /// Force the pixel one row below every lit glyph pixel to black.
        const SHADOW = 1 << 1;
    }
}

/// Where a glyph bitmap lives in the atlas.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct AtlasLocation {
    /// Page index inside the atlas.
    pub page: u16,
    pub x: u16,
    pub y: u16,
}

/// Metrics and atlas location for one code point.
///
/// `ix0` is the horizontal offset from the pen to the bitmap's left column and
/// `iy0` the vertical offset from the baseline to its top row (negative above
/// the baseline). An entry with a zero advance is the "missing glyph" marker.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct GlyphEntry {
    pub ix0: i16,
    pub iy0: i16,
    pub width: u16,
    pub height: u16,
    pub advance: u16,
    pub location: AtlasLocation,
}

impl GlyphEntry {
    /// Marker for a code point no font can draw.
    pub const MISSING: GlyphEntry = GlyphEntry {
        ix0: 0,
        iy0: 0,
        width: 0,
        height: 0,
        advance: 0,
        location: AtlasLocation { page: 0, x: 0, y: 0 },
    };

    /// Zero-advance entries are skipped by the compositor.
    pub fn is_missing(&self) -> bool {
        self.advance == 0
    }
}
