//! Glyph lookup and rasterization primitives.
//!
//! This module defines the `GlyphSource` trait, the seam between the engine and
//! an outline font backend. The fallback chain and the compositor only ever
//! talk to fonts through it, so a different rasterizer (or a test double) can be
//! dropped in without touching the caching logic.

/// Backend-specific glyph handle. Zero means "no glyph".
pub type GlyphId = u16;

/// A glyph rendered at the source's configured pixel size.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RasterizedGlyph {
    pub width: u16,
    pub height: u16,
    /// Horizontal offset from the pen to the bitmap's left column.
    pub left: i16,
    /// Offset from the baseline to the bitmap's top row (negative is up).
    pub top: i16,
    /// Horizontal advance in whole pixels.
    pub advance: u16,
    /// Row-major coverage, `width * height` bytes, 0 = empty, 255 = full.
    /// Empty for a nonzero box when the glyph was too large to rasterize.
    pub coverage: Vec<u8>,
}

/// An outline font at a fixed pixel size.
///
/// Implementors provide:
/// - Code point to glyph lookup
/// - Glyph rasterization to a single-channel coverage bitmap
///
/// The `FontChain` uses this trait to implement fallback, and the
/// `TextRenderer` caches whatever it returns. Sources are created and used on
/// the rendering thread only, so they need not be `Send` or `Sync`.
pub trait GlyphSource {
    /// Find the glyph for `codepoint`.
    ///
    /// # Returns
    /// A nonzero glyph id if the font maps this code point, 0 otherwise.
    /// Must be free of side effects.
    fn index_of(&self, codepoint: u32) -> GlyphId;

    /// Rasterize a glyph returned by `index_of`.
    ///
    /// Metrics and bitmap are already scaled to the configured pixel size.
    fn rasterize(&self, glyph: GlyphId) -> RasterizedGlyph;

    /// Human readable name used in log messages.
    fn name(&self) -> &str {
        "<glyph source>"
    }
}
