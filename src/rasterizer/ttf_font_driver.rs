//! TrueType/OpenType glyph source backed by `ttf-parser`.
//!
//! The file contents are read once and owned by the font. `ttf_parser::Face`
//! borrows its data, so a face is re-parsed from the owned buffer on each
//! lookup; this only happens on glyph cache misses.

use super::atlas::PAGE_SIZE;
use super::font_driver::{GlyphId, GlyphSource, RasterizedGlyph};
use super::outline::OutlineFlattener;
use log::*;
use std::path::Path;
use thiserror::Error;
use ttf_parser::{Face, FaceParsingError};

/// Outlines are rendered 3/8 of a pixel right and down of the pen.
pub const SUBPIXEL_SHIFT: f32 = 0.375;

#[derive(Error, Debug)]
pub enum FontError {
    #[error("Failed to read font file")]
    Io(#[from] std::io::Error),
    #[error("Failed to parse font")]
    Parse(#[from] FaceParsingError),
}

/// One face of an outline font file at a fixed pixel size.
pub struct TtfFont {
    name: String,
    data: Vec<u8>,
    face_index: u32,
    pixel_size: u16,
    /// Pixels per font unit.
    scale: f32,
}

impl std::fmt::Debug for TtfFont {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TtfFont")
            .field("name", &self.name)
            .field("face_index", &self.face_index)
            .field("pixel_size", &self.pixel_size)
            .field("bytes", &self.data.len())
            .finish()
    }
}

impl TtfFont {
    /// Load face `face_index` of the font file at `path`.
    pub fn load(path: &Path, face_index: u32, pixel_size: u16) -> Result<Self, FontError> {
        let data = std::fs::read(path)?;
        let mut font = Self::from_bytes(data, face_index, pixel_size)?;
        font.name = path.display().to_string();
        Ok(font)
    }

    /// Build from in-memory font data.
    pub fn from_bytes(data: Vec<u8>, face_index: u32, pixel_size: u16) -> Result<Self, FontError> {
        let face = Face::parse(&data, face_index)?;
        let units_per_em = face.units_per_em();
        let scale = pixel_size as f32 / units_per_em as f32;
        debug!(
            "TtfFont: face {} parsed, {} glyphs, {} units/em, scale {}",
            face_index,
            face.number_of_glyphs(),
            units_per_em,
            scale
        );
        Ok(Self {
            name: format!("<memory:{}>", face_index),
            data,
            face_index,
            pixel_size,
            scale,
        })
    }

    pub fn pixel_size(&self) -> u16 {
        self.pixel_size
    }

    pub fn scale(&self) -> f32 {
        self.scale
    }

    fn face(&self) -> Option<Face<'_>> {
        // Parsing succeeded in `from_bytes` and the data is immutable.
        Face::parse(&self.data, self.face_index).ok()
    }
}

impl GlyphSource for TtfFont {
    fn index_of(&self, codepoint: u32) -> GlyphId {
        let Some(ch) = char::from_u32(codepoint) else {
            return 0;
        };
        self.face()
            .and_then(|face| face.glyph_index(ch))
            .map_or(0, |id| id.0)
    }

    fn rasterize(&self, glyph: GlyphId) -> RasterizedGlyph {
        let Some(face) = self.face() else {
            return RasterizedGlyph::default();
        };
        let id = ttf_parser::GlyphId(glyph);
        let s = self.scale;
        let advance = (face.glyph_hor_advance(id).unwrap_or(0) as f32 * s) as u16;
        let lsb = face.glyph_hor_side_bearing(id).unwrap_or(0) as f32 * s;

        let mut outline = OutlineFlattener::new(s, SUBPIXEL_SHIFT);
        let Some(rect) = face.outline_glyph(id, &mut outline) else {
            // No outline (e.g. space): advance only.
            trace!("TtfFont: glyph {} in {} has no outline", glyph, self.name);
            return RasterizedGlyph {
                left: lsb as i16,
                advance,
                ..RasterizedGlyph::default()
            };
        };

        let x0 = (rect.x_min as f32 * s + SUBPIXEL_SHIFT).floor() as i32;
        let y0 = (-(rect.y_max as f32) * s + SUBPIXEL_SHIFT).floor() as i32;
        let x1 = (rect.x_max as f32 * s + SUBPIXEL_SHIFT).ceil() as i32;
        let y1 = (-(rect.y_min as f32) * s + SUBPIXEL_SHIFT).ceil() as i32;
        let width = (x1 - x0).clamp(0, u16::MAX as i32) as usize;
        let height = (y1 - y0).clamp(0, u16::MAX as i32) as usize;

        if width > usize::from(PAGE_SIZE) || height > usize::from(PAGE_SIZE) {
            // Too big for the atlas: report the box without drawing it.
            warn!(
                "TtfFont: glyph {} in {} is {}x{}, skipping rasterization",
                glyph, self.name, width, height
            );
            return RasterizedGlyph {
                width: width as u16,
                height: height as u16,
                left: x0 as i16,
                top: y0 as i16,
                advance,
                coverage: Vec::new(),
            };
        }

        let coverage = outline.rasterize(width, height, x0 as f32, y0 as f32);
        RasterizedGlyph {
            width: width as u16,
            height: height as u16,
            left: x0 as i16,
            top: y0 as i16,
            advance,
            coverage,
        }
    }

    fn name(&self) -> &str {
        &self.name
    }
}
