//! Text rendering into 16-bit framebuffers.
//!
//! `TextRenderer` ties the pieces together:
//!
//! ```text
//! UTF-8 bytes → code points → GlyphCache ─hit──────────────────────→ blit
//!                                  └─miss→ FontChain → rasterize → Atlas ┘
//! ```
//!
//! Glyphs are rasterized once, on first use, into atlas pages. Every later
//! draw copies coverage from the atlas through a 256-entry gray palette into
//! the destination surface.

pub mod atlas;
pub mod font_driver;
pub mod font_manager;
pub mod glyph_cache;
pub mod outline;
pub mod ttf_font_driver;

#[cfg(test)]
mod test_font;

use crate::color::{ColorMode, GrayPalette, PixelFormat};
use crate::config::{CompositeMode, EngineConfig};
use crate::glyph::{GlyphEntry, TextFlags};
use crate::surface::Surface;
use crate::utf8::CodePoints;
use anyhow::{bail, ensure, Context, Result};
use log::*;
use std::path::Path;

use self::atlas::Atlas;
use self::font_driver::GlyphSource;
use self::font_manager::FontChain;
use self::glyph_cache::GlyphCache;
use self::ttf_font_driver::TtfFont;

/// Largest accepted font height. Any glyph at this size fits an atlas page.
pub const MAX_PIXEL_SIZE: u16 = 256;

/// Coverage below this is not drawn in opaque mode.
const COVERAGE_THRESHOLD: u8 = 32;

/// Code points from here on get a double-width minimum cell.
const WIDE_CODEPOINT_START: u32 = 0x1000;

/// Draws UTF-8 text with a chain of fonts.
pub struct TextRenderer {
    pixel_size: u16,
    mono_width: u16,
    format: PixelFormat,
    palette: GrayPalette,
    composite: CompositeMode,
    fonts: FontChain,
    cache: GlyphCache,
    atlas: Atlas,
}

impl std::fmt::Debug for TextRenderer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TextRenderer")
            .field("pixel_size", &self.pixel_size)
            .field("mono_width", &self.mono_width)
            .field("composite", &self.composite)
            .field("fonts", &self.fonts)
            .field("cached_glyphs", &self.cache.len())
            .field("pages", &self.atlas.page_count())
            .finish()
    }
}

impl TextRenderer {
    /// Create a renderer with no fonts.
    ///
    /// # Arguments
    /// * `pixel_size` - Font height in pixels, also the line advance
    /// * `mono_width` - Minimum cell width for narrow code points
    /// * `format` - Pixel format of the surfaces this renderer will draw to
    pub fn new(pixel_size: u16, mono_width: u16, format: PixelFormat) -> Result<Self> {
        ensure!(
            (1..=MAX_PIXEL_SIZE).contains(&pixel_size),
            "Pixel size {} out of range 1..={}",
            pixel_size,
            MAX_PIXEL_SIZE
        );
        info!(
            "TextRenderer: {}px, mono width {}, format {:?}",
            pixel_size, mono_width, format
        );
        Ok(Self {
            pixel_size,
            mono_width,
            format,
            palette: GrayPalette::new(format, ColorMode::default()),
            composite: CompositeMode::default(),
            fonts: FontChain::new(),
            cache: GlyphCache::new(),
            atlas: Atlas::new(),
        })
    }

    /// Create a renderer and load every configured font.
    ///
    /// Fonts that fail to load are logged and skipped. It is an error if the
    /// configuration lists fonts and none of them load.
    pub fn with_config(config: &EngineConfig, format: PixelFormat) -> Result<Self> {
        let mut renderer = Self::new(config.pixel_size, config.mono_width, format)?;
        renderer.palette = GrayPalette::new(format, config.color_mode);
        renderer.composite = config.composite;

        for font in &config.fonts {
            if let Err(e) = renderer.add(&font.path, font.face_index) {
                warn!("TextRenderer: skipping font: {:#}", e);
            }
        }
        if !config.fonts.is_empty() && renderer.fonts.is_empty() {
            bail!("None of the {} configured fonts could be loaded", config.fonts.len());
        }
        Ok(renderer)
    }

    /// Load face `face_index` of an outline font file and append it to the
    /// fallback chain. On error the chain is unchanged.
    pub fn add(&mut self, path: impl AsRef<Path>, face_index: u32) -> Result<()> {
        let path = path.as_ref();
        let font = TtfFont::load(path, face_index, self.pixel_size).with_context(|| {
            format!("Failed to load font '{}' (face {})", path.display(), face_index)
        })?;
        self.fonts.push(Box::new(font));
        Ok(())
    }

    /// Append any glyph source to the fallback chain.
    pub fn add_source(&mut self, source: Box<dyn GlyphSource>) {
        self.fonts.push(source);
    }

    pub fn set_composite_mode(&mut self, mode: CompositeMode) {
        self.composite = mode;
    }

    pub fn composite_mode(&self) -> CompositeMode {
        self.composite
    }

    pub fn pixel_size(&self) -> u16 {
        self.pixel_size
    }

    pub fn mono_width(&self) -> u16 {
        self.mono_width
    }

    pub fn font_count(&self) -> usize {
        self.fonts.len()
    }

    pub fn page_count(&self) -> usize {
        self.atlas.page_count()
    }

    /// Number of cached code points, missing-glyph markers included.
    pub fn cached_glyphs(&self) -> usize {
        self.cache.len()
    }

    /// Cached entry for `codepoint`, filling the cache on a miss.
    ///
    /// # Returns
    /// `None` for 0, for values outside the BMP and for code points no font
    /// can draw.
    pub fn glyph(&mut self, codepoint: u32) -> Option<GlyphEntry> {
        if codepoint == 0 {
            return None;
        }
        let key = u16::try_from(codepoint).ok()?;
        let entry = match self.cache.get(key) {
            Some(entry) => {
                trace!("TextRenderer: cache hit for U+{:04X}", key);
                entry
            }
            None => {
                let entry = self.load_glyph(key);
                self.cache.insert(key, entry)
            }
        };
        (!entry.is_missing()).then_some(entry)
    }

    fn load_glyph(&mut self, codepoint: u16) -> GlyphEntry {
        let Some(resolved) = self.fonts.resolve(u32::from(codepoint)) else {
            debug!("TextRenderer: no font has U+{:04X}, caching as missing", codepoint);
            return GlyphEntry::MISSING;
        };
        let Some(font) = self.fonts.get(resolved.font_index) else {
            return GlyphEntry::MISSING;
        };
        let bitmap = font.rasterize(resolved.glyph_id);
        let expected = usize::from(bitmap.width) * usize::from(bitmap.height);
        if bitmap.coverage.len() != expected {
            warn!(
                "TextRenderer: U+{:04X} from '{}' has {} coverage bytes for a {}x{} box",
                codepoint,
                font.name(),
                bitmap.coverage.len(),
                bitmap.width,
                bitmap.height
            );
            return GlyphEntry::MISSING;
        }

        let Some(location) = self.atlas.pack(bitmap.width, bitmap.height) else {
            warn!(
                "TextRenderer: {}x{} glyph for U+{:04X} does not fit an atlas page",
                bitmap.width, bitmap.height, codepoint
            );
            return GlyphEntry::MISSING;
        };
        self.atlas
            .copy_in(location, bitmap.width, bitmap.height, &bitmap.coverage);

        debug!(
            "TextRenderer: cached U+{:04X} {}x{} adv {} at page {} ({}, {})",
            codepoint,
            bitmap.width,
            bitmap.height,
            bitmap.advance,
            location.page,
            location.x,
            location.y
        );
        GlyphEntry {
            ix0: bitmap.left,
            iy0: bitmap.top,
            width: bitmap.width,
            height: bitmap.height,
            advance: bitmap.advance,
            location,
        }
    }

    fn cell_width(&self, codepoint: u32, entry: &GlyphEntry) -> i32 {
        let min = if codepoint < WIDE_CODEPOINT_START {
            self.mono_width
        } else {
            self.mono_width.saturating_mul(2)
        };
        i32::from(entry.advance.max(min))
    }

    /// Pen advance of `text` drawn as one unwrapped line.
    pub fn measure(&mut self, text: impl AsRef<[u8]>) -> u32 {
        let mut width = 0u32;
        for cp in CodePoints::new(text.as_ref()) {
            if let Some(entry) = self.glyph(cp) {
                width += self.cell_width(cp, &entry) as u32;
            }
        }
        width
    }

    /// Draw `text` with its top-left pen position at (`x`, `y`).
    ///
    /// Without `TextFlags::WRAP` drawing stops at the first character that
    /// would cross the right edge. With it the pen moves to the start of the
    /// next line, and drawing stops once a line would cross the bottom edge.
    pub fn render(
        &mut self,
        surface: &mut Surface<'_>,
        x: i32,
        y: i32,
        text: impl AsRef<[u8]>,
        flags: TextFlags,
    ) {
        if surface.format() != self.format {
            warn!(
                "TextRenderer: surface format {:?} does not match {:?}",
                surface.format(),
                self.format
            );
            return;
        }
        let line = i32::from(self.pixel_size);
        let (width, height) = (surface.width() as i32, surface.height() as i32);
        let (mut x, mut y) = (x, y);

        for cp in CodePoints::new(text.as_ref()) {
            let Some(entry) = self.glyph(cp) else {
                continue;
            };
            let cell = self.cell_width(cp, &entry);
            if x + cell > width {
                if !flags.contains(TextFlags::WRAP) {
                    break;
                }
                x = 0;
                y += line;
                if y + line > height {
                    break;
                }
            }
            self.blit(surface, x, y + line, &entry, flags);
            x += cell;
        }
    }

    /// Copy one glyph with its baseline at `baseline`.
    fn blit(&self, surface: &mut Surface<'_>, x: i32, baseline: i32, entry: &GlyphEntry, flags: TextFlags) {
        let Some(page) = self.atlas.page(entry.location.page) else {
            return;
        };
        let shadow = flags.contains(TextFlags::SHADOW);
        let (src_x, w) = (usize::from(entry.location.x), usize::from(entry.width));
        let left = x + i32::from(entry.ix0);
        let top = baseline + i32::from(entry.iy0);

        for j in 0..entry.height {
            let src = &page.row(entry.location.y + j)[src_x..src_x + w];
            let dy = top + i32::from(j);
            for (i, &c) in src.iter().enumerate() {
                let dx = left + i as i32;
                if let Some(idx) = surface.index_of(dx, dy) {
                    let pixels = surface.pixels_mut();
                    match self.composite {
                        CompositeMode::Opaque => {
                            if c >= COVERAGE_THRESHOLD {
                                pixels[idx] = self.palette.get(c);
                            }
                        }
                        CompositeMode::Blend => {
                            let dst = pixels[idx];
                            pixels[idx] = if dst == 0 {
                                self.palette.get(c)
                            } else {
                                self.format.blend_white(dst, c)
                            };
                        }
                    }
                }
                if shadow && c >= COVERAGE_THRESHOLD {
                    if let Some(below) = surface.index_of(dx, dy + 1) {
                        surface.pixels_mut()[below] = 0;
                    }
                }
            }
        }
    }
}
