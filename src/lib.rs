//! Menu text library crate.
//!
//! Draws UTF-8 strings onto 16-bit (RGB565 / BGR555) framebuffers using
//! outline fonts with fallback, a glyph atlas and a never-evicting glyph cache.
//!
//! ```no_run
//! use menu_text::{Framebuffer, PixelFormat, TextFlags, TextRenderer};
//!
//! # fn main() -> anyhow::Result<()> {
//! let mut renderer = TextRenderer::new(12, 6, PixelFormat::RGB565)?;
//! renderer.add("fonts/menu.ttf", 0)?;
//! let mut fb = Framebuffer::new(320, 240, PixelFormat::RGB565);
//! renderer.render(&mut fb.surface(), 4, 4, "Load state", TextFlags::SHADOW);
//! # Ok(())
//! # }
//! ```

pub mod color;
pub mod config;
pub mod glyph;
pub mod rasterizer;
pub mod surface;
pub mod utf8;

pub use color::{ColorMode, PixelFormat};
pub use config::{CompositeMode, EngineConfig, FontSpec};
pub use glyph::TextFlags;
pub use rasterizer::font_driver::{GlyphSource, RasterizedGlyph};
pub use rasterizer::TextRenderer;
pub use surface::{Framebuffer, Surface};
