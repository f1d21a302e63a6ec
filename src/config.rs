// src/config.rs

//! Configuration for the menu text engine.
//!
//! These structs can be deserialized from a JSON document shipped next to the
//! menu assets. Every field has a default, so partial documents are fine: a
//! skin that only lists its fonts keeps the stock 12px size and crisp palette.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};

use crate::color::ColorMode;

/// Default font height in pixels.
pub const DEFAULT_PIXEL_SIZE: u16 = 12;
/// Default minimum cell width for narrow characters.
pub const DEFAULT_MONO_WIDTH: u16 = 6;

/// How glyph pixels are combined with the framebuffer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum CompositeMode {
    /// Coverage >= 32 overwrites the destination; lower coverage is dropped.
    #[default]
    Opaque,
    /// Coverage blends the destination toward white. Black destination pixels
    /// take the palette color directly.
    Blend,
}

/// One font file in the fallback chain.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FontSpec {
    /// Path to a TrueType/OpenType file or collection.
    pub path: PathBuf,
    /// Face inside a collection (`.ttc`); 0 for single-face files.
    #[serde(default)]
    pub face_index: u32,
}

/// Complete engine configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    /// Font height in pixels; also the line advance used when wrapping.
    pub pixel_size: u16,
    /// Minimum cell width for code points below U+1000. Wider code points
    /// use twice this value.
    pub mono_width: u16,
    /// Coverage to gray mapping.
    pub color_mode: ColorMode,
    /// Pixel compositing.
    pub composite: CompositeMode,
    /// Fonts in priority order.
    pub fonts: Vec<FontSpec>,
}

impl Default for EngineConfig {
    fn default() -> Self {
        EngineConfig {
            pixel_size: DEFAULT_PIXEL_SIZE,
            mono_width: DEFAULT_MONO_WIDTH,
            color_mode: ColorMode::default(),
            composite: CompositeMode::default(),
            fonts: Vec::new(),
        }
    }
}

impl EngineConfig {
    /// Parses a JSON document.
    pub fn from_json(text: &str) -> Result<Self> {
        serde_json::from_str(text).context("Failed to parse text engine configuration")
    }

    /// Reads and parses a JSON file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config '{}'", path.display()))?;
        Self::from_json(&text).with_context(|| format!("In config '{}'", path.display()))
    }
}
