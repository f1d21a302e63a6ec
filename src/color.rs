// src/color.rs

//! Native 16-bit pixel formats and the grayscale palette used to draw glyphs.

use serde::{Deserialize, Serialize};

/// Layout of one channel inside a native 16-bit pixel.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Channel {
    pub shift: u8,
    pub bits: u8,
}

impl Channel {
    const fn max(self) -> u16 {
        (1 << self.bits) - 1
    }

    /// Packs an 8-bit component by dropping its low bits.
    const fn pack(self, value: u8) -> u16 {
        ((value >> (8 - self.bits)) as u16) << self.shift
    }

    const fn extract(self, pixel: u16) -> u16 {
        (pixel >> self.shift) & self.max()
    }
}

/// Native pixel format of a destination surface.
///
/// Only 16-bit packed layouts are supported; the framebuffer of the menu is
/// either RGB565 or BGR555.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct PixelFormat {
    pub red: Channel,
    pub green: Channel,
    pub blue: Channel,
}

impl PixelFormat {
    pub const RGB565: PixelFormat = PixelFormat {
        red: Channel { shift: 11, bits: 5 },
        green: Channel { shift: 5, bits: 6 },
        blue: Channel { shift: 0, bits: 5 },
    };

    pub const BGR555: PixelFormat = PixelFormat {
        red: Channel { shift: 0, bits: 5 },
        green: Channel { shift: 5, bits: 5 },
        blue: Channel { shift: 10, bits: 5 },
    };

    /// Maps an RGB triplet to the native pixel value.
    pub const fn map_rgb(&self, r: u8, g: u8, b: u8) -> u16 {
        self.red.pack(r) | self.green.pack(g) | self.blue.pack(b)
    }

    /// Blends `dst` toward full white by `alpha` (0..=255), one channel group
    /// at a time: `(dst * (255 - a) + max * a) / 255`.
    pub fn blend_white(&self, dst: u16, alpha: u8) -> u16 {
        let a = alpha as u32;
        let mix = |ch: Channel| -> u16 {
            let v = ch.extract(dst) as u32;
            let max = ch.max() as u32;
            (((v * (255 - a) + max * a) / 255) as u16) << ch.shift
        };
        mix(self.red) | mix(self.green) | mix(self.blue)
    }
}

impl Default for PixelFormat {
    fn default() -> Self {
        PixelFormat::RGB565
    }
}

/// How coverage values are turned into gray levels.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum ColorMode {
    /// Brightens low coverage for sharper edges on low-resolution screens.
    #[default]
    Crisp,
    /// Linear coverage to gray.
    Smooth,
}

impl ColorMode {
    /// Gray level used for coverage index `i`.
    pub const fn gray_level(self, i: u8) -> u8 {
        match self {
            ColorMode::Smooth => i,
            ColorMode::Crisp => {
                if i < 128 {
                    (i as u16 * 3 / 2) as u8
                } else {
                    i / 2 + 128
                }
            }
        }
    }
}

/// 256-slot coverage to native pixel table, built once per engine.
#[derive(Debug, Clone)]
pub struct GrayPalette {
    entries: [u16; 256],
}

impl GrayPalette {
    pub fn new(format: PixelFormat, mode: ColorMode) -> Self {
        let mut entries = [0u16; 256];
        for (i, entry) in entries.iter_mut().enumerate() {
            let c = mode.gray_level(i as u8);
            *entry = format.map_rgb(c, c, c);
        }
        Self { entries }
    }

    #[inline]
    pub fn get(&self, coverage: u8) -> u16 {
        self.entries[coverage as usize]
    }
}
