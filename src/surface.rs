// src/surface.rs

//! Destination surfaces for text rendering.
//!
//! A `Surface` is a borrowed view over a 16-bit framebuffer: pixel slice, row
//! stride in pixels, visible size and native pixel format. `Framebuffer` owns
//! its pixels and lends surfaces, which is what the menu shell and the tests
//! use for off-screen drawing.

use crate::color::PixelFormat;
use anyhow::{ensure, Result};

/// Mutable view of a 16-bit pixel buffer.
#[derive(Debug)]
pub struct Surface<'a> {
    pixels: &'a mut [u16],
    stride: usize,
    width: usize,
    height: usize,
    format: PixelFormat,
}

impl<'a> Surface<'a> {
    /// Wraps an existing pixel buffer.
    ///
    /// `stride` is measured in pixels and must be at least `width`; the buffer
    /// must hold `stride * height` pixels.
    pub fn new(
        pixels: &'a mut [u16],
        stride: usize,
        width: usize,
        height: usize,
        format: PixelFormat,
    ) -> Result<Self> {
        ensure!(
            stride >= width,
            "surface stride {} is smaller than width {}",
            stride,
            width
        );
        ensure!(
            pixels.len() >= stride * height,
            "surface buffer holds {} pixels, {}x{} needs {}",
            pixels.len(),
            stride,
            height,
            stride * height
        );
        Ok(Self {
            pixels,
            stride,
            width,
            height,
            format,
        })
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    pub fn stride(&self) -> usize {
        self.stride
    }

    pub fn format(&self) -> PixelFormat {
        self.format
    }

    /// Index of (x, y) in the pixel slice, or `None` when off-surface.
    #[inline]
    pub fn index_of(&self, x: i32, y: i32) -> Option<usize> {
        if x < 0 || y < 0 {
            return None;
        }
        let (x, y) = (x as usize, y as usize);
        if x >= self.width || y >= self.height {
            return None;
        }
        Some(y * self.stride + x)
    }

    pub fn get(&self, x: i32, y: i32) -> Option<u16> {
        self.index_of(x, y).map(|i| self.pixels[i])
    }

    pub fn pixels(&self) -> &[u16] {
        &*self.pixels
    }

    pub fn pixels_mut(&mut self) -> &mut [u16] {
        &mut *self.pixels
    }
}

/// Owned framebuffer that hands out `Surface` views.
#[derive(Debug, Clone)]
pub struct Framebuffer {
    pixels: Vec<u16>,
    width: usize,
    height: usize,
    format: PixelFormat,
}

impl Framebuffer {
    pub fn new(width: usize, height: usize, format: PixelFormat) -> Self {
        Self {
            pixels: vec![0; width * height],
            width,
            height,
            format,
        }
    }

    pub fn surface(&mut self) -> Surface<'_> {
        Surface {
            pixels: &mut self.pixels[..],
            stride: self.width,
            width: self.width,
            height: self.height,
            format: self.format,
        }
    }

    pub fn fill(&mut self, value: u16) {
        self.pixels.fill(value);
    }

    pub fn pixel(&self, x: usize, y: usize) -> u16 {
        self.pixels[y * self.width + x]
    }

    pub fn set_pixel(&mut self, x: usize, y: usize, value: u16) {
        self.pixels[y * self.width + x] = value;
    }

    pub fn pixels(&self) -> &[u16] {
        &self.pixels
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }
}
