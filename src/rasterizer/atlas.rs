//! Glyph atlas: append-only pages of packed coverage bitmaps.
//!
//! Each page is a `PAGE_SIZE` square of 8-bit coverage with its own skyline
//! packer. New glyphs go into the newest page; when it is full a fresh page is
//! appended. Placed rectangles never move and pages are never repacked, so a
//! location handed out once stays valid for the atlas' lifetime.

use crate::glyph::AtlasLocation;
use log::*;

/// Width and height of every atlas page in pixels.
pub const PAGE_SIZE: u16 = 1024;

/// A horizontal segment of the skyline: everything below `y` is used.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
struct SkylineNode {
    x: u16,
    y: u16,
    width: u16,
}

/// Bottom-left skyline packer.
///
/// The skyline is a staircase of segments covering the page width. A
/// rectangle goes where its top edge would be lowest; among equal candidates
/// the one wasting the least area under it wins.
#[derive(Debug)]
struct Skyline {
    width: u16,
    height: u16,
    nodes: Vec<SkylineNode>,
}

impl Skyline {
    fn new(width: u16, height: u16) -> Self {
        Self {
            width,
            height,
            nodes: vec![SkylineNode { x: 0, y: 0, width }],
        }
    }

    /// Resting height and wasted area for a `w * h` rectangle whose left
    /// edge sits on node `idx`.
    fn fit(&self, idx: usize, w: u16, h: u16) -> Option<(u16, u32)> {
        let x = self.nodes[idx].x;
        if u32::from(x) + u32::from(w) > u32::from(self.width) {
            return None;
        }
        let mut y = 0u16;
        let mut remaining = u32::from(w);
        let mut i = idx;
        while remaining > 0 {
            let node = self.nodes.get(i)?;
            y = y.max(node.y);
            if u32::from(y) + u32::from(h) > u32::from(self.height) {
                return None;
            }
            remaining = remaining.saturating_sub(u32::from(node.width));
            i += 1;
        }

        let mut waste = 0u32;
        let mut remaining = u32::from(w);
        for node in &self.nodes[idx..i] {
            let span = remaining.min(u32::from(node.width));
            waste += u32::from(y - node.y) * span;
            remaining -= span;
        }
        Some((y, waste))
    }

    fn allocate(&mut self, w: u16, h: u16) -> Option<(u16, u16)> {
        let mut best: Option<(usize, u16, u32)> = None;
        for idx in 0..self.nodes.len() {
            let Some((y, waste)) = self.fit(idx, w, h) else {
                continue;
            };
            let better = match best {
                None => true,
                Some((_, best_y, best_waste)) => {
                    y < best_y || (y == best_y && waste < best_waste)
                }
            };
            if better {
                best = Some((idx, y, waste));
            }
        }
        let (idx, y, _) = best?;
        let x = self.nodes[idx].x;
        let right = x + w;

        // Trim or drop the nodes now hidden under the new rectangle.
        let j = idx;
        while j < self.nodes.len() {
            let node = self.nodes[j];
            if node.x >= right {
                break;
            }
            let node_right = node.x + node.width;
            if node_right > right {
                self.nodes[j] = SkylineNode {
                    x: right,
                    y: node.y,
                    width: node_right - right,
                };
                break;
            }
            self.nodes.remove(j);
        }
        self.nodes.insert(
            idx,
            SkylineNode {
                x,
                y: y + h,
                width: w,
            },
        );
        self.merge();
        Some((x, y))
    }

    fn merge(&mut self) {
        let mut i = 0;
        while i + 1 < self.nodes.len() {
            if self.nodes[i].y == self.nodes[i + 1].y {
                self.nodes[i].width += self.nodes[i + 1].width;
                self.nodes.remove(i + 1);
            } else {
                i += 1;
            }
        }
    }
}

/// One `PAGE_SIZE` x `PAGE_SIZE` coverage bitmap and its packer.
#[derive(Debug)]
pub struct AtlasPage {
    coverage: Vec<u8>,
    skyline: Skyline,
}

impl AtlasPage {
    fn new() -> Self {
        let side = usize::from(PAGE_SIZE);
        Self {
            coverage: vec![0; side * side],
            skyline: Skyline::new(PAGE_SIZE, PAGE_SIZE),
        }
    }

    /// Coverage bytes of row `y`, `PAGE_SIZE` long.
    pub fn row(&self, y: u16) -> &[u8] {
        let side = usize::from(PAGE_SIZE);
        let start = usize::from(y.min(PAGE_SIZE - 1)) * side;
        &self.coverage[start..start + side]
    }

    pub fn coverage_at(&self, x: u16, y: u16) -> u8 {
        self.row(y).get(usize::from(x)).copied().unwrap_or(0)
    }
}

/// Growable list of atlas pages.
#[derive(Debug, Default)]
pub struct Atlas {
    pages: Vec<Box<AtlasPage>>,
}

impl Atlas {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn page_count(&self) -> usize {
        self.pages.len()
    }

    pub fn page(&self, index: u16) -> Option<&AtlasPage> {
        self.pages.get(usize::from(index)).map(|page| page.as_ref())
    }

    fn current_page_index(&self) -> u16 {
        self.pages.len().saturating_sub(1) as u16
    }

    /// Reserve a `width * height` rectangle.
    ///
    /// Tries the newest page first and appends a page when it is full.
    ///
    /// # Returns
    /// `None` only if the rectangle is larger than a page.
    pub fn pack(&mut self, width: u16, height: u16) -> Option<AtlasLocation> {
        if width > PAGE_SIZE || height > PAGE_SIZE {
            return None;
        }
        if width == 0 || height == 0 {
            return Some(AtlasLocation {
                page: self.current_page_index(),
                x: 0,
                y: 0,
            });
        }

        if let Some(page) = self.pages.last_mut() {
            if let Some((x, y)) = page.skyline.allocate(width, height) {
                return Some(AtlasLocation {
                    page: self.current_page_index(),
                    x,
                    y,
                });
            }
        }

        self.pages.push(Box::new(AtlasPage::new()));
        info!(
            "Atlas: page {} created for a {}x{} glyph",
            self.pages.len() - 1,
            width,
            height
        );
        let page = self.pages.last_mut()?;
        let (x, y) = page.skyline.allocate(width, height)?;
        Some(AtlasLocation {
            page: self.current_page_index(),
            x,
            y,
        })
    }

    /// Copy a row-major `width * height` bitmap into a packed rectangle.
    pub fn copy_in(&mut self, location: AtlasLocation, width: u16, height: u16, coverage: &[u8]) {
        if width == 0 || height == 0 {
            return;
        }
        let Some(page) = self.pages.get_mut(usize::from(location.page)) else {
            warn!("Atlas: copy into missing page {}", location.page);
            return;
        };
        let side = usize::from(PAGE_SIZE);
        let (x, y, w) = (
            usize::from(location.x),
            usize::from(location.y),
            usize::from(width),
        );
        for (j, src) in coverage.chunks_exact(w).take(usize::from(height)).enumerate() {
            let start = (y + j) * side + x;
            if let Some(dst) = page.coverage.get_mut(start..start + w) {
                dst.copy_from_slice(src);
            }
        }
    }
}
