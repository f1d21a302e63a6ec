//! Outline flattening and coverage rasterization.
//!
//! Glyph outlines are fed through `ttf_parser::OutlineBuilder`, scaled into
//! pixel space (y pointing down) and flattened to line segments. The lines are
//! then accumulated as signed area into a float buffer; a running sum over the
//! buffer gives nonzero-winding coverage per pixel.

use ttf_parser::OutlineBuilder;

pub type Point = [f32; 2];

/// Max distance, in pixels, between a curve and its flattened polyline.
const FLATTEN_TOLERANCE: f32 = 0.2;
/// Bound on curve subdivision depth.
const MAX_DEPTH: u32 = 8;

fn lerp(p0: Point, p1: Point, t: f32) -> Point {
    [p0[0] + (p1[0] - p0[0]) * t, p0[1] + (p1[1] - p0[1]) * t]
}

fn distance_sq(a: Point, b: Point) -> f32 {
    let dx = a[0] - b[0];
    let dy = a[1] - b[1];
    dx * dx + dy * dy
}

/// Collects a glyph outline as pixel-space line segments.
///
/// Font units are multiplied by `scale`, the y axis is flipped, and `shift`
/// is added on both axes for subpixel positioning.
#[derive(Debug)]
pub struct OutlineFlattener {
    scale: f32,
    shift: f32,
    lines: Vec<(Point, Point)>,
    current: Point,
    start: Point,
}

impl OutlineFlattener {
    pub fn new(scale: f32, shift: f32) -> Self {
        Self {
            scale,
            shift,
            lines: Vec::with_capacity(64),
            current: [0.0, 0.0],
            start: [0.0, 0.0],
        }
    }

    fn map(&self, x: f32, y: f32) -> Point {
        [x * self.scale + self.shift, -y * self.scale + self.shift]
    }

    fn push_line(&mut self, p1: Point) {
        if p1 != self.current {
            self.lines.push((self.current, p1));
        }
        self.current = p1;
    }

    fn flatten_quad(&mut self, p0: Point, p1: Point, p2: Point, depth: u32) {
        let mid = lerp(p0, p2, 0.5);
        if depth >= MAX_DEPTH || distance_sq(p1, mid) <= FLATTEN_TOLERANCE * FLATTEN_TOLERANCE {
            self.push_line(p2);
            return;
        }
        let p01 = lerp(p0, p1, 0.5);
        let p12 = lerp(p1, p2, 0.5);
        let p012 = lerp(p01, p12, 0.5);
        self.flatten_quad(p0, p01, p012, depth + 1);
        self.flatten_quad(p012, p12, p2, depth + 1);
    }

    fn flatten_cubic(&mut self, p0: Point, p1: Point, p2: Point, p3: Point, depth: u32) {
        let flat = distance_sq(p1, lerp(p0, p3, 1.0 / 3.0))
            .max(distance_sq(p2, lerp(p0, p3, 2.0 / 3.0)));
        if depth >= MAX_DEPTH || flat <= FLATTEN_TOLERANCE * FLATTEN_TOLERANCE {
            self.push_line(p3);
            return;
        }
        let p01 = lerp(p0, p1, 0.5);
        let p12 = lerp(p1, p2, 0.5);
        let p23 = lerp(p2, p3, 0.5);
        let p012 = lerp(p01, p12, 0.5);
        let p123 = lerp(p12, p23, 0.5);
        let p0123 = lerp(p012, p123, 0.5);
        self.flatten_cubic(p0, p01, p012, p0123, depth + 1);
        self.flatten_cubic(p0123, p123, p23, p3, depth + 1);
    }

    /// Flattened segments in pixel space.
    pub fn lines(&self) -> &[(Point, Point)] {
        &self.lines
    }

    /// Renders the collected outline into a `width * height` coverage bitmap
    /// whose top-left pixel sits at (`origin_x`, `origin_y`) in pixel space.
    pub fn rasterize(&self, width: usize, height: usize, origin_x: f32, origin_y: f32) -> Vec<u8> {
        if width == 0 || height == 0 {
            return Vec::new();
        }
        let mut raster = CoverageRaster::new(width, height);
        let (w, h) = (width as f32, height as f32);
        let place = |p: Point| -> Point {
            [
                (p[0] - origin_x).clamp(0.0, w),
                (p[1] - origin_y).clamp(0.0, h),
            ]
        };
        for &(p0, p1) in &self.lines {
            raster.line(place(p0), place(p1));
        }
        raster.into_coverage()
    }
}

impl OutlineBuilder for OutlineFlattener {
    fn move_to(&mut self, x: f32, y: f32) {
        self.current = self.map(x, y);
        self.start = self.current;
    }

    fn line_to(&mut self, x: f32, y: f32) {
        let p1 = self.map(x, y);
        self.push_line(p1);
    }

    fn quad_to(&mut self, x1: f32, y1: f32, x: f32, y: f32) {
        let p1 = self.map(x1, y1);
        let p2 = self.map(x, y);
        self.flatten_quad(self.current, p1, p2, 0);
    }

    fn curve_to(&mut self, x1: f32, y1: f32, x2: f32, y2: f32, x: f32, y: f32) {
        let p1 = self.map(x1, y1);
        let p2 = self.map(x2, y2);
        let p3 = self.map(x, y);
        self.flatten_cubic(self.current, p1, p2, p3, 0);
    }

    fn close(&mut self) {
        let start = self.start;
        self.push_line(start);
    }
}

/// Signed-area accumulation buffer.
///
/// Each line deposits the area it covers to its right into the cells it
/// crosses; `into_coverage` integrates the buffer row-major.
#[derive(Debug)]
pub struct CoverageRaster {
    width: usize,
    height: usize,
    acc: Vec<f32>,
}

impl CoverageRaster {
    pub fn new(width: usize, height: usize) -> Self {
        // Slack at the end absorbs deposits at x == width on the last row.
        Self {
            width,
            height,
            acc: vec![0.0; width * height + 4],
        }
    }

    fn add(&mut self, index: isize, value: f32) {
        if let Some(cell) = usize::try_from(index).ok().and_then(|i| self.acc.get_mut(i)) {
            *cell += value;
        }
    }

    /// Accumulates one line. Points must lie within `[0, width] x [0, height]`.
    pub fn line(&mut self, p0: Point, p1: Point) {
        if (p0[1] - p1[1]).abs() <= f32::EPSILON {
            return;
        }
        let (dir, p0, p1) = if p0[1] < p1[1] {
            (1.0, p0, p1)
        } else {
            (-1.0, p1, p0)
        };
        let dxdy = (p1[0] - p0[0]) / (p1[1] - p0[1]);
        let mut x = p0[0];
        let y_start = p0[1].max(0.0) as usize;
        let y_end = (p1[1].ceil() as usize).min(self.height);

        for y in y_start..y_end {
            let row = (y * self.width) as isize;
            let dy = ((y + 1) as f32).min(p1[1]) - (y as f32).max(p0[1]);
            let x_next = x + dxdy * dy;
            let d = dy * dir;
            let (x0, x1) = if x < x_next { (x, x_next) } else { (x_next, x) };
            let x0_floor = x0.floor();
            let x0i = x0_floor as isize;
            let x1_ceil = x1.ceil();
            let x1i = x1_ceil as isize;

            if x1i <= x0i + 1 {
                // Line stays within one column.
                let xmf = 0.5 * (x + x_next) - x0_floor;
                self.add(row + x0i, d - d * xmf);
                self.add(row + x0i + 1, d * xmf);
            } else {
                let s = (x1 - x0).recip();
                let x0f = x0 - x0_floor;
                let a0 = 0.5 * s * (1.0 - x0f) * (1.0 - x0f);
                let x1f = x1 - x1_ceil + 1.0;
                let am = 0.5 * s * x1f * x1f;
                self.add(row + x0i, d * a0);
                if x1i == x0i + 2 {
                    self.add(row + x0i + 1, d * (1.0 - a0 - am));
                } else {
                    let a1 = s * (1.5 - x0f);
                    self.add(row + x0i + 1, d * (a1 - a0));
                    for xi in x0i + 2..x1i - 1 {
                        self.add(row + xi, d * s);
                    }
                    let a2 = a1 + (x1i - x0i - 3) as f32 * s;
                    self.add(row + x1i - 1, d * (1.0 - a2 - am));
                }
                self.add(row + x1i, d * am);
            }
            x = x_next;
        }
    }

    /// Integrates the buffer into 8-bit coverage.
    pub fn into_coverage(self) -> Vec<u8> {
        let mut sum = 0.0f32;
        self.acc[..self.width * self.height]
            .iter()
            .map(|&delta| {
                sum += delta;
                (sum.abs().min(1.0) * 255.0 + 0.5) as u8
            })
            .collect()
    }
}
