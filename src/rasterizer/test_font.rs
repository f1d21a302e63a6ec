//! Test fonts: a minimal TrueType writer and an in-memory glyph source.
//!
//! Builds a font with `head`, `hhea`, `maxp`, `cmap` (format 12), `hmtx`,
//! `loca` (long) and `glyf` tables, or a `ttcf` collection of such fonts.
//! Each glyph is either an axis-aligned square or an empty outline, which is
//! enough to drive the real parser and rasterizer without shipping font files.

use super::font_driver::{GlyphId, GlyphSource, RasterizedGlyph};
use std::cell::Cell;
use std::path::PathBuf;
use std::rc::Rc;
use std::sync::atomic::{AtomicUsize, Ordering};

#[derive(Debug, Clone)]
pub struct TestGlyph {
    ch: char,
    advance: u16,
    /// x_min, y_min, x_max, y_max in font units.
    square: Option<[i16; 4]>,
}

impl TestGlyph {
    pub fn square(ch: char, x_min: i16, y_min: i16, x_max: i16, y_max: i16, advance: u16) -> Self {
        Self {
            ch,
            advance,
            square: Some([x_min, y_min, x_max, y_max]),
        }
    }

    pub fn blank(ch: char, advance: u16) -> Self {
        Self {
            ch,
            advance,
            square: None,
        }
    }
}

#[derive(Debug, Clone)]
pub struct TestFont {
    units_per_em: u16,
    glyphs: Vec<TestGlyph>,
    outlines: bool,
}

fn put_u16(out: &mut Vec<u8>, v: u16) {
    out.extend_from_slice(&v.to_be_bytes());
}

fn put_i16(out: &mut Vec<u8>, v: i16) {
    out.extend_from_slice(&v.to_be_bytes());
}

fn put_u32(out: &mut Vec<u8>, v: u32) {
    out.extend_from_slice(&v.to_be_bytes());
}

impl TestFont {
    pub fn new(units_per_em: u16) -> Self {
        Self {
            units_per_em,
            glyphs: Vec::new(),
            outlines: true,
        }
    }

    pub fn glyph(mut self, glyph: TestGlyph) -> Self {
        self.glyphs.push(glyph);
        self
    }

    /// Leave out `glyf` and `loca`, as in a bitmap-only or non-TrueType font.
    pub fn without_outline_tables(mut self) -> Self {
        self.outlines = false;
        self
    }

    pub fn build(&self) -> Vec<u8> {
        self.build_at(0)
    }

    /// Packs `faces` into a `ttcf` collection.
    pub fn collection(faces: &[TestFont]) -> Vec<u8> {
        let header_len = 12 + 4 * faces.len();
        let mut bodies = Vec::with_capacity(faces.len());
        let mut offsets = Vec::with_capacity(faces.len());
        let mut offset = header_len;
        for face in faces {
            let body = face.build_at(offset);
            offsets.push(offset as u32);
            offset += body.len();
            bodies.push(body);
        }

        let mut out = Vec::new();
        out.extend_from_slice(b"ttcf");
        put_u32(&mut out, 0x0001_0000);
        put_u32(&mut out, faces.len() as u32);
        for offset in offsets {
            put_u32(&mut out, offset);
        }
        for body in bodies {
            out.extend_from_slice(&body);
        }
        out
    }

    /// Serializes one font whose first byte will sit at `base` in the file.
    /// Table offsets are absolute, so faces inside a collection need it.
    fn build_at(&self, base: usize) -> Vec<u8> {
        // Glyph 0 is an empty .notdef.
        let num_glyphs = (self.glyphs.len() + 1) as u16;
        let upem = self.units_per_em;

        let mut glyf = Vec::new();
        let mut loca = Vec::new();
        // .notdef starts and ends at 0.
        put_u32(&mut loca, 0);
        put_u32(&mut loca, 0);
        for g in &self.glyphs {
            if let Some([x0, y0, x1, y1]) = g.square {
                put_i16(&mut glyf, 1); // contours
                for v in [x0, y0, x1, y1] {
                    put_i16(&mut glyf, v);
                }
                put_u16(&mut glyf, 3); // last point index
                put_u16(&mut glyf, 0); // instructions
                glyf.extend_from_slice(&[0x01; 4]); // on-curve, long deltas
                // Clockwise: bottom-left, top-left, top-right, bottom-right.
                for dx in [x0, 0, x1 - x0, 0] {
                    put_i16(&mut glyf, dx);
                }
                for dy in [y0, y1 - y0, 0, y0 - y1] {
                    put_i16(&mut glyf, dy);
                }
                while glyf.len() % 4 != 0 {
                    glyf.push(0);
                }
            }
            put_u32(&mut loca, glyf.len() as u32);
        }

        let mut head = Vec::new();
        put_u32(&mut head, 0x0001_0000); // version
        put_u32(&mut head, 0x0001_0000); // revision
        put_u32(&mut head, 0); // checksum adjustment
        put_u32(&mut head, 0x5F0F_3CF5); // magic
        put_u16(&mut head, 0); // flags
        put_u16(&mut head, upem);
        head.extend_from_slice(&[0; 16]); // created, modified
        for v in [0, 0, upem as i16, upem as i16] {
            put_i16(&mut head, v);
        }
        put_u16(&mut head, 0); // mac style
        put_u16(&mut head, 8); // lowest rec ppem
        put_i16(&mut head, 2); // direction hint
        put_i16(&mut head, 1); // long loca
        put_i16(&mut head, 0); // glyph data format

        let mut hhea = Vec::new();
        put_u32(&mut hhea, 0x0001_0000);
        put_i16(&mut hhea, (upem as i32 * 4 / 5) as i16); // ascender
        put_i16(&mut hhea, -((upem / 5) as i16)); // descender
        put_i16(&mut hhea, 0); // line gap
        put_u16(&mut hhea, upem); // advance width max
        for _ in 0..3 {
            put_i16(&mut hhea, 0); // min lsb, min rsb, x max extent
        }
        put_i16(&mut hhea, 1); // caret slope rise
        put_i16(&mut hhea, 0); // caret slope run
        put_i16(&mut hhea, 0); // caret offset
        hhea.extend_from_slice(&[0; 8]); // reserved
        put_i16(&mut hhea, 0); // metric data format
        put_u16(&mut hhea, num_glyphs);

        let mut maxp = Vec::new();
        put_u32(&mut maxp, 0x0000_5000);
        put_u16(&mut maxp, num_glyphs);

        let mut hmtx = Vec::new();
        put_u16(&mut hmtx, upem / 2);
        put_i16(&mut hmtx, 0);
        for g in &self.glyphs {
            put_u16(&mut hmtx, g.advance);
            put_i16(&mut hmtx, g.square.map_or(0, |s| s[0]));
        }

        let mut groups: Vec<(u32, u32)> = self
            .glyphs
            .iter()
            .enumerate()
            .map(|(i, g)| (g.ch as u32, i as u32 + 1))
            .collect();
        groups.sort();
        let mut cmap = Vec::new();
        put_u16(&mut cmap, 0); // version
        put_u16(&mut cmap, 1); // subtables
        put_u16(&mut cmap, 3); // Windows
        put_u16(&mut cmap, 10); // Unicode full repertoire
        put_u32(&mut cmap, 12); // subtable offset
        put_u16(&mut cmap, 12); // format
        put_u16(&mut cmap, 0);
        put_u32(&mut cmap, 16 + 12 * groups.len() as u32);
        put_u32(&mut cmap, 0); // language
        put_u32(&mut cmap, groups.len() as u32);
        for (cp, gid) in groups {
            put_u32(&mut cmap, cp);
            put_u32(&mut cmap, cp);
            put_u32(&mut cmap, gid);
        }

        // Table records must be sorted by tag.
        let mut tables: Vec<(&[u8; 4], Vec<u8>)> = vec![
            (b"cmap", cmap),
            (b"glyf", glyf),
            (b"head", head),
            (b"hhea", hhea),
            (b"hmtx", hmtx),
            (b"loca", loca),
            (b"maxp", maxp),
        ];
        if !self.outlines {
            tables.retain(|(tag, _)| tag != &b"glyf" && tag != &b"loca");
        }

        let mut out = Vec::new();
        put_u32(&mut out, 0x0001_0000);
        put_u16(&mut out, tables.len() as u16);
        put_u16(&mut out, 64); // search range
        put_u16(&mut out, 2); // entry selector
        put_u16(&mut out, 48); // range shift

        let mut offset = base + 12 + 16 * tables.len();
        for (tag, data) in &tables {
            out.extend_from_slice(&tag[..]);
            put_u32(&mut out, 0); // checksum, not verified
            put_u32(&mut out, offset as u32);
            put_u32(&mut out, data.len() as u32);
            offset += (data.len() + 3) & !3;
        }
        for (_, data) in &tables {
            out.extend_from_slice(data);
            while (base + out.len()) % 4 != 0 {
                out.push(0);
            }
        }
        out
    }

    /// Writes the font to a unique file in the temp directory.
    pub fn write_temp(&self) -> PathBuf {
        write_temp_bytes(&self.build())
    }
}

/// Writes raw font data to a unique file in the temp directory.
pub fn write_temp_bytes(data: &[u8]) -> PathBuf {
    static COUNTER: AtomicUsize = AtomicUsize::new(0);
    let n = COUNTER.fetch_add(1, Ordering::Relaxed);
    let path = std::env::temp_dir().join(format!(
        "menu-text-test-{}-{}.ttf",
        std::process::id(),
        n
    ));
    std::fs::write(&path, data).expect("write test font");
    path
}

/// In-memory glyph source with hand-made bitmaps.
///
/// Every `index_of` call bumps a shared counter so tests can check how often
/// the fallback chain was consulted.
#[derive(Debug, Default)]
pub struct MockSource {
    name: String,
    glyphs: std::collections::HashMap<u32, (GlyphId, RasterizedGlyph)>,
    lookups: Rc<Cell<usize>>,
}

impl MockSource {
    pub fn new(name: &str) -> Self {
        Self {
            name: name.to_string(),
            ..Self::default()
        }
    }

    /// Adds a solid `width * height` block drawn with `coverage`.
    pub fn solid(self, ch: char, width: u16, height: u16, advance: u16, coverage: u8) -> Self {
        let glyph = RasterizedGlyph {
            width,
            height,
            left: 0,
            top: -(height as i16),
            advance,
            coverage: vec![coverage; width as usize * height as usize],
        };
        self.with_glyph(ch, glyph)
    }

    pub fn with_glyph(mut self, ch: char, glyph: RasterizedGlyph) -> Self {
        let id = self.glyphs.len() as GlyphId + 1;
        self.glyphs.insert(ch as u32, (id, glyph));
        self
    }

    /// Counter shared with the source after it is boxed.
    pub fn lookups(&self) -> Rc<Cell<usize>> {
        Rc::clone(&self.lookups)
    }
}

impl GlyphSource for MockSource {
    fn index_of(&self, codepoint: u32) -> GlyphId {
        self.lookups.set(self.lookups.get() + 1);
        self.glyphs.get(&codepoint).map_or(0, |(id, _)| *id)
    }

    fn rasterize(&self, glyph: GlyphId) -> RasterizedGlyph {
        self.glyphs
            .values()
            .find(|(id, _)| *id == glyph)
            .map(|(_, g)| g.clone())
            .unwrap_or_default()
    }

    fn name(&self) -> &str {
        &self.name
    }
}
