// src/utf8.rs

//! Lenient UTF-8 decoding for menu strings.
//!
//! Menu text arrives as raw, possibly NUL-terminated bytes (translated strings,
//! file names from the requester). The decoder never fails: malformed input
//! produces a `0` code point which the compositor skips.
//!
//! The lead-byte table accepts the historical 5- and 6-byte forms, so values up
//! to 31 bits can be produced. Only Basic Multilingual Plane values are
//! rendered downstream.

/// Decodes exactly one code point from the front of `cursor` and advances it
/// past the consumed bytes.
///
/// Returns `0` for:
/// - an empty cursor or a NUL byte (the NUL itself is consumed),
/// - a continuation byte (`0x80..=0xBF`) in lead position (consumed),
/// - `0xFE`/`0xFF` lead bytes (consumed),
/// - a sequence cut short by NUL or end of input. In that case the cursor is
///   left on the terminator so it is not swallowed.
pub fn decode(cursor: &mut &[u8]) -> u32 {
    let bytes = *cursor;
    let Some(&lead) = bytes.first() else {
        return 0;
    };

    let (len, payload) = match lead {
        0x00..=0x7F => {
            *cursor = &bytes[1..];
            return lead as u32;
        }
        0xC0..=0xDF => (2, lead & 0x1F),
        0xE0..=0xEF => (3, lead & 0x0F),
        0xF0..=0xF7 => (4, lead & 0x07),
        0xF8..=0xFB => (5, lead & 0x03),
        0xFC..=0xFD => (6, lead & 0x03),
        // Stray continuation byte or 0xFE/0xFF.
        _ => {
            *cursor = &bytes[1..];
            return 0;
        }
    };

    let mut value = payload as u32;
    for offset in 1..len {
        match bytes.get(offset) {
            Some(&c) if c != 0 => value = (value << 6) | (c & 0x3F) as u32,
            _ => {
                // Stop on the terminator without consuming it.
                *cursor = &bytes[offset..];
                return 0;
            }
        }
    }

    *cursor = &bytes[len..];
    value
}

/// Iterator over the code points of a NUL-terminated (or slice-bounded) byte
/// string.
///
/// Yields `0` for malformed units so that callers can count or skip them; it
/// ends at the first NUL byte or the end of the slice.
#[derive(Debug, Clone)]
pub struct CodePoints<'a> {
    rest: &'a [u8],
}

impl<'a> CodePoints<'a> {
    pub fn new(text: &'a [u8]) -> Self {
        Self { rest: text }
    }

    /// Bytes not consumed yet.
    pub fn remaining(&self) -> &'a [u8] {
        self.rest
    }
}

impl Iterator for CodePoints<'_> {
    type Item = u32;

    fn next(&mut self) -> Option<u32> {
        match self.rest.first() {
            None | Some(0) => None,
            Some(_) => Some(decode(&mut self.rest)),
        }
    }
}
