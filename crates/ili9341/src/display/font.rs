//! Fixed-width bitmap font descriptor
//!
//! Glyph data is supplied by the application; the driver only reads it.
//! Each glyph is `height` rows of `u16`, and bit 15 of a row is the
//! leftmost column. Glyphs are stored in ASCII order starting at `' '`.

/// First character stored in a glyph table.
pub const FIRST_GLYPH: char = ' ';

/// Last character stored in a glyph table.
pub const LAST_GLYPH: char = '~';

/// Monospaced bitmap font.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Font {
    /// Glyph width in pixels, at most 16.
    pub width: u16,
    /// Glyph height in pixels (rows per glyph).
    pub height: u16,
    /// Row bitmaps, `height` entries per glyph.
    pub glyphs: &'static [u16],
}

impl Font {
    /// Describe a font. `width` is capped at 16 columns.
    pub const fn new(width: u16, height: u16, glyphs: &'static [u16]) -> Self {
        let width = if width > 16 { 16 } else { width };
        Self {
            width,
            height,
            glyphs,
        }
    }

    /// Row bitmaps for `ch`.
    ///
    /// Characters outside `' '..='~'` use the space glyph. Rows missing
    /// from a short table read as blank.
    pub fn glyph(&self, ch: char) -> GlyphRows<'_> {
        let height = usize::from(self.height);
        let start = glyph_index(ch).saturating_mul(height);
        let rows = self
            .glyphs
            .get(start..start.saturating_add(height))
            .unwrap_or(&[]);
        GlyphRows { rows }
    }
}

/// Position of `ch` in a glyph table.
pub fn glyph_index(ch: char) -> usize {
    if (FIRST_GLYPH..=LAST_GLYPH).contains(&ch) {
        // ch is ASCII and >= ' ', so the subtraction cannot underflow.
        #[allow(clippy::arithmetic_side_effects)]
        let index = ch as usize - FIRST_GLYPH as usize;
        index
    } else {
        0
    }
}

/// Row bitmaps of one glyph.
#[derive(Debug, Clone, Copy)]
pub struct GlyphRows<'a> {
    rows: &'a [u16],
}

impl GlyphRows<'_> {
    /// `true` if the pixel at (`col`, `row`) is foreground.
    pub fn is_set(&self, col: u16, row: u16) -> bool {
        if col >= 16 {
            return false;
        }
        self.rows
            .get(usize::from(row))
            .is_some_and(|bits| bits & (0x8000 >> col) != 0)
    }
}
