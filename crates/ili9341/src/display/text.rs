//! Bitmap text

use platform::{ScratchAlloc, Transport};

use super::color::Color565;
use super::font::Font;
use super::geometry::Rect;
use super::transfer::{plan, stream, GlyphPixels, Solid};
use crate::device::Device;
use crate::error::DriverError;

/// Font and colours for a run of text.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TextStyle<'a> {
    /// Glyph table.
    pub font: &'a Font,
    /// Set bits.
    pub fg: Color565,
    /// Clear bits and the glyph cell background.
    pub bg: Color565,
}

impl<'a> TextStyle<'a> {
    /// Create a style.
    pub const fn new(font: &'a Font, fg: Color565, bg: Color565) -> Self {
        Self { font, fg, bg }
    }
}

/// What to do when a string reaches the right edge.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum TextWrap {
    /// Stop drawing.
    #[default]
    Truncate,
    /// Continue at the start column one line down.
    CharWrap,
    /// Break at word boundaries. Not supported.
    WordWrap,
}

impl<T, S> Device<T, S>
where
    T: Transport,
    S: ScratchAlloc,
{
    /// Draw one glyph cell with its top-left corner at (`x`, `y`).
    ///
    /// The cell is clipped to the screen. It is painted twice through the
    /// same window: first the background, then the glyph pixels.
    pub fn draw_char(
        &mut self,
        x: u16,
        y: u16,
        ch: char,
        style: &TextStyle<'_>,
    ) -> Result<(), DriverError> {
        let font = style.font;
        let Some(visible) = Rect::new(x, y, font.width, font.height).clip(self.size) else {
            return Ok(());
        };
        let rows = font.glyph(ch);
        let (total, block) = plan(visible, self.max_block, self.scratch.max_len());
        if block == 0 {
            warn!("ili9341: scratch holds no whole pixel, glyph skipped");
            return Ok(());
        }

        let Self {
            transport, scratch, ..
        } = self;
        let drawn = scratch.with_scratch(block, |buf| {
            stream(transport, visible, buf, total, &mut Solid(style.bg))?;
            let mut glyph = GlyphPixels::new(rows, visible, style.fg, style.bg);
            stream(transport, visible, buf, total, &mut glyph)
        });
        drawn.unwrap_or_else(|| {
            warn!("ili9341: no {} byte scratch block, glyph skipped", block);
            Ok(())
        })
    }

    /// Draw `text` left to right starting at (`x`, `y`).
    ///
    /// [`TextWrap::WordWrap`] is rejected before anything is sent. With
    /// [`TextWrap::Truncate`] drawing stops once the cursor leaves the
    /// screen. With [`TextWrap::CharWrap`] a glyph that would cross the
    /// right edge moves to column `x` of the next line, and drawing stops
    /// once the cursor passes the bottom.
    pub fn draw_string(
        &mut self,
        x: u16,
        y: u16,
        text: &str,
        style: &TextStyle<'_>,
        wrap: TextWrap,
    ) -> Result<(), DriverError> {
        if wrap == TextWrap::WordWrap {
            return Err(DriverError::UnsupportedWrap);
        }
        let (width, height) = (self.size.width, self.size.height);
        let (fw, fh) = (style.font.width, style.font.height);
        let (mut cx, mut cy) = (x, y);

        for ch in text.chars() {
            if wrap == TextWrap::CharWrap && cx > x && cx.saturating_add(fw) > width {
                cx = x;
                cy = cy.saturating_add(fh);
            }
            if cx >= width || cy >= height {
                break;
            }
            self.draw_char(cx, cy, ch, style)?;
            cx = cx.saturating_add(fw);
        }
        Ok(())
    }
}
