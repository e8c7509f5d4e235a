//! Chunked pixel transfer engine
//!
//! Every multi-pixel draw ends up here. A clipped rectangle is addressed
//! on the controller (CASET, PASET, RAMWR) and then exactly
//! `w * h * 2` bytes are streamed in transactions no larger than the
//! scratch block.
//!
//! A [`PixelSource`] decides what goes in the block. Uniform sources are
//! rendered once and the same block is resent; others are re-rendered
//! before each chunk.

use platform::{Target, Transport};

use super::color::{fill_pixels, Color565};
use super::command::{cmd_data, selected, send_data, Command};
use super::font::GlyphRows;
use super::geometry::Rect;
use crate::config::BYTES_PER_PIXEL;
use crate::error::DriverError;

// ---------------------------------------------------------------------------
// Pixel sources
// ---------------------------------------------------------------------------

/// Produces the pixel stream for one rectangle, row-major.
pub(crate) trait PixelSource {
    /// `true` if every chunk carries identical bytes.
    fn is_uniform(&self) -> bool;

    /// Render the next `buf.len() / 2` pixels into `buf`.
    fn render(&mut self, buf: &mut [u8]);
}

/// One colour everywhere.
pub(crate) struct Solid(pub Color565);

impl PixelSource for Solid {
    fn is_uniform(&self) -> bool {
        true
    }

    fn render(&mut self, buf: &mut [u8]) {
        fill_pixels(buf, self.0);
    }
}

/// Foreground/background from a glyph bitmap.
///
/// Clipping only ever trims the right and bottom of a cell, so the visible
/// part always starts at the glyph's top-left bit.
pub(crate) struct GlyphPixels<'a> {
    rows: GlyphRows<'a>,
    /// Visible width.
    width: u16,
    fg: Color565,
    bg: Color565,
    /// Pixels already emitted.
    emitted: u32,
}

impl<'a> GlyphPixels<'a> {
    pub(crate) fn new(rows: GlyphRows<'a>, visible: Rect, fg: Color565, bg: Color565) -> Self {
        Self {
            rows,
            width: visible.w,
            fg,
            bg,
            emitted: 0,
        }
    }
}

impl PixelSource for GlyphPixels<'_> {
    fn is_uniform(&self) -> bool {
        false
    }

    fn render(&mut self, buf: &mut [u8]) {
        let width = u32::from(self.width.max(1));
        for slot in buf.chunks_exact_mut(BYTES_PER_PIXEL) {
            // emitted / width and emitted % width are bounded by the glyph
            // size (at most 16 × u16::MAX), so both fit in u16.
            #[allow(clippy::cast_possible_truncation, clippy::arithmetic_side_effects)]
            let (col, row) = (
                (self.emitted % width) as u16,
                (self.emitted / width) as u16,
            );
            let color = if self.rows.is_set(col, row) { self.fg } else { self.bg };
            slot.copy_from_slice(&color.to_be_bytes());
            self.emitted = self.emitted.saturating_add(1);
        }
    }
}

/// Colours pulled from an iterator. Runs out as black.
pub(crate) struct Streamed<I>(pub I);

impl<I: Iterator<Item = Color565>> PixelSource for Streamed<I> {
    fn is_uniform(&self) -> bool {
        false
    }

    fn render(&mut self, buf: &mut [u8]) {
        for slot in buf.chunks_exact_mut(BYTES_PER_PIXEL) {
            let color = self.0.next().unwrap_or(Color565::BLACK);
            slot.copy_from_slice(&color.to_be_bytes());
        }
    }
}

// ---------------------------------------------------------------------------
// Sizing
// ---------------------------------------------------------------------------

/// Payload size and scratch block size for `rect`.
///
/// The block is `min(total, max_block, limit)`, where `limit` is what the
/// scratch strategy can lend, rounded down to whole pixels. `max_block` is
/// validated even at construction. A block of 0 means not even one pixel
/// fits.
pub(crate) fn plan(rect: Rect, max_block: usize, limit: Option<usize>) -> (usize, usize) {
    let pixels = usize::try_from(rect.area()).unwrap_or(usize::MAX);
    let total = pixels.saturating_mul(BYTES_PER_PIXEL);
    let mut block = total.min(max_block);
    if let Some(limit) = limit {
        let whole = limit
            .checked_div(BYTES_PER_PIXEL)
            .unwrap_or(0)
            .saturating_mul(BYTES_PER_PIXEL);
        block = block.min(whole);
    }
    (total, block)
}

// ---------------------------------------------------------------------------
// Streaming
// ---------------------------------------------------------------------------

/// Address `rect` as the controller's write window and enter RAM write.
///
/// The display must already be selected.
pub(crate) fn set_window<T: Transport>(t: &mut T, rect: Rect) -> Result<(), DriverError> {
    let [x0h, x0l] = rect.x.to_be_bytes();
    let [x1h, x1l] = rect.x_end().to_be_bytes();
    let [y0h, y0l] = rect.y.to_be_bytes();
    let [y1h, y1l] = rect.y_end().to_be_bytes();
    cmd_data(t, Command::ColumnAddressSet, &[x0h, x0l, x1h, x1l])?;
    cmd_data(t, Command::PageAddressSet, &[y0h, y0l, y1h, y1l])?;
    cmd_data(t, Command::MemoryWrite, &[])
}

/// Stream `total` bytes into `rect` using `buf` as the block.
///
/// `rect` must already be clipped and `buf` must be non-empty and even.
/// Chip-select is held for the window command and the payload and is
/// released on every path.
pub(crate) fn stream<T, P>(
    t: &mut T,
    rect: Rect,
    buf: &mut [u8],
    total: usize,
    source: &mut P,
) -> Result<(), DriverError>
where
    T: Transport,
    P: PixelSource + ?Sized,
{
    if buf.is_empty() || total == 0 {
        return Ok(());
    }
    let uniform = source.is_uniform();
    if uniform {
        source.render(buf);
    }
    selected(t, Target::Display, |t| {
        set_window(t, rect)?;
        let mut remaining = total;
        while remaining > 0 {
            let len = remaining.min(buf.len());
            let chunk = buf.get_mut(..len).unwrap_or_default();
            if !uniform {
                source.render(chunk);
            }
            send_data(t, chunk)?;
            // len <= remaining by construction.
            #[allow(clippy::arithmetic_side_effects)]
            {
                remaining -= len;
            }
        }
        Ok(())
    })
}
