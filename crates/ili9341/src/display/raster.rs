//! Shape rasterization
//!
//! Every primitive reduces to filled rectangles or single pixels, so all
//! bus traffic goes through the transfer engine and inherits its clipping.
//! Off-screen geometry is silently dropped.

use platform::{ScratchAlloc, Transport};

use super::color::Color565;
use super::geometry::{clip_point, Rect};
use super::transfer::{stream, Solid};
use crate::device::Device;
use crate::error::DriverError;

impl<T, S> Device<T, S>
where
    T: Transport,
    S: ScratchAlloc,
{
    /// Set one pixel. Off-screen coordinates are ignored.
    ///
    /// Uses a stack block, so it works even with no scratch memory.
    pub fn draw_pixel(&mut self, x: u16, y: u16, color: Color565) -> Result<(), DriverError> {
        let Some((x, y)) = clip_point(x, y, self.size) else {
            return Ok(());
        };
        let mut block = color.to_be_bytes();
        let len = block.len();
        stream(
            &mut self.transport,
            Rect::new(x, y, 1, 1),
            &mut block,
            len,
            &mut Solid(color),
        )
    }

    /// Fill a rectangle, clipped to the screen.
    pub fn fill_rect(
        &mut self,
        x: u16,
        y: u16,
        w: u16,
        h: u16,
        color: Color565,
    ) -> Result<(), DriverError> {
        match Rect::new(x, y, w, h).clip(self.size) {
            Some(visible) => self.transfer(visible, &mut Solid(color)),
            None => Ok(()),
        }
    }

    /// Fill the whole screen.
    pub fn fill_screen(&mut self, color: Color565) -> Result<(), DriverError> {
        let bounds = self.size.bounds();
        self.transfer(bounds, &mut Solid(color))
    }

    /// One-pixel outline of a rectangle: top, bottom, left, right.
    pub fn draw_rect(
        &mut self,
        x: u16,
        y: u16,
        w: u16,
        h: u16,
        color: Color565,
    ) -> Result<(), DriverError> {
        if w == 0 || h == 0 {
            return Ok(());
        }
        let right = x.saturating_add(w.saturating_sub(1));
        let bottom = y.saturating_add(h.saturating_sub(1));
        self.fill_rect(x, y, w, 1, color)?;
        self.fill_rect(x, bottom, w, 1, color)?;
        self.fill_rect(x, y, 1, h, color)?;
        self.fill_rect(right, y, 1, h, color)
    }

    /// Straight line between two inclusive endpoints.
    ///
    /// Identical endpoints draw nothing. Axis-aligned lines become a single
    /// one-pixel-thick rectangle; anything else is Bresenham, pixel by
    /// pixel, skipping points outside the screen.
    pub fn draw_line(
        &mut self,
        x0: u16,
        y0: u16,
        x1: u16,
        y1: u16,
        color: Color565,
    ) -> Result<(), DriverError> {
        if (x0, y0) == (x1, y1) {
            return Ok(());
        }
        if x0 == x1 {
            let len = y0.abs_diff(y1).saturating_add(1);
            return self.fill_rect(x0, y0.min(y1), 1, len, color);
        }
        if y0 == y1 {
            let len = x0.abs_diff(x1).saturating_add(1);
            return self.fill_rect(x0.min(x1), y0, len, 1, color);
        }

        let (mut x0, mut y0) = (i32::from(x0), i32::from(y0));
        let (mut x1, mut y1) = (i32::from(x1), i32::from(y1));
        let steep = y0.abs_diff(y1) > x0.abs_diff(x1);
        if steep {
            core::mem::swap(&mut x0, &mut y0);
            core::mem::swap(&mut x1, &mut y1);
        }
        if x0 > x1 {
            core::mem::swap(&mut x0, &mut x1);
            core::mem::swap(&mut y0, &mut y1);
        }

        // Inputs are u16, so every intermediate below fits in i32.
        #[allow(clippy::arithmetic_side_effects)]
        {
            let dx = x1 - x0;
            let dy = (y1 - y0).abs();
            let ystep = if y0 < y1 { 1 } else { -1 };
            let mut err = dx / 2;
            let mut y = y0;
            for x in x0..=x1 {
                if steep {
                    self.plot(y, x, color)?;
                } else {
                    self.plot(x, y, color)?;
                }
                err -= dy;
                if err < 0 {
                    y += ystep;
                    err += dx;
                }
            }
        }
        Ok(())
    }

    /// Midpoint circle outline centred on `(x0, y0)`.
    pub fn draw_circle(
        &mut self,
        x0: u16,
        y0: u16,
        r: u16,
        color: Color565,
    ) -> Result<(), DriverError> {
        if r == 0 {
            return self.draw_pixel(x0, y0, color);
        }
        let (cx, cy, r) = (i32::from(x0), i32::from(y0), i32::from(r));

        #[allow(clippy::arithmetic_side_effects)]
        {
            let mut f = 1 - r;
            let mut dd_x = 1;
            let mut dd_y = -2 * r;
            let mut x = 0;
            let mut y = r;

            self.plot(cx, cy + r, color)?;
            self.plot(cx, cy - r, color)?;
            self.plot(cx + r, cy, color)?;
            self.plot(cx - r, cy, color)?;

            while x < y {
                if f >= 0 {
                    y -= 1;
                    dd_y += 2;
                    f += dd_y;
                }
                x += 1;
                dd_x += 2;
                f += dd_x;

                self.plot(cx + x, cy + y, color)?;
                self.plot(cx - x, cy + y, color)?;
                self.plot(cx + x, cy - y, color)?;
                self.plot(cx - x, cy - y, color)?;
                self.plot(cx + y, cy + x, color)?;
                self.plot(cx - y, cy + x, color)?;
                self.plot(cx + y, cy - x, color)?;
                self.plot(cx - y, cy - x, color)?;
            }
        }
        Ok(())
    }

    /// Filled circle: a centre chord, then mirrored chords per midpoint step.
    pub fn fill_circle(
        &mut self,
        x0: u16,
        y0: u16,
        r: u16,
        color: Color565,
    ) -> Result<(), DriverError> {
        let (cx, cy, r) = (i32::from(x0), i32::from(y0), i32::from(r));

        #[allow(clippy::arithmetic_side_effects)]
        {
            self.chord(cx - r, cy, 2 * r + 1, color)?;

            let mut f = 1 - r;
            let mut dd_x = 1;
            let mut dd_y = -2 * r;
            let mut x = 0;
            let mut y = r;
            while x < y {
                if f >= 0 {
                    y -= 1;
                    dd_y += 2;
                    f += dd_y;
                }
                x += 1;
                dd_x += 2;
                f += dd_x;

                self.chord(cx - x, cy + y, 2 * x + 1, color)?;
                self.chord(cx - x, cy - y, 2 * x + 1, color)?;
                self.chord(cx - y, cy + x, 2 * y + 1, color)?;
                self.chord(cx - y, cy - x, 2 * y + 1, color)?;
            }
        }
        Ok(())
    }

    /// Single pixel at signed coordinates; negatives are off-screen.
    fn plot(&mut self, x: i32, y: i32, color: Color565) -> Result<(), DriverError> {
        match (u16::try_from(x), u16::try_from(y)) {
            (Ok(x), Ok(y)) => self.draw_pixel(x, y, color),
            _ => Ok(()),
        }
    }

    /// Horizontal run of `len` pixels from `(x, y)`, clamped at the left edge.
    fn chord(&mut self, x: i32, y: i32, len: i32, color: Color565) -> Result<(), DriverError> {
        let Ok(y) = u16::try_from(y) else {
            return Ok(());
        };
        let (x, len) = if x < 0 {
            (0, len.saturating_add(x))
        } else {
            (x, len)
        };
        if len <= 0 {
            return Ok(());
        }
        let x = u16::try_from(x).unwrap_or(u16::MAX);
        let len = u16::try_from(len).unwrap_or(u16::MAX);
        self.fill_rect(x, y, len, 1, color)
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
