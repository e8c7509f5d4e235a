//! `embedded-graphics` integration
//!
//! Lets the device render any `embedded-graphics` drawable. Solid fills
//! and fully on-screen contiguous fills go through the chunked transfer
//! engine; everything else falls back to per-pixel writes.

use embedded_graphics::pixelcolor::Rgb565;
use embedded_graphics::prelude::*;
use embedded_graphics::primitives::Rectangle;
use platform::{ScratchAlloc, Transport};

use super::color::Color565;
use super::geometry::Rect;
use super::transfer::{Solid, Streamed};
use crate::device::Device;
use crate::error::DriverError;

/// Convert a rectangle already intersected with the screen.
fn to_rect(area: &Rectangle) -> Option<Rect> {
    let x = u16::try_from(area.top_left.x).ok()?;
    let y = u16::try_from(area.top_left.y).ok()?;
    let w = u16::try_from(area.size.width).ok()?;
    let h = u16::try_from(area.size.height).ok()?;
    (w > 0 && h > 0).then_some(Rect::new(x, y, w, h))
}

impl<T, S> OriginDimensions for Device<T, S>
where
    T: Transport,
{
    fn size(&self) -> Size {
        Size::new(u32::from(self.size.width), u32::from(self.size.height))
    }
}

impl<T, S> DrawTarget for Device<T, S>
where
    T: Transport,
    S: ScratchAlloc,
{
    type Color = Rgb565;
    type Error = DriverError;

    fn draw_iter<I>(&mut self, pixels: I) -> Result<(), Self::Error>
    where
        I: IntoIterator<Item = Pixel<Self::Color>>,
    {
        for Pixel(point, color) in pixels {
            if let (Ok(x), Ok(y)) = (u16::try_from(point.x), u16::try_from(point.y)) {
                self.draw_pixel(x, y, color.into())?;
            }
        }
        Ok(())
    }

    fn fill_contiguous<I>(&mut self, area: &Rectangle, colors: I) -> Result<(), Self::Error>
    where
        I: IntoIterator<Item = Self::Color>,
    {
        let visible = area.intersection(&self.bounding_box());
        if visible == *area {
            if let Some(rect) = to_rect(area) {
                let mut source = Streamed(colors.into_iter().map(Color565::from));
                return self.transfer(rect, &mut source);
            }
            return Ok(());
        }
        // Partly off-screen: the pixel stream no longer maps onto one window.
        self.draw_iter(
            area.points()
                .zip(colors)
                .filter(|(p, _)| visible.contains(*p))
                .map(|(p, c)| Pixel(p, c)),
        )
    }

    fn fill_solid(&mut self, area: &Rectangle, color: Self::Color) -> Result<(), Self::Error> {
        let visible = area.intersection(&self.bounding_box());
        match to_rect(&visible) {
            Some(rect) => self.transfer(rect, &mut Solid(color.into())),
            None => Ok(()),
        }
    }

    fn clear(&mut self, color: Self::Color) -> Result<(), Self::Error> {
        self.fill_screen(color.into())
    }
}
