//! RGB565 colour

use embedded_graphics::pixelcolor::raw::{RawData, RawU16};
use embedded_graphics::pixelcolor::Rgb565;

/// Packed 5-6-5 colour as the controller stores it.
///
/// Always sent most-significant byte first, whatever the host byte order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Color565(pub u16);

/// Named palette.
#[allow(missing_docs)]
impl Color565 {
    pub const BLACK: Self = Self(0x0000);
    pub const NAVY: Self = Self(0x000F);
    pub const DARK_GREEN: Self = Self(0x03E0);
    pub const DARK_CYAN: Self = Self(0x03EF);
    pub const MAROON: Self = Self(0x7800);
    pub const PURPLE: Self = Self(0x780F);
    pub const OLIVE: Self = Self(0x7BE0);
    pub const LIGHT_GREY: Self = Self(0xC618);
    pub const DARK_GREY: Self = Self(0x7BEF);
    pub const BLUE: Self = Self(0x001F);
    pub const GREEN: Self = Self(0x07E0);
    pub const CYAN: Self = Self(0x07FF);
    pub const RED: Self = Self(0xF800);
    pub const MAGENTA: Self = Self(0xF81F);
    pub const YELLOW: Self = Self(0xFFE0);
    pub const WHITE: Self = Self(0xFFFF);
    pub const ORANGE: Self = Self(0xFD20);
    pub const GREEN_YELLOW: Self = Self(0xAFE5);
    pub const PINK: Self = Self(0xFC18);
}

impl Color565 {
    /// Pack 8-bit channels, dropping the low bits of each.
    pub const fn from_rgb(r: u8, g: u8, b: u8) -> Self {
        let r = (r as u16 & 0xF8) << 8;
        let g = (g as u16 & 0xFC) << 3;
        let b = (b as u16 & 0xF8) >> 3;
        Self(r | g | b)
    }

    /// Wire order: MSB, LSB.
    pub const fn to_be_bytes(self) -> [u8; 2] {
        self.0.to_be_bytes()
    }
}

impl From<Rgb565> for Color565 {
    fn from(color: Rgb565) -> Self {
        Self(RawU16::from(color).into_inner())
    }
}

impl From<Color565> for Rgb565 {
    fn from(color: Color565) -> Self {
        Rgb565::from(RawU16::new(color.0))
    }
}

/// Write `color` into every pixel slot of `buf`. A trailing odd byte is left alone.
pub(crate) fn fill_pixels(buf: &mut [u8], color: Color565) {
    let bytes = color.to_be_bytes();
    for slot in buf.chunks_exact_mut(2) {
        slot.copy_from_slice(&bytes);
    }
}
