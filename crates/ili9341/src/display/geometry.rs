//! Orientation, screen size and rectangle clipping

use crate::config::{NATIVE_HEIGHT, NATIVE_WIDTH};

/// Panel rotation.
///
/// Named after where the panel's ribbon connector ends up: `Portrait` is
/// connector down, `Landscape` connector right, `PortraitFlip` connector
/// up, `LandscapeFlip` connector left.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Orientation {
    /// 240×320, connector down.
    #[default]
    Portrait,
    /// 320×240, connector right.
    Landscape,
    /// 240×320, connector up.
    PortraitFlip,
    /// 320×240, connector left.
    LandscapeFlip,
}

impl Orientation {
    /// Addressable screen size in this rotation.
    pub const fn screen_size(self) -> ScreenSize {
        if self.is_portrait() {
            ScreenSize::new(NATIVE_WIDTH, NATIVE_HEIGHT)
        } else {
            ScreenSize::new(NATIVE_HEIGHT, NATIVE_WIDTH)
        }
    }

    /// `true` for the two 240-wide rotations.
    pub const fn is_portrait(self) -> bool {
        matches!(self, Self::Portrait | Self::PortraitFlip)
    }

    /// MADCTL register value (row/column exchange + mirror bits, BGR order).
    pub const fn madctl(self) -> u8 {
        const MY: u8 = 0x80;
        const MX: u8 = 0x40;
        const MV: u8 = 0x20;
        const BGR: u8 = 0x08;
        match self {
            Self::Portrait => MX | BGR,
            Self::Landscape => MY | MX | MV | BGR,
            Self::PortraitFlip => MY | BGR,
            Self::LandscapeFlip => MV | BGR,
        }
    }
}

/// Width and height in pixels.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct ScreenSize {
    /// Columns
    pub width: u16,
    /// Rows
    pub height: u16,
}

impl ScreenSize {
    /// Create a size.
    pub const fn new(width: u16, height: u16) -> Self {
        Self { width, height }
    }

    /// `true` if (x, y) is an addressable pixel.
    pub const fn contains(self, x: u16, y: u16) -> bool {
        x < self.width && y < self.height
    }

    /// The whole screen as a rectangle.
    pub const fn bounds(self) -> Rect {
        Rect::new(0, 0, self.width, self.height)
    }
}

/// Axis-aligned rectangle: origin plus extent.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Rect {
    /// Left column
    pub x: u16,
    /// Top row
    pub y: u16,
    /// Width in pixels
    pub w: u16,
    /// Height in pixels
    pub h: u16,
}

impl Rect {
    /// Create a rectangle.
    pub const fn new(x: u16, y: u16, w: u16, h: u16) -> Self {
        Self { x, y, w, h }
    }

    /// Pixel count.
    pub fn area(self) -> u32 {
        u32::from(self.w).saturating_mul(u32::from(self.h))
    }

    /// Inclusive right column. Only meaningful for non-empty rectangles.
    pub fn x_end(self) -> u16 {
        self.x.saturating_add(self.w.saturating_sub(1))
    }

    /// Inclusive bottom row. Only meaningful for non-empty rectangles.
    pub fn y_end(self) -> u16 {
        self.y.saturating_add(self.h.saturating_sub(1))
    }

    /// Clip against `size`. See [`clip`].
    pub fn clip(self, size: ScreenSize) -> Option<Self> {
        clip(self, size)
    }
}

/// Bound a rectangle to the screen.
///
/// Returns `None` when nothing is left to draw: the origin is off-screen or
/// the rectangle has zero area. Otherwise the width and height are
/// truncated so the result lies inside `[0, width) × [0, height)`.
/// Clipping a clipped rectangle is a no-op.
pub fn clip(rect: Rect, size: ScreenSize) -> Option<Rect> {
    if rect.x >= size.width || rect.y >= size.height {
        return None;
    }
    if rect.w == 0 || rect.h == 0 {
        return None;
    }
    // x < width, so width - x >= 1 and cannot underflow.
    #[allow(clippy::arithmetic_side_effects)]
    let (room_w, room_h) = (size.width - rect.x, size.height - rect.y);
    Some(Rect {
        w: rect.w.min(room_w),
        h: rect.h.min(room_h),
        ..rect
    })
}

/// Single-pixel variant of [`clip`]: only the origin test applies.
pub fn clip_point(x: u16, y: u16, size: ScreenSize) -> Option<(u16, u16)> {
    size.contains(x, y).then_some((x, y))
}
