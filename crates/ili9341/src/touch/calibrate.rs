//! Raw-to-screen touch calibration

use crate::display::Orientation;
use crate::error::{Axis, ConfigError};

/// Averaged raw reading straight from the sensor ADC.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct RawSample {
    /// X channel
    pub x: u16,
    /// Y channel
    pub y: u16,
}

/// Calibrated touch position in screen pixels.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct TouchPoint {
    /// Column
    pub x: u16,
    /// Row
    pub y: u16,
}

impl TouchPoint {
    /// Create a point.
    pub const fn new(x: u16, y: u16) -> Self {
        Self { x, y }
    }
}

/// Raw sensor range corresponding to the physical screen edges.
///
/// Set once at construction and never changed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Calibration {
    /// Raw X at one edge.
    pub min_x: u16,
    /// Raw Y at one edge.
    pub min_y: u16,
    /// Raw X at the opposite edge.
    pub max_x: u16,
    /// Raw Y at the opposite edge.
    pub max_y: u16,
}

impl Calibration {
    /// Bounds in the same order the panel's calibration sheet lists them.
    pub const fn new(min_x: u16, min_y: u16, max_x: u16, max_y: u16) -> Self {
        Self {
            min_x,
            min_y,
            max_x,
            max_y,
        }
    }

    /// Both ranges must be non-empty.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.min_x >= self.max_x {
            return Err(ConfigError::InvalidCalibration { axis: Axis::X });
        }
        if self.min_y >= self.max_y {
            return Err(ConfigError::InvalidCalibration { axis: Axis::Y });
        }
        Ok(())
    }

    /// Saturate each axis into `[min, max]`.
    pub fn clamp(&self, raw: RawSample) -> RawSample {
        RawSample {
            x: raw.x.max(self.min_x).min(self.max_x),
            y: raw.y.max(self.min_y).min(self.max_y),
        }
    }

    /// Map a raw reading to screen pixels.
    ///
    /// Both axes are inverted: raw minimum lands on the far edge, raw
    /// maximum on zero. In landscape the raw X channel spans the panel's
    /// long side, so it is scaled against the screen height and raw Y
    /// against the width.
    pub fn to_screen(&self, raw: RawSample, orientation: Orientation) -> TouchPoint {
        let raw = self.clamp(raw);
        let size = orientation.screen_size();
        let (x_span, y_span) = if orientation.is_portrait() {
            (size.width, size.height)
        } else {
            (size.height, size.width)
        };
        let x = interpolate(
            i32::from(raw.x),
            i32::from(self.min_x),
            i32::from(self.max_x),
            i32::from(x_span),
            0,
        );
        let y = interpolate(
            i32::from(raw.y),
            i32::from(self.min_y),
            i32::from(self.max_y),
            i32::from(y_span),
            0,
        );
        TouchPoint {
            x: saturate_u16(x),
            y: saturate_u16(y),
        }
    }
}

/// Linear map of `v` from `[x0, x1]` onto `[y0, y1]`, truncating.
///
/// Returns 0 when the domain is empty (`x0 == x1`).
pub fn interpolate(v: i32, x0: i32, x1: i32, y0: i32, y1: i32) -> i32 {
    if x1 == x0 {
        return 0;
    }
    let num = (i64::from(v) - i64::from(x0)).saturating_mul(i64::from(y1) - i64::from(y0));
    let den = i64::from(x1) - i64::from(x0);
    let out = num.saturating_div(den).saturating_add(i64::from(y0));
    i32::try_from(out).unwrap_or(if out < 0 { i32::MIN } else { i32::MAX })
}

fn saturate_u16(v: i32) -> u16 {
    u16::try_from(v.max(0)).unwrap_or(u16::MAX)
}
