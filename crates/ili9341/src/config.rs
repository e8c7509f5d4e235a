//! Device configuration
//!
//! [`DeviceConfig`] is everything `Device::new` needs besides the bus and
//! the scratch strategy. It is validated once, at construction.

use crate::display::Orientation;
use crate::error::ConfigError;
use crate::touch::Calibration;

/// Controller native width (portrait), in pixels.
pub const NATIVE_WIDTH: u16 = 240;

/// Controller native height (portrait), in pixels.
pub const NATIVE_HEIGHT: u16 = 320;

/// RGB565: two bytes per pixel.
pub const BYTES_PER_PIXEL: usize = 2;

/// Default transfer block, the SPI HAL's single-transmit limit.
pub const DEFAULT_MAX_BLOCK: usize = platform::config::MAX_TX_BLOCK;

/// Samples averaged per reading in [`Sampling::Averaged`] mode.
pub const AVERAGED_SAMPLES: u16 = 16;

/// Touch sampling mode.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Sampling {
    /// One raw read per reading.
    Single,
    /// Mean of [`AVERAGED_SAMPLES`] consecutive reads.
    #[default]
    Averaged,
}

impl Sampling {
    /// Raw reads required for a valid reading.
    pub const fn sample_count(self) -> u16 {
        match self {
            Self::Single => 1,
            Self::Averaged => AVERAGED_SAMPLES,
        }
    }
}

/// Touch panel settings.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct TouchConfig {
    /// Raw sensor range that maps onto the screen edges.
    pub calibration: Calibration,
    /// Sampling mode.
    pub sampling: Sampling,
}

impl TouchConfig {
    /// Averaged sampling with the given calibration.
    pub const fn new(calibration: Calibration) -> Self {
        Self {
            calibration,
            sampling: Sampling::Averaged,
        }
    }

    /// Override the sampling mode.
    #[must_use]
    pub const fn with_sampling(mut self, sampling: Sampling) -> Self {
        self.sampling = sampling;
        self
    }
}

/// Construction parameters for a [`Device`](crate::Device).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct DeviceConfig {
    /// Panel rotation.
    pub orientation: Orientation,
    /// Largest single pixel transaction, in bytes. Even, at least 2.
    pub max_block: usize,
    /// Touch panel, if fitted.
    pub touch: Option<TouchConfig>,
}

impl Default for DeviceConfig {
    fn default() -> Self {
        Self::new(Orientation::Portrait)
    }
}

impl DeviceConfig {
    /// Display only, default block size.
    pub const fn new(orientation: Orientation) -> Self {
        Self {
            orientation,
            max_block: DEFAULT_MAX_BLOCK,
            touch: None,
        }
    }

    /// Enable the touch panel.
    #[must_use]
    pub const fn with_touch(mut self, touch: TouchConfig) -> Self {
        self.touch = Some(touch);
        self
    }

    /// Override the transfer block size.
    #[must_use]
    pub const fn with_max_block(mut self, max_block: usize) -> Self {
        self.max_block = max_block;
        self
    }

    /// Check every invariant `Device::new` relies on.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.max_block < BYTES_PER_PIXEL || self.max_block % BYTES_PER_PIXEL != 0 {
            return Err(ConfigError::InvalidBlockSize);
        }
        if let Some(touch) = &self.touch {
            touch.calibration.validate()?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::Axis;

    const CAL: Calibration = Calibration::new(300, 200, 3800, 3700);

    #[test]
    fn default_is_portrait_display_only() {
        let cfg = DeviceConfig::default();
        assert_eq!(cfg.orientation, Orientation::Portrait);
        assert_eq!(cfg.max_block, 1024);
        assert!(cfg.touch.is_none());
        assert_eq!(cfg.validate(), Ok(()));
    }

    #[test]
    fn odd_or_tiny_block_is_rejected() {
        for bad in [0, 1, 3, 1023] {
            assert_eq!(
                DeviceConfig::default().with_max_block(bad).validate(),
                Err(ConfigError::InvalidBlockSize),
                "max_block = {bad}"
            );
        }
        assert_eq!(DeviceConfig::default().with_max_block(2).validate(), Ok(()));
    }

    #[test]
    fn touch_requires_ordered_calibration() {
        let ok = DeviceConfig::default().with_touch(TouchConfig::new(CAL));
        assert_eq!(ok.validate(), Ok(()));

        let flat_x = Calibration::new(500, 200, 500, 3700);
        let bad = DeviceConfig::default().with_touch(TouchConfig::new(flat_x));
        assert_eq!(
            bad.validate(),
            Err(ConfigError::InvalidCalibration { axis: Axis::X })
        );

        let inverted_y = Calibration::new(300, 3700, 3800, 200);
        let bad = DeviceConfig::default().with_touch(TouchConfig::new(inverted_y));
        assert_eq!(
            bad.validate(),
            Err(ConfigError::InvalidCalibration { axis: Axis::Y })
        );
    }

    #[test]
    fn sampling_counts() {
        assert_eq!(Sampling::Single.sample_count(), 1);
        assert_eq!(Sampling::Averaged.sample_count(), 16);
    }
}
