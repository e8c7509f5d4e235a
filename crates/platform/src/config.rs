//! Bus and board constants
//!
//! Values shared by every transport implementation. The display core
//! takes its own tunables through `DeviceConfig`; only facts about the
//! wire live here.

/// Largest single transmit the SPI HAL accepts, in bytes.
///
/// Pixel payloads larger than this are split into several transactions.
pub const MAX_TX_BLOCK: usize = 1024;

/// SPI prescaler used while talking to the display controller.
pub const DISPLAY_PRESCALER: u16 = 8;

/// SPI prescaler used while sampling the touch sensor.
pub const TOUCH_PRESCALER: u16 = 128;

/// Display controller reset pulse width, in milliseconds.
pub const RESET_PULSE_MS: u32 = 200;
