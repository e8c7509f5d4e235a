//! ILI9341 TFT display + XPT2046 resistive touch driver
//!
//! Both chips share one SPI bus with separate chip-selects. The display
//! runs at a fast bus rate, the touch sensor at a slow one; the driver
//! switches rates around every touch sampling pass.
//!
//! # Architecture
//!
//! ```text
//! Device<T: Transport, S: ScratchAlloc>
//!   ├── display  (clip → raster/text → chunked transfer → CASET/PASET/RAMWR)
//!   └── touch    (sample → calibrate → press tracker → callbacks)
//! ```
//!
//! The bus and the scratch-buffer strategy come from the `platform` crate.
//! A device is not internally synchronised; share it behind one lock.
//!
//! # Example
//!
//! ```no_run
//! # use ili9341::{Color565, Device, DeviceConfig, Orientation};
//! # fn demo<T: platform::Transport, D: embedded_hal::delay::DelayNs>(
//! #     transport: T, delay: D,
//! # ) -> Result<(), ili9341::DriverError> {
//! let mut pool = [0u8; 1024];
//! let scratch = platform::PooledScratch::new(&mut pool);
//! let mut tft = Device::new(transport, scratch, delay, DeviceConfig::new(Orientation::Landscape))?;
//! tft.fill_rect(10, 10, 100, 50, Color565::BLUE)?;
//! tft.draw_circle(160, 120, 40, Color565::YELLOW)?;
//! # Ok(())
//! # }
//! ```
//!
//! # Features
//!
//! - `defmt`: defmt derives and log output (hardware)
//! - `tracing`: route log output to `tracing` (host)
//! - `std` / `alloc`: forwarded to `platform`

// ── Lint policy ─────────────────────────────────────────────────────────────
#![deny(clippy::unwrap_used)] // no .unwrap() in production code
#![deny(clippy::expect_used)] // no .expect() in production code
#![deny(clippy::panic)] // no panic!() in production code
#![deny(clippy::unreachable)] // no unreachable!() that isn't documented
#![deny(unused_must_use)]
// all Results must be handled
// ────────────────────────────────────────────────────────────────────────────
#![cfg_attr(all(not(test), not(feature = "std")), no_std)]
#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![deny(unsafe_op_in_unsafe_fn)]
#![warn(clippy::print_stdout)] // prefer tracing/defmt over println! in lib code
#![allow(clippy::doc_markdown)] // register names in doc comments
#![allow(clippy::must_use_candidate)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::missing_errors_doc)]
#![allow(clippy::many_single_char_names)] // x, y, w, h, r

#[macro_use]
mod fmt;

pub mod config;
mod device;
pub mod display;
pub mod error;
pub mod touch;

pub use config::{DeviceConfig, Sampling, TouchConfig};
pub use device::Device;
pub use display::{Color565, Font, Orientation, Rect, ScreenSize, TextStyle, TextWrap};
pub use error::{Axis, ConfigError, DriverError};
pub use touch::{Calibration, PressState, RawSample, TouchCallback, TouchEdge, TouchPoint};
