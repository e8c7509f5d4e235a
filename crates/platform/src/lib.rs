//! Board-facing seams for the ILI9341 display + touch stack
//!
//! This crate owns everything the display core consumes from the outside
//! world, so the core itself stays free of pin types and HAL generics.
//!
//! # Architecture Layers
//!
//! ```text
//! Application / firmware
//!         ↓
//! ili9341 (drawing, touch sampling, calibration)
//!         ↓
//! Platform seams (this crate: Transport, ScratchAlloc)
//!         ↓
//! embedded-hal 1.0 SPI bus + GPIO
//! ```
//!
//! # Modules
//!
//! - [`bus`] - the [`Transport`] trait, targets, bus rates
//! - [`spi`] - [`SpiTransport`], a `Transport` over `embedded-hal` parts
//! - [`scratch`] - pooled and heap scratch-buffer strategies
//! - [`gpio`] - pin levels
//! - [`config`] - wire-level constants
//! - `mocks` - recording doubles (test / `std` only)
//!
//! # Features
//!
//! - `std`: Enable standard library support and the mocks
//! - `alloc`: Enable [`HeapScratch`](scratch::HeapScratch)
//! - `defmt`: Enable defmt logging derives

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
#![deny(unsafe_op_in_unsafe_fn)] // unsafe fn body is not implicitly unsafe block
#![warn(clippy::print_stdout)] // prefer tracing/defmt over println! in lib code
#![allow(clippy::doc_markdown)] // register and pin names in doc comments
#![allow(clippy::must_use_candidate)] // hardware accessors: callers decide
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::missing_errors_doc)]

#[cfg(feature = "alloc")]
extern crate alloc;

pub mod bus;
pub mod config;
pub mod gpio;
pub mod scratch;
pub mod spi;

#[cfg(any(test, feature = "std"))]
pub mod mocks;

pub use bus::{BusClock, BusRate, DataMode, FixedClock, Target, Transport};
pub use gpio::PinState;
pub use scratch::{PooledScratch, ScratchAlloc};
pub use spi::{SpiTransport, SpiTransportError};

#[cfg(feature = "alloc")]
pub use scratch::HeapScratch;
