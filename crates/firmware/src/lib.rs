//! Board integration for the ILI9341 + XPT2046 stack
//!
//! Host-runnable glue around the `ili9341` core:
//!
//! ```text
//! Application task (scene)
//!         ↓
//! SharedDisplay (one lock) ◄── TouchIrqLatch (IRQ handler)
//!         ↓
//! ili9341::Device
//!         ↓
//! platform::Transport ── SpiTransport on hardware
//!                     └─ PanelEmulator on the host
//! ```
//!
//! # Modules
//!
//! - [`emulator`] - protocol-level panel emulator implementing `Transport`
//! - [`shared`] - the display lock and the deferred touch-interrupt latch
//! - [`scene`] - the power-on demo routine

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![deny(clippy::await_holding_lock)] // holding a blocking Mutex across .await is a bug
#![deny(unsafe_op_in_unsafe_fn)]
#![warn(clippy::print_stdout)] // prefer tracing over println! in lib code
#![warn(clippy::dbg_macro)] // dbg! should not be left in committed code
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::missing_errors_doc)]
#![allow(clippy::must_use_candidate)]
#![allow(clippy::doc_markdown)]

pub mod emulator;
pub mod scene;
pub mod shared;

pub use emulator::{BusStats, EmulatorError, PanelEmulator};
pub use shared::{SharedDisplay, SharedError, TouchIrqLatch};
