//! Display sharing and deferred touch handling
//!
//! The display and the touch sensor share one bus, and a device is not
//! internally synchronised. Every caller therefore goes through one
//! [`SharedDisplay`] lock, and touch sampling happens in task context while
//! that lock is held, never in the interrupt handler itself.
//!
//! ```text
//!   EXTI (touch IRQ falling edge)       task context
//!   ─────────────────────────────       ─────────────────────────────────
//!   TouchIrqLatch::signal()  ──────►    SharedDisplay::service_touch(&latch)
//!                                         └─ lock ─► Device::touch_interrupt()
//! ```
//!
//! `CriticalSectionRawMutex` is the right choice on hardware, where the
//! latch is signalled from an interrupt. Host tests may use either raw
//! mutex.

use core::cell::RefCell;

use embassy_sync::blocking_mutex::raw::RawMutex;
use embassy_sync::blocking_mutex::Mutex;
use embassy_sync::signal::Signal;
use ili9341::{Device, DriverError, TouchEdge};
use platform::Transport;

/// Failure to run an operation on the shared display.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum SharedError {
    /// The lock was re-entered from inside a locked section.
    #[error("display lock re-entered")]
    Reentrant,
    /// The operation itself failed.
    #[error(transparent)]
    Driver(#[from] DriverError),
}

/// Latched touch interrupt.
///
/// Signalling is safe from interrupt context and does no bus I/O. Repeated
/// edges before the next drain collapse into one.
pub struct TouchIrqLatch<M: RawMutex> {
    signal: Signal<M, ()>,
}

impl<M: RawMutex> TouchIrqLatch<M> {
    /// Create an idle latch. Usable in a `static`.
    pub const fn new() -> Self {
        Self {
            signal: Signal::new(),
        }
    }

    /// Record an edge. Call from the IRQ handler.
    pub fn signal(&self) {
        self.signal.signal(());
    }

    /// `true` if an edge is waiting to be handled.
    pub fn is_pending(&self) -> bool {
        self.signal.signaled()
    }

    /// Consume the pending edge, if any.
    pub fn take(&self) -> bool {
        self.signal.try_take().is_some()
    }
}

impl<M: RawMutex> Default for TouchIrqLatch<M> {
    fn default() -> Self {
        Self::new()
    }
}

/// A device behind a single blocking lock.
pub struct SharedDisplay<M: RawMutex, T, S> {
    device: Mutex<M, RefCell<Device<T, S>>>,
}

impl<M, T, S> SharedDisplay<M, T, S>
where
    M: RawMutex,
    T: Transport,
{
    /// Take ownership of a constructed device.
    pub const fn new(device: Device<T, S>) -> Self {
        Self {
            device: Mutex::new(RefCell::new(device)),
        }
    }

    /// Run `f` with exclusive access to the device.
    ///
    /// Calling `lock` again from inside `f` fails with
    /// [`SharedError::Reentrant`] instead of deadlocking.
    pub fn lock<R>(&self, f: impl FnOnce(&mut Device<T, S>) -> R) -> Result<R, SharedError> {
        self.device.lock(|cell| {
            let mut device = cell.try_borrow_mut().map_err(|_| SharedError::Reentrant)?;
            Ok(f(&mut device))
        })
    }

    /// Drain `latch` and, if an edge was pending, run one touch interrupt
    /// pass under the lock.
    pub fn service_touch<L: RawMutex>(
        &self,
        latch: &TouchIrqLatch<L>,
    ) -> Result<Option<TouchEdge>, SharedError> {
        if !latch.take() {
            return Ok(None);
        }
        let edge = self.lock(Device::touch_interrupt)??;
        if let Some(edge) = edge {
            tracing::debug!(?edge, "touch edge serviced");
        }
        Ok(edge)
    }

    /// Release the device.
    pub fn into_inner(self) -> Device<T, S> {
        self.device.into_inner().into_inner()
    }
}
