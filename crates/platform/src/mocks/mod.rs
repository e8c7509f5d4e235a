//! Mock implementations for testing
//!
//! [`RecordingTransport`] logs every bus call as a [`BusEvent`] and plays
//! back scripted touch-sensor replies. [`ExhaustedScratch`] is a scratch
//! strategy that never has memory available.

#![cfg(any(test, feature = "std"))]

use std::vec::Vec;

use crate::bus::{BusRate, DataMode, Target, Transport};
use crate::gpio::PinState;
use crate::scratch::ScratchAlloc;

/// One recorded transport call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BusEvent {
    /// `select(target)`
    Select(Target),
    /// `release(target)`
    Release(Target),
    /// `set_data_mode(mode)`
    Mode(DataMode),
    /// `write(bytes)`
    Write(Vec<u8>),
    /// `write_read(tx, _)`
    WriteRead(Vec<u8>),
    /// `set_bus_rate(rate)`
    Rate(BusRate),
    /// `set_reset(state)`
    Reset(PinState),
    /// `touch_irq_asserted()`
    IrqRead,
}

/// Error injected by [`RecordingTransport::fail_after`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct InjectedFault;

/// Transport double that records traffic and scripts the touch sensor.
#[derive(Debug, Default)]
pub struct RecordingTransport {
    events: Vec<BusEvent>,
    irq_levels: heapless::Deque<bool, 64>,
    irq_idle: bool,
    replies: heapless::Deque<u16, 128>,
    writes_left: Option<usize>,
}

impl RecordingTransport {
    /// Create an empty transport with the touch panel released.
    pub fn new() -> Self {
        Self::default()
    }

    /// Every recorded call, oldest first.
    pub fn events(&self) -> &[BusEvent] {
        &self.events
    }

    /// Forget everything recorded so far.
    pub fn clear(&mut self) {
        self.events.clear();
    }

    /// Payloads of every `write`, in order.
    pub fn writes(&self) -> impl Iterator<Item = &[u8]> {
        self.events.iter().filter_map(|e| match e {
            BusEvent::Write(bytes) => Some(bytes.as_slice()),
            _ => None,
        })
    }

    /// Queue the next IRQ level reads (`true` = pressed).
    pub fn script_irq(&mut self, levels: &[bool]) {
        for &level in levels {
            let _ = self.irq_levels.push_back(level);
        }
    }

    /// IRQ level reported once the scripted levels run out.
    pub fn set_irq_idle(&mut self, pressed: bool) {
        self.irq_idle = pressed;
    }

    /// Queue raw sensor words returned by successive `write_read` calls.
    pub fn script_samples(&mut self, words: &[u16]) {
        for &word in words {
            let _ = self.replies.push_back(word);
        }
    }

    /// Let `n` more writes succeed, then fail every write after that.
    pub fn fail_after(&mut self, n: usize) {
        self.writes_left = Some(n);
    }
}

impl Transport for RecordingTransport {
    type Error = InjectedFault;

    fn select(&mut self, target: Target) -> Result<(), Self::Error> {
        self.events.push(BusEvent::Select(target));
        Ok(())
    }

    fn release(&mut self, target: Target) -> Result<(), Self::Error> {
        self.events.push(BusEvent::Release(target));
        Ok(())
    }

    fn set_data_mode(&mut self, mode: DataMode) -> Result<(), Self::Error> {
        self.events.push(BusEvent::Mode(mode));
        Ok(())
    }

    fn write(&mut self, bytes: &[u8]) -> Result<(), Self::Error> {
        if let Some(left) = self.writes_left.as_mut() {
            if *left == 0 {
                return Err(InjectedFault);
            }
            *left = left.saturating_sub(1);
        }
        self.events.push(BusEvent::Write(bytes.to_vec()));
        Ok(())
    }

    fn write_read(&mut self, tx: &[u8], rx: &mut [u8]) -> Result<(), Self::Error> {
        self.events.push(BusEvent::WriteRead(tx.to_vec()));
        let word = self.replies.pop_front().unwrap_or(0);
        for (slot, byte) in rx.iter_mut().zip(word.to_be_bytes()) {
            *slot = byte;
        }
        Ok(())
    }

    fn set_bus_rate(&mut self, rate: BusRate) -> Result<(), Self::Error> {
        self.events.push(BusEvent::Rate(rate));
        Ok(())
    }

    fn touch_irq_asserted(&mut self) -> Result<bool, Self::Error> {
        self.events.push(BusEvent::IrqRead);
        Ok(self.irq_levels.pop_front().unwrap_or(self.irq_idle))
    }

    fn set_reset(&mut self, state: PinState) -> Result<(), Self::Error> {
        self.events.push(BusEvent::Reset(state));
        Ok(())
    }
}

/// Scratch strategy with no memory: every request fails.
#[derive(Debug, Default, Clone, Copy)]
pub struct ExhaustedScratch;

impl ScratchAlloc for ExhaustedScratch {
    fn with_scratch<R>(&mut self, _len: usize, _f: impl FnOnce(&mut [u8]) -> R) -> Option<R> {
        None
    }
}
