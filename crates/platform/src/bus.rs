//! Shared serial bus seam
//!
//! One SPI bus carries two devices: the TFT controller and the resistive
//! touch sensor. Each has its own chip-select line. The controller also
//! needs a data/command line and a reset line, and the touch sensor
//! raises an active-low interrupt line while the panel is pressed.
//!
//! [`Transport`] is the only surface the display core talks to. It is
//! blocking: every call returns once the bytes are on the wire.

use crate::gpio::PinState;

/// Device addressed by the next bus transaction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Target {
    /// TFT display controller
    Display,
    /// Resistive touch sensor
    Touch,
}

/// Level of the display controller's data/command line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum DataMode {
    /// DC low: the next byte is a command opcode.
    Command,
    /// DC high: the following bytes are parameters or pixel data.
    Data,
}

impl DataMode {
    /// Pin level driving the DC line for this mode.
    pub const fn pin_state(self) -> PinState {
        match self {
            Self::Command => PinState::Low,
            Self::Data => PinState::High,
        }
    }
}

/// Bus clock tier.
///
/// The touch sensor tolerates a much lower clock than the display, so the
/// bus is slowed down for the duration of a touch sample and restored
/// afterwards.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum BusRate {
    /// Full display speed (kernel clock / 8).
    Display,
    /// Touch sampling speed (kernel clock / 128).
    Touch,
}

impl BusRate {
    /// Baud-rate prescaler applied to the SPI kernel clock.
    pub const fn prescaler(self) -> u16 {
        match self {
            Self::Display => crate::config::DISPLAY_PRESCALER,
            Self::Touch => crate::config::TOUCH_PRESCALER,
        }
    }
}

/// Blocking transport for the shared display/touch bus.
///
/// Implementations must not buffer: a successful return means the
/// transaction completed. Chip-select bookkeeping belongs to the caller;
/// the transport only toggles the lines it is told to.
pub trait Transport {
    /// Transport-specific error. The display core logs it and reports a
    /// generic bus failure.
    type Error: core::fmt::Debug;

    /// Assert the chip-select line of `target`.
    fn select(&mut self, target: Target) -> Result<(), Self::Error>;

    /// De-assert the chip-select line of `target`.
    fn release(&mut self, target: Target) -> Result<(), Self::Error>;

    /// Drive the display data/command line.
    fn set_data_mode(&mut self, mode: DataMode) -> Result<(), Self::Error>;

    /// Transmit `bytes` to the currently selected device.
    fn write(&mut self, bytes: &[u8]) -> Result<(), Self::Error>;

    /// Full-duplex transfer: clock out `tx` while filling `rx`.
    ///
    /// `tx` and `rx` have the same length.
    fn write_read(&mut self, tx: &[u8], rx: &mut [u8]) -> Result<(), Self::Error>;

    /// Switch the bus clock tier.
    fn set_bus_rate(&mut self, rate: BusRate) -> Result<(), Self::Error>;

    /// `true` while the touch interrupt line is asserted (pulled low).
    fn touch_irq_asserted(&mut self) -> Result<bool, Self::Error>;

    /// Drive the display controller's reset line.
    fn set_reset(&mut self, state: PinState) -> Result<(), Self::Error>;
}

/// Clock control for an SPI peripheral that supports runtime rate changes.
///
/// `embedded-hal` has no notion of changing the bus clock, so
/// [`SpiTransport`](crate::spi::SpiTransport) takes this as a separate
/// capability. Boards that run both devices at one speed use [`FixedClock`].
pub trait BusClock {
    /// Error type
    type Error: core::fmt::Debug;

    /// Reprogram the peripheral clock for `rate`.
    fn set_rate(&mut self, rate: BusRate) -> Result<(), Self::Error>;
}

/// A bus clock that ignores rate changes.
#[derive(Debug, Default, Clone, Copy)]
pub struct FixedClock;

impl BusClock for FixedClock {
    type Error = core::convert::Infallible;

    fn set_rate(&mut self, _rate: BusRate) -> Result<(), Self::Error> {
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn data_mode_maps_to_dc_level() {
        assert_eq!(DataMode::Command.pin_state(), PinState::Low);
        assert_eq!(DataMode::Data.pin_state(), PinState::High);
    }

    #[test]
    fn touch_rate_is_slower_than_display_rate() {
        assert!(BusRate::Touch.prescaler() > BusRate::Display.prescaler());
        assert_eq!(BusRate::Display.prescaler(), 8);
        assert_eq!(BusRate::Touch.prescaler(), 128);
    }

    #[test]
    fn fixed_clock_accepts_every_rate() {
        let mut clock = FixedClock;
        assert!(clock.set_rate(BusRate::Touch).is_ok());
        assert!(clock.set_rate(BusRate::Display).is_ok());
    }
}
