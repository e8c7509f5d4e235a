//! `embedded-hal` 1.0 backed [`Transport`]
//!
//! Wraps a raw [`SpiBus`] plus the discrete control lines. Chip-select is
//! driven by hand rather than through `SpiDevice`, because the display
//! driver keeps the controller selected across several writes (window
//! address, then the pixel payload) and toggles DC in between.
//!
//! # Wiring (STM32F4 example)
//!
//! | Signal    | Pin  | Direction |
//! |-----------|------|-----------|
//! | SCK       | PA5  | Host → both |
//! | MOSI      | PA7  | Host → both |
//! | MISO      | PA6  | Touch → Host |
//! | TFT CS    | PB6  | Host → Display |
//! | TFT DC    | PC7  | Host → Display |
//! | TFT RST   | PA9  | Host → Display |
//! | TOUCH CS  | PB5  | Host → Touch |
//! | TOUCH IRQ | PB4  | Touch → Host (active low) |

use embedded_hal::digital::{InputPin, OutputPin};
use embedded_hal::spi::{Error as _, ErrorKind, SpiBus};

use crate::bus::{BusClock, BusRate, DataMode, Target, Transport};
use crate::gpio::PinState;

/// Errors surfaced by [`SpiTransport`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum SpiTransportError {
    /// The SPI peripheral reported a fault.
    #[error("SPI bus fault: {0:?}")]
    Spi(ErrorKind),
    /// A chip-select, DC, reset or IRQ pin could not be driven or read.
    #[error("GPIO fault")]
    Pin,
    /// The bus clock could not be reprogrammed.
    #[error("bus clock fault")]
    Clock,
}

/// Shared SPI bus with a display controller and a touch sensor.
pub struct SpiTransport<SPI, TFT, TOUCH, DC, RST, IRQ, CLK> {
    spi: SPI,
    tft_cs: TFT,
    touch_cs: TOUCH,
    dc: DC,
    rst: RST,
    irq: IRQ,
    clock: CLK,
}

impl<SPI, TFT, TOUCH, DC, RST, IRQ, CLK> SpiTransport<SPI, TFT, TOUCH, DC, RST, IRQ, CLK>
where
    SPI: SpiBus<u8>,
    TFT: OutputPin,
    TOUCH: OutputPin,
    DC: OutputPin,
    RST: OutputPin,
    IRQ: InputPin,
    CLK: BusClock,
{
    /// Bundle the bus and its control lines.
    ///
    /// No pin is touched here; the display driver releases both targets as
    /// the first step of its power-on sequence.
    pub fn new(spi: SPI, tft_cs: TFT, touch_cs: TOUCH, dc: DC, rst: RST, irq: IRQ, clock: CLK) -> Self {
        Self {
            spi,
            tft_cs,
            touch_cs,
            dc,
            rst,
            irq,
            clock,
        }
    }

    /// Give the peripherals back.
    pub fn release_parts(self) -> (SPI, TFT, TOUCH, DC, RST, IRQ, CLK) {
        (
            self.spi,
            self.tft_cs,
            self.touch_cs,
            self.dc,
            self.rst,
            self.irq,
            self.clock,
        )
    }

    fn chip_select(&mut self, target: Target, state: PinState) -> Result<(), SpiTransportError> {
        let state = state.into();
        match target {
            Target::Display => self.tft_cs.set_state(state).map_err(|_| SpiTransportError::Pin),
            Target::Touch => self.touch_cs.set_state(state).map_err(|_| SpiTransportError::Pin),
        }
    }
}

impl<SPI, TFT, TOUCH, DC, RST, IRQ, CLK> Transport for SpiTransport<SPI, TFT, TOUCH, DC, RST, IRQ, CLK>
where
    SPI: SpiBus<u8>,
    TFT: OutputPin,
    TOUCH: OutputPin,
    DC: OutputPin,
    RST: OutputPin,
    IRQ: InputPin,
    CLK: BusClock,
{
    type Error = SpiTransportError;

    fn select(&mut self, target: Target) -> Result<(), Self::Error> {
        self.chip_select(target, PinState::Low)
    }

    fn release(&mut self, target: Target) -> Result<(), Self::Error> {
        self.chip_select(target, PinState::High)
    }

    fn set_data_mode(&mut self, mode: DataMode) -> Result<(), Self::Error> {
        self.dc
            .set_state(mode.pin_state().into())
            .map_err(|_| SpiTransportError::Pin)
    }

    fn write(&mut self, bytes: &[u8]) -> Result<(), Self::Error> {
        self.spi
            .write(bytes)
            .and_then(|()| self.spi.flush())
            .map_err(|e| SpiTransportError::Spi(e.kind()))
    }

    fn write_read(&mut self, tx: &[u8], rx: &mut [u8]) -> Result<(), Self::Error> {
        self.spi
            .transfer(rx, tx)
            .and_then(|()| self.spi.flush())
            .map_err(|e| SpiTransportError::Spi(e.kind()))
    }

    fn set_bus_rate(&mut self, rate: BusRate) -> Result<(), Self::Error> {
        self.clock
            .set_rate(rate)
            .map_err(|_| SpiTransportError::Clock)
    }

    fn touch_irq_asserted(&mut self) -> Result<bool, Self::Error> {
        self.irq.is_low().map_err(|_| SpiTransportError::Pin)
    }

    fn set_reset(&mut self, state: PinState) -> Result<(), Self::Error> {
        self.rst
            .set_state(state.into())
            .map_err(|_| SpiTransportError::Pin)
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
