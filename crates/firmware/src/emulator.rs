//! Protocol-level ILI9341 + XPT2046 panel emulator
//!
//! Implements [`Transport`] by decoding what the driver puts on the bus,
//! the way the real controller would: opcodes on DC low, parameters and
//! pixel data on DC high, CASET/PASET defining the write window and RAMWR
//! streaming big-endian RGB565 into it. The touch side answers the Y/X
//! conversion commands with whatever raw reading the test scripted.
//!
//! It also polices the bus: talking to a device that is not selected,
//! selecting both devices at once, or addressing a device at the other
//! device's clock rate is an error.

// Coordinates are bounded by the 320×240 panel and counters by test length.
#![allow(clippy::arithmetic_side_effects)]

use embedded_graphics::pixelcolor::Rgb565;
use embedded_graphics::prelude::*;
use ili9341::config::{NATIVE_HEIGHT, NATIVE_WIDTH};
use ili9341::display::Command;
use ili9341::touch::{POWER_DOWN, READ_X, READ_Y};
use ili9341::{Color565, RawSample, ScreenSize};
use platform::{BusRate, DataMode, PinState, Target, Transport};

/// MADCTL row/column exchange bit.
const MADCTL_MV: u8 = 0x20;

/// Bus protocol violations caught by the emulator.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum EmulatorError {
    /// A device was selected while the other one still was.
    #[error("{requested:?} selected while {held:?} still selected")]
    BusContention {
        /// Already selected
        held: Target,
        /// Newly requested
        requested: Target,
    },
    /// Bytes were clocked with no device selected.
    #[error("bus traffic with no device selected")]
    NotSelected,
    /// A device was addressed at the other device's clock rate.
    #[error("{target:?} addressed at {rate:?} rate")]
    WrongRate {
        /// Device addressed
        target: Target,
        /// Rate in effect
        rate: BusRate,
    },
}

/// Traffic counters.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct BusStats {
    /// Chip-select brackets opened on the display.
    pub display_transactions: usize,
    /// Chip-select brackets opened on the touch sensor.
    pub touch_transactions: usize,
    /// Bytes written while RAMWR was active.
    pub pixel_bytes: usize,
    /// Largest single pixel-data write.
    pub largest_pixel_write: usize,
    /// Conversions answered by the touch sensor.
    pub conversions: usize,
}

/// Emulated panel with a full RGB565 framebuffer.
#[derive(Debug)]
pub struct PanelEmulator {
    framebuffer: Vec<u16>,
    size: ScreenSize,
    selected: Option<Target>,
    mode: DataMode,
    rate: BusRate,
    command: Option<u8>,
    params: heapless::Vec<u8, 4>,
    window: (u16, u16, u16, u16),
    cursor: (u16, u16),
    high_byte: Option<u8>,
    madctl: u8,
    awake: bool,
    display_on: bool,
    in_reset: bool,
    touch: Option<RawSample>,
    channel: Option<u8>,
    stats: BusStats,
}

impl Default for PanelEmulator {
    fn default() -> Self {
        Self::new()
    }
}

impl PanelEmulator {
    /// Powered-off panel: black framebuffer, native portrait addressing.
    pub fn new() -> Self {
        let pixels = usize::from(NATIVE_WIDTH) * usize::from(NATIVE_HEIGHT);
        Self {
            framebuffer: vec![0; pixels],
            size: ScreenSize::new(NATIVE_WIDTH, NATIVE_HEIGHT),
            selected: None,
            mode: DataMode::Data,
            rate: BusRate::Display,
            command: None,
            params: heapless::Vec::new(),
            window: (0, NATIVE_WIDTH - 1, 0, NATIVE_HEIGHT - 1),
            cursor: (0, 0),
            high_byte: None,
            madctl: 0,
            awake: false,
            display_on: false,
            in_reset: false,
            touch: None,
            channel: None,
            stats: BusStats::default(),
        }
    }

    // -----------------------------------------------------------------------
    // Inspection
    // -----------------------------------------------------------------------

    /// Addressable size implied by the last MADCTL write.
    pub fn screen_size(&self) -> ScreenSize {
        self.size
    }

    /// Pixel at (`x`, `y`), or `None` off-screen.
    pub fn pixel(&self, x: u16, y: u16) -> Option<Color565> {
        self.index(x, y)
            .and_then(|i| self.framebuffer.get(i))
            .map(|raw| Color565(*raw))
    }

    /// Number of pixels currently holding `color`.
    pub fn count(&self, color: Color565) -> usize {
        self.framebuffer.iter().filter(|raw| **raw == color.0).count()
    }

    /// Coordinates of every pixel holding `color`, row-major.
    pub fn pixels_of(&self, color: Color565) -> Vec<(u16, u16)> {
        let width = self.size.width;
        (0..self.size.height)
            .flat_map(|y| (0..width).map(move |x| (x, y)))
            .filter(|&(x, y)| self.pixel(x, y) == Some(color))
            .collect()
    }

    /// Framebuffer contents as `embedded-graphics` pixels, row-major.
    pub fn pixels(&self) -> impl Iterator<Item = Pixel<Rgb565>> + '_ {
        let width = self.size.width;
        (0..self.size.height).flat_map(move |y| {
            (0..width).filter_map(move |x| {
                self.pixel(x, y)
                    .map(|c| Pixel(Point::new(i32::from(x), i32::from(y)), c.into()))
            })
        })
    }

    /// Last MADCTL value received.
    pub fn madctl(&self) -> u8 {
        self.madctl
    }

    /// `true` once SLPOUT and DISPON have both been received since reset.
    pub fn is_displaying(&self) -> bool {
        self.awake && self.display_on
    }

    /// Current bus clock.
    pub fn rate(&self) -> BusRate {
        self.rate
    }

    /// Currently selected device.
    pub fn selected(&self) -> Option<Target> {
        self.selected
    }

    /// Traffic counters since construction.
    pub fn stats(&self) -> BusStats {
        self.stats
    }

    // -----------------------------------------------------------------------
    // Touch scripting
    // -----------------------------------------------------------------------

    /// Hold the panel pressed at the given raw ADC reading.
    pub fn press(&mut self, raw: RawSample) {
        tracing::debug!(x = raw.x, y = raw.y, "emulator: press");
        self.touch = Some(raw);
    }

    /// Lift the finger.
    pub fn lift(&mut self) {
        tracing::debug!("emulator: lift");
        self.touch = None;
    }

    // -----------------------------------------------------------------------
    // Controller model
    // -----------------------------------------------------------------------

    fn index(&self, x: u16, y: u16) -> Option<usize> {
        self.size
            .contains(x, y)
            .then(|| usize::from(y) * usize::from(self.size.width) + usize::from(x))
    }

    fn begin_command(&mut self, opcode: u8) {
        self.command = Some(opcode);
        self.params.clear();
        self.high_byte = None;
        match opcode {
            op if op == Command::SoftwareReset as u8 => {
                tracing::trace!("emulator: SWRESET");
                self.madctl = 0;
                self.awake = false;
                self.display_on = false;
            }
            op if op == Command::SleepOut as u8 => self.awake = true,
            op if op == Command::DisplayOn as u8 => self.display_on = true,
            op if op == Command::MemoryWrite as u8 => {
                self.cursor = (self.window.0, self.window.2);
            }
            _ => {}
        }
    }

    fn data_byte(&mut self, byte: u8) {
        let Some(command) = self.command else {
            return;
        };
        if command == Command::MemoryWrite as u8 {
            match self.high_byte.take() {
                Some(high) => self.put_pixel(u16::from_be_bytes([high, byte])),
                None => self.high_byte = Some(byte),
            }
            return;
        }
        if self.params.push(byte).is_err() {
            return;
        }
        match (command, self.params.as_slice()) {
            (c, &[x0h, x0l, x1h, x1l]) if c == Command::ColumnAddressSet as u8 => {
                self.window.0 = u16::from_be_bytes([x0h, x0l]);
                self.window.1 = u16::from_be_bytes([x1h, x1l]);
            }
            (c, &[y0h, y0l, y1h, y1l]) if c == Command::PageAddressSet as u8 => {
                self.window.2 = u16::from_be_bytes([y0h, y0l]);
                self.window.3 = u16::from_be_bytes([y1h, y1l]);
            }
            (c, &[value]) if c == Command::MemoryAccessControl as u8 => {
                self.madctl = value;
                self.size = if value & MADCTL_MV == 0 {
                    ScreenSize::new(NATIVE_WIDTH, NATIVE_HEIGHT)
                } else {
                    ScreenSize::new(NATIVE_HEIGHT, NATIVE_WIDTH)
                };
                tracing::debug!(madctl = value, width = self.size.width, "emulator: MADCTL");
            }
            _ => {}
        }
    }

    /// Store at the cursor and advance it through the window, row-major,
    /// wrapping back to the top.
    fn put_pixel(&mut self, raw: u16) {
        let (x, y) = self.cursor;
        if let Some(slot) = self.index(x, y).and_then(|i| self.framebuffer.get_mut(i)) {
            *slot = raw;
        }
        let (x0, x1, y0, y1) = self.window;
        self.cursor = if x >= x1 {
            (x0, if y >= y1 { y0 } else { y + 1 })
        } else {
            (x + 1, y)
        };
    }

    fn check_rate(&self, target: Target) -> Result<(), EmulatorError> {
        let expected = match target {
            Target::Display => BusRate::Display,
            Target::Touch => BusRate::Touch,
        };
        if self.rate == expected {
            Ok(())
        } else {
            Err(EmulatorError::WrongRate {
                target,
                rate: self.rate,
            })
        }
    }

    fn touch_write(&mut self, bytes: &[u8]) {
        for &b in bytes {
            self.channel = match b {
                READ_X | READ_Y => Some(b),
                POWER_DOWN => None,
                _ => self.channel,
            };
        }
    }
}

impl Transport for PanelEmulator {
    type Error = EmulatorError;

    fn select(&mut self, target: Target) -> Result<(), Self::Error> {
        match self.selected {
            Some(held) if held != target => {
                tracing::warn!(?held, ?target, "emulator: bus contention");
                return Err(EmulatorError::BusContention {
                    held,
                    requested: target,
                });
            }
            Some(_) => {}
            None => match target {
                Target::Display => self.stats.display_transactions += 1,
                Target::Touch => self.stats.touch_transactions += 1,
            },
        }
        self.selected = Some(target);
        Ok(())
    }

    fn release(&mut self, target: Target) -> Result<(), Self::Error> {
        if self.selected == Some(target) {
            self.selected = None;
        }
        Ok(())
    }

    fn set_data_mode(&mut self, mode: DataMode) -> Result<(), Self::Error> {
        self.mode = mode;
        Ok(())
    }

    fn write(&mut self, bytes: &[u8]) -> Result<(), Self::Error> {
        let target = self.selected.ok_or(EmulatorError::NotSelected)?;
        self.check_rate(target)?;
        match (target, self.mode) {
            (Target::Touch, _) => self.touch_write(bytes),
            // Held in reset: the controller ignores the bus.
            (Target::Display, _) if self.in_reset => {}
            (Target::Display, DataMode::Command) => {
                for &b in bytes {
                    self.begin_command(b);
                }
            }
            (Target::Display, DataMode::Data) => {
                if self.command == Some(Command::MemoryWrite as u8) {
                    self.stats.pixel_bytes += bytes.len();
                    self.stats.largest_pixel_write = self.stats.largest_pixel_write.max(bytes.len());
                }
                for &b in bytes {
                    self.data_byte(b);
                }
            }
        }
        Ok(())
    }

    fn write_read(&mut self, _tx: &[u8], rx: &mut [u8]) -> Result<(), Self::Error> {
        let target = self.selected.ok_or(EmulatorError::NotSelected)?;
        self.check_rate(target)?;
        let value = match (target, self.touch, self.channel) {
            (Target::Touch, Some(raw), Some(READ_X)) => raw.x,
            (Target::Touch, Some(raw), Some(READ_Y)) => raw.y,
            _ => 0,
        };
        if target == Target::Touch {
            self.stats.conversions += 1;
        }
        for (slot, byte) in rx.iter_mut().zip(value.to_be_bytes()) {
            *slot = byte;
        }
        Ok(())
    }

    fn set_bus_rate(&mut self, rate: BusRate) -> Result<(), Self::Error> {
        tracing::trace!(?rate, "emulator: bus rate");
        self.rate = rate;
        Ok(())
    }

    fn touch_irq_asserted(&mut self) -> Result<bool, Self::Error> {
        Ok(self.touch.is_some())
    }

    fn set_reset(&mut self, state: PinState) -> Result<(), Self::Error> {
        match state {
            PinState::Low => {
                self.in_reset = true;
                self.awake = false;
                self.display_on = false;
                self.command = None;
            }
            PinState::High => self.in_reset = false,
        }
        Ok(())
    }
}

impl OriginDimensions for PanelEmulator {
    fn size(&self) -> Size {
        Size::new(u32::from(self.size.width), u32::from(self.size.height))
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;

    fn caset(emu: &mut PanelEmulator, x0: u16, x1: u16) {
        emu.set_data_mode(DataMode::Command).unwrap();
        emu.write(&[0x2A]).unwrap();
        emu.set_data_mode(DataMode::Data).unwrap();
        let [a, b] = x0.to_be_bytes();
        let [c, d] = x1.to_be_bytes();
        emu.write(&[a, b, c, d]).unwrap();
    }

    fn paset(emu: &mut PanelEmulator, y0: u16, y1: u16) {
        emu.set_data_mode(DataMode::Command).unwrap();
        emu.write(&[0x2B]).unwrap();
        emu.set_data_mode(DataMode::Data).unwrap();
        let [a, b] = y0.to_be_bytes();
        let [c, d] = y1.to_be_bytes();
        emu.write(&[a, b, c, d]).unwrap();
    }

    #[test]
    fn ram_write_fills_window_row_major() {
        let mut emu = PanelEmulator::new();
        emu.select(Target::Display).unwrap();
        caset(&mut emu, 10, 11);
        paset(&mut emu, 20, 21);
        emu.set_data_mode(DataMode::Command).unwrap();
        emu.write(&[0x2C]).unwrap();
        emu.set_data_mode(DataMode::Data).unwrap();
        // Pixel bytes may straddle writes.
        emu.write(&[0x00, 0x01, 0x00]).unwrap();
        emu.write(&[0x02, 0x00, 0x03, 0x00, 0x04]).unwrap();
        emu.release(Target::Display).unwrap();

        assert_eq!(emu.pixel(10, 20), Some(Color565(1)));
        assert_eq!(emu.pixel(11, 20), Some(Color565(2)));
        assert_eq!(emu.pixel(10, 21), Some(Color565(3)));
        assert_eq!(emu.pixel(11, 21), Some(Color565(4)));
        assert_eq!(emu.stats().pixel_bytes, 8);
    }

    #[test]
    fn madctl_exchange_bit_swaps_addressing() {
        let mut emu = PanelEmulator::new();
        emu.select(Target::Display).unwrap();
        emu.set_data_mode(DataMode::Command).unwrap();
        emu.write(&[0x36]).unwrap();
        emu.set_data_mode(DataMode::Data).unwrap();
        emu.write(&[0xE8]).unwrap();
        assert_eq!(emu.screen_size(), ScreenSize::new(320, 240));
        assert_eq!(emu.madctl(), 0xE8);
    }

    #[test]
    fn commands_during_reset_are_ignored() {
        let mut emu = PanelEmulator::new();
        emu.set_reset(PinState::Low).unwrap();
        emu.select(Target::Display).unwrap();
        emu.set_data_mode(DataMode::Command).unwrap();
        emu.write(&[0x11, 0x29]).unwrap();
        assert!(!emu.is_displaying());
        emu.set_reset(PinState::High).unwrap();
        emu.write(&[0x11, 0x29]).unwrap();
        assert!(emu.is_displaying());
    }

    #[test]
    fn pixels_cover_the_whole_panel() {
        let emu = PanelEmulator::new();
        assert_eq!(emu.pixels().count(), 240 * 320);
        assert!(emu.pixels().all(|p| p.1 == Rgb565::BLACK));
    }

    #[test]
    fn traffic_without_select_is_rejected() {
        let mut emu = PanelEmulator::new();
        assert_eq!(emu.write(&[0x00]), Err(EmulatorError::NotSelected));
    }

    #[test]
    fn selecting_both_devices_is_contention() {
        let mut emu = PanelEmulator::new();
        emu.select(Target::Display).unwrap();
        assert_eq!(
            emu.select(Target::Touch),
            Err(EmulatorError::BusContention {
                held: Target::Display,
                requested: Target::Touch,
            })
        );
    }

    #[test]
    fn touch_at_display_rate_is_rejected() {
        let mut emu = PanelEmulator::new();
        emu.select(Target::Touch).unwrap();
        assert_eq!(
            emu.write(&[READ_Y]),
            Err(EmulatorError::WrongRate {
                target: Target::Touch,
                rate: BusRate::Display,
            })
        );
    }

    #[test]
    fn touch_answers_scripted_channels() {
        let mut emu = PanelEmulator::new();
        emu.press(RawSample { x: 0x0123, y: 0x0456 });
        emu.set_bus_rate(BusRate::Touch).unwrap();
        emu.select(Target::Touch).unwrap();
        let mut rx = [0u8; 2];
        emu.write(&[READ_Y]).unwrap();
        emu.write_read(&[0, 0], &mut rx).unwrap();
        assert_eq!(rx, [0x04, 0x56]);
        emu.write(&[READ_X]).unwrap();
        emu.write_read(&[0, 0], &mut rx).unwrap();
        assert_eq!(rx, [0x01, 0x23]);
        emu.write(&[POWER_DOWN]).unwrap();
        emu.write_read(&[0, 0], &mut rx).unwrap();
        assert_eq!(rx, [0, 0]);
    }
}
