//! ILI9341 command set, power-on script and wire helpers
//!
//! The helpers here never touch chip-select. Callers bracket them with
//! [`selected`] so the controller stays addressed across a command and
//! its parameters.

use platform::{DataMode, Target, Transport};

use crate::error::{bus_error, DriverError};

// ---------------------------------------------------------------------------
// Command enum
// ---------------------------------------------------------------------------

/// ILI9341 command codes used by this driver.
#[repr(u8)]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Command {
    /// Software reset: 0 data bytes; wait before the next command.
    SoftwareReset = 0x01,
    /// Sleep out: 0 data bytes; wait 120 ms.
    SleepOut = 0x11,
    /// Gamma curve select: 1 data byte.
    GammaSet = 0x26,
    /// Display on: 0 data bytes.
    DisplayOn = 0x29,
    /// Column address set: 4 data bytes (start, end; big-endian).
    ColumnAddressSet = 0x2A,
    /// Page (row) address set: 4 data bytes (start, end; big-endian).
    PageAddressSet = 0x2B,
    /// Memory write: pixel data follows.
    MemoryWrite = 0x2C,
    /// Memory access control (MADCTL): 1 data byte.
    MemoryAccessControl = 0x36,
    /// Pixel format set: 1 data byte.
    PixelFormatSet = 0x3A,
    /// Frame rate control (normal mode): 2 data bytes.
    FrameRateControl = 0xB1,
    /// Display function control: 3 data bytes.
    DisplayFunctionControl = 0xB6,
    /// Power control 1 (VRH): 1 data byte.
    PowerControl1 = 0xC0,
    /// Power control 2 (SAP, BT): 1 data byte.
    PowerControl2 = 0xC1,
    /// VCOM control 1: 2 data bytes.
    VcomControl1 = 0xC5,
    /// VCOM control 2: 1 data byte.
    VcomControl2 = 0xC7,
    /// Power control A: 5 data bytes.
    PowerControlA = 0xCB,
    /// Power control B: 3 data bytes.
    PowerControlB = 0xCF,
    /// Positive gamma correction: 15 data bytes.
    PositiveGamma = 0xE0,
    /// Negative gamma correction: 15 data bytes.
    NegativeGamma = 0xE1,
    /// Driver timing control A: 3 data bytes.
    DriverTimingA = 0xE8,
    /// Driver timing control B: 2 data bytes.
    DriverTimingB = 0xEA,
    /// Power-on sequence control: 4 data bytes.
    PowerOnSequence = 0xED,
    /// Enable 3-gamma: 1 data byte.
    Enable3Gamma = 0xF2,
    /// Pump ratio control: 1 data byte.
    PumpRatioControl = 0xF7,
}

// ---------------------------------------------------------------------------
// Power-on script
// ---------------------------------------------------------------------------

/// Delay after [`Command::SoftwareReset`], in milliseconds.
pub const SOFTWARE_RESET_DELAY_MS: u32 = 1000;

/// Delay after [`Command::SleepOut`], in milliseconds.
pub const SLEEP_OUT_DELAY_MS: u32 = 120;

/// Register writes issued between software reset and sleep-out, in order.
pub const INIT_SEQUENCE: &[(Command, &[u8])] = &[
    (Command::PowerControlA, &[0x39, 0x2C, 0x00, 0x34, 0x02]),
    (Command::PowerControlB, &[0x00, 0xC1, 0x30]),
    (Command::DriverTimingA, &[0x85, 0x00, 0x78]),
    (Command::DriverTimingB, &[0x00, 0x00]),
    (Command::PowerOnSequence, &[0x64, 0x03, 0x12, 0x81]),
    (Command::PumpRatioControl, &[0x20]),
    (Command::PowerControl1, &[0x23]),
    (Command::PowerControl2, &[0x10]),
    (Command::VcomControl1, &[0x3E, 0x28]),
    (Command::VcomControl2, &[0x86]),
    (Command::MemoryAccessControl, &[0x48]),
    // 16 bits per pixel
    (Command::PixelFormatSet, &[0x55]),
    (Command::FrameRateControl, &[0x00, 0x18]),
    (Command::DisplayFunctionControl, &[0x08, 0x82, 0x27]),
    (Command::Enable3Gamma, &[0x00]),
    (Command::GammaSet, &[0x01]),
    (
        Command::PositiveGamma,
        &[
            0x0F, 0x31, 0x2B, 0x0C, 0x0E, 0x08, 0x4E, 0xF1, 0x37, 0x07, 0x10, 0x03, 0x0E, 0x09,
            0x00,
        ],
    ),
    (
        Command::NegativeGamma,
        &[
            0x00, 0x0E, 0x14, 0x03, 0x11, 0x07, 0x31, 0xC1, 0x48, 0x08, 0x0F, 0x0C, 0x31, 0x36,
            0x0F,
        ],
    ),
];

// ---------------------------------------------------------------------------
// Wire helpers
// ---------------------------------------------------------------------------

/// DC low, then one opcode byte.
pub(crate) fn send_command<T: Transport>(t: &mut T, cmd: u8) -> Result<(), DriverError> {
    t.set_data_mode(DataMode::Command).map_err(bus_error)?;
    t.write(&[cmd]).map_err(bus_error)
}

/// DC high, then `data`. Empty payloads send nothing.
pub(crate) fn send_data<T: Transport>(t: &mut T, data: &[u8]) -> Result<(), DriverError> {
    if data.is_empty() {
        return Ok(());
    }
    t.set_data_mode(DataMode::Data).map_err(bus_error)?;
    t.write(data).map_err(bus_error)
}

/// Opcode followed by its parameters.
pub(crate) fn cmd_data<T: Transport>(t: &mut T, cmd: Command, data: &[u8]) -> Result<(), DriverError> {
    send_command(t, cmd as u8)?;
    send_data(t, data)
}

/// Run `f` with `target` selected. The target is released on every path,
/// and the first error wins.
pub(crate) fn selected<T, R>(
    t: &mut T,
    target: Target,
    f: impl FnOnce(&mut T) -> Result<R, DriverError>,
) -> Result<R, DriverError>
where
    T: Transport,
{
    t.select(target).map_err(bus_error)?;
    let result = f(t);
    let released = t.release(target).map_err(bus_error);
    let value = result?;
    released?;
    Ok(value)
}
