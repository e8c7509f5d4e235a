//! XPT2046 sampling protocol
//!
//! The sensor shares the bus with the display but needs a much slower
//! clock, so a sampling pass drops the bus rate, selects the sensor, reads
//! the Y then X channel for every sample while the IRQ line still reports
//! a press, then powers the sensor down and restores the display rate.

use platform::{BusRate, Target, Transport};

use super::calibrate::RawSample;
use crate::display::command::selected;
use crate::error::{bus_error, DriverError};

/// Control byte: Y position, 12-bit, differential, ADC on.
pub const READ_Y: u8 = 0x93;

/// Control byte: X position, 12-bit, differential, ADC on.
pub const READ_X: u8 = 0xD3;

/// Control byte: power down between conversions.
pub const POWER_DOWN: u8 = 0x00;

/// Send one control byte and clock back the 16-bit conversion.
fn read_channel<T: Transport>(t: &mut T, control: u8) -> Result<u16, DriverError> {
    t.write(&[control]).map_err(bus_error)?;
    let mut rx = [0u8; 2];
    t.write_read(&[0x00, 0x00], &mut rx).map_err(bus_error)?;
    Ok(u16::from_be_bytes(rx))
}

/// Take up to `required` samples while the panel stays pressed.
///
/// Returns `None` if the press ended before `required` samples were
/// collected. Otherwise returns the per-axis integer mean. The display bus
/// rate is restored on every path.
pub(crate) fn sample<T: Transport>(
    t: &mut T,
    required: u16,
) -> Result<Option<RawSample>, DriverError> {
    t.set_bus_rate(BusRate::Touch).map_err(bus_error)?;

    let pass = selected(t, Target::Touch, |t| {
        let (mut sum_x, mut sum_y, mut taken) = (0u32, 0u32, 0u16);
        while taken < required && t.touch_irq_asserted().map_err(bus_error)? {
            let y = read_channel(t, READ_Y)?;
            let x = read_channel(t, READ_X)?;
            sum_x = sum_x.saturating_add(u32::from(x));
            sum_y = sum_y.saturating_add(u32::from(y));
            taken = taken.saturating_add(1);
        }
        t.write(&[POWER_DOWN]).map_err(bus_error)?;
        Ok((sum_x, sum_y, taken))
    });

    let restored = t.set_bus_rate(BusRate::Display).map_err(bus_error);
    let (sum_x, sum_y, taken) = pass?;
    restored?;

    if taken < required || required == 0 {
        trace!("xpt2046: {} of {} samples, released", taken, required);
        return Ok(None);
    }

    let n = u32::from(required);
    Ok(Some(RawSample {
        x: mean(sum_x, n),
        y: mean(sum_y, n),
    }))
}

fn mean(sum: u32, n: u32) -> u16 {
    u16::try_from(sum.checked_div(n).unwrap_or(0)).unwrap_or(u16::MAX)
}
