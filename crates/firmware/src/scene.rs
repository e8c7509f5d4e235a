//! Power-on demo screen
//!
//! Exercises every primitive once: full-screen fills, a fan of lines from
//! the origin, a checkerboard of filled and outlined squares, and
//! concentric circles alternating filled and outlined.

use ili9341::{Color565, Device, DriverError};
use platform::{ScratchAlloc, Transport};

/// Fills cycled at the start of the demo, in order.
pub const FILL_SEQUENCE: [Color565; 4] = [
    Color565::BLUE,
    Color565::RED,
    Color565::GREEN,
    Color565::BLACK,
];

/// Spacing of the line fan endpoints, in pixels.
pub const FAN_STEP: u16 = 10;

/// Checkerboard cell size, in pixels.
pub const CELL: u16 = 16;

/// Outline inset inside a checkerboard cell, and the outline's side.
const INSET: u16 = 2;
const OUTLINE: u16 = 12;

/// Radius step between concentric circles, in pixels.
pub const RING_STEP: u16 = 16;

/// Run the whole demo once.
pub fn run<T, S>(dev: &mut Device<T, S>) -> Result<(), DriverError>
where
    T: Transport,
    S: ScratchAlloc,
{
    tracing::info!("demo: start");
    fills(dev)?;
    line_fan(dev)?;
    checkerboard(dev)?;
    rings(dev)?;
    tracing::info!("demo: done");
    Ok(())
}

/// Full-screen fills in [`FILL_SEQUENCE`] order.
pub fn fills<T: Transport, S: ScratchAlloc>(dev: &mut Device<T, S>) -> Result<(), DriverError> {
    for color in FILL_SEQUENCE {
        dev.fill_screen(color)?;
    }
    Ok(())
}

/// White lines from the origin to the right edge, top to bottom, then to
/// the bottom edge, right to left. Endpoints sit one past the last pixel.
pub fn line_fan<T: Transport, S: ScratchAlloc>(dev: &mut Device<T, S>) -> Result<(), DriverError> {
    let size = dev.screen_size();
    for y in (0..size.height).step_by(usize::from(FAN_STEP)) {
        dev.draw_line(0, 0, size.width, y, Color565::WHITE)?;
    }
    for x in (0..=size.width).rev().step_by(usize::from(FAN_STEP)) {
        dev.draw_line(0, 0, x, size.height, Color565::WHITE)?;
    }
    Ok(())
}

/// Navy background; cells where row and column parity agree are filled
/// cyan, the others get an inset white outline.
pub fn checkerboard<T: Transport, S: ScratchAlloc>(
    dev: &mut Device<T, S>,
) -> Result<(), DriverError> {
    let size = dev.screen_size();
    dev.fill_screen(Color565::NAVY)?;
    for (col, x) in (0..size.width).step_by(usize::from(CELL)).enumerate() {
        for (row, y) in (0..size.height).step_by(usize::from(CELL)).enumerate() {
            if col % 2 == row % 2 {
                dev.fill_rect(x, y, CELL, CELL, Color565::CYAN)?;
            } else {
                dev.draw_rect(
                    x.saturating_add(INSET),
                    y.saturating_add(INSET),
                    OUTLINE,
                    OUTLINE,
                    Color565::WHITE,
                )?;
            }
        }
    }
    Ok(())
}

/// Black background; concentric circles from the larger half-dimension
/// down to zero, alternating filled orange and outlined yellow.
pub fn rings<T: Transport, S: ScratchAlloc>(dev: &mut Device<T, S>) -> Result<(), DriverError> {
    let size = dev.screen_size();
    dev.fill_screen(Color565::BLACK)?;
    let (cx, cy) = (size.width / 2, size.height / 2);
    let radius = cx.max(cy);
    for (n, r) in (0..=radius).rev().step_by(usize::from(RING_STEP)).enumerate() {
        if n % 2 == 1 {
            dev.draw_circle(cx, cy, r, Color565::YELLOW)?;
        } else {
            dev.fill_circle(cx, cy, r, Color565::ORANGE)?;
        }
    }
    Ok(())
}
