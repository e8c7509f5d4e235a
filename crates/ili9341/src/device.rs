//! Device handle and controller bring-up
//!
//! A [`Device`] owns the bus transport and one scratch strategy for its
//! whole life. It is built once with [`Device::new`], which validates the
//! configuration, runs the power-on script and clears the screen. Drawing
//! lives in `display::raster` and `display::text`, touch handling in
//! `touch`; all of them are inherent methods on this type.

use embedded_hal::delay::DelayNs;
use platform::{PinState, ScratchAlloc, Target, Transport};

use crate::config::DeviceConfig;
use crate::display::command::{
    cmd_data, selected, send_command, send_data, Command, INIT_SEQUENCE, SLEEP_OUT_DELAY_MS,
    SOFTWARE_RESET_DELAY_MS,
};
use crate::display::transfer::{plan, stream, PixelSource};
use crate::display::{Color565, Orientation, Rect, ScreenSize};
use crate::error::{bus_error, DriverError};
use crate::touch::TouchUnit;

/// ILI9341 display with optional XPT2046 touch panel.
///
/// Generic over:
/// - `T`: the shared bus [`Transport`].
/// - `S`: the [`ScratchAlloc`] strategy used for pixel payloads.
///
/// Not internally synchronised: wrap it in a single lock when several
/// tasks draw or sample touch.
pub struct Device<T, S> {
    pub(crate) transport: T,
    pub(crate) scratch: S,
    pub(crate) orientation: Orientation,
    pub(crate) size: ScreenSize,
    pub(crate) max_block: usize,
    pub(crate) touch: Option<TouchUnit>,
}

impl<T, S> Device<T, S>
where
    T: Transport,
    S: ScratchAlloc,
{
    /// Validate `config`, bring the controller out of reset and clear the
    /// screen to black.
    ///
    /// Returns no device at all if any step fails.
    pub fn new<D: DelayNs>(
        transport: T,
        scratch: S,
        mut delay: D,
        config: DeviceConfig,
    ) -> Result<Self, DriverError> {
        config.validate()?;
        let orientation = config.orientation;
        let size = orientation.screen_size();
        let mut device = Self {
            transport,
            scratch,
            orientation,
            size,
            max_block: config.max_block,
            touch: config.touch.map(TouchUnit::new),
        };
        info!(
            "ili9341: init {:?} {}x{} touch={}",
            orientation,
            size.width,
            size.height,
            device.touch.is_some()
        );
        device.initialize(&mut delay)?;
        device.fill_screen(Color565::BLACK)?;
        debug!("ili9341: ready");
        Ok(device)
    }

    /// Hardware reset, then the controller power-on script.
    fn initialize<D: DelayNs>(&mut self, delay: &mut D) -> Result<(), DriverError> {
        let t = &mut self.transport;
        t.set_reset(PinState::Low).map_err(bus_error)?;
        delay.delay_ms(platform::config::RESET_PULSE_MS);
        t.set_reset(PinState::High).map_err(bus_error)?;

        // Both devices start de-selected.
        t.release(Target::Display).map_err(bus_error)?;
        t.release(Target::Touch).map_err(bus_error)?;

        let rotation = self.orientation.madctl();
        selected(t, Target::Display, |t| {
            send_command(t, Command::SoftwareReset as u8)?;
            delay.delay_ms(SOFTWARE_RESET_DELAY_MS);

            for (cmd, params) in INIT_SEQUENCE {
                cmd_data(t, *cmd, params)?;
            }

            send_command(t, Command::SleepOut as u8)?;
            delay.delay_ms(SLEEP_OUT_DELAY_MS);
            send_command(t, Command::DisplayOn as u8)?;
            cmd_data(t, Command::MemoryAccessControl, &[rotation])
        })
    }

    /// Stream `rect` (already clipped) from `source` through a scratch block.
    ///
    /// A scratch acquisition failure skips the draw entirely and is not
    /// reported to the caller.
    pub(crate) fn transfer<P: PixelSource>(
        &mut self,
        rect: Rect,
        source: &mut P,
    ) -> Result<(), DriverError> {
        let (total, block) = plan(rect, self.max_block, self.scratch.max_len());
        if block == 0 {
            warn!("ili9341: scratch holds no whole pixel, draw skipped");
            return Ok(());
        }
        let Self {
            transport, scratch, ..
        } = self;
        match scratch.with_scratch(block, |buf| stream(transport, rect, buf, total, source)) {
            Some(result) => result,
            None => {
                warn!("ili9341: no {} byte scratch block, draw skipped", block);
                Ok(())
            }
        }
    }
}

impl<T, S> Device<T, S>
where
    T: Transport,
{
    /// Panel rotation.
    pub fn orientation(&self) -> Orientation {
        self.orientation
    }

    /// Addressable size for the current rotation.
    pub fn screen_size(&self) -> ScreenSize {
        self.size
    }

    /// Largest single pixel transaction, in bytes.
    pub fn max_block(&self) -> usize {
        self.max_block
    }

    /// `true` if the device was built with a touch panel.
    pub fn touch_supported(&self) -> bool {
        self.touch.is_some()
    }

    /// Borrow the transport.
    pub fn transport(&self) -> &T {
        &self.transport
    }

    /// Mutably borrow the transport.
    ///
    /// Bypasses the driver; the caller must leave both targets released.
    pub fn transport_mut(&mut self) -> &mut T {
        &mut self.transport
    }

    /// Tear down, returning the transport and scratch strategy.
    pub fn into_parts(self) -> (T, S) {
        (self.transport, self.scratch)
    }

    // -----------------------------------------------------------------------
    // Raw controller access
    // -----------------------------------------------------------------------

    /// Send one opcode in its own chip-select bracket.
    pub fn write_command(&mut self, cmd: u8) -> Result<(), DriverError> {
        selected(&mut self.transport, Target::Display, |t| send_command(t, cmd))
    }

    /// Send parameter/pixel bytes in their own chip-select bracket.
    pub fn write_data(&mut self, data: &[u8]) -> Result<(), DriverError> {
        selected(&mut self.transport, Target::Display, |t| send_data(t, data))
    }

    /// Send an opcode and its parameters in one chip-select bracket.
    pub fn write_command_data(&mut self, cmd: u8, data: &[u8]) -> Result<(), DriverError> {
        selected(&mut self.transport, Target::Display, |t| {
            send_command(t, cmd)?;
            send_data(t, data)
        })
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used, clippy::indexing_slicing)]
mod tests {
    use super::*;
    use crate::config::TouchConfig;
    use crate::error::ConfigError;
    use crate::touch::Calibration;

    use embedded_hal_mock::eh1::delay::NoopDelay;
    use platform::mocks::{BusEvent, ExhaustedScratch, RecordingTransport};
    use platform::{DataMode, PooledScratch};

    fn device(cfg: DeviceConfig, pool: &mut [u8]) -> Device<RecordingTransport, PooledScratch<'_>> {
        Device::new(RecordingTransport::new(), PooledScratch::new(pool), NoopDelay, cfg).unwrap()
    }

    /// Opcodes written while DC was low, in order.
    fn opcodes(events: &[BusEvent]) -> Vec<u8> {
        let mut mode = DataMode::Data;
        let mut out = Vec::new();
        for e in events {
            match e {
                BusEvent::Mode(m) => mode = *m,
                BusEvent::Write(bytes) if mode == DataMode::Command => out.extend_from_slice(bytes),
                _ => {}
            }
        }
        out
    }

    #[test]
    fn power_on_resets_then_runs_script_in_order() {
        let mut pool = [0u8; 1024];
        let dev = device(DeviceConfig::default(), &mut pool);
        let events = dev.transport().events();

        assert_eq!(
            &events[..5],
            &[
                BusEvent::Reset(PinState::Low),
                BusEvent::Reset(PinState::High),
                BusEvent::Release(Target::Display),
                BusEvent::Release(Target::Touch),
                BusEvent::Select(Target::Display),
            ]
        );

        let mut expected = vec![0x01];
        expected.extend(INIT_SEQUENCE.iter().map(|(c, _)| *c as u8));
        expected.extend([0x11, 0x29, 0x36]);
        // Initial clear: window + RAMWR.
        expected.extend([0x2A, 0x2B, 0x2C]);
        assert_eq!(opcodes(events), expected);
    }

    #[test]
    fn rotation_byte_follows_orientation() {
        let mut pool = [0u8; 1024];
        let dev = device(DeviceConfig::new(Orientation::Landscape), &mut pool);
        let writes: Vec<&[u8]> = dev.transport().writes().collect();
        let madctl = writes.iter().rposition(|w| *w == [0x36]).unwrap();
        assert_eq!(writes[madctl + 1], &[0xE8]);
        assert_eq!(dev.screen_size(), ScreenSize::new(320, 240));
    }

    #[test]
    fn construction_clears_screen_black() {
        let mut pool = [0u8; 1024];
        let dev = device(DeviceConfig::default(), &mut pool);
        let writes: Vec<&[u8]> = dev.transport().writes().collect();
        let ramwr = writes.iter().rposition(|w| *w == [0x2C]).unwrap();
        let payload = &writes[ramwr + 1..];
        assert_eq!(payload.iter().map(|w| w.len()).sum::<usize>(), 240 * 320 * 2);
        assert!(payload.iter().all(|w| w.len() <= 1024));
        assert!(payload.iter().copied().flatten().all(|b| *b == 0));
    }

    /// A pool smaller than `max_block` shortens the blocks instead of
    /// refusing the draw.
    #[test]
    fn small_pool_chunks_through_its_own_length() {
        let mut pool = [0u8; 512];
        let mut dev = device(DeviceConfig::default(), &mut pool);
        let writes: Vec<&[u8]> = dev.transport().writes().collect();
        let ramwr = writes.iter().rposition(|w| *w == [0x2C]).unwrap();
        assert_eq!(
            writes[ramwr + 1..].iter().map(|w| w.len()).sum::<usize>(),
            240 * 320 * 2,
            "construction clear reached the panel"
        );

        dev.transport_mut().clear();
        dev.fill_screen(Color565::RED).unwrap();
        let writes: Vec<&[u8]> = dev.transport().writes().collect();
        let ramwr = writes.iter().rposition(|w| *w == [0x2C]).unwrap();
        let payload = &writes[ramwr + 1..];
        assert_eq!(payload.iter().map(|w| w.len()).sum::<usize>(), 240 * 320 * 2);
        assert!(payload.iter().all(|w| w.len() <= 512));
        assert_eq!(payload.len(), 300);
        assert!(payload.iter().copied().flatten().step_by(2).all(|b| *b == 0xF8));
    }

    /// A pool that cannot hold one pixel skips multi-pixel draws.
    #[test]
    fn sub_pixel_pool_skips_the_clear() {
        let mut pool = [0u8; 1];
        let dev = device(DeviceConfig::default(), &mut pool);
        let last = dev.transport().writes().last().unwrap().to_vec();
        assert_eq!(last, vec![0x48]);
    }

    #[test]
    fn invalid_calibration_builds_nothing() {
        let cfg = DeviceConfig::default()
            .with_touch(TouchConfig::new(Calibration::new(100, 100, 100, 900)));
        let out = Device::new(RecordingTransport::new(), ExhaustedScratch, NoopDelay, cfg);
        assert!(matches!(
            out,
            Err(DriverError::Config(ConfigError::InvalidCalibration { .. }))
        ));
    }

    #[test]
    fn construction_fails_on_bus_error() {
        let mut t = RecordingTransport::new();
        t.fail_after(3);
        let out = Device::new(t, ExhaustedScratch, NoopDelay, DeviceConfig::default());
        assert!(matches!(out, Err(DriverError::Bus)));
    }

    #[test]
    fn exhausted_scratch_still_constructs() {
        let dev = Device::new(
            RecordingTransport::new(),
            ExhaustedScratch,
            NoopDelay,
            DeviceConfig::default(),
        )
        .unwrap();
        // The clear was skipped: nothing after MADCTL.
        let last = dev.transport().writes().last().unwrap().to_vec();
        assert_eq!(last, vec![0x48]);
    }

    #[test]
    fn raw_command_api_brackets_each_call() {
        let mut pool = [0u8; 64];
        let mut dev = device(DeviceConfig::default(), &mut pool);
        dev.transport_mut().clear();
        dev.write_command_data(0x26, &[0x01]).unwrap();
        assert_eq!(
            dev.transport().events(),
            &[
                BusEvent::Select(Target::Display),
                BusEvent::Mode(DataMode::Command),
                BusEvent::Write(vec![0x26]),
                BusEvent::Mode(DataMode::Data),
                BusEvent::Write(vec![0x01]),
                BusEvent::Release(Target::Display),
            ]
        );
    }
}
