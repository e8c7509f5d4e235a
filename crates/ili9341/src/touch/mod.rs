//! XPT2046 resistive touch panel
//!
//! Touch is optional. A device built without a [`TouchConfig`] rejects
//! every touch call with [`DriverError::TouchUnsupported`], and its
//! [`touch_state`](Device::touch_state) stays
//! [`PressState::Uninitialized`].
//!
//! # Interrupt flow
//!
//! The sensor pulls its IRQ line low on press. The platform latches that
//! edge and later calls [`Device::touch_interrupt`] from task context. One
//! sampling pass is taken, fed to the [`TouchTracker`], and the begin/end
//! callbacks fire on the edges it reports:
//!
//! ```text
//!   IRQ edge ──► touch_interrupt ──► sample ──► calibrate ──► observe
//!                                                               │
//!                                     on_begin / on_end ◄───────┘
//! ```

mod calibrate;
mod sampler;
mod state;

pub use calibrate::{interpolate, Calibration, RawSample, TouchPoint};
pub use sampler::{POWER_DOWN, READ_X, READ_Y};
pub use state::{Observation, PressState, TouchEdge, TouchTracker};

use platform::Transport;

use crate::config::TouchConfig;
use crate::device::Device;
use crate::error::{bus_error, DriverError};

/// Press callback. Receives the calibrated coordinate.
pub type TouchCallback = fn(TouchPoint);

/// Per-device touch state.
#[derive(Debug, Clone, Copy)]
pub(crate) struct TouchUnit {
    config: TouchConfig,
    tracker: TouchTracker,
    on_begin: Option<TouchCallback>,
    on_end: Option<TouchCallback>,
}

impl TouchUnit {
    pub(crate) fn new(config: TouchConfig) -> Self {
        // A configured panel starts released; only an absent one is
        // uninitialized.
        let mut tracker = TouchTracker::new();
        tracker.observe(Observation::Released);
        Self {
            config,
            tracker,
            on_begin: None,
            on_end: None,
        }
    }
}

impl<T, S> Device<T, S>
where
    T: Transport,
{
    fn touch_unit(&mut self) -> Result<&mut TouchUnit, DriverError> {
        self.touch.as_mut().ok_or(DriverError::TouchUnsupported)
    }

    /// Instantaneous IRQ level: `true` while the panel is pressed.
    pub fn touch_pressed(&mut self) -> Result<bool, DriverError> {
        self.touch_unit()?;
        self.transport.touch_irq_asserted().map_err(bus_error)
    }

    /// Take one sampling pass and calibrate it.
    ///
    /// `None` if the panel is not pressed, or was released before enough
    /// samples were collected. Press state is not updated.
    pub fn touch_coordinate(&mut self) -> Result<Option<TouchPoint>, DriverError> {
        let config = self.touch_unit()?.config;
        let raw = sampler::sample(&mut self.transport, config.sampling.sample_count())?;
        Ok(raw.map(|raw| config.calibration.to_screen(raw, self.orientation)))
    }

    /// Handle a latched IRQ edge from task context.
    ///
    /// Samples, updates the press state, fires the matching callback and
    /// returns the edge, if one occurred.
    pub fn touch_interrupt(&mut self) -> Result<Option<TouchEdge>, DriverError> {
        let observation = match self.touch_coordinate()? {
            Some(point) => Observation::Pressed(point),
            None => Observation::Released,
        };
        let unit = self.touch_unit()?;
        let edge = unit.tracker.observe(observation);
        match edge {
            Some(TouchEdge::Begin(p)) => {
                debug!("xpt2046: press at {},{}", p.x, p.y);
                if let Some(cb) = unit.on_begin {
                    cb(p);
                }
            }
            Some(TouchEdge::End(p)) => {
                debug!("xpt2046: release at {},{}", p.x, p.y);
                if let Some(cb) = unit.on_end {
                    cb(p);
                }
            }
            None => {}
        }
        Ok(edge)
    }

    /// Current press state. [`PressState::Uninitialized`] without touch.
    pub fn touch_state(&self) -> PressState {
        self.touch
            .as_ref()
            .map_or(PressState::Uninitialized, |unit| unit.tracker.state())
    }

    /// Last coordinate seen while pressed.
    pub fn last_touch(&self) -> Option<TouchPoint> {
        self.touch.as_ref().map(|unit| unit.tracker.last_point())
    }

    /// Install the press-begin callback, replacing any previous one.
    pub fn set_press_begin(&mut self, callback: TouchCallback) -> Result<(), DriverError> {
        self.touch_unit()?.on_begin = Some(callback);
        Ok(())
    }

    /// Install the press-end callback, replacing any previous one.
    pub fn set_press_end(&mut self, callback: TouchCallback) -> Result<(), DriverError> {
        self.touch_unit()?.on_end = Some(callback);
        Ok(())
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used, clippy::indexing_slicing)]
mod tests {
    use super::*;
    use crate::config::{DeviceConfig, Sampling};
    use crate::display::Orientation;

    use core::sync::atomic::{AtomicU32, Ordering};
    use embedded_hal_mock::eh1::delay::NoopDelay;
    use platform::mocks::{ExhaustedScratch, RecordingTransport};

    const CAL: Calibration = Calibration::new(300, 200, 3800, 3700);

    fn touch_device(sampling: Sampling) -> Device<RecordingTransport, ExhaustedScratch> {
        let cfg = DeviceConfig::new(Orientation::Portrait)
            .with_touch(TouchConfig::new(CAL).with_sampling(sampling));
        Device::new(RecordingTransport::new(), ExhaustedScratch, NoopDelay, cfg).unwrap()
    }

    #[test]
    fn display_only_rejects_touch_calls() {
        let mut dev = Device::new(
            RecordingTransport::new(),
            ExhaustedScratch,
            NoopDelay,
            DeviceConfig::default(),
        )
        .unwrap();
        assert_eq!(dev.touch_pressed(), Err(DriverError::TouchUnsupported));
        assert_eq!(dev.touch_coordinate(), Err(DriverError::TouchUnsupported));
        assert_eq!(dev.touch_interrupt(), Err(DriverError::TouchUnsupported));
        assert_eq!(dev.set_press_begin(|_| {}), Err(DriverError::TouchUnsupported));
        assert_eq!(dev.touch_state(), PressState::Uninitialized);
        assert_eq!(dev.last_touch(), None);
    }

    #[test]
    fn configured_panel_starts_released() {
        let dev = touch_device(Sampling::Single);
        assert_eq!(dev.touch_state(), PressState::Released);
    }

    #[test]
    fn touch_pressed_reads_irq_level() {
        let mut dev = touch_device(Sampling::Single);
        dev.transport_mut().script_irq(&[true, false]);
        assert!(dev.touch_pressed().unwrap());
        assert!(!dev.touch_pressed().unwrap());
    }

    #[test]
    fn coordinate_is_calibrated_mean() {
        let mut dev = touch_device(Sampling::Averaged);
        dev.transport_mut().set_irq_idle(true);
        // 16 (y, x) pairs straddling the calibration midpoint. X averages
        // to exactly 2050; Y to 1950.5, which truncates to 1950.
        let mut words = Vec::new();
        for i in 0..16u16 {
            words.push(1950 + i % 2);
            words.push(2049 + 2 * (i % 2));
        }
        dev.transport_mut().script_samples(&words);
        let p = dev.touch_coordinate().unwrap();
        assert_eq!(p, Some(TouchPoint::new(120, 160)));
        assert_eq!(dev.touch_state(), PressState::Released, "polling leaves state alone");
    }

    #[test]
    fn interrupt_fires_begin_then_end_once_each() {
        static BEGINS: AtomicU32 = AtomicU32::new(0);
        static ENDS: AtomicU32 = AtomicU32::new(0);

        let mut dev = touch_device(Sampling::Single);
        dev.set_press_begin(|_| {
            BEGINS.fetch_add(1, Ordering::Relaxed);
        })
        .unwrap();
        dev.set_press_end(|_| {
            ENDS.fetch_add(1, Ordering::Relaxed);
        })
        .unwrap();

        // Released, pressed at two points, released.
        dev.transport_mut().script_irq(&[false, true, true, false]);
        dev.transport_mut().script_samples(&[3700, 3800, 1950, 2050]);

        let edges: Vec<_> = (0..4).map(|_| dev.touch_interrupt().unwrap()).collect();
        assert_eq!(
            edges,
            vec![
                None,
                Some(TouchEdge::Begin(TouchPoint::new(0, 0))),
                None,
                Some(TouchEdge::End(TouchPoint::new(120, 160))),
            ]
        );
        assert_eq!(BEGINS.load(Ordering::Relaxed), 1);
        assert_eq!(ENDS.load(Ordering::Relaxed), 1);
        assert_eq!(dev.last_touch(), Some(TouchPoint::new(120, 160)));
    }

    #[test]
    fn early_release_during_sampling_ends_press() {
        let mut dev = touch_device(Sampling::Averaged);
        dev.transport_mut().script_irq(&[true; 16]);
        dev.transport_mut().script_samples(&[2000; 32]);
        assert!(matches!(dev.touch_interrupt().unwrap(), Some(TouchEdge::Begin(_))));

        // Ten samples, then the finger lifts.
        let mut levels = [true; 11];
        levels[10] = false;
        dev.transport_mut().script_irq(&levels);
        assert!(matches!(dev.touch_interrupt().unwrap(), Some(TouchEdge::End(_))));
        assert_eq!(dev.touch_state(), PressState::Released);
    }
}
