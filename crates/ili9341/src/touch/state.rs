//! Press/release edge detection

use super::calibrate::TouchPoint;

/// Last known panel state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum PressState {
    /// No observation yet.
    #[default]
    Uninitialized,
    /// Panel released.
    Released,
    /// Panel pressed.
    Pressed,
}

/// Outcome of one sampling pass.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Observation {
    /// Fully sampled press at a calibrated position.
    Pressed(TouchPoint),
    /// Released, or released part-way through sampling.
    Released,
}

/// A state change worth reporting.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum TouchEdge {
    /// Press started at this position.
    Begin(TouchPoint),
    /// Press ended; carries the last position seen while pressed.
    End(TouchPoint),
}

/// Retains press state and the last pressed coordinate.
#[derive(Debug, Clone, Copy, Default)]
pub struct TouchTracker {
    state: PressState,
    last: TouchPoint,
}

impl TouchTracker {
    /// Tracker with no observations.
    pub const fn new() -> Self {
        Self {
            state: PressState::Uninitialized,
            last: TouchPoint::new(0, 0),
        }
    }

    /// Current press state.
    pub fn state(&self) -> PressState {
        self.state
    }

    /// Last coordinate observed while pressed. Survives release.
    pub fn last_point(&self) -> TouchPoint {
        self.last
    }

    /// Feed one observation; returns the edge it produced, if any.
    ///
    /// The stored coordinate only changes on pressed observations, so an
    /// `End` edge always reports where the finger actually was.
    pub fn observe(&mut self, observation: Observation) -> Option<TouchEdge> {
        let edge = match (self.state, observation) {
            (PressState::Uninitialized | PressState::Released, Observation::Pressed(p)) => {
                Some(TouchEdge::Begin(p))
            }
            (PressState::Pressed, Observation::Released) => Some(TouchEdge::End(self.last)),
            _ => None,
        };
        match observation {
            Observation::Pressed(p) => {
                self.state = PressState::Pressed;
                self.last = p;
            }
            Observation::Released => self.state = PressState::Released,
        }
        edge
    }
}
