//! Pin level abstraction
//!
//! The display core never touches `embedded-hal` pins directly; it passes
//! a [`PinState`] to its [`Transport`](crate::bus::Transport), which owns
//! the concrete pins.

/// Pin state
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum PinState {
    /// High (logic 1)
    High,
    /// Low (logic 0)
    Low,
}

impl From<bool> for PinState {
    fn from(value: bool) -> Self {
        if value {
            Self::High
        } else {
            Self::Low
        }
    }
}

impl From<PinState> for bool {
    fn from(value: PinState) -> Self {
        matches!(value, PinState::High)
    }
}

impl From<PinState> for embedded_hal::digital::PinState {
    fn from(value: PinState) -> Self {
        match value {
            PinState::High => Self::High,
            PinState::Low => Self::Low,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bool_round_trip() {
        assert_eq!(PinState::from(true), PinState::High);
        assert_eq!(PinState::from(false), PinState::Low);
        assert!(bool::from(PinState::High));
        assert!(!bool::from(PinState::Low));
    }

    #[test]
    fn converts_to_embedded_hal_state() {
        assert_eq!(
            embedded_hal::digital::PinState::from(PinState::Low),
            embedded_hal::digital::PinState::Low
        );
    }
}
