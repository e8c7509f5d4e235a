//! Driver error types

/// Touch calibration axis.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Axis {
    /// Raw X channel
    X,
    /// Raw Y channel
    Y,
}

/// Rejected construction parameters.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ConfigError {
    /// Calibration minimum is not strictly below the maximum.
    #[error("touch calibration on {axis:?}: min must be below max")]
    InvalidCalibration {
        /// Offending axis
        axis: Axis,
    },
    /// Transfer block must hold at least one pixel and a whole number of pixels.
    #[error("transfer block size must be even and at least 2 bytes")]
    InvalidBlockSize,
}

/// Errors returned by [`Device`](crate::Device) operations.
///
/// Geometric no-ops (off-screen, zero-area) are not errors. Neither is a
/// scratch allocation failure during a draw: that aborts the draw before
/// any byte is sent and returns `Ok(())`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum DriverError {
    /// The bus transport reported a failure.
    #[error("bus transport failure")]
    Bus,
    /// A touch operation was called on a device built without touch.
    #[error("touch support not configured")]
    TouchUnsupported,
    /// The requested text wrap mode is not implemented.
    #[error("text wrap mode not supported")]
    UnsupportedWrap,
    /// Construction parameters were rejected.
    #[error(transparent)]
    Config(#[from] ConfigError),
}

/// Log a transport error and collapse it into [`DriverError::Bus`].
pub(crate) fn bus_error<E: core::fmt::Debug>(err: E) -> DriverError {
    #[cfg(feature = "defmt")]
    defmt::warn!("bus transport failure: {}", defmt::Debug2Format(&err));
    #[cfg(all(feature = "tracing", not(feature = "defmt")))]
    tracing::warn!(?err, "bus transport failure");
    #[cfg(not(any(feature = "defmt", feature = "tracing")))]
    let _ = err;
    DriverError::Bus
}
