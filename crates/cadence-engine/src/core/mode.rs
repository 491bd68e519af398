use super::error::LoopError;

/// Timing strategy selected at `start()`.
///
/// The discriminants are the stable numeric values accepted by
/// `FrameLoop::from_raw` and the `CADENCE_MODE` environment variable.
#[repr(u8)]
#[derive(Debug, Default, Copy, Clone, Eq, PartialEq, Hash)]
pub enum LoopMode {
    /// Recurring fixed-delay timer with period `tick_interval`.
    #[default]
    FixedInterval = 0,
    /// Display refresh signal, throttled down to the target rate.
    RefreshSync = 1,
}

impl TryFrom<u8> for LoopMode {
    type Error = LoopError;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        match value {
            0 => Ok(Self::FixedInterval),
            1 => Ok(Self::RefreshSync),
            other => Err(LoopError::InvalidMode(other)),
        }
    }
}

impl From<LoopMode> for u8 {
    fn from(mode: LoopMode) -> Self {
        mode as u8
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn known_values_convert() {
        assert_eq!(LoopMode::try_from(0).unwrap(), LoopMode::FixedInterval);
        assert_eq!(LoopMode::try_from(1).unwrap(), LoopMode::RefreshSync);
        assert_eq!(u8::from(LoopMode::RefreshSync), 1);
    }

    #[test]
    fn unknown_value_is_invalid_mode() {
        assert!(matches!(LoopMode::try_from(99), Err(LoopError::InvalidMode(99))));
    }
}
