use super::error::LoopError;
use super::mode::LoopMode;

/// Tick rate used when none is configured.
pub const DEFAULT_TARGET_RATE: f64 = 60.0;

/// Frame loop configuration.
///
/// `target_rate` is in ticks per second. `None` means uncapped and is only
/// accepted in `RefreshSync` mode, where every refresh signal becomes a tick.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct LoopConfig {
    pub target_rate: Option<f64>,
    pub mode: LoopMode,
}

impl Default for LoopConfig {
    fn default() -> Self {
        Self {
            target_rate: Some(DEFAULT_TARGET_RATE),
            mode: LoopMode::FixedInterval,
        }
    }
}

impl LoopConfig {
    pub fn fixed_interval(target_rate: f64) -> Self {
        Self {
            target_rate: Some(target_rate),
            mode: LoopMode::FixedInterval,
        }
    }

    pub fn refresh_sync(target_rate: Option<f64>) -> Self {
        Self {
            target_rate,
            mode: LoopMode::RefreshSync,
        }
    }

    /// Validates the configuration and returns the nominal tick interval in
    /// whole milliseconds (`None` when uncapped).
    pub fn tick_interval(&self) -> Result<Option<f64>, LoopError> {
        match (self.target_rate, self.mode) {
            (None, LoopMode::FixedInterval) => Err(LoopError::UncappedFixedInterval),
            (None, LoopMode::RefreshSync) => Ok(None),
            (Some(rate), _) => {
                // Above 1000 Hz the floored interval would be zero.
                if !rate.is_finite() || rate <= 0.0 || rate > 1000.0 {
                    return Err(LoopError::InvalidRate(rate));
                }
                Ok(Some((1000.0 / rate).floor()))
            }
        }
    }

    /// Reads `CADENCE_RATE` and `CADENCE_MODE` on top of the defaults.
    ///
    /// `CADENCE_RATE` is a number or `uncapped`; `CADENCE_MODE` is `0` or `1`.
    pub fn from_env() -> Result<Self, LoopError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, LoopError> {
        let mut config = Self::default();

        if let Some(raw) = lookup("CADENCE_RATE") {
            let raw = raw.trim();
            config.target_rate = if raw.eq_ignore_ascii_case("uncapped") {
                None
            } else {
                let rate = raw.parse::<f64>().map_err(|_| LoopError::Config {
                    key: "CADENCE_RATE",
                    value: raw.to_string(),
                })?;
                Some(rate)
            };
        }

        if let Some(raw) = lookup("CADENCE_MODE") {
            let value = raw.trim().parse::<u8>().map_err(|_| LoopError::Config {
                key: "CADENCE_MODE",
                value: raw.clone(),
            })?;
            config.mode = LoopMode::try_from(value)?;
        }

        config.tick_interval()?;
        Ok(config)
    }
}
