/// Display refresh rate assumed when the real one is unknown.
pub const DEFAULT_REFRESH_RATE: f64 = 60.0;

/// Emits refresh pulses on a display cadence.
///
/// Hosts ask `due()` whenever they wake while the loop waits on a refresh,
/// and sleep until `wake_at()` otherwise. Pulses keep their phase across
/// short delays; after a long stall the cadence restarts from now instead of
/// bursting to catch up.
#[derive(Debug, Clone)]
pub struct RefreshPacer {
    period_ms: f64,
    next_ms: Option<f64>,
}

impl RefreshPacer {
    /// Invalid rates (non-finite or not positive) fall back to
    /// `DEFAULT_REFRESH_RATE`.
    pub fn new(rate_hz: f64) -> Self {
        let rate = if rate_hz.is_finite() && rate_hz > 0.0 {
            rate_hz
        } else {
            log::warn!("invalid refresh rate {rate_hz}, falling back to {DEFAULT_REFRESH_RATE}");
            DEFAULT_REFRESH_RATE
        };

        Self {
            period_ms: 1000.0 / rate,
            next_ms: None,
        }
    }

    /// Refresh rate from a monitor report in millihertz, if there is one.
    pub fn from_millihertz(millihertz: Option<u32>) -> Self {
        match millihertz {
            Some(mhz) if mhz > 0 => Self::new(f64::from(mhz) / 1000.0),
            _ => Self::new(DEFAULT_REFRESH_RATE),
        }
    }

    #[inline]
    pub fn period_ms(&self) -> f64 {
        self.period_ms
    }

    /// Returns `true` when a pulse is due at `now_ms` and advances the cadence.
    ///
    /// The first call is always due.
    pub fn due(&mut self, now_ms: f64) -> bool {
        let next = *self.next_ms.get_or_insert(now_ms);
        if now_ms < next {
            return false;
        }

        let following = next + self.period_ms;
        self.next_ms = Some(if following > now_ms { following } else { now_ms + self.period_ms });
        true
    }

    /// Earliest of the interval `deadline` and the next pulse. The pulse only
    /// counts while a refresh is wanted.
    pub fn wake_at(&self, deadline: Option<f64>, wants_refresh: bool) -> Option<f64> {
        let refresh = self.next_ms.filter(|_| wants_refresh);
        match (deadline, refresh) {
            (Some(a), Some(b)) => Some(a.min(b)),
            (a, b) => a.or(b),
        }
    }
}

impl Default for RefreshPacer {
    fn default() -> Self {
        Self::new(DEFAULT_REFRESH_RATE)
    }
}
