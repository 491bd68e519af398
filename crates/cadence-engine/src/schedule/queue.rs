use std::collections::VecDeque;

/// Identifies one armed interval or refresh request.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash, Ord, PartialOrd)]
pub struct TimerHandle(u64);

/// Timing primitive contract.
///
/// Implementations must be cheap to poll; hosts call `poll_due` in a loop
/// until it returns `None`.
pub trait Scheduler {
    /// Arms a recurring timer. The first signal is due `period_ms` after
    /// `now_ms`; each later one is due `period_ms` after the previous signal
    /// was taken.
    fn set_interval(&mut self, period_ms: f64, now_ms: f64) -> TimerHandle;

    /// Arms a single signal for the next refresh pulse.
    fn request_refresh(&mut self) -> TimerHandle;

    /// Disarms an interval or refresh request. Unknown handles are ignored.
    fn cancel(&mut self, handle: TimerHandle);

    /// Releases every pending refresh request. Called by the host once per
    /// display refresh.
    fn pulse_refresh(&mut self);

    /// Takes the next signal that is due at `now_ms`.
    fn poll_due(&mut self, now_ms: f64) -> Option<TimerHandle>;

    /// Earliest interval deadline, if any interval is armed.
    fn next_deadline(&self) -> Option<f64>;

    /// Whether a refresh request is waiting for a pulse.
    fn wants_refresh(&self) -> bool;
}

#[derive(Debug, Clone)]
struct Interval {
    handle: TimerHandle,
    period_ms: f64,
    due_ms: f64,
}

/// Standard in-memory `Scheduler`.
///
/// Intervals use fixed-delay semantics: a late poll delays every following
/// signal instead of producing a burst of catch-up signals.
#[derive(Debug, Default)]
pub struct TimerQueue {
    next_id: u64,
    intervals: Vec<Interval>,
    refresh_waiting: Vec<TimerHandle>,
    refresh_ready: VecDeque<TimerHandle>,
}

impl TimerQueue {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of armed intervals plus refresh requests (pending or released).
    pub fn armed(&self) -> usize {
        self.intervals.len() + self.refresh_waiting.len() + self.refresh_ready.len()
    }

    fn next_handle(&mut self) -> TimerHandle {
        let handle = TimerHandle(self.next_id);
        self.next_id = self.next_id.wrapping_add(1);
        handle
    }
}

impl Scheduler for TimerQueue {
    fn set_interval(&mut self, period_ms: f64, now_ms: f64) -> TimerHandle {
        debug_assert!(period_ms > 0.0, "interval period must be positive");
        let handle = self.next_handle();
        self.intervals.push(Interval {
            handle,
            period_ms,
            due_ms: now_ms + period_ms,
        });
        handle
    }

    fn request_refresh(&mut self) -> TimerHandle {
        let handle = self.next_handle();
        self.refresh_waiting.push(handle);
        handle
    }

    fn cancel(&mut self, handle: TimerHandle) {
        self.intervals.retain(|i| i.handle != handle);
        self.refresh_waiting.retain(|h| *h != handle);
        self.refresh_ready.retain(|h| *h != handle);
    }

    fn pulse_refresh(&mut self) {
        self.refresh_ready.extend(self.refresh_waiting.drain(..));
    }

    fn poll_due(&mut self, now_ms: f64) -> Option<TimerHandle> {
        if let Some(handle) = self.refresh_ready.pop_front() {
            return Some(handle);
        }

        // Earliest due first; ties resolve in arming order.
        let interval = self
            .intervals
            .iter_mut()
            .filter(|i| i.due_ms <= now_ms)
            .min_by(|a, b| a.due_ms.total_cmp(&b.due_ms))?;

        interval.due_ms = now_ms + interval.period_ms;
        Some(interval.handle)
    }

    fn next_deadline(&self) -> Option<f64> {
        self.intervals
            .iter()
            .map(|i| i.due_ms)
            .min_by(f64::total_cmp)
    }

    fn wants_refresh(&self) -> bool {
        !self.refresh_waiting.is_empty()
    }
}
