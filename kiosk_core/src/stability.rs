//! Last-value-change stability detection.
//!
//! A reading is final once it has been observed unchanged for the whole
//! stability window. There is no filtering: any difference, however small,
//! restarts the window. Equality is exact, which is sound for the integer
//! heights and the integer-decoded weights fed in here. Introducing any
//! smoothing upstream would require an epsilon comparison instead.

/// Result of feeding one sample to a [`StabilityDetector`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum StabilityState<T> {
    /// Sample differs from the stored one; the window restarted.
    Changed,
    /// Same sample, window not yet elapsed (or the value is not positive).
    /// Also returned for every call after the detector has latched.
    UnchangedWaiting,
    /// Window elapsed on a positive value. Reported exactly once per reset.
    Locked(T),
}

/// Detects when a sampled value has stopped changing for `lock_ms`.
#[derive(Debug, Clone)]
pub struct StabilityDetector<T> {
    lock_ms: u64,
    /// `None` is the "nothing seen yet" sentinel, so the first real sample
    /// always counts as a change.
    last: Option<T>,
    last_change_ms: Option<u64>,
    locked: bool,
}

impl<T> StabilityDetector<T>
where
    T: Copy + PartialOrd + Default,
{
    pub fn new(lock_ms: u64) -> Self {
        Self {
            lock_ms,
            last: None,
            last_change_ms: None,
            locked: false,
        }
    }

    pub fn lock_ms(&self) -> u64 {
        self.lock_ms
    }

    /// Feed one sample observed at `now_ms`.
    pub fn observe(&mut self, sample: T, now_ms: u64) -> StabilityState<T> {
        if self.locked {
            return StabilityState::UnchangedWaiting;
        }
        if self.last != Some(sample) {
            self.last = Some(sample);
            self.last_change_ms = Some(now_ms);
            return StabilityState::Changed;
        }
        self.check(now_ms)
    }

    /// Evaluate the window at `now_ms` without a new sample.
    pub fn poll(&mut self, now_ms: u64) -> StabilityState<T> {
        if self.locked {
            return StabilityState::UnchangedWaiting;
        }
        self.check(now_ms)
    }

    fn check(&mut self, now_ms: u64) -> StabilityState<T> {
        let (Some(value), Some(since)) = (self.last, self.last_change_ms) else {
            return StabilityState::UnchangedWaiting;
        };
        // Zero/negative values are the sensors' idle readings and never lock.
        if now_ms.saturating_sub(since) >= self.lock_ms && value > T::default() {
            self.locked = true;
            StabilityState::Locked(value)
        } else {
            StabilityState::UnchangedWaiting
        }
    }

    pub fn is_locked(&self) -> bool {
        self.locked
    }

    /// Most recent sample, if any since the last reset.
    pub fn last_sample(&self) -> Option<T> {
        self.last
    }

    pub fn last_change_ms(&self) -> Option<u64> {
        self.last_change_ms
    }

    /// Back to the sentinel: no sample, no timestamp, not locked.
    pub fn reset(&mut self) {
        self.last = None;
        self.last_change_ms = None;
        self.locked = false;
    }
}
