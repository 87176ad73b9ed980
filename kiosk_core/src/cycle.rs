//! Per-cycle measurement record owned by the controller.

use crate::error::{KioskError, Result};

/// Final value of one stage, with the controller time (ms since epoch) it locked.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LockedMeasurement<T> {
    pub value: T,
    pub locked_at_ms: u64,
}

impl<T> LockedMeasurement<T> {
    pub fn new(value: T, locked_at_ms: u64) -> Self {
        Self {
            value,
            locked_at_ms,
        }
    }
}

/// Everything one measurement cycle accumulates. Torn down wholesale at the
/// end of each cycle.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct MeasurementCycle {
    pub height_lock: Option<LockedMeasurement<u32>>,
    pub weight_lock: Option<LockedMeasurement<f32>>,
    /// The reset call preceding this cycle returned 200.
    pub reset_acknowledged: bool,
    pub submitted: bool,
}

impl MeasurementCycle {
    pub fn new(reset_acknowledged: bool) -> Self {
        Self {
            reset_acknowledged,
            ..Self::default()
        }
    }

    /// Record the height lock; a second lock in the same cycle is a state error.
    pub fn record_height(&mut self, lock: LockedMeasurement<u32>) -> Result<()> {
        if self.height_lock.is_some() {
            return Err(eyre::Report::new(KioskError::State(
                "height already locked this cycle".into(),
            )));
        }
        self.height_lock = Some(lock);
        Ok(())
    }

    pub fn record_weight(&mut self, lock: LockedMeasurement<f32>) -> Result<()> {
        if self.weight_lock.is_some() {
            return Err(eyre::Report::new(KioskError::State(
                "weight already locked this cycle".into(),
            )));
        }
        self.weight_lock = Some(lock);
        Ok(())
    }

    /// `(height_cm, weight_kg)` once both stages locked.
    pub fn result(&self) -> Option<(u32, f32)> {
        match (self.height_lock, self.weight_lock) {
            (Some(h), Some(w)) => Some((h.value, w.value)),
            _ => None,
        }
    }

    pub fn teardown(&mut self) {
        *self = Self::default();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn result_needs_both_locks() {
        let mut c = MeasurementCycle::new(true);
        assert_eq!(c.result(), None);
        c.record_height(LockedMeasurement::new(150, 4000)).unwrap();
        assert_eq!(c.result(), None);
        c.record_weight(LockedMeasurement::new(62.34, 9000)).unwrap();
        assert_eq!(c.result(), Some((150, 62.34)));
    }

    #[test]
    fn double_lock_is_rejected() {
        let mut c = MeasurementCycle::default();
        c.record_height(LockedMeasurement::new(100, 1)).unwrap();
        let err = c
            .record_height(LockedMeasurement::new(101, 2))
            .expect_err("second lock");
        assert!(format!("{err}").contains("already locked"));
        assert_eq!(c.height_lock.map(|l| l.value), Some(100));
    }

    #[test]
    fn teardown_clears_everything() {
        let mut c = MeasurementCycle::new(true);
        c.record_height(LockedMeasurement::new(100, 1)).unwrap();
        c.submitted = true;
        c.teardown();
        assert_eq!(c, MeasurementCycle::default());
    }
}
