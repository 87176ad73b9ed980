//! Controller phases and per-tick stage results.

use crate::cycle::LockedMeasurement;

/// What a stage did during one tick.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum StageStep<T> {
    /// No sample this tick (paced out, no advertisement, or already locked).
    Idle,
    /// A sample was taken and fed to the detector; not locked yet.
    Sampled(T),
    /// The detector locked on this tick.
    Locked(LockedMeasurement<T>),
}

/// How the Reporting phase ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    /// Submission returned 200.
    Submitted,
    /// Submission attempted and failed; not retried.
    SubmitFailed,
    /// Preceding reset failed (or the device is offline); submission skipped.
    NotSubmitted,
}

/// Explicit state of the measurement cycle.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Phase {
    /// Before boot completes. Left exactly once.
    Idle,
    MeasuringHeight,
    MeasuringWeight,
    Reporting,
    /// Outcome screen until `result_at_ms`, final result until `until_ms`.
    DisplayingResult {
        outcome: Outcome,
        result_at_ms: u64,
        until_ms: u64,
        result_shown: bool,
    },
    ResettingForNextCycle,
}

impl Phase {
    pub fn name(&self) -> &'static str {
        match self {
            Self::Idle => "idle",
            Self::MeasuringHeight => "measuring_height",
            Self::MeasuringWeight => "measuring_weight",
            Self::Reporting => "reporting",
            Self::DisplayingResult { .. } => "displaying_result",
            Self::ResettingForNextCycle => "resetting",
        }
    }
}
