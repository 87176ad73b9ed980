//! Height stage: ultrasonic ping → clamped height → stability detector.

use std::time::Duration;

use kiosk_traits::Ultrasonic;

use crate::config::HeightCfg;
use crate::cycle::LockedMeasurement;
use crate::report_error::map_trait_error;
use crate::stability::{StabilityDetector, StabilityState};
use crate::status::StageStep;

/// Speed of sound, cm per µs. The echo covers the distance twice.
pub const SOUND_CM_PER_US: f64 = 0.034;

/// Round-trip echo time to one-way distance, truncated to whole cm.
#[inline]
pub fn distance_cm(duration_us: u64) -> u64 {
    (duration_us as f64 * SOUND_CM_PER_US / 2.0) as u64
}

/// Subject height for a sensor mounted at `max_height_cm`, clamped to `[0, max_height_cm]`.
#[inline]
pub fn height_cm(distance_cm: u64, max_height_cm: u32) -> u32 {
    let max = i64::from(max_height_cm);
    let d = i64::try_from(distance_cm).unwrap_or(i64::MAX);
    // Clamped into [0, max] so the cast back is lossless.
    (max - d).clamp(0, max) as u32
}

pub struct HeightStage<U: Ultrasonic> {
    sensor: U,
    cfg: HeightCfg,
    detector: StabilityDetector<u32>,
    next_sample_at_ms: Option<u64>,
    faults: u64,
}

impl<U: Ultrasonic> HeightStage<U> {
    pub fn new(sensor: U, cfg: HeightCfg) -> Self {
        Self {
            detector: StabilityDetector::new(cfg.lock_ms),
            sensor,
            cfg,
            next_sample_at_ms: None,
            faults: 0,
        }
    }

    /// One stage step at controller time `now_ms`.
    pub fn tick(&mut self, now_ms: u64) -> StageStep<u32> {
        if self.detector.is_locked() {
            return StageStep::Idle;
        }
        if let Some(at) = self.next_sample_at_ms {
            if now_ms < at {
                return StageStep::Idle;
            }
        }
        self.next_sample_at_ms = Some(now_ms.saturating_add(self.cfg.sample_interval_ms));

        let height = self.measure();
        tracing::debug!(height_cm = height, "height sample");
        match self.detector.observe(height, now_ms) {
            StabilityState::Locked(value) => {
                tracing::info!(height_cm = value, "height locked");
                StageStep::Locked(LockedMeasurement::new(value, now_ms))
            }
            StabilityState::Changed | StabilityState::UnchangedWaiting => {
                StageStep::Sampled(height)
            }
        }
    }

    /// Ping once and convert. A missing echo reads as 0 µs, which saturates
    /// the height at `max_height_cm`; it still goes through stabilization.
    fn measure(&mut self) -> u32 {
        let timeout = Duration::from_millis(self.cfg.echo_timeout_ms);
        let duration = match self.sensor.pulse_duration_us(timeout) {
            Ok(0) => {
                self.faults += 1;
                tracing::warn!(faults = self.faults, "sensor fault: no echo");
                0
            }
            Ok(us) => us,
            Err(e) => {
                self.faults += 1;
                let fault = map_trait_error(&*e);
                tracing::warn!(error = %fault, faults = self.faults, "sensor fault: no echo");
                0
            }
        };
        height_cm(distance_cm(duration), self.cfg.max_height_cm)
    }

    pub fn is_locked(&self) -> bool {
        self.detector.is_locked()
    }

    pub fn last_height(&self) -> Option<u32> {
        self.detector.last_sample()
    }

    /// Pings that produced no echo since construction.
    pub fn fault_count(&self) -> u64 {
        self.faults
    }

    pub fn cfg(&self) -> &HeightCfg {
        &self.cfg
    }

    pub fn reset(&mut self) {
        self.detector.reset();
        self.next_sample_at_ms = None;
    }
}
