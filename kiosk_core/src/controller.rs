//! The measurement cycle state machine.
//!
//! One `tick` advances exactly one phase. Boot runs once, before the first
//! tick, and may block on network association.

use std::sync::Arc;
use std::time::Instant;

use kiosk_traits::{BleScanner, Clock, Display, Link, Reporter, Ultrasonic};
use kiosk_ui::{Screen, show};

use crate::config::{CycleCfg, NetworkCfg};
use crate::cycle::MeasurementCycle;
use crate::error::{KioskError, Result};
use crate::height::HeightStage;
use crate::network;
use crate::report_error::map_trait_error;
use crate::status::{Outcome, Phase, StageStep};
use crate::weight::WeightStage;

pub struct CycleController {
    pub(crate) height: HeightStage<Box<dyn Ultrasonic>>,
    pub(crate) weight: WeightStage<Box<dyn BleScanner>>,
    pub(crate) reporter: Box<dyn Reporter>,
    pub(crate) link: Box<dyn Link>,
    pub(crate) display: Box<dyn Display>,
    pub(crate) clock: Arc<dyn Clock + Send + Sync>,
    pub(crate) epoch: Instant,
    pub(crate) network: NetworkCfg,
    pub(crate) cfg: CycleCfg,
    pub(crate) phase: Phase,
    pub(crate) cycle: MeasurementCycle,
    pub(crate) online: bool,
    pub(crate) booted: bool,
    pub(crate) cycles_completed: u64,
    pub(crate) last_outcome: Option<Outcome>,
}

impl core::fmt::Debug for CycleController {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("CycleController")
            .field("phase", &self.phase)
            .field("cycle", &self.cycle)
            .field("online", &self.online)
            .field("cycles_completed", &self.cycles_completed)
            .finish_non_exhaustive()
    }
}

impl CycleController {
    /// Associate, issue the first reset and bring up BLE.
    ///
    /// A failed association or reset is not an error: the kiosk still
    /// measures but will not submit. A BLE failure is fatal and returned.
    pub fn boot(&mut self) -> Result<()> {
        if self.booted {
            return Err(eyre::Report::new(KioskError::State("already booted".into())));
        }
        self.draw(&Screen::Booting);
        self.draw(&Screen::Connecting);
        self.online = network::associate(&mut *self.link, &*self.clock, &self.network);
        if self.online {
            self.draw(&Screen::Online {
                addr: self.link.local_addr(),
            });
        } else {
            self.draw(&Screen::Offline);
        }

        let acknowledged = self.request_reset();
        self.cycle = MeasurementCycle::new(acknowledged);

        self.draw(&Screen::BleStarting);
        if let Err(e) = self.weight.start() {
            self.draw(&Screen::BleFailed);
            tracing::error!(error = %e, "BLE init failed; halting");
            return Err(eyre::Report::new(e));
        }
        self.draw(&Screen::BleReady);
        self.draw(&Screen::Ready);

        self.booted = true;
        self.enter(Phase::MeasuringHeight);
        Ok(())
    }

    /// Advance the active phase once and return the phase after the step.
    pub fn tick(&mut self) -> Result<Phase> {
        if !self.booted {
            return Err(eyre::Report::new(KioskError::State(
                "tick before boot".into(),
            )));
        }
        let now = self.now_ms();
        match self.phase {
            // Boot leaves Idle; kept for completeness of the match.
            Phase::Idle => self.enter(Phase::MeasuringHeight),
            Phase::MeasuringHeight => match self.height.tick(now) {
                StageStep::Idle => {}
                StageStep::Sampled(cm) => self.draw(&Screen::HeightReading { cm }),
                StageStep::Locked(lock) => {
                    self.cycle.record_height(lock)?;
                    self.draw(&Screen::HeightLocked { cm: lock.value });
                    self.enter(Phase::MeasuringWeight);
                }
            },
            Phase::MeasuringWeight => match self.weight.tick(now) {
                StageStep::Idle => {}
                StageStep::Sampled(kg) => self.draw(&Screen::WeightReading { kg }),
                StageStep::Locked(lock) => {
                    self.cycle.record_weight(lock)?;
                    self.draw(&Screen::WeightLocked { kg: lock.value });
                    self.enter(Phase::Reporting);
                }
            },
            Phase::Reporting => {
                let outcome = self.report()?;
                self.last_outcome = Some(outcome);
                let screen = match outcome {
                    Outcome::Submitted => Screen::Submitted {
                        device_id: self.cfg.device_id.clone(),
                    },
                    Outcome::SubmitFailed => Screen::SubmitFailed,
                    Outcome::NotSubmitted => Screen::NotSubmitted,
                };
                self.draw(&screen);
                let result_at_ms = now.saturating_add(self.cfg.outcome_dwell_ms);
                self.enter(Phase::DisplayingResult {
                    outcome,
                    result_at_ms,
                    until_ms: result_at_ms.saturating_add(self.cfg.result_dwell_ms),
                    result_shown: false,
                });
            }
            Phase::DisplayingResult {
                outcome,
                result_at_ms,
                until_ms,
                result_shown,
            } => {
                if now >= until_ms {
                    self.enter(Phase::ResettingForNextCycle);
                } else if !result_shown && now >= result_at_ms {
                    if let Some((cm, kg)) = self.cycle.result() {
                        self.draw(&Screen::Result { cm, kg });
                    }
                    self.phase = Phase::DisplayingResult {
                        outcome,
                        result_at_ms,
                        until_ms,
                        result_shown: true,
                    };
                }
            }
            Phase::ResettingForNextCycle => {
                self.cycle.teardown();
                self.height.reset();
                self.weight.reset();
                let acknowledged = self.request_reset();
                self.cycle = MeasurementCycle::new(acknowledged);
                self.cycles_completed = self.cycles_completed.saturating_add(1);
                self.draw(&Screen::Ready);
                self.enter(Phase::MeasuringHeight);
            }
        }
        Ok(self.phase)
    }

    /// Submit once iff the preceding reset was acknowledged. Never retried.
    fn report(&mut self) -> Result<Outcome> {
        let Some((cm, kg)) = self.cycle.result() else {
            return Err(eyre::Report::new(KioskError::State(
                "reporting without both locks".into(),
            )));
        };
        if !self.cycle.reset_acknowledged {
            tracing::warn!(
                height_cm = cm,
                weight_kg = kg,
                "preceding reset not acknowledged; measurement not submitted"
            );
            return Ok(Outcome::NotSubmitted);
        }
        self.draw(&Screen::Sending);
        match self
            .reporter
            .submit_measurement(kg, cm as f32, &self.cfg.device_id)
        {
            Ok(()) => {
                self.cycle.submitted = true;
                tracing::info!(height_cm = cm, weight_kg = kg, "measurement submitted");
                Ok(Outcome::Submitted)
            }
            Err(e) => {
                let err = map_trait_error(&*e);
                tracing::warn!(error = %err, "submission failed");
                Ok(Outcome::SubmitFailed)
            }
        }
    }

    /// Ask the server to clear this device's data. Skipped (and counted as a
    /// failure) while offline.
    fn request_reset(&mut self) -> bool {
        self.draw(&Screen::Resetting);
        if !self.online {
            tracing::warn!("offline; reset skipped");
            self.draw(&Screen::ResetFailed);
            return false;
        }
        match self.reporter.reset_device(&self.cfg.device_id) {
            Ok(()) => {
                tracing::info!(device_id = %self.cfg.device_id, "reset acknowledged");
                self.draw(&Screen::ResetOk);
                true
            }
            Err(e) => {
                let err = map_trait_error(&*e);
                tracing::warn!(error = %err, "reset failed; next measurement will not be submitted");
                self.draw(&Screen::ResetFailed);
                false
            }
        }
    }

    fn enter(&mut self, next: Phase) {
        tracing::info!(from = self.phase.name(), to = next.name(), "phase");
        self.phase = next;
    }

    fn draw(&mut self, screen: &Screen) {
        show(&mut *self.display, screen, self.cfg.cols);
    }

    fn now_ms(&self) -> u64 {
        self.clock.ms_since(self.epoch)
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn cycle(&self) -> &MeasurementCycle {
        &self.cycle
    }

    /// Outcome of the most recent Reporting phase.
    pub fn last_outcome(&self) -> Option<Outcome> {
        self.last_outcome
    }

    pub fn cycles_completed(&self) -> u64 {
        self.cycles_completed
    }

    pub fn is_online(&self) -> bool {
        self.online
    }

    pub fn is_booted(&self) -> bool {
        self.booted
    }

    pub fn clock(&self) -> &dyn Clock {
        &*self.clock
    }

    /// Ultrasonic pings that returned no echo so far.
    pub fn sensor_faults(&self) -> u64 {
        self.height.fault_count()
    }

    pub fn last_height(&self) -> Option<u32> {
        self.height.last_height()
    }

    pub fn last_weight(&self) -> Option<f32> {
        self.weight.last_weight()
    }
}
