//! Type-state builder for `CycleController`.
//!
//! The builder enforces at compile time that the ultrasonic sensor, BLE
//! scanner and reporter are provided before `build()` is available.
//! `try_build()` is always available for dynamic checks.

use std::marker::PhantomData;
use std::sync::Arc;

use kiosk_traits::clock::{Clock, MonotonicClock};
use kiosk_traits::{BleScanner, Display, Link, Reporter, Ultrasonic};

use crate::config::{CycleCfg, HeightCfg, NetworkCfg, WeightCfg};
use crate::controller::CycleController;
use crate::cycle::MeasurementCycle;
use crate::error::{BuildError, Result};
use crate::height::HeightStage;
use crate::mocks::{AlwaysOnline, NullDisplay};
use crate::status::Phase;
use crate::weight::WeightStage;

// ── Type-state markers ───────────────────────────────────────────────────────

pub struct Missing;
pub struct Set;

/// Builder for `CycleController`. All fields are validated on `build()`.
pub struct CycleControllerBuilder<U, B, R> {
    ultrasonic: Option<Box<dyn Ultrasonic>>,
    scanner: Option<Box<dyn BleScanner>>,
    reporter: Option<Box<dyn Reporter>>,
    display: Option<Box<dyn Display>>,
    link: Option<Box<dyn Link>>,
    clock: Option<Box<dyn Clock + Send + Sync>>,
    height: Option<HeightCfg>,
    weight: Option<WeightCfg>,
    network: Option<NetworkCfg>,
    cycle: Option<CycleCfg>,
    _u: PhantomData<U>,
    _b: PhantomData<B>,
    _r: PhantomData<R>,
}

impl Default for CycleControllerBuilder<Missing, Missing, Missing> {
    fn default() -> Self {
        Self {
            ultrasonic: None,
            scanner: None,
            reporter: None,
            display: None,
            link: None,
            clock: None,
            height: None,
            weight: None,
            network: None,
            cycle: None,
            _u: PhantomData,
            _b: PhantomData,
            _r: PhantomData,
        }
    }
}

impl CycleController {
    /// Start building a controller.
    pub fn builder() -> CycleControllerBuilder<Missing, Missing, Missing> {
        CycleControllerBuilder::default()
    }
}

impl<U, B, R> CycleControllerBuilder<U, B, R> {
    // Moves every slot into a builder with different markers.
    fn retag<U2, B2, R2>(self) -> CycleControllerBuilder<U2, B2, R2> {
        CycleControllerBuilder {
            ultrasonic: self.ultrasonic,
            scanner: self.scanner,
            reporter: self.reporter,
            display: self.display,
            link: self.link,
            clock: self.clock,
            height: self.height,
            weight: self.weight,
            network: self.network,
            cycle: self.cycle,
            _u: PhantomData,
            _b: PhantomData,
            _r: PhantomData,
        }
    }

    /// Fallible build available in any type-state; returns detailed error for missing pieces.
    pub fn try_build(self) -> Result<CycleController> {
        let ultrasonic = self
            .ultrasonic
            .ok_or_else(|| eyre::Report::new(BuildError::MissingUltrasonic))?;
        let scanner = self
            .scanner
            .ok_or_else(|| eyre::Report::new(BuildError::MissingScanner))?;
        let reporter = self
            .reporter
            .ok_or_else(|| eyre::Report::new(BuildError::MissingReporter))?;
        let weight = self
            .weight
            .ok_or_else(|| eyre::Report::new(BuildError::MissingWeightCfg))?;

        validate_and_build(
            ultrasonic,
            scanner,
            reporter,
            self.display.unwrap_or_else(|| Box::new(NullDisplay)),
            self.link.unwrap_or_else(|| Box::new(AlwaysOnline)),
            self.clock,
            self.height.unwrap_or_default(),
            weight,
            self.network.unwrap_or_default(),
            self.cycle.unwrap_or_default(),
        )
    }
}

/// Chainable setters that do not affect type-state.
impl<U, B, R> CycleControllerBuilder<U, B, R> {
    pub fn with_display(mut self, display: impl Display + 'static) -> Self {
        self.display = Some(Box::new(display));
        self
    }
    /// Defaults to a link that is always up.
    pub fn with_link(mut self, link: impl Link + 'static) -> Self {
        self.link = Some(Box::new(link));
        self
    }
    /// Provide a custom clock implementation; defaults to `MonotonicClock` when not provided.
    pub fn with_clock(mut self, clock: Box<dyn Clock + Send + Sync>) -> Self {
        self.clock = Some(clock);
        self
    }
    pub fn with_height_cfg(mut self, cfg: HeightCfg) -> Self {
        self.height = Some(cfg);
        self
    }
    pub fn with_weight_cfg(mut self, cfg: WeightCfg) -> Self {
        self.weight = Some(cfg);
        self
    }
    pub fn with_network_cfg(mut self, cfg: NetworkCfg) -> Self {
        self.network = Some(cfg);
        self
    }
    pub fn with_cycle_cfg(mut self, cfg: CycleCfg) -> Self {
        self.cycle = Some(cfg);
        self
    }
}

// Setters that advance type-state
impl<B, R> CycleControllerBuilder<Missing, B, R> {
    pub fn with_ultrasonic(
        mut self,
        sensor: impl Ultrasonic + 'static,
    ) -> CycleControllerBuilder<Set, B, R> {
        self.ultrasonic = Some(Box::new(sensor));
        self.retag()
    }
}

impl<U, R> CycleControllerBuilder<U, Missing, R> {
    pub fn with_scanner(
        mut self,
        scanner: impl BleScanner + 'static,
    ) -> CycleControllerBuilder<U, Set, R> {
        self.scanner = Some(Box::new(scanner));
        self.retag()
    }
}

impl<U, B> CycleControllerBuilder<U, B, Missing> {
    pub fn with_reporter(
        mut self,
        reporter: impl Reporter + 'static,
    ) -> CycleControllerBuilder<U, B, Set> {
        self.reporter = Some(Box::new(reporter));
        self.retag()
    }
}

impl CycleControllerBuilder<Set, Set, Set> {
    /// Build the controller. Only the scale address can still be missing.
    pub fn build(self) -> Result<CycleController> {
        self.try_build()
    }
}

#[allow(clippy::too_many_arguments)]
fn validate_and_build(
    ultrasonic: Box<dyn Ultrasonic>,
    scanner: Box<dyn BleScanner>,
    reporter: Box<dyn Reporter>,
    display: Box<dyn Display>,
    link: Box<dyn Link>,
    clock: Option<Box<dyn Clock + Send + Sync>>,
    height: HeightCfg,
    weight: WeightCfg,
    network: NetworkCfg,
    cycle: CycleCfg,
) -> Result<CycleController> {
    // ── Validation ───────────────────────────────────────────────────────────
    if !(1..=500).contains(&height.max_height_cm) {
        return Err(eyre::Report::new(BuildError::InvalidConfig(
            "max_height_cm must be in [1, 500]",
        )));
    }
    if height.lock_ms == 0 || weight.lock_ms == 0 {
        return Err(eyre::Report::new(BuildError::InvalidConfig(
            "lock_ms must be >= 1",
        )));
    }
    if height.echo_timeout_ms == 0 {
        return Err(eyre::Report::new(BuildError::InvalidConfig(
            "echo_timeout_ms must be >= 1",
        )));
    }
    if cycle.device_id.trim().is_empty() {
        return Err(eyre::Report::new(BuildError::InvalidConfig(
            "device_id must not be empty",
        )));
    }
    if cycle.cols == 0 {
        return Err(eyre::Report::new(BuildError::InvalidConfig(
            "display cols must be >= 1",
        )));
    }

    let clock: Arc<dyn Clock + Send + Sync> = match clock {
        Some(b) => Arc::from(b),
        None => Arc::new(MonotonicClock::new()),
    };
    let epoch = clock.now();

    Ok(CycleController {
        height: HeightStage::new(ultrasonic, height),
        weight: WeightStage::new(scanner, weight),
        reporter,
        link,
        display,
        clock,
        epoch,
        network,
        cfg: cycle,
        phase: Phase::Idle,
        cycle: MeasurementCycle::default(),
        online: false,
        booted: false,
        cycles_completed: 0,
        last_outcome: None,
    })
}
