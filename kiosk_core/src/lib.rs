#![cfg_attr(all(not(debug_assertions), not(test)), deny(warnings))]
#![cfg_attr(
    all(not(debug_assertions), not(test)),
    deny(clippy::all, clippy::pedantic, clippy::nursery)
)]
#![allow(
    clippy::module_name_repetitions,
    clippy::missing_errors_doc,
    clippy::cast_precision_loss,
    clippy::cast_possible_truncation,
    clippy::cast_sign_loss
)]
#![cfg_attr(not(test), deny(clippy::unwrap_used, clippy::expect_used))]
//! Kiosk measurement logic (hardware-agnostic).
//!
//! All hardware interactions go through the `kiosk_traits` collaborator
//! traits: `Ultrasonic`, `BleScanner`, `Reporter`, `Link` and `Display`.
//!
//! ## Architecture
//!
//! - **Stabilization**: value-change timing with a lock latch (`stability`)
//! - **Stages**: height from ultrasonic pings, weight from scale advertisements
//! - **Cycle**: per-measurement record, torn down after every cycle (`cycle`)
//! - **Controller**: explicit `Phase` machine, one phase step per `tick`
//! - **Runner**: boot plus a paced tick loop with cooperative shutdown
//!
//! Time is always controller time: milliseconds since the controller's epoch,
//! read from an injected `Clock`.

pub mod builder;
pub mod config;
pub mod controller;
pub mod conversions;
pub mod cycle;
pub mod error;
pub mod height;
pub mod mocks;
pub mod network;
pub mod report_error;
pub mod runner;
pub mod stability;
pub mod status;
pub mod weight;

pub use builder::{CycleControllerBuilder, Missing, Set};
pub use config::{CycleCfg, HeightCfg, NetworkCfg, WeightCfg};
pub use controller::CycleController;
pub use cycle::{LockedMeasurement, MeasurementCycle};
pub use error::{BuildError, KioskError, Report, Result};
pub use height::{HeightStage, distance_cm, height_cm};
pub use runner::{RunSummary, run};
pub use stability::{StabilityDetector, StabilityState};
pub use status::{Outcome, Phase, StageStep};
pub use weight::{WeightStage, decode_weight};
