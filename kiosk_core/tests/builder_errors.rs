use kiosk_core::error::BuildError;
use kiosk_core::{CycleCfg, CycleController, HeightCfg, WeightCfg};
use kiosk_hardware::{HttpReporter, SimulatedScale, SimulatedUltrasonic};
use kiosk_traits::MacAddress;
use rstest::rstest;
use std::time::Duration;

const MAC: MacAddress = MacAddress([0xaa, 0xbb, 0xcc, 0x00, 0x11, 0x22]);

fn reporter() -> HttpReporter {
    HttpReporter::new("127.0.0.1:9", Duration::from_millis(10))
}

#[rstest]
fn builder_missing_ultrasonic_yields_typed_build_error() {
    let err = CycleController::builder()
        // missing with_ultrasonic()
        .with_scanner(SimulatedScale::new(MAC, 60.0, 0))
        .with_reporter(reporter())
        .with_weight_cfg(WeightCfg::new(MAC))
        .try_build()
        .expect_err("should fail with MissingUltrasonic");

    match err.downcast_ref::<BuildError>() {
        Some(BuildError::MissingUltrasonic) => {}
        other => panic!("expected MissingUltrasonic, got: {other:?}"),
    }
}

#[rstest]
fn builder_missing_weight_cfg_is_reported_even_when_fully_typed() {
    let err = CycleController::builder()
        .with_ultrasonic(SimulatedUltrasonic::new(20, 0))
        .with_scanner(SimulatedScale::new(MAC, 60.0, 0))
        .with_reporter(reporter())
        .build()
        .expect_err("should fail with MissingWeightCfg");
    assert!(matches!(
        err.downcast_ref::<BuildError>(),
        Some(BuildError::MissingWeightCfg)
    ));
}

#[rstest]
#[case::zero_mast(HeightCfg { max_height_cm: 0, ..HeightCfg::default() }, CycleCfg::default())]
#[case::tall_mast(HeightCfg { max_height_cm: 501, ..HeightCfg::default() }, CycleCfg::default())]
#[case::no_window(HeightCfg { lock_ms: 0, ..HeightCfg::default() }, CycleCfg::default())]
#[case::no_echo_wait(HeightCfg { echo_timeout_ms: 0, ..HeightCfg::default() }, CycleCfg::default())]
#[case::blank_id(HeightCfg::default(), CycleCfg { device_id: "  ".into(), ..CycleCfg::default() })]
#[case::no_cols(HeightCfg::default(), CycleCfg { cols: 0, ..CycleCfg::default() })]
fn builder_rejects_invalid_config(#[case] height: HeightCfg, #[case] cycle: CycleCfg) {
    let err = CycleController::builder()
        .with_ultrasonic(SimulatedUltrasonic::new(20, 0))
        .with_scanner(SimulatedScale::new(MAC, 60.0, 0))
        .with_reporter(reporter())
        .with_weight_cfg(WeightCfg::new(MAC))
        .with_height_cfg(height)
        .with_cycle_cfg(cycle)
        .build()
        .expect_err("invalid config must be rejected");
    assert!(matches!(
        err.downcast_ref::<BuildError>(),
        Some(BuildError::InvalidConfig(_))
    ));
}

#[rstest]
fn built_controller_starts_idle() {
    let ctrl = CycleController::builder()
        .with_ultrasonic(SimulatedUltrasonic::new(20, 0))
        .with_scanner(SimulatedScale::new(MAC, 60.0, 0))
        .with_reporter(reporter())
        .with_weight_cfg(WeightCfg::new(MAC))
        .build()
        .unwrap();
    assert_eq!(ctrl.phase(), kiosk_core::Phase::Idle);
    assert!(!ctrl.is_booted());
    assert_eq!(ctrl.cycles_completed(), 0);
}
