//! Weight stage: scale advertisements → decoded kg → stability detector.

use kiosk_traits::{Advertisement, BleScanner};

use crate::config::WeightCfg;
use crate::cycle::LockedMeasurement;
use crate::error::KioskError;
use crate::stability::{StabilityDetector, StabilityState};
use crate::status::StageStep;

/// Decode the scale's manufacturer data.
///
/// Bytes 2 and 3 are a big-endian `u16` in units of 0.01 kg. Bytes 0 and 1
/// are ignored, as is anything past byte 3.
pub fn decode_weight(manufacturer_data: &[u8]) -> Result<f32, KioskError> {
    match manufacturer_data {
        [_, _, hi, lo, ..] => Ok(f32::from(u16::from_be_bytes([*hi, *lo])) / 100.0),
        _ => Err(KioskError::MalformedAdvertisement {
            len: manufacturer_data.len(),
        }),
    }
}

pub struct WeightStage<B: BleScanner> {
    scanner: B,
    cfg: WeightCfg,
    detector: StabilityDetector<f32>,
}

impl<B: BleScanner> WeightStage<B> {
    pub fn new(scanner: B, cfg: WeightCfg) -> Self {
        Self {
            detector: StabilityDetector::new(cfg.lock_ms),
            scanner,
            cfg,
        }
    }

    /// Bring the radio up. Failure here is fatal to boot.
    pub fn start(&mut self) -> Result<(), KioskError> {
        self.scanner
            .start()
            .map_err(|e| KioskError::BleUnavailable(e.to_string()))
    }

    /// At most one advertisement is consumed per tick.
    pub fn tick(&mut self, now_ms: u64) -> StageStep<f32> {
        if self.detector.is_locked() {
            return StageStep::Idle;
        }
        let Some(kg) = self.scanner.poll().and_then(|adv| self.accept(&adv)) else {
            if self.cfg.lock_on_silence {
                if let StabilityState::Locked(kg) = self.detector.poll(now_ms) {
                    tracing::info!(weight_kg = kg, "weight locked (quiet scale)");
                    return StageStep::Locked(LockedMeasurement::new(kg, now_ms));
                }
            }
            return StageStep::Idle;
        };
        tracing::debug!(weight_kg = kg, "weight sample");
        match self.detector.observe(kg, now_ms) {
            StabilityState::Locked(value) => {
                tracing::info!(weight_kg = value, "weight locked");
                StageStep::Locked(LockedMeasurement::new(value, now_ms))
            }
            StabilityState::Changed | StabilityState::UnchangedWaiting => StageStep::Sampled(kg),
        }
    }

    fn accept(&self, adv: &Advertisement) -> Option<f32> {
        if adv.address != self.cfg.scale_mac {
            tracing::trace!(address = %adv.address, "ignoring advertisement from other device");
            return None;
        }
        match decode_weight(&adv.manufacturer_data) {
            Ok(kg) => Some(kg),
            Err(e) => {
                tracing::debug!(error = %e, "ignoring advertisement");
                None
            }
        }
    }

    pub fn is_locked(&self) -> bool {
        self.detector.is_locked()
    }

    pub fn last_weight(&self) -> Option<f32> {
        self.detector.last_sample()
    }

    pub fn cfg(&self) -> &WeightCfg {
        &self.cfg
    }

    pub fn reset(&mut self) {
        self.detector.reset();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use rstest::rstest;

    #[rstest]
    #[case(&[0xff, 0xff, 0x01, 0x2c], 3.00)]
    #[case(&[0x00, 0x00, 0x00, 0x32], 0.50)]
    #[case(&[0x12, 0x34, 0x18, 0x5a, 0x99], 62.34)]
    #[case(&[0, 0, 0, 0], 0.0)]
    fn decodes_centi_kilograms(#[case] data: &[u8], #[case] kg: f32) {
        assert_eq!(decode_weight(data), Ok(kg));
    }

    #[rstest]
    #[case(&[])]
    #[case(&[0x01])]
    #[case(&[0x01, 0x02, 0x03])]
    fn rejects_short_payloads(#[case] data: &[u8]) {
        assert_eq!(
            decode_weight(data),
            Err(KioskError::MalformedAdvertisement { len: data.len() })
        );
    }

    struct Burst {
        mac: kiosk_traits::MacAddress,
        left: u32,
    }

    impl BleScanner for Burst {
        fn start(&mut self) -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
            Ok(())
        }
        fn poll(&mut self) -> Option<Advertisement> {
            if self.left == 0 {
                return None;
            }
            self.left -= 1;
            Some(Advertisement {
                address: self.mac,
                manufacturer_data: vec![0, 0, 0x17, 0x70],
            })
        }
    }

    fn stage(lock_on_silence: bool) -> WeightStage<Burst> {
        let mac = "aa:bb:cc:00:11:22".parse().unwrap();
        let cfg = WeightCfg {
            lock_ms: 1000,
            lock_on_silence,
            ..WeightCfg::new(mac)
        };
        WeightStage::new(Burst { mac, left: 2 }, cfg)
    }

    #[rstest]
    #[case(false, false)]
    #[case(true, true)]
    fn quiet_scale_locks_only_when_enabled(#[case] on_silence: bool, #[case] locks: bool) {
        let mut s = stage(on_silence);
        assert_eq!(s.tick(0), StageStep::Sampled(60.0));
        assert_eq!(s.tick(100), StageStep::Sampled(60.0));
        // Scale went quiet.
        assert_eq!(s.tick(900), StageStep::Idle);
        let step = s.tick(1000);
        assert_eq!(
            step,
            if locks {
                StageStep::Locked(LockedMeasurement::new(60.0, 1000))
            } else {
                StageStep::Idle
            }
        );
        assert_eq!(s.is_locked(), locks);
    }

    #[test]
    fn other_devices_do_not_count() {
        let mut s = stage(false);
        s.scanner.mac = "01:02:03:04:05:06".parse().unwrap();
        assert_eq!(s.tick(0), StageStep::Idle);
        assert_eq!(s.last_weight(), None);
    }

    proptest! {
        #[test]
        fn decode_ignores_prefix_and_suffix(
            a in any::<u8>(), b in any::<u8>(), raw in any::<u16>(),
            tail in proptest::collection::vec(any::<u8>(), 0..8),
        ) {
            let mut data = vec![a, b];
            data.extend_from_slice(&raw.to_be_bytes());
            data.extend(tail);
            let kg = decode_weight(&data).unwrap();
            prop_assert_eq!(kg, f32::from(raw) / 100.0);
            prop_assert!((0.0..=655.35).contains(&kg));
        }
    }
}
