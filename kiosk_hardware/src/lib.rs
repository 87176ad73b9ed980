pub mod error;
pub mod feed;
#[cfg(all(feature = "hardware", target_os = "linux"))]
pub mod hcsr04;
pub mod http;
pub mod util;

use kiosk_traits::{Advertisement, BleScanner, MacAddress, Ultrasonic};

pub use feed::FeedScanner;
pub use http::{HttpReporter, TcpProbeLink};

/// Simulated ultrasonic sensor: a subject who steps under the mast and
/// shuffles for a few readings before standing still.
pub struct SimulatedUltrasonic {
    distance_cm: u32,
    settle_samples: u32,
    reads: u32,
}

impl SimulatedUltrasonic {
    pub fn new(distance_cm: u32, settle_samples: u32) -> Self {
        Self {
            distance_cm,
            settle_samples,
            reads: 0,
        }
    }
}

impl Ultrasonic for SimulatedUltrasonic {
    fn pulse_duration_us(
        &mut self,
        _timeout: std::time::Duration,
    ) -> Result<u64, Box<dyn std::error::Error + Send + Sync>> {
        let remaining = self.settle_samples.saturating_sub(self.reads);
        self.reads = self.reads.saturating_add(1);
        let d = self.distance_cm.saturating_add(remaining);
        tracing::trace!(distance_cm = d, "ultrasonic ping (simulated)");
        Ok(util::pulse_for_distance_us(d))
    }
}

/// Simulated BLE scale broadcasting its reading on every poll.
pub struct SimulatedScale {
    address: MacAddress,
    weight_kg: f32,
    settle_samples: u32,
    polls: u32,
    started: bool,
}

impl SimulatedScale {
    pub fn new(address: MacAddress, weight_kg: f32, settle_samples: u32) -> Self {
        Self {
            address,
            weight_kg,
            settle_samples,
            polls: 0,
            started: false,
        }
    }
}

impl BleScanner for SimulatedScale {
    fn start(&mut self) -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
        self.started = true;
        Ok(())
    }

    fn poll(&mut self) -> Option<Advertisement> {
        if !self.started {
            return None;
        }
        let remaining = self.settle_samples.saturating_sub(self.polls);
        self.polls = self.polls.saturating_add(1);
        // Settling readings drift down by 50 g steps onto the final value.
        let kg = self.weight_kg + remaining as f32 * 0.05;
        let [hi, lo] = util::encode_weight(kg);
        Some(Advertisement {
            address: self.address,
            manufacturer_data: vec![0xff, 0xff, hi, lo],
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    #[test]
    fn simulated_ultrasonic_settles_on_distance() {
        let mut s = SimulatedUltrasonic::new(20, 2);
        let t = Duration::from_millis(30);
        let first = s.pulse_duration_us(t).unwrap();
        let _ = s.pulse_duration_us(t).unwrap();
        let third = s.pulse_duration_us(t).unwrap();
        let fourth = s.pulse_duration_us(t).unwrap();
        assert!(first > third);
        assert_eq!(third, fourth);
        assert_eq!(third, util::pulse_for_distance_us(20));
    }

    #[test]
    fn simulated_scale_is_silent_until_started() {
        let mac: MacAddress = "28:29:47:39:32:70".parse().unwrap();
        let mut s = SimulatedScale::new(mac, 62.34, 0);
        assert!(s.poll().is_none());
        s.start().unwrap();
        let adv = s.poll().unwrap();
        assert_eq!(adv.address, mac);
        assert_eq!(adv.manufacturer_data, vec![0xff, 0xff, 0x18, 0x5A]);
    }
}
