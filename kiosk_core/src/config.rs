//! Runtime configuration for the measurement stages and the cycle controller.
//!
//! These are separate from the TOML-deserialized config in `kiosk_config`;
//! see `conversions` for the mapping.

use kiosk_traits::MacAddress;

/// Height stage settings.
#[derive(Debug, Clone)]
pub struct HeightCfg {
    /// Sensor mounting height; heights are clamped to `[0, max_height_cm]`.
    pub max_height_cm: u32,
    /// Stability window: unchanged this long before lock.
    pub lock_ms: u64,
    /// Minimum spacing between pings; 0 pings on every tick.
    pub sample_interval_ms: u64,
    /// Max echo wait per ping.
    pub echo_timeout_ms: u64,
}

impl Default for HeightCfg {
    fn default() -> Self {
        Self {
            max_height_cm: 150,
            lock_ms: 4000,
            sample_interval_ms: 1000,
            echo_timeout_ms: 30,
        }
    }
}

/// Weight stage settings. No default: the scale address is site-specific.
#[derive(Debug, Clone)]
pub struct WeightCfg {
    pub scale_mac: MacAddress,
    pub lock_ms: u64,
    /// Evaluate the lock window on ticks without a usable advertisement.
    pub lock_on_silence: bool,
}

impl WeightCfg {
    pub fn new(scale_mac: MacAddress) -> Self {
        Self {
            scale_mac,
            lock_ms: 4000,
            lock_on_silence: false,
        }
    }
}

/// Boot-time association settings.
#[derive(Debug, Clone)]
pub struct NetworkCfg {
    pub connect_attempts: u32,
    pub connect_retry_ms: u64,
}

impl Default for NetworkCfg {
    fn default() -> Self {
        Self {
            connect_attempts: 20,
            connect_retry_ms: 1000,
        }
    }
}

/// Result display pacing and device identity.
#[derive(Debug, Clone)]
pub struct CycleCfg {
    pub device_id: String,
    /// Display width used for text fitting.
    pub cols: u8,
    pub outcome_dwell_ms: u64,
    pub result_dwell_ms: u64,
}

impl Default for CycleCfg {
    fn default() -> Self {
        Self {
            device_id: "IOT_001".to_string(),
            cols: 16,
            outcome_dwell_ms: 3000,
            result_dwell_ms: 4000,
        }
    }
}
