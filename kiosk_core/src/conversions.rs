//! `From` implementations bridging `kiosk_config` types to `kiosk_core` types.

use crate::config::{CycleCfg, HeightCfg, NetworkCfg, WeightCfg};

// ── HeightCfg ────────────────────────────────────────────────────────────────

impl From<&kiosk_config::Height> for HeightCfg {
    fn from(c: &kiosk_config::Height) -> Self {
        Self {
            max_height_cm: c.max_cm,
            lock_ms: c.lock_ms,
            sample_interval_ms: c.sample_interval_ms,
            echo_timeout_ms: c.echo_timeout_ms,
        }
    }
}

// ── WeightCfg ────────────────────────────────────────────────────────────────

impl TryFrom<&kiosk_config::Weight> for WeightCfg {
    type Error = eyre::Report;
    fn try_from(c: &kiosk_config::Weight) -> Result<Self, Self::Error> {
        Ok(Self {
            scale_mac: c.mac()?,
            lock_ms: c.lock_ms,
            lock_on_silence: c.lock_on_silence,
        })
    }
}

// ── NetworkCfg ───────────────────────────────────────────────────────────────

impl From<&kiosk_config::Network> for NetworkCfg {
    fn from(c: &kiosk_config::Network) -> Self {
        Self {
            connect_attempts: c.connect_attempts,
            connect_retry_ms: c.connect_retry_ms,
        }
    }
}

// ── CycleCfg ─────────────────────────────────────────────────────────────────

impl From<&kiosk_config::Config> for CycleCfg {
    fn from(c: &kiosk_config::Config) -> Self {
        Self {
            device_id: c.device.id.trim().to_string(),
            cols: c.display.cols,
            outcome_dwell_ms: c.display.outcome_dwell_ms,
            result_dwell_ms: c.display.result_dwell_ms,
        }
    }
}
