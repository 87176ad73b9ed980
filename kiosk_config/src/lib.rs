#![cfg_attr(all(not(debug_assertions), not(test)), deny(warnings))]
#![cfg_attr(
    all(not(debug_assertions), not(test)),
    deny(clippy::all, clippy::pedantic, clippy::nursery)
)]
#![allow(clippy::module_name_repetitions, clippy::missing_errors_doc)]
//! Config schema for the measurement kiosk.
//!
//! - `Config` and sub-structs are deserialized from TOML and validated.
//! - Everything except `[device]` and `[weight]` has defaults matching the
//!   deployed kiosk (150 cm mast, 4 s lock windows, 16x2 display).
use kiosk_traits::MacAddress;
use serde::Deserialize;
use std::path::Path;

#[derive(Debug, Deserialize)]
pub struct Device {
    /// Identifier sent with every submission and used in `/reset/{id}`.
    pub id: String,
}

#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct Network {
    pub ssid: Option<String>,
    pub password: Option<String>,
    /// Measurement service as `host:port`.
    pub server: String,
    /// Association attempts before falling back to offline mode.
    pub connect_attempts: u32,
    /// Delay between association attempts (ms).
    pub connect_retry_ms: u64,
    /// Connect/read/write timeout applied to each HTTP call (ms).
    pub request_timeout_ms: u64,
}

impl Default for Network {
    fn default() -> Self {
        Self {
            ssid: None,
            password: None,
            server: "192.168.1.100:5000".to_string(),
            connect_attempts: 20,
            connect_retry_ms: 1000,
            request_timeout_ms: 5000,
        }
    }
}

#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct Height {
    /// Sensor mounting height; measured heights are clamped to [0, max_cm].
    pub max_cm: u32,
    /// Value must stay unchanged this long before it locks.
    pub lock_ms: u64,
    /// Minimum spacing between two pings (ms). 0 pings on every tick.
    pub sample_interval_ms: u64,
    /// Max wait for the echo pulse (ms).
    pub echo_timeout_ms: u64,
}

impl Default for Height {
    fn default() -> Self {
        Self {
            max_cm: 150,
            lock_ms: 4000,
            sample_interval_ms: 1000,
            echo_timeout_ms: 30,
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct Weight {
    /// Only advertisements from this address are decoded.
    pub scale_mac: String,
    #[serde(default = "default_lock_ms")]
    pub lock_ms: u64,
    /// Lock once the window elapses even if the scale stops advertising.
    #[serde(default)]
    pub lock_on_silence: bool,
}

impl Weight {
    pub fn mac(&self) -> eyre::Result<MacAddress> {
        self.scale_mac
            .parse::<MacAddress>()
            .map_err(|e| eyre::eyre!("weight.scale_mac: {e}"))
    }
}

fn default_lock_ms() -> u64 {
    4000
}

#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct DisplayCfg {
    pub cols: u8,
    pub rows: u8,
    /// How long the submit outcome stays up before the final result (ms).
    pub outcome_dwell_ms: u64,
    /// How long the final result stays up before the next cycle (ms).
    pub result_dwell_ms: u64,
}

impl Default for DisplayCfg {
    fn default() -> Self {
        Self {
            cols: 16,
            rows: 2,
            outcome_dwell_ms: 3000,
            result_dwell_ms: 4000,
        }
    }
}

#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct Pins {
    pub trig: u8,
    pub echo: u8,
}

impl Default for Pins {
    fn default() -> Self {
        Self { trig: 23, echo: 24 }
    }
}

#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct RunnerCfg {
    /// Driver loop period (ms).
    pub tick_ms: u64,
}

impl Default for RunnerCfg {
    fn default() -> Self {
        Self { tick_ms: 50 }
    }
}

#[derive(Debug, Deserialize, Default)]
#[serde(default)]
pub struct Logging {
    pub file: Option<String>,  // path to .log (JSON lines)
    pub level: Option<String>, // "info","debug"
    /// Log rotation policy: "never" | "daily" | "hourly" (default: never)
    pub rotation: Option<String>,
}

/// Inputs for the simulated sensors used when the `hardware` feature is off.
#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct Simulation {
    /// Distance from the sensor to the top of the subject's head.
    pub distance_cm: u32,
    pub weight_kg: f32,
    /// Readings before the simulated subject stands still.
    pub settle_samples: u32,
}

impl Default for Simulation {
    fn default() -> Self {
        Self {
            distance_cm: 20,
            weight_kg: 62.34,
            settle_samples: 3,
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct Config {
    pub device: Device,
    #[serde(default)]
    pub network: Network,
    #[serde(default)]
    pub height: Height,
    pub weight: Weight,
    #[serde(default)]
    pub display: DisplayCfg,
    #[serde(default)]
    pub pins: Pins,
    #[serde(default)]
    pub runner: RunnerCfg,
    #[serde(default)]
    pub logging: Logging,
    #[serde(default)]
    pub simulation: Simulation,
}

pub fn load_toml(s: &str) -> Result<Config, toml::de::Error> {
    toml::from_str::<Config>(s)
}

/// Read, parse, and validate a config file.
pub fn load_file(path: &Path) -> eyre::Result<Config> {
    let text = std::fs::read_to_string(path)
        .map_err(|e| eyre::eyre!("read config {}: {e}", path.display()))?;
    let cfg = load_toml(&text).map_err(|e| eyre::eyre!("parse config {}: {e}", path.display()))?;
    cfg.validate()?;
    Ok(cfg)
}

const MAX_WINDOW_MS: u64 = 5 * 60 * 1000;

impl Config {
    pub fn validate(&self) -> eyre::Result<()> {
        // Device
        let id = self.device.id.trim();
        if id.is_empty() {
            eyre::bail!("device.id must not be empty");
        }
        if id.contains('/') || id.contains(char::is_whitespace) {
            eyre::bail!("device.id must not contain '/' or whitespace");
        }

        // Network
        if self.network.server.rsplit_once(':').is_none_or(|(host, port)| {
            host.is_empty() || port.parse::<u16>().is_err()
        }) {
            eyre::bail!("network.server must be host:port");
        }
        if self.network.connect_attempts == 0 {
            eyre::bail!("network.connect_attempts must be >= 1");
        }
        if self.network.connect_retry_ms > 60_000 {
            eyre::bail!("network.connect_retry_ms is unreasonably large (>60s)");
        }
        if self.network.request_timeout_ms == 0 {
            eyre::bail!("network.request_timeout_ms must be >= 1");
        }

        // Height
        if self.height.max_cm == 0 || self.height.max_cm > 500 {
            eyre::bail!("height.max_cm must be in [1, 500]");
        }
        if self.height.lock_ms == 0 {
            eyre::bail!("height.lock_ms must be >= 1");
        }
        if self.height.lock_ms > MAX_WINDOW_MS {
            eyre::bail!("height.lock_ms is unreasonably large (>5min)");
        }
        if self.height.sample_interval_ms > 60_000 {
            eyre::bail!("height.sample_interval_ms is unreasonably large (>60s)");
        }
        if self.height.echo_timeout_ms == 0 || self.height.echo_timeout_ms > 1000 {
            eyre::bail!("height.echo_timeout_ms must be in [1, 1000]");
        }

        // Weight
        self.weight.mac()?;
        if self.weight.lock_ms == 0 {
            eyre::bail!("weight.lock_ms must be >= 1");
        }
        if self.weight.lock_ms > MAX_WINDOW_MS {
            eyre::bail!("weight.lock_ms is unreasonably large (>5min)");
        }

        // Display
        if !(8..=40).contains(&self.display.cols) {
            eyre::bail!("display.cols must be in [8, 40]");
        }
        if !(1..=4).contains(&self.display.rows) {
            eyre::bail!("display.rows must be in [1, 4]");
        }
        if self.display.outcome_dwell_ms > MAX_WINDOW_MS
            || self.display.result_dwell_ms > MAX_WINDOW_MS
        {
            eyre::bail!("display dwell is unreasonably large (>5min)");
        }

        // Pins
        if self.pins.trig == self.pins.echo {
            eyre::bail!("pins.trig and pins.echo must differ");
        }

        // Runner
        if self.runner.tick_ms == 0 || self.runner.tick_ms > 10_000 {
            eyre::bail!("runner.tick_ms must be in [1, 10000]");
        }

        // Logging
        if let Some(rot) = self.logging.rotation.as_deref() {
            if !matches!(rot, "never" | "daily" | "hourly") {
                eyre::bail!("logging.rotation must be one of never|daily|hourly");
            }
        }

        // Simulation
        if !self.simulation.weight_kg.is_finite() || self.simulation.weight_kg < 0.0 {
            eyre::bail!("simulation.weight_kg must be a finite value >= 0");
        }
        if self.simulation.weight_kg > 655.35 {
            eyre::bail!("simulation.weight_kg exceeds the 16-bit scale encoding (655.35)");
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const MINIMAL: &str = r#"
[device]
id = "IOT_001"

[weight]
scale_mac = "28:29:47:39:32:70"
"#;

    #[test]
    fn minimal_config_takes_defaults() {
        let cfg = load_toml(MINIMAL).expect("parse");
        cfg.validate().expect("valid");
        assert_eq!(cfg.height.max_cm, 150);
        assert_eq!(cfg.height.lock_ms, 4000);
        assert_eq!(cfg.weight.lock_ms, 4000);
        assert!(!cfg.weight.lock_on_silence);
        assert_eq!(cfg.network.connect_attempts, 20);
        assert_eq!(cfg.network.connect_retry_ms, 1000);
        assert_eq!(cfg.display.cols, 16);
    }

    #[test]
    fn missing_weight_section_is_a_parse_error() {
        let err = load_toml("[device]\nid = \"X\"\n").expect_err("weight is required");
        assert!(err.to_string().contains("weight"));
    }
}
