//! Config loading, logging setup, backend assembly and the subcommands.

use std::fs::File;
use std::io::BufReader;
use std::path::Path;
use std::sync::Arc;
use std::sync::atomic::AtomicBool;
use std::time::Duration;

use eyre::WrapErr;
use tracing_subscriber::{EnvFilter, Layer, Registry, fmt, prelude::*};

use kiosk_config::Config;
use kiosk_core::error::{KioskError, Result};
use kiosk_core::{CycleController, RunSummary};
use kiosk_hardware::{FeedScanner, HttpReporter, SimulatedScale, TcpProbeLink};
use kiosk_traits::{BleScanner, Ultrasonic};
use kiosk_ui::ConsoleDisplay;

use crate::cli::FILE_GUARD;

/// Load and validate the TOML config; failures become `KioskError::Config`.
pub fn load_config(path: &Path) -> Result<Config> {
    kiosk_config::load_file(path)
        .map_err(|e| eyre::Report::new(KioskError::Config(format!("{e:#}"))))
}

type BoxedLayer = Box<dyn Layer<Registry> + Send + Sync>;

/// Console logs go to stderr so stdout carries only the display and results.
/// When `logging.file` is set, JSON lines are also written there.
pub fn init_tracing(json: bool, level: &str, logging: Option<&kiosk_config::Logging>) -> Result<()> {
    let console_filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(level))
        .wrap_err_with(|| format!("invalid log level '{level}'"))?;
    let mut layers: Vec<BoxedLayer> = Vec::new();
    if json {
        layers.push(
            fmt::layer()
                .json()
                .with_writer(std::io::stderr)
                .with_filter(console_filter)
                .boxed(),
        );
    } else {
        layers.push(
            fmt::layer()
                .with_target(false)
                .with_writer(std::io::stderr)
                .with_filter(console_filter)
                .boxed(),
        );
    }

    if let Some(log) = logging {
        if let Some(file) = log.file.as_deref() {
            let path = Path::new(file);
            let dir = path
                .parent()
                .filter(|p| !p.as_os_str().is_empty())
                .unwrap_or_else(|| Path::new("."));
            let name = path
                .file_name()
                .ok_or_else(|| eyre::eyre!("logging.file must name a file: {file}"))?;
            let appender = match log.rotation.as_deref().unwrap_or("never") {
                "daily" => tracing_appender::rolling::daily(dir, name),
                "hourly" => tracing_appender::rolling::hourly(dir, name),
                _ => tracing_appender::rolling::never(dir, name),
            };
            let (writer, guard) = tracing_appender::non_blocking(appender);
            let _ = FILE_GUARD.set(guard);
            let file_level = log.level.as_deref().unwrap_or("info");
            let file_filter = EnvFilter::try_new(file_level)
                .wrap_err_with(|| format!("invalid logging.level '{file_level}'"))?;
            layers.push(
                fmt::layer()
                    .json()
                    .with_ansi(false)
                    .with_writer(writer)
                    .with_filter(file_filter)
                    .boxed(),
            );
        }
    }

    tracing_subscriber::registry()
        .with(layers)
        .try_init()
        .wrap_err("install tracing subscriber")?;
    Ok(())
}

fn ultrasonic(cfg: &Config) -> Result<Box<dyn Ultrasonic>> {
    #[cfg(all(feature = "hardware", target_os = "linux"))]
    {
        let sensor = kiosk_hardware::hcsr04::HcSr04::new(cfg.pins.trig, cfg.pins.echo)
            .map_err(|e| eyre::Report::new(KioskError::Hardware(e.to_string())))?;
        tracing::info!(trig = cfg.pins.trig, echo = cfg.pins.echo, "HC-SR04 ready");
        Ok(Box::new(sensor))
    }
    #[cfg(not(all(feature = "hardware", target_os = "linux")))]
    {
        tracing::info!(distance_cm = cfg.simulation.distance_cm, "simulated ultrasonic");
        Ok(Box::new(kiosk_hardware::SimulatedUltrasonic::new(
            cfg.simulation.distance_cm,
            cfg.simulation.settle_samples,
        )))
    }
}

fn scanner(cfg: &Config, ble_feed: Option<&Path>) -> Result<Box<dyn BleScanner>> {
    match ble_feed {
        Some(p) if p.as_os_str() == "-" => {
            tracing::info!("advertisements from stdin");
            Ok(Box::new(FeedScanner::new(BufReader::new(std::io::stdin()))))
        }
        Some(p) => {
            let file = File::open(p).wrap_err_with(|| format!("open ble feed {}", p.display()))?;
            tracing::info!(path = %p.display(), "advertisements from feed file");
            Ok(Box::new(FeedScanner::new(BufReader::new(file))))
        }
        None => Ok(Box::new(SimulatedScale::new(
            cfg.weight.mac()?,
            cfg.simulation.weight_kg,
            cfg.simulation.settle_samples,
        ))),
    }
}

fn request_timeout(cfg: &Config) -> Duration {
    Duration::from_millis(cfg.network.request_timeout_ms)
}

/// Assemble the controller from config and backends.
pub fn build_controller(cfg: &Config, ble_feed: Option<&Path>) -> Result<CycleController> {
    let server = cfg.network.server.clone();
    CycleController::builder()
        .with_ultrasonic(ultrasonic(cfg)?)
        .with_scanner(scanner(cfg, ble_feed)?)
        .with_reporter(HttpReporter::new(server.clone(), request_timeout(cfg)))
        .with_link(TcpProbeLink::new(server, request_timeout(cfg)))
        .with_display(ConsoleDisplay::new(cfg.display.cols, cfg.display.rows))
        .with_height_cfg((&cfg.height).into())
        .with_weight_cfg((&cfg.weight).try_into()?)
        .with_network_cfg((&cfg.network).into())
        .with_cycle_cfg(cfg.into())
        .build()
}

pub fn run_kiosk(
    cfg: &Config,
    max_cycles: Option<u64>,
    ble_feed: Option<&Path>,
    shutdown: Arc<AtomicBool>,
) -> Result<RunSummary> {
    let mut ctrl = build_controller(cfg, ble_feed)?;
    tracing::info!(
        device_id = %cfg.device.id,
        server = %cfg.network.server,
        ssid = cfg.network.ssid.as_deref().unwrap_or("-"),
        password_set = cfg.network.password.is_some(),
        "kiosk start"
    );
    let summary = kiosk_core::run(
        &mut ctrl,
        Duration::from_millis(cfg.runner.tick_ms),
        &shutdown,
        max_cycles,
    )?;
    if let Some(outcome) = ctrl.last_outcome() {
        tracing::info!(?outcome, "last cycle outcome");
    }
    Ok(summary)
}

/// Result of one self-check probe.
#[derive(Debug)]
pub struct Probe {
    pub name: &'static str,
    pub ok: bool,
    pub detail: String,
}

/// Ping the sensor once, start the scanner and probe the server.
///
/// Only a scanner failure is an error; the kiosk can still measure without
/// the sensor echo or the server.
pub fn self_check(cfg: &Config) -> Result<Vec<Probe>> {
    let mut probes = Vec::new();

    let mut sensor = ultrasonic(cfg)?;
    let timeout = Duration::from_millis(cfg.height.echo_timeout_ms);
    probes.push(match sensor.pulse_duration_us(timeout) {
        Ok(us) if us > 0 => {
            let cm = kiosk_core::height_cm(kiosk_core::distance_cm(us), cfg.height.max_cm);
            Probe {
                name: "ultrasonic",
                ok: true,
                detail: format!("{us} us echo, height {cm} cm"),
            }
        }
        Ok(_) => Probe {
            name: "ultrasonic",
            ok: false,
            detail: "no echo".into(),
        },
        Err(e) => Probe {
            name: "ultrasonic",
            ok: false,
            detail: e.to_string(),
        },
    });

    let mut ble = scanner(cfg, None)?;
    ble.start()
        .map_err(|e| eyre::Report::new(KioskError::BleUnavailable(e.to_string())))?;
    probes.push(Probe {
        name: "ble",
        ok: true,
        detail: format!("scanning for {}", cfg.weight.mac()?),
    });

    let mut link = TcpProbeLink::new(cfg.network.server.clone(), request_timeout(cfg));
    let reachable = kiosk_traits::Link::is_connected(&mut link);
    probes.push(Probe {
        name: "server",
        ok: reachable,
        detail: if reachable {
            format!("{} reachable", cfg.network.server)
        } else {
            format!("{} unreachable", cfg.network.server)
        },
    });

    Ok(probes)
}

/// Decode hex manufacturer data to kilograms.
pub fn decode(hex: &str) -> Result<f32> {
    let data = kiosk_hardware::util::decode_hex(hex)
        .map_err(|why| eyre::eyre!("invalid hex payload: {why}"))?;
    Ok(kiosk_core::decode_weight(&data)?)
}
