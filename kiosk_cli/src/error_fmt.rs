//! Human-readable error descriptions and structured JSON error formatting.

use kiosk_core::error::{BuildError, KioskError};

/// Map an eyre::Report to a human-readable explanation with likely causes and fix hints.
pub fn humanize(err: &eyre::Report) -> String {
    // Typed matches first
    if let Some(be) = err.downcast_ref::<BuildError>() {
        return match be {
            BuildError::MissingUltrasonic => {
                "What happened: No ultrasonic sensor was provided to the controller.\nLikely causes: The sensor failed to initialize or was not wired into the builder.\nHow to fix: Ensure the sensor is created successfully and passed via with_ultrasonic(...).".to_string()
            }
            BuildError::MissingScanner => {
                "What happened: No BLE scanner was provided to the controller.\nLikely causes: The scanner backend was not wired into the builder.\nHow to fix: Pass a scanner via with_scanner(...), or use --ble-feed.".to_string()
            }
            BuildError::MissingReporter => {
                "What happened: No reporter was provided to the controller.\nLikely causes: The HTTP reporter was not wired into the builder.\nHow to fix: Pass a reporter via with_reporter(...).".to_string()
            }
            BuildError::MissingWeightCfg => {
                "What happened: The scale address is not configured.\nLikely causes: The [weight] section is missing.\nHow to fix: Set weight.scale_mac in the config.".to_string()
            }
            BuildError::InvalidConfig(msg) => format!(
                "What happened: Invalid configuration ({msg}).\nLikely causes: Missing or out-of-range values in the TOML.\nHow to fix: Edit the config file, then rerun. See etc/kiosk_config.toml for a sample."
            ),
        };
    }

    if let Some(ke) = err.downcast_ref::<KioskError>() {
        return match ke {
            KioskError::BleUnavailable(why) => format!(
                "What happened: Bluetooth could not be started ({why}).\nLikely causes: No adapter, adapter powered off, or an unreadable advertisement feed.\nHow to fix: Check the adapter (or the --ble-feed path) and restart the kiosk."
            ),
            KioskError::Config(why) => format!(
                "What happened: The configuration could not be loaded.\nLikely causes: {why}\nHow to fix: Edit the TOML config (or pass --config <FILE>) and try again."
            ),
            KioskError::Hardware(why) => format!(
                "What happened: Hardware initialization failed ({why}).\nLikely causes: Incorrect pin numbers or insufficient GPIO permissions.\nHow to fix: Fix the [pins] values in the config; ensure the process has permission to access GPIO."
            ),
            KioskError::MalformedAdvertisement { len } => format!(
                "What happened: The manufacturer data has {len} byte(s); the scale sends at least 4.\nLikely causes: Truncated capture or a different device.\nHow to fix: Pass the full payload, e.g. `kiosk decode ffff185a`."
            ),
            // Fallback to generic for other domain errors
            other => format!(
                "What happened: {other}.\nLikely causes: See logs.\nHow to fix: Re-run with --log-level=debug or set RUST_LOG for more detail."
            ),
        };
    }

    // String-based heuristics for errors coming from init
    let msg = err.to_string();
    let lower = msg.to_ascii_lowercase();

    if lower.contains("hex") {
        return format!(
            "What happened: The payload is not valid hex ({msg}).\nHow to fix: Pass pairs of hex digits, e.g. `kiosk decode 0000012c`."
        );
    }

    if lower.contains("ble feed") {
        return format!(
            "What happened: The advertisement feed could not be opened ({msg}).\nHow to fix: Check the --ble-feed path, or use '-' for stdin."
        );
    }

    // Generic fallback
    let mut cause = String::new();
    if let Some(src) = err.source() {
        cause = format!(" Cause: {src}");
    }
    format!(
        "Something went wrong.{cause}\nHow to fix: Re-run with --log-level=debug for details. Original: {msg}"
    )
}

/// Stable short name for the error class, used in JSON output.
pub fn reason_name(err: &eyre::Report) -> &'static str {
    if err.downcast_ref::<BuildError>().is_some() {
        return "Build";
    }
    match err.downcast_ref::<KioskError>() {
        Some(KioskError::Connectivity(_)) => "Connectivity",
        Some(KioskError::RemoteRejection(_)) => "RemoteRejection",
        Some(KioskError::SensorFault(_)) => "SensorFault",
        Some(KioskError::MalformedAdvertisement { .. }) => "MalformedAdvertisement",
        Some(KioskError::BleUnavailable(_)) => "BleUnavailable",
        Some(KioskError::Hardware(_)) => "Hardware",
        Some(KioskError::Config(_)) => "Config",
        Some(KioskError::State(_)) => "State",
        None => "Error",
    }
}

/// Map error classes to stable exit codes; anything unclassified returns 1.
pub fn exit_code_for_error(err: &eyre::Report) -> i32 {
    if err.downcast_ref::<BuildError>().is_some() {
        return 2;
    }
    match err.downcast_ref::<KioskError>() {
        Some(KioskError::Config(_)) => 2,
        Some(KioskError::BleUnavailable(_)) => 3,
        Some(KioskError::Hardware(_)) => 4,
        Some(KioskError::MalformedAdvertisement { .. }) => 5,
        _ => 1,
    }
}

/// Structured JSON for errors when --json is enabled.
pub fn format_error_json(err: &eyre::Report) -> String {
    serde_json::json!({
        "reason": reason_name(err),
        "exit_code": exit_code_for_error(err),
        "message": humanize(err),
    })
    .to_string()
}
