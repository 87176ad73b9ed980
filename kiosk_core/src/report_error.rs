//! Maps `Box<dyn Error>` from trait boundaries to typed `KioskError`.
//!
//! The traits in `kiosk_traits` use `Box<dyn Error + Send + Sync>` so backends
//! stay free of core types; this module converts those to the kiosk taxonomy,
//! with an optional feature-gated path for `kiosk_hardware::HwError` downcasting.

use crate::error::KioskError;

/// Map a trait-boundary error to a typed `KioskError`.
///
/// Attempts to downcast known hardware error types first, then falls back
/// to string-based heuristics.
pub fn map_trait_error(e: &(dyn std::error::Error + 'static)) -> KioskError {
    if let Some(k) = e.downcast_ref::<KioskError>() {
        return k.clone();
    }

    #[cfg(feature = "hardware-errors")]
    {
        use kiosk_hardware::error::HwError;
        if let Some(hw) = e.downcast_ref::<HwError>() {
            return match hw {
                HwError::Status(code) => KioskError::RemoteRejection(format!("HTTP {code}")),
                HwError::Connect { .. } | HwError::Io(_) => {
                    KioskError::Connectivity(hw.to_string())
                }
                HwError::Protocol(_) => KioskError::RemoteRejection(hw.to_string()),
                HwError::EchoTimeout => KioskError::SensorFault(hw.to_string()),
                other => KioskError::Hardware(other.to_string()),
            };
        }
    }

    // Fallback: string-based detection
    let s = e.to_string();
    let lower = s.to_lowercase();
    if lower.contains("http") || lower.contains("status") {
        KioskError::RemoteRejection(s)
    } else if lower.contains("connect") || lower.contains("refused") || lower.contains("unreachable")
    {
        KioskError::Connectivity(s)
    } else if lower.contains("timeout") || lower.contains("echo") {
        KioskError::SensorFault(s)
    } else {
        KioskError::Hardware(s)
    }
}
