//! Two-line screen layouts.

use kiosk_traits::Display;

#[derive(Debug, Clone, PartialEq)]
pub enum Screen {
    Booting,
    Connecting,
    Online { addr: Option<String> },
    Offline,
    Resetting,
    ResetOk,
    ResetFailed,
    BleStarting,
    BleReady,
    BleFailed,
    Ready,
    HeightReading { cm: u32 },
    HeightLocked { cm: u32 },
    WeightReading { kg: f32 },
    WeightLocked { kg: f32 },
    Sending,
    Submitted { device_id: String },
    SubmitFailed,
    NotSubmitted,
    Result { cm: u32, kg: f32 },
}

impl Screen {
    /// Text for row 0 and row 1, unpadded.
    pub fn lines(&self) -> [String; 2] {
        let (a, b) = match self {
            Self::Booting => ("System start...".into(), String::new()),
            Self::Connecting => ("WiFi connect...".into(), String::new()),
            Self::Online { addr } => ("WiFi OK".into(), addr.clone().unwrap_or_default()),
            Self::Offline => ("WiFi failed".into(), "Offline mode".into()),
            Self::Resetting => ("Reset data...".into(), String::new()),
            Self::ResetOk => ("Reset data...".into(), "Reset OK!".into()),
            Self::ResetFailed => ("Reset data...".into(), "Reset failed!".into()),
            Self::BleStarting => ("Starting BLE...".into(), String::new()),
            Self::BleReady => ("Starting BLE...".into(), "BLE ready".into()),
            Self::BleFailed => ("Starting BLE...".into(), "BLE failed".into()),
            Self::Ready => ("Ready to measure".into(), String::new()),
            Self::HeightReading { cm } => (format!("H: {cm}cm"), "Measuring height".into()),
            Self::HeightLocked { cm } => ("Height LOCK".into(), format!("H: {cm}cm")),
            Self::WeightReading { kg } => (format!("W: {kg:.2}kg"), "Measuring weight".into()),
            Self::WeightLocked { kg } => ("Weight LOCK".into(), format!("W: {kg:.2}kg")),
            Self::Sending => ("Sending data...".into(), String::new()),
            Self::Submitted { device_id } => ("Data sent!".into(), format!("ID:{device_id}")),
            Self::SubmitFailed => ("Send failed!".into(), "Not retried".into()),
            Self::NotSubmitted => ("Reset failed!".into(), "Data not sent".into()),
            Self::Result { cm, kg } => (format!("H:{cm}cm"), format!("W:{kg:.2}kg")),
        };
        [a, b]
    }

    /// Live readouts are redrawn in place without clearing to avoid flicker.
    pub fn is_readout(&self) -> bool {
        matches!(self, Self::HeightReading { .. } | Self::WeightReading { .. })
    }
}

/// Draw `screen` on a `cols`-wide display.
///
/// Readouts overwrite both rows padded with spaces; every other screen clears
/// first. Text longer than the display is truncated.
pub fn show(display: &mut dyn Display, screen: &Screen, cols: u8) {
    let width = usize::from(cols);
    if !screen.is_readout() {
        display.clear();
    }
    for (row, text) in screen.lines().iter().enumerate() {
        if text.is_empty() && !screen.is_readout() {
            continue;
        }
        let fitted: String = if screen.is_readout() {
            format!("{text:<width$}").chars().take(width).collect()
        } else {
            text.chars().take(width).collect()
        };
        display.set_cursor(0, row as u8);
        display.print(&fitted);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::CharDisplay;

    #[test]
    fn weight_has_two_decimals() {
        let [a, _] = Screen::WeightReading { kg: 3.0 }.lines();
        assert_eq!(a, "W: 3.00kg");
        let [a, b] = Screen::Result { cm: 150, kg: 62.34 }.lines();
        assert_eq!(a, "H:150cm");
        assert_eq!(b, "W:62.34kg");
    }

    #[test]
    fn readout_pads_over_previous_text() {
        let mut d = CharDisplay::new(16, 2);
        show(&mut d, &Screen::HeightReading { cm: 123 }, 16);
        show(&mut d, &Screen::HeightReading { cm: 9 }, 16);
        assert_eq!(d.line(0), "H: 9cm          ");
    }

    #[test]
    fn truncates_to_width() {
        let mut d = CharDisplay::new(12, 2);
        show(&mut d, &Screen::Ready, 12);
        assert_eq!(d.line(0).trim_end(), "Ready to mea");
    }

    #[test]
    fn non_readout_clears_previous_rows() {
        let mut d = CharDisplay::new(16, 2);
        show(&mut d, &Screen::Offline, 16);
        show(&mut d, &Screen::Sending, 16);
        assert_eq!(d.line(0).trim_end(), "Sending data...");
        assert_eq!(d.line(1).trim_end(), "");
    }
}
