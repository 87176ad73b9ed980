use std::time::{Duration, Instant};

use crate::error::{HwError, Result};

/// Spin until `level()` equals `want`, or fail with `EchoTimeout` once `timeout` expires.
/// Returns the instant the level was observed. Polls without sleeping: echo edges
/// are microseconds apart and a sleep would swamp the measurement.
pub fn wait_for_level(
    mut level: impl FnMut() -> bool,
    want: bool,
    timeout: Duration,
) -> Result<Instant> {
    let deadline = Instant::now() + timeout;
    loop {
        if level() == want {
            return Ok(Instant::now());
        }
        if Instant::now() >= deadline {
            return Err(HwError::EchoTimeout);
        }
        std::hint::spin_loop();
    }
}

/// Echo pulse width in microseconds for an object `distance_cm` away.
/// Inverse of the controller's `duration * 0.034 / 2`, biased half a
/// centimetre up so truncation lands back on `distance_cm`.
pub fn pulse_for_distance_us(distance_cm: u32) -> u64 {
    ((f64::from(distance_cm) + 0.5) / 0.017).round() as u64
}

/// Big-endian scale encoding of a weight: centi-kilograms in a u16.
pub fn encode_weight(kg: f32) -> [u8; 2] {
    let raw = (f64::from(kg) * 100.0).round().clamp(0.0, f64::from(u16::MAX)) as u16;
    raw.to_be_bytes()
}

/// Decode a run of hex digit pairs. `:`, `-` and whitespace between bytes are ignored.
pub fn decode_hex(text: &str) -> std::result::Result<Vec<u8>, hex::FromHexError> {
    let digits: String = text
        .chars()
        .filter(|c| !matches!(c, ':' | '-') && !c.is_whitespace())
        .collect();
    hex::decode(digits)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn decodes_hex_with_separators() {
        assert_eq!(decode_hex("0000012C"), Ok(vec![0, 0, 0x01, 0x2c]));
        assert_eq!(decode_hex("ff:ff-18 5a"), Ok(vec![0xff, 0xff, 0x18, 0x5a]));
        assert_eq!(decode_hex(""), Ok(vec![]));
        assert!(decode_hex("abc").is_err());
        assert!(decode_hex("zz").is_err());
        assert!(decode_hex("é1").is_err());
        assert!(decode_hex("+1+2").is_err());
        assert!(decode_hex("+1+2+3+4").is_err());
    }

    #[test]
    fn pulse_round_trips_through_truncation() {
        for d in [0u32, 1, 20, 99, 150] {
            let p = pulse_for_distance_us(d);
            let back = (p as f64 * 0.034 / 2.0) as u32;
            assert_eq!(back, d, "distance {d} -> pulse {p}");
        }
    }

    #[test]
    fn encodes_centikilograms() {
        assert_eq!(encode_weight(3.0), [0x01, 0x2C]);
        assert_eq!(encode_weight(0.5), [0x00, 0x32]);
        assert_eq!(encode_weight(62.34), [0x18, 0x5A]);
    }
}
