//! Advertisement types shared between scanner backends and the weight stage.

use std::fmt;
use std::str::FromStr;

/// 48-bit Bluetooth device address.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct MacAddress(pub [u8; 6]);

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParseMacError(String);

impl fmt::Display for ParseMacError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "invalid MAC address: {}", self.0)
    }
}

impl std::error::Error for ParseMacError {}

impl FromStr for MacAddress {
    type Err = ParseMacError;

    /// Accepts `AA:BB:CC:DD:EE:FF` or `AA-BB-CC-DD-EE-FF`, any case.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let mut out = [0u8; 6];
        let mut n = 0usize;
        for part in s.trim().split([':', '-']) {
            if n == out.len()
                || part.len() != 2
                || !part.bytes().all(|b| b.is_ascii_hexdigit())
            {
                return Err(ParseMacError(s.to_string()));
            }
            out[n] = u8::from_str_radix(part, 16).map_err(|_| ParseMacError(s.to_string()))?;
            n += 1;
        }
        if n != out.len() {
            return Err(ParseMacError(s.to_string()));
        }
        Ok(Self(out))
    }
}

impl fmt::Display for MacAddress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let b = &self.0;
        write!(
            f,
            "{:02x}:{:02x}:{:02x}:{:02x}:{:02x}:{:02x}",
            b[0], b[1], b[2], b[3], b[4], b[5]
        )
    }
}

/// One received advertisement.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Advertisement {
    pub address: MacAddress,
    pub manufacturer_data: Vec<u8>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_colon_and_dash_forms() {
        let a: MacAddress = "28:29:47:39:32:70".parse().unwrap();
        let b: MacAddress = "28-29-47-39-32-70".parse().unwrap();
        assert_eq!(a, b);
        assert_eq!(a.0, [0x28, 0x29, 0x47, 0x39, 0x32, 0x70]);
    }

    #[test]
    fn rejects_signed_octets() {
        assert!("+a:bb:cc:dd:ee:ff".parse::<MacAddress>().is_err());
        assert!("aa:bb:cc:dd:ee:+f".parse::<MacAddress>().is_err());
    }

    #[test]
    fn comparison_ignores_case() {
        let a: MacAddress = "aa:bb:cc:dd:ee:ff".parse().unwrap();
        let b: MacAddress = "AA:BB:CC:DD:EE:FF".parse().unwrap();
        assert_eq!(a, b);
        assert_eq!(a.to_string(), "aa:bb:cc:dd:ee:ff");
    }

    #[test]
    fn rejects_malformed() {
        for bad in ["", "28:29:47:39:32", "28:29:47:39:32:70:11", "zz:29:47:39:32:70", "2:29:47:39:32:70"] {
            assert!(bad.parse::<MacAddress>().is_err(), "accepted {bad:?}");
        }
    }
}
