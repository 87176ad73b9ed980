#![no_main]
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    // Raw manufacturer data: short payloads are rejected, everything else decodes in range.
    match kiosk_core::decode_weight(data) {
        Ok(kg) => assert!((0.0..=655.35).contains(&kg)),
        Err(_) => assert!(data.len() < 4),
    }

    // The same bytes as a feed line must never panic the parser.
    if let Ok(line) = std::str::from_utf8(data) {
        let _ = kiosk_hardware::feed::parse_feed_line(1, line);
    }
});
