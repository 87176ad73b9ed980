#![no_main]
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &str| {
    // Parse and validation errors are fine; panics are not.
    if let Ok(cfg) = kiosk_config::load_toml(data) {
        if cfg.validate().is_ok() {
            // A validated config must always convert.
            let _ = kiosk_config::Weight::mac(&cfg.weight).expect("validated mac");
        }
    }
});
