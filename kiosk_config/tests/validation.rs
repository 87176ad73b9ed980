use kiosk_config::load_toml;
use rstest::rstest;

fn with_overrides(extra: &str) -> String {
    format!(
        r#"
[device]
id = "IOT_001"

[weight]
scale_mac = "28:29:47:39:32:70"
lock_ms = 4000

{extra}
"#
    )
}

#[rstest]
#[case("[height]\nmax_cm = 0", "height.max_cm")]
#[case("[height]\nlock_ms = 0", "height.lock_ms must be >= 1")]
#[case("[height]\necho_timeout_ms = 0", "height.echo_timeout_ms")]
#[case("[network]\nserver = \"no-port\"", "network.server must be host:port")]
#[case("[network]\nserver = \"host:notaport\"", "network.server must be host:port")]
#[case("[network]\nconnect_attempts = 0", "network.connect_attempts")]
#[case("[display]\ncols = 4", "display.cols")]
#[case("[pins]\ntrig = 5\necho = 5", "pins.trig and pins.echo must differ")]
#[case("[runner]\ntick_ms = 0", "runner.tick_ms")]
#[case("[logging]\nrotation = \"weekly\"", "logging.rotation")]
#[case("[simulation]\nweight_kg = 700.0", "simulation.weight_kg")]
fn rejects_out_of_range(#[case] extra: &str, #[case] needle: &str) {
    let cfg = load_toml(&with_overrides(extra)).expect("parse TOML");
    let err = cfg.validate().expect_err("should reject");
    let msg = format!("{err}");
    assert!(msg.contains(needle), "expected {needle:?} in {msg:?}");
}

#[test]
fn rejects_bad_device_id() {
    let toml = r#"
[device]
id = "IOT/001"

[weight]
scale_mac = "28:29:47:39:32:70"
"#;
    let cfg = load_toml(toml).expect("parse TOML");
    let err = cfg.validate().expect_err("slash in id");
    assert!(format!("{err}").contains("device.id"));
}

#[test]
fn rejects_bad_scale_mac() {
    let toml = r#"
[device]
id = "IOT_001"

[weight]
scale_mac = "28:29:47:39:32"
"#;
    let cfg = load_toml(toml).expect("parse TOML");
    let err = cfg.validate().expect_err("short mac");
    assert!(format!("{err}").contains("weight.scale_mac"));
}

#[test]
fn accepts_full_config() {
    let toml = r#"
[device]
id = "IOT_001"

[network]
ssid = "kiosk"
password = "secret"
server = "192.168.1.100:5000"
connect_attempts = 20
connect_retry_ms = 1000
request_timeout_ms = 3000

[height]
max_cm = 150
lock_ms = 4000
sample_interval_ms = 1000
echo_timeout_ms = 30

[weight]
scale_mac = "28:29:47:39:32:70"
lock_ms = 4000
lock_on_silence = true

[display]
cols = 12
rows = 2
outcome_dwell_ms = 3000
result_dwell_ms = 4000

[pins]
trig = 23
echo = 24

[runner]
tick_ms = 50

[logging]
file = "kiosk.log"
level = "debug"
rotation = "daily"
"#;
    let cfg = load_toml(toml).expect("parse TOML");
    cfg.validate().expect("valid config should pass");
    assert!(cfg.weight.lock_on_silence);
    assert_eq!(cfg.display.cols, 12);
    assert_eq!(cfg.network.ssid.as_deref(), Some("kiosk"));
    assert_eq!(cfg.network.password.as_deref(), Some("secret"));
}

#[test]
fn load_file_reports_path_on_parse_error() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("broken.toml");
    std::fs::write(&path, "[device\nid = 1").unwrap();
    let err = kiosk_config::load_file(&path).expect_err("broken toml");
    assert!(format!("{err}").contains("broken.toml"));
}

#[test]
fn load_file_validates() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("cfg.toml");
    std::fs::write(&path, with_overrides("[height]\nmax_cm = 900")).unwrap();
    let err = kiosk_config::load_file(&path).expect_err("invalid max_cm");
    assert!(format!("{err}").contains("height.max_cm"));
}
