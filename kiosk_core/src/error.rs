use thiserror::Error;

#[derive(Debug, Error, Clone, PartialEq)]
pub enum KioskError {
    #[error("connectivity failure: {0}")]
    Connectivity(String),
    #[error("remote rejected request: {0}")]
    RemoteRejection(String),
    #[error("ultrasonic sensor fault: {0}")]
    SensorFault(String),
    #[error("malformed advertisement: {len} bytes of manufacturer data, need 4")]
    MalformedAdvertisement { len: usize },
    #[error("BLE unavailable: {0}")]
    BleUnavailable(String),
    #[error("hardware error: {0}")]
    Hardware(String),
    #[error("configuration error: {0}")]
    Config(String),
    #[error("invalid state: {0}")]
    State(String),
}

#[derive(Debug, Error, Clone)]
pub enum BuildError {
    #[error("missing ultrasonic sensor")]
    MissingUltrasonic,
    #[error("missing BLE scanner")]
    MissingScanner,
    #[error("missing reporter")]
    MissingReporter,
    #[error("missing weight config (scale address)")]
    MissingWeightCfg,
    #[error("invalid config: {0}")]
    InvalidConfig(&'static str),
}

pub type Result<T> = eyre::Result<T>;
pub use eyre::Report;
