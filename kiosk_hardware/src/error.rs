use thiserror::Error;

#[derive(Debug, Error)]
pub enum HwError {
    #[error("gpio error: {0}")]
    Gpio(String),
    #[error("echo timeout")]
    EchoTimeout,
    #[error("connect to {addr} failed: {reason}")]
    Connect { addr: String, reason: String },
    #[error("server answered HTTP {0}")]
    Status(u16),
    #[error("malformed HTTP response: {0}")]
    Protocol(String),
    #[error("feed line {line}: {reason}")]
    Feed { line: usize, reason: String },
    #[error("ble scanner already started")]
    AlreadyStarted,
    #[error("io: {0}")]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, HwError>;
