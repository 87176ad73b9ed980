pub mod ble;
pub mod clock;

pub use ble::{Advertisement, MacAddress, ParseMacError};
pub use clock::{Clock, MonotonicClock};

pub trait Ultrasonic {
    /// Trigger one ping and return the echo pulse width in microseconds.
    /// `Ok(0)` and `Err(_)` both mean no echo arrived within `timeout`.
    fn pulse_duration_us(
        &mut self,
        timeout: std::time::Duration,
    ) -> Result<u64, Box<dyn std::error::Error + Send + Sync>>;
}

pub trait BleScanner {
    /// Bring up the radio and start passive scanning.
    fn start(&mut self) -> Result<(), Box<dyn std::error::Error + Send + Sync>>;
    /// Non-blocking: next buffered advertisement, if any.
    fn poll(&mut self) -> Option<Advertisement>;
}

/// Character display. Writes are fire-and-forget.
pub trait Display {
    fn clear(&mut self);
    fn set_cursor(&mut self, col: u8, row: u8);
    fn print(&mut self, text: &str);
}

/// Network association (WiFi on the device, a reachability probe on hosts).
pub trait Link {
    fn begin(&mut self) -> Result<(), Box<dyn std::error::Error + Send + Sync>>;
    fn is_connected(&mut self) -> bool;
    /// Human-readable local address once connected.
    fn local_addr(&self) -> Option<String> {
        None
    }
}

pub trait Reporter {
    /// `POST /reset/{device_id}`; Ok only on HTTP 200.
    fn reset_device(
        &mut self,
        device_id: &str,
    ) -> Result<(), Box<dyn std::error::Error + Send + Sync>>;
    /// `POST /recive` with `{"bb": weight, "tb": height, "did": device_id}`; Ok only on HTTP 200.
    fn submit_measurement(
        &mut self,
        weight_kg: f32,
        height_cm: f32,
        device_id: &str,
    ) -> Result<(), Box<dyn std::error::Error + Send + Sync>>;
}

// Boxed collaborators are used by the dynamic controller; forward through the box.

impl<T: Ultrasonic + ?Sized> Ultrasonic for Box<T> {
    fn pulse_duration_us(
        &mut self,
        timeout: std::time::Duration,
    ) -> Result<u64, Box<dyn std::error::Error + Send + Sync>> {
        (**self).pulse_duration_us(timeout)
    }
}

impl<T: BleScanner + ?Sized> BleScanner for Box<T> {
    fn start(&mut self) -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
        (**self).start()
    }
    fn poll(&mut self) -> Option<Advertisement> {
        (**self).poll()
    }
}

impl<T: Display + ?Sized> Display for Box<T> {
    fn clear(&mut self) {
        (**self).clear();
    }
    fn set_cursor(&mut self, col: u8, row: u8) {
        (**self).set_cursor(col, row);
    }
    fn print(&mut self, text: &str) {
        (**self).print(text);
    }
}

impl<T: Link + ?Sized> Link for Box<T> {
    fn begin(&mut self) -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
        (**self).begin()
    }
    fn is_connected(&mut self) -> bool {
        (**self).is_connected()
    }
    fn local_addr(&self) -> Option<String> {
        (**self).local_addr()
    }
}

impl<T: Reporter + ?Sized> Reporter for Box<T> {
    fn reset_device(
        &mut self,
        device_id: &str,
    ) -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
        (**self).reset_device(device_id)
    }
    fn submit_measurement(
        &mut self,
        weight_kg: f32,
        height_cm: f32,
        device_id: &str,
    ) -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
        (**self).submit_measurement(weight_kg, height_cm, device_id)
    }
}
