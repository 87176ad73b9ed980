use std::time::Duration;
use tracing::trace;

use kiosk_traits::Ultrasonic;

use crate::error::{HwError, Result};
use crate::util::wait_for_level;

/// HC-SR04 on two GPIO lines (BCM numbering).
pub struct HcSr04 {
    trig: rppal::gpio::OutputPin,
    echo: rppal::gpio::InputPin,
}

impl HcSr04 {
    pub fn new(trig_pin: u8, echo_pin: u8) -> Result<Self> {
        let gpio = rppal::gpio::Gpio::new().map_err(|e| HwError::Gpio(e.to_string()))?;
        let mut trig = gpio
            .get(trig_pin)
            .map_err(|e| HwError::Gpio(format!("open trig pin {trig_pin}: {e}")))?
            .into_output();
        let echo = gpio
            .get(echo_pin)
            .map_err(|e| HwError::Gpio(format!("open echo pin {echo_pin}: {e}")))?
            .into_input();
        trig.set_low();
        Ok(Self { trig, echo })
    }

    /// 10 µs trigger pulse, then time the echo high phase.
    pub fn ping(&mut self, timeout: Duration) -> Result<u64> {
        self.trig.set_low();
        spin_delay(Duration::from_micros(2));
        self.trig.set_high();
        spin_delay(Duration::from_micros(10));
        self.trig.set_low();

        let echo = &self.echo;
        let rise = wait_for_level(|| echo.is_high(), true, timeout)?;
        let fall = wait_for_level(|| echo.is_high(), false, timeout)?;
        let us = u64::try_from(fall.saturating_duration_since(rise).as_micros()).unwrap_or(u64::MAX);
        trace!(pulse_us = us, "hc-sr04 echo");
        Ok(us)
    }
}

impl Ultrasonic for HcSr04 {
    fn pulse_duration_us(
        &mut self,
        timeout: Duration,
    ) -> std::result::Result<u64, Box<dyn std::error::Error + Send + Sync>> {
        Ok(self.ping(timeout)?)
    }
}

#[inline(always)]
fn spin_delay(d: Duration) {
    let until = std::time::Instant::now() + d;
    while std::time::Instant::now() < until {
        std::hint::spin_loop();
    }
}
