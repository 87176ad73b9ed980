//! Boot-time network association.

use std::time::Duration;

use kiosk_traits::{Clock, Link};

use crate::config::NetworkCfg;
use crate::error::KioskError;
use crate::report_error::map_trait_error;

/// Start the link and wait for it to come up, checking once per retry delay.
///
/// Blocks for at most `connect_attempts × connect_retry_ms`. Returns whether
/// the link is up; a down link means offline mode until restart.
pub fn associate(link: &mut dyn Link, clock: &dyn Clock, cfg: &NetworkCfg) -> bool {
    if let Err(e) = link.begin() {
        let err = map_trait_error(&*e);
        tracing::warn!(error = %err, "link start failed; running offline");
        return false;
    }
    let retry = Duration::from_millis(cfg.connect_retry_ms);
    for attempt in 0..cfg.connect_attempts {
        if link.is_connected() {
            tracing::info!(attempt, addr = ?link.local_addr(), "link up");
            return true;
        }
        clock.sleep(retry);
    }
    if link.is_connected() {
        tracing::info!(addr = ?link.local_addr(), "link up");
        return true;
    }
    let err = KioskError::Connectivity(format!(
        "link not up after {} attempts",
        cfg.connect_attempts
    ));
    tracing::warn!(error = %err, "running offline");
    false
}

#[cfg(test)]
mod tests {
    use super::*;
    use kiosk_traits::clock::ManualClock;

    struct SlowLink {
        up_after: u32,
        checks: u32,
    }

    impl Link for SlowLink {
        fn begin(&mut self) -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
            Ok(())
        }
        fn is_connected(&mut self) -> bool {
            self.checks += 1;
            self.checks > self.up_after
        }
    }

    #[test]
    fn waits_for_link() {
        let clock = ManualClock::new();
        let mut link = SlowLink { up_after: 3, checks: 0 };
        assert!(associate(&mut link, &clock, &NetworkCfg::default()));
        assert_eq!(link.checks, 4);
        assert_eq!(clock.ms_since(clock.origin()), 3000);
    }

    #[test]
    fn gives_up_after_bounded_attempts() {
        let clock = ManualClock::new();
        let mut link = SlowLink { up_after: u32::MAX, checks: 0 };
        let cfg = NetworkCfg { connect_attempts: 5, connect_retry_ms: 200 };
        assert!(!associate(&mut link, &clock, &cfg));
        assert_eq!(clock.ms_since(clock.origin()), 1000);
    }
}
