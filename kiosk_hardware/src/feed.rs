//! Line-oriented advertisement feed.
//!
//! A background thread reads `<MAC> <hex manufacturer data>` lines from any
//! reader (a capture file, a pipe from a BLE sniffer, stdin) and pushes parsed
//! advertisements into a bounded channel, waiting whenever it is full. The controller drains it through the
//! non-blocking `BleScanner::poll`.
//!
//! Each `FeedScanner` owns at most one reader thread. The thread exits on EOF,
//! on shutdown, or once the scanner is dropped and the channel disconnects.
use crossbeam_channel as xch;
use kiosk_traits::{Advertisement, BleScanner, MacAddress};
use std::io::BufRead;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use crate::error::{HwError, Result};
use crate::util::decode_hex;

/// Advertisements buffered between the reader thread and the controller.
const FEED_CAPACITY: usize = 64;

/// Parse one feed line. Blank lines and `#` comments yield `Ok(None)`.
pub fn parse_feed_line(line_no: usize, line: &str) -> Result<Option<Advertisement>> {
    let line = line.split('#').next().unwrap_or_default().trim();
    if line.is_empty() {
        return Ok(None);
    }
    let mut parts = line.split_whitespace();
    let (Some(mac), hex) = (parts.next(), parts.next().unwrap_or_default()) else {
        return Ok(None);
    };
    let address = mac.parse::<MacAddress>().map_err(|e| HwError::Feed {
        line: line_no,
        reason: e.to_string(),
    })?;
    let manufacturer_data = decode_hex(hex).map_err(|e| HwError::Feed {
        line: line_no,
        reason: e.to_string(),
    })?;
    Ok(Some(Advertisement {
        address,
        manufacturer_data,
    }))
}

pub struct FeedScanner {
    source: Option<Box<dyn BufRead + Send>>,
    rx: Option<xch::Receiver<Advertisement>>,
    shutdown: Arc<AtomicBool>,
    join_handle: Option<std::thread::JoinHandle<()>>,
}

impl FeedScanner {
    pub fn new(source: impl BufRead + Send + 'static) -> Self {
        Self {
            source: Some(Box::new(source)),
            rx: None,
            shutdown: Arc::new(AtomicBool::new(false)),
            join_handle: None,
        }
    }
}

impl BleScanner for FeedScanner {
    fn start(&mut self) -> std::result::Result<(), Box<dyn std::error::Error + Send + Sync>> {
        let Some(source) = self.source.take() else {
            return Err(Box::new(HwError::AlreadyStarted));
        };
        let (tx, rx) = xch::bounded(FEED_CAPACITY);
        let shutdown = self.shutdown.clone();

        let join_handle = std::thread::spawn(move || {
            for (idx, line) in source.lines().enumerate() {
                if shutdown.load(Ordering::Relaxed) {
                    tracing::debug!("feed thread received shutdown signal");
                    break;
                }
                let line = match line {
                    Ok(l) => l,
                    Err(e) => {
                        tracing::warn!(error = %e, "feed read failed; stopping");
                        break;
                    }
                };
                match parse_feed_line(idx + 1, &line) {
                    // Blocks while the buffer is full so a recorded feed is
                    // replayed at the controller's pace, never truncated.
                    Ok(Some(adv)) => {
                        if tx.send(adv).is_err() {
                            tracing::debug!("feed consumer disconnected, exiting thread");
                            break;
                        }
                    }
                    Ok(None) => {}
                    Err(e) => tracing::warn!(error = %e, "skipping feed line"),
                }
            }
            tracing::trace!("feed thread exiting");
        });

        self.rx = Some(rx);
        self.join_handle = Some(join_handle);
        Ok(())
    }

    fn poll(&mut self) -> Option<Advertisement> {
        self.rx.as_ref().and_then(|rx| rx.try_recv().ok())
    }
}

impl Drop for FeedScanner {
    fn drop(&mut self) {
        self.shutdown.store(true, Ordering::Relaxed);
        // Disconnect first so a thread parked on a full channel exits.
        self.rx.take();
        // A reader blocked on stdin cannot be interrupted; only join finished threads.
        if let Some(handle) = self.join_handle.take() {
            if handle.is_finished() {
                if let Err(e) = handle.join() {
                    tracing::warn!(?e, "feed thread panicked");
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_mac_and_payload() {
        let adv = parse_feed_line(1, "28:29:47:39:32:70 ffff012c")
            .unwrap()
            .unwrap();
        assert_eq!(adv.address.to_string(), "28:29:47:39:32:70");
        assert_eq!(adv.manufacturer_data, vec![0xff, 0xff, 0x01, 0x2c]);
    }

    #[test]
    fn skips_blank_and_comment_lines() {
        assert!(parse_feed_line(1, "").unwrap().is_none());
        assert!(parse_feed_line(2, "   # capture start").unwrap().is_none());
    }

    #[test]
    fn missing_payload_is_empty_data() {
        let adv = parse_feed_line(1, "28:29:47:39:32:70").unwrap().unwrap();
        assert!(adv.manufacturer_data.is_empty());
    }

    #[test]
    fn reports_line_number_on_bad_hex() {
        let err = parse_feed_line(7, "28:29:47:39:32:70 zz").unwrap_err();
        assert!(err.to_string().contains("feed line 7"));
        let err = parse_feed_line(8, "28:29:47:39:32:70 abc").unwrap_err();
        assert!(err.to_string().contains("feed line 8"));
    }

    #[test]
    fn long_feed_is_delivered_in_full() {
        let lines: String = (0..200)
            .map(|i| format!("28:29:47:39:32:70 0000{:04x}\n", 1000 + i))
            .collect();
        let mut scanner = FeedScanner::new(std::io::Cursor::new(lines));
        scanner.start().unwrap();

        let mut got = Vec::new();
        let deadline = std::time::Instant::now() + std::time::Duration::from_secs(5);
        while got.len() < 200 && std::time::Instant::now() < deadline {
            match scanner.poll() {
                Some(adv) => got.push(adv),
                None => std::thread::sleep(std::time::Duration::from_millis(1)),
            }
        }
        assert_eq!(got.len(), 200);
        assert_eq!(got[0].manufacturer_data, vec![0, 0, 0x03, 0xe8]);
        assert_eq!(got[199].manufacturer_data, vec![0, 0, 0x04, 0xaf]);
        assert!(scanner.poll().is_none());
    }

    #[test]
    fn drop_releases_reader_parked_on_full_buffer() {
        let lines = "28:29:47:39:32:70 0000012c\n".repeat(FEED_CAPACITY * 4);
        let mut scanner = FeedScanner::new(std::io::Cursor::new(lines));
        scanner.start().unwrap();
        std::thread::sleep(std::time::Duration::from_millis(50));
        let handle = scanner.join_handle.take().unwrap();
        drop(scanner);
        handle.join().unwrap();
    }
}
