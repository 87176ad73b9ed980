//! Stand-in collaborators for optional builder slots and tests.

use kiosk_traits::{Display, Link};

/// A display that discards everything.
#[derive(Debug, Default, Clone, Copy)]
pub struct NullDisplay;

impl Display for NullDisplay {
    fn clear(&mut self) {}
    fn set_cursor(&mut self, _col: u8, _row: u8) {}
    fn print(&mut self, _text: &str) {}
}

/// A link that is up from the start (wired or pre-associated hosts).
#[derive(Debug, Default, Clone, Copy)]
pub struct AlwaysOnline;

impl Link for AlwaysOnline {
    fn begin(&mut self) -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
        Ok(())
    }
    fn is_connected(&mut self) -> bool {
        true
    }
}
