#![cfg_attr(all(not(debug_assertions), not(test)), deny(warnings))]
#![cfg_attr(
    all(not(debug_assertions), not(test)),
    deny(clippy::all, clippy::pedantic, clippy::nursery)
)]
#![allow(clippy::module_name_repetitions, clippy::missing_errors_doc)]
//! Screens shown on the kiosk's character display, plus an in-memory
//! framebuffer implementation of `kiosk_traits::Display`.

pub mod framebuffer;
pub mod screen;

pub use framebuffer::{CharDisplay, ConsoleDisplay};
pub use screen::{Screen, show};
