//! Drive a controller from boot until shutdown or a cycle limit.

use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration;

use crate::controller::CycleController;
use crate::error::Result;

/// What a run loop did before it returned.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct RunSummary {
    pub cycles: u64,
    pub ticks: u64,
    /// Stopped by `shutdown` rather than by the cycle limit.
    pub interrupted: bool,
}

/// Boot if needed, then tick every `period` on the controller's clock.
///
/// Returns after `max_cycles` completed cycles or once `shutdown` is set.
/// Boot errors (BLE unavailable) and state errors propagate.
pub fn run(
    controller: &mut CycleController,
    period: Duration,
    shutdown: &AtomicBool,
    max_cycles: Option<u64>,
) -> Result<RunSummary> {
    if !controller.is_booted() {
        controller.boot()?;
    }
    let mut summary = RunSummary::default();
    loop {
        if shutdown.load(Ordering::Relaxed) {
            summary.interrupted = true;
            break;
        }
        if max_cycles.is_some_and(|max| controller.cycles_completed() >= max) {
            break;
        }
        controller.tick()?;
        summary.ticks = summary.ticks.saturating_add(1);
        controller.clock().sleep(period);
    }
    summary.cycles = controller.cycles_completed();
    tracing::info!(
        cycles = summary.cycles,
        ticks = summary.ticks,
        interrupted = summary.interrupted,
        "run loop stopped"
    );
    Ok(summary)
}
