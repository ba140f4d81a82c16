use std::time::Duration;

pub const PROGRESS_COMPLETE: f64 = 100.0;

/// Largest single-tick increment, in percentage points.
pub const MAX_INCREMENT: f64 = 10.0;

/// Timers driving the demo.
#[derive(Debug, Clone, Copy)]
pub struct DemoTiming {
    /// Splash shown between start and the remediation view.
    pub splash_delay: Duration,
    pub tick_interval: Duration,
    /// Pause between reaching 100% and flagging completion.
    pub completion_delay: Duration,
    /// Progress snaps to 100% after this many ticks.
    pub max_ticks: u32,
}

impl Default for DemoTiming {
    fn default() -> Self {
        Self {
            splash_delay: Duration::from_millis(2000),
            tick_interval: Duration::from_millis(500),
            completion_delay: Duration::from_millis(500),
            max_ticks: 100,
        }
    }
}

/// One progress tick: add `unit * MAX_INCREMENT`, clamped at 100.
pub fn advance(current: f64, unit: f64) -> f64 {
    (current + unit.clamp(0.0, 1.0) * MAX_INCREMENT).min(PROGRESS_COMPLETE)
}

/// Number of steps shown as done at `progress` percent.
///
/// Step `i` of `total` is done once progress passes `i / total * 100`.
pub fn steps_completed(progress: f64, total: usize) -> usize {
    (0..total)
        .filter(|&i| progress > i as f64 / total as f64 * 100.0)
        .count()
}
