use std::sync::atomic::{AtomicUsize, Ordering};

/// Source of the uniform draws behind the simulated metrics.
pub trait RandomSource: Send + Sync {
    /// A value in `[0, 1)`.
    fn next_unit(&self) -> f64;
}

/// Thread-local RNG from `rand`.
#[derive(Debug, Default, Clone, Copy)]
pub struct ThreadRandom;

impl RandomSource for ThreadRandom {
    fn next_unit(&self) -> f64 {
        rand::random::<f64>()
    }
}

/// Replays a fixed sequence of draws, cycling when exhausted.
#[derive(Debug)]
pub struct SequenceRandom {
    values: Vec<f64>,
    cursor: AtomicUsize,
}

impl SequenceRandom {
    /// Values are clamped into `[0, 1)`.
    pub fn new(values: Vec<f64>) -> Self {
        let values = values.into_iter()
            .map(|v| v.clamp(0.0, 1.0 - f64::EPSILON))
            .collect();
        Self { values, cursor: AtomicUsize::new(0) }
    }
}

impl RandomSource for SequenceRandom {
    fn next_unit(&self) -> f64 {
        if self.values.is_empty() {
            return 0.0;
        }
        let i = self.cursor.fetch_add(1, Ordering::Relaxed);
        self.values[i % self.values.len()]
    }
}

pub const TTR_MULTIPLIER_MIN: f64 = 1.5;
pub const TTR_MULTIPLIER_MAX: f64 = 3.0;

/// Multiplier for the simulated no-system TTR, uniform in `[1.5, 3.0)`.
pub fn ttr_multiplier(rng: &dyn RandomSource) -> f64 {
    let m = TTR_MULTIPLIER_MIN + rng.next_unit() * (TTR_MULTIPLIER_MAX - TTR_MULTIPLIER_MIN);
    // Rounding can land exactly on the open upper bound.
    if m >= TTR_MULTIPLIER_MAX {
        f64::from_bits(TTR_MULTIPLIER_MAX.to_bits() - 1)
    } else {
        m.max(TTR_MULTIPLIER_MIN)
    }
}
