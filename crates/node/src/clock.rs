use std::time::Instant;

/// Source of the master's simulation time in seconds.
///
/// Slaves never read a clock; they receive the master's time in the frame
/// snapshot.
pub trait Clock {
    fn now(&mut self) -> f64;
}

/// Wall-clock time since construction.
#[derive(Debug)]
pub struct SystemClock {
    start: Instant,
}

impl SystemClock {
    pub fn new() -> Self {
        Self {
            start: Instant::now(),
        }
    }
}

impl Default for SystemClock {
    fn default() -> Self {
        Self::new()
    }
}

impl Clock for SystemClock {
    fn now(&mut self) -> f64 {
        self.start.elapsed().as_secs_f64()
    }
}

/// Deterministic clock advancing a fixed step per query. Used by the cluster
/// simulator and tests.
#[derive(Debug)]
pub struct FixedStepClock {
    current: f64,
    step: f64,
}

impl FixedStepClock {
    pub fn new(step: f64) -> Self {
        Self { current: 0.0, step }
    }
}

impl Clock for FixedStepClock {
    fn now(&mut self) -> f64 {
        self.current += self.step;
        self.current
    }
}
