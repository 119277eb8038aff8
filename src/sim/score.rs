//! Score and progress counters

use serde::{Deserialize, Serialize};

/// Which counter a variant reports as its headline score
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ScoreMetric {
    Distance,
    Passed,
}

/// Monotonic progress counters of one run
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ScoreTracker {
    /// Total scroll distance
    distance: f32,
    /// Obstacles passed, shot or swatted
    passed: u32,
}

impl ScoreTracker {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add one tick of travel; only the magnitude counts
    pub fn travel(&mut self, speed: f32) {
        self.distance += speed.abs();
    }

    pub fn record_pass(&mut self) {
        self.passed += 1;
    }

    pub fn distance(&self) -> f32 {
        self.distance
    }

    pub fn passed(&self) -> u32 {
        self.passed
    }

    /// Headline score under the given metric
    pub fn score(&self, metric: ScoreMetric) -> u64 {
        match metric {
            ScoreMetric::Distance => self.distance.floor() as u64,
            ScoreMetric::Passed => self.passed as u64,
        }
    }
}
