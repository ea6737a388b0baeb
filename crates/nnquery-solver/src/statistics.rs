//! Statistics reported alongside a solve.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Counters and timing reported by a solver run.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Statistics {
    /// Whether the run ended because the time limit was reached.
    pub timed_out: bool,
    /// Wall-clock time of the run in seconds.
    pub solve_time_seconds: f64,
    /// Backend-specific counters (e.g., splits, visited states).
    pub metadata: BTreeMap<String, f64>,
}

impl Statistics {
    /// Statistics for a run that finished within its time limit.
    pub fn completed(solve_time_seconds: f64) -> Self {
        Self {
            timed_out: false,
            solve_time_seconds,
            metadata: BTreeMap::new(),
        }
    }

    /// Statistics for a run that hit its time limit.
    pub fn timed_out(solve_time_seconds: f64) -> Self {
        Self {
            timed_out: true,
            ..Self::completed(solve_time_seconds)
        }
    }

    pub fn has_timed_out(&self) -> bool {
        self.timed_out
    }

    /// Record a backend-specific counter.
    pub fn with_metadata(mut self, key: impl Into<String>, value: f64) -> Self {
        self.metadata.insert(key.into(), value);
        self
    }

    pub fn get(&self, key: &str) -> Option<f64> {
        self.metadata.get(key).copied()
    }
}
