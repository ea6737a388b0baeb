//! Solver option types.

use serde::{Deserialize, Serialize};

/// Bound-tightening procedure run before and during search.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum TighteningStrategy {
    #[default]
    DeepPoly,
    Sbt,
    None,
}

impl TighteningStrategy {
    pub fn as_str(self) -> &'static str {
        match self {
            TighteningStrategy::DeepPoly => "deeppoly",
            TighteningStrategy::Sbt => "sbt",
            TighteningStrategy::None => "none",
        }
    }
}

/// Options controlling a single solver invocation.
///
/// Every field is optional; `None` leaves the engine's own default in place.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SolverOptions {
    /// Wall-clock limit in seconds. `None` means no limit.
    pub timeout_seconds: Option<u64>,
    /// Number of parallel workers used by split-and-conquer.
    pub num_workers: Option<u32>,
    /// Engine verbosity level.
    pub verbosity: Option<u32>,
    /// Enable split-and-conquer mode.
    pub snc: Option<bool>,
    /// Number of initial case splits in split-and-conquer mode.
    pub initial_divides: Option<u32>,
    /// Discharge the query with the engine's MILP encoding.
    pub solve_with_milp: Option<bool>,
    /// Bound-tightening strategy.
    pub tightening_strategy: Option<TighteningStrategy>,
}

impl SolverOptions {
    /// Create options with all defaults.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the time limit in seconds.
    pub fn with_timeout(mut self, seconds: u64) -> Self {
        self.timeout_seconds = Some(seconds);
        self
    }

    /// Set the number of workers.
    pub fn with_num_workers(mut self, count: u32) -> Self {
        self.num_workers = Some(count);
        self
    }

    /// Set the verbosity level.
    pub fn with_verbosity(mut self, level: u32) -> Self {
        self.verbosity = Some(level);
        self
    }

    /// Enable or disable split-and-conquer.
    pub fn with_snc(mut self, enabled: bool) -> Self {
        self.snc = Some(enabled);
        self
    }

    /// Set the number of initial divides.
    pub fn with_initial_divides(mut self, divides: u32) -> Self {
        self.initial_divides = Some(divides);
        self
    }

    /// Enable or disable the MILP encoding.
    pub fn with_milp(mut self, enabled: bool) -> Self {
        self.solve_with_milp = Some(enabled);
        self
    }

    /// Set the bound-tightening strategy.
    pub fn with_tightening_strategy(mut self, strategy: TighteningStrategy) -> Self {
        self.tightening_strategy = Some(strategy);
        self
    }

    /// Check if these options are completely empty (all defaults).
    pub fn is_empty(&self) -> bool {
        self.timeout_seconds.is_none()
            && self.num_workers.is_none()
            && self.verbosity.is_none()
            && self.snc.is_none()
            && self.initial_divides.is_none()
            && self.solve_with_milp.is_none()
            && self.tightening_strategy.is_none()
    }
}
