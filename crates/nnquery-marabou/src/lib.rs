//! Marabou backend for nnquery.
//!
//! Runs the Marabou command-line binary on a query written in its text
//! format and reads the status and assignment back from its output.

pub mod config;
pub mod detection;
pub mod output;
pub mod solver;

pub use config::MarabouConfig;
pub use detection::{MARABOU_PATH_ENV, detect_marabou, marabou_version};
pub use output::MarabouOutput;
pub use solver::MarabouSolver;
