//! Shared solver vocabulary for nnquery backends.
//!
//! This crate provides the types that solver implementations
//! (like `nnquery-marabou`) exchange with the query layer.
//!
//! # Overview
//!
//! - [`SolverOptions`]: Options forwarded to the solver engine
//! - [`ExitCode`]: Terminal status reported by a solve
//! - [`Statistics`]: Timing and counters reported by a solve
//! - [`SolverError`]: Error types for solver operations

mod config;
mod error;
mod statistics;
mod status;

pub use config::{SolverOptions, TighteningStrategy};
pub use error::SolverError;
pub use statistics::Statistics;
pub use status::{ExitCode, ParseExitCodeError};
