//! Development tooling for nnquery.
//!
//! - [`logging`]: structured logging setup driven by environment variables
//! - [`memory`]: resident-memory snapshots recorded around solver runs

pub mod logging;
pub mod memory;

pub use logging::{LoggingError, enable_logging};
pub use memory::{MemoryError, MemorySnapshot, capture_rss_bytes, rss_delta};
