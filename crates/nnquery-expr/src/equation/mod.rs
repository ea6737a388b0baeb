//! Linear equation records.
//!
//! - `kind`     — EquationType: EQ / LE / GE comparator
//! - `core`     — Equation: ordered addends, comparator and scalar
//! - `builders` — Equation construction from parallel variable/coefficient slices
//! - `error`    — Equation construction errors

pub mod builders;
pub mod core;
pub mod error;
pub mod kind;

pub use builders::{equality, inequality};
pub use core::Equation;
pub use error::EquationError;
pub use kind::EquationType;
