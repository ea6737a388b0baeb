//! Variable identifiers and linear equation records.
//!
//! These are the leaf types shared by the network accumulator, the query
//! builder and every solver backend.

pub mod equation;
pub mod ids;

pub use equation::{Equation, EquationError, EquationType, equality, inequality};
pub use ids::VariableId;
