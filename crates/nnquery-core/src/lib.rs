//! Neural-network verification query builder.
//!
//! A [`Network`] accumulates the encoding a format parser produces; it is
//! turned into an [`InputQuery`] and handed to a [`Solver`] backend.

pub mod constraint;
pub mod network;
pub mod query;
pub mod solver;
pub mod types;

pub use constraint::{
    AbsConstraint, Disjunction, MaxConstraint, PiecewiseConstraint, ReluConstraint,
    SignConstraint, SigmoidConstraint,
};
pub use network::{
    DirectEvaluate, EquationScope, Evaluation, GradientOptions, Network, NetworkError,
    RobustnessResult,
};
pub use query::{DEFAULT_TOLERANCE, InputQuery, QueryError, QueryFormat};
pub use solver::{SolveResult, Solver};
pub use types::{ShapeError, Shaped, ValueArray, VarArray};
