//! Network error types.

use crate::query::QueryError;
use crate::types::ShapeError;
use nnquery_expr::{EquationError, VariableId};
use nnquery_solver::SolverError;

/// Errors that can occur while building, solving or evaluating a network.
#[derive(Debug, Clone, PartialEq)]
pub enum NetworkError {
    /// Invalid equation terms
    Equation(EquationError),
    /// Query construction or persistence failed
    Query(QueryError),
    /// The solver backend failed
    Solver(SolverError),
    /// Array data does not fill its shape
    Shape(ShapeError),
    /// Operation supports a single input array only
    UnsupportedInputCount { count: usize },
    /// Operation supports a single output array only
    UnsupportedOutputCount { count: usize },
    /// Number of supplied arrays differs from the declared arrays
    ArrayCountMismatch { expected: usize, actual: usize },
    /// Supplied array shape differs from the declared shape
    ShapeMismatch {
        expected: Vec<usize>,
        actual: Vec<usize>,
    },
    /// Class index is outside the output array
    InvalidClass { class: usize, num_classes: usize },
    /// A satisfiable solve did not report a value for a variable
    MissingValue(VariableId),
}

impl NetworkError {
    /// Returns a semantic error code for programmatic handling.
    pub fn code(&self) -> &'static str {
        match self {
            NetworkError::Equation(err) => err.code(),
            NetworkError::Query(err) => err.code(),
            NetworkError::Solver(err) => err.code(),
            NetworkError::Shape(_) => "NETWORK_INVALID_SHAPE",
            NetworkError::UnsupportedInputCount { .. } => "NETWORK_UNSUPPORTED_INPUT_COUNT",
            NetworkError::UnsupportedOutputCount { .. } => "NETWORK_UNSUPPORTED_OUTPUT_COUNT",
            NetworkError::ArrayCountMismatch { .. } => "NETWORK_ARRAY_COUNT_MISMATCH",
            NetworkError::ShapeMismatch { .. } => "NETWORK_SHAPE_MISMATCH",
            NetworkError::InvalidClass { .. } => "NETWORK_INVALID_CLASS",
            NetworkError::MissingValue(_) => "NETWORK_MISSING_VALUE",
        }
    }
}

impl std::fmt::Display for NetworkError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            NetworkError::Equation(err) => write!(f, "{err}"),
            NetworkError::Query(err) => write!(f, "{err}"),
            NetworkError::Solver(err) => write!(f, "{err}"),
            NetworkError::Shape(err) => write!(f, "[{}] {}", self.code(), err),
            NetworkError::UnsupportedInputCount { count } => write!(
                f,
                "[{}] Expected exactly one input array, network has {}",
                self.code(),
                count
            ),
            NetworkError::UnsupportedOutputCount { count } => write!(
                f,
                "[{}] Expected exactly one output array, network has {}",
                self.code(),
                count
            ),
            NetworkError::ArrayCountMismatch { expected, actual } => write!(
                f,
                "[{}] Expected {} arrays but {} were given",
                self.code(),
                expected,
                actual
            ),
            NetworkError::ShapeMismatch { expected, actual } => write!(
                f,
                "[{}] Expected shape {:?}, got {:?}",
                self.code(),
                expected,
                actual
            ),
            NetworkError::InvalidClass { class, num_classes } => write!(
                f,
                "[{}] Class {} is out of range for {} outputs",
                self.code(),
                class,
                num_classes
            ),
            NetworkError::MissingValue(var) => write!(
                f,
                "[{}] Solver reported no value for {}",
                self.code(),
                var
            ),
        }
    }
}

impl std::error::Error for NetworkError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            NetworkError::Equation(err) => Some(err),
            NetworkError::Query(err) => Some(err),
            NetworkError::Solver(err) => Some(err),
            NetworkError::Shape(err) => Some(err),
            _ => None,
        }
    }
}

impl From<EquationError> for NetworkError {
    fn from(err: EquationError) -> Self {
        NetworkError::Equation(err)
    }
}

impl From<QueryError> for NetworkError {
    fn from(err: QueryError) -> Self {
        NetworkError::Query(err)
    }
}

impl From<SolverError> for NetworkError {
    fn from(err: SolverError) -> Self {
        NetworkError::Solver(err)
    }
}

impl From<ShapeError> for NetworkError {
    fn from(err: ShapeError) -> Self {
        NetworkError::Shape(err)
    }
}
