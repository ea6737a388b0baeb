//! Equation construction errors.

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EquationError {
    MismatchedLengths { variables: usize, coefficients: usize },
}

impl EquationError {
    /// Returns a semantic error code for programmatic handling.
    pub fn code(&self) -> &'static str {
        match self {
            EquationError::MismatchedLengths { .. } => "EQUATION_MISMATCHED_LENGTHS",
        }
    }
}

impl std::fmt::Display for EquationError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            EquationError::MismatchedLengths {
                variables,
                coefficients,
            } => write!(
                f,
                "[{}] variables and coefficients must have the same length ({} vs {})",
                self.code(),
                variables,
                coefficients
            ),
        }
    }
}

impl std::error::Error for EquationError {}
