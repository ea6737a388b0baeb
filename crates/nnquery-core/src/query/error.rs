//! Query construction and persistence errors.

use nnquery_expr::VariableId;

#[derive(Debug, Clone, PartialEq)]
pub enum QueryError {
    /// A variable index is not below the declared variable count.
    VariableOutOfRange {
        variable: VariableId,
        num_variables: usize,
        context: &'static str,
    },
    /// The backward query needs at least one gradient term.
    NoGradientTerms,
    /// An assignment violates the query.
    AssignmentViolation { description: String },
    /// A query file could not be parsed.
    Parse { line: usize, reason: String },
    /// A query file could not be read or written.
    Io(String),
}

impl QueryError {
    /// Returns a semantic error code for programmatic handling.
    pub fn code(&self) -> &'static str {
        match self {
            QueryError::VariableOutOfRange { .. } => "QUERY_VARIABLE_OUT_OF_RANGE",
            QueryError::NoGradientTerms => "QUERY_NO_GRADIENT_TERMS",
            QueryError::AssignmentViolation { .. } => "QUERY_ASSIGNMENT_VIOLATION",
            QueryError::Parse { .. } => "QUERY_PARSE",
            QueryError::Io(_) => "QUERY_IO",
        }
    }

    pub(crate) fn parse(line: usize, reason: impl Into<String>) -> Self {
        QueryError::Parse {
            line,
            reason: reason.into(),
        }
    }

    pub(crate) fn violation(description: impl Into<String>) -> Self {
        QueryError::AssignmentViolation {
            description: description.into(),
        }
    }
}

impl std::fmt::Display for QueryError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            QueryError::VariableOutOfRange {
                variable,
                num_variables,
                context,
            } => write!(
                f,
                "[{}] {} references {} but the query declares {} variables",
                self.code(),
                context,
                variable,
                num_variables
            ),
            QueryError::NoGradientTerms => write!(
                f,
                "[{}] Backward query requested without any gradient terms",
                self.code()
            ),
            QueryError::AssignmentViolation { description } => {
                write!(f, "[{}] Assignment violates {}", self.code(), description)
            }
            QueryError::Parse { line, reason } => {
                write!(f, "[{}] Line {}: {}", self.code(), line, reason)
            }
            QueryError::Io(msg) => write!(f, "[{}] {}", self.code(), msg),
        }
    }
}

impl std::error::Error for QueryError {}

impl From<std::io::Error> for QueryError {
    fn from(err: std::io::Error) -> Self {
        QueryError::Io(err.to_string())
    }
}
