//! Solver error types.

/// Error type for solver operations.
///
/// Solver verdicts (unsat, timeout) are not errors; these cover failures to
/// run the engine or to read what it reported.
#[derive(Debug, Clone, PartialEq)]
pub enum SolverError {
    /// Solver engine is not installed or could not be located.
    NotAvailable(String),
    /// Solver process could not be started or exited abnormally.
    Process(String),
    /// Solver output could not be interpreted.
    Output(String),
    /// Reading or writing a solver file failed.
    Io(String),
    /// Solver-specific error not covered by other variants.
    SolverSpecific(String),
}

impl SolverError {
    /// Returns a semantic error code for programmatic handling.
    pub fn code(&self) -> &'static str {
        match self {
            SolverError::NotAvailable(_) => "SOLVER_NOT_AVAILABLE",
            SolverError::Process(_) => "SOLVER_PROCESS",
            SolverError::Output(_) => "SOLVER_OUTPUT",
            SolverError::Io(_) => "SOLVER_IO",
            SolverError::SolverSpecific(_) => "SOLVER_SPECIFIC",
        }
    }
}

impl std::fmt::Display for SolverError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SolverError::NotAvailable(msg) => {
                write!(f, "[{}] Solver not available: {}", self.code(), msg)
            }
            SolverError::Process(msg) => {
                write!(f, "[{}] Solver process failed: {}", self.code(), msg)
            }
            SolverError::Output(msg) => {
                write!(f, "[{}] Unreadable solver output: {}", self.code(), msg)
            }
            SolverError::Io(msg) => write!(f, "[{}] Solver I/O failed: {}", self.code(), msg),
            SolverError::SolverSpecific(msg) => {
                write!(f, "[{}] Solver error: {}", self.code(), msg)
            }
        }
    }
}

impl std::error::Error for SolverError {}

impl From<std::io::Error> for SolverError {
    fn from(err: std::io::Error) -> Self {
        SolverError::Io(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display_not_available() {
        let err = SolverError::NotAvailable("Marabou".to_string());
        let msg = format!("{}", err);
        assert!(msg.contains("SOLVER_NOT_AVAILABLE"));
        assert!(msg.contains("Marabou"));
    }

    #[test]
    fn test_error_display_process() {
        let msg = SolverError::Process("exit status 3".to_string()).to_string();
        assert!(msg.starts_with("[SOLVER_PROCESS]"));
        assert!(msg.contains("exit status 3"));
    }

    #[test]
    fn test_error_from_io() {
        let io = std::io::Error::new(std::io::ErrorKind::NotFound, "missing file");
        let err = SolverError::from(io);
        assert_eq!(err.code(), "SOLVER_IO");
        assert!(err.to_string().contains("missing file"));
    }

    #[test]
    fn test_error_code() {
        assert_eq!(
            SolverError::Output(String::new()).code(),
            "SOLVER_OUTPUT"
        );
        assert_eq!(
            SolverError::SolverSpecific(String::new()).code(),
            "SOLVER_SPECIFIC"
        );
    }
}
