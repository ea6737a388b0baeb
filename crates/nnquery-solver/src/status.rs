//! Solver exit codes.

use serde::{Deserialize, Serialize};
use std::str::FromStr;

/// Terminal status of a solve, as reported by the engine.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ExitCode {
    /// A satisfying assignment was found.
    Sat,
    /// No assignment satisfies the query.
    Unsat,
    /// The engine hit its time limit.
    Timeout,
    /// The engine failed.
    Error,
    /// The engine finished without a verdict.
    Unknown,
    /// The engine was asked to stop.
    QuitRequested,
}

impl ExitCode {
    /// Check if the status carries a witness.
    pub fn is_sat(self) -> bool {
        matches!(self, ExitCode::Sat)
    }

    /// Check if the status proves the query infeasible.
    pub fn is_unsat(self) -> bool {
        matches!(self, ExitCode::Unsat)
    }

    /// Check if the engine ran out of time.
    pub fn is_timeout(self) -> bool {
        matches!(self, ExitCode::Timeout)
    }

    /// Check if the status is a verdict (sat or unsat).
    pub fn is_conclusive(self) -> bool {
        matches!(self, ExitCode::Sat | ExitCode::Unsat)
    }

    /// The engine's own spelling of the status.
    pub fn as_str(self) -> &'static str {
        match self {
            ExitCode::Sat => "sat",
            ExitCode::Unsat => "unsat",
            ExitCode::Timeout => "TIMEOUT",
            ExitCode::Error => "ERROR",
            ExitCode::Unknown => "UNKNOWN",
            ExitCode::QuitRequested => "QUIT_REQUESTED",
        }
    }
}

impl std::fmt::Display for ExitCode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Error returned when a status string is not one the engine emits.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParseExitCodeError(pub String);

impl std::fmt::Display for ParseExitCodeError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "unrecognized solver exit code '{}'", self.0)
    }
}

impl std::error::Error for ParseExitCodeError {}

impl FromStr for ExitCode {
    type Err = ParseExitCodeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "sat" => Ok(ExitCode::Sat),
            "unsat" => Ok(ExitCode::Unsat),
            "TIMEOUT" => Ok(ExitCode::Timeout),
            "ERROR" => Ok(ExitCode::Error),
            "UNKNOWN" => Ok(ExitCode::Unknown),
            "QUIT_REQUESTED" => Ok(ExitCode::QuitRequested),
            other => Err(ParseExitCodeError(other.to_string())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const ALL: [ExitCode; 6] = [
        ExitCode::Sat,
        ExitCode::Unsat,
        ExitCode::Timeout,
        ExitCode::Error,
        ExitCode::Unknown,
        ExitCode::QuitRequested,
    ];

    #[test]
    fn test_exit_code_strings_roundtrip() {
        for code in ALL {
            assert_eq!(code.as_str().parse::<ExitCode>(), Ok(code));
        }
    }

    #[test]
    fn test_exit_code_engine_spelling() {
        assert_eq!(ExitCode::Sat.to_string(), "sat");
        assert_eq!(ExitCode::Unsat.to_string(), "unsat");
        assert_eq!(ExitCode::Timeout.to_string(), "TIMEOUT");
        assert_eq!(ExitCode::QuitRequested.to_string(), "QUIT_REQUESTED");
    }

    #[test]
    fn test_exit_code_rejects_unknown_strings() {
        let err = "SAT".parse::<ExitCode>().unwrap_err();
        assert_eq!(err, ParseExitCodeError("SAT".to_string()));
        assert!(err.to_string().contains("SAT"));
    }

    #[test]
    fn test_exit_code_predicates() {
        assert!(ExitCode::Sat.is_sat());
        assert!(ExitCode::Unsat.is_unsat());
        assert!(ExitCode::Timeout.is_timeout());
        assert!(ExitCode::Sat.is_conclusive());
        assert!(ExitCode::Unsat.is_conclusive());
        assert!(!ExitCode::Unknown.is_conclusive());
        assert!(!ExitCode::Error.is_sat());
    }
}
