//! Equation comparator.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum EquationType {
    #[default]
    Eq,
    Le,
    Ge,
}

impl EquationType {
    pub fn as_str(self) -> &'static str {
        match self {
            EquationType::Eq => "eq",
            EquationType::Le => "le",
            EquationType::Ge => "ge",
        }
    }

    /// Operator used when rendering an equation.
    pub fn symbol(self) -> &'static str {
        match self {
            EquationType::Eq => "==",
            EquationType::Le => "<=",
            EquationType::Ge => ">=",
        }
    }

    /// Numeric tag used by the solver's query file.
    pub fn code(self) -> u8 {
        match self {
            EquationType::Eq => 0,
            EquationType::Ge => 1,
            EquationType::Le => 2,
        }
    }

    pub fn from_code(code: u8) -> Option<Self> {
        match code {
            0 => Some(EquationType::Eq),
            1 => Some(EquationType::Ge),
            2 => Some(EquationType::Le),
            _ => None,
        }
    }

    /// Whether `lhs <op> rhs` holds within `tolerance`.
    pub fn holds(self, lhs: f64, rhs: f64, tolerance: f64) -> bool {
        match self {
            EquationType::Eq => (lhs - rhs).abs() <= tolerance,
            EquationType::Le => lhs <= rhs + tolerance,
            EquationType::Ge => lhs >= rhs - tolerance,
        }
    }
}
