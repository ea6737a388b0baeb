//! Builder functions for the two equation shapes networks add most often.

use crate::equation::core::Equation;
use crate::equation::error::EquationError;
use crate::equation::kind::EquationType;
use crate::ids::VariableId;

/// `Σ coefficients[i] * variables[i] = scalar`
pub fn equality(
    variables: &[VariableId],
    coefficients: &[f64],
    scalar: f64,
) -> Result<Equation, EquationError> {
    Equation::from_terms(EquationType::Eq, variables, coefficients, scalar)
}

/// `Σ coefficients[i] * variables[i] <= scalar`
pub fn inequality(
    variables: &[VariableId],
    coefficients: &[f64],
    scalar: f64,
) -> Result<Equation, EquationError> {
    Equation::from_terms(EquationType::Le, variables, coefficients, scalar)
}

#[cfg(test)]
mod tests {
    use super::{equality, inequality};
    use crate::{EquationError, EquationType, VariableId};

    #[test]
    fn equality_uses_eq_comparator() {
        let eq = equality(&[VariableId::new(0)], &[1.0], 5.0).unwrap();
        assert_eq!(eq.equation_type(), EquationType::Eq);
    }

    #[test]
    fn inequality_uses_le_comparator() {
        let eq = inequality(&[VariableId::new(0), VariableId::new(1)], &[1.0, 1.0], 2.0).unwrap();
        assert_eq!(eq.equation_type(), EquationType::Le);
        assert_eq!(eq.addends().len(), 2);
    }

    #[test]
    fn builders_propagate_length_mismatch() {
        assert!(matches!(
            inequality(&[], &[1.0], 0.0),
            Err(EquationError::MismatchedLengths { .. })
        ));
    }
}
