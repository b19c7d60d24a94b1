use thiserror::Error;

/// Failure of a single problem. The rendered message goes to the client as is.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum SolveError {
    /// the engine could not parse an expression
    #[error("Invalid syntax: {0}")]
    ExpressionParse(String),

    /// an equation is not of the form `lhs = rhs`
    #[error("Invalid equation syntax: {0}")]
    EquationSyntax(String),

    /// parsing succeeded but differentiation, integration or solving failed
    #[error("Computation failed: {0}")]
    Compute(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_messages() {
        assert_eq!(
            SolveError::ExpressionParse("unexpected end of input".to_string()).to_string(),
            "Invalid syntax: unexpected end of input"
        );
        assert_eq!(
            SolveError::EquationSyntax("expected exactly one '='".to_string()).to_string(),
            "Invalid equation syntax: expected exactly one '='"
        );
        assert_eq!(
            SolveError::Compute("cannot integrate exp(x**2)".to_string()).to_string(),
            "Computation failed: cannot integrate exp(x**2)"
        );
    }
}
