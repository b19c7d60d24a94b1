//! Turns a free-text problem into a [`SolutionResult`].
//!
//! The problem is classified, the expression is parsed and the symbolic engine does the work
//! for the chosen kind. Every branch maps engine failures the same way:
//! parse errors -> [`SolveError::ExpressionParse`], malformed equations ->
//! [`SolveError::EquationSyntax`], everything else -> [`SolveError::Compute`].
use log::{debug, info, warn};

use crate::solver::classifier::{ProblemKind, classify};
use crate::solver::errors::SolveError;
use crate::solver::models::{SolutionResult, SolveResponse};
use crate::symbolic::symbolic_engine::Expr;
use crate::symbolic::symbolic_solve::{Equation, format_solution_set};

/// the free variable of every problem
pub const VARIABLE: &str = "x";

fn parse(text: &str) -> Result<Expr, SolveError> {
    Expr::parse_expression(text).map_err(SolveError::ExpressionParse)
}

fn derivative(text: &str) -> Result<SolutionResult, SolveError> {
    let expr = parse(text)?;
    let derivative = expr.diff(VARIABLE).simplify();
    debug!("d/d{}({}) = {}", VARIABLE, expr, derivative);
    Ok(SolutionResult {
        steps: vec![
            format!("Problem: d/d{}({})", VARIABLE, expr),
            "Step 1: Apply derivative rules".to_string(),
            format!("Step 2: Derivative of {} with respect to {}", expr, VARIABLE),
            format!("Final Answer: {}", derivative),
        ],
        answer: derivative.to_string(),
    })
}

fn integral(text: &str) -> Result<SolutionResult, SolveError> {
    let expr = parse(text)?;
    let antiderivative = expr
        .integrate(VARIABLE)
        .map_err(SolveError::Compute)?
        .simplify();
    debug!("∫{} d{} = {}", expr, VARIABLE, antiderivative);
    let answer = format!("{} + C", antiderivative);
    Ok(SolutionResult {
        steps: vec![
            format!("Problem: ∫{} d{}", expr, VARIABLE),
            "Step 1: Apply integration rules".to_string(),
            format!("Step 2: Integral of {} with respect to {}", expr, VARIABLE),
            format!("Final Answer: {}", answer),
        ],
        answer,
    })
}

/// `lhs = rhs` with exactly one `=` and both sides present
fn split_equation(text: &str) -> Result<(&str, &str), SolveError> {
    let sides: Vec<&str> = text.split('=').collect();
    match sides.as_slice() {
        [lhs, rhs] if !lhs.is_empty() && !rhs.is_empty() => Ok((lhs, rhs)),
        [_, _] => Err(SolveError::EquationSyntax(format!(
            "both sides of '{}' must be present",
            text
        ))),
        _ => Err(SolveError::EquationSyntax(format!(
            "expected exactly one '=' in '{}', found {}",
            text,
            sides.len() - 1
        ))),
    }
}

fn equation(text: &str) -> Result<SolutionResult, SolveError> {
    let (lhs, rhs) = split_equation(text)?;
    let equation = Equation::new(parse(lhs)?, parse(rhs)?);
    let roots = equation.solve(VARIABLE).map_err(SolveError::Compute)?;
    let solution = format_solution_set(&roots);
    debug!("{} -> {}", equation, solution);
    Ok(SolutionResult {
        steps: vec![
            format!("Problem: Solve {}", equation),
            format!("Step 1: Isolate variable {}", VARIABLE),
            format!("Step 2: Solution set for {}", VARIABLE),
            format!("Final Answer: {}", solution),
        ],
        answer: solution,
    })
}

fn simplification(text: &str) -> Result<SolutionResult, SolveError> {
    let expr = parse(text)?;
    let simplified = expr.simplify();
    Ok(SolutionResult {
        steps: vec![
            format!("Problem: {}", expr),
            "Step 1: Simplify expression".to_string(),
            format!("Final Answer: {}", simplified),
        ],
        answer: simplified.to_string(),
    })
}

/// Classifies and solves one problem.
pub fn handle(problem: &str) -> Result<SolutionResult, SolveError> {
    let classified = classify(problem);
    info!("problem of kind {}", classified.kind);
    debug!("normalized expression: '{}'", classified.expression);
    let outcome = match classified.kind {
        ProblemKind::Derivative => derivative(&classified.expression),
        ProblemKind::Integral => integral(&classified.expression),
        ProblemKind::Solve => equation(&classified.expression),
        ProblemKind::Simplify => simplification(&classified.expression),
    };
    match &outcome {
        Ok(solution) => info!("{} solved: {}", classified.kind, solution.answer),
        Err(error) => warn!("{} failed: {}", classified.kind, error),
    }
    outcome
}

/// [`handle`] wrapped into the response envelope
pub fn respond(problem: &str) -> SolveResponse {
    SolveResponse::from(handle(problem))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn answer(problem: &str) -> String {
        handle(problem).unwrap().answer
    }

    #[test]
    fn test_simplify() {
        let solution = handle("5+3").unwrap();
        assert_eq!(solution.answer, "8");
        assert_eq!(
            solution.steps,
            vec!["Problem: 5 + 3", "Step 1: Simplify expression", "Final Answer: 8"]
        );
        assert_eq!(answer("x + x"), "2*x");
        assert_eq!(answer("(x+1)^2"), "x**2 + 2*x + 1");
    }

    #[test]
    fn test_derivative() {
        let solution = handle("d/dx(x^2)").unwrap();
        assert_eq!(solution.answer, "2*x");
        assert_eq!(
            solution.steps,
            vec![
                "Problem: d/dx(x**2)",
                "Step 1: Apply derivative rules",
                "Step 2: Derivative of x**2 with respect to x",
                "Final Answer: 2*x",
            ]
        );
        assert_eq!(answer("derivative of sin x"), "0");
        assert_eq!(answer("derivative x^3"), "3*x**2");
    }

    #[test]
    fn test_integral() {
        let solution = handle("integral of 2x dx").unwrap();
        assert!(solution.answer.ends_with(" + C"), "{}", solution.answer);
        assert_eq!(solution.steps.len(), 4);
        assert_eq!(
            solution.steps[3],
            format!("Final Answer: {}", solution.answer)
        );

        let solution = handle("∫ x^2 dx").unwrap();
        assert_eq!(solution.answer, "x**3/3 + C");
        assert_eq!(solution.steps[0], "Problem: ∫x**2 dx");
    }

    #[test]
    fn test_solve() {
        let solution = handle("x+2=5").unwrap();
        assert_eq!(solution.answer, "[3]");
        assert_eq!(
            solution.steps,
            vec![
                "Problem: Solve Eq(x + 2, 5)",
                "Step 1: Isolate variable x",
                "Step 2: Solution set for x",
                "Final Answer: [3]",
            ]
        );
        assert_eq!(answer("x^2 = 4"), "[-2, 2]");
        assert_eq!(answer("x^2 = -1"), "[]");
    }

    #[test]
    fn test_equation_syntax_errors() {
        for problem in ["x+2=5=7", "x+2=", "=5", "="] {
            let err = handle(problem).unwrap_err();
            assert!(matches!(err, SolveError::EquationSyntax(_)), "{}: {:?}", problem, err);
            assert!(err.to_string().starts_with("Invalid equation syntax: "));
        }
    }

    #[test]
    fn test_parse_errors() {
        let err = handle("x+2=5*").unwrap_err();
        assert!(matches!(err, SolveError::ExpressionParse(_)), "{:?}", err);
        let err = handle("d/dx").unwrap_err();
        assert!(err.to_string().starts_with("Invalid syntax: "), "{}", err);
        let err = handle("2x + 1").unwrap_err();
        assert!(matches!(err, SolveError::ExpressionParse(_)), "{:?}", err);
    }

    #[test]
    fn test_compute_errors() {
        let err = handle("integral exp(x^2) dx").unwrap_err();
        assert!(matches!(err, SolveError::Compute(_)), "{:?}", err);
        assert!(err.to_string().starts_with("Computation failed: "));
        let err = handle("x = x").unwrap_err();
        assert!(matches!(err, SolveError::Compute(_)), "{:?}", err);
    }

    #[test]
    fn test_oversized_input_is_a_parse_error() {
        let err = handle(&("x+".repeat(200_000) + "x")).unwrap_err();
        assert!(matches!(err, SolveError::ExpressionParse(_)), "{:?}", err);
        let err = handle(&("(".repeat(10_000) + "x" + &")".repeat(10_000) + "=1")).unwrap_err();
        assert!(matches!(err, SolveError::ExpressionParse(_)), "{:?}", err);
    }

    #[test]
    fn test_tiny_square_root() {
        let root: f64 = answer("sqrt(1e-10)").parse().unwrap();
        assert!((root - 1e-5).abs() < 1e-15, "{}", root);
    }

    #[test]
    fn test_huge_exponents() {
        assert_eq!(answer("x^3000000000"), "x**3000000000");
        assert_eq!(answer("d/dx(x^3000000000)"), "3000000000*x**2999999999");
        let err = handle("x^2000000000 = 2").unwrap_err();
        assert!(matches!(err, SolveError::Compute(_)), "{:?}", err);
    }

    #[test]
    fn test_pi_is_exact() {
        assert_eq!(answer("pi/3"), "pi/3");
        assert_eq!(answer("sin(pi)"), "0");
        assert_eq!(answer("cos(pi)"), "-1");
        assert_eq!(answer("d/dx(pi*x)"), "pi");
        assert_eq!(answer("cos(x)=1/2"), "[pi/3, 5*pi/3]");
    }

    #[test]
    fn test_envelope() {
        let response = respond("x+2=5=7");
        assert!(!response.is_success());
        match response {
            SolveResponse::Failed(error) => assert!(!error.is_empty()),
            other => panic!("expected a failure envelope, got {:?}", other),
        }
        assert!(respond("5+3").is_success());
    }

    #[test]
    fn test_same_request_same_response() {
        for problem in ["5+3", "d/dx(x^2)", "integral of 2x dx", "x^2-5*x+6=0", "x+2=5=7"] {
            assert_eq!(respond(problem), respond(problem), "{}", problem);
        }
    }
}
