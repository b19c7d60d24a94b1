#![allow(non_camel_case_types)]
#![allow(non_snake_case)]
/// a module turns a String expression into a symbolic expression
///
///# Example
/// ```
/// use RustedMathSolver::symbolic::symbolic_engine::Expr;
/// let parsed_expression = Expr::parse_expression("x^2 + 2*x").unwrap();
/// println!(" parsed_expression {}", parsed_expression);
/// assert_eq!(parsed_expression.to_string(), "x**2 + 2*x");
///  ```
/// ________________________________________________________________________________________________________________________________
pub mod parse_expr;
///____________________________________________________________________________________________________________________________
/// # Symbolic engine
/// a module
/// 1) holds the symbolic expression tree and its builders
/// 2) turns a symbolic expression into a string expression (SymPy notation) for printing and control results
///# Example#
/// ```
/// use RustedMathSolver::symbolic::symbolic_engine::Expr;
/// let f = Expr::parse_expression("x*exp(x)").unwrap();
/// // differentiate with respect to x
/// let df_dx = f.diff("x").simplify();
/// println!("df_dx = {}", df_dx);
/// assert_eq!(df_dx.to_string(), "x*exp(x) + exp(x)");
/// // evaluate
/// let f_res = f.eval_expression1D("x", 1.0);
/// println!("f_res = {}", f_res);
/// assert!((f_res - std::f64::consts::E).abs() < 1e-12);
/// ```
/// ________________________________________________________________________________________________________________________________________________
pub mod symbolic_engine;
pub mod symbolic_engine_derivatives;
///________________________________________________________________________________________________________________________________________________
/// canonical sum-of-terms simplification
/// Example#
/// ```
/// use RustedMathSolver::symbolic::symbolic_engine::Expr;
/// let s = Expr::parse_expression("(x^2 - 1)/(x - 1)").unwrap().simplify();
/// assert_eq!(s.to_string(), "x + 1");
/// ```
pub mod symbolic_simplify;
///________________________________________________________________________________________________________________________________________________
/// indefinite integration
/// Example#
/// ```
/// use RustedMathSolver::symbolic::symbolic_engine::Expr;
/// let antiderivative = Expr::parse_expression("x*exp(x)").unwrap().integrate("x").unwrap();
/// assert_eq!(antiderivative.to_string(), "x*exp(x) - exp(x)");
/// ```
pub mod symbolic_integration;
///________________________________________________________________________________________________________________________________________________
/// solving a single equation for one variable over the reals
/// Example#
/// ```
/// use RustedMathSolver::symbolic::symbolic_engine::Expr;
/// use RustedMathSolver::symbolic::symbolic_solve::{Equation, format_solution_set};
/// let eq = Equation::new(
///     Expr::parse_expression("x^2 - 5*x").unwrap(),
///     Expr::parse_expression("-6").unwrap(),
/// );
/// let roots = eq.solve("x").unwrap();
/// assert_eq!(format_solution_set(&roots), "[2, 3]");
/// ```
pub mod symbolic_solve;
///______________________________________________________________________________________________________________________________________________
/// the collection of utility functions mainly for bracket checking and number formatting
/// _____________________________________________________________________________________________________________________________________________
pub mod utils;
