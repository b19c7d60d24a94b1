//! # Solver
//! Free-text math problems: the problem is classified by keywords
//! (derivative, integral, equation, simplification) and handed to the symbolic engine.
//! The answer comes back as a list of human-readable steps plus a final answer.
//!
//! # Example
//! ```
//! use RustedMathSolver::solver::handler::handle;
//! let solution = handle("d/dx(x^2)").unwrap();
//! assert_eq!(solution.answer, "2*x");
//! assert_eq!(solution.steps.last().unwrap(), "Final Answer: 2*x");
//! ```

/// keyword dispatch: raw text -> kind of problem + expression
pub mod classifier;
/// errors surfaced to the client
pub mod errors;
/// runs the classifier and the symbolic engine, shapes the answer
pub mod handler;
/// request and response bodies
pub mod models;
