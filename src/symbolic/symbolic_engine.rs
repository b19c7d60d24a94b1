//! # Symbolic Engine Module
//!
//! Core expression tree of the solver. Every request is parsed into an [`Expr`],
//! transformed (differentiated, integrated, simplified, solved) and finally
//! rendered back to text.
//!
//! ## Main Structures and Methods
//!
//! ### `Expr` Enum
//! - **Variables**: `Var(String)` - symbolic variables like "x", "y"
//! - **Constants**: `Const(f64)` - numerical constants
//! - **Operations**: `Add`, `Sub`, `Mul`, `Div`, `Pow` - basic arithmetic
//! - **Functions**: `Exp`, `Ln`, `sin`, `cos`, etc. - mathematical functions
//!
//! ### Rendering
//! `Display` prints expressions in the notation users of computer algebra
//! systems expect: `x**2`, `2*x`, `x**2/2`, `sqrt(x)`, `log(x)`. Parentheses
//! are emitted only where precedence requires them, and a negative term inside a
//! sum is printed as subtraction (`x - 1`).
//!
//! ## Non-standard Function Names
//! The enum keeps mathematical notation (tg, ctg, arctg) for the variants, while
//! `Display` prints the conventional names (tan, cot, atan).

#![allow(non_camel_case_types)]

use std::fmt;

use crate::symbolic::utils::{as_rational, format_number};

/// Core symbolic expression enum representing mathematical expressions as an abstract syntax tree.
///
/// # Examples
/// ```rust, ignore
/// use symbolic_engine::Expr;
/// let x = Expr::Var("x".to_string());
/// let expr = Expr::Add(Box::new(x), Box::new(Expr::Const(2.0)));
/// assert_eq!(expr.to_string(), "x + 2");
/// ```
#[derive(Clone, Debug, PartialEq)]
pub enum Expr {
    /// Symbolic variable with a name (e.g., "x", "y", "velocity")
    Var(String),
    /// Numerical constant value
    Const(f64),
    /// Addition operation: left + right
    Add(Box<Expr>, Box<Expr>),
    /// Subtraction operation: left - right
    Sub(Box<Expr>, Box<Expr>),
    /// Multiplication operation: left * right
    Mul(Box<Expr>, Box<Expr>),
    /// Division operation: left / right
    Div(Box<Expr>, Box<Expr>),
    /// Power operation: base ^ exponent
    Pow(Box<Expr>, Box<Expr>),
    /// Exponential function: e^x
    Exp(Box<Expr>),
    /// Natural logarithm: ln(x)
    Ln(Box<Expr>),
    /// Sine function: sin(x)
    sin(Box<Expr>),
    /// Cosine function: cos(x)
    cos(Box<Expr>),
    /// Tangent function: tan(x) - uses mathematical notation 'tg'
    tg(Box<Expr>),
    /// Cotangent function: cot(x) - uses mathematical notation 'ctg'
    ctg(Box<Expr>),
    /// Arcsine function: arcsin(x)
    arcsin(Box<Expr>),
    /// Arccosine function: arccos(x)
    arccos(Box<Expr>),
    /// Arctangent function: arctan(x) - uses mathematical notation 'arctg'
    arctg(Box<Expr>),
    /// Arccotangent function: arccot(x) - uses mathematical notation 'arcctg'
    arcctg(Box<Expr>),
}

// binding strength used to decide where parentheses are needed
const PREC_ADD: u8 = 1;
const PREC_MUL: u8 = 2;
const PREC_POW: u8 = 3;
const PREC_ATOM: u8 = 4;

impl Expr {
    fn precedence(&self) -> u8 {
        match self {
            Expr::Add(_, _) | Expr::Sub(_, _) => PREC_ADD,
            Expr::Mul(_, _) | Expr::Div(_, _) => PREC_MUL,
            Expr::Pow(_, exp) if Self::is_sqrt_exponent(exp) => PREC_ATOM,
            Expr::Pow(_, _) => PREC_POW,
            // negative numbers behave like a unary minus, rationals like a division
            Expr::Const(val) => {
                if *val < 0.0 || as_rational(*val).is_some() {
                    PREC_MUL
                } else {
                    PREC_ATOM
                }
            }
            _ => PREC_ATOM,
        }
    }

    fn is_sqrt_exponent(exp: &Expr) -> bool {
        matches!(exp, Expr::Const(e) if *e == 0.5)
    }

    /// If the expression carries a leading minus sign, returns it without that sign.
    ///
    /// `-3` -> `3`, `-1*x` -> `x`, `-2*x` -> `2*x`, `(-x)/2` -> `x/2`
    pub fn negated_term(&self) -> Option<Expr> {
        match self {
            Expr::Const(val) if *val < 0.0 => Some(Expr::Const(-val)),
            Expr::Mul(lhs, rhs) => lhs.negated_term().map(|neg| {
                if neg == Expr::Const(1.0) {
                    *rhs.clone()
                } else {
                    Expr::Mul(Box::new(neg), rhs.clone())
                }
            }),
            Expr::Div(lhs, rhs) => lhs
                .negated_term()
                .map(|neg| Expr::Div(Box::new(neg), rhs.clone())),
            _ => None,
        }
    }

    fn fmt_wrapped(&self, f: &mut fmt::Formatter, wrap: bool) -> fmt::Result {
        if wrap {
            write!(f, "({})", self)
        } else {
            write!(f, "{}", self)
        }
    }

    fn function_name(&self) -> Option<(&'static str, &Expr)> {
        match self {
            Expr::Exp(arg) => Some(("exp", arg)),
            Expr::Ln(arg) => Some(("log", arg)),
            Expr::sin(arg) => Some(("sin", arg)),
            Expr::cos(arg) => Some(("cos", arg)),
            Expr::tg(arg) => Some(("tan", arg)),
            Expr::ctg(arg) => Some(("cot", arg)),
            Expr::arcsin(arg) => Some(("asin", arg)),
            Expr::arccos(arg) => Some(("acos", arg)),
            Expr::arctg(arg) => Some(("atan", arg)),
            Expr::arcctg(arg) => Some(("acot", arg)),
            _ => None,
        }
    }
}

/// Display implementation printing expressions in computer-algebra notation.
impl fmt::Display for Expr {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        if let Some((name, arg)) = self.function_name() {
            return write!(f, "{}({})", name, arg);
        }
        match self {
            Expr::Var(name) => write!(f, "{}", name),
            Expr::Const(val) => write!(f, "{}", format_number(*val)),
            Expr::Add(lhs, rhs) => {
                write!(f, "{}", lhs)?;
                match rhs.negated_term() {
                    Some(neg) => {
                        write!(f, " - ")?;
                        neg.fmt_wrapped(f, neg.precedence() <= PREC_ADD)
                    }
                    None => write!(f, " + {}", rhs),
                }
            }
            Expr::Sub(lhs, rhs) => {
                write!(f, "{}", lhs)?;
                match rhs.negated_term() {
                    Some(neg) => {
                        write!(f, " + ")?;
                        neg.fmt_wrapped(f, false)
                    }
                    None => {
                        write!(f, " - ")?;
                        rhs.fmt_wrapped(f, rhs.precedence() <= PREC_ADD)
                    }
                }
            }
            Expr::Mul(lhs, rhs) => {
                if let Some(neg) = self.negated_term() {
                    write!(f, "-")?;
                    return neg.fmt_wrapped(f, neg.precedence() <= PREC_ADD);
                }
                lhs.fmt_wrapped(f, lhs.precedence() < PREC_MUL || is_rational_const(lhs))?;
                write!(f, "*")?;
                rhs.fmt_wrapped(
                    f,
                    rhs.precedence() < PREC_MUL || rhs.negated_term().is_some() || is_rational_const(rhs),
                )
            }
            Expr::Div(lhs, rhs) => {
                if let Some(neg) = self.negated_term() {
                    write!(f, "-")?;
                    return neg.fmt_wrapped(f, neg.precedence() <= PREC_ADD);
                }
                lhs.fmt_wrapped(f, lhs.precedence() < PREC_MUL || is_rational_const(lhs))?;
                write!(f, "/")?;
                rhs.fmt_wrapped(f, rhs.precedence() <= PREC_MUL)
            }
            Expr::Pow(base, exp) => {
                if Self::is_sqrt_exponent(exp) {
                    return write!(f, "sqrt({})", base);
                }
                base.fmt_wrapped(f, base.precedence() <= PREC_POW)?;
                write!(f, "**")?;
                exp.fmt_wrapped(f, exp.precedence() < PREC_ATOM)
            }
            _ => unreachable!("functions are printed above"),
        }
    }
}

fn is_rational_const(expr: &Expr) -> bool {
    matches!(expr, Expr::Const(val) if as_rational(*val).is_some())
}

impl std::ops::Add for Expr {
    type Output = Self;

    fn add(self, rhs: Self) -> Self::Output {
        Expr::Add(self.boxed(), rhs.boxed())
    }
}

impl std::ops::Sub for Expr {
    type Output = Self;

    fn sub(self, rhs: Self) -> Self::Output {
        Expr::Sub(self.boxed(), rhs.boxed())
    }
}

impl std::ops::Mul for Expr {
    type Output = Self;

    fn mul(self, rhs: Self) -> Self::Output {
        Expr::Mul(self.boxed(), rhs.boxed())
    }
}

impl std::ops::Div for Expr {
    type Output = Self;

    fn div(self, rhs: Self) -> Self::Output {
        Expr::Div(self.boxed(), rhs.boxed())
    }
}

impl std::ops::Neg for Expr {
    type Output = Self;

    fn neg(self) -> Self::Output {
        Expr::Mul(Box::new(Expr::Const(-1.0)), Box::new(self))
    }
}

impl Expr {
    /// BASIC FEATURES

    /// Applies `f` to the direct children of the expression and rebuilds it.
    pub fn map_children<F>(&self, f: F) -> Expr
    where
        F: Fn(&Expr) -> Expr,
    {
        match self {
            Expr::Var(_) | Expr::Const(_) => self.clone(),
            Expr::Add(lhs, rhs) => Expr::Add(Box::new(f(lhs)), Box::new(f(rhs))),
            Expr::Sub(lhs, rhs) => Expr::Sub(Box::new(f(lhs)), Box::new(f(rhs))),
            Expr::Mul(lhs, rhs) => Expr::Mul(Box::new(f(lhs)), Box::new(f(rhs))),
            Expr::Div(lhs, rhs) => Expr::Div(Box::new(f(lhs)), Box::new(f(rhs))),
            Expr::Pow(base, exp) => Expr::Pow(Box::new(f(base)), Box::new(f(exp))),
            Expr::Exp(arg) => Expr::Exp(Box::new(f(arg))),
            Expr::Ln(arg) => Expr::Ln(Box::new(f(arg))),
            Expr::sin(arg) => Expr::sin(Box::new(f(arg))),
            Expr::cos(arg) => Expr::cos(Box::new(f(arg))),
            Expr::tg(arg) => Expr::tg(Box::new(f(arg))),
            Expr::ctg(arg) => Expr::ctg(Box::new(f(arg))),
            Expr::arcsin(arg) => Expr::arcsin(Box::new(f(arg))),
            Expr::arccos(arg) => Expr::arccos(Box::new(f(arg))),
            Expr::arctg(arg) => Expr::arctg(Box::new(f(arg))),
            Expr::arcctg(arg) => Expr::arcctg(Box::new(f(arg))),
        }
    }

    /// Substitutes a variable with a constant value throughout the expression.
    pub fn set_variable(&self, var: &str, value: f64) -> Expr {
        match self {
            Expr::Var(name) if name == var => Expr::Const(value),
            _ => self.map_children(|child| child.set_variable(var, value)),
        }
    }

    /// substitute a variable with an expression
    pub fn substitute_variable(&self, var: &str, expr: &Expr) -> Expr {
        match self {
            Expr::Var(name) if name == var => expr.clone(),
            _ => self.map_children(|child| child.substitute_variable(var, expr)),
        }
    }

    /// check if the expression contains a variable
    pub fn contains_variable(&self, var_name: &str) -> bool {
        match self {
            Expr::Var(name) => name == var_name,
            Expr::Const(_) => false,
            Expr::Add(left, right)
            | Expr::Sub(left, right)
            | Expr::Mul(left, right)
            | Expr::Div(left, right)
            | Expr::Pow(left, right) => {
                left.contains_variable(var_name) || right.contains_variable(var_name)
            }
            Expr::Exp(arg)
            | Expr::Ln(arg)
            | Expr::sin(arg)
            | Expr::cos(arg)
            | Expr::tg(arg)
            | Expr::ctg(arg)
            | Expr::arcsin(arg)
            | Expr::arccos(arg)
            | Expr::arctg(arg)
            | Expr::arcctg(arg) => arg.contains_variable(var_name),
        }
    }

    /// names of all variables in the expression, sorted and deduplicated
    pub fn all_arguments_are_variables(&self) -> Vec<String> {
        fn collect(expr: &Expr, out: &mut Vec<String>) {
            match expr {
                Expr::Var(name) => out.push(name.clone()),
                Expr::Const(_) => {}
                Expr::Add(l, r)
                | Expr::Sub(l, r)
                | Expr::Mul(l, r)
                | Expr::Div(l, r)
                | Expr::Pow(l, r) => {
                    collect(l, out);
                    collect(r, out);
                }
                Expr::Exp(a)
                | Expr::Ln(a)
                | Expr::sin(a)
                | Expr::cos(a)
                | Expr::tg(a)
                | Expr::ctg(a)
                | Expr::arcsin(a)
                | Expr::arccos(a)
                | Expr::arctg(a)
                | Expr::arcctg(a) => collect(a, out),
            }
        }
        let mut vars = Vec::new();
        collect(self, &mut vars);
        vars.sort();
        vars.dedup();
        vars
    }

    /// Convenience method to wrap expression in Box for recursive structures.
    pub fn boxed(self) -> Box<Self> {
        Box::new(self)
    }

    /// Creates exponential function e^(self).
    pub fn exp(self) -> Expr {
        Expr::Exp(self.boxed())
    }

    /// Creates natural logarithm ln(self).
    pub fn ln(self) -> Expr {
        Expr::Ln(self.boxed())
    }

    /// Creates power expression self^rhs.
    pub fn pow(self, rhs: Expr) -> Expr {
        Expr::Pow(self.boxed(), rhs.boxed())
    }

    /// Creates square root self^(1/2).
    pub fn sqrt(self) -> Expr {
        Expr::Pow(self.boxed(), Box::new(Expr::Const(0.5)))
    }

    /// Checks if expression is exactly zero (constant 0.0).
    pub fn is_zero(&self) -> bool {
        matches!(self, Expr::Const(val) if *val == 0.0)
    }

    /// constant value if the expression is a number
    pub fn as_const(&self) -> Option<f64> {
        match self {
            Expr::Const(val) => Some(*val),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn x() -> Expr {
        Expr::Var("x".to_string())
    }

    #[test]
    fn test_display_polynomial() {
        let expr = x().pow(Expr::Const(2.0)) + Expr::Const(2.0) * x() + Expr::Const(1.0);
        assert_eq!(expr.to_string(), "x**2 + 2*x + 1");
    }

    #[test]
    fn test_display_negative_terms() {
        let expr = x() + Expr::Const(-1.0);
        assert_eq!(expr.to_string(), "x - 1");
        let expr = x().pow(Expr::Const(2.0)) + Expr::Const(-2.0) * x();
        assert_eq!(expr.to_string(), "x**2 - 2*x");
        let expr = -x();
        assert_eq!(expr.to_string(), "-x");
    }

    #[test]
    fn test_display_sub_with_sum() {
        let expr = x() - (x() + Expr::Const(1.0));
        assert_eq!(expr.to_string(), "x - (x + 1)");
    }

    #[test]
    fn test_display_division() {
        let expr = x().pow(Expr::Const(2.0)) / Expr::Const(2.0);
        assert_eq!(expr.to_string(), "x**2/2");
        let expr = Expr::Const(1.0) / (x() + Expr::Const(1.0));
        assert_eq!(expr.to_string(), "1/(x + 1)");
        let expr = x() / (Expr::Const(2.0) * Expr::Var("y".to_string()));
        assert_eq!(expr.to_string(), "x/(2*y)");
    }

    #[test]
    fn test_display_powers() {
        let expr = (x() + Expr::Const(1.0)).pow(Expr::Const(2.0));
        assert_eq!(expr.to_string(), "(x + 1)**2");
        let expr = x().pow(Expr::Const(-1.0));
        assert_eq!(expr.to_string(), "x**(-1)");
        let expr = x().sqrt();
        assert_eq!(expr.to_string(), "sqrt(x)");
        let expr = Expr::Const(-2.0).pow(x());
        assert_eq!(expr.to_string(), "(-2)**x");
    }

    #[test]
    fn test_display_functions() {
        assert_eq!(x().exp().to_string(), "exp(x)");
        assert_eq!(x().ln().to_string(), "log(x)");
        assert_eq!(Expr::tg(x().boxed()).to_string(), "tan(x)");
        assert_eq!(Expr::arcsin(x().boxed()).to_string(), "asin(x)");
        let expr = Expr::Const(2.0) * Expr::sin(x().boxed());
        assert_eq!(expr.to_string(), "2*sin(x)");
    }

    #[test]
    fn test_display_rational_constants() {
        assert_eq!(Expr::Const(0.5).to_string(), "1/2");
        let expr = Expr::Const(0.5) * x();
        assert_eq!(expr.to_string(), "(1/2)*x");
    }

    #[test]
    fn test_substitution() {
        let expr = x() + Expr::Var("y".to_string());
        let substituted = expr.set_variable("x", 3.0);
        assert_eq!(substituted, Expr::Const(3.0) + Expr::Var("y".to_string()));
        let replaced = expr.substitute_variable("y", &x());
        assert_eq!(replaced, x() + x());
    }

    #[test]
    fn test_contains_variable_and_arguments() {
        let expr = Expr::sin(x().boxed()) * Expr::Var("a".to_string());
        assert!(expr.contains_variable("x"));
        assert!(!expr.contains_variable("y"));
        assert_eq!(expr.all_arguments_are_variables(), vec!["a".to_string(), "x".to_string()]);
    }
}
