//! # Symbolic Engine Derivatives Module
//!
//! Analytical differentiation and numerical evaluation of symbolic expressions.
//!
//! ## Key Methods
//! - `diff(var: &str)` - Analytical partial/total derivative
//! - `eval_expression()` - Direct evaluation for given variable values
//!
//! Differentiation output is not simplified; callers pass it through
//! `simplify()` before printing.

use crate::symbolic::symbolic_engine::Expr;

impl Expr {
    /// DIFFERENTIATION

    /// Computes the analytical derivative of the expression with respect to a variable.
    ///
    /// Implements all standard differentiation rules from calculus:
    /// - Power rule: d/dx(x^n) = n*x^(n-1)
    /// - Product rule: d/dx(f*g) = f'*g + f*g'
    /// - Quotient rule: d/dx(f/g) = (f'*g - f*g')/g^2
    /// - Chain rule: d/dx(f(g(x))) = f'(g(x))*g'(x)
    /// - General power rule: d/dx(u^v) = u^v*(v'*ln(u) + v*u'/u)
    ///
    /// # Examples
    /// ```rust, ignore
    /// let x = Expr::Var("x".to_string());
    /// let f = x.clone().pow(Expr::Const(2.0)); // x^2
    /// let df_dx = f.diff("x").simplify(); // 2*x
    /// ```
    pub fn diff(&self, var: &str) -> Expr {
        match self {
            Expr::Var(name) => {
                if name == var {
                    Expr::Const(1.0)
                } else {
                    Expr::Const(0.0)
                }
            }
            Expr::Const(_) => Expr::Const(0.0),
            Expr::Add(lhs, rhs) => Expr::Add(Box::new(lhs.diff(var)), Box::new(rhs.diff(var))),
            Expr::Sub(lhs, rhs) => Expr::Sub(Box::new(lhs.diff(var)), Box::new(rhs.diff(var))),
            Expr::Mul(lhs, rhs) => Expr::Add(
                Box::new(Expr::Mul(Box::new(lhs.diff(var)), rhs.clone())),
                Box::new(Expr::Mul(lhs.clone(), Box::new(rhs.diff(var)))),
            ),
            Expr::Div(lhs, rhs) => Expr::Div(
                Box::new(Expr::Sub(
                    Box::new(Expr::Mul(Box::new(lhs.diff(var)), rhs.clone())),
                    Box::new(Expr::Mul(Box::new(rhs.diff(var)), lhs.clone())),
                )),
                Box::new(Expr::Pow(rhs.clone(), Box::new(Expr::Const(2.0)))),
            ),
            Expr::Pow(base, exp) => {
                let base_depends = base.contains_variable(var);
                let exp_depends = exp.contains_variable(var);
                match (base_depends, exp_depends) {
                    (false, false) => Expr::Const(0.0),
                    // n * u^(n-1) * u'
                    (true, false) => Expr::Mul(
                        Box::new(Expr::Mul(
                            exp.clone(),
                            Box::new(Expr::Pow(
                                base.clone(),
                                Box::new(Expr::Sub(exp.clone(), Box::new(Expr::Const(1.0)))),
                            )),
                        )),
                        Box::new(base.diff(var)),
                    ),
                    // c^v * ln(c) * v'
                    (false, true) => Expr::Mul(
                        Box::new(Expr::Mul(Box::new(self.clone()), Box::new(Expr::Ln(base.clone())))),
                        Box::new(exp.diff(var)),
                    ),
                    (true, true) => Expr::Mul(
                        Box::new(self.clone()),
                        Box::new(Expr::Add(
                            Box::new(Expr::Mul(Box::new(exp.diff(var)), Box::new(Expr::Ln(base.clone())))),
                            Box::new(Expr::Div(
                                Box::new(Expr::Mul(exp.clone(), Box::new(base.diff(var)))),
                                base.clone(),
                            )),
                        )),
                    ),
                }
            }
            Expr::Exp(expr) => {
                Expr::Mul(Box::new(Expr::Exp(expr.clone())), Box::new(expr.diff(var)))
            }
            Expr::Ln(expr) => Expr::Div(Box::new(expr.diff(var)), expr.clone()),
            Expr::sin(expr) => {
                Expr::Mul(Box::new(Expr::cos(expr.clone())), Box::new(expr.diff(var)))
            }
            Expr::cos(expr) => Expr::Mul(
                Box::new(Expr::Mul(
                    Box::new(Expr::Const(-1.0)),
                    Box::new(Expr::sin(expr.clone())),
                )),
                Box::new(expr.diff(var)),
            ),
            Expr::tg(expr) => Expr::Mul(
                Box::new(Expr::Div(
                    Box::new(Expr::Const(1.0)),
                    Box::new(Expr::Pow(
                        Box::new(Expr::cos(expr.clone())),
                        Box::new(Expr::Const(2.0)),
                    )),
                )),
                Box::new(expr.diff(var)),
            ),
            Expr::ctg(expr) => Expr::Mul(
                Box::new(Expr::Div(
                    Box::new(Expr::Const(-1.0)),
                    Box::new(Expr::Pow(
                        Box::new(Expr::sin(expr.clone())),
                        Box::new(Expr::Const(2.0)),
                    )),
                )),
                Box::new(expr.diff(var)),
            ),
            Expr::arcsin(expr) => Expr::Div(
                Box::new(expr.diff(var)),
                Box::new(Expr::Pow(
                    Box::new(Expr::Sub(
                        Box::new(Expr::Const(1.0)),
                        Box::new(Expr::Pow(expr.clone(), Box::new(Expr::Const(2.0)))),
                    )),
                    Box::new(Expr::Const(0.5)),
                )),
            ),
            Expr::arccos(expr) => Expr::Div(
                Box::new(Expr::Mul(
                    Box::new(Expr::Const(-1.0)),
                    Box::new(expr.diff(var)),
                )),
                Box::new(Expr::Pow(
                    Box::new(Expr::Sub(
                        Box::new(Expr::Const(1.0)),
                        Box::new(Expr::Pow(expr.clone(), Box::new(Expr::Const(2.0)))),
                    )),
                    Box::new(Expr::Const(0.5)),
                )),
            ),
            Expr::arctg(expr) => Expr::Div(
                Box::new(expr.diff(var)),
                Box::new(Expr::Add(
                    Box::new(Expr::Const(1.0)),
                    Box::new(Expr::Pow(expr.clone(), Box::new(Expr::Const(2.0)))),
                )),
            ),
            Expr::arcctg(expr) => Expr::Div(
                Box::new(Expr::Mul(
                    Box::new(Expr::Const(-1.0)),
                    Box::new(expr.diff(var)),
                )),
                Box::new(Expr::Add(
                    Box::new(Expr::Const(1.0)),
                    Box::new(Expr::Pow(expr.clone(), Box::new(Expr::Const(2.0)))),
                )),
            ),
        }
    }

    /// Evaluates the expression numerically.
    ///
    /// `vars` and `values` are matched by position. A variable that is not listed
    /// evaluates to NaN, so the result is NaN as well.
    pub fn eval_expression(&self, vars: &[&str], values: &[f64]) -> f64 {
        match self {
            Expr::Var(name) => vars
                .iter()
                .position(|v| *v == name.as_str())
                .map(|index| values[index])
                .unwrap_or(f64::NAN),
            Expr::Const(val) => *val,
            Expr::Add(lhs, rhs) => lhs.eval_expression(vars, values) + rhs.eval_expression(vars, values),
            Expr::Sub(lhs, rhs) => lhs.eval_expression(vars, values) - rhs.eval_expression(vars, values),
            Expr::Mul(lhs, rhs) => lhs.eval_expression(vars, values) * rhs.eval_expression(vars, values),
            Expr::Div(lhs, rhs) => lhs.eval_expression(vars, values) / rhs.eval_expression(vars, values),
            Expr::Pow(base, exp) => {
                let base_fn = base.eval_expression(vars, values);
                let exp_fn = exp.eval_expression(vars, values);
                base_fn.powf(exp_fn)
            }
            Expr::Exp(expr) => expr.eval_expression(vars, values).exp(),
            Expr::Ln(expr) => expr.eval_expression(vars, values).ln(),
            Expr::sin(expr) => expr.eval_expression(vars, values).sin(),
            Expr::cos(expr) => expr.eval_expression(vars, values).cos(),
            Expr::tg(expr) => expr.eval_expression(vars, values).tan(),
            Expr::ctg(expr) => 1.0 / expr.eval_expression(vars, values).tan(),
            Expr::arcsin(expr) => expr.eval_expression(vars, values).asin(),
            Expr::arccos(expr) => expr.eval_expression(vars, values).acos(),
            Expr::arctg(expr) => expr.eval_expression(vars, values).atan(),
            Expr::arcctg(expr) => {
                std::f64::consts::FRAC_PI_2 - expr.eval_expression(vars, values).atan()
            }
        }
    }

    /// value of an expression with a single argument
    pub fn eval_expression1D(&self, var: &str, value: f64) -> f64 {
        self.eval_expression(&[var], &[value])
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn parse(input: &str) -> Expr {
        Expr::parse_expression(input).unwrap()
    }

    #[test]
    fn test_diff_power() {
        let df = parse("x^2").diff("x").simplify();
        assert_eq!(df.to_string(), "2*x");
        let df = parse("x^3 + 2*x").diff("x").simplify();
        assert_eq!(df.to_string(), "3*x**2 + 2");
    }

    #[test]
    fn test_diff_constant_and_other_variable() {
        assert_eq!(parse("5").diff("x").simplify(), Expr::Const(0.0));
        assert_eq!(parse("y").diff("x").simplify(), Expr::Const(0.0));
        assert_eq!(parse("a*x").diff("x").simplify().to_string(), "a");
    }

    #[test]
    fn test_diff_product_rule() {
        let df = parse("x*exp(x)").diff("x").simplify();
        assert_eq!(df.to_string(), "x*exp(x) + exp(x)");
    }

    #[test]
    fn test_diff_chain_rule() {
        let df = parse("sin(x^2)").diff("x").simplify();
        assert_eq!(df.to_string(), "2*x*cos(x**2)");
        let df = parse("log(x)").diff("x").simplify();
        assert_eq!(df.to_string(), "1/x");
    }

    #[test]
    fn test_diff_exponential_power() {
        // d/dx 2^x = 2^x * ln(2)
        let df = parse("2^x").diff("x").simplify();
        assert_relative_eq!(
            df.eval_expression1D("x", 1.0),
            2.0 * 2f64.ln(),
            epsilon = 1e-12
        );
        // d/dx x^x = x^x * (ln(x) + 1)
        let df = parse("x^x").diff("x").simplify();
        assert_relative_eq!(df.eval_expression1D("x", 2.0), 4.0 * (2f64.ln() + 1.0), epsilon = 1e-10);
    }

    #[test]
    fn test_diff_against_numerical() {
        for input in [
            "sin(x)*cos(x)",
            "exp(2*x)/(x+1)",
            "tan(x)",
            "arctg(x^2)",
            "arcsin(x/2)",
            "sqrt(x+3)",
            "cot(x)",
            "acot(x)",
        ] {
            let f = parse(input);
            let df = f.diff("x").simplify();
            let h = 1e-6;
            for i in 1..10 {
                let x = i as f64 / 10.0;
                let central = (f.eval_expression1D("x", x + h) - f.eval_expression1D("x", x - h)) / (2.0 * h);
                assert_relative_eq!(df.eval_expression1D("x", x), central, epsilon = 1e-5);
            }
        }
    }

    #[test]
    fn test_repeated_derivative() {
        let d3 = parse("x^4").diff("x").simplify().diff("x").simplify().diff("x").simplify();
        assert_eq!(d3.to_string(), "24*x");
    }

    #[test]
    fn test_eval_expression() {
        let expr = parse("x^2 + y");
        assert_relative_eq!(expr.eval_expression(&["x", "y"], &[3.0, 1.0]), 10.0);
        assert!(expr.eval_expression(&["x"], &[3.0]).is_nan());
    }
}
