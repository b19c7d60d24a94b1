//! # Symbolic Integration Module
//!
//! Indefinite integration of expressions in one variable. The integrand is first
//! simplified into a sum of terms; each term is a numeric coefficient times a product
//! of atoms, and is integrated on its own (linearity). A term is handled when, after
//! setting its constant factors aside, it has the shape `x**n * T` with at most one
//! non-polynomial atom `T`. Strategies are tried in order:
//!
//! 1. power rule for `x**n` (`n = -1` gives `log(x)`)
//! 2. substitution: `x**n / u'` is constant for the argument `u` of `T`
//!    (covers linear arguments, `x*exp(x**2)`, `2*x/(x**2 + 1)`)
//! 3. tabular integration by parts: `x**n * exp/sin/cos(a*x + b)` and `x**n * c**(a*x + b)`
//! 4. integration by parts for `x**n * log(x)`
//! 5. linear substitution `t = a*x + b` for `x**n * (a*x + b)**r`
//! 6. `1/(a*x**2 + b*x + c)` with a negative discriminant -> `atan`
//!
//! Anything else is reported as an error naming the term. The constant of integration is
//! not included, and numeric constant terms of the antiderivative are dropped.

use crate::symbolic::symbolic_engine::Expr;
use crate::symbolic::symbolic_simplify::SumOfTerms;

/// fresh variable for the linear substitution t = a*x + b
const SUBSTITUTION_VAR: &str = "__t";

impl Expr {
    /// SYMBOLIC INTEGRATION

    /// Main integration method - integrates with respect to a variable.
    /// Returns the simplified indefinite integral without the constant of integration.
    ///
    /// # Examples
    /// ```rust, ignore
    /// let f = Expr::parse_expression("x*exp(x)").unwrap();
    /// assert_eq!(f.integrate("x").unwrap().to_string(), "x*exp(x) - exp(x)");
    /// ```
    pub fn integrate(&self, var: &str) -> Result<Expr, String> {
        let mut total = Expr::Const(0.0);
        for (coef, factors) in self.simplify().term_factors() {
            let term = integrate_term(coef, &factors, var)?;
            total = total + term;
        }
        Ok(SumOfTerms::from_expr(&total).without_constant().to_expr())
    }
}

fn raise(atom: &Expr, exponent: i32) -> Expr {
    if exponent == 1 {
        atom.clone()
    } else {
        atom.clone().pow(Expr::Const(exponent as f64))
    }
}

/// ∫ u^n du
fn power_rule(u: &Expr, n: f64) -> Expr {
    if n == -1.0 {
        u.clone().ln()
    } else {
        u.clone().pow(Expr::Const(n + 1.0)) / Expr::Const(n + 1.0)
    }
}

/// derivative of `u` if it is a nonzero constant, i.e. `u` is linear in var
fn linear_slope(u: &Expr, var: &str) -> Option<f64> {
    u.diff(var).simplify().as_const().filter(|a| *a != 0.0)
}

/// One term `coef * Π atom^e`.
fn integrate_term(coef: f64, factors: &[(Expr, i32)], var: &str) -> Result<Expr, String> {
    let x = Expr::Var(var.to_string());
    let mut constant = Expr::Const(coef);
    let mut power = 0;
    let mut others: Vec<(&Expr, i32)> = Vec::new();
    for (atom, exponent) in factors {
        if *atom == x {
            power = *exponent;
        } else if !atom.contains_variable(var) {
            constant = constant * raise(atom, *exponent);
        } else {
            others.push((atom, *exponent));
        }
    }

    let integral = match others.as_slice() {
        [] => Some(power_rule(&x, power as f64)),
        [(atom, exponent)] => integrate_product(power, atom, *exponent, var),
        _ => None,
    };
    match integral {
        Some(integral) => Ok(constant * integral),
        None => {
            let term = factors
                .iter()
                .fold(Expr::Const(coef), |acc, (atom, e)| acc * raise(atom, *e))
                .simplify();
            Err(format!("cannot integrate {} with respect to {}", term, var))
        }
    }
}

/// ∫ x^n * atom^e dx
fn integrate_product(n: i32, atom: &Expr, exponent: i32, var: &str) -> Option<Expr> {
    let x = Expr::Var(var.to_string());
    let polynomial = x.clone().pow(Expr::Const(n as f64));

    if let Some((u, outer)) = outer_antiderivative(atom, exponent) {
        let du = u.diff(var).simplify();
        if !du.is_zero() {
            let ratio = (polynomial.clone() / du).simplify();
            if !ratio.contains_variable(var) {
                return Some(ratio * outer);
            }
        }
    }

    if n >= 1 && exponent == 1 && is_tabular_factor(atom, var) {
        return integrate_tabular(&polynomial, atom, var);
    }

    if exponent == 1 && *atom == x.clone().ln() {
        return Some(integrate_xn_times_ln_x(n, var));
    }

    match atom {
        Expr::Add(_, _) | Expr::Sub(_, _) if n >= 1 => {
            integrate_by_linear_substitution(n, atom, exponent as f64, var)
        }
        Expr::Pow(base, half) if n >= 1 && **half == Expr::Const(0.5) => {
            integrate_by_linear_substitution(n, base, exponent as f64 / 2.0, var)
        }
        Expr::Add(_, _) | Expr::Sub(_, _) if n == 0 && exponent == -1 => {
            integrate_inverse_quadratic(atom, var)
        }
        _ => None,
    }
}

/// For `atom^e` returns (u, G(u)) with G' = atom^e as a function of u.
fn outer_antiderivative(atom: &Expr, exponent: i32) -> Option<(Expr, Expr)> {
    let square_of = |u: &Expr| u.clone().pow(Expr::Const(2.0));
    match (atom, exponent) {
        (Expr::Exp(u), e) => {
            let u = (Expr::Const(e as f64) * (**u).clone()).simplify();
            Some((u.clone(), u.exp()))
        }
        (Expr::sin(u), 1) => Some(((**u).clone(), -Expr::cos(u.clone()))),
        (Expr::cos(u), 1) => Some(((**u).clone(), Expr::sin(u.clone()))),
        (Expr::tg(u), 1) => Some(((**u).clone(), -Expr::cos(u.clone()).ln())),
        (Expr::ctg(u), 1) => Some(((**u).clone(), Expr::sin(u.clone()).ln())),
        (Expr::Ln(u), 1) => {
            let u = (**u).clone();
            Some((u.clone(), u.clone() * u.clone().ln() - u))
        }
        (Expr::arcsin(u), 1) => {
            let root = (Expr::Const(1.0) - square_of(&**u)).sqrt();
            Some(((**u).clone(), (**u).clone() * Expr::arcsin(u.clone()) + root))
        }
        (Expr::arccos(u), 1) => {
            let root = (Expr::Const(1.0) - square_of(&**u)).sqrt();
            Some(((**u).clone(), (**u).clone() * Expr::arccos(u.clone()) - root))
        }
        (Expr::arctg(u), 1) => {
            let log = (Expr::Const(1.0) + square_of(&**u)).ln() / Expr::Const(2.0);
            Some(((**u).clone(), (**u).clone() * Expr::arctg(u.clone()) - log))
        }
        (Expr::arcctg(u), 1) => {
            let log = (Expr::Const(1.0) + square_of(&**u)).ln() / Expr::Const(2.0);
            Some(((**u).clone(), (**u).clone() * Expr::arcctg(u.clone()) + log))
        }
        (Expr::Pow(base, exp), e) => match (base.as_const(), exp.as_const()) {
            (_, Some(c)) => Some(((**base).clone(), power_rule(base, c * e as f64))),
            (Some(c), None) if c > 0.0 && c != 1.0 => {
                let u = (Expr::Const(e as f64) * (**exp).clone()).simplify();
                let outer = Expr::Const(c).pow(u.clone()) / Expr::Const(c).ln();
                Some((u, outer))
            }
            _ => None,
        },
        // reciprocal powers of sums
        (Expr::Add(_, _) | Expr::Sub(_, _), e) => Some((atom.clone(), power_rule(atom, e as f64))),
        _ => None,
    }
}

fn is_tabular_factor(atom: &Expr, var: &str) -> bool {
    match atom {
        Expr::Exp(u) | Expr::sin(u) | Expr::cos(u) => linear_slope(u, var).is_some(),
        Expr::Pow(base, exp) => {
            base.as_const().is_some_and(|c| c > 0.0 && c != 1.0)
                && linear_slope(exp, var).is_some()
        }
        _ => false,
    }
}

/// ∫ P(x)·T(x) dx = Σ (-1)^k P^(k)(x) T_(k+1)(x), T_j being the j-th antiderivative of T
fn integrate_tabular(polynomial: &Expr, atom: &Expr, var: &str) -> Option<Expr> {
    let mut derivative = polynomial.simplify();
    let mut antiderivative = atom.clone();
    let mut sign = 1.0;
    let mut result = Expr::Const(0.0);
    while !derivative.is_zero() {
        antiderivative = antiderivative.integrate(var).ok()?;
        result = result + Expr::Const(sign) * derivative.clone() * antiderivative.clone();
        derivative = derivative.diff(var).simplify();
        sign = -sign;
    }
    Some(result.simplify())
}

/// ∫ x^n·ln(x) dx = x^(n+1)·ln(x)/(n+1) - x^(n+1)/(n+1)^2, and ln(x)^2/2 for n = -1
fn integrate_xn_times_ln_x(n: i32, var: &str) -> Expr {
    let x = Expr::Var(var.to_string());
    if n == -1 {
        return x.ln().pow(Expr::Const(2.0)) / Expr::Const(2.0);
    }
    let m = (n + 1) as f64;
    let x_m = x.clone().pow(Expr::Const(m));
    x_m.clone() * x.ln() / Expr::Const(m) - x_m / Expr::Const(m * m)
}

fn binomial(n: i32, k: i32) -> f64 {
    (0..k).fold(1.0, |acc, i| acc * (n - i) as f64 / (i + 1) as f64)
}

/// ∫ x^n·s^r dx with s = a*x + b, via x = (t - b)/a
fn integrate_by_linear_substitution(n: i32, s: &Expr, r: f64, var: &str) -> Option<Expr> {
    let coefficients = s.polynomial_coefficients(var)?;
    let [b, a] = coefficients.as_slice() else {
        return None;
    };
    let (b, a) = (b.as_const()?, a.as_const()?);
    if a == 0.0 {
        return None;
    }
    let t = Expr::Var(SUBSTITUTION_VAR.to_string());
    let mut result = Expr::Const(0.0);
    for i in 0..=n {
        let coef = binomial(n, i) * (-b).powi(n - i) / a.powi(n + 1);
        if coef == 0.0 {
            continue;
        }
        result = result + Expr::Const(coef) * power_rule(&t, i as f64 + r);
    }
    Some(result.substitute_variable(SUBSTITUTION_VAR, s).simplify())
}

/// ∫ 1/(a*x^2 + b*x + c) dx = 2/sqrt(D)·atan((2a*x + b)/sqrt(D)), D = 4ac - b^2 > 0
fn integrate_inverse_quadratic(s: &Expr, var: &str) -> Option<Expr> {
    let coefficients = s.polynomial_coefficients(var)?;
    let [c, b, a] = coefficients.as_slice() else {
        return None;
    };
    let (c, b, a) = (c.as_const()?, b.as_const()?, a.as_const()?);
    let discriminant = 4.0 * a * c - b * b;
    if discriminant <= 0.0 {
        return None;
    }
    let root = Expr::Const(discriminant).sqrt().simplify();
    let x = Expr::Var(var.to_string());
    let argument = (Expr::Const(2.0 * a) * x + Expr::Const(b)) / root.clone();
    Some((Expr::Const(2.0) / root * Expr::arctg(argument.boxed())).simplify())
}
