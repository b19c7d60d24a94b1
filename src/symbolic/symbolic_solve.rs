//! # Equation Solving Module
//!
//! Solves a single equation `lhs = rhs` for one variable over the reals.
//!
//! ## Strategy
//! Everything is moved to one side, `h = simplify(lhs - rhs)`, and then:
//! 1. `h` free of the variable: no solutions, or an error when `h` is identically zero
//! 2. polynomial in the variable:
//!    - degree 1 and 2 in closed form, coefficients may be symbolic
//!    - higher degrees with numeric coefficients: rational roots and deflation, `x**n = c`
//!      in radicals, the remainder numerically
//! 3. rational in the variable: denominators are cleared and the result is solved again
//! 4. a single term containing the variable: invertible wrappers are peeled off
//!    (`exp`, `log`, powers, roots, trigonometric functions with both principal branches)
//! 5. last resort when the variable is the only symbol: sign-change scan on [-100, 100]
//!    refined by bisection
//!
//! Numeric roots are sorted ascending; rational multiples of pi are printed as such.

use std::collections::HashMap;
use std::f64::consts::PI;
use std::fmt;

use log::debug;

use crate::symbolic::symbolic_engine::Expr;
use crate::symbolic::symbolic_simplify::MAX_EXPONENT;
use crate::symbolic::utils::{as_integer, as_rational, divisors, gcd, linspace};

const SCAN_BOUND: f64 = 100.0;
const SCAN_STEPS: usize = 4001;
const RESIDUAL_TOLERANCE: f64 = 1e-6;
/// integer coefficients above this are not searched for rational roots
const MAX_RATIONAL_ROOT_COEFFICIENT: i64 = 1_000_000;

/// Equation `lhs = rhs`, printed as `Eq(lhs, rhs)`.
#[derive(Clone, Debug, PartialEq)]
pub struct Equation {
    pub lhs: Expr,
    pub rhs: Expr,
}

impl fmt::Display for Equation {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "Eq({}, {})", self.lhs, self.rhs)
    }
}

/// Renders a solution set: `[]`, `[3]`, `[-sqrt(2), sqrt(2)]`.
pub fn format_solution_set(solutions: &[Expr]) -> String {
    let rendered: Vec<String> = solutions.iter().map(|s| s.to_string()).collect();
    format!("[{}]", rendered.join(", "))
}

impl Equation {
    pub fn new(lhs: Expr, rhs: Expr) -> Equation {
        Equation { lhs, rhs }
    }

    /// Real solutions for `var`.
    ///
    /// # Examples
    /// ```rust, ignore
    /// let eq = Equation::new(Expr::parse_expression("x^2").unwrap(), Expr::Const(4.0));
    /// assert_eq!(format_solution_set(&eq.solve("x").unwrap()), "[-2, 2]");
    /// ```
    pub fn solve(&self, var: &str) -> Result<Vec<Expr>, String> {
        let h = (self.lhs.clone() - self.rhs.clone()).simplify();
        debug!("solving {} = 0 for {}", h, var);
        let roots = solve_zero(&h, var)?;
        Ok(finish(roots))
    }
}

fn solve_zero(h: &Expr, var: &str) -> Result<Vec<Expr>, String> {
    if !h.contains_variable(var) {
        if h.is_zero() {
            return Err(format!("the equation holds for every real {}", var));
        }
        return Ok(Vec::new());
    }
    if has_unevaluated_power(h) {
        return Err(format!("cannot solve {} = 0 for {}: the exponent is too large", h, var));
    }

    if let Some(coefficients) = h.polynomial_coefficients(var) {
        return solve_polynomial(&coefficients, var);
    }

    if let Some((cleared, denominators)) = clear_denominators(h, var) {
        debug!("denominators cleared: {} = 0", cleared);
        let roots = solve_zero(&cleared, var)?;
        return Ok(roots
            .into_iter()
            .filter(|root| {
                denominators
                    .iter()
                    .all(|d| eval_constant(&d.substitute_variable(var, root)).is_none_or(|v| v.abs() > 1e-12))
            })
            .collect());
    }

    if let Some(roots) = solve_by_isolation(h, var) {
        return Ok(roots
            .into_iter()
            .filter(|root| satisfies(h, var, root))
            .collect());
    }

    if h.all_arguments_are_variables().iter().all(|v| v == var || v == "pi") {
        let roots = scan_roots(|x| h.eval_expression(&[var, "pi"], &[x, PI]), -SCAN_BOUND, SCAN_BOUND);
        return Ok(roots.into_iter().map(Expr::Const).collect());
    }

    Err(format!("cannot solve {} = 0 for {}", h, var))
}

/// powers beyond what the simplifier expands, `x**3000000000`
fn has_unevaluated_power(expr: &Expr) -> bool {
    match expr {
        Expr::Var(_) | Expr::Const(_) => false,
        Expr::Pow(base, exp) => {
            exp.as_const().is_some_and(|e| e.abs() > MAX_EXPONENT as f64)
                || has_unevaluated_power(base)
                || has_unevaluated_power(exp)
        }
        Expr::Add(lhs, rhs) | Expr::Sub(lhs, rhs) | Expr::Mul(lhs, rhs) | Expr::Div(lhs, rhs) => {
            has_unevaluated_power(lhs) || has_unevaluated_power(rhs)
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
        | Expr::arcctg(arg) => has_unevaluated_power(arg),
    }
}

/// false when the root evaluates and leaves a residual or hits a pole
fn satisfies(h: &Expr, var: &str, root: &Expr) -> bool {
    let substituted = h.substitute_variable(var, root);
    if !substituted.all_arguments_are_variables().iter().all(|v| v == "pi") {
        return true;
    }
    let value = substituted.eval_expression(&["pi"], &[PI]);
    value.is_finite() && value.abs() < RESIDUAL_TOLERANCE
}

/// numeric value of an expression whose only symbol may be `pi`
fn eval_constant(expr: &Expr) -> Option<f64> {
    if expr.all_arguments_are_variables().iter().any(|v| v != "pi") {
        return None;
    }
    let value = expr.eval_expression(&["pi"], &[PI]);
    value.is_finite().then_some(value)
}

fn pi() -> Expr {
    Expr::Var("pi".to_string())
}

/// Sorts, deduplicates and prints numeric roots as exact numbers or multiples of pi.
fn finish(roots: Vec<Expr>) -> Vec<Expr> {
    let mut tidy: Vec<(Expr, Option<f64>)> = Vec::new();
    for root in roots {
        let value = eval_constant(&root);
        let root = match value {
            Some(v) => tidy_number(root, v),
            None => root,
        };
        let rendered = root.to_string();
        let duplicate = tidy.iter().any(|(other, other_value)| {
            other.to_string() == rendered
                || matches!((value, other_value), (Some(a), Some(b)) if (a - b).abs() < 1e-9 * a.abs().max(1.0))
        });
        if !duplicate {
            tidy.push((root, value));
        }
    }
    if tidy.iter().all(|(_, value)| value.is_some()) {
        tidy.sort_by(|(_, a), (_, b)| a.partial_cmp(b).unwrap_or(std::cmp::Ordering::Equal));
    }
    tidy.into_iter().map(|(root, _)| root).collect()
}

fn tidy_number(root: Expr, value: f64) -> Expr {
    if as_integer(value).is_some() || as_rational(value).is_some() {
        return Expr::Const(value);
    }
    let turns = value / PI;
    if let Some(k) = as_integer(turns) {
        return (Expr::Const(k as f64) * pi()).simplify();
    }
    if let Some((p, q)) = as_rational(turns) {
        return (Expr::Const(p as f64) * pi() / Expr::Const(q as f64)).simplify();
    }
    match root {
        Expr::Const(_) => Expr::Const(value),
        symbolic => symbolic,
    }
}

//___________________________________POLYNOMIALS____________________________________

fn solve_polynomial(coefficients: &[Expr], var: &str) -> Result<Vec<Expr>, String> {
    let degree = coefficients.len() - 1;
    debug!("polynomial of degree {} in {}", degree, var);
    match degree {
        0 => Ok(Vec::new()),
        1 => Ok(vec![
            (-coefficients[0].clone() / coefficients[1].clone()).simplify(),
        ]),
        2 => Ok(solve_quadratic(&coefficients[2], &coefficients[1], &coefficients[0])),
        _ => {
            let numeric: Option<Vec<f64>> = coefficients.iter().map(eval_constant).collect();
            match numeric {
                Some(numeric) => Ok(solve_numeric_polynomial(numeric)),
                None => Err(format!(
                    "cannot solve a polynomial of degree {} with symbolic coefficients",
                    degree
                )),
            }
        }
    }
}

/// real roots of a*x^2 + b*x + c
fn solve_quadratic(a: &Expr, b: &Expr, c: &Expr) -> Vec<Expr> {
    let discriminant = (b.clone().pow(Expr::Const(2.0))
        - Expr::Const(4.0) * a.clone() * c.clone())
    .simplify();
    let two_a = Expr::Const(2.0) * a.clone();
    if let Some(d) = discriminant.as_const() {
        let scale = b.as_const().map(|b| b * b).unwrap_or(0.0).max(1.0);
        if d < -1e-12 * scale {
            return Vec::new();
        }
        if d.abs() <= 1e-12 * scale {
            return vec![(-b.clone() / two_a).simplify()];
        }
    }
    let root = discriminant.sqrt().simplify();
    vec![
        ((-b.clone() - root.clone()) / two_a.clone()).simplify(),
        ((-b.clone() + root) / two_a).simplify(),
    ]
}

fn horner(coefficients: &[f64], x: f64) -> f64 {
    coefficients.iter().rev().fold(0.0, |acc, c| acc * x + c)
}

/// divides by (x - root); coefficients lowest degree first
fn deflate(coefficients: &[f64], root: f64) -> Vec<f64> {
    let n = coefficients.len() - 1;
    let mut out = vec![0.0; n];
    let mut carry = coefficients[n];
    for i in (0..n).rev() {
        out[i] = carry;
        carry = coefficients[i] + carry * root;
    }
    out
}

/// scales rational coefficients to integers
fn integer_coefficients(coefficients: &[f64]) -> Option<Vec<i64>> {
    let mut lcm: i64 = 1;
    for c in coefficients {
        let q = match (as_integer(*c), as_rational(*c)) {
            (Some(_), _) => 1,
            (None, Some((_, q))) => q,
            (None, None) => return None,
        };
        lcm = lcm / gcd(lcm, q) * q;
    }
    coefficients.iter().map(|c| as_integer(c * lcm as f64)).collect()
}

/// p/q with p | a0 and q | an, for a0 != 0
fn rational_root(coefficients: &[i64]) -> Option<f64> {
    let a0 = coefficients[0];
    let an = coefficients[coefficients.len() - 1];
    if a0 == 0 || a0.abs() > MAX_RATIONAL_ROOT_COEFFICIENT || an.abs() > MAX_RATIONAL_ROOT_COEFFICIENT {
        return None;
    }
    let as_f64: Vec<f64> = coefficients.iter().map(|c| *c as f64).collect();
    let magnitude: f64 = as_f64.iter().map(|c| c.abs()).sum();
    for p in divisors(a0) {
        for q in divisors(an) {
            for candidate in [p as f64 / q as f64, -(p as f64) / q as f64] {
                let scale = magnitude * candidate.abs().max(1.0).powi(as_f64.len() as i32);
                if horner(&as_f64, candidate).abs() <= 1e-9 * scale {
                    return Some(candidate);
                }
            }
        }
    }
    None
}

fn solve_numeric_polynomial(mut coefficients: Vec<f64>) -> Vec<Expr> {
    let mut roots = Vec::new();
    while coefficients.len() > 1 && coefficients[0].abs() < 1e-12 {
        roots.push(Expr::Const(0.0));
        coefficients.remove(0);
    }
    while coefficients.len() > 3 {
        match integer_coefficients(&coefficients).and_then(|ints| rational_root(&ints)) {
            Some(root) => {
                roots.push(Expr::Const(root));
                coefficients = deflate(&coefficients, root);
            }
            None => break,
        }
    }
    let constant = |c: f64| Expr::Const(c);
    match coefficients.len() {
        0 | 1 => {}
        2 => roots.push(Expr::Const(-coefficients[0] / coefficients[1])),
        3 => roots.extend(solve_quadratic(
            &constant(coefficients[2]),
            &constant(coefficients[1]),
            &constant(coefficients[0]),
        )),
        _ => roots.extend(solve_high_degree(&coefficients)),
    }
    roots
}

/// x^n = c in radicals, otherwise a numeric scan within the Cauchy bound
fn solve_high_degree(coefficients: &[f64]) -> Vec<Expr> {
    let n = coefficients.len() - 1;
    let lead = coefficients[n];
    if coefficients[1..n].iter().all(|c| c.abs() < 1e-12) {
        let value = -coefficients[0] / lead;
        return real_nth_roots(&Expr::Const(value), n as i32);
    }
    let bound = 1.0 + coefficients[..n].iter().map(|c| (c / lead).abs()).fold(0.0, f64::max);
    scan_roots(|x| horner(coefficients, x), -bound, bound)
        .into_iter()
        .map(Expr::Const)
        .collect()
}

/// real solutions of y^n = value
fn real_nth_roots(value: &Expr, n: i32) -> Vec<Expr> {
    if n == 1 {
        return vec![value.clone()];
    }
    let principal = |v: Expr| v.pow(Expr::Const(1.0 / n as f64)).simplify();
    match eval_constant(value) {
        Some(v) if v == 0.0 => vec![Expr::Const(0.0)],
        Some(v) if v < 0.0 && n % 2 == 0 => Vec::new(),
        Some(v) if v < 0.0 => vec![(-principal(Expr::Const(-v))).simplify()],
        _ if n % 2 == 0 => {
            let root = principal(value.clone());
            vec![(-root.clone()).simplify(), root]
        }
        _ => vec![principal(value.clone())],
    }
}

//___________________________________RATIONAL AND TRANSCENDENTAL____________________________________

/// Multiplies h by every denominator that depends on var. Exponents of the
/// denominator atoms are shifted term by term so that they cancel exactly.
fn clear_denominators(h: &Expr, var: &str) -> Option<(Expr, Vec<Expr>)> {
    let terms = h.term_factors();
    let mut denominators: HashMap<String, (Expr, i32)> = HashMap::new();
    for (_, factors) in &terms {
        for (atom, exponent) in factors {
            if *exponent < 0 && atom.contains_variable(var) {
                let entry = denominators
                    .entry(atom.to_string())
                    .or_insert_with(|| (atom.clone(), 0));
                entry.1 = entry.1.max(-exponent);
            }
        }
    }
    if denominators.is_empty() {
        return None;
    }
    let mut cleared = Expr::Const(0.0);
    for (coef, factors) in terms {
        let mut shift = denominators.clone();
        let mut term = Expr::Const(coef);
        for (atom, exponent) in factors {
            let extra = shift.remove(&atom.to_string()).map_or(0, |(_, power)| power);
            term = term * atom.pow(Expr::Const((exponent + extra) as f64));
        }
        for (atom, power) in shift.into_values() {
            term = term * atom.pow(Expr::Const(power as f64));
        }
        cleared = cleared + term;
    }
    let atoms = denominators.into_values().map(|(atom, _)| atom).collect();
    Some((cleared.simplify(), atoms))
}

/// h = c·atom^e + rest, with var only inside atom
fn solve_by_isolation(h: &Expr, var: &str) -> Option<Vec<Expr>> {
    let mut dependent = Vec::new();
    let mut rest = Expr::Const(0.0);
    for (coef, factors) in h.term_factors() {
        if factors.iter().any(|(atom, _)| atom.contains_variable(var)) {
            dependent.push((coef, factors));
        } else {
            let term = factors
                .into_iter()
                .fold(Expr::Const(coef), |acc, (atom, e)| acc * atom.pow(Expr::Const(e as f64)));
            rest = rest + term;
        }
    }
    let [(coef, factors)] = dependent.as_slice() else {
        return None;
    };

    let mut scale = Expr::Const(*coef);
    let mut target: Option<(&Expr, i32)> = None;
    for (atom, exponent) in factors {
        if atom.contains_variable(var) {
            if target.is_some() {
                return None;
            }
            target = Some((atom, *exponent));
        } else {
            scale = scale * atom.clone().pow(Expr::Const(*exponent as f64));
        }
    }
    let (atom, exponent) = target?;
    let value = (-rest / scale).simplify();
    debug!("isolating {}^{} = {}", atom, exponent, value);

    let values = if exponent < 0 {
        real_nth_roots(&(Expr::Const(1.0) / value).simplify(), -exponent)
    } else {
        real_nth_roots(&value, exponent)
    };

    let mut roots = Vec::new();
    for atom_value in values {
        for (inner, inner_value) in invert_atom(atom, &atom_value)? {
            let equation = Equation::new(inner, inner_value);
            roots.extend(equation.solve(var).ok()?);
        }
    }
    Some(roots)
}

/// For atom = value returns the equations for the atom's argument.
fn invert_atom(atom: &Expr, value: &Expr) -> Option<Vec<(Expr, Expr)>> {
    let numeric = eval_constant(value);
    let positive = numeric.is_none_or(|v| v > 0.0);
    let within_unit = numeric.is_none_or(|v| v.abs() <= 1.0);
    let v = value.clone();
    let branches = match atom {
        Expr::Var(_) | Expr::Add(_, _) | Expr::Sub(_, _) => vec![(atom.clone(), v)],
        Expr::Exp(u) if positive => vec![((**u).clone(), v.ln())],
        Expr::Exp(_) => Vec::new(),
        Expr::Ln(u) => vec![((**u).clone(), v.exp())],
        Expr::sin(u) if within_unit => {
            let principal = Expr::arcsin(v.boxed());
            vec![
                ((**u).clone(), principal.clone()),
                ((**u).clone(), pi() - principal),
            ]
        }
        Expr::cos(u) if within_unit => {
            let principal = Expr::arccos(v.boxed());
            vec![
                ((**u).clone(), principal.clone()),
                ((**u).clone(), Expr::Const(2.0) * pi() - principal),
            ]
        }
        Expr::sin(_) | Expr::cos(_) => Vec::new(),
        Expr::tg(u) => vec![((**u).clone(), Expr::arctg(v.boxed()))],
        Expr::ctg(u) => vec![((**u).clone(), Expr::arcctg(v.boxed()))],
        Expr::arcsin(u) => vec![((**u).clone(), Expr::sin(v.boxed()))],
        Expr::arccos(u) => vec![((**u).clone(), Expr::cos(v.boxed()))],
        Expr::arctg(u) => vec![((**u).clone(), Expr::tg(v.boxed()))],
        Expr::arcctg(u) => vec![((**u).clone(), Expr::ctg(v.boxed()))],
        Expr::Pow(base, exp) => match (base.as_const(), exp.as_const()) {
            (_, Some(e)) if e == 0.5 => {
                if numeric.is_some_and(|v| v < 0.0) {
                    Vec::new()
                } else {
                    vec![((**base).clone(), v.pow(Expr::Const(2.0)))]
                }
            }
            (_, Some(e)) => vec![((**base).clone(), v.pow(Expr::Const(1.0 / e)))],
            (Some(c), None) if c > 0.0 && c != 1.0 && positive => {
                vec![((**exp).clone(), v.ln() / Expr::Const(c).ln())]
            }
            (Some(_), None) => Vec::new(),
            _ => return None,
        },
        _ => return None,
    };
    Some(
        branches
            .into_iter()
            .map(|(inner, value)| (inner, value.simplify()))
            .collect(),
    )
}

/// Sign changes of f on a grid of [lo, hi] refined by bisection; poles are rejected.
fn scan_roots<F>(f: F, lo: f64, hi: f64) -> Vec<f64>
where
    F: Fn(f64) -> f64,
{
    fn push(root: f64, roots: &mut Vec<f64>) {
        if roots.iter().all(|r| (r - root).abs() > 1e-7) {
            roots.push(root);
        }
    }
    let grid = linspace(lo, hi, SCAN_STEPS);
    let mut roots: Vec<f64> = Vec::new();
    for window in grid.windows(2) {
        let (mut a, mut b) = (window[0], window[1]);
        let (mut fa, fb) = (f(a), f(b));
        if !fa.is_finite() || !fb.is_finite() {
            continue;
        }
        if fa == 0.0 {
            push(a, &mut roots);
            continue;
        }
        if fa.signum() == fb.signum() {
            continue;
        }
        for _ in 0..200 {
            let mid = 0.5 * (a + b);
            let fm = f(mid);
            if fm == 0.0 || (b - a).abs() < 1e-15 * mid.abs().max(1.0) {
                a = mid;
                b = mid;
                break;
            }
            if fm.signum() == fa.signum() {
                a = mid;
                fa = fm;
            } else {
                b = mid;
            }
        }
        let root = 0.5 * (a + b);
        if f(root).abs() < RESIDUAL_TOLERANCE {
            push(root, &mut roots);
        }
    }
    if let Some(last) = grid.last() {
        if f(*last) == 0.0 {
            push(*last, &mut roots);
        }
    }
    roots
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn solve(lhs: &str, rhs: &str) -> Result<String, String> {
        let equation = Equation::new(
            Expr::parse_expression(lhs).unwrap(),
            Expr::parse_expression(rhs).unwrap(),
        );
        equation.solve("x").map(|roots| format_solution_set(&roots))
    }

    #[test]
    fn test_equation_display() {
        let equation = Equation::new(
            Expr::parse_expression("x+2").unwrap(),
            Expr::parse_expression("5").unwrap(),
        );
        assert_eq!(equation.to_string(), "Eq(x + 2, 5)");
    }

    #[test]
    fn test_linear() {
        assert_eq!(solve("x+2", "5").unwrap(), "[3]");
        assert_eq!(solve("2*x", "3").unwrap(), "[3/2]");
        assert_eq!(solve("3*x - 1", "x + 4").unwrap(), "[5/2]");
        assert_eq!(solve("a*x + b", "0").unwrap(), "[-b/a]");
    }

    #[test]
    fn test_quadratic() {
        assert_eq!(solve("x^2 - 5*x + 6", "0").unwrap(), "[2, 3]");
        assert_eq!(solve("x^2", "4").unwrap(), "[-2, 2]");
        assert_eq!(solve("x^2", "2").unwrap(), "[-sqrt(2), sqrt(2)]");
        assert_eq!(solve("x^2 - 2*x + 1", "0").unwrap(), "[1]");
        assert_eq!(solve("x^2 + 1", "0").unwrap(), "[]");
    }

    #[test]
    fn test_quadratic_symbolic() {
        let roots = solve("x^2", "a").unwrap();
        assert_eq!(roots, "[-sqrt(a), sqrt(a)]");
    }

    #[test]
    fn test_cubic_rational_roots() {
        assert_eq!(solve("x^3 - 6*x^2 + 11*x - 6", "0").unwrap(), "[1, 2, 3]");
        assert_eq!(solve("2*x^3 - x^2 - 2*x + 1", "0").unwrap(), "[-1, 1/2, 1]");
        assert_eq!(solve("x^3", "0").unwrap(), "[0]");
        assert_eq!(solve("x^3 - x", "0").unwrap(), "[-1, 0, 1]");
    }

    #[test]
    fn test_pure_powers() {
        assert_eq!(solve("x^3", "2").unwrap(), "[2**(1/3)]");
        assert_eq!(solve("x^3", "-8").unwrap(), "[-2]");
        assert_eq!(solve("x^4", "-1").unwrap(), "[]");
    }

    #[test]
    fn test_numeric_polynomial() {
        let equation = Equation::new(
            Expr::parse_expression("x^5 - x - 1").unwrap(),
            Expr::Const(0.0),
        );
        let roots = equation.solve("x").unwrap();
        assert_eq!(roots.len(), 1);
        assert_relative_eq!(roots[0].as_const().unwrap(), 1.1673039782614187, epsilon = 1e-9);
    }

    #[test]
    fn test_no_variable() {
        assert_eq!(solve("5", "3").unwrap(), "[]");
        assert!(solve("x", "x").is_err());
    }

    #[test]
    fn test_rational_equations() {
        assert_eq!(solve("1/x", "2").unwrap(), "[1/2]");
        assert_eq!(solve("x/(x+1)", "2").unwrap(), "[-2]");
        // x = 1 is a pole
        assert_eq!(solve("(x^2 - 1)/(x - 1)", "0").unwrap(), "[-1]");
    }

    #[test]
    fn test_exponential_and_log() {
        assert_eq!(solve("exp(x)", "2").unwrap(), "[log(2)]");
        assert_eq!(solve("exp(2*x)", "3").unwrap(), "[log(3)/2]");
        assert_eq!(solve("exp(x)", "-1").unwrap(), "[]");
        assert_eq!(solve("log(x)", "0").unwrap(), "[1]");
        assert_eq!(solve("2^x", "8").unwrap(), "[3]");
    }

    #[test]
    fn test_trigonometric() {
        assert_eq!(solve("sin(x)", "0").unwrap(), "[0, pi]");
        assert_eq!(solve("cos(x)", "1/2").unwrap(), "[pi/3, 5*pi/3]");
        assert_eq!(solve("sin(x)", "2").unwrap(), "[]");
        assert_eq!(solve("tan(x)", "1").unwrap(), "[pi/4]");
    }

    #[test]
    fn test_roots() {
        assert_eq!(solve("sqrt(x)", "3").unwrap(), "[9]");
        assert_eq!(solve("sqrt(x + 1)", "-1").unwrap(), "[]");
    }

    #[test]
    fn test_numeric_fallback() {
        let equation = Equation::new(
            Expr::parse_expression("x*exp(x)").unwrap(),
            Expr::Const(1.0),
        );
        let roots = equation.solve("x").unwrap();
        assert_eq!(roots.len(), 1);
        assert_relative_eq!(roots[0].as_const().unwrap(), 0.5671432904097838, epsilon = 1e-9);
    }

    #[test]
    fn test_unsolvable_symbolic() {
        assert!(solve("x*exp(x)", "a").is_err());
    }

    #[test]
    fn test_unevaluated_powers_are_rejected() {
        let err = solve("x^2000000000", "2").unwrap_err();
        assert!(err.contains("exponent is too large"), "{}", err);
        assert!(solve("(x^2000000000 + 1)/(x + 1)", "0").is_err());
    }

    #[test]
    fn test_pi_in_equations() {
        assert_eq!(solve("x", "pi").unwrap(), "[pi]");
        assert_eq!(solve("2*x", "pi").unwrap(), "[pi/2]");
        let equation = Equation::new(
            Expr::parse_expression("x^3").unwrap(),
            Expr::parse_expression("pi").unwrap(),
        );
        let roots = equation.solve("x").unwrap();
        assert_eq!(roots.len(), 1);
        assert_relative_eq!(roots[0].as_const().unwrap(), PI.cbrt(), epsilon = 1e-9);
    }

    #[test]
    fn test_deflate_and_horner() {
        // (x - 1)(x - 2) = x^2 - 3x + 2
        let quotient = deflate(&[2.0, -3.0, 1.0], 1.0);
        assert_eq!(quotient, vec![-2.0, 1.0]);
        assert_eq!(horner(&[2.0, -3.0, 1.0], 2.0), 0.0);
    }
}
