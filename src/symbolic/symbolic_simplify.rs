//! # Symbolic Expression Simplification Module
//!
//! Brings expressions to a canonical sum-of-terms form and renders them back.
//!
//! ## Simplification Strategy
//!
//! Every expression is converted into a [`SumOfTerms`]: a map from [`MonomialKey`]
//! to a numeric coefficient. A monomial is a product of *atoms* raised to integer
//! powers. Atoms are variables and everything that is not a polynomial operation:
//! function calls (`sin(x)`), roots (`sqrt(x)`), symbolic powers (`2**x`) and
//! reciprocals of sums (`(x + 1)**(-1)`).
//!
//! 1. **Constant Folding**: arithmetic on numbers is evaluated
//! 2. **Like Term Collection**: `3*x + 2*x` -> `5*x`, `x - x` -> `0`
//! 3. **Power Rules**: `x*x**2` -> `x**3`, `sqrt(x)*sqrt(x)` -> `x`
//! 4. **Expansion**: products distribute over sums, `(x + 1)**n` is expanded for n <= 10
//! 5. **Exact Division**: `(x**2 - 1)/(x - 1)` -> `x + 1` when the division leaves no remainder
//! 6. **Function Identities**: `exp(0)`, `log(1)`, `log(exp(u))`, `exp(log(u))`, `sin(0)`, `cos(0)`...
//!
//! Rendering orders terms by descending degree, puts plain numbers last among terms
//! of equal degree and recovers small-denominator rationals (`x**2/2`).
//!
//! `simplify` is idempotent: simplifying an already simplified expression returns it unchanged.

use std::cmp::Ordering;
use std::collections::{BTreeMap, HashMap};

use crate::symbolic::symbolic_engine::Expr;
use crate::symbolic::utils::{as_integer, as_rational, gcd};

/// coefficients below this are treated as cancelled
const ZERO_TOLERANCE: f64 = 1e-12;
/// largest integer power of a sum that is expanded
const MAX_EXPANSION_POWER: i64 = 10;
/// exponents of a monomial stay within ±MAX_EXPONENT; larger powers are kept as opaque atoms
pub const MAX_EXPONENT: i32 = 1000;

impl Expr {
    /// Simplifies the expression into canonical form.
    ///
    /// # Examples
    /// ```rust, ignore
    /// let expr = Expr::parse_expression("(x + 1)^2 - 2*x").unwrap();
    /// assert_eq!(expr.simplify().to_string(), "x**2 + 1");
    /// ```
    pub fn simplify(&self) -> Expr {
        SumOfTerms::from_expr(self).to_expr()
    }

    /// Coefficients of the expression as a polynomial in `var`, lowest degree first.
    ///
    /// Coefficients may contain other symbols. Returns `None` when `var` occurs
    /// in a non-polynomial position (`sin(x)`, `1/x`, `sqrt(x)`, `2**x`).
    pub fn polynomial_coefficients(&self, var: &str) -> Option<Vec<Expr>> {
        let sum = SumOfTerms::from_expr(self);
        let by_degree = sum.coefficients_in(var)?;
        Some(by_degree.iter().map(SumOfTerms::to_expr).collect())
    }

    /// Terms of the simplified expression as (coefficient, [(atom, exponent)]).
    ///
    /// `3*x**2*sin(x)` -> `[(3, [(x, 2), (sin(x), 1)])]`
    pub fn term_factors(&self) -> Vec<(f64, Vec<(Expr, i32)>)> {
        let sum = SumOfTerms::from_expr(self);
        sum.terms
            .iter()
            .map(|(key, coef)| {
                let factors = key
                    .0
                    .iter()
                    .map(|(name, exponent)| {
                        let atom = sum
                            .atoms
                            .get(name)
                            .cloned()
                            .unwrap_or_else(|| Expr::Var(name.clone()));
                        (atom, *exponent)
                    })
                    .collect();
                (*coef, factors)
            })
            .collect()
    }
}

/// Represents the atom part of a term (monomial).
///
/// A monomial key encodes which atoms appear in a term and their respective
/// exponents, atoms being identified by their rendered text. For example, the
/// term `3*x**2*sin(y)` has monomial key `{"sin(y)": 1, "x": 2}` and coefficient `3`.
///
/// - `x**2` → `MonomialKey({"x": 2})`
/// - `x/(x + 1)` → `MonomialKey({"x": 1, "x + 1": -1})`
/// - `5` (constant) → `MonomialKey({})` (empty map)
#[derive(Clone, Debug, Default, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct MonomialKey(pub BTreeMap<String, i32>);

fn bounded_exponent(e: i32) -> Option<i32> {
    (e.abs() <= MAX_EXPONENT).then_some(e)
}

impl MonomialKey {
    fn single(atom: String, exponent: i32) -> MonomialKey {
        let mut map = BTreeMap::new();
        if exponent != 0 {
            map.insert(atom, exponent);
        }
        MonomialKey(map)
    }

    /// sum of all exponents
    pub fn degree(&self) -> i32 {
        self.0.values().sum()
    }

    pub fn is_constant(&self) -> bool {
        self.0.is_empty()
    }

    /// product of two monomials; `None` if an exponent leaves the allowed range
    fn merged(&self, other: &MonomialKey) -> Option<MonomialKey> {
        let mut out = self.0.clone();
        for (atom, exponent) in &other.0 {
            let entry = out.entry(atom.clone()).or_insert(0);
            *entry = bounded_exponent(entry.checked_add(*exponent)?)?;
            if *entry == 0 {
                out.remove(atom);
            }
        }
        Some(MonomialKey(out))
    }

    fn powered(&self, n: i32) -> Option<MonomialKey> {
        self.0
            .iter()
            .map(|(atom, e)| Some((atom.clone(), bounded_exponent(e.checked_mul(n)?)?)))
            .collect::<Option<BTreeMap<_, _>>>()
            .map(MonomialKey)
    }
}

/// Canonical sum of monomials with numeric coefficients.
#[derive(Clone, Debug, Default)]
pub struct SumOfTerms {
    terms: BTreeMap<MonomialKey, f64>,
    /// rendered atom -> atom expression
    atoms: HashMap<String, Expr>,
}

impl SumOfTerms {
    pub fn zero() -> SumOfTerms {
        SumOfTerms::default()
    }

    pub fn constant(value: f64) -> SumOfTerms {
        let mut out = SumOfTerms::zero();
        out.insert_term(MonomialKey::default(), value);
        out
    }

    fn atom_power(atom: Expr, exponent: i32) -> SumOfTerms {
        let name = atom.to_string();
        let mut out = SumOfTerms::zero();
        out.insert_term(MonomialKey::single(name.clone(), exponent), 1.0);
        out.atoms.insert(name, atom);
        out
    }

    pub fn atom(atom: Expr) -> SumOfTerms {
        SumOfTerms::atom_power(atom, 1)
    }

    pub fn is_zero(&self) -> bool {
        self.terms.is_empty()
    }

    /// drops the purely numeric term
    pub fn without_constant(mut self) -> SumOfTerms {
        self.terms.remove(&MonomialKey::default());
        self
    }

    /// numeric value if there are no atoms left
    pub fn as_constant(&self) -> Option<f64> {
        match self.terms.len() {
            0 => Some(0.0),
            1 => self
                .terms
                .iter()
                .next()
                .filter(|(key, _)| key.is_constant())
                .map(|(_, coef)| *coef),
            _ => None,
        }
    }

    fn single_term(&self) -> Option<(&MonomialKey, f64)> {
        if self.terms.len() == 1 {
            self.terms.iter().next().map(|(key, coef)| (key, *coef))
        } else {
            None
        }
    }

    fn insert_term(&mut self, key: MonomialKey, coef: f64) {
        let entry = self.terms.entry(key.clone()).or_insert(0.0);
        *entry += coef;
        if entry.abs() < ZERO_TOLERANCE {
            self.terms.remove(&key);
        }
    }

    fn absorb_atoms(&mut self, other: &SumOfTerms) {
        for (name, atom) in &other.atoms {
            self.atoms.entry(name.clone()).or_insert_with(|| atom.clone());
        }
    }

    pub fn add(mut self, other: &SumOfTerms) -> SumOfTerms {
        self.absorb_atoms(other);
        for (key, coef) in &other.terms {
            self.insert_term(key.clone(), *coef);
        }
        self
    }

    pub fn scale(&self, factor: f64) -> SumOfTerms {
        let mut out = SumOfTerms {
            terms: BTreeMap::new(),
            atoms: self.atoms.clone(),
        };
        for (key, coef) in &self.terms {
            out.insert_term(key.clone(), coef * factor);
        }
        out
    }

    /// Product; kept unexpanded as a single atom when an exponent would overflow.
    pub fn mul(&self, other: &SumOfTerms) -> SumOfTerms {
        let mut out = SumOfTerms::zero();
        out.absorb_atoms(self);
        out.absorb_atoms(other);
        for (key_a, coef_a) in &self.terms {
            for (key_b, coef_b) in &other.terms {
                let Some(key) = key_a.merged(key_b) else {
                    return SumOfTerms::atom(Expr::Mul(self.to_expr().boxed(), other.to_expr().boxed()));
                };
                out.insert_term(key, coef_a * coef_b);
            }
        }
        out.reduce_roots()
    }

    /// Raises to an integer power. Sums are expanded up to `MAX_EXPANSION_POWER`,
    /// negative powers of a sum become a reciprocal atom. Powers that would take an
    /// exponent past `MAX_EXPONENT` stay unevaluated.
    pub fn pow_int(&self, n: i64) -> SumOfTerms {
        if n == 0 {
            return SumOfTerms::constant(1.0);
        }
        if self.is_zero() {
            return if n > 0 {
                SumOfTerms::zero()
            } else {
                SumOfTerms::constant(f64::INFINITY)
            };
        }
        let unevaluated = || {
            SumOfTerms::atom(Expr::Pow(self.to_expr().boxed(), Box::new(Expr::Const(n as f64))))
        };
        let Some(n) = i32::try_from(n).ok().and_then(bounded_exponent) else {
            return match self.as_constant().map(|c| c.powf(n as f64)) {
                Some(value) if value.is_finite() => SumOfTerms::constant(value),
                _ => unevaluated(),
            };
        };
        if let Some((key, coef)) = self.single_term() {
            let Some(key) = key.powered(n) else {
                return unevaluated();
            };
            let mut out = SumOfTerms {
                terms: BTreeMap::new(),
                atoms: self.atoms.clone(),
            };
            out.insert_term(key, coef.powi(n));
            return out.reduce_roots();
        }
        let n = n as i64;
        if n > 0 && n <= MAX_EXPANSION_POWER {
            let mut out = SumOfTerms::constant(1.0);
            for _ in 0..n {
                out = out.mul(self);
            }
            return out;
        }
        if n > 0 {
            return SumOfTerms::atom(Expr::Pow(
                self.to_expr().boxed(),
                Box::new(Expr::Const(n as f64)),
            ));
        }
        let (content, primitive) = self.split_content();
        SumOfTerms::atom_power(primitive.to_expr(), n as i32).scale(content.powi(n as i32))
    }

    /// Pulls the gcd out of a sum with integer coefficients: `2*x + 4` -> (2, `x + 2`).
    fn split_content(&self) -> (f64, SumOfTerms) {
        let integers: Option<Vec<i64>> = self.terms.values().map(|c| as_integer(*c)).collect();
        if let Some(integers) = integers {
            let content = integers.iter().fold(0, |acc, c| gcd(acc, *c));
            if content > 1 {
                return (content as f64, self.scale(1.0 / content as f64));
            }
        }
        (1.0, self.clone())
    }

    fn sqrt_base(&self, atom: &str) -> Option<&Expr> {
        match self.atoms.get(atom) {
            Some(Expr::Pow(base, exp)) if **exp == Expr::Const(0.5) => Some(base),
            _ => None,
        }
    }

    fn reducible_root<'a>(&self, key: &'a MonomialKey) -> Option<(&'a String, i32)> {
        key.0
            .iter()
            .find(|(atom, exponent)| exponent.abs() >= 2 && self.sqrt_base(atom).is_some())
            .map(|(atom, exponent)| (atom, *exponent))
    }

    /// `sqrt(u)**k` -> `u**(k div 2) * sqrt(u)**(k mod 2)`
    fn reduce_roots(self) -> SumOfTerms {
        if !self.terms.keys().any(|key| self.reducible_root(key).is_some()) {
            return self;
        }
        let mut out = SumOfTerms {
            terms: BTreeMap::new(),
            atoms: self.atoms.clone(),
        };
        for (key, coef) in &self.terms {
            let Some((atom, exponent)) = self.reducible_root(key) else {
                out.insert_term(key.clone(), *coef);
                continue;
            };
            let base = match self.sqrt_base(atom) {
                Some(base) => SumOfTerms::from_expr(base),
                None => continue,
            };
            let mut rest_key = key.clone();
            rest_key.0.remove(atom);
            if exponent.rem_euclid(2) == 1 {
                rest_key.0.insert(atom.clone(), 1);
            }
            let mut rest = SumOfTerms {
                terms: BTreeMap::new(),
                atoms: self.atoms.clone(),
            };
            rest.insert_term(rest_key, *coef);
            let reduced = rest.mul(&base.pow_int(exponent.div_euclid(2) as i64));
            out = out.add(&reduced);
        }
        out
    }

    /// (atom name, dense coefficients) if this is a polynomial in one atom
    fn univariate(&self) -> Option<(String, Vec<f64>)> {
        let mut atom: Option<&String> = None;
        let mut degree = 0;
        for key in self.terms.keys() {
            if key.0.len() > 1 {
                return None;
            }
            if let Some((name, exponent)) = key.0.iter().next() {
                if *exponent < 0 || atom.is_some_and(|a| a != name) {
                    return None;
                }
                atom = Some(name);
                degree = degree.max(*exponent as usize);
            }
        }
        let atom = atom?.clone();
        let mut dense = vec![0.0; degree + 1];
        for (key, coef) in &self.terms {
            let exponent = key.0.values().next().copied().unwrap_or(0);
            dense[exponent as usize] = *coef;
        }
        Some((atom, dense))
    }

    /// Polynomial long division that only succeeds without remainder.
    fn exact_division(&self, divisor: &SumOfTerms) -> Option<SumOfTerms> {
        if divisor.terms.len() < 2 {
            return None;
        }
        let (atom, den) = divisor.univariate()?;
        let (num_atom, mut num) = self.univariate()?;
        if atom != num_atom || num.len() < den.len() {
            return None;
        }
        let scale = num.iter().fold(1.0_f64, |acc, c| acc.max(c.abs()));
        let lead = den[den.len() - 1];
        let mut quotient = vec![0.0; num.len() - den.len() + 1];
        for i in (0..quotient.len()).rev() {
            let c = num[i + den.len() - 1] / lead;
            quotient[i] = c;
            for (j, d) in den.iter().enumerate() {
                num[i + j] -= c * d;
            }
        }
        if num.iter().any(|r| r.abs() > 1e-9 * scale) {
            return None;
        }
        let mut out = SumOfTerms {
            terms: BTreeMap::new(),
            atoms: self.atoms.clone(),
        };
        for (degree, coef) in quotient.iter().enumerate() {
            out.insert_term(MonomialKey::single(atom.clone(), degree as i32), *coef);
        }
        Some(out)
    }

    /// Splits by powers of `var`. `None` if `var` is not polynomial here.
    fn coefficients_in(&self, var: &str) -> Option<Vec<SumOfTerms>> {
        let is_var_atom = |name: &str| matches!(self.atoms.get(name), Some(Expr::Var(v)) if v == var);
        let mut by_degree: Vec<SumOfTerms> = Vec::new();
        for (key, coef) in &self.terms {
            let mut degree = 0usize;
            let mut rest = BTreeMap::new();
            for (name, exponent) in &key.0 {
                if is_var_atom(name) {
                    if *exponent < 0 {
                        return None;
                    }
                    degree = *exponent as usize;
                } else if self.atoms.get(name).is_some_and(|a| a.contains_variable(var)) {
                    return None;
                } else {
                    rest.insert(name.clone(), *exponent);
                }
            }
            if by_degree.len() <= degree {
                by_degree.resize_with(degree + 1, SumOfTerms::zero);
            }
            by_degree[degree].atoms = self.atoms.clone();
            by_degree[degree].insert_term(MonomialKey(rest), *coef);
        }
        if by_degree.is_empty() {
            by_degree.push(SumOfTerms::zero());
        }
        Some(by_degree)
    }

    /// 1/expr, keeping factored denominators factored
    fn reciprocal_of(expr: &Expr) -> SumOfTerms {
        match expr {
            Expr::Mul(lhs, rhs) => {
                SumOfTerms::reciprocal_of(lhs).mul(&SumOfTerms::reciprocal_of(rhs))
            }
            Expr::Div(lhs, rhs) => SumOfTerms::from_expr(rhs).mul(&SumOfTerms::reciprocal_of(lhs)),
            Expr::Pow(base, exp) => {
                match SumOfTerms::from_expr(exp).as_constant().and_then(as_integer) {
                    Some(n) => SumOfTerms::from_expr(base).pow_int(-n),
                    None => SumOfTerms::from_expr(expr).pow_int(-1),
                }
            }
            _ => SumOfTerms::from_expr(expr).pow_int(-1),
        }
    }

    fn power(base: &Expr, exp: &Expr) -> SumOfTerms {
        let base_sum = SumOfTerms::from_expr(base);
        let exp_sum = SumOfTerms::from_expr(exp);
        if let Some(e) = exp_sum.as_constant() {
            if let Some(n) = as_integer(e) {
                return base_sum.pow_int(n);
            }
            if let Some(c) = base_sum.as_constant() {
                return SumOfTerms::constant_power(c, e);
            }
            if let Some(twice) = as_integer(2.0 * e) {
                return SumOfTerms::root_power(&base_sum, twice);
            }
        }
        SumOfTerms::atom(Expr::Pow(base_sum.to_expr().boxed(), exp_sum.to_expr().boxed()))
    }

    /// sqrt(base)**twice; an integer factor of a single term is taken out: sqrt(4*a) -> 2*sqrt(a)
    fn root_power(base_sum: &SumOfTerms, twice: i64) -> SumOfTerms {
        if let Some((key, coef)) = base_sum.single_term() {
            if !key.is_constant() && coef > 1.0 && as_integer(coef).is_some() {
                let unit = base_sum.scale(1.0 / coef);
                return SumOfTerms::constant_power(coef, twice as f64 / 2.0)
                    .mul(&SumOfTerms::root_power(&unit, twice));
            }
        }
        let root = SumOfTerms::atom(Expr::Pow(
            base_sum.to_expr().boxed(),
            Box::new(Expr::Const(0.5)),
        ));
        root.pow_int(twice)
    }

    /// base**exp for numbers; the exponent is not an integer here
    fn constant_power(base: f64, exp: f64) -> SumOfTerms {
        let value = base.powf(exp);
        // an integer result must give the base back, 2**(1e-10) is not 1
        let exact = |v: f64| {
            as_integer(v).is_some_and(|r| {
                let back = (r as f64).powf(1.0 / exp);
                (back - base).abs() <= 1e-9 * base.abs().max(1.0)
            })
        };
        if value.is_finite() && exact(value) {
            return SumOfTerms::constant(value);
        }
        // decimal bases such as 2.5 or 1e-10 are evaluated
        if value.is_finite() && base.fract() != 0.0 && as_rational(base).is_none() {
            return SumOfTerms::constant(value);
        }
        if base > 0.0 {
            if as_integer(base).is_none() && as_rational(base).is_some() && as_rational(value).is_some() {
                return SumOfTerms::constant(value);
            }
            if exp == 0.5 {
                if let Some(n) = as_integer(base).filter(|n| *n >= 1 && base >= 1.0) {
                    return SumOfTerms::sqrt_of_integer(n);
                }
            } else if let Some(twice) = as_integer(2.0 * exp).filter(|t| *t != 0) {
                return SumOfTerms::constant_power(base, 0.5).pow_int(twice);
            }
        }
        SumOfTerms::atom(Expr::Pow(Box::new(Expr::Const(base)), Box::new(Expr::Const(exp))))
    }

    /// sqrt(8) -> 2*sqrt(2), n >= 1
    fn sqrt_of_integer(n: i64) -> SumOfTerms {
        let mut factor = ((n as f64).sqrt().floor() as i64).max(1);
        while factor > 1 && n % (factor * factor) != 0 {
            factor -= 1;
        }
        let rest = n / (factor * factor);
        let root = SumOfTerms::atom(Expr::Pow(
            Box::new(Expr::Const(rest as f64)),
            Box::new(Expr::Const(0.5)),
        ));
        root.scale(factor as f64)
    }

    /// simplified function call; `identity` gives the exact value for special arguments
    fn function<W, I>(arg: &Expr, wrap: W, identity: I) -> SumOfTerms
    where
        W: Fn(Box<Expr>) -> Expr,
        I: Fn(&SumOfTerms) -> Option<f64>,
    {
        let inner = SumOfTerms::from_expr(arg);
        if let Some(value) = identity(&inner) {
            return SumOfTerms::constant(value);
        }
        SumOfTerms::atom(wrap(inner.to_expr().boxed()))
    }

    /// k for an argument equal to k*pi/2, zero included
    fn half_turns(&self) -> Option<i64> {
        if self.is_zero() {
            return Some(0);
        }
        let (key, coef) = self.single_term()?;
        let (name, exponent) = key.0.iter().next().filter(|_| key.0.len() == 1)?;
        if *exponent != 1 || !matches!(self.atoms.get(name), Some(Expr::Var(v)) if v == "pi") {
            return None;
        }
        as_integer(2.0 * coef)
    }

    pub fn from_expr(expr: &Expr) -> SumOfTerms {
        match expr {
            Expr::Const(val) => SumOfTerms::constant(*val),
            Expr::Var(_) => SumOfTerms::atom(expr.clone()),
            Expr::Add(lhs, rhs) => SumOfTerms::from_expr(lhs).add(&SumOfTerms::from_expr(rhs)),
            Expr::Sub(lhs, rhs) => {
                SumOfTerms::from_expr(lhs).add(&SumOfTerms::from_expr(rhs).scale(-1.0))
            }
            Expr::Mul(lhs, rhs) => SumOfTerms::from_expr(lhs).mul(&SumOfTerms::from_expr(rhs)),
            Expr::Div(lhs, rhs) => {
                let numerator = SumOfTerms::from_expr(lhs);
                let denominator = SumOfTerms::from_expr(rhs);
                if let Some(quotient) = numerator.exact_division(&denominator) {
                    return quotient;
                }
                numerator.mul(&SumOfTerms::reciprocal_of(rhs))
            }
            Expr::Pow(base, exp) => SumOfTerms::power(base, exp),
            Expr::Exp(arg) => {
                let inner = SumOfTerms::from_expr(arg);
                if inner.is_zero() {
                    return SumOfTerms::constant(1.0);
                }
                match inner.to_expr() {
                    Expr::Ln(u) => SumOfTerms::from_expr(&u),
                    other => SumOfTerms::atom(Expr::Exp(other.boxed())),
                }
            }
            Expr::Ln(arg) => {
                let inner = SumOfTerms::from_expr(arg);
                if inner.as_constant() == Some(1.0) {
                    return SumOfTerms::zero();
                }
                match inner.to_expr() {
                    Expr::Exp(u) => SumOfTerms::from_expr(&u),
                    other => SumOfTerms::atom(Expr::Ln(other.boxed())),
                }
            }
            // sin, cos and tan are exact at multiples of pi/2
            Expr::sin(arg) => SumOfTerms::function(arg, Expr::sin, |s| {
                s.half_turns().map(|k| [0.0, 1.0, 0.0, -1.0][k.rem_euclid(4) as usize])
            }),
            Expr::cos(arg) => SumOfTerms::function(arg, Expr::cos, |s| {
                s.half_turns().map(|k| [1.0, 0.0, -1.0, 0.0][k.rem_euclid(4) as usize])
            }),
            Expr::tg(arg) => SumOfTerms::function(arg, Expr::tg, |s| {
                s.half_turns().filter(|k| k % 2 == 0).map(|_| 0.0)
            }),
            Expr::ctg(arg) => SumOfTerms::function(arg, Expr::ctg, |_| None),
            Expr::arcsin(arg) => SumOfTerms::function(arg, Expr::arcsin, |s| {
                (s.as_constant() == Some(0.0)).then_some(0.0)
            }),
            Expr::arccos(arg) => SumOfTerms::function(arg, Expr::arccos, |s| {
                (s.as_constant() == Some(1.0)).then_some(0.0)
            }),
            Expr::arctg(arg) => SumOfTerms::function(arg, Expr::arctg, |s| {
                (s.as_constant() == Some(0.0)).then_some(0.0)
            }),
            Expr::arcctg(arg) => SumOfTerms::function(arg, Expr::arcctg, |_| None),
        }
    }

    fn is_variable_atom(&self, name: &str) -> bool {
        matches!(self.atoms.get(name), Some(Expr::Var(_)))
    }

    /// variables first, then other atoms, alphabetically within each group
    fn atom_order(&self, a: &str, b: &str) -> Ordering {
        let rank = |name: &str| if self.is_variable_atom(name) { 0 } else { 1 };
        rank(a).cmp(&rank(b)).then_with(|| a.cmp(b))
    }

    /// descending degree; among equal degrees higher powers of earlier atoms first, numbers last
    fn term_order(&self, a: &MonomialKey, b: &MonomialKey) -> Ordering {
        let by_degree = b.degree().cmp(&a.degree());
        if by_degree != Ordering::Equal {
            return by_degree;
        }
        let by_constness = a.is_constant().cmp(&b.is_constant());
        if by_constness != Ordering::Equal {
            return by_constness;
        }
        let mut atoms_a: Vec<(&String, &i32)> = a.0.iter().collect();
        let mut atoms_b: Vec<(&String, &i32)> = b.0.iter().collect();
        atoms_a.sort_by(|x, y| self.atom_order(x.0, y.0));
        atoms_b.sort_by(|x, y| self.atom_order(x.0, y.0));
        for ((name_a, exp_a), (name_b, exp_b)) in atoms_a.iter().zip(atoms_b.iter()) {
            let order = self.atom_order(name_a, name_b).then_with(|| exp_b.cmp(exp_a));
            if order != Ordering::Equal {
                return order;
            }
        }
        atoms_a.len().cmp(&atoms_b.len())
    }

    fn term_to_expr(&self, key: &MonomialKey, coef: f64) -> Expr {
        let mut factors: Vec<(&String, i32)> = key.0.iter().map(|(name, e)| (name, *e)).collect();
        factors.sort_by(|x, y| self.atom_order(x.0, y.0));
        let raise = |name: &String, e: i32| {
            let atom = self
                .atoms
                .get(name)
                .cloned()
                .unwrap_or_else(|| Expr::Var(name.clone()));
            if e == 1 { atom } else { atom.pow(Expr::Const(e as f64)) }
        };
        let numerator_factors: Vec<Expr> = factors
            .iter()
            .filter(|(_, e)| *e > 0)
            .map(|(name, e)| raise(name, *e))
            .collect();
        let denominator_factors: Vec<Expr> = factors
            .iter()
            .filter(|(_, e)| *e < 0)
            .map(|(name, e)| raise(name, -e))
            .collect();

        let (num_coef, den_coef) = match (as_integer(coef), as_rational(coef)) {
            (Some(int), _) => (int as f64, 1.0),
            (None, Some((p, q))) => (p as f64, q as f64),
            (None, None) => (coef, 1.0),
        };

        let numerator = product(num_coef, numerator_factors);
        if den_coef == 1.0 && denominator_factors.is_empty() {
            return numerator;
        }
        let denominator = product(den_coef, denominator_factors);
        Expr::Div(numerator.boxed(), denominator.boxed())
    }

    pub fn to_expr(&self) -> Expr {
        let mut ordered: Vec<(&MonomialKey, &f64)> = self.terms.iter().collect();
        ordered.sort_by(|(a, _), (b, _)| self.term_order(a, b));
        ordered
            .into_iter()
            .map(|(key, coef)| self.term_to_expr(key, *coef))
            .reduce(|acc, term| Expr::Add(acc.boxed(), term.boxed()))
            .unwrap_or(Expr::Const(0.0))
    }
}

/// coefficient times factors, left-folded; the coefficient is omitted when it is 1
fn product(coef: f64, factors: Vec<Expr>) -> Expr {
    let mut iter = factors.into_iter();
    let Some(first) = iter.next() else {
        return Expr::Const(coef);
    };
    let start = if coef == 1.0 {
        first
    } else {
        Expr::Mul(Box::new(Expr::Const(coef)), first.boxed())
    };
    iter.fold(start, |acc, factor| Expr::Mul(acc.boxed(), factor.boxed()))
}
