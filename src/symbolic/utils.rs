// the collection of utility functions for bracket checking, number formatting and numerics

/// true if every '(' has a matching ')' and no ')' closes an unopened bracket
pub fn brackets_balanced(s: &str) -> bool {
    let mut depth: i32 = 0;
    for c in s.chars() {
        match c {
            '(' => depth += 1,
            ')' => {
                depth -= 1;
                if depth < 0 {
                    return false;
                }
            }
            _ => {}
        }
    }
    depth == 0
}

const INTEGER_TOLERANCE: f64 = 1e-9;
const MAX_DISPLAY_DENOMINATOR: i64 = 100;

/// Returns the value as an integer if it is one up to rounding noise.
pub fn as_integer(val: f64) -> Option<i64> {
    if !val.is_finite() || val.abs() > 1e15 {
        return None;
    }
    let rounded = val.round();
    if (val - rounded).abs() <= INTEGER_TOLERANCE * val.abs().max(1.0) {
        Some(rounded as i64)
    } else {
        None
    }
}

/// Finds p/q == val with a small denominator, q > 1.
pub fn as_rational(val: f64) -> Option<(i64, i64)> {
    if !val.is_finite() || as_integer(val).is_some() {
        return None;
    }
    for q in 2..=MAX_DISPLAY_DENOMINATOR {
        if let Some(p) = as_integer(val * q as f64) {
            return Some((p, q));
        }
    }
    None
}

/// Renders a number the way a computer algebra system prints it:
/// `8`, `-3`, `1/2`, `1.4142135623730951`, `oo`.
pub fn format_number(val: f64) -> String {
    if val.is_nan() {
        return "nan".to_string();
    }
    if val.is_infinite() {
        return if val > 0.0 { "oo".to_string() } else { "-oo".to_string() };
    }
    if let Some(int) = as_integer(val) {
        return int.to_string();
    }
    if let Some((p, q)) = as_rational(val) {
        return format!("{}/{}", p, q);
    }
    format!("{}", val)
}

pub fn gcd(a: i64, b: i64) -> i64 {
    let (mut a, mut b) = (a.abs(), b.abs());
    while b != 0 {
        let t = a % b;
        a = b;
        b = t;
    }
    a
}

/// positive divisors of n, n != 0
pub fn divisors(n: i64) -> Vec<i64> {
    let n = n.abs();
    let mut small = Vec::new();
    let mut large = Vec::new();
    let mut i = 1;
    while i * i <= n {
        if n % i == 0 {
            small.push(i);
            if i != n / i {
                large.push(n / i);
            }
        }
        i += 1;
    }
    large.reverse();
    small.extend(large);
    small
}

pub fn linspace(start: f64, end: f64, num_values: usize) -> Vec<f64> {
    let mut values = Vec::with_capacity(num_values);
    let step = (end - start) / (num_values as f64 - 1.0);

    for i in 0..num_values {
        let value = start + (i as f64 * step);
        values.push(value);
    }

    values
}
