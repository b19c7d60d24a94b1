//! Keyword dispatch for free-text problems.
//!
//! The text is lowercased and stripped of whitespace, then the first matching rule wins:
//! 1. `d/dx` or `derivative` -> [`ProblemKind::Derivative`], keywords and brackets removed
//! 2. `∫` or `integral` -> [`ProblemKind::Integral`], keywords and `dx` removed
//! 3. `=` -> [`ProblemKind::Solve`], text kept as is
//! 4. anything else -> [`ProblemKind::Simplify`]
//!
//! Classification never fails: degenerate input such as `"d/dx"` leaves an empty
//! expression, which the parser reports later.
use std::sync::LazyLock;

use regex::Regex;
use serde::{Deserialize, Serialize};
use strum_macros::{Display, EnumIter, EnumString};

static WHITESPACE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\s+").expect("whitespace pattern is a valid regex"));

const DERIVATIVE_MARKERS: [&str; 2] = ["d/dx", "derivative"];
const INTEGRAL_MARKERS: [&str; 2] = ["∫", "integral"];

#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Display, EnumString, EnumIter, Serialize, Deserialize,
)]
#[strum(serialize_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum ProblemKind {
    Derivative,
    Integral,
    Solve,
    Simplify,
}

/// kind of the problem plus the expression text left after keyword stripping
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClassifiedProblem {
    pub kind: ProblemKind,
    pub expression: String,
}

fn strip_all(text: &str, patterns: &[&str]) -> String {
    patterns
        .iter()
        .fold(text.to_string(), |acc, pattern| acc.replace(pattern, ""))
}

pub fn classify(text: &str) -> ClassifiedProblem {
    let normalized = WHITESPACE.replace_all(&text.to_lowercase(), "").into_owned();

    if DERIVATIVE_MARKERS.iter().any(|m| normalized.contains(m)) {
        return ClassifiedProblem {
            kind: ProblemKind::Derivative,
            expression: strip_all(&normalized, &["d/dx", "derivative", "(", ")"]),
        };
    }
    if INTEGRAL_MARKERS.iter().any(|m| normalized.contains(m)) {
        return ClassifiedProblem {
            kind: ProblemKind::Integral,
            expression: strip_all(&normalized, &["∫", "integral", "dx"]),
        };
    }
    let kind = if normalized.contains('=') {
        ProblemKind::Solve
    } else {
        ProblemKind::Simplify
    };
    ClassifiedProblem {
        kind,
        expression: normalized,
    }
}
