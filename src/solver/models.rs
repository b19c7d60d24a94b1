use serde::ser::SerializeStruct;
use serde::{Deserialize, Serialize, Serializer};

use crate::solver::errors::SolveError;

/// body of `POST /solve`; a missing `problem` is an empty problem
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ProblemRequest {
    #[serde(default)]
    pub problem: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SolutionResult {
    pub steps: Vec<String>,
    pub answer: String,
}

/// `{"success": true, "result": {...}}` or `{"success": false, "error": "..."}`;
/// the `success` flag follows from the variant
#[derive(Debug, Clone, PartialEq)]
pub enum SolveResponse {
    Solved(SolutionResult),
    Failed(String),
}

impl SolveResponse {
    pub fn solved(result: SolutionResult) -> SolveResponse {
        SolveResponse::Solved(result)
    }

    pub fn failed(error: &SolveError) -> SolveResponse {
        SolveResponse::Failed(error.to_string())
    }

    pub fn is_success(&self) -> bool {
        matches!(self, SolveResponse::Solved(_))
    }
}

impl Serialize for SolveResponse {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut envelope = serializer.serialize_struct("SolveResponse", 2)?;
        match self {
            SolveResponse::Solved(result) => {
                envelope.serialize_field("success", &true)?;
                envelope.serialize_field("result", result)?;
            }
            SolveResponse::Failed(error) => {
                envelope.serialize_field("success", &false)?;
                envelope.serialize_field("error", error)?;
            }
        }
        envelope.end()
    }
}

impl From<Result<SolutionResult, SolveError>> for SolveResponse {
    fn from(outcome: Result<SolutionResult, SolveError>) -> SolveResponse {
        match outcome {
            Ok(result) => SolveResponse::solved(result),
            Err(error) => SolveResponse::failed(&error),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_request_defaults() {
        let request: ProblemRequest = serde_json::from_str("{}").unwrap();
        assert_eq!(request.problem, "");
        let request: ProblemRequest = serde_json::from_str(r#"{"problem": "5+3"}"#).unwrap();
        assert_eq!(request.problem, "5+3");
    }

    #[test]
    fn test_envelopes() {
        let solved = SolveResponse::solved(SolutionResult {
            steps: vec!["Problem: 5 + 3".to_string()],
            answer: "8".to_string(),
        });
        assert_eq!(
            serde_json::to_value(&solved).unwrap(),
            json!({"success": true, "result": {"steps": ["Problem: 5 + 3"], "answer": "8"}})
        );

        let failed: SolveResponse =
            Err(SolveError::EquationSyntax("missing right-hand side".to_string())).into();
        assert!(!failed.is_success());
        assert!(solved.is_success());
        assert_eq!(
            serde_json::to_value(&failed).unwrap(),
            json!({"success": false, "error": "Invalid equation syntax: missing right-hand side"})
        );
    }
}
