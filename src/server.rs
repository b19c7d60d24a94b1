//! HTTP surface: a single `POST /solve` route with permissive CORS.
//!
//! The request body is `{"problem": "..."}` and the answer is always HTTP 200 with the
//! success or the failure envelope. Engine work is CPU-bound, so every request is
//! solved on the blocking pool.
use axum::{Json, Router, routing::post};
use log::{info, warn};
use thiserror::Error;
use tower_http::cors::{Any, CorsLayer};

use crate::Utils::config::ServerConfig;
use crate::solver::errors::SolveError;
use crate::solver::handler::respond;
use crate::solver::models::{ProblemRequest, SolveResponse};

/// startup failures; they end the process
#[derive(Error, Debug)]
pub enum ServerError {
    #[error("Configuration error in {path}: {source}")]
    Config {
        path: String,
        source: toml::de::Error,
    },

    #[error("Cannot bind {address}: {source}")]
    Bind {
        address: String,
        source: std::io::Error,
    },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

pub fn build_router() -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);
    Router::new().route("/solve", post(solve)).layer(cors)
}

async fn solve(Json(request): Json<ProblemRequest>) -> Json<SolveResponse> {
    let outcome = tokio::task::spawn_blocking(move || respond(&request.problem)).await;
    match outcome {
        Ok(response) => Json(response),
        Err(join_error) => {
            warn!("solver task failed: {}", join_error);
            Json(SolveResponse::failed(&SolveError::Compute(
                join_error.to_string(),
            )))
        }
    }
}

async fn shutdown_signal() {
    match tokio::signal::ctrl_c().await {
        Ok(()) => info!("Ctrl-C received, shutting down"),
        Err(err) => {
            warn!("cannot listen for Ctrl-C: {}", err);
            std::future::pending::<()>().await
        }
    }
}

/// Binds `host:port` and serves until Ctrl-C.
pub async fn serve(config: &ServerConfig) -> Result<(), ServerError> {
    let address = config.address();
    let listener = tokio::net::TcpListener::bind(&address)
        .await
        .map_err(|source| ServerError::Bind {
            address: address.clone(),
            source,
        })?;
    info!("listening on http://{}", address);
    axum::serve(listener, build_router())
        .with_graceful_shutdown(shutdown_signal())
        .await?;
    info!("server stopped");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::Body;
    use axum::http::{Request, StatusCode, header};
    use serde_json::{Value, json};
    use tower::ServiceExt;

    fn solve_request(body: &str) -> Request<Body> {
        Request::builder()
            .method("POST")
            .uri("/solve")
            .header(header::CONTENT_TYPE, "application/json")
            .header(header::ORIGIN, "http://localhost:3000")
            .body(Body::from(body.to_string()))
            .unwrap()
    }

    async fn post_json(body: &str) -> (StatusCode, Value) {
        let response = build_router().oneshot(solve_request(body)).await.unwrap();
        let status = response.status();
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        (status, serde_json::from_slice(&bytes).unwrap())
    }

    #[tokio::test]
    async fn test_success_envelope() {
        let (status, body) = post_json(r#"{"problem": "x+2=5"}"#).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["success"], json!(true));
        assert_eq!(body["result"]["answer"], json!("[3]"));
        assert_eq!(body["result"]["steps"].as_array().unwrap().len(), 4);
    }

    #[tokio::test]
    async fn test_failure_envelope_is_still_200() {
        let (status, body) = post_json(r#"{"problem": "x+2=5=7"}"#).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["success"], json!(false));
        let error = body["error"].as_str().unwrap();
        assert!(error.starts_with("Invalid equation syntax: "), "{}", error);
    }

    #[tokio::test]
    async fn test_missing_problem_is_empty() {
        let (status, body) = post_json("{}").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["success"], json!(false));
        assert!(body["error"].as_str().unwrap().starts_with("Invalid syntax: "));
    }

    #[tokio::test]
    async fn test_invalid_json_is_rejected() {
        let response = build_router()
            .oneshot(solve_request("not json"))
            .await
            .unwrap();
        assert!(response.status().is_client_error());
    }

    #[tokio::test]
    async fn test_cors_allows_any_origin() {
        let response = build_router()
            .oneshot(solve_request(r#"{"problem": "5+3"}"#))
            .await
            .unwrap();
        assert_eq!(
            response.headers()[header::ACCESS_CONTROL_ALLOW_ORIGIN],
            "*"
        );

        let preflight = Request::builder()
            .method("OPTIONS")
            .uri("/solve")
            .header(header::ORIGIN, "http://localhost:3000")
            .header(header::ACCESS_CONTROL_REQUEST_METHOD, "POST")
            .body(Body::empty())
            .unwrap();
        let response = build_router().oneshot(preflight).await.unwrap();
        assert!(response.status().is_success());
        assert_eq!(
            response.headers()[header::ACCESS_CONTROL_ALLOW_ORIGIN],
            "*"
        );
    }

    #[test]
    fn test_error_messages() {
        let err = ServerError::Bind {
            address: "0.0.0.0:5000".to_string(),
            source: std::io::Error::new(std::io::ErrorKind::AddrInUse, "address in use"),
        };
        assert_eq!(err.to_string(), "Cannot bind 0.0.0.0:5000: address in use");
    }
}
