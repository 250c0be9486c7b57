use axum::extract::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::routing::{get, post};
use axum::Router;
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use tower_http::cors::CorsLayer;
use tracing::{error, info, warn};

use crate::engine::{self, QuestionView, StressResult};
use crate::Error;

/// `role` is kept loose so that a null or non-string role is answered as an
/// unknown role rather than a body rejection.
#[derive(Debug, Deserialize)]
pub struct QuestionsRequest {
    #[serde(default)]
    pub role: Value,
}

#[derive(Debug, Serialize)]
pub struct QuestionsResponse {
    pub questions: Vec<QuestionView>,
}

#[derive(Debug, Deserialize)]
pub struct SubmitRequest {
    #[serde(default)]
    pub role: Value,
    #[serde(default)]
    pub answers: Value,
}

/// Engine errors as HTTP responses.
pub struct ApiError(Error);

impl From<Error> for ApiError {
    fn from(err: Error) -> Self {
        ApiError(err)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = if self.0.is_user_input() {
            warn!(error = %self.0, "rejected request");
            StatusCode::BAD_REQUEST
        } else {
            error!(error = %self.0, "request failed");
            StatusCode::INTERNAL_SERVER_ERROR
        };
        (status, Json(json!({ "error": self.0.to_string() }))).into_response()
    }
}

fn role_name(role: &Value) -> String {
    match role {
        Value::String(role) => role.clone(),
        Value::Null => String::new(),
        other => other.to_string(),
    }
}

pub fn router() -> Router {
    Router::new()
        .route("/get-questions", post(questions_handler))
        .route("/submit-answers", post(submit_handler))
        .route("/health", get(health_handler))
        .layer(CorsLayer::permissive())
}

async fn questions_handler(
    Json(req): Json<QuestionsRequest>,
) -> Result<Json<QuestionsResponse>, ApiError> {
    let role = role_name(&req.role);
    let questions = engine::get_questions(&role)?;
    info!(%role, count = questions.len(), "serving questions");
    Ok(Json(QuestionsResponse { questions }))
}

async fn submit_handler(Json(req): Json<SubmitRequest>) -> Result<Json<StressResult>, ApiError> {
    let role = role_name(&req.role);
    let result = engine::evaluate_stress_json(&role, &req.answers)?;
    info!(
        %role,
        total_score = result.total_score,
        category = %result.category,
        "scored submission"
    );
    Ok(Json(result))
}

async fn health_handler() -> Json<Value> {
    Json(json!({
        "status": "healthy",
        "message": "Stress assessment API is running"
    }))
}

#[cfg(test)]
mod test {
    use super::*;
    use axum::body::{to_bytes, Body};
    use axum::http::{header, Method, Request};
    use tower::ServiceExt;

    async fn send(method: Method, uri: &str, body: Option<Value>) -> (StatusCode, Value) {
        let builder = Request::builder().method(method).uri(uri);
        let request = match body {
            Some(body) => builder
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(body.to_string()))
                .unwrap(),
            None => builder.body(Body::empty()).unwrap(),
        };
        let response = router().oneshot(request).await.unwrap();
        let status = response.status();
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        (status, serde_json::from_slice(&bytes).unwrap())
    }

    #[tokio::test]
    async fn test_health() {
        let (status, body) = send(Method::GET, "/health", None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["status"], "healthy");
    }

    #[tokio::test]
    async fn test_get_questions() {
        let (status, body) = send(
            Method::POST,
            "/get-questions",
            Some(json!({ "role": "student" })),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        let questions = body["questions"].as_array().unwrap();
        assert_eq!(questions.len(), 8);
        assert!(questions[0]["prompt"].is_string());
        assert_eq!(questions[0]["choices"].as_array().unwrap().len(), 4);
        assert!(questions[0]["choices"][0].is_string());
    }

    #[tokio::test]
    async fn test_get_questions_invalid_role() {
        let (status, body) = send(
            Method::POST,
            "/get-questions",
            Some(json!({ "role": "manager" })),
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert!(body["error"].as_str().unwrap().contains("manager"));

        let (status, _) = send(Method::POST, "/get-questions", Some(json!({}))).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_non_string_role() {
        for payload in [
            json!({ "role": null }),
            json!({ "role": 5 }),
            json!({ "role": ["student"] }),
        ] {
            let (status, body) = send(Method::POST, "/get-questions", Some(payload)).await;
            assert_eq!(status, StatusCode::BAD_REQUEST);
            assert!(body["error"].as_str().unwrap().starts_with("Invalid role"));
        }

        let (status, body) = send(
            Method::POST,
            "/submit-answers",
            Some(json!({ "role": 5, "answers": [0, 0, 0, 0, 0, 0, 0, 0] })),
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert!(body["error"].as_str().unwrap().starts_with("Invalid role"));

        let (status, _) = send(
            Method::POST,
            "/submit-answers",
            Some(json!({ "role": null, "answers": null })),
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
    }

    #[test]
    fn test_role_name() {
        assert_eq!(role_name(&json!("housewife")), "housewife");
        assert_eq!(role_name(&Value::Null), "");
        assert_eq!(role_name(&json!(5)), "5");
    }

    #[tokio::test]
    async fn test_submit_answers() {
        let (status, body) = send(
            Method::POST,
            "/submit-answers",
            Some(json!({ "role": "housewife", "answers": [3, 3, 3, 3, 3, 3, 3, 3] })),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["category"], "high");
        assert_eq!(body["total_score"], 24);
        assert!(body["advisory"].is_string());
    }

    #[tokio::test]
    async fn test_submit_answers_rejected() {
        for payload in [
            json!({ "role": "working_women", "answers": [0, 1, 2] }),
            json!({ "role": "student", "answers": [0, 0, 0, 0, 0, 0, 0, "0"] }),
            json!({ "role": "student", "answers": [0, 0, 0, 0, 0, 0, 0, 9] }),
            json!({ "role": "student", "answers": "all low" }),
            json!({ "role": "student" }),
            json!({ "role": "manager", "answers": [0, 0, 0, 0, 0, 0, 0, 0] }),
        ] {
            let (status, body) = send(Method::POST, "/submit-answers", Some(payload)).await;
            assert_eq!(status, StatusCode::BAD_REQUEST);
            assert!(body["error"].is_string());
        }
    }
}
