//! Typed errors and HTTP mapping.

use crate::middleware::current_trace_id;
use axum::{
    extract::rejection::{JsonRejection, PathRejection, QueryRejection},
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use thiserror::Error;
use utoipa::ToSchema;

/// PostgreSQL SQLSTATE for `unique_violation`.
const UNIQUE_VIOLATION: &str = "23505";

const INTERNAL_MESSAGE: &str = "an internal server error occurred";

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("invalid value for {key}: '{value}'")]
    Invalid { key: &'static str, value: String },
    #[error("{key} must be set")]
    Missing { key: &'static str },
}

/// One rejected input field.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, ToSchema)]
pub struct FieldError {
    pub field: String,
    pub message: String,
}

impl FieldError {
    pub fn new(field: &str, message: impl Into<String>) -> Self {
        FieldError {
            field: field.to_string(),
            message: message.into(),
        }
    }
}

#[derive(Error, Debug)]
pub enum AppError {
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error("{}", join_messages(.0))]
    Validation(Vec<FieldError>),
    #[error("{0}")]
    BadRequest(String),
    /// Extractor rejection (malformed JSON, bad path or query, oversized body).
    #[error("{message}")]
    Rejected { status: StatusCode, message: String },
    #[error("{0}")]
    NotFound(String),
    #[error("{0}")]
    Conflict(String),
    #[error("database: {0}")]
    Db(#[from] sqlx::Error),
    #[error("internal: {0}")]
    Internal(String),
}

fn join_messages(errors: &[FieldError]) -> String {
    errors
        .iter()
        .map(|e| e.message.as_str())
        .collect::<Vec<_>>()
        .join("; ")
}

fn db_status(e: &sqlx::Error) -> StatusCode {
    match e {
        sqlx::Error::RowNotFound => StatusCode::NOT_FOUND,
        sqlx::Error::Database(db) if db.code().as_deref() == Some(UNIQUE_VIOLATION) => StatusCode::CONFLICT,
        _ => StatusCode::INTERNAL_SERVER_ERROR,
    }
}

impl AppError {
    pub fn status(&self) -> StatusCode {
        match self {
            AppError::Validation(_) | AppError::BadRequest(_) => StatusCode::BAD_REQUEST,
            AppError::Rejected { status, .. } => *status,
            AppError::NotFound(_) => StatusCode::NOT_FOUND,
            AppError::Conflict(_) => StatusCode::CONFLICT,
            AppError::Db(e) => db_status(e),
            AppError::Config(_) | AppError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Message safe to return to the caller. Store and internal details stay in the logs.
    fn public_message(&self) -> String {
        match self {
            AppError::Db(e) => match db_status(e) {
                StatusCode::CONFLICT => "a record with this data already exists".into(),
                StatusCode::NOT_FOUND => "resource not found".into(),
                _ => INTERNAL_MESSAGE.into(),
            },
            AppError::Config(_) | AppError::Internal(_) => INTERNAL_MESSAGE.into(),
            other => other.to_string(),
        }
    }

    fn rejected(status: StatusCode, message: String) -> Self {
        let status = match status {
            StatusCode::PAYLOAD_TOO_LARGE => StatusCode::PAYLOAD_TOO_LARGE,
            s if s.is_server_error() => s,
            _ => StatusCode::BAD_REQUEST,
        };
        AppError::Rejected { status, message }
    }
}

impl From<JsonRejection> for AppError {
    fn from(rejection: JsonRejection) -> Self {
        AppError::rejected(rejection.status(), rejection.body_text())
    }
}

impl From<PathRejection> for AppError {
    fn from(rejection: PathRejection) -> Self {
        AppError::rejected(rejection.status(), rejection.body_text())
    }
}

impl From<QueryRejection> for AppError {
    fn from(rejection: QueryRejection) -> Self {
        AppError::rejected(rejection.status(), rejection.body_text())
    }
}

/// Error response body shared by every failing route.
#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ErrorBody {
    pub status: u16,
    /// Reason phrase without spaces, e.g. `NotFound`.
    pub error: String,
    pub message: String,
    pub trace_id: String,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub errors: Vec<FieldError>,
}

impl ErrorBody {
    pub fn new(status: StatusCode, message: String, trace_id: String, errors: Vec<FieldError>) -> Self {
        ErrorBody {
            status: status.as_u16(),
            error: category(status),
            message,
            trace_id,
            errors,
        }
    }
}

fn category(status: StatusCode) -> String {
    status.canonical_reason().unwrap_or("Unknown").replace(' ', "")
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status();
        let trace_id = current_trace_id();
        if status.is_server_error() {
            tracing::error!(trace_id = %trace_id, status = status.as_u16(), error = %self, "request failed");
        } else {
            tracing::warn!(trace_id = %trace_id, status = status.as_u16(), error = %self, "request rejected");
        }
        let message = self.public_message();
        let errors = match self {
            AppError::Validation(errors) => errors,
            _ => Vec::new(),
        };
        let body = ErrorBody::new(status, message, trace_id, errors);
        (status, Json(body)).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::middleware::with_trace_id;
    use axum::body::to_bytes;
    use serde_json::Value;

    async fn body_json(response: Response) -> Value {
        let bytes = to_bytes(response.into_body(), 64 * 1024).await.unwrap();
        serde_json::from_slice(&bytes).unwrap()
    }

    #[test]
    fn statuses_follow_the_taxonomy() {
        assert_eq!(AppError::Validation(vec![]).status(), StatusCode::BAD_REQUEST);
        assert_eq!(AppError::BadRequest("x".into()).status(), StatusCode::BAD_REQUEST);
        assert_eq!(AppError::NotFound("x".into()).status(), StatusCode::NOT_FOUND);
        assert_eq!(AppError::Conflict("x".into()).status(), StatusCode::CONFLICT);
        assert_eq!(AppError::Db(sqlx::Error::RowNotFound).status(), StatusCode::NOT_FOUND);
        assert_eq!(AppError::Db(sqlx::Error::PoolTimedOut).status(), StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(AppError::Internal("x".into()).status(), StatusCode::INTERNAL_SERVER_ERROR);
        let config = ConfigError::Invalid { key: "MAX_PAGE_SIZE", value: "zero".into() };
        assert_eq!(AppError::from(config).status(), StatusCode::INTERNAL_SERVER_ERROR);
    }

    #[test]
    fn rejections_collapse_to_bad_request_except_size() {
        let e = AppError::rejected(StatusCode::UNSUPPORTED_MEDIA_TYPE, "no content type".into());
        assert_eq!(e.status(), StatusCode::BAD_REQUEST);
        let e = AppError::rejected(StatusCode::UNPROCESSABLE_ENTITY, "wrong type".into());
        assert_eq!(e.status(), StatusCode::BAD_REQUEST);
        let e = AppError::rejected(StatusCode::PAYLOAD_TOO_LARGE, "too big".into());
        assert_eq!(e.status(), StatusCode::PAYLOAD_TOO_LARGE);
    }

    #[test]
    fn category_strips_spaces_from_reason_phrase() {
        assert_eq!(category(StatusCode::BAD_REQUEST), "BadRequest");
        assert_eq!(category(StatusCode::NOT_FOUND), "NotFound");
        assert_eq!(category(StatusCode::INTERNAL_SERVER_ERROR), "InternalServerError");
        assert_eq!(category(StatusCode::PAYLOAD_TOO_LARGE), "PayloadTooLarge");
    }

    #[tokio::test]
    async fn validation_body_carries_field_errors_and_trace_id() {
        let err = AppError::Validation(vec![
            FieldError::new("email", "email must be a valid email address"),
            FieldError::new("name", "name is required"),
        ]);
        let response = with_trace_id("trace-1".into(), async move { err.into_response() }).await;
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        let body = body_json(response).await;
        assert_eq!(body["status"], 400);
        assert_eq!(body["error"], "BadRequest");
        assert_eq!(body["traceId"], "trace-1");
        assert_eq!(
            body["message"],
            "email must be a valid email address; name is required"
        );
        assert_eq!(body["errors"][0]["field"], "email");
        assert_eq!(body["errors"][1]["field"], "name");
    }

    #[tokio::test]
    async fn server_errors_hide_internal_detail() {
        let err = AppError::Internal("pool exploded at 10.0.0.3".into());
        let response = err.into_response();
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
        let body = body_json(response).await;
        assert_eq!(body["message"], INTERNAL_MESSAGE);
        assert_eq!(body["traceId"], "unknown");
        assert!(body.get("errors").is_none());
    }
}
