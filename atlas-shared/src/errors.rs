use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::{Deserialize, Serialize};

use crate::types::ApiErrorResponse;

/// Application error codes following the pattern E{area}{sequence}
///
/// Ranges:
/// - E0xxx: Shared/infrastructure errors
/// - E1xxx: Schema migration errors
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ErrorCode {
    // Shared (E0xxx)
    NotFound,
    ServiceUnavailable,

    // Migrations (E1xxx)
    MigrationFailed,
    ChecksumMismatch,
    UnknownMigration,
    DuplicateMigration,
}

impl ErrorCode {
    pub fn code(&self) -> &'static str {
        match self {
            // Shared
            Self::NotFound => "E0003",
            Self::ServiceUnavailable => "E0007",

            // Migrations
            Self::MigrationFailed => "E1001",
            Self::ChecksumMismatch => "E1003",
            Self::UnknownMigration => "E1004",
            Self::DuplicateMigration => "E1005",
        }
    }

    pub fn status_code(&self) -> StatusCode {
        match self {
            Self::MigrationFailed | Self::DuplicateMigration => StatusCode::INTERNAL_SERVER_ERROR,
            Self::ServiceUnavailable => StatusCode::SERVICE_UNAVAILABLE,
            Self::NotFound => StatusCode::NOT_FOUND,
            Self::ChecksumMismatch | Self::UnknownMigration => StatusCode::CONFLICT,
        }
    }
}

#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error("{message}")]
    Known {
        code: ErrorCode,
        message: String,
        details: Option<serde_json::Value>,
    },

    #[error("database error: {0}")]
    Database(#[from] diesel::result::Error),
}

impl AppError {
    pub fn new(code: ErrorCode, message: impl Into<String>) -> Self {
        Self::Known {
            code,
            message: message.into(),
            details: None,
        }
    }

    pub fn with_details(code: ErrorCode, message: impl Into<String>, details: serde_json::Value) -> Self {
        Self::Known {
            code,
            message: message.into(),
            details: Some(details),
        }
    }

    pub fn not_found(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::NotFound, message)
    }

    pub fn service_unavailable(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::ServiceUnavailable, message)
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, error_response) = match &self {
            AppError::Known { code, message, details } => {
                let status = code.status_code();
                let mut resp = ApiErrorResponse::new(code.code(), message);
                if let Some(d) = details {
                    resp = resp.with_details(d.clone());
                }
                (status, resp)
            }
            AppError::Database(err) => {
                tracing::error!(error = %err, "database error");
                match err {
                    diesel::result::Error::NotFound => (
                        StatusCode::NOT_FOUND,
                        ApiErrorResponse::new("E0003", "resource not found"),
                    ),
                    _ => (
                        StatusCode::INTERNAL_SERVER_ERROR,
                        ApiErrorResponse::new("E0001", "database error"),
                    ),
                }
            }
        };

        (status, Json(error_response)).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::to_bytes;

    async fn body_json(err: AppError) -> serde_json::Value {
        let response = err.into_response();
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        serde_json::from_slice(&bytes).unwrap()
    }

    #[test]
    fn codes_are_unique() {
        let all = [
            ErrorCode::NotFound,
            ErrorCode::ServiceUnavailable,
            ErrorCode::MigrationFailed,
            ErrorCode::ChecksumMismatch,
            ErrorCode::UnknownMigration,
            ErrorCode::DuplicateMigration,
        ];
        let mut codes: Vec<_> = all.iter().map(|c| c.code()).collect();
        codes.sort_unstable();
        codes.dedup();
        assert_eq!(codes.len(), all.len());
        // E0001 is reserved for unclassified database failures.
        assert!(!codes.contains(&"E0001"));
    }

    #[tokio::test]
    async fn not_found_envelope() {
        let response = AppError::not_found("resource not found").into_response();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);

        let value = body_json(AppError::not_found("resource not found")).await;
        assert_eq!(value["success"], false);
        assert_eq!(value["error"]["code"], "E0003");
        assert_eq!(value["error"]["message"], "resource not found");
        assert!(value["error"].get("details").is_none());
    }

    #[tokio::test]
    async fn details_are_serialized() {
        let err = AppError::with_details(
            ErrorCode::ChecksumMismatch,
            "applied migrations changed",
            serde_json::json!({ "versions": [3] }),
        );
        let value = body_json(err).await;
        assert_eq!(value["error"]["code"], "E1003");
        assert_eq!(value["error"]["details"]["versions"][0], 3);
    }

    #[tokio::test]
    async fn diesel_not_found_maps_to_404() {
        let response = AppError::Database(diesel::result::Error::NotFound).into_response();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn database_failure_hides_cause() {
        let err = AppError::Database(diesel::result::Error::QueryBuilderError("secret detail".into()));
        let value = body_json(err).await;
        assert_eq!(value["error"]["code"], "E0001");
        assert_eq!(value["error"]["message"], "database error");
    }
}
