use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};

use crate::db::ProbeError;
use crate::health::ReadinessReport;

/// Errors surfaced at the HTTP boundary.
///
/// Every dependency failure collapses into one category; the cause is logged
/// but never written to the response body.
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error("Database unreachable: {0}")]
    DatabaseUnreachable(#[from] ProbeError),
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        match &self {
            AppError::DatabaseUnreachable(cause) => {
                tracing::error!(error = %cause, "Database health check failed");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    Json(ReadinessReport::unreachable()),
                )
                    .into_response()
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    #[tokio::test]
    async fn test_cause_does_not_leak_into_body() {
        let err = AppError::from(ProbeError::Timeout(Duration::from_secs(5)));
        let response = err.into_response();
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);

        let body = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        let json: serde_json::Value = serde_json::from_slice(&body).unwrap();
        assert_eq!(
            json,
            serde_json::json!({"status": "error", "error": "Database unreachable"})
        );
    }
}
