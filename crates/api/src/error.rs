use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use gamedash_core::error::DashboardError;
use serde_json::json;

/// Application-level error type for HTTP handlers.
///
/// Wraps [`DashboardError`]. Implements [`IntoResponse`] to produce consistent JSON error responses.
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    /// A domain-level error from `gamedash_core`.
    #[error(transparent)]
    Dashboard(#[from] DashboardError),
}

/// Convenience type alias for handler return values.
pub type AppResult<T> = Result<T, AppError>;

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, code, message) = match &self {
            AppError::Dashboard(err) => classify_dashboard_error(err),
        };

        let body = json!({
            "error": message,
            "code": code,
        });

        (status, axum::Json(body)).into_response()
    }
}

/// Map a domain error to an HTTP status, error code and message.
///
/// - Missing user or snapshot maps to 404.
/// - A failing User service maps to 502; the upstream detail is logged, not
///   returned.
/// - Store failures map to 500 with a sanitized message.
fn classify_dashboard_error(err: &DashboardError) -> (StatusCode, &'static str, String) {
    match err {
        DashboardError::UserNotFound { user_id } => (
            StatusCode::NOT_FOUND,
            "USER_NOT_FOUND",
            format!("User {user_id} not found"),
        ),
        DashboardError::SnapshotNotFound { user_id } => (
            StatusCode::NOT_FOUND,
            "SNAPSHOT_NOT_FOUND",
            format!("No dashboard snapshot for user {user_id}"),
        ),
        DashboardError::AggregationFailure { user_id, source } => {
            tracing::error!(user_id = %user_id, error = %source, "Dashboard aggregation failed");
            (
                StatusCode::BAD_GATEWAY,
                "AGGREGATION_FAILURE",
                format!("Could not load user {user_id} from the user service"),
            )
        }
        DashboardError::Validation(msg) => {
            (StatusCode::BAD_REQUEST, "VALIDATION_ERROR", msg.clone())
        }
        DashboardError::Store(store_err) => {
            tracing::error!(error = %store_err, "Snapshot store error");
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                "INTERNAL_ERROR",
                "An internal error occurred".to_string(),
            )
        }
    }
}
