//! Handlers for profile dashboard snapshots.
//!
//! `POST` and `PUT` both re-aggregate from upstream; `GET` and `DELETE` only
//! touch the local snapshot store.

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;

use crate::error::AppResult;
use crate::response::DataResponse;
use crate::state::AppState;

/// GET /dashboards
pub async fn list_dashboards(State(state): State<AppState>) -> AppResult<impl IntoResponse> {
    let snapshots = state.dashboards.get_all().await?;
    Ok(Json(DataResponse { data: snapshots }))
}

/// GET /dashboards/{user_id}
pub async fn get_dashboard(
    State(state): State<AppState>,
    Path(user_id): Path<String>,
) -> AppResult<impl IntoResponse> {
    let snapshot = state.dashboards.get_by_user_id(&user_id).await?;
    Ok(Json(DataResponse { data: snapshot }))
}

/// POST /dashboards/{user_id}
pub async fn create_or_refresh_dashboard(
    State(state): State<AppState>,
    Path(user_id): Path<String>,
) -> AppResult<impl IntoResponse> {
    let snapshot = state.dashboards.create_or_refresh(&user_id).await?;
    Ok((StatusCode::CREATED, Json(DataResponse { data: snapshot })))
}

/// PUT /dashboards/{user_id}
pub async fn update_dashboard(
    State(state): State<AppState>,
    Path(user_id): Path<String>,
) -> AppResult<impl IntoResponse> {
    let snapshot = state.dashboards.update(&user_id).await?;
    Ok(Json(DataResponse { data: snapshot }))
}

/// DELETE /dashboards/{user_id}
pub async fn delete_dashboard(
    State(state): State<AppState>,
    Path(user_id): Path<String>,
) -> AppResult<impl IntoResponse> {
    state.dashboards.delete(&user_id).await?;
    Ok(StatusCode::NO_CONTENT)
}
