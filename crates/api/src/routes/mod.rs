pub mod dashboard;
pub mod health;

use axum::Router;

use crate::state::AppState;

/// Build the `/api/v1` route tree.
///
/// ```text
/// /dashboards                  list
/// /dashboards/{user_id}        get, create-or-refresh (POST), update (PUT), delete
/// ```
pub fn api_routes() -> Router<AppState> {
    Router::new().nest("/dashboards", dashboard::router())
}
