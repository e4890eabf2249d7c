use axum::routing::get;
use axum::Router;

use crate::handlers::dashboard;
use crate::state::AppState;

/// Snapshot routes mounted at `/dashboards`.
///
/// ```text
/// GET     /            -> list_dashboards
/// GET     /{user_id}   -> get_dashboard
/// POST    /{user_id}   -> create_or_refresh_dashboard
/// PUT     /{user_id}   -> update_dashboard
/// DELETE  /{user_id}   -> delete_dashboard
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(dashboard::list_dashboards))
        .route(
            "/{user_id}",
            get(dashboard::get_dashboard)
                .post(dashboard::create_or_refresh_dashboard)
                .put(dashboard::update_dashboard)
                .delete(dashboard::delete_dashboard),
        )
}
