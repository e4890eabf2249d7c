use gamedash_core::dashboard::DashboardService;

/// Shared application state available to all Axum handlers via `State<AppState>`.
///
/// Cheaply cloneable: the service only holds `Arc`s.
#[derive(Clone)]
pub struct AppState {
    /// Dashboard aggregation service (owns the upstream clients and store).
    pub dashboards: DashboardService,
}
