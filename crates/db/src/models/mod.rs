pub mod dashboard_snapshot;
