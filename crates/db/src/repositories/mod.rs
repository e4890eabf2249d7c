pub mod dashboard_snapshot_repo;

pub use dashboard_snapshot_repo::DashboardSnapshotRepo;
