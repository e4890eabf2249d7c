//! Domain core for the profile dashboard service.
//!
//! Holds the upstream client contracts, the snapshot entity, the snapshot
//! store contract and the aggregation orchestrator. No HTTP or SQL lives
//! here; see `gamedash-clients` and `gamedash-db` for those.

pub mod dashboard;
pub mod error;
pub mod snapshot;
pub mod store;
pub mod types;
pub mod upstream;
