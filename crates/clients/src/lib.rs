//! HTTP adapters for the User, Game and Download services.
//!
//! Each adapter implements the matching client trait from
//! `gamedash_core::upstream` over JSON/REST using [`reqwest`]. Wire formats
//! (camelCase) are decoded here and never leak into the core.

mod http;

pub mod download;
pub mod game;
pub mod user;

pub use download::HttpDownloadClient;
pub use game::HttpGameClient;
pub use http::{build_http_client, HttpUpstream};
pub use user::HttpUserClient;
