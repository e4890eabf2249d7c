use std::str::FromStr;
use std::time::Duration;

/// Which [`SnapshotStore`](gamedash_core::store::SnapshotStore) backs the service.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StoreBackend {
    /// PostgreSQL via `DATABASE_URL`.
    Postgres,
    /// Process memory; contents are lost on restart.
    Memory,
}

impl FromStr for StoreBackend {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "postgres" | "postgresql" => Ok(Self::Postgres),
            "memory" => Ok(Self::Memory),
            other => Err(format!(
                "Unknown snapshot store '{other}'. Must be one of: postgres, memory"
            )),
        }
    }
}

/// Base URLs and deadline for the three upstream services.
#[derive(Debug, Clone)]
pub struct UpstreamConfig {
    pub user_service_url: String,
    pub game_service_url: String,
    pub download_service_url: String,
    /// Per-call deadline in seconds (default: `5`).
    pub timeout_secs: u64,
}

impl UpstreamConfig {
    /// Load upstream settings from environment variables with defaults.
    ///
    /// | Env Var                 | Default                 |
    /// |-------------------------|-------------------------|
    /// | `USER_SERVICE_URL`      | `http://localhost:8081` |
    /// | `GAME_SERVICE_URL`      | `http://localhost:8082` |
    /// | `DOWNLOAD_SERVICE_URL`  | `http://localhost:8083` |
    /// | `UPSTREAM_TIMEOUT_SECS` | `5`                     |
    pub fn from_env() -> Self {
        Self {
            user_service_url: env_or("USER_SERVICE_URL", "http://localhost:8081"),
            game_service_url: env_or("GAME_SERVICE_URL", "http://localhost:8082"),
            download_service_url: env_or("DOWNLOAD_SERVICE_URL", "http://localhost:8083"),
            timeout_secs: env_or("UPSTREAM_TIMEOUT_SECS", "5")
                .parse()
                .expect("UPSTREAM_TIMEOUT_SECS must be a valid u64"),
        }
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

/// Server configuration loaded from environment variables.
///
/// All fields have defaults suitable for local development except
/// `DATABASE_URL`, which is required when the Postgres store is selected.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// Bind address (default: `0.0.0.0`).
    pub host: String,
    /// Bind port (default: `3000`).
    pub port: u16,
    /// Allowed CORS origins, parsed from comma-separated `CORS_ORIGINS` env var.
    pub cors_origins: Vec<String>,
    /// HTTP request timeout in seconds (default: `30`).
    pub request_timeout_secs: u64,
    /// Snapshot store backend (default: `postgres`).
    pub snapshot_store: StoreBackend,
    /// PostgreSQL connection string.
    pub database_url: Option<String>,
    /// Upstream service endpoints.
    pub upstream: UpstreamConfig,
}

impl ServerConfig {
    /// Load configuration from environment variables with defaults.
    ///
    /// | Env Var                | Default                    |
    /// |------------------------|----------------------------|
    /// | `HOST`                 | `0.0.0.0`                  |
    /// | `PORT`                 | `3000`                     |
    /// | `CORS_ORIGINS`         | `http://localhost:5173`    |
    /// | `REQUEST_TIMEOUT_SECS` | `30`                       |
    /// | `SNAPSHOT_STORE`       | `postgres`                 |
    /// | `DATABASE_URL`         | (none)                     |
    ///
    /// Panics on malformed values so misconfiguration fails at startup.
    pub fn from_env() -> Self {
        let host = env_or("HOST", "0.0.0.0");

        let port: u16 = env_or("PORT", "3000")
            .parse()
            .expect("PORT must be a valid u16");

        let cors_origins = parse_origins(&env_or("CORS_ORIGINS", "http://localhost:5173"));

        let request_timeout_secs: u64 = env_or("REQUEST_TIMEOUT_SECS", "30")
            .parse()
            .expect("REQUEST_TIMEOUT_SECS must be a valid u64");

        let snapshot_store: StoreBackend = env_or("SNAPSHOT_STORE", "postgres")
            .parse()
            .unwrap_or_else(|e: String| panic!("{e}"));

        let database_url = std::env::var("DATABASE_URL").ok();

        Self {
            host,
            port,
            cors_origins,
            request_timeout_secs,
            snapshot_store,
            database_url,
            upstream: UpstreamConfig::from_env(),
        }
    }
}

fn env_or(key: &str, default: &str) -> String {
    std::env::var(key).unwrap_or_else(|_| default.to_string())
}

fn parse_origins(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn store_backend_parses_known_values() {
        assert_eq!("postgres".parse::<StoreBackend>(), Ok(StoreBackend::Postgres));
        assert_eq!("PostgreSQL".parse::<StoreBackend>(), Ok(StoreBackend::Postgres));
        assert_eq!(" memory ".parse::<StoreBackend>(), Ok(StoreBackend::Memory));
    }

    #[test]
    fn store_backend_rejects_unknown_value() {
        let err = "redis".parse::<StoreBackend>().unwrap_err();
        assert!(err.contains("redis"));
    }

    #[test]
    fn origins_are_trimmed_and_blank_entries_dropped() {
        assert_eq!(
            parse_origins("http://a.test, ,http://b.test ,"),
            vec!["http://a.test".to_string(), "http://b.test".to_string()]
        );
    }

    #[test]
    fn upstream_timeout_is_whole_seconds() {
        let upstream = UpstreamConfig {
            user_service_url: String::new(),
            game_service_url: String::new(),
            download_service_url: String::new(),
            timeout_secs: 3,
        };
        assert_eq!(upstream.timeout(), Duration::from_secs(3));
    }
}
