use std::time::Duration;

#[derive(Debug, Clone)]
pub struct Config {
    pub port: u16,
    /// Connection string for the store. Required; see [`StoreKind`].
    pub database_url: String,
    pub db_max_connections: u32,
    pub db_acquire_timeout_ms: u64,
    pub run_migrations: bool,
    /// Upper bound applied to client-reported visit durations.
    pub max_visit_seconds: u64,
}

/// Backend selected by the scheme of `DATABASE_URL`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StoreKind {
    Postgres,
    /// `None` opens an in-memory database.
    DuckDb { path: Option<String> },
}

impl Config {
    pub fn from_env() -> Result<Self, String> {
        Self::from_vars(|key| std::env::var(key).ok())
    }

    /// Build a config from an arbitrary variable lookup.
    pub fn from_vars(var: impl Fn(&str) -> Option<String>) -> Result<Self, String> {
        let database_url = var("DATABASE_URL")
            .filter(|v| !v.trim().is_empty())
            .ok_or_else(|| "DATABASE_URL is required".to_string())?;

        let cfg = Self {
            port: var("AUTHIT_PORT")
                .unwrap_or_else(|| "3000".to_string())
                .parse()
                .map_err(|e| format!("invalid port: {e}"))?,
            database_url,
            db_max_connections: var("AUTHIT_DB_MAX_CONNECTIONS")
                .and_then(|v| v.parse().ok())
                .filter(|n| *n > 0)
                .unwrap_or(5),
            db_acquire_timeout_ms: var("AUTHIT_DB_ACQUIRE_TIMEOUT_MS")
                .and_then(|v| v.parse().ok())
                .unwrap_or(5000),
            run_migrations: var("AUTHIT_RUN_MIGRATIONS")
                .map(|v| v != "false")
                .unwrap_or(true),
            max_visit_seconds: var("AUTHIT_MAX_VISIT_SECONDS")
                .and_then(|v| v.parse().ok())
                .unwrap_or(86_400),
        };

        // Reject unsupported schemes at startup rather than on first request.
        cfg.store_kind()?;
        Ok(cfg)
    }

    pub fn store_kind(&self) -> Result<StoreKind, String> {
        let url = self.database_url.trim();
        if url.starts_with("postgres://") || url.starts_with("postgresql://") {
            Ok(StoreKind::Postgres)
        } else if url == "duckdb::memory:" {
            Ok(StoreKind::DuckDb { path: None })
        } else if let Some(path) = url.strip_prefix("duckdb://").filter(|p| !p.is_empty()) {
            Ok(StoreKind::DuckDb {
                path: Some(path.to_string()),
            })
        } else {
            Err("DATABASE_URL must start with postgres://, postgresql:// or duckdb://".to_string())
        }
    }

    pub fn db_acquire_timeout(&self) -> Duration {
        Duration::from_millis(self.db_acquire_timeout_ms)
    }
}
