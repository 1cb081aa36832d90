use std::sync::Arc;

use anyhow::Result;
use tracing::{info, warn};

use authit_core::{
    config::{Config, StoreKind},
    store::Store,
};
use authit_duckdb::DuckDbStore;
use authit_postgres::PostgresStore;

/// Build the process-wide store selected by `DATABASE_URL`.
///
/// Called once at startup. Postgres pools connect lazily; migrations, when
/// enabled, force the first connection here so a bad URL or unreachable
/// database fails startup instead of the first request.
pub async fn open_store(cfg: &Config) -> Result<Arc<dyn Store>> {
    let kind = cfg.store_kind().map_err(|e| anyhow::anyhow!(e))?;
    let store: Arc<dyn Store> = match kind {
        StoreKind::Postgres => {
            let store = PostgresStore::connect_lazy(
                &cfg.database_url,
                cfg.db_max_connections,
                cfg.db_acquire_timeout(),
            )?;
            if cfg.run_migrations {
                store.migrate().await?;
                info!("Postgres migrations applied");
            }
            Arc::new(store)
        }
        StoreKind::DuckDb { path: Some(path) } => {
            if let Some(parent) = std::path::Path::new(&path).parent() {
                if !parent.as_os_str().is_empty() {
                    std::fs::create_dir_all(parent)?;
                }
            }
            Arc::new(DuckDbStore::open(&path)?)
        }
        StoreKind::DuckDb { path: None } => {
            warn!("Using in-memory DuckDB store. All data is discarded on exit.");
            Arc::new(DuckDbStore::open_in_memory()?)
        }
    };

    info!(backend = store.backend(), "Store ready");
    Ok(store)
}
