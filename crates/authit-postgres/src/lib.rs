use std::{str::FromStr, time::Duration};

use async_trait::async_trait;
use sqlx::{
    postgres::{PgArguments, PgConnectOptions, PgPool, PgPoolOptions, PgSslMode},
    Arguments,
};
use tracing::info;

use authit_core::{
    error::StoreError,
    store::{Param, Statement, Store},
};

/// Postgres-backed [`Store`] over a lazily connected `PgPool`.
///
/// TLS is always requested with `sslmode=require`, which encrypts the
/// connection but does not verify the server certificate. Managed Postgres
/// providers commonly present certificates that cannot be chained to a
/// public root; this is an accepted relaxation of transport trust.
#[derive(Clone)]
pub struct PostgresStore {
    pool: PgPool,
}

impl PostgresStore {
    /// Build the pool without opening a connection. The first statement
    /// establishes one; later statements reuse pooled connections.
    ///
    /// Must be called inside a Tokio runtime.
    pub fn connect_lazy(
        database_url: &str,
        max_connections: u32,
        acquire_timeout: Duration,
    ) -> Result<Self, StoreError> {
        let opts = PgConnectOptions::from_str(database_url)
            .map_err(|e| StoreError::Connection(format!("invalid database url: {e}")))?
            .ssl_mode(PgSslMode::Require);

        let pool = PgPoolOptions::new()
            .max_connections(max_connections)
            .acquire_timeout(acquire_timeout)
            .connect_lazy_with(opts);

        info!(max_connections, "Postgres pool configured (lazy)");
        Ok(Self { pool })
    }

    /// Apply pending migrations from the workspace `migrations/` directory.
    pub async fn migrate(&self) -> anyhow::Result<()> {
        sqlx::migrate!("../../migrations").run(&self.pool).await?;
        Ok(())
    }

    pub fn pool(&self) -> &PgPool {
        &self.pool
    }
}

fn bind_params(params: &[Param]) -> Result<PgArguments, StoreError> {
    let mut args = PgArguments::default();
    for param in params {
        let added = match param {
            Param::Text(v) => args.add(v.clone()),
            Param::Int(v) => args.add(*v),
        };
        added.map_err(|e| StoreError::Rejected(format!("bind parameter: {e}")))?;
    }
    Ok(args)
}

fn classify(err: sqlx::Error) -> StoreError {
    match err {
        sqlx::Error::PoolTimedOut | sqlx::Error::PoolClosed => {
            StoreError::Unavailable(err.to_string())
        }
        sqlx::Error::Io(_) | sqlx::Error::Tls(_) | sqlx::Error::Configuration(_) => {
            StoreError::Connection(err.to_string())
        }
        other => StoreError::Rejected(other.to_string()),
    }
}

#[async_trait]
impl Store for PostgresStore {
    async fn execute(&self, statement: &Statement) -> Result<u64, StoreError> {
        let args = bind_params(&statement.params)?;
        let result = sqlx::query_with(statement.sql, args)
            .execute(&self.pool)
            .await
            .map_err(classify)?;
        Ok(result.rows_affected())
    }

    async fn ping(&self) -> Result<(), StoreError> {
        sqlx::query("SELECT 1")
            .execute(&self.pool)
            .await
            .map_err(classify)?;
        Ok(())
    }

    fn backend(&self) -> &'static str {
        "postgres"
    }
}
