use std::sync::Arc;

use anyhow::Result;
use async_trait::async_trait;
use duckdb::{types::Value, Connection};
use tokio::sync::Mutex;
use tracing::info;

use authit_core::{
    error::StoreError,
    store::{Param, Statement, Store},
};

use crate::schema::INIT_SQL;

/// An embedded DuckDB store for local development and tests.
///
/// DuckDB is single-writer, so the one connection sits behind
/// `Arc<Mutex<_>>`; concurrent handlers queue on the lock instead of a pool.
#[derive(Clone)]
pub struct DuckDbStore {
    pub(crate) conn: Arc<Mutex<Connection>>,
}

impl DuckDbStore {
    /// Open (or create) a DuckDB database file at `path` and apply the schema.
    pub fn open(path: &str) -> Result<Self> {
        let conn = Connection::open(path)?;
        conn.execute_batch(INIT_SQL)?;
        info!(path, "DuckDB store opened");
        Ok(Self {
            conn: Arc::new(Mutex::new(conn)),
        })
    }

    /// Open an **in-memory** database. Data is discarded on drop.
    pub fn open_in_memory() -> Result<Self> {
        let conn = Connection::open_in_memory()?;
        conn.execute_batch(INIT_SQL)?;
        Ok(Self {
            conn: Arc::new(Mutex::new(conn)),
        })
    }

    /// Acquire the connection lock for direct queries.
    ///
    /// Intended for integration tests that need to verify stored rows.
    pub async fn conn_for_test(&self) -> tokio::sync::MutexGuard<'_, Connection> {
        self.conn.lock().await
    }
}

fn to_value(param: &Param) -> Value {
    match param {
        Param::Text(Some(s)) => Value::Text(s.clone()),
        Param::Text(None) => Value::Null,
        Param::Int(i) => Value::BigInt(*i),
    }
}

#[async_trait]
impl Store for DuckDbStore {
    async fn execute(&self, statement: &Statement) -> Result<u64, StoreError> {
        let values: Vec<Value> = statement.params.iter().map(to_value).collect();
        let conn = self.conn.lock().await;
        let affected = conn
            .execute(statement.sql, duckdb::params_from_iter(values))
            .map_err(|e| StoreError::Rejected(e.to_string()))?;
        Ok(affected as u64)
    }

    async fn ping(&self) -> Result<(), StoreError> {
        let conn = self.conn.lock().await;
        conn.execute_batch("SELECT 1")
            .map_err(|e| StoreError::Connection(e.to_string()))
    }

    fn backend(&self) -> &'static str {
        "duckdb"
    }
}
