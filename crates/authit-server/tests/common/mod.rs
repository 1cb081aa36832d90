#![allow(dead_code)]

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use async_trait::async_trait;
use axum::body::Body;
use axum::http::{Request, Response};
use http_body_util::BodyExt;
use serde_json::Value;

use authit_core::{
    config::Config,
    error::StoreError,
    store::{Statement, Store},
};
use authit_duckdb::DuckDbStore;
use authit_server::app::build_app;
use authit_server::state::AppState;

/// Build a test Config with sensible defaults for integration tests.
pub fn test_config() -> Config {
    Config {
        port: 0,
        database_url: "duckdb::memory:".to_string(),
        db_max_connections: 1,
        db_acquire_timeout_ms: 1000,
        run_migrations: false,
        max_visit_seconds: 86_400,
    }
}

/// Create a fresh in-memory store + app for each test.
pub fn setup() -> (DuckDbStore, axum::Router) {
    let store = DuckDbStore::open_in_memory().expect("in-memory DuckDB");
    let state = Arc::new(AppState::new(Arc::new(store.clone()), test_config()));
    (store, build_app(state))
}

/// App backed by an arbitrary store double.
pub fn setup_with(store: Arc<dyn Store>) -> axum::Router {
    build_app(Arc::new(AppState::new(store, test_config())))
}

/// A store whose pool can never hand out a connection.
pub struct UnreachableStore;

#[async_trait]
impl Store for UnreachableStore {
    async fn execute(&self, _statement: &Statement) -> Result<u64, StoreError> {
        Err(StoreError::Unavailable("pool timed out".to_string()))
    }

    async fn ping(&self) -> Result<(), StoreError> {
        Err(StoreError::Unavailable("pool timed out".to_string()))
    }

    fn backend(&self) -> &'static str {
        "unreachable"
    }
}

/// Fails the first `failures` statements, then delegates to a real store.
pub struct FlakyStore {
    pub inner: DuckDbStore,
    pub failures: usize,
    pub calls: AtomicUsize,
}

#[async_trait]
impl Store for FlakyStore {
    async fn execute(&self, statement: &Statement) -> Result<u64, StoreError> {
        if self.calls.fetch_add(1, Ordering::SeqCst) < self.failures {
            return Err(StoreError::Connection("connection reset by peer".to_string()));
        }
        self.inner.execute(statement).await
    }

    async fn ping(&self) -> Result<(), StoreError> {
        self.inner.ping().await
    }

    fn backend(&self) -> &'static str {
        "flaky"
    }
}

pub fn lead_request(method: &str, body: &str) -> Request<Body> {
    Request::builder()
        .method(method)
        .uri("/api/lead")
        .header("content-type", "application/json")
        .header("origin", "https://authit.example")
        .body(Body::from(body.to_string()))
        .expect("build request")
}

pub fn track_request(body: &str) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri("/api/track")
        .header("content-type", "text/plain;charset=UTF-8")
        .header("user-agent", "Mozilla/5.0 Chrome/120")
        .body(Body::from(body.to_string()))
        .expect("build request")
}

pub async fn body_bytes(response: Response<Body>) -> Vec<u8> {
    response
        .into_body()
        .collect()
        .await
        .expect("read body")
        .to_bytes()
        .to_vec()
}

pub async fn json_body(response: Response<Body>) -> Value {
    serde_json::from_slice(&body_bytes(response).await).expect("parse JSON")
}

pub async fn text_body(response: Response<Body>) -> String {
    String::from_utf8(body_bytes(response).await).expect("utf-8 body")
}

pub async fn count(store: &DuckDbStore, sql: &str) -> i64 {
    let conn = store.conn_for_test().await;
    let n = conn
        .query_row(sql, [], |row| row.get(0))
        .expect("count rows");
    n
}

pub async fn lead_count(store: &DuckDbStore) -> i64 {
    count(store, "SELECT COUNT(*) FROM leads").await
}

pub async fn visit_count(store: &DuckDbStore) -> i64 {
    count(store, "SELECT COUNT(*) FROM page_visits").await
}

pub async fn lead_fields(store: &DuckDbStore, email: &str) -> (Option<String>, Option<String>) {
    let conn = store.conn_for_test().await;
    let fields = conn
        .query_row(
            "SELECT name, phone FROM leads WHERE email = ?1",
            authit_duckdb::duckdb::params![email],
            |row| Ok((row.get(0)?, row.get(1)?)),
        )
        .expect("lead row");
    fields
}
