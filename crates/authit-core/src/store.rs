//! Database accessor abstraction.
//!
//! Handlers build a [`Statement`] (a SQL template with `$1..$n` placeholders
//! plus ordered parameters) and hand it to a [`Store`]. Parameters are always
//! bound by the backend driver, never spliced into the SQL text.

use async_trait::async_trait;

use crate::error::StoreError;

/// One positional parameter.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Param {
    /// Nullable text. `None` binds SQL `NULL`.
    Text(Option<String>),
    Int(i64),
}

impl From<&str> for Param {
    fn from(value: &str) -> Self {
        Param::Text(Some(value.to_string()))
    }
}

impl From<String> for Param {
    fn from(value: String) -> Self {
        Param::Text(Some(value))
    }
}

impl From<Option<String>> for Param {
    fn from(value: Option<String>) -> Self {
        Param::Text(value)
    }
}

impl From<i64> for Param {
    fn from(value: i64) -> Self {
        Param::Int(value)
    }
}

/// A parameterized statement ready for execution.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Statement {
    pub sql: &'static str,
    pub params: Vec<Param>,
}

impl Statement {
    pub fn new(sql: &'static str) -> Self {
        Self {
            sql,
            params: Vec::new(),
        }
    }

    /// Append the next positional parameter (`$1`, `$2`, ... in call order).
    pub fn bind(mut self, param: impl Into<Param>) -> Self {
        self.params.push(param.into());
        self
    }
}

/// A pooled relational store.
///
/// Implementations are shared across concurrent requests as
/// `Arc<dyn Store>`, so they must be safe for concurrent use. Each call checks
/// out a connection for exactly one statement.
#[async_trait]
pub trait Store: Send + Sync {
    /// Execute `statement` and return the number of affected rows.
    async fn execute(&self, statement: &Statement) -> Result<u64, StoreError>;

    /// Cheap round-trip used by the health endpoint.
    async fn ping(&self) -> Result<(), StoreError>;

    /// Short backend name for logs (`"postgres"`, `"duckdb"`).
    fn backend(&self) -> &'static str;
}
