pub mod backend;
pub mod schema;

pub use backend::DuckDbStore;

/// Re-export the `duckdb` crate so tests can use
/// `authit_duckdb::duckdb::params!` without an extra dependency.
pub use duckdb;
