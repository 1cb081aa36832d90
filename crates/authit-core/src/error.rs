use thiserror::Error;

/// Malformed or missing required input. Surfaced as `400`, never logged as a
/// server fault.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("Invalid email")]
    InvalidEmail,

    #[error("Invalid page")]
    InvalidPage,
}

/// The persistence layer could not complete a statement.
///
/// Backends map their native errors onto these variants and keep the
/// original message as detail for server-side logs. The detail is never
/// returned to callers.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("connection failed: {0}")]
    Connection(String),

    #[error("statement rejected: {0}")]
    Rejected(String),

    #[error("pool unavailable: {0}")]
    Unavailable(String),
}
