/// Re-export `Config` from `authit-core` for use within this crate.
///
/// Environment parsing lives in `authit-core` so integration tests can build
/// a config without depending on the server's startup path.
pub use authit_core::config::{Config, StoreKind};
