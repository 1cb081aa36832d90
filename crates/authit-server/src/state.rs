use std::sync::Arc;

use authit_core::{config::Config, store::Store};

/// Shared application state injected into every handler via
/// [`axum::extract::State`].
///
/// The store is built once at startup and handed in here; handlers never
/// reach for a global pool.
pub struct AppState {
    pub store: Arc<dyn Store>,

    /// Parsed configuration, loaded once at startup.
    pub config: Arc<Config>,
}

impl AppState {
    pub fn new(store: Arc<dyn Store>, config: Config) -> Self {
        Self {
            store,
            config: Arc::new(config),
        }
    }
}
