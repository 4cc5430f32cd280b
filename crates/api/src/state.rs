use std::sync::Arc;

use folio_storage::ObjectStore;

use crate::config::ServerConfig;

/// Shared application state available to all Axum handlers via `State<AppState>`.
///
/// This is cheaply cloneable (inner data is behind `Arc` or is already `Clone`).
/// The object store is a constructed instance injected here -- never a global
/// singleton -- so tests swap in `MemoryStore`.
#[derive(Clone)]
pub struct AppState {
    /// Database connection pool.
    pub pool: folio_db::DbPool,
    /// Server configuration.
    pub config: Arc<ServerConfig>,
    /// Object Storage Gateway.
    pub store: Arc<dyn ObjectStore>,
}
