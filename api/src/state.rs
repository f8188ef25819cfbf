use std::sync::Arc;

use craly_core::store::{DocumentStore, MemoryStore};
use sqlx::PgPool;

use crate::store::PgDocumentStore;

#[derive(Clone)]
pub struct AppState {
    pub store: Arc<dyn DocumentStore>,
    /// Present when backed by Postgres; used for health checks.
    pub db: Option<PgPool>,
}

impl AppState {
    pub fn postgres(pool: PgPool) -> Self {
        Self {
            store: Arc::new(PgDocumentStore::new(pool.clone())),
            db: Some(pool),
        }
    }

    pub fn in_memory() -> Self {
        Self::with_store(Arc::new(MemoryStore::new()))
    }

    pub fn with_store(store: Arc<dyn DocumentStore>) -> Self {
        Self { store, db: None }
    }
}
