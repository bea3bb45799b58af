//! services/api/src/web/state.rs
//!
//! Defines the application's shared state.

use crate::config::Config;
use crate::error::ApiError;
use crate::web::monitoring::RequestMetrics;
use course_search_core::ports::{IdentityProvider, ProfileStore};
use course_search_core::retrieval::RetrievalService;
use std::sync::Arc;

/// The shared application state, created once at startup and passed to all handlers.
///
/// It owns the index registry (through the retrieval service), so dropping the
/// last handle tears every index down with it.
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<Config>,
    pub retrieval: Arc<RetrievalService>,
    pub identity: Arc<dyn IdentityProvider>,
    pub profiles: Arc<dyn ProfileStore>,
    pub metrics: Arc<RequestMetrics>,
}

impl AppState {
    /// Runs `task` against the retrieval service on the blocking thread pool.
    ///
    /// Index writes rebuild the ranking structure and searches score the whole
    /// corpus, so neither runs on an async worker.
    pub async fn with_retrieval<F, T>(&self, task: F) -> Result<T, ApiError>
    where
        F: FnOnce(&RetrievalService) -> T + Send + 'static,
        T: Send + 'static,
    {
        let retrieval = Arc::clone(&self.retrieval);
        tokio::task::spawn_blocking(move || task(&retrieval))
            .await
            .map_err(|e| ApiError::Internal(format!("Retrieval task failed: {}", e)))
    }
}
