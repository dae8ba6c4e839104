use analytics::MetricsEngine;
use axum::{
    routing::{get, post},
    Router,
};
use configuration::Config;
use dataset::{DatasetCache, LoadedDataset};
use std::sync::{Arc, Mutex, MutexGuard};
use tower_http::{
    cors::{AllowHeaders, AllowOrigin, Any, CorsLayer},
    trace::TraceLayer,
};

pub mod error;
pub mod handlers;

use crate::error::AppError;

/// The shared application state that all handlers can access.
pub struct AppState {
    cache: Mutex<DatasetCache>,
    pub engine: MetricsEngine,
    pub top_risk_limit: usize,
}

impl AppState {
    pub fn new(cache: DatasetCache, top_risk_limit: usize) -> Self {
        Self {
            cache: Mutex::new(cache),
            engine: MetricsEngine::new(),
            top_risk_limit,
        }
    }

    fn lock_cache(&self) -> Result<MutexGuard<'_, DatasetCache>, AppError> {
        self.cache
            .lock()
            .map_err(|_| AppError::Internal("dataset cache lock poisoned".to_string()))
    }

    /// Runs `op` against the locked cache on the blocking thread pool.
    ///
    /// Checking the source file and reloading it are filesystem work, so they
    /// stay off the async worker threads.
    async fn with_cache<T, F>(self: &Arc<Self>, op: F) -> Result<T, AppError>
    where
        T: Send + 'static,
        F: FnOnce(&mut DatasetCache) -> Result<T, AppError> + Send + 'static,
    {
        let state = Arc::clone(self);
        tokio::task::spawn_blocking(move || {
            let mut cache = state.lock_cache()?;
            op(&mut cache)
        })
        .await
        .map_err(|e| AppError::Internal(format!("dataset task failed: {e}")))?
    }

    /// The current dataset, reloaded first if the source file changed.
    pub async fn dataset(self: &Arc<Self>) -> Result<Arc<LoadedDataset>, AppError> {
        self.with_cache(|cache| Ok(cache.get_or_load()?)).await
    }

    /// Drops the cached dataset and reads the source file again.
    pub async fn reload(self: &Arc<Self>) -> Result<Arc<LoadedDataset>, AppError> {
        self.with_cache(|cache| {
            cache.invalidate();
            Ok(cache.get_or_load()?)
        })
        .await
    }
}

/// Builds the API router around an existing state.
pub fn build_router(state: Arc<AppState>) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(AllowOrigin::any())
        .allow_methods(Any)
        .allow_headers(AllowHeaders::any());

    Router::new()
        .route("/api/health", get(|| async { "OK" }))
        .route("/api/facets", get(handlers::get_facets))
        .route("/api/dashboard", get(handlers::get_dashboard))
        .route("/api/reload", post(handlers::reload_dataset))
        .with_state(state)
        .layer(cors)
        // Logs every incoming request.
        .layer(TraceLayer::new_for_http())
}

/// The main function to configure and run the web server.
///
/// The dataset is loaded before the listener is bound, so a missing or
/// malformed source aborts startup instead of serving an empty dashboard.
pub async fn run_server(config: &Config) -> anyhow::Result<()> {
    let addr = config.server.address()?;

    let mut cache = DatasetCache::new(&config.data.source);
    let dataset = cache.get_or_load()?;
    tracing::info!(
        rows = dataset.records.len(),
        subregions = dataset.facets.subregions.len(),
        "Dataset ready."
    );

    let state = Arc::new(AppState::new(cache, config.dashboard.top_risk_limit));
    let app = build_router(state);

    tracing::info!("Web server listening on http://{}", addr);
    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
