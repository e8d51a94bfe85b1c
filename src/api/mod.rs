pub mod error;
pub mod handlers;

use crate::adapters::{FileOfferStore, InMemoryOfferStore, LocalStorage};
use crate::config::TomlConfig;
use crate::core::cache::ModelCache;
use crate::core::predictor::Predictor;
use crate::domain::ports::{ConfigProvider, OfferStore, Storage};
use crate::utils::error::Result;
use axum::routing::{get, post};
use axum::Router;
use std::sync::Arc;
use tokio::net::TcpListener;
use tower_http::trace::TraceLayer;

pub struct AppState<S: Storage> {
    pub predictor: Predictor<S>,
    pub offers: Arc<dyn OfferStore>,
}

impl<S: Storage> Clone for AppState<S> {
    fn clone(&self) -> Self {
        Self {
            predictor: self.predictor.clone(),
            offers: self.offers.clone(),
        }
    }
}

impl<S: Storage> AppState<S> {
    pub fn new(cache: Arc<ModelCache<S>>, offers: Arc<dyn OfferStore>) -> Self {
        Self {
            predictor: Predictor::new(cache),
            offers,
        }
    }
}

impl AppState<LocalStorage> {
    pub fn from_config(config: &TomlConfig) -> Self {
        let storage = LocalStorage::new(config.data_dir());
        let offers: Arc<dyn OfferStore> = if config.uses_memory_offers() {
            Arc::new(InMemoryOfferStore::new())
        } else {
            Arc::new(FileOfferStore::new(storage.clone(), config.offers.file.clone()))
        };
        let cache = Arc::new(ModelCache::from_config(storage, config));
        Self::new(cache, offers)
    }
}

pub fn router<S: Storage + 'static>(state: AppState<S>) -> Router {
    Router::new()
        .route("/", get(handlers::root))
        .route(
            "/offers/",
            get(handlers::list_offers::<S>).post(handlers::create_offer::<S>),
        )
        .route("/predict/", post(handlers::predict::<S>))
        .route("/model/", get(handlers::model_info::<S>))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Serves the API on an already bound listener until ctrl-c.
pub async fn serve<S: Storage + 'static>(listener: TcpListener, state: AppState<S>) -> Result<()> {
    if let Ok(addr) = listener.local_addr() {
        tracing::info!("🚀 Housing API listening on http://{}", addr);
    }

    axum::serve(listener, router(state))
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    tracing::info!("Housing API stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::warn!("Cannot listen for shutdown signal: {}", e);
        std::future::pending::<()>().await;
    }
}
