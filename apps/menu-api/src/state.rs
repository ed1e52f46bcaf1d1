//! Shared application state.

use document_store::{DocumentStore, InMemoryDocumentStore, MongoDocumentStore};
use eyre::eyre;
use std::sync::Arc;
use tracing::{info, warn};

use crate::config::Config;
use core_config::store::StoreBackend;
use domain_users::UserService;

/// Cloned into handlers; the store is shared behind an `Arc`
#[derive(Clone)]
pub struct AppState {
    pub config: Config,
    pub store: Arc<dyn DocumentStore>,
}

impl AppState {
    /// Open the configured store
    pub async fn connect(config: Config) -> eyre::Result<Self> {
        let store: Arc<dyn DocumentStore> = match config.backend {
            StoreBackend::MongoDb => {
                let mongodb = config
                    .mongodb
                    .as_ref()
                    .ok_or_else(|| eyre!("MongoDB backend selected without MongoDB settings"))?;
                info!(url = %mongodb.url(), database = %mongodb.database(), "Connecting to MongoDB");
                Arc::new(MongoDocumentStore::open(mongodb).await?)
            }
            StoreBackend::Memory => {
                warn!("Using the in-memory store, data is lost on restart");
                Arc::new(InMemoryDocumentStore::new())
            }
        };

        UserService::new(Arc::clone(&store)).ensure_indexes().await?;

        Ok(Self { config, store })
    }
}
