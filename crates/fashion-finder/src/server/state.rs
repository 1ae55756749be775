//! Application state for the finder server

use std::sync::Arc;

use crate::auth::GcpAuth;
use crate::catalog::CatalogClient;
use crate::config::FinderConfig;
use crate::error::Result;
use crate::render::ImageRenderer;
use crate::uploads::UploadStore;

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    inner: Arc<AppStateInner>,
}

struct AppStateInner {
    /// Configuration
    config: FinderConfig,
    /// Catalog search client
    catalog: CatalogClient,
    /// Result image renderer
    renderer: ImageRenderer,
    /// Reference image store
    uploads: UploadStore,
}

impl AppState {
    /// Create new application state
    ///
    /// Credential and cluster configuration problems are fatal here, before
    /// the server starts accepting requests.
    pub fn new(config: FinderConfig) -> Result<Self> {
        tracing::info!("Initializing finder state...");

        let auth = Arc::new(GcpAuth::from_service_account(&config.credentials.key_path)?);
        tracing::info!(
            "Service account key loaded from {}",
            config.credentials.key_path.display()
        );

        let catalog = CatalogClient::connect(&config, auth)?;
        tracing::info!("Catalog client connected (collection: {})", catalog.collection());

        let renderer = ImageRenderer::new(&config.display);
        let uploads = UploadStore::new(&config.uploads)?;

        Ok(Self {
            inner: Arc::new(AppStateInner {
                config,
                catalog,
                renderer,
                uploads,
            }),
        })
    }

    /// Configuration
    pub fn config(&self) -> &FinderConfig {
        &self.inner.config
    }

    /// Catalog search client
    pub fn catalog(&self) -> &CatalogClient {
        &self.inner.catalog
    }

    /// Result image renderer
    pub fn renderer(&self) -> &ImageRenderer {
        &self.inner.renderer
    }

    /// Reference image store
    pub fn uploads(&self) -> &UploadStore {
        &self.inner.uploads
    }
}
