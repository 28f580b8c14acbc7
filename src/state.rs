use std::sync::Arc;
use std::time::Duration;

use crate::blog::Blog;
use crate::catalog::Catalog;
use crate::config::Config;
use crate::export::matrix;

/// Shared application state.
#[derive(Clone)]
pub struct AppState {
    pub config: Config,
    pub catalog: Arc<Catalog>,
    pub http_client: reqwest::Client,
    pub blog: Blog,
}

impl AppState {
    pub fn new(config: Config) -> anyhow::Result<Self> {
        // Ensure data directories exist
        std::fs::create_dir_all(config.downloads_dir())?;

        let catalog = Catalog::open(&config.catalog_path())?;
        tracing::info!(
            "Catalog loaded: {} languages, {} genera, {} families, {} features, {} sources",
            catalog.languages.len(),
            catalog.genera.len(),
            catalog.families.len(),
            catalog.features.len(),
            catalog.sources.len()
        );

        if !catalog.languages.is_empty() {
            if let Err(e) = matrix::create(&catalog, &config.matrix_path()) {
                tracing::warn!("Failed to write matrix download: {e:#}");
            }
        }

        Self::with_catalog(config, catalog)
    }

    /// Build state around an already loaded catalog.
    pub fn with_catalog(config: Config, catalog: Catalog) -> anyhow::Result<Self> {
        let http_client = reqwest::Client::builder()
            .connect_timeout(Duration::from_millis(config.blog.connect_timeout_ms))
            .build()?;
        let blog = Blog::new(&config.blog);

        Ok(Self {
            config,
            catalog: Arc::new(catalog),
            http_client,
            blog,
        })
    }
}
