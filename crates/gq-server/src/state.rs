//! Application state shared by every handler

use std::sync::Arc;

use gq_core::{FilterMode, QueryClassifier};
use gq_data::{DataError, DataSource, SqliteSource, TemplateStore};

use crate::config::ServerConfig;

/// Everything a request needs; read-only after startup
pub struct AppState {
    /// Configuration the server was started with
    pub config: ServerConfig,

    /// Where queries run
    pub source: Arc<dyn DataSource>,

    /// Named SQL templates
    pub templates: TemplateStore,

    /// Gate for raw client queries
    pub classifier: Box<dyn QueryClassifier>,

    /// Interpretation of comma-separated filter values
    pub filter_mode: FilterMode,
}

impl AppState {
    /// Open the configured SQLite database and template directory
    pub async fn new(config: ServerConfig) -> Result<Self, DataError> {
        let source = SqliteSource::new(config.source_config()).await?;
        Ok(Self::with_source(config, Arc::new(source)))
    }

    /// Build state around an already constructed data source
    pub fn with_source(config: ServerConfig, source: Arc<dyn DataSource>) -> Self {
        let mut templates = TemplateStore::new(config.templates_dir.clone());
        if config.no_template_cache {
            templates = templates.without_cache();
        }

        Self {
            classifier: config.build_classifier(),
            filter_mode: config.filter_mode(),
            source,
            templates,
            config,
        }
    }
}
