//! Named SQL templates stored as files
//!
//! A template is a fixed query read from `<dir>/<name>.sql`. The heatmap
//! template carries one `{column}` placeholder that is replaced by a quoted
//! identifier; nothing else from the client reaches the query text.

use std::path::PathBuf;
use std::sync::Arc;

use ahash::AHashMap;
use parking_lot::RwLock;
use tracing::debug;

use crate::DataError;

/// Template listing the columns a client may pick as intensity
pub const COLUMNS_TABLE: &str = "columns_table";

/// Template listing the distinct filter values
pub const FILTERS: &str = "filters";

/// Template producing the rows behind the heatmap
pub const HEATMAP: &str = "heatmap";

/// Placeholder replaced by the chosen value column
pub const COLUMN_PLACEHOLDER: &str = "{column}";

/// Loads templates by name, keeping their text once read
pub struct TemplateStore {
    dir: PathBuf,
    cache: Option<RwLock<AHashMap<String, Arc<str>>>>,
}

impl TemplateStore {
    /// Create a store reading from `dir` and caching template text
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self {
            dir: dir.into(),
            cache: Some(RwLock::new(AHashMap::new())),
        }
    }

    /// Re-read templates from disk on every load
    pub fn without_cache(mut self) -> Self {
        self.cache = None;
        self
    }

    /// Read the template called `name`
    pub async fn load(&self, name: &str) -> Result<Arc<str>, DataError> {
        if let Some(cached) = self.cache.as_ref().and_then(|c| c.read().get(name).cloned()) {
            return Ok(cached);
        }

        let well_formed = !name.is_empty()
            && name
                .chars()
                .all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '-');
        if !well_formed {
            return Err(DataError::Template(format!("invalid template name '{}'", name)));
        }

        let path = self.dir.join(format!("{}.sql", name));
        let text = tokio::fs::read_to_string(&path).await.map_err(|e| {
            DataError::Template(format!("failed to read {}: {}", path.display(), e))
        })?;
        debug!(template = name, path = %path.display(), "loaded template");

        let text: Arc<str> = Arc::from(text);
        if let Some(cache) = &self.cache {
            cache.write().insert(name.to_string(), text.clone());
        }
        Ok(text)
    }

    /// Read `name` and substitute `column` as a quoted identifier
    pub async fn render_with_column(&self, name: &str, column: &str) -> Result<String, DataError> {
        let template = self.load(name).await?;
        substitute_column(&template, column).ok_or_else(|| {
            DataError::Template(format!(
                "template '{}' has no {} placeholder",
                name, COLUMN_PLACEHOLDER
            ))
        })
    }

    /// Drop every cached template
    pub fn clear(&self) {
        if let Some(cache) = &self.cache {
            cache.write().clear();
        }
    }
}

/// Quote `name` as an SQL identifier, doubling embedded quotes
pub fn quote_identifier(name: &str) -> String {
    format!("\"{}\"", name.replace('"', "\"\""))
}

/// Replace every placeholder with the quoted column, `None` if there is none
pub fn substitute_column(template: &str, column: &str) -> Option<String> {
    if !template.contains(COLUMN_PLACEHOLDER) {
        return None;
    }
    Some(template.replace(COLUMN_PLACEHOLDER, &quote_identifier(column)))
}
