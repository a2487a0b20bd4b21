//! Client configuration.
//!
//! Values come from the environment, with defaults suitable for a local
//! development server:
//!
//! - `CONTINUUM_API_URL`: API base URL (default `http://localhost:5000/api`)
//! - `CONTINUUM_STORAGE`: `memory`, a `redis://` URL, or a cache directory
//!   (default: the platform data directory joined with `continuum`)
//! - `CONTINUUM_CATEGORY`: category selected until the cache says otherwise

use std::path::PathBuf;

use continuum_api::DEFAULT_API_URL;
use continuum_storage::StorageLocation;

use crate::board::model::CategoryId;
use crate::error::{CoreError, CoreResult};

/// Client configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClientConfig {
    pub api_url: String,
    pub storage: StorageLocation,
    pub default_category: CategoryId,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            api_url: DEFAULT_API_URL.to_string(),
            storage: StorageLocation::Directory(default_storage_dir()),
            default_category: CategoryId::default(),
        }
    }
}

impl ClientConfig {
    /// Read the configuration from the process environment.
    pub fn from_env() -> CoreResult<Self> {
        Self::default().apply(|key| std::env::var(key).ok())
    }

    /// Override fields from any variable lookup keyed by the environment
    /// variable names. Blank values are ignored.
    pub fn apply(mut self, lookup: impl Fn(&str) -> Option<String>) -> CoreResult<Self> {
        if let Some(url) = lookup("CONTINUUM_API_URL").filter(|v| !v.trim().is_empty()) {
            self.api_url = url.trim().to_string();
        }
        if let Some(storage) = lookup("CONTINUUM_STORAGE").filter(|v| !v.trim().is_empty()) {
            self.storage = StorageLocation::parse(&storage);
        }
        if let Some(category) = lookup("CONTINUUM_CATEGORY").filter(|v| !v.trim().is_empty()) {
            self.default_category = category.trim().parse().map_err(|_| {
                CoreError::Config(format!(
                    "CONTINUUM_CATEGORY '{}' is not one of: {}",
                    category,
                    CategoryId::ALL.map(|c| c.as_str()).join(", ")
                ))
            })?;
        }

        Ok(self)
    }
}

/// Default cache directory, `<data dir>/continuum`.
pub fn default_storage_dir() -> PathBuf {
    dirs::data_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("continuum")
}
