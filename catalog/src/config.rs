//! Configuration for the catalog client

use eyre::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CatalogConfig {
    /// Catalog API root, without the trailing `/courses` segment
    #[serde(rename = "base-url", default = "default_base_url")]
    pub base_url: String,

    /// Catalog (academic year) identifier
    #[serde(rename = "catalog-id", default = "default_catalog_id")]
    pub catalog_id: String,

    /// User-Agent header sent with every request
    #[serde(rename = "user-agent", default = "default_user_agent")]
    pub user_agent: String,

    /// Origin header; the API rejects requests without a browser origin
    #[serde(default = "default_origin")]
    pub origin: String,

    /// Referer header
    #[serde(default = "default_referer")]
    pub referer: String,

    /// Request timeout in milliseconds
    #[serde(rename = "timeout-ms", default = "default_timeout_ms")]
    pub timeout_ms: u64,
}

fn default_base_url() -> String {
    crate::DEFAULT_BASE_URL.to_string()
}

fn default_catalog_id() -> String {
    crate::DEFAULT_CATALOG_ID.to_string()
}

fn default_user_agent() -> String {
    "Mozilla/5.0 (Macintosh; Intel Mac OS X 10.15; rv:132.0) Gecko/20100101 Firefox/132.0".to_string()
}

fn default_origin() -> String {
    "https://web.uri.edu".to_string()
}

fn default_referer() -> String {
    "https://web.uri.edu/".to_string()
}

fn default_timeout_ms() -> u64 {
    30_000
}

impl Default for CatalogConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            catalog_id: default_catalog_id(),
            user_agent: default_user_agent(),
            origin: default_origin(),
            referer: default_referer(),
            timeout_ms: default_timeout_ms(),
        }
    }
}

impl CatalogConfig {
    /// Load config from file, or use defaults
    pub fn load(path: Option<&PathBuf>) -> Result<Self> {
        if let Some(config_path) = path {
            return Self::load_from_file(config_path);
        }

        // Try default locations
        let default_paths = [
            dirs::config_dir().map(|p| p.join("catalog").join("config.yml")),
            Some(PathBuf::from("catalog.yml")),
        ];

        for path in default_paths.iter().flatten() {
            if path.exists() {
                return Self::load_from_file(path);
            }
        }

        Ok(CatalogConfig::default())
    }

    fn load_from_file(path: &Path) -> Result<Self> {
        let content =
            std::fs::read_to_string(path).with_context(|| format!("Failed to read {}", path.display()))?;
        let config: CatalogConfig =
            serde_yaml::from_str(&content).with_context(|| format!("Failed to parse {}", path.display()))?;
        log::info!("Loaded catalog config from {}", path.display());
        Ok(config)
    }

    /// URL listing every course in the catalog
    pub fn courses_url(&self) -> String {
        format!("{}/courses/{}", self.base_url.trim_end_matches('/'), self.catalog_id)
    }

    /// URL for a single course's detail record
    pub fn course_url(&self, pid: &str) -> String {
        format!("{}/course/{}/{}", self.base_url.trim_end_matches('/'), self.catalog_id, pid)
    }
}
