//! Prompt Loader
//!
//! Loads prompt templates from an override directory or falls back to the
//! embedded defaults.

use std::path::{Path, PathBuf};

use eyre::{Result, eyre};
use tracing::debug;

use super::embedded;

/// Template names the planner uses
pub const TEMPLATE_NAMES: [&str; 3] = ["rules", "context", "request"];

/// Resolves prompt template sources
#[derive(Debug, Clone, Default)]
pub struct PromptLoader {
    /// Override directory (e.g., `/etc/gradplan/prompts/`)
    override_dir: Option<PathBuf>,
}

impl PromptLoader {
    /// Create a loader that checks `dir` before the embedded prompts
    pub fn new(dir: impl AsRef<Path>) -> Self {
        let dir = dir.as_ref();
        debug!(?dir, exists = dir.exists(), "PromptLoader::new: called");
        Self {
            override_dir: Some(dir.to_path_buf()),
        }
    }

    /// Create a loader that only uses embedded prompts
    pub fn embedded_only() -> Self {
        debug!("PromptLoader::embedded_only: called");
        Self { override_dir: None }
    }

    /// Build from an optional override directory
    pub fn from_dir(dir: Option<&Path>) -> Self {
        match dir {
            Some(d) => Self::new(d),
            None => Self::embedded_only(),
        }
    }

    /// Load a template by name
    ///
    /// Checks `{override_dir}/{name}.pmt` first, then the embedded copy.
    pub fn load_template(&self, name: &str) -> Result<String> {
        debug!(%name, "PromptLoader::load_template: called");
        if let Some(ref dir) = self.override_dir {
            let path = dir.join(format!("{}.pmt", name));
            if path.exists() {
                debug!(?path, "PromptLoader::load_template: found override");
                return std::fs::read_to_string(&path)
                    .map_err(|e| eyre!("Failed to read prompt override {}: {}", path.display(), e));
            }
        }

        embedded::get_embedded(name)
            .map(str::to_string)
            .ok_or_else(|| eyre!("Prompt template not found: {}", name))
    }
}
