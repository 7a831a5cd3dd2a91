//! Prompt Store - Override resolution and caching for system instructions
//!
//! Resolves a prompt by name against an optional override directory, falling
//! back to the embedded defaults. Loaded prompts are cached in memory.

use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::RwLock;

use crate::error::{DraftrError, Result};
use crate::prompt::embedded;

/// Resolves and caches system instructions
pub struct PromptStore {
    /// Optional directory containing `{name}.md` override files
    override_dir: Option<PathBuf>,
    /// In-memory cache of resolved prompts
    cache: RwLock<HashMap<String, String>>,
}

impl PromptStore {
    /// Create a store with the given override directory
    pub fn new(override_dir: impl AsRef<Path>) -> Self {
        Self {
            override_dir: Some(override_dir.as_ref().to_path_buf()),
            cache: RwLock::new(HashMap::new()),
        }
    }

    /// Create a store backed by the user config directory
    /// (`~/.config/draftr/prompts` on Linux)
    pub fn from_config_dir() -> Self {
        let override_dir =
            dirs::config_dir().map(|dir| dir.join(env!("CARGO_PKG_NAME")).join("prompts"));
        Self {
            override_dir,
            cache: RwLock::new(HashMap::new()),
        }
    }

    /// Create a store that only serves the embedded defaults
    pub fn embedded_only() -> Self {
        Self {
            override_dir: None,
            cache: RwLock::new(HashMap::new()),
        }
    }

    /// Resolve a prompt by name
    ///
    /// Checks in order:
    /// 1. In-memory cache
    /// 2. Override file: `{override_dir}/{name}.md`
    /// 3. Embedded default
    pub fn load(&self, name: &str) -> Result<String> {
        // Check cache first
        {
            let cache = self
                .cache
                .read()
                .map_err(|e| DraftrError::Storage(format!("Failed to acquire read lock: {}", e)))?;
            if let Some(content) = cache.get(name) {
                return Ok(content.clone());
            }
        }

        let content = match self.override_path(name) {
            Some(path) if path.exists() => std::fs::read_to_string(&path).map_err(|e| {
                DraftrError::Io(std::io::Error::new(
                    e.kind(),
                    format!("Failed to load prompt '{}' from {:?}: {}", name, path, e),
                ))
            })?,
            _ => embedded::get_embedded(name)
                .ok_or_else(|| DraftrError::Config(format!("Unknown prompt: {}", name)))?
                .to_string(),
        };

        // Cache the resolved prompt
        {
            let mut cache = self
                .cache
                .write()
                .map_err(|e| DraftrError::Storage(format!("Failed to acquire write lock: {}", e)))?;
            cache.insert(name.to_string(), content.clone());
        }

        Ok(content)
    }

    /// The drafting instruction
    pub fn generate(&self) -> Result<String> {
        self.load("generate")
    }

    /// The critique instruction
    pub fn reflect(&self) -> Result<String> {
        self.load("reflect")
    }

    /// Check whether an override file exists for a prompt
    pub fn has_override(&self, name: &str) -> bool {
        self.override_path(name).is_some_and(|path| path.exists())
    }

    /// Full path of the override file for a prompt, if an override
    /// directory is configured
    fn override_path(&self, name: &str) -> Option<PathBuf> {
        self.override_dir
            .as_ref()
            .map(|dir| dir.join(format!("{}.md", name)))
    }

    /// Clear the prompt cache
    pub fn clear_cache(&self) -> Result<()> {
        let mut cache = self
            .cache
            .write()
            .map_err(|e| DraftrError::Storage(format!("Failed to acquire write lock: {}", e)))?;
        cache.clear();
        Ok(())
    }
}
