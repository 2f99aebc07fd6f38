//! Pool configuration
//!
//! Startup configuration for both instance families, loaded from RON
//! (preferred) or JSON and validated before any pool is built: every
//! category of a family must appear exactly once.
//!
//! # Example
//!
//! ```ignore
//! (
//!     world: [
//!         (category: HitEffect, template: Some("fx/hit"), preload_count: 5, max_pool_size: 20),
//!     ],
//!     overlay: [
//!         (category: ComboText, template: Some("ui/combo"), expandable: false),
//!     ],
//! )
//! ```

use std::fs;
use std::hash::Hash;
use std::path::Path;

use rustc_hash::FxHashSet;
use serde::{Deserialize, Serialize};

use super::category::{Category, OverlayEffect, WorldEffect};

fn default_preload_count() -> usize {
    5
}

fn default_max_pool_size() -> usize {
    20
}

fn default_true() -> bool {
    true
}

/// Per-category pool policy
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PoolConfig<C = Category> {
    /// Category this pool serves
    pub category: C,
    /// Template to instantiate (`None` leaves the category unpooled)
    #[serde(default)]
    pub template: Option<String>,
    /// Idle instances created at warmup
    #[serde(default = "default_preload_count")]
    pub preload_count: usize,
    /// Upper bound on idle instances kept after recycle
    #[serde(default = "default_max_pool_size")]
    pub max_pool_size: usize,
    /// Whether spawn may create instances when the pool is empty
    #[serde(default = "default_true")]
    pub expandable: bool,
}

impl<C> PoolConfig<C> {
    /// Config with default policy for `category` and `template`
    #[must_use]
    pub fn new(category: C, template: impl Into<String>) -> Self {
        Self {
            category,
            template: Some(template.into()),
            preload_count: default_preload_count(),
            max_pool_size: default_max_pool_size(),
            expandable: true,
        }
    }

    /// Set the preload count
    #[must_use]
    pub fn with_preload(mut self, preload_count: usize) -> Self {
        self.preload_count = preload_count;
        self
    }

    /// Set the idle pool bound
    #[must_use]
    pub fn with_max_pool_size(mut self, max_pool_size: usize) -> Self {
        self.max_pool_size = max_pool_size;
        self
    }

    /// Allow or forbid growth on demand
    #[must_use]
    pub fn with_expandable(mut self, expandable: bool) -> Self {
        self.expandable = expandable;
        self
    }

    /// Template name, if one is set and non-empty
    #[must_use]
    pub fn template(&self) -> Option<&str> {
        self.template.as_deref().filter(|t| !t.trim().is_empty())
    }

    /// Convert the category into another namespace
    #[must_use]
    pub fn map_category<D>(self, f: impl FnOnce(C) -> D) -> PoolConfig<D> {
        PoolConfig {
            category: f(self.category),
            template: self.template,
            preload_count: self.preload_count,
            max_pool_size: self.max_pool_size,
            expandable: self.expandable,
        }
    }
}

/// Complete startup configuration for a pool manager
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PoolSettings {
    /// World-family pools
    #[serde(default)]
    pub world: Vec<PoolConfig<WorldEffect>>,
    /// Overlay-family pools
    #[serde(default)]
    pub overlay: Vec<PoolConfig<OverlayEffect>>,
    /// Whether `PoolManager::create` warms every pool immediately
    #[serde(default = "default_true")]
    pub warmup_on_create: bool,
}

impl Default for PoolSettings {
    fn default() -> Self {
        Self {
            world: Vec::new(),
            overlay: Vec::new(),
            warmup_on_create: true,
        }
    }
}

impl PoolSettings {
    /// Every config of both families, world first
    #[must_use]
    pub fn configs(&self) -> Vec<PoolConfig> {
        self.world
            .iter()
            .cloned()
            .map(|config| config.map_category(Category::World))
            .chain(
                self.overlay
                    .iter()
                    .cloned()
                    .map(|config| config.map_category(Category::Overlay)),
            )
            .collect()
    }

    /// Check that each family lists every category exactly once and that
    /// every pool can hold at least one idle instance.
    ///
    /// # Errors
    ///
    /// Returns the first problem found.
    pub fn validate(&self) -> Result<(), ConfigError> {
        validate_family(&self.world, WorldEffect::ALL, Category::World)?;
        validate_family(&self.overlay, OverlayEffect::ALL, Category::Overlay)?;
        Ok(())
    }

    /// Parse and validate settings from a RON string
    ///
    /// # Errors
    ///
    /// Returns an error if parsing or validation fails
    pub fn from_ron_str(content: &str) -> Result<Self, ConfigError> {
        let settings: Self =
            ron::from_str(content).map_err(|e| ConfigError::DeserializeError(e.to_string()))?;
        settings.validate()?;
        Ok(settings)
    }

    /// Parse and validate settings from a JSON string
    ///
    /// # Errors
    ///
    /// Returns an error if parsing or validation fails
    pub fn from_json_str(content: &str) -> Result<Self, ConfigError> {
        let settings: Self = serde_json::from_str(content)
            .map_err(|e| ConfigError::DeserializeError(e.to_string()))?;
        settings.validate()?;
        Ok(settings)
    }

    /// Load settings from a RON file
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read, parsed, or validated
    pub fn load_ron(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let content = fs::read_to_string(path).map_err(|e| ConfigError::IoError(e.to_string()))?;
        Self::from_ron_str(&content)
    }

    /// Load settings from a JSON file
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read, parsed, or validated
    pub fn load_json(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let content = fs::read_to_string(path).map_err(|e| ConfigError::IoError(e.to_string()))?;
        Self::from_json_str(&content)
    }

    /// Save settings to a RON file
    ///
    /// # Errors
    ///
    /// Returns an error if serialization fails or the file cannot be written
    pub fn save_ron(&self, path: impl AsRef<Path>) -> Result<(), ConfigError> {
        let ron_string = ron::ser::to_string_pretty(self, ron::ser::PrettyConfig::default())
            .map_err(|e| ConfigError::SerializeError(e.to_string()))?;
        fs::write(path, ron_string).map_err(|e| ConfigError::IoError(e.to_string()))?;
        Ok(())
    }
}

fn validate_family<C>(
    configs: &[PoolConfig<C>],
    all: &[C],
    wrap: impl Fn(C) -> Category,
) -> Result<(), ConfigError>
where
    C: Copy + Eq + Hash,
{
    let mut seen = FxHashSet::default();
    for config in configs {
        let category = wrap(config.category);
        if !seen.insert(config.category) {
            return Err(ConfigError::DuplicateCategory(category));
        }
        if config.max_pool_size == 0 {
            return Err(ConfigError::ZeroCapacity(category));
        }
    }

    if let Some(&missing) = all.iter().find(|c| !seen.contains(*c)) {
        return Err(ConfigError::MissingCategory(wrap(missing)));
    }
    Ok(())
}

/// Errors that can occur while loading pool configuration
#[derive(Debug, Clone, PartialEq)]
pub enum ConfigError {
    /// IO error
    IoError(String),
    /// Serialization error
    SerializeError(String),
    /// Deserialization error
    DeserializeError(String),
    /// A category is configured twice
    DuplicateCategory(Category),
    /// A category has no config
    MissingCategory(Category),
    /// A pool has `max_pool_size` of zero
    ZeroCapacity(Category),
}

impl std::fmt::Display for ConfigError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::IoError(e) => write!(f, "IO error: {e}"),
            Self::SerializeError(e) => write!(f, "Serialization error: {e}"),
            Self::DeserializeError(e) => write!(f, "Deserialization error: {e}"),
            Self::DuplicateCategory(c) => write!(f, "Category '{c}' is configured twice"),
            Self::MissingCategory(c) => write!(f, "Category '{c}' has no pool config"),
            Self::ZeroCapacity(c) => write!(f, "Category '{c}' has max_pool_size 0"),
        }
    }
}

impl std::error::Error for ConfigError {}
