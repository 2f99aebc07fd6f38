//! Skeleton template library and instance factory
//!
//! Templates are registered once per path and shared by every instance made
//! from them. The factory also owns a small scene world so that holding
//! containers and caller-side parents have real node identities.

use std::fs;
use std::path::Path;
use std::sync::Arc;

use hecs::Entity;
use rustc_hash::FxHashMap;
use serde::{Deserialize, Serialize};

use super::instance::SkeletonInstance;
use crate::animation::{AnimationState, SkeletonData};
use crate::pool::{Category, ConfigError, InstanceFactory};

/// Scene node label
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NodeName(pub String);

/// Serialized template list
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TemplateManifest {
    /// Template path and skeleton data pairs
    pub templates: Vec<(String, SkeletonData)>,
}

/// Builds [`SkeletonInstance`]s from registered templates.
pub struct SkeletonFactory {
    /// Scene world providing node identities
    scene: hecs::World,
    /// Templates by path
    templates: FxHashMap<String, Arc<SkeletonData>>,
    /// Instances constructed
    created: u64,
    /// Instances destroyed
    destroyed: u64,
}

impl SkeletonFactory {
    /// Create a factory with no templates
    #[must_use]
    pub fn new() -> Self {
        Self {
            scene: hecs::World::new(),
            templates: FxHashMap::default(),
            created: 0,
            destroyed: 0,
        }
    }

    /// Register `data` under `path` and return the shared template.
    ///
    /// If `path` is already registered the existing template is kept.
    pub fn register(&mut self, path: impl Into<String>, data: SkeletonData) -> Arc<SkeletonData> {
        let path = path.into();
        if let Some(existing) = self.templates.get(&path) {
            log::debug!("Template '{}' already registered", path);
            return Arc::clone(existing);
        }

        let mut data = data;
        data.reindex();
        let data = Arc::new(data);
        self.templates.insert(path, Arc::clone(&data));
        data
    }

    /// Register every template in a RON manifest.
    ///
    /// # Errors
    ///
    /// Returns an error if the manifest cannot be parsed
    pub fn register_ron_str(&mut self, content: &str) -> Result<usize, ConfigError> {
        let manifest: TemplateManifest =
            ron::from_str(content).map_err(|e| ConfigError::DeserializeError(e.to_string()))?;
        let count = manifest.templates.len();
        for (path, data) in manifest.templates {
            self.register(path, data);
        }
        Ok(count)
    }

    /// Register every template in a RON manifest file.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or parsed
    pub fn register_ron_file(&mut self, path: impl AsRef<Path>) -> Result<usize, ConfigError> {
        let content = fs::read_to_string(path).map_err(|e| ConfigError::IoError(e.to_string()))?;
        self.register_ron_str(&content)
    }

    /// Look up a template
    #[must_use]
    pub fn template(&self, path: &str) -> Option<Arc<SkeletonData>> {
        self.templates.get(path).cloned()
    }

    /// Check if a template is registered
    #[must_use]
    pub fn contains(&self, path: &str) -> bool {
        self.templates.contains_key(path)
    }

    /// Spawn a plain scene node to parent instances under
    pub fn spawn_node(&mut self, name: impl Into<String>) -> Entity {
        self.scene.spawn((NodeName(name.into()),))
    }

    /// Check if a scene node exists
    #[must_use]
    pub fn has_node(&self, node: Entity) -> bool {
        self.scene.contains(node)
    }

    /// Instances constructed so far
    #[must_use]
    pub const fn created(&self) -> u64 {
        self.created
    }

    /// Instances destroyed so far
    #[must_use]
    pub const fn destroyed(&self) -> u64 {
        self.destroyed
    }

    /// Instances constructed and not yet destroyed
    #[must_use]
    pub const fn alive(&self) -> u64 {
        self.created - self.destroyed
    }
}

impl Default for SkeletonFactory {
    fn default() -> Self {
        Self::new()
    }
}

impl InstanceFactory for SkeletonFactory {
    type Instance = SkeletonInstance;

    fn create_container(&mut self) -> Entity {
        self.spawn_node("[Skeleton Pools]")
    }

    fn destroy_container(&mut self, container: Entity) {
        if self.scene.despawn(container).is_err() {
            log::warn!("Pool container {:?} was already gone", container);
        }
    }

    fn instantiate(
        &mut self,
        template: &str,
        category: Category,
        container: Entity,
    ) -> Option<SkeletonInstance> {
        let data = self.template(template)?;
        self.created += 1;

        let name = format!("{}_{}_{}", category.name(), category.family().name(), self.created);
        Some(SkeletonInstance::new(
            name,
            template,
            category,
            Some(container),
            AnimationState::new(data),
        ))
    }

    fn destroy(&mut self, instance: SkeletonInstance) {
        self.destroyed += 1;
        log::debug!("Destroyed {}", instance.name());
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::animation::AnimationControl;
    use crate::pool::{Poolable, WorldEffect};

    #[test]
    fn test_register_deduplicates() {
        let mut factory = SkeletonFactory::new();
        let first = factory.register("fx/hit", SkeletonData::new("hit").with_clip("a", 1.0));
        let second = factory.register("fx/hit", SkeletonData::new("other"));

        assert!(Arc::ptr_eq(&first, &second));
        assert_eq!(second.name, "hit");
    }

    #[test]
    fn test_instantiate_unknown_template() {
        let mut factory = SkeletonFactory::new();
        let container = factory.create_container();

        let instance = factory.instantiate("missing", WorldEffect::Like.into(), container);
        assert!(instance.is_none());
        assert_eq!(factory.created(), 0);
    }

    #[test]
    fn test_instantiate_is_inactive_under_container() {
        let mut factory = SkeletonFactory::new();
        factory.register("fx/hit", SkeletonData::new("hit").with_clip("explode", 0.5));
        let container = factory.create_container();

        let mut instance = factory
            .instantiate("fx/hit", WorldEffect::HitEffect.into(), container)
            .unwrap();
        assert!(!instance.is_active());
        assert_eq!(instance.parent(), Some(container));
        assert!(instance.set_animation(0, "explode", false).is_some());

        factory.destroy(instance);
        assert_eq!(factory.alive(), 0);
    }

    #[test]
    fn test_container_lifecycle() {
        let mut factory = SkeletonFactory::new();
        let container = factory.create_container();
        assert!(factory.has_node(container));

        factory.destroy_container(container);
        assert!(!factory.has_node(container));
    }

    #[test]
    fn test_manifest() {
        let manifest = r#"(
            templates: [
                ("fx/coin", (name: "coin", clips: [(name: "collect", duration: 0.4)])),
                ("ui/combo", (name: "combo", clips: [(name: "pop", duration: 0.25)])),
            ],
        )"#;

        let mut factory = SkeletonFactory::new();
        assert_eq!(factory.register_ron_str(manifest).unwrap(), 2);
        let coin = factory.template("fx/coin").unwrap();
        assert!(coin.find_animation("collect").is_some());
    }
}
