//! Animation clips and skeleton data
//!
//! Only what playback scheduling needs: clip names and durations. Timeline
//! curves and bone data belong to the playback runtime.

use rustc_hash::FxHashMap;
use serde::{Deserialize, Serialize};

/// A named animation with a fixed duration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnimationClip {
    /// Clip name
    pub name: String,
    /// Duration in seconds
    pub duration: f32,
}

impl AnimationClip {
    /// Create a clip
    #[must_use]
    pub fn new(name: impl Into<String>, duration: f32) -> Self {
        Self {
            name: name.into(),
            duration: duration.max(0.0),
        }
    }
}

/// Shared, immutable description of one skeleton and its animations.
///
/// Instances created from the same template share one `SkeletonData`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SkeletonData {
    /// Skeleton name
    pub name: String,
    /// Available animations
    pub clips: Vec<AnimationClip>,
    /// Name to clip index
    #[serde(skip)]
    lookup: FxHashMap<String, usize>,
}

impl SkeletonData {
    /// Create skeleton data without animations
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            clips: Vec::new(),
            lookup: FxHashMap::default(),
        }
    }

    /// Builder-style clip registration
    #[must_use]
    pub fn with_clip(mut self, name: impl Into<String>, duration: f32) -> Self {
        self.add_clip(AnimationClip::new(name, duration));
        self
    }

    /// Register a clip, replacing any clip with the same name
    pub fn add_clip(&mut self, clip: AnimationClip) {
        if let Some(&index) = self.lookup.get(&clip.name) {
            self.clips[index] = clip;
        } else {
            self.lookup.insert(clip.name.clone(), self.clips.len());
            self.clips.push(clip);
        }
    }

    /// Find an animation by name
    #[must_use]
    pub fn find_animation(&self, name: &str) -> Option<&AnimationClip> {
        match self.lookup.get(name) {
            Some(&index) => self.clips.get(index),
            // Deserialized data has no lookup table until `reindex()`
            None if self.lookup.len() != self.clips.len() => {
                self.clips.iter().find(|clip| clip.name == name)
            }
            None => None,
        }
    }

    /// Rebuild the name lookup after deserialization
    pub fn reindex(&mut self) {
        self.lookup = self
            .clips
            .iter()
            .enumerate()
            .map(|(index, clip)| (clip.name.clone(), index))
            .collect();
    }

    /// Number of animations
    #[must_use]
    pub fn len(&self) -> usize {
        self.clips.len()
    }

    /// Check if the skeleton has no animations
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.clips.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_find_animation() {
        let data = SkeletonData::new("hit")
            .with_clip("explode", 0.6)
            .with_clip("idle", 1.0);

        assert_eq!(data.find_animation("explode").map(|c| c.duration), Some(0.6));
        assert!(data.find_animation("missing").is_none());
    }

    #[test]
    fn test_replace_clip() {
        let data = SkeletonData::new("hit")
            .with_clip("explode", 0.6)
            .with_clip("explode", 0.8);

        assert_eq!(data.len(), 1);
        assert_eq!(data.find_animation("explode").map(|c| c.duration), Some(0.8));
    }

    #[test]
    fn test_negative_duration_clamped() {
        assert_eq!(AnimationClip::new("x", -1.0).duration, 0.0);
    }

    #[test]
    fn test_deserialized_lookup() {
        let ron_str = r#"(name: "coin", clips: [(name: "spin", duration: 0.5)])"#;
        let mut data: SkeletonData = ron::from_str(ron_str).unwrap();
        assert!(data.find_animation("spin").is_some());

        data.reindex();
        assert!(data.find_animation("spin").is_some());
    }
}
