//! Pooled skeleton instance

use glam::Vec3;
use hecs::Entity;

use crate::animation::{AnimationControl, AnimationState, TrackHandle};
use crate::pool::{Category, Poolable};

/// A skeleton placed in the scene, playing animations from its template.
#[derive(Debug, Clone)]
pub struct SkeletonInstance {
    /// Debug name
    name: String,
    /// Template path this instance was created from
    template: String,
    /// Pool category
    category: Category,
    /// Position in the parent's space
    position: Vec3,
    /// Scene parent
    parent: Option<Entity>,
    /// Whether the instance is shown and updated
    active: bool,
    /// Animation playback
    state: AnimationState,
}

impl SkeletonInstance {
    /// Create an inactive instance under `parent`
    #[must_use]
    pub fn new(
        name: impl Into<String>,
        template: impl Into<String>,
        category: Category,
        parent: Option<Entity>,
        state: AnimationState,
    ) -> Self {
        Self {
            name: name.into(),
            template: template.into(),
            category,
            position: Vec3::ZERO,
            parent,
            active: false,
            state,
        }
    }

    /// Debug name
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Template path
    #[must_use]
    pub fn template(&self) -> &str {
        &self.template
    }

    /// Pool category
    #[must_use]
    pub const fn category(&self) -> Category {
        self.category
    }

    /// Position in the parent's space
    #[must_use]
    pub const fn position(&self) -> Vec3 {
        self.position
    }

    /// Scene parent
    #[must_use]
    pub const fn parent(&self) -> Option<Entity> {
        self.parent
    }

    /// Animation playback state
    #[must_use]
    pub const fn state(&self) -> &AnimationState {
        &self.state
    }

    /// Animation playback state, mutably
    pub fn state_mut(&mut self) -> &mut AnimationState {
        &mut self.state
    }
}

impl AnimationControl for SkeletonInstance {
    fn set_animation(&mut self, track: usize, name: &str, looping: bool) -> Option<TrackHandle> {
        self.state.set_animation(track, name, looping)
    }

    fn add_animation(
        &mut self,
        track: usize,
        name: &str,
        looping: bool,
        delay: f32,
    ) -> Option<TrackHandle> {
        self.state.add_animation(track, name, looping, delay)
    }

    fn clear_tracks(&mut self) {
        self.state.clear_tracks();
    }

    fn reset_to_neutral_pose(&mut self) {
        self.state.reset_to_neutral_pose();
    }

    fn update(&mut self, delta: f32, completed: &mut Vec<TrackHandle>) {
        // Hidden skeletons do not advance
        if self.active {
            self.state.update(delta, completed);
        }
    }
}

impl Poolable for SkeletonInstance {
    fn set_active(&mut self, active: bool) {
        self.active = active;
    }

    fn is_active(&self) -> bool {
        self.active
    }

    fn attach(&mut self, parent: Option<Entity>) {
        self.parent = parent;
    }

    fn set_position(&mut self, position: Vec3) {
        self.position = position;
    }
}
