//! Poolable instance contracts
//!
//! The pool manager never constructs or renders anything itself. It asks an
//! [`InstanceFactory`] for instances and drives them through the
//! [`Poolable`] operations below.

use glam::Vec3;
use hecs::Entity;

use super::category::Category;
use crate::animation::AnimationControl;

/// Where a spawned instance goes
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Placement {
    /// Position in the parent's space
    pub position: Vec3,
    /// Scene node to attach under (`None` for the scene root)
    pub parent: Option<Entity>,
}

impl Placement {
    /// Placement at `position` under the scene root
    #[must_use]
    pub const fn at(position: Vec3) -> Self {
        Self {
            position,
            parent: None,
        }
    }

    /// Attach under `parent`
    #[must_use]
    pub const fn under(mut self, parent: Entity) -> Self {
        self.parent = Some(parent);
        self
    }
}

impl Default for Placement {
    fn default() -> Self {
        Self::at(Vec3::ZERO)
    }
}

impl From<Vec3> for Placement {
    fn from(position: Vec3) -> Self {
        Self::at(position)
    }
}

/// An animated object that can be parked and reused.
pub trait Poolable: AnimationControl {
    /// Show or hide the instance and enable or disable its updates
    fn set_active(&mut self, active: bool);

    /// Check whether the instance is shown
    fn is_active(&self) -> bool;

    /// Re-parent the instance (`None` for the scene root)
    fn attach(&mut self, parent: Option<Entity>);

    /// Move the instance
    fn set_position(&mut self, position: Vec3);
}

/// Creates and destroys pooled instances and the node idle ones park under.
pub trait InstanceFactory {
    /// Instance type produced
    type Instance: Poolable;

    /// Create the holding node for idle instances
    fn create_container(&mut self) -> Entity;

    /// Destroy the holding node
    fn destroy_container(&mut self, container: Entity);

    /// Instantiate `template` for `category`, inactive, under `container`.
    ///
    /// Returns `None` if the template cannot be resolved.
    fn instantiate(
        &mut self,
        template: &str,
        category: Category,
        container: Entity,
    ) -> Option<Self::Instance>;

    /// Destroy an instance permanently
    fn destroy(&mut self, instance: Self::Instance);
}
