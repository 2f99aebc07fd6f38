//! Pooling for animated skeleton effects
//!
//! This crate provides:
//! - Category-keyed pools for world effects and overlay effects
//! - Generational instance ids, so late timers never touch a reused instance
//! - Recycling on a timer or when a one-shot animation completes
//! - RON/JSON pool configuration with validation
//! - A track-based animation state for skeleton instances

pub mod animation;
pub mod core;
pub mod pool;
pub mod skeleton;

// Re-exports for convenience
pub use glam;
pub use hecs;

/// Prelude module for common imports
pub mod prelude {
    pub use crate::animation::{AnimationControl, SequenceStep, SkeletonData, TrackHandle};
    pub use crate::core::PoolEvent;
    pub use crate::pool::{
        AdminAction, Category, InstanceFactory, InstanceId, OverlayEffect, Placement,
        PoolConfig, PoolManager, PoolSettings, Poolable, WorldEffect,
    };
    pub use crate::skeleton::{SkeletonFactory, SkeletonInstance};
    pub use glam::Vec3;
}
