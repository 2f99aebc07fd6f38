//! Skeleton instances and their factory
//!
//! The concrete pooled object used by the demo and tests: a positioned,
//! parentable skeleton whose animations come from a shared template.

mod factory;
mod instance;

pub use factory::{NodeName, SkeletonFactory, TemplateManifest};
pub use instance::SkeletonInstance;
