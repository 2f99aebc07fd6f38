//! Pool failure taxonomy
//!
//! None of these abort anything. They are detected, logged, and surfaced as
//! empty results, skipped categories, or [`PoolEvent::Fault`] entries.
//!
//! [`PoolEvent::Fault`]: crate::core::PoolEvent::Fault

use super::category::Category;
use super::slots::InstanceId;

/// Recoverable pool failures.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PoolError {
    /// Spawn requested for a category that was never warmed up
    ConfigurationMissing(Category),
    /// Pool is empty and not allowed to grow
    PoolExhausted(Category),
    /// Recycle of an id that is not active in this manager
    ForeignRecycle(InstanceId),
    /// Warmup config has no usable template
    TemplateMissing(Category),
}

impl std::fmt::Display for PoolError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::ConfigurationMissing(category) => {
                write!(f, "Pool '{category}' is not configured")
            }
            Self::PoolExhausted(category) => {
                write!(f, "Pool '{category}' is empty and not expandable")
            }
            Self::ForeignRecycle(id) => {
                write!(f, "Instance {id} is not active in this pool manager")
            }
            Self::TemplateMissing(category) => {
                write!(f, "Pool '{category}' has no usable template")
            }
        }
    }
}

impl std::error::Error for PoolError {}
