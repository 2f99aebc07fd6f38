//! Instance pooling
//!
//! Categories, configuration, ownership, and the manager that ties them
//! together.

mod category;
mod config;
mod error;
mod instance;
mod manager;
mod slots;
mod stats;

pub use category::{Category, Family, OverlayEffect, WorldEffect};
pub use config::{ConfigError, PoolConfig, PoolSettings};
pub use error::PoolError;
pub use instance::{InstanceFactory, Placement, Poolable};
pub use manager::{AdminAction, PoolManager};
pub use slots::{InstanceId, InstanceSlots};
pub use stats::{Counters, PoolStats, format_report};
