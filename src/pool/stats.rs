//! Pool statistics

use std::fmt;

use super::category::Category;

/// Monotonic per-category counters.
///
/// `recycled` counts every successful recycle, including the ones that
/// destroyed the instance because the idle pool was full (`discarded`).
/// So for every category `spawned - recycled` equals the active count.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Counters {
    /// Successful spawns
    pub spawned: u64,
    /// Successful recycles, pooled or discarded
    pub recycled: u64,
    /// Recycles that destroyed the instance
    pub discarded: u64,
    /// Instances constructed by the factory
    pub created: u64,
}

/// Point-in-time statistics for one category
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PoolStats {
    /// Category described
    pub category: Category,
    /// Idle instances waiting in the pool
    pub pooled: usize,
    /// Active instances of this category
    pub active: usize,
    /// Successful spawns
    pub spawned: u64,
    /// Successful recycles
    pub recycled: u64,
    /// Recycles that destroyed the instance
    pub discarded: u64,
    /// Instances constructed
    pub created: u64,
}

impl PoolStats {
    /// Build a snapshot from live counts and counters
    #[must_use]
    pub const fn new(category: Category, pooled: usize, active: usize, counters: Counters) -> Self {
        Self {
            category,
            pooled,
            active,
            spawned: counters.spawned,
            recycled: counters.recycled,
            discarded: counters.discarded,
            created: counters.created,
        }
    }

    /// Instances alive (idle or active)
    #[must_use]
    pub const fn alive(&self) -> usize {
        self.pooled + self.active
    }
}

impl fmt::Display for PoolStats {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}: Pooled={}, Active={}, Spawned={}, Recycled={}, Discarded={}, Created={}",
            self.category,
            self.pooled,
            self.active,
            self.spawned,
            self.recycled,
            self.discarded,
            self.created
        )
    }
}

/// Render a statistics table, one line per category
#[must_use]
pub fn format_report(stats: &[PoolStats]) -> String {
    let mut report = String::from("=== Pool Statistics ===");
    for entry in stats {
        report.push('\n');
        report.push_str(&entry.to_string());
    }
    report
}
