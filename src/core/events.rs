//! Pool Events
//!
//! The pool manager reports lifecycle transitions as events so that other
//! systems (audio cues, debug overlays, analytics) can react without holding
//! a reference into the manager. Whatever happens during tick N is readable
//! during tick N+1.
//!
//! # Example
//!
//! ```ignore
//! manager.tick(delta);
//! for event in manager.events().iter() {
//!     if let PoolEvent::Recycled { category, .. } = event {
//!         overlay.bump(*category);
//!     }
//! }
//! ```

use std::collections::VecDeque;

use crate::pool::{Category, InstanceId, PoolError};

// ============================================================================
// Event Types
// ============================================================================

/// Lifecycle events emitted by the pool manager.
#[derive(Debug, Clone, PartialEq)]
#[non_exhaustive]
pub enum PoolEvent {
    /// A category finished warming up.
    WarmedUp {
        /// Category registered
        category: Category,
        /// Idle instances created
        preloaded: usize,
    },

    /// An instance went from idle to active.
    Spawned {
        /// New activation id
        id: InstanceId,
        /// Category of the instance
        category: Category,
        /// Whether the instance was created because the pool was empty
        expanded: bool,
    },

    /// An active instance was recycled.
    Recycled {
        /// Activation id that ended
        id: InstanceId,
        /// Category of the instance
        category: Category,
        /// `true` if it went back to the idle pool, `false` if destroyed
        pooled: bool,
    },

    /// A timed or completion recycle fired after its instance was already
    /// recycled, and was ignored.
    StaleContinuation {
        /// Activation id the continuation was tagged with
        id: InstanceId,
    },

    /// A recoverable failure.
    Fault(PoolError),
}

// ============================================================================
// Event Log
// ============================================================================

/// Per-tick log of pool events.
///
/// The manager records into it as things happen and publishes the record at
/// the start of every `tick`. Recording is bounded: past `limit` unpublished
/// events the oldest are dropped, so a host that never ticks still has
/// bounded memory. Such hosts read with [`drain`](Self::drain).
#[derive(Debug)]
pub struct EventQueue {
    /// Events published by the last tick
    published: VecDeque<PoolEvent>,
    /// Events recorded since the last tick
    recording: VecDeque<PoolEvent>,
    /// Most unpublished events kept
    limit: usize,
    /// Events dropped because the record was full
    dropped: u64,
}

impl EventQueue {
    /// Unpublished events kept by [`new`](Self::new)
    pub const DEFAULT_LIMIT: usize = 1024;

    /// Create a log with the default bound
    #[must_use]
    pub fn new() -> Self {
        Self::with_limit(Self::DEFAULT_LIMIT)
    }

    /// Create a log keeping at most `limit` unpublished events (at least one)
    #[must_use]
    pub fn with_limit(limit: usize) -> Self {
        Self {
            published: VecDeque::new(),
            recording: VecDeque::new(),
            limit: limit.max(1),
            dropped: 0,
        }
    }

    pub(crate) fn record(&mut self, event: PoolEvent) {
        if self.recording.len() >= self.limit {
            self.recording.pop_front();
            self.dropped += 1;
            if self.dropped == 1 {
                log::warn!(
                    "Pool event log full ({} events), dropping oldest; call tick() or drain()",
                    self.limit
                );
            }
        }
        self.recording.push_back(event);
    }

    /// Make the record readable, discarding whatever was published before
    pub(crate) fn publish(&mut self) {
        std::mem::swap(&mut self.published, &mut self.recording);
        self.recording.clear();
    }

    /// Events published by the last tick
    pub fn iter(&self) -> impl Iterator<Item = &PoolEvent> {
        self.published.iter()
    }

    /// Events recorded since the last tick, not yet published
    pub fn recent(&self) -> impl Iterator<Item = &PoolEvent> {
        self.recording.iter()
    }

    /// Take every event, published ones first, then the unpublished record.
    pub fn drain(&mut self) -> impl Iterator<Item = PoolEvent> + '_ {
        self.published.drain(..).chain(self.recording.drain(..))
    }

    /// Number of published events
    #[must_use]
    pub fn len(&self) -> usize {
        self.published.len()
    }

    /// Check whether nothing is published
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.published.is_empty()
    }

    /// Events lost to the bound since creation
    #[must_use]
    pub const fn dropped(&self) -> u64 {
        self.dropped
    }
}

impl Default for EventQueue {
    fn default() -> Self {
        Self::new()
    }
}
