//! Deferred Task Queue
//!
//! A single-threaded queue of work that should run at a later point on the
//! same thread, typically "recycle this instance in 1.5 seconds". Tasks carry
//! an explicit due time and are released once per tick by the owner.
//!
//! # Design Principles
//!
//! - **No Threads**: Nothing runs until the owner calls `drain_due()`
//! - **Deterministic Order**: Due tasks come out sorted by due time, ties in
//!   scheduling order
//! - **Payload Agnostic**: Tasks are plain values; validation of stale
//!   payloads is the consumer's job
//!
//! # Example
//!
//! ```ignore
//! let mut queue = DeferredQueue::new();
//! queue.schedule(now + Duration::from_secs(2), Task::Recycle(id));
//!
//! // Once per frame
//! for task in queue.drain_due(time.elapsed()) {
//!     run(task);
//! }
//! ```

use std::time::Duration;

/// A scheduled task and its due time.
#[derive(Debug, Clone)]
struct Deferred<T> {
    /// Time at which the task becomes runnable
    due: Duration,
    /// Scheduling sequence number, for stable ordering
    seq: u64,
    /// Task payload
    task: T,
}

/// Queue of tasks waiting for their due time.
#[derive(Debug)]
pub struct DeferredQueue<T> {
    /// Pending tasks, unordered
    pending: Vec<Deferred<T>>,
    /// Next sequence number
    next_seq: u64,
}

impl<T> DeferredQueue<T> {
    /// Create an empty queue
    #[must_use]
    pub fn new() -> Self {
        Self {
            pending: Vec::new(),
            next_seq: 0,
        }
    }

    /// Schedule `task` to become runnable at `due`.
    pub fn schedule(&mut self, due: Duration, task: T) {
        let seq = self.next_seq;
        self.next_seq += 1;
        self.pending.push(Deferred { due, seq, task });
    }

    /// Remove and return every task with `due <= now`, in due order.
    ///
    /// Tasks scheduled while the returned tasks are being processed are not
    /// included, even if they are already due; they run on the next drain.
    pub fn drain_due(&mut self, now: Duration) -> Vec<T> {
        let mut due = Vec::new();
        let mut index = 0;
        while index < self.pending.len() {
            if self.pending[index].due <= now {
                due.push(self.pending.swap_remove(index));
            } else {
                index += 1;
            }
        }

        due.sort_by_key(|deferred| (deferred.due, deferred.seq));
        due.into_iter().map(|deferred| deferred.task).collect()
    }

    /// Drop every pending task matching `predicate`.
    ///
    /// Returns the number of tasks removed.
    pub fn cancel_where(&mut self, mut predicate: impl FnMut(&T) -> bool) -> usize {
        let before = self.pending.len();
        self.pending.retain(|deferred| !predicate(&deferred.task));
        before - self.pending.len()
    }

    /// Number of pending tasks
    #[must_use]
    #[inline]
    pub fn len(&self) -> usize {
        self.pending.len()
    }

    /// Check if nothing is pending
    #[must_use]
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.pending.is_empty()
    }

    /// Drop all pending tasks
    pub fn clear(&mut self) {
        self.pending.clear();
    }
}

impl<T> Default for DeferredQueue<T> {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn secs(value: f32) -> Duration {
        Duration::from_secs_f32(value)
    }

    #[test]
    fn test_nothing_due_before_time() {
        let mut queue = DeferredQueue::new();
        queue.schedule(secs(1.0), "a");

        assert!(queue.drain_due(secs(0.5)).is_empty());
        assert_eq!(queue.len(), 1);
    }

    #[test]
    fn test_due_order_with_stable_ties() {
        let mut queue = DeferredQueue::new();
        queue.schedule(secs(2.0), "late");
        queue.schedule(secs(1.0), "first");
        queue.schedule(secs(1.0), "second");
        queue.schedule(secs(5.0), "future");

        let due = queue.drain_due(secs(2.0));
        assert_eq!(due, vec!["first", "second", "late"]);
        assert_eq!(queue.len(), 1);
        assert_eq!(queue.drain_due(secs(5.0)), vec!["future"]);
    }

    #[test]
    fn test_due_exactly_now_is_released() {
        let mut queue = DeferredQueue::new();
        queue.schedule(secs(1.0), 7_u32);
        assert_eq!(queue.drain_due(secs(1.0)), vec![7]);
        assert!(queue.is_empty());
    }

    #[test]
    fn test_cancel_where() {
        let mut queue = DeferredQueue::new();
        queue.schedule(secs(1.0), 1_u32);
        queue.schedule(secs(1.0), 2_u32);
        queue.schedule(secs(1.0), 3_u32);

        let removed = queue.cancel_where(|task| *task % 2 == 1);
        assert_eq!(removed, 2);
        assert_eq!(queue.drain_due(secs(1.0)), vec![2]);
    }
}
