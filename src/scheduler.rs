//! Single-threaded delayed execution.
//!
//! Deferred work is plain data handed to a [`DeferredTaskScheduler`]. The host
//! drains due tasks from a [`TimerQueue`] on the same thread that delivers touch
//! events, so no two handlers ever run at once.

use std::collections::BTreeMap;

/// Identifies one scheduled task for cancellation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct TaskHandle {
    due: u64,
    seq: u64,
}

impl TaskHandle {
    pub fn due(&self) -> u64 {
        self.due
    }
}

pub trait DeferredTaskScheduler<T> {
    /// Runs `task` once `delay_ms` has elapsed. Equal delays keep submission order.
    fn schedule(&mut self, task: T, delay_ms: u64) -> TaskHandle;

    /// Drops a pending task. Unknown or already fired handles are ignored.
    fn cancel(&mut self, handle: TaskHandle);
}

/// Timer queue on a caller-driven millisecond clock.
#[derive(Debug)]
pub struct TimerQueue<T> {
    now: u64,
    next_seq: u64,
    pending: BTreeMap<TaskHandle, T>,
}

impl<T> Default for TimerQueue<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> TimerQueue<T> {
    pub fn new() -> Self {
        Self {
            now: 0,
            next_seq: 0,
            pending: BTreeMap::new(),
        }
    }

    pub fn now(&self) -> u64 {
        self.now
    }

    /// Moves the clock forward. The clock never goes backwards.
    pub fn set_now(&mut self, now: u64) {
        self.now = self.now.max(now);
    }

    pub fn len(&self) -> usize {
        self.pending.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pending.is_empty()
    }

    pub fn next_deadline(&self) -> Option<u64> {
        self.pending.keys().next().map(TaskHandle::due)
    }

    /// Removes the earliest task due at or before `limit` and moves the clock to
    /// its due time, so anything it schedules is relative to when it fired.
    pub fn pop_due(&mut self, limit: u64) -> Option<T> {
        let handle = *self.pending.keys().next()?;
        if handle.due > limit {
            return None;
        }
        self.set_now(handle.due);
        self.pending.remove(&handle)
    }
}

impl<T> DeferredTaskScheduler<T> for TimerQueue<T> {
    fn schedule(&mut self, task: T, delay_ms: u64) -> TaskHandle {
        let handle = TaskHandle {
            due: self.now.saturating_add(delay_ms),
            seq: self.next_seq,
        };
        self.next_seq += 1;
        self.pending.insert(handle, task);
        handle
    }

    fn cancel(&mut self, handle: TaskHandle) {
        self.pending.remove(&handle);
    }
}
