//! Session-owned scheduled tasks.
//!
//! Tasks are plain values fired by [`TimerWheel::pop_due`] when the session
//! clock passes their deadline. Nothing runs on its own; the owner polls.

use std::time::Duration;

/// Handle of a scheduled task.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TimerId(u64);

#[derive(Debug)]
struct Entry<T> {
    id: TimerId,
    due: Duration,
    task: T,
}

/// Deadline-ordered task list.
#[derive(Debug)]
pub struct TimerWheel<T> {
    entries: Vec<Entry<T>>,
    next_id: u64,
}

impl<T> TimerWheel<T> {
    /// Creates an empty wheel.
    pub fn new() -> Self {
        Self {
            entries: Vec::new(),
            next_id: 0,
        }
    }

    /// Schedules `task` to fire once the clock reaches `due`.
    pub fn schedule(&mut self, due: Duration, task: T) -> TimerId {
        let id = TimerId(self.next_id);
        self.next_id += 1;
        // Stable position: after every entry due at or before `due`.
        let idx = self.entries.partition_point(|e| e.due <= due);
        self.entries.insert(idx, Entry { id, due, task });
        id
    }

    /// Cancels a task. Returns `false` if it already fired or was cancelled.
    pub fn cancel(&mut self, id: TimerId) -> bool {
        let before = self.entries.len();
        self.entries.retain(|e| e.id != id);
        self.entries.len() != before
    }

    /// Cancels every task matching `pred` and returns how many were removed.
    pub fn cancel_where(&mut self, mut pred: impl FnMut(&T) -> bool) -> usize {
        let before = self.entries.len();
        self.entries.retain(|e| !pred(&e.task));
        before - self.entries.len()
    }

    /// Removes and returns every task due at or before `now`, in deadline order.
    pub fn pop_due(&mut self, now: Duration) -> Vec<T> {
        let split = self.entries.partition_point(|e| e.due <= now);
        self.entries.drain(..split).map(|e| e.task).collect()
    }

    /// Drops every pending task.
    pub fn clear(&mut self) {
        self.entries.clear();
    }

    /// Number of pending tasks.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns `true` if nothing is scheduled.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl<T> Default for TimerWheel<T> {
    fn default() -> Self {
        Self::new()
    }
}
