//! One-shot timers on simulated time
//!
//! Timers fire in deadline order; timers sharing a deadline fire in the
//! order they were scheduled. Cancelling is idempotent.

use std::collections::{BTreeMap, HashMap};

use crate::core::types::SimMillis;

/// Handle returned by [`TimerQueue::schedule`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TimerId(u64);

#[derive(Debug, Clone)]
pub struct TimerQueue<T> {
    next_id: u64,
    pending: BTreeMap<(SimMillis, TimerId), T>,
    deadlines: HashMap<TimerId, SimMillis>,
}

impl<T> TimerQueue<T> {
    pub fn new() -> Self {
        Self {
            next_id: 0,
            pending: BTreeMap::new(),
            deadlines: HashMap::new(),
        }
    }

    /// Schedule `payload` to fire once `deadline` is reached
    pub fn schedule(&mut self, deadline: SimMillis, payload: T) -> TimerId {
        let id = TimerId(self.next_id);
        self.next_id += 1;
        self.pending.insert((deadline, id), payload);
        self.deadlines.insert(id, deadline);
        id
    }

    /// Cancel a timer. Returns false if it already fired or was cancelled.
    pub fn cancel(&mut self, id: TimerId) -> bool {
        match self.deadlines.remove(&id) {
            Some(deadline) => self.pending.remove(&(deadline, id)).is_some(),
            None => false,
        }
    }

    pub fn is_pending(&self, id: TimerId) -> bool {
        self.deadlines.contains_key(&id)
    }

    /// Remove and return the earliest timer whose deadline is <= `now`
    pub fn pop_due(&mut self, now: SimMillis) -> Option<(TimerId, T)> {
        let key = *self.pending.keys().next()?;
        if key.0 > now {
            return None;
        }
        let payload = self.pending.remove(&key)?;
        self.deadlines.remove(&key.1);
        Some((key.1, payload))
    }

    /// Drop every outstanding timer
    pub fn clear(&mut self) -> usize {
        let dropped = self.pending.len();
        self.pending.clear();
        self.deadlines.clear();
        dropped
    }

    pub fn len(&self) -> usize {
        self.pending.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pending.is_empty()
    }
}

impl<T> Default for TimerQueue<T> {
    fn default() -> Self {
        Self::new()
    }
}
