//! Deterministic timer queue
//!
//! Replaces interval/timeout callbacks with plain data: timers are entries
//! with a deadline and a payload, and the owner pulls whatever is due with
//! [`Scheduler::pop_due`]. Nothing fires unless the owner asks, and a
//! cancelled timer is simply gone, so there are no orphaned callbacks.

use std::collections::BTreeMap;
use std::time::Duration;

/// Smallest period accepted for repeating timers
const MIN_PERIOD: Duration = Duration::from_millis(1);

/// Handle to a scheduled timer
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct TimerId(u64);

/// A timer that came due
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Fired<T> {
    pub id: TimerId,
    /// The deadline the timer was due at (not the time it was polled)
    pub at: Duration,
    pub payload: T,
}

#[derive(Debug, Clone)]
struct Entry<T> {
    deadline: Duration,
    period: Option<Duration>,
    payload: T,
}

/// Timer queue keyed by [`TimerId`].
///
/// Timers due at the same instant fire in the order they were scheduled.
#[derive(Debug, Clone)]
pub struct Scheduler<T> {
    next_id: u64,
    timers: BTreeMap<TimerId, Entry<T>>,
}

impl<T> Default for Scheduler<T> {
    fn default() -> Self {
        Self {
            next_id: 0,
            timers: BTreeMap::new(),
        }
    }
}

impl<T: Clone> Scheduler<T> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Fire `payload` once, `delay` after `now`
    pub fn schedule_once(&mut self, now: Duration, delay: Duration, payload: T) -> TimerId {
        self.insert(now + delay, None, payload)
    }

    /// Fire `payload` every `period`, starting one period after `now`
    pub fn schedule_every(&mut self, now: Duration, period: Duration, payload: T) -> TimerId {
        let period = period.max(MIN_PERIOD);
        self.insert(now + period, Some(period), payload)
    }

    fn insert(&mut self, deadline: Duration, period: Option<Duration>, payload: T) -> TimerId {
        let id = TimerId(self.next_id);
        self.next_id += 1;
        self.timers.insert(
            id,
            Entry {
                deadline,
                period,
                payload,
            },
        );
        id
    }

    /// Cancel a timer. Returns false if it already fired or never existed.
    pub fn cancel(&mut self, id: TimerId) -> bool {
        self.timers.remove(&id).is_some()
    }

    /// Drop every pending timer
    pub fn clear(&mut self) {
        self.timers.clear();
    }

    /// Whether the timer is still pending
    pub fn is_pending(&self, id: TimerId) -> bool {
        self.timers.contains_key(&id)
    }

    /// Number of pending timers
    pub fn len(&self) -> usize {
        self.timers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.timers.is_empty()
    }

    /// Earliest pending deadline
    pub fn next_deadline(&self) -> Option<Duration> {
        self.timers.values().map(|e| e.deadline).min()
    }

    /// Take the earliest timer due at or before `now`.
    ///
    /// Repeating timers are re-armed one period after their deadline, so a
    /// caller that jumps far ahead sees every missed period in turn.
    pub fn pop_due(&mut self, now: Duration) -> Option<Fired<T>> {
        let (&id, _) = self
            .timers
            .iter()
            .filter(|(_, e)| e.deadline <= now)
            .min_by_key(|(id, e)| (e.deadline, **id))?;

        let entry = self.timers.get_mut(&id)?;
        let at = entry.deadline;
        match entry.period {
            Some(period) => {
                entry.deadline = at + period;
                let payload = entry.payload.clone();
                Some(Fired { id, at, payload })
            }
            None => {
                let entry = self.timers.remove(&id)?;
                Some(Fired {
                    id,
                    at,
                    payload: entry.payload,
                })
            }
        }
    }
}
