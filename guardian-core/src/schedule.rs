//! Owned timer table for scripted scenarios.
//!
//! Every scenario machine owns exactly one [`Schedule`]. Timers are plain
//! entries in the table, so cancelling a scenario is a single
//! [`Schedule::cancel_all`] call and nothing can fire into a view that has
//! been reset or closed.
//!
//! The schedule never sleeps on its own. The owner drains it with
//! [`Schedule::pop_due`] from its event loop, handling one event at a time so
//! that a handler can schedule follow-up timers or cancel others before the
//! next event is delivered.

use std::time::Duration;

use tokio::time::Instant;

/// Largest accepted delay multiplier.
pub const MAX_TIME_SCALE: f64 = 1000.0;

/// Whether `scale` can be used as a delay multiplier.
pub fn is_valid_time_scale(scale: f64) -> bool {
    scale.is_finite() && scale > 0.0 && scale <= MAX_TIME_SCALE
}

/// Handle to a scheduled timer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TimerId(u64);

/// An event whose deadline has passed.
#[derive(Debug, Clone, PartialEq)]
pub struct Fired<E> {
    /// The instant the timer was due. Follow-up timers should be scheduled
    /// relative to this, not to the time the loop happened to wake up.
    pub at: Instant,
    /// The scheduled event.
    pub event: E,
}

#[derive(Debug)]
struct Entry<E> {
    id: TimerId,
    deadline: Instant,
    period: Option<Duration>,
    // Insertion order, used to break deadline ties.
    seq: u64,
    event: E,
}

/// A single-owner table of one-shot and repeating timers.
#[derive(Debug)]
pub struct Schedule<E> {
    entries: Vec<Entry<E>>,
    next_seq: u64,
    time_scale: f64,
}

impl<E: Clone> Schedule<E> {
    /// Create an empty schedule running at real speed.
    pub fn new() -> Self {
        Self::with_time_scale(1.0)
    }

    /// Create an empty schedule whose delays are multiplied by `scale`.
    ///
    /// Scales outside `(0, MAX_TIME_SCALE]` fall back to `1.0`.
    pub fn with_time_scale(scale: f64) -> Self {
        let time_scale = if is_valid_time_scale(scale) {
            scale
        } else {
            tracing::warn!(scale, "ignoring unusable time scale");
            1.0
        };
        Self {
            entries: Vec::new(),
            next_seq: 0,
            time_scale,
        }
    }

    /// The delay multiplier applied to every timer.
    pub fn time_scale(&self) -> f64 {
        self.time_scale
    }

    fn scaled(&self, delay: Duration) -> Duration {
        delay.mul_f64(self.time_scale)
    }

    fn push(&mut self, deadline: Instant, period: Option<Duration>, event: E) -> TimerId {
        let seq = self.next_seq;
        self.next_seq += 1;
        let id = TimerId(seq);
        self.entries.push(Entry {
            id,
            deadline,
            period,
            seq,
            event,
        });
        id
    }

    /// Schedule `event` to fire once, `delay` after `now`.
    pub fn after(&mut self, now: Instant, delay: Duration, event: E) -> TimerId {
        let deadline = now + self.scaled(delay);
        self.push(deadline, None, event)
    }

    /// Schedule `event` to fire every `period`, starting one period after `now`.
    pub fn every(&mut self, now: Instant, period: Duration, event: E) -> TimerId {
        let period = self.scaled(period).max(Duration::from_millis(1));
        self.push(now + period, Some(period), event)
    }

    /// Cancel one timer. Returns `false` if it already fired or was cancelled.
    pub fn cancel(&mut self, id: TimerId) -> bool {
        let before = self.entries.len();
        self.entries.retain(|e| e.id != id);
        self.entries.len() != before
    }

    /// Cancel every outstanding timer.
    ///
    /// Idempotent, and safe to call on an empty schedule.
    pub fn cancel_all(&mut self) {
        if !self.entries.is_empty() {
            tracing::trace!(cancelled = self.entries.len(), "schedule cleared");
        }
        self.entries.clear();
    }

    /// Whether `id` is still pending.
    pub fn is_pending(&self, id: TimerId) -> bool {
        self.entries.iter().any(|e| e.id == id)
    }

    /// Number of outstanding timers.
    pub fn pending(&self) -> usize {
        self.entries.len()
    }

    /// Whether nothing is scheduled.
    pub fn is_idle(&self) -> bool {
        self.entries.is_empty()
    }

    /// The earliest outstanding deadline, if any.
    pub fn next_deadline(&self) -> Option<Instant> {
        self.entries.iter().map(|e| e.deadline).min()
    }

    /// Remove and return the earliest event due at or before `now`.
    ///
    /// Repeating timers are re-armed one period after their previous
    /// deadline, so a late wake-up catches up tick by tick instead of
    /// coalescing.
    pub fn pop_due(&mut self, now: Instant) -> Option<Fired<E>> {
        let index = self
            .entries
            .iter()
            .enumerate()
            .filter(|(_, e)| e.deadline <= now)
            .min_by_key(|(_, e)| (e.deadline, e.seq))
            .map(|(i, _)| i)?;

        let at = self.entries[index].deadline;
        match self.entries[index].period {
            Some(period) => {
                let seq = self.next_seq;
                self.next_seq += 1;
                let entry = &mut self.entries[index];
                entry.deadline = at + period;
                entry.seq = seq;
                Some(Fired {
                    at,
                    event: entry.event.clone(),
                })
            }
            None => {
                let entry = self.entries.swap_remove(index);
                Some(Fired {
                    at,
                    event: entry.event,
                })
            }
        }
    }
}

impl<E: Clone> Default for Schedule<E> {
    fn default() -> Self {
        Self::new()
    }
}
