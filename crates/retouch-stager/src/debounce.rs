use std::collections::BTreeMap;
use std::time::{Duration, Instant};

/// Quiescence period used when none is configured.
pub const DEFAULT_DEBOUNCE_WINDOW: Duration = Duration::from_millis(1000);

struct Buffered<V> {
    value: V,
    deadline: Instant,
}

/// Keyed debouncer driven by an explicit clock.
///
/// Each key holds at most one buffered value. Pushing to a key replaces its
/// value and restarts its quiescence period; a key fires once the period
/// elapses with no further pushes. Keys are independent of each other.
///
/// The debouncer never reads the clock itself: callers pass `now`, which
/// keeps it deterministic under test and lets an async driver own the
/// timers.
pub struct Debouncer<K, V> {
    window: Duration,
    entries: BTreeMap<K, Buffered<V>>,
}

impl<K: Ord + Clone, V> Debouncer<K, V> {
    pub fn new(window: Duration) -> Self {
        Self {
            window,
            entries: BTreeMap::new(),
        }
    }

    pub fn window(&self) -> Duration {
        self.window
    }

    /// Buffer `value` under `key`. Returns `true` if an unfired value for
    /// the same key was superseded.
    pub fn push(&mut self, key: K, value: V, now: Instant) -> bool {
        let deadline = now + self.window;
        self.entries
            .insert(key, Buffered { value, deadline })
            .is_some()
    }

    /// Remove and return every entry whose quiescence period has elapsed,
    /// in deadline order (ties broken by key).
    pub fn poll(&mut self, now: Instant) -> Vec<(K, V)> {
        let mut due: Vec<(Instant, K)> = self
            .entries
            .iter()
            .filter(|(_, entry)| entry.deadline <= now)
            .map(|(key, entry)| (entry.deadline, key.clone()))
            .collect();
        due.sort();

        due.into_iter()
            .filter_map(|(_, key)| {
                self.entries
                    .remove(&key)
                    .map(|entry| (key, entry.value))
            })
            .collect()
    }

    /// Remove and return every buffered entry regardless of its deadline.
    pub fn flush(&mut self) -> Vec<(K, V)> {
        let mut all: Vec<(Instant, K, V)> = std::mem::take(&mut self.entries)
            .into_iter()
            .map(|(key, entry)| (entry.deadline, key, entry.value))
            .collect();
        all.sort_by(|a, b| (a.0, &a.1).cmp(&(b.0, &b.1)));
        all.into_iter().map(|(_, key, value)| (key, value)).collect()
    }

    /// Earliest pending deadline, if anything is buffered.
    pub fn next_deadline(&self) -> Option<Instant> {
        self.entries.values().map(|entry| entry.deadline).min()
    }

    /// Drop the buffered value for `key` without firing it.
    pub fn cancel(&mut self, key: &K) -> bool {
        self.entries.remove(key).is_some()
    }

    /// Drop every buffered value without firing. Returns how many were dropped.
    pub fn cancel_all(&mut self) -> usize {
        let dropped = self.entries.len();
        self.entries.clear();
        dropped
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
