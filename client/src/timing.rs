//! Reusable throttle/debounce primitives.
//!
//! Both are pure state machines over an injected `Instant` so the
//! "coalesce the last value within window W" contract is testable without
//! sleeping. The event loop that owns them decides when to poll; teardown
//! clears pending values instead of flushing them.

#[cfg(test)]
#[path = "timing_test.rs"]
mod timing_test;

use std::collections::HashMap;
use std::hash::Hash;
use std::time::{Duration, Instant};

/// Rate limiter: at most one admitted value per window, leading edge first.
///
/// Values arriving inside the window are coalesced into a single trailing
/// value that [`Throttle::poll_trailing`] releases once the window elapses.
#[derive(Clone, Debug)]
pub struct Throttle<T> {
    window: Duration,
    last_fired: Option<Instant>,
    trailing: Option<T>,
}

impl<T> Throttle<T> {
    /// A throttle admitting one value per `window`.
    #[must_use]
    pub fn new(window: Duration) -> Self {
        Self { window, last_fired: None, trailing: None }
    }

    /// Offer a value. Returns it back when the window is open; otherwise the
    /// value is retained as the trailing candidate and `None` is returned.
    pub fn admit(&mut self, value: T, now: Instant) -> Option<T> {
        match self.last_fired {
            Some(last) if now.duration_since(last) < self.window => {
                self.trailing = Some(value);
                None
            }
            _ => {
                self.last_fired = Some(now);
                self.trailing = None;
                Some(value)
            }
        }
    }

    /// Release the trailing value once the window has elapsed.
    pub fn poll_trailing(&mut self, now: Instant) -> Option<T> {
        let last = self.last_fired?;
        if now.duration_since(last) < self.window {
            return None;
        }
        let value = self.trailing.take()?;
        self.last_fired = Some(now);
        Some(value)
    }

    /// Drop any trailing value and forget the last fire time.
    pub fn reset(&mut self) {
        self.last_fired = None;
        self.trailing = None;
    }
}

/// Keyed single-shot debounce: each `push` re-arms the key's timer, and only
/// the last value pushed within the window survives to fire.
#[derive(Clone, Debug)]
pub struct DebounceMap<K, V> {
    window: Duration,
    slots: HashMap<K, Slot<V>>,
}

#[derive(Clone, Debug)]
struct Slot<V> {
    value: V,
    deadline: Instant,
}

impl<K: Eq + Hash + Clone, V> DebounceMap<K, V> {
    /// A debounce map firing each key `window` after its most recent push.
    #[must_use]
    pub fn new(window: Duration) -> Self {
        Self { window, slots: HashMap::new() }
    }

    /// Record `value` for `key`, restarting the key's quiescence window.
    pub fn push(&mut self, key: K, value: V, now: Instant) {
        self.slots.insert(key, Slot { value, deadline: now + self.window });
    }

    /// Remove and return every key whose window has elapsed.
    pub fn poll_due(&mut self, now: Instant) -> Vec<(K, V)> {
        let due: Vec<K> = self
            .slots
            .iter()
            .filter(|(_, slot)| slot.deadline <= now)
            .map(|(key, _)| key.clone())
            .collect();
        due.into_iter()
            .filter_map(|key| self.slots.remove(&key).map(|slot| (key, slot.value)))
            .collect()
    }

    /// Cancel one pending key, returning its value if it was armed.
    pub fn cancel(&mut self, key: &K) -> Option<V> {
        self.slots.remove(key).map(|slot| slot.value)
    }

    /// The earliest pending deadline, for event loops that sleep until it.
    #[must_use]
    pub fn next_deadline(&self) -> Option<Instant> {
        self.slots.values().map(|slot| slot.deadline).min()
    }

    /// Discard everything pending. Used on teardown: queued-but-unsent
    /// values are dropped, never flushed.
    pub fn clear(&mut self) {
        self.slots.clear();
    }

    /// Whether any key is armed.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }
}
