//! Single-flight guard
//!
//! At most one in-flight operation per key. Acquiring hands out a guard;
//! dropping the guard releases the key.

use std::collections::HashSet;
use std::hash::Hash;
use std::sync::{Mutex, PoisonError};

#[derive(Debug)]
pub struct SingleFlight<K> {
    in_flight: Mutex<HashSet<K>>,
}

impl<K: Hash + Eq + Clone> Default for SingleFlight<K> {
    fn default() -> Self {
        Self::new()
    }
}

impl<K: Hash + Eq + Clone> SingleFlight<K> {
    pub fn new() -> Self {
        Self {
            in_flight: Mutex::new(HashSet::new()),
        }
    }

    /// Claim `key`, or `None` if an operation for it is already running
    pub fn try_acquire(&self, key: K) -> Option<FlightGuard<'_, K>> {
        let mut in_flight = self.in_flight.lock().unwrap_or_else(PoisonError::into_inner);
        if !in_flight.insert(key.clone()) {
            return None;
        }
        Some(FlightGuard { owner: self, key })
    }

    pub fn is_in_flight(&self, key: &K) -> bool {
        self.in_flight
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .contains(key)
    }

    fn release(&self, key: &K) {
        self.in_flight
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .remove(key);
    }
}

/// Releases its key on drop
#[derive(Debug)]
pub struct FlightGuard<'a, K: Hash + Eq + Clone> {
    owner: &'a SingleFlight<K>,
    key: K,
}

impl<K: Hash + Eq + Clone> Drop for FlightGuard<'_, K> {
    fn drop(&mut self) {
        self.owner.release(&self.key);
    }
}
