//! In-memory expiring flag store
//!
//! Keyed deadlines behind a single mutex. `set_if_absent` checks and
//! inserts under one lock acquisition, which is what makes the guard's
//! acquisition atomic within a process. Expired entries are treated as
//! absent and lazily evicted on the next write touching their key.

use std::collections::HashMap;
use std::time::{Duration, Instant};

use crosspost_core::FlagStore;
use parking_lot::Mutex;

/// Process-local [`FlagStore`] implementation.
#[derive(Default)]
pub struct InMemoryFlagStore {
    deadlines: Mutex<HashMap<String, Instant>>,
}

impl InMemoryFlagStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl FlagStore for InMemoryFlagStore {
    fn set_if_absent(&self, key: &str, ttl: Duration) -> bool {
        let now = Instant::now();
        let mut deadlines = self.deadlines.lock();

        if let Some(deadline) = deadlines.get(key) {
            if *deadline > now {
                return false;
            }
        }

        deadlines.insert(key.to_string(), now + ttl);
        true
    }

    fn set(&self, key: &str, ttl: Duration) {
        self.deadlines.lock().insert(key.to_string(), Instant::now() + ttl);
    }

    fn is_set(&self, key: &str) -> bool {
        let now = Instant::now();
        self.deadlines.lock().get(key).is_some_and(|deadline| *deadline > now)
    }

    fn clear(&self, key: &str) {
        self.deadlines.lock().remove(key);
    }
}
