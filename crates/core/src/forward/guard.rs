//! Re-entrancy guard for forward attempts
//!
//! Best-effort mutual exclusion backed by three expiring flags per
//! content-item id: a short-lived lock (the authoritative exclusivity
//! flag), a longer processing flag, and a cool-down flag set after a
//! successful attempt. Acquisition goes through the flag store's atomic
//! `set_if_absent`, so two triggers racing for the same item cannot both
//! acquire the lock. TTL expiry is the crash-safety path: if `release`
//! is never reached, the flags age out on their own.

use std::sync::Arc;
use std::time::Duration;

use crosspost_domain::constants::{COOLDOWN_TTL_SECS, LOCK_TTL_SECS, PROCESSING_TTL_SECS};
use tracing::debug;

use super::ports::FlagStore;

/// Flag lifetimes used by the guard.
#[derive(Debug, Clone, Copy)]
pub struct GuardTtls {
    /// Authoritative exclusivity flag.
    pub lock: Duration,
    /// Attempt-in-progress flag, outlives the lock.
    pub processing: Duration,
    /// Suppression window after a successful attempt.
    pub cooldown: Duration,
}

impl Default for GuardTtls {
    fn default() -> Self {
        Self {
            lock: Duration::from_secs(LOCK_TTL_SECS),
            processing: Duration::from_secs(PROCESSING_TTL_SECS),
            cooldown: Duration::from_secs(COOLDOWN_TTL_SECS),
        }
    }
}

/// Result of an acquisition attempt.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LockState {
    Acquired,
    Rejected,
}

/// Guards one forward attempt per content-item id.
pub struct AttemptGuard {
    flags: Arc<dyn FlagStore>,
    ttls: GuardTtls,
}

impl AttemptGuard {
    pub fn new(flags: Arc<dyn FlagStore>) -> Self {
        Self::with_ttls(flags, GuardTtls::default())
    }

    /// Custom lifetimes, used by tests that exercise expiry.
    pub fn with_ttls(flags: Arc<dyn FlagStore>, ttls: GuardTtls) -> Self {
        Self { flags, ttls }
    }

    /// Try to start a forward attempt for `item_id`.
    ///
    /// Rejected when another attempt is in progress or the item was
    /// forwarded within the cool-down window. On success both the lock
    /// and the processing flag are set before this returns.
    pub fn try_enter(&self, item_id: u64) -> LockState {
        if self.flags.is_set(&processing_key(item_id)) {
            debug!(item_id, "attempt already processing; rejecting trigger");
            return LockState::Rejected;
        }

        if self.flags.is_set(&cooldown_key(item_id)) {
            debug!(item_id, "cool-down window active; rejecting trigger");
            return LockState::Rejected;
        }

        if !self.flags.set_if_absent(&lock_key(item_id), self.ttls.lock) {
            debug!(item_id, "lock held by concurrent attempt; rejecting trigger");
            return LockState::Rejected;
        }

        self.flags.set(&processing_key(item_id), self.ttls.processing);
        LockState::Acquired
    }

    /// Clear the lock and processing flags. Called on every exit path,
    /// including early returns.
    pub fn release(&self, item_id: u64) {
        self.flags.clear(&lock_key(item_id));
        self.flags.clear(&processing_key(item_id));
    }

    /// Start the cool-down suppression window after a successful attempt.
    pub fn mark_recently_forwarded(&self, item_id: u64) {
        self.flags.set(&cooldown_key(item_id), self.ttls.cooldown);
    }

    /// True while the cool-down window is active. Exposed for tests and
    /// observability.
    pub fn is_in_cooldown(&self, item_id: u64) -> bool {
        self.flags.is_set(&cooldown_key(item_id))
    }
}

fn lock_key(item_id: u64) -> String {
    format!("forwarding:lock:{item_id}")
}

fn processing_key(item_id: u64) -> String {
    format!("forwarding:processing:{item_id}")
}

fn cooldown_key(item_id: u64) -> String {
    format!("forwarding:forwarded:{item_id}")
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use parking_lot::Mutex;

    use super::*;

    /// Flag store without expiry; TTLs are irrelevant to these tests.
    #[derive(Default)]
    struct MemoryFlags {
        set: Mutex<HashMap<String, bool>>,
    }

    impl FlagStore for MemoryFlags {
        fn set_if_absent(&self, key: &str, _ttl: Duration) -> bool {
            let mut set = self.set.lock();
            if set.contains_key(key) {
                return false;
            }
            set.insert(key.to_string(), true);
            true
        }

        fn set(&self, key: &str, _ttl: Duration) {
            self.set.lock().insert(key.to_string(), true);
        }

        fn is_set(&self, key: &str) -> bool {
            self.set.lock().contains_key(key)
        }

        fn clear(&self, key: &str) {
            self.set.lock().remove(key);
        }
    }

    fn guard() -> AttemptGuard {
        AttemptGuard::new(Arc::new(MemoryFlags::default()))
    }

    #[test]
    fn second_enter_is_rejected_while_lock_held() {
        let guard = guard();
        assert_eq!(guard.try_enter(42), LockState::Acquired);
        assert_eq!(guard.try_enter(42), LockState::Rejected);
    }

    #[test]
    fn release_makes_item_eligible_again() {
        let guard = guard();
        assert_eq!(guard.try_enter(42), LockState::Acquired);
        guard.release(42);
        assert_eq!(guard.try_enter(42), LockState::Acquired);
    }

    #[test]
    fn cooldown_rejects_after_release() {
        let guard = guard();
        assert_eq!(guard.try_enter(42), LockState::Acquired);
        guard.mark_recently_forwarded(42);
        guard.release(42);
        assert_eq!(guard.try_enter(42), LockState::Rejected);
        assert!(guard.is_in_cooldown(42));
    }

    #[test]
    fn distinct_items_do_not_contend() {
        let guard = guard();
        assert_eq!(guard.try_enter(1), LockState::Acquired);
        assert_eq!(guard.try_enter(2), LockState::Acquired);
    }
}
