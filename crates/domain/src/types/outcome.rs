//! Per-attempt outcome types

use serde::{Deserialize, Serialize};

/// Result of one forward attempt across all selected portals.
///
/// Ephemeral: exists only for the duration of one attempt and decides
/// whether the cool-down flag is set.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ForwardOutcome {
    /// Portal keys that accepted the content item, in processing order.
    pub succeeded: Vec<String>,
    /// Portal keys that rejected or were unreachable.
    pub failed: Vec<String>,
}

impl ForwardOutcome {
    pub fn record_success(&mut self, key: &str) {
        self.succeeded.push(key.to_string());
    }

    pub fn record_failure(&mut self, key: &str) {
        self.failed.push(key.to_string());
    }

    /// True when at least one portal accepted the item.
    pub fn any_success(&self) -> bool {
        !self.succeeded.is_empty()
    }
}

/// Why a trigger was dropped without publishing anything.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SkipReason {
    /// Another attempt holds the lock, or the cool-down window is active.
    AlreadyHandled,
    /// Revision, autosave, or bulk-import save.
    TriggerNotApplicable,
    ForwardingDisabled,
    NoPortalsSelected,
    ContentNotFound,
}

/// What a trigger invocation did. Returned to the caller for
/// observability only; the engine never surfaces an error to the trigger.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum ForwardReport {
    Skipped(SkipReason),
    Completed(ForwardOutcome),
}

impl ForwardReport {
    /// Convenience accessor for tests and callers that only care about
    /// the completed outcome.
    pub fn outcome(&self) -> Option<&ForwardOutcome> {
        match self {
            Self::Completed(outcome) => Some(outcome),
            Self::Skipped(_) => None,
        }
    }
}
