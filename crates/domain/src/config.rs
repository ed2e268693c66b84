//! Configuration structures for the forwarding engine
//!
//! These are the settings an administrator controls: the global
//! enable/disable switch, the status newly forwarded items are created
//! with, and the portal registry. They are loaded once per forward
//! attempt and never mutated while an attempt is running.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::types::Portal;

/// Status assigned to content items created on a destination portal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PostStatus {
    Publish,
    #[default]
    Draft,
}

impl PostStatus {
    /// Wire representation expected by the destination REST API.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Publish => "publish",
            Self::Draft => "draft",
        }
    }
}

/// Portal registry: stable product key to destination descriptor.
///
/// `BTreeMap` keeps iteration deterministic, which keeps log output and
/// tests stable.
pub type PortalRegistry = BTreeMap<String, Portal>;

/// Administrator-controlled forwarding settings.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ForwardingOptions {
    /// Global switch; when false every trigger is a silent no-op.
    #[serde(default)]
    pub enabled: bool,
    /// Status for items created on destinations.
    #[serde(default)]
    pub post_status: PostStatus,
    /// Configured destinations keyed by product key.
    #[serde(default)]
    pub portals: PortalRegistry,
}

impl ForwardingOptions {
    /// Look up a destination by its product key.
    pub fn portal(&self, key: &str) -> Option<&Portal> {
        self.portals.get(key)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn post_status_defaults_to_draft() {
        let options: ForwardingOptions = serde_json::from_str("{}").unwrap();
        assert_eq!(options.post_status, PostStatus::Draft);
        assert!(!options.enabled);
    }

    #[test]
    fn post_status_round_trips_lowercase() {
        let json = serde_json::to_string(&PostStatus::Publish).unwrap();
        assert_eq!(json, "\"publish\"");
        let parsed: PostStatus = serde_json::from_str("\"draft\"").unwrap();
        assert_eq!(parsed, PostStatus::Draft);
    }
}
