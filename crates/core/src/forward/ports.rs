//! Port interfaces for the forward engine

use std::time::Duration;

use async_trait::async_trait;
use crosspost_domain::{ForwardingOptions, Portal, PostContent, Result, TermRef};
use serde_json::{Map, Value};

/// Read-only access to the content-storage collaborator.
///
/// The storage layer itself is out of scope; the engine only consumes
/// this narrow view of it.
#[async_trait]
pub trait ContentRepository: Send + Sync {
    /// Fetch the stored content record, or `None` if no item exists.
    async fn post(&self, item_id: u64) -> Result<Option<PostContent>>;

    /// Names of every taxonomy applicable to the given content type.
    async fn taxonomies_for_type(&self, post_type: &str) -> Result<Vec<String>>;

    /// Terms of one taxonomy attached to the item, with full detail.
    async fn terms(&self, item_id: u64, taxonomy: &str) -> Result<Vec<TermRef>>;

    /// Full-resolution featured media URL, if an attachment exists.
    async fn featured_image_url(&self, item_id: u64) -> Result<Option<String>>;

    /// All raw custom fields for the item, values as stored (possibly
    /// array-wrapped).
    async fn meta(&self, item_id: u64) -> Result<Map<String, Value>>;

    /// Values of the optional extension field-group, or an empty map if
    /// the extension mechanism is not present.
    async fn extension_fields(&self, item_id: u64) -> Result<Map<String, Value>>;

    /// Portal keys the editor selected for this item, in selection order.
    async fn selected_portals(&self, item_id: u64) -> Result<Vec<String>>;
}

/// Keyed expiring flags backing the re-entrancy guard.
///
/// `set_if_absent` must be atomic: two concurrent callers for the same
/// key must not both observe success.
pub trait FlagStore: Send + Sync {
    /// Atomically set the flag unless it is already set and unexpired.
    /// Returns true when this call set the flag.
    fn set_if_absent(&self, key: &str, ttl: Duration) -> bool;

    /// Set or refresh the flag unconditionally.
    fn set(&self, key: &str, ttl: Duration);

    /// True when the flag is set and unexpired.
    fn is_set(&self, key: &str) -> bool;

    /// Clear the flag, expired or not.
    fn clear(&self, key: &str);
}

/// Receipt of a successfully created remote content item.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PublishReceipt {
    /// Remote item id parsed from the response. A missing id is
    /// tolerated; it only disables featured-media attachment.
    pub remote_id: Option<u64>,
}

/// Executes the outbound wire protocol against one destination portal.
#[async_trait]
pub trait RemotePublisher: Send + Sync {
    /// Create a content item on the portal. The implementation owns the
    /// endpoint-compatibility fallback for custom content types; the
    /// caller never retries beyond switching payload strategy.
    async fn create_content(
        &self,
        portal: &Portal,
        post_type: &str,
        body: &Map<String, Value>,
    ) -> Result<PublishReceipt>;

    /// Upload the media behind `media_url` and bind it as the remote
    /// item's featured media. Fire-and-forget: failures are logged by
    /// the implementation and never propagated.
    async fn attach_featured_media(
        &self,
        portal: &Portal,
        post_type: &str,
        remote_id: u64,
        media_url: &str,
    );
}

/// Supplies the administrator-controlled settings, read once per attempt.
pub trait OptionsProvider: Send + Sync {
    fn forwarding_options(&self) -> Result<ForwardingOptions>;
}
