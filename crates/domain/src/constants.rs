//! Application constants
//!
//! Centralized location for all domain-level constants used throughout the
//! forwarding engine.

// Re-entrancy guard flag lifetimes (seconds)
pub const LOCK_TTL_SECS: u64 = 30;
pub const PROCESSING_TTL_SECS: u64 = 120;
pub const COOLDOWN_TTL_SECS: u64 = 300;

// Outbound HTTP timeouts (seconds)
pub const CREATE_TIMEOUT_SECS: u64 = 30;
pub const MEDIA_DOWNLOAD_TIMEOUT_SECS: u64 = 30;
pub const MEDIA_UPLOAD_TIMEOUT_SECS: u64 = 60;
pub const MEDIA_BIND_TIMEOUT_SECS: u64 = 30;

// WordPress REST API layout
pub const API_ROOT: &str = "wp-json/wp/v2";
pub const DEFAULT_POST_TYPE: &str = "post";
pub const POSTS_ROUTE: &str = "posts";
pub const MEDIA_ROUTE: &str = "media";

// Taxonomy names with dedicated REST fields on the destination
pub const CATEGORY_TAXONOMY: &str = "category";
pub const TAG_TAXONOMY: &str = "post_tag";
pub const CUSTOM_TAG_TAXONOMY: &str = "custom-tag";

// Meta key holding the selected portal keys on a content item
pub const PORTAL_SELECTION_META_KEY: &str = "product";

// Source-platform meta keys that must never reach a destination
pub const RESERVED_META_KEYS: [&str; 6] = [
    "_edit_lock",
    "_edit_last",
    "_wp_old_slug",
    "_wp_old_date",
    PORTAL_SELECTION_META_KEY,
    "_thumbnail_id",
];

// Extension field-group definition prefixes, skipped during meta flattening
pub const FIELD_DEFINITION_PREFIXES: [&str; 2] = ["field_", "_field_"];

// Filename used when a media URL path has no extension-bearing segment
pub const DEFAULT_MEDIA_FILENAME: &str = "featured-image.jpg";
