//! Content item types: the raw stored record and the immutable snapshot
//! the forward engine works from.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// One value within a taxonomy.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TermRef {
    pub id: u64,
    pub name: String,
    pub slug: String,
}

/// Terms of one taxonomy attached to a content item.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TaxonomyTerms {
    pub taxonomy: String,
    pub terms: Vec<TermRef>,
}

/// Raw stored content record, as returned by the content-storage
/// collaborator.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PostContent {
    pub id: u64,
    pub post_type: String,
    pub title: String,
    pub content: String,
    pub excerpt: String,
}

/// Immutable, fully resolved view of a content item, built once per
/// forward attempt and never mutated afterwards.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PostSnapshot {
    pub id: u64,
    pub post_type: String,
    pub title: String,
    pub content: String,
    pub excerpt: String,
    /// Non-empty taxonomy groups, in enumeration order.
    pub taxonomies: Vec<TaxonomyTerms>,
    /// Deduplicated union of every term's name and slug, in first-seen
    /// order. Destinations may not interpret display names as tag
    /// identifiers; the widening is deliberate to maximize matching odds.
    pub fallback_tags: Vec<String>,
    /// Custom fields with reserved keys stripped and extension fields
    /// merged in (extension values win on key collision).
    pub meta: Map<String, Value>,
    /// Full-resolution featured media URL, if the item has one.
    pub featured_image_url: Option<String>,
}

/// Context accompanying a save trigger, used to filter out saves that
/// must never start a forward attempt.
#[derive(Debug, Clone, Copy, Default)]
pub struct SaveContext {
    pub is_revision: bool,
    pub is_autosave: bool,
    /// True while a bulk import is writing items.
    pub importing: bool,
}

impl SaveContext {
    /// True when this save is eligible to trigger a forward attempt.
    pub fn is_forwardable(&self) -> bool {
        !self.is_revision && !self.is_autosave && !self.importing
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_save_context_is_forwardable() {
        assert!(SaveContext::default().is_forwardable());
    }

    #[test]
    fn revision_autosave_and_import_are_filtered() {
        assert!(!SaveContext { is_revision: true, ..Default::default() }.is_forwardable());
        assert!(!SaveContext { is_autosave: true, ..Default::default() }.is_forwardable());
        assert!(!SaveContext { importing: true, ..Default::default() }.is_forwardable());
    }
}
