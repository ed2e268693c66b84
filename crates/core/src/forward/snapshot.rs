//! Content snapshot builder
//!
//! Assembles the immutable view of a content item that payload
//! construction works from: full taxonomy term data, the flattened
//! fallback tag list, cleaned-up custom fields with extension values
//! merged in, and the optional featured media URL.

use std::collections::HashSet;
use std::sync::Arc;

use crosspost_domain::constants::{FIELD_DEFINITION_PREFIXES, RESERVED_META_KEYS};
use crosspost_domain::{CrosspostError, PostSnapshot, Result, TaxonomyTerms};
use serde_json::{Map, Value};
use tracing::debug;

use super::ports::ContentRepository;

/// Builds one [`PostSnapshot`] per forward attempt.
pub struct SnapshotBuilder {
    content: Arc<dyn ContentRepository>,
}

impl SnapshotBuilder {
    pub fn new(content: Arc<dyn ContentRepository>) -> Self {
        Self { content }
    }

    /// Resolve the content item into a snapshot.
    ///
    /// Fails with `NotFound` when no content item exists for `item_id`;
    /// every other lookup degrades softly (missing taxonomies, media, or
    /// extension fields simply leave their slot empty).
    pub async fn build(&self, item_id: u64) -> Result<PostSnapshot> {
        let post = self
            .content
            .post(item_id)
            .await?
            .ok_or_else(|| CrosspostError::NotFound(format!("content item {item_id}")))?;

        let mut taxonomies = Vec::new();
        let mut fallback_tags = Vec::new();
        let mut seen_tags = HashSet::new();

        for taxonomy in self.content.taxonomies_for_type(&post.post_type).await? {
            let terms = self.content.terms(item_id, &taxonomy).await?;
            if terms.is_empty() {
                continue;
            }

            for term in &terms {
                // Name and slug both go into the fallback pool to
                // maximize matching odds on the destination.
                for tag in [&term.name, &term.slug] {
                    if !tag.is_empty() && seen_tags.insert(tag.clone()) {
                        fallback_tags.push(tag.clone());
                    }
                }
            }

            taxonomies.push(TaxonomyTerms { taxonomy, terms });
        }

        let featured_image_url = self.content.featured_image_url(item_id).await?;
        let meta = self.build_meta(item_id).await?;

        debug!(
            item_id,
            taxonomy_groups = taxonomies.len(),
            fallback_tags = fallback_tags.len(),
            meta_fields = meta.len(),
            has_featured_image = featured_image_url.is_some(),
            "built content snapshot"
        );

        Ok(PostSnapshot {
            id: post.id,
            post_type: post.post_type,
            title: post.title,
            content: post.content,
            excerpt: post.excerpt,
            taxonomies,
            fallback_tags,
            meta,
            featured_image_url,
        })
    }

    /// Clean up raw meta and merge the extension field-group on top.
    async fn build_meta(&self, item_id: u64) -> Result<Map<String, Value>> {
        let raw = self.content.meta(item_id).await?;
        let mut meta = Map::new();

        for (key, value) in raw {
            if RESERVED_META_KEYS.contains(&key.as_str()) {
                continue;
            }
            // Field-definition metadata would otherwise ride along next
            // to the actual field values merged below.
            if FIELD_DEFINITION_PREFIXES.iter().any(|prefix| key.starts_with(prefix)) {
                continue;
            }

            match value {
                Value::Array(items) if items.len() == 1 => {
                    let mut items = items;
                    meta.insert(key, items.remove(0));
                }
                value if !is_empty_value(&value) => {
                    meta.insert(key, value);
                }
                _ => {}
            }
        }

        // Extension fields win on key collision.
        for (key, value) in self.content.extension_fields(item_id).await? {
            meta.insert(key, value);
        }

        Ok(meta)
    }
}

/// Values the source platform treats as empty and never stores on the
/// wire: nulls, `false`, numeric zero, `""` and `"0"`, empty
/// collections. Single-element arrays are unwrapped before this check
/// and bypass it entirely.
fn is_empty_value(value: &Value) -> bool {
    match value {
        Value::Null => true,
        Value::Bool(b) => !b,
        Value::Number(n) => n.as_f64() == Some(0.0),
        Value::String(s) => s.is_empty() || s == "0",
        Value::Array(a) => a.is_empty(),
        Value::Object(o) => o.is_empty(),
    }
}
