//! Payload strategies for destination-bound request bodies
//!
//! Two competing constructions share the same base body. The primary
//! strategy maps structured taxonomy groups onto the destination's REST
//! fields using term slugs. The fallback strategy flattens everything
//! into plain tags, for destinations that lack the source's custom
//! taxonomies and would reject the structured form.

use crosspost_domain::constants::{CATEGORY_TAXONOMY, CUSTOM_TAG_TAXONOMY, TAG_TAXONOMY};
use crosspost_domain::{PostSnapshot, PostStatus};
use serde_json::{Map, Value};

/// Shared base: title, body, excerpt, and the configured status, plus
/// custom fields when there are any.
fn base_body(snapshot: &PostSnapshot, status: PostStatus) -> Map<String, Value> {
    let mut body = Map::new();
    body.insert("title".to_string(), Value::String(snapshot.title.clone()));
    body.insert("content".to_string(), Value::String(snapshot.content.clone()));
    body.insert("excerpt".to_string(), Value::String(snapshot.excerpt.clone()));
    body.insert("status".to_string(), Value::String(status.as_str().to_string()));

    if !snapshot.meta.is_empty() {
        body.insert("meta".to_string(), Value::Object(snapshot.meta.clone()));
    }

    body
}

fn slug_list(slugs: impl IntoIterator<Item = String>) -> Value {
    Value::Array(slugs.into_iter().map(Value::String).collect())
}

/// Primary strategy: structured taxonomy mapping by term slug.
///
/// The built-in category taxonomy maps to `categories`, the built-in tag
/// taxonomy and the custom tag taxonomy both merge into `tags`, and any
/// other taxonomy is emitted verbatim under its own name as a
/// best-effort (the destination may or may not recognize it).
pub fn primary_body(snapshot: &PostSnapshot, status: PostStatus) -> Map<String, Value> {
    let mut body = base_body(snapshot, status);

    for group in &snapshot.taxonomies {
        if group.terms.is_empty() {
            continue;
        }
        let slugs: Vec<String> = group.terms.iter().map(|t| t.slug.clone()).collect();

        match group.taxonomy.as_str() {
            CATEGORY_TAXONOMY => {
                body.insert("categories".to_string(), slug_list(slugs));
            }
            TAG_TAXONOMY | CUSTOM_TAG_TAXONOMY => merge_tags(&mut body, slugs),
            other => {
                body.insert(other.to_string(), slug_list(slugs));
            }
        }
    }

    body
}

/// Fallback strategy: ignore taxonomy structure entirely and send the
/// flattened name+slug union as plain tags.
pub fn fallback_body(snapshot: &PostSnapshot, status: PostStatus) -> Map<String, Value> {
    let mut body = base_body(snapshot, status);

    if !snapshot.fallback_tags.is_empty() {
        body.insert("tags".to_string(), slug_list(snapshot.fallback_tags.clone()));
    }

    body
}

/// Append to `tags`, never overwrite: both tag-like taxonomies may be
/// present on the same item.
fn merge_tags(body: &mut Map<String, Value>, slugs: Vec<String>) {
    match body.get_mut("tags") {
        Some(Value::Array(existing)) => {
            existing.extend(slugs.into_iter().map(Value::String));
        }
        _ => {
            body.insert("tags".to_string(), slug_list(slugs));
        }
    }
}
