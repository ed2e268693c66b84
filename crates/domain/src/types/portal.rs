//! Destination portal descriptor

use serde::{Deserialize, Serialize};
use url::Url;

use crate::constants::API_ROOT;

/// A remote application instance that can receive forwarded content.
///
/// Created and edited only through the external configuration
/// collaborator; immutable for the duration of a forward attempt.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Portal {
    /// Friendly display name shown in the authoring UI.
    pub name: String,
    /// Base URL of the destination site, e.g. `https://example.com`.
    pub url: Url,
    /// REST API user for Basic authentication.
    pub user: String,
    /// Static application password for Basic authentication.
    pub password: String,
}

impl Portal {
    /// Create endpoint for the given content type.
    ///
    /// The built-in `post` type lives under `/posts`; any other type gets
    /// its own route segment (the destination may or may not expose it).
    pub fn content_endpoint(&self, post_type: &str) -> String {
        let base = self.url.as_str().trim_end_matches('/');
        if post_type == crate::constants::DEFAULT_POST_TYPE {
            format!("{base}/{API_ROOT}/{}", crate::constants::POSTS_ROUTE)
        } else {
            format!("{base}/{API_ROOT}/{post_type}")
        }
    }

    /// Generic posts endpoint, used by the endpoint-compatibility fallback.
    pub fn posts_endpoint(&self) -> String {
        let base = self.url.as_str().trim_end_matches('/');
        format!("{base}/{API_ROOT}/{}", crate::constants::POSTS_ROUTE)
    }

    /// Media upload endpoint.
    pub fn media_endpoint(&self) -> String {
        let base = self.url.as_str().trim_end_matches('/');
        format!("{base}/{API_ROOT}/{}", crate::constants::MEDIA_ROUTE)
    }

    /// Detail endpoint for an already-created remote item.
    pub fn content_detail_endpoint(&self, post_type: &str, remote_id: u64) -> String {
        format!("{}/{remote_id}", self.content_endpoint(post_type))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn portal(url: &str) -> Portal {
        Portal {
            name: "Example Portal".to_string(),
            url: Url::parse(url).unwrap(),
            user: "1728".to_string(),
            password: "xxxx-xxxx-xxxx-xxxx".to_string(),
        }
    }

    #[test]
    fn default_type_uses_posts_route() {
        let p = portal("https://example.com");
        assert_eq!(p.content_endpoint("post"), "https://example.com/wp-json/wp/v2/posts");
    }

    #[test]
    fn custom_type_gets_own_route() {
        let p = portal("https://example.com/");
        assert_eq!(p.content_endpoint("recipe"), "https://example.com/wp-json/wp/v2/recipe");
    }

    #[test]
    fn detail_endpoint_appends_remote_id() {
        let p = portal("https://example.com");
        assert_eq!(
            p.content_detail_endpoint("post", 99),
            "https://example.com/wp-json/wp/v2/posts/99"
        );
        assert_eq!(
            p.content_detail_endpoint("recipe", 7),
            "https://example.com/wp-json/wp/v2/recipe/7"
        );
    }

    #[test]
    fn media_endpoint_trims_trailing_slash() {
        let p = portal("https://example.com/");
        assert_eq!(p.media_endpoint(), "https://example.com/wp-json/wp/v2/media");
    }
}
