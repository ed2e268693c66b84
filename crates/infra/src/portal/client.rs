//! WordPress REST client for content creation
//!
//! One client serves every configured portal; credentials travel with
//! the [`Portal`] descriptor on each call. The create call carries the
//! endpoint-compatibility fallback: destinations that do not expose a
//! dedicated REST route per content type answer 404, and the item is
//! re-sent once to the generic posts route with the type injected into
//! the body. No other retry happens here.

use std::time::Duration;

use async_trait::async_trait;
use crosspost_core::forward::ports::{PublishReceipt, RemotePublisher};
use crosspost_domain::constants::{CREATE_TIMEOUT_SECS, DEFAULT_POST_TYPE};
use crosspost_domain::{CrosspostError, Portal, Result};
use reqwest::{Method, Response, StatusCode};
use serde_json::{Map, Value};
use tracing::{debug, warn};

use crate::http::HttpClient;
use super::media;

/// Executes the wire protocol against destination portals.
pub struct WpPortalClient {
    http: HttpClient,
}

impl WpPortalClient {
    pub fn new() -> Result<Self> {
        let http = HttpClient::builder()
            .timeout(Duration::from_secs(CREATE_TIMEOUT_SECS))
            .user_agent(concat!("crosspost/", env!("CARGO_PKG_VERSION")))
            .build()?;
        Ok(Self { http })
    }

    /// Custom HTTP client, used by tests.
    pub fn with_http(http: HttpClient) -> Self {
        Self { http }
    }

    async fn post_json(
        &self,
        url: &str,
        portal: &Portal,
        body: &Map<String, Value>,
    ) -> Result<Response> {
        let request = self
            .http
            .request(Method::POST, url)
            .basic_auth(&portal.user, Some(&portal.password))
            .json(body);
        self.http.send(request).await
    }

    async fn parse_create_response(response: Response) -> Result<PublishReceipt> {
        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_else(|_| "Unknown error".to_string());
            return Err(CrosspostError::Portal {
                status: status.as_u16(),
                body: truncate_body(&body),
            });
        }

        // An unparseable or id-less 2xx body is tolerated; it only
        // disables featured-media attachment.
        let value: Value = response.json().await.unwrap_or(Value::Null);
        let remote_id = value.get("id").and_then(Value::as_u64);
        Ok(PublishReceipt { remote_id })
    }
}

#[async_trait]
impl RemotePublisher for WpPortalClient {
    async fn create_content(
        &self,
        portal: &Portal,
        post_type: &str,
        body: &Map<String, Value>,
    ) -> Result<PublishReceipt> {
        let endpoint = portal.content_endpoint(post_type);
        let response = self.post_json(&endpoint, portal, body).await?;

        if response.status() == StatusCode::NOT_FOUND && post_type != DEFAULT_POST_TYPE {
            // The destination has no dedicated route for this type; the
            // generic posts route with `type` injected is the one
            // permitted retry, regardless of what it answers.
            debug!(
                portal = %portal.name,
                post_type,
                "type route answered 404; retrying against generic posts route"
            );
            let mut body = body.clone();
            body.insert("type".to_string(), Value::String(post_type.to_string()));
            let response = self.post_json(&portal.posts_endpoint(), portal, &body).await?;
            return Self::parse_create_response(response).await;
        }

        Self::parse_create_response(response).await
    }

    async fn attach_featured_media(
        &self,
        portal: &Portal,
        post_type: &str,
        remote_id: u64,
        media_url: &str,
    ) {
        if let Err(err) = media::attach(&self.http, portal, post_type, remote_id, media_url).await
        {
            // Never fatal: the content item itself already landed.
            warn!(
                portal = %portal.name,
                remote_id,
                media_url,
                error = %err,
                "featured media attachment failed"
            );
        }
    }
}

fn truncate_body(body: &str) -> String {
    const MAX_LEN: usize = 256;
    if body.len() <= MAX_LEN {
        return body.to_string();
    }

    let mut truncated = body.chars().take(MAX_LEN.saturating_sub(3)).collect::<String>();
    truncated.push_str("...");
    truncated
}
