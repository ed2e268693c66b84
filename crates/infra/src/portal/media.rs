//! Featured-media sub-protocol
//!
//! Three network steps, every one of them optional in the sense that a
//! failure stops the protocol without affecting the already-created
//! remote content item: download the source image, upload it to the
//! destination's media route as a single-part multipart body, then bind
//! it as the remote item's featured media with a `PUT` (plus one `POST`
//! alternate for destinations that reject `PUT` on that route).

use std::time::Duration;

use crosspost_domain::constants::{
    DEFAULT_MEDIA_FILENAME, MEDIA_BIND_TIMEOUT_SECS, MEDIA_DOWNLOAD_TIMEOUT_SECS,
    MEDIA_UPLOAD_TIMEOUT_SECS,
};
use crosspost_domain::{CrosspostError, Portal, Result};
use reqwest::multipart::{Form, Part};
use reqwest::Method;
use serde_json::{json, Value};
use tracing::{debug, warn};
use url::Url;

use crate::http::HttpClient;

/// Run the full attach protocol. Any error aborts the remaining steps;
/// the caller logs it and moves on.
pub(crate) async fn attach(
    http: &HttpClient,
    portal: &Portal,
    post_type: &str,
    remote_id: u64,
    media_url: &str,
) -> Result<()> {
    let (data, content_type) = download(http, media_url).await?;
    let filename = derive_filename(media_url);

    let media_id = upload(http, portal, data, content_type, &filename).await?;
    bind(http, portal, post_type, remote_id, media_id).await
}

/// Fetch the source image bytes plus their content type.
async fn download(http: &HttpClient, media_url: &str) -> Result<(Vec<u8>, Option<String>)> {
    let request = http
        .request(Method::GET, media_url)
        .timeout(Duration::from_secs(MEDIA_DOWNLOAD_TIMEOUT_SECS));
    let response = http.send(request).await?;
    let content_type = response
        .headers()
        .get(reqwest::header::CONTENT_TYPE)
        .and_then(|value| value.to_str().ok())
        .map(ToString::to_string);

    let data = response
        .bytes()
        .await
        .map_err(|err| CrosspostError::Network(format!("media download failed: {err}")))?;

    Ok((data.to_vec(), content_type))
}

/// Upload to the destination's media route; returns the new media id.
async fn upload(
    http: &HttpClient,
    portal: &Portal,
    data: Vec<u8>,
    content_type: Option<String>,
    filename: &str,
) -> Result<u64> {
    let mut part = Part::bytes(data).file_name(filename.to_string());
    if let Some(content_type) = content_type {
        part = part.mime_str(&content_type).map_err(|err| {
            CrosspostError::InvalidInput(format!("invalid media content type: {err}"))
        })?;
    }

    let form = Form::new().part("file", part);
    let request = http
        .request(Method::POST, portal.media_endpoint())
        .basic_auth(&portal.user, Some(&portal.password))
        .header(
            reqwest::header::CONTENT_DISPOSITION,
            format!("attachment; filename=\"{filename}\""),
        )
        .timeout(Duration::from_secs(MEDIA_UPLOAD_TIMEOUT_SECS))
        .multipart(form);

    let response = http.send(request).await?;
    let status = response.status();
    if !status.is_success() {
        return Err(CrosspostError::Portal {
            status: status.as_u16(),
            body: "media upload rejected".to_string(),
        });
    }

    let value: Value = response
        .json()
        .await
        .map_err(|err| CrosspostError::Network(format!("media upload response: {err}")))?;
    value
        .get("id")
        .and_then(Value::as_u64)
        .ok_or_else(|| CrosspostError::Internal("media upload response had no id".into()))
}

/// Point the remote item at the uploaded media. `PUT` first; one `POST`
/// alternate on rejection, nothing after that.
async fn bind(
    http: &HttpClient,
    portal: &Portal,
    post_type: &str,
    remote_id: u64,
    media_id: u64,
) -> Result<()> {
    let detail_url = portal.content_detail_endpoint(post_type, remote_id);
    let body = json!({ "featured_media": media_id });

    let request = http
        .request(Method::PUT, &detail_url)
        .basic_auth(&portal.user, Some(&portal.password))
        .timeout(Duration::from_secs(MEDIA_BIND_TIMEOUT_SECS))
        .json(&body);

    let rejected = match http.send(request).await {
        Ok(response) if response.status().is_success() => {
            debug!(remote_id, media_id, "featured media bound");
            return Ok(());
        }
        Ok(response) => Some(response.status()),
        Err(err) => {
            warn!(remote_id, error = %err, "featured media PUT failed; trying POST");
            None
        }
    };

    if let Some(status) = rejected {
        warn!(remote_id, %status, "featured media PUT rejected; trying POST");
    }

    let request = http
        .request(Method::POST, &detail_url)
        .basic_auth(&portal.user, Some(&portal.password))
        .timeout(Duration::from_secs(MEDIA_BIND_TIMEOUT_SECS))
        .json(&body);

    let response = http.send(request).await?;
    let status = response.status();
    if !status.is_success() {
        return Err(CrosspostError::Portal {
            status: status.as_u16(),
            body: "featured media bind rejected".to_string(),
        });
    }

    Ok(())
}

/// Last URL path segment when it carries an extension, otherwise the
/// stock filename.
fn derive_filename(media_url: &str) -> String {
    Url::parse(media_url)
        .ok()
        .and_then(|url| {
            url.path_segments()?
                .filter(|segment| !segment.is_empty())
                .next_back()
                .filter(|segment| segment.contains('.'))
                .map(ToString::to_string)
        })
        .unwrap_or_else(|| DEFAULT_MEDIA_FILENAME.to_string())
}

#[cfg(test)]
mod tests {
    use crosspost_domain::constants::CREATE_TIMEOUT_SECS;
    use serde_json::json;
    use wiremock::matchers::{method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    use super::*;

    fn portal(base: &str) -> Portal {
        Portal {
            name: "Test Portal".to_string(),
            url: Url::parse(base).unwrap(),
            user: "1728".to_string(),
            password: "xxxx-xxxx".to_string(),
        }
    }

    fn http() -> HttpClient {
        HttpClient::builder()
            .timeout(Duration::from_secs(CREATE_TIMEOUT_SECS))
            .build()
            .expect("http client")
    }

    async fn image_server() -> MockServer {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/img/full.jpg"))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_bytes(vec![0xFF, 0xD8, 0xFF])
                    .insert_header("content-type", "image/jpeg"),
            )
            .mount(&server)
            .await;
        server
    }

    #[test]
    fn filename_comes_from_last_path_segment() {
        assert_eq!(derive_filename("https://cdn.example.com/img/full.jpg"), "full.jpg");
    }

    #[test]
    fn filename_defaults_without_extension() {
        assert_eq!(derive_filename("https://cdn.example.com/img/full"), "featured-image.jpg");
        assert_eq!(derive_filename("https://cdn.example.com/"), "featured-image.jpg");
        assert_eq!(derive_filename("not a url"), "featured-image.jpg");
    }

    #[test]
    fn filename_ignores_query_string() {
        assert_eq!(
            derive_filename("https://cdn.example.com/img/full.png?size=large"),
            "full.png"
        );
    }

    #[tokio::test]
    async fn happy_path_uploads_then_binds_with_put() {
        let image = image_server().await;
        let target = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path("/wp-json/wp/v2/media"))
            .respond_with(ResponseTemplate::new(201).set_body_json(json!({"id": 9})))
            .expect(1)
            .mount(&target)
            .await;
        Mock::given(method("PUT"))
            .and(path("/wp-json/wp/v2/posts/55"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({"id": 55})))
            .expect(1)
            .mount(&target)
            .await;

        let url = format!("{}/img/full.jpg", image.uri());
        let result = attach(&http(), &portal(&target.uri()), "post", 55, &url).await;

        assert!(result.is_ok());
        // No POST alternate when PUT succeeds.
        let posts: Vec<_> = target
            .received_requests()
            .await
            .unwrap()
            .into_iter()
            .filter(|r| r.method.as_str() == "POST" && r.url.path().contains("/posts/"))
            .collect();
        assert!(posts.is_empty());
    }

    #[tokio::test]
    async fn rejected_put_triggers_exactly_one_post_alternate() {
        let image = image_server().await;
        let target = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path("/wp-json/wp/v2/media"))
            .respond_with(ResponseTemplate::new(201).set_body_json(json!({"id": 9})))
            .mount(&target)
            .await;
        Mock::given(method("PUT"))
            .and(path("/wp-json/wp/v2/posts/55"))
            .respond_with(ResponseTemplate::new(405))
            .expect(1)
            .mount(&target)
            .await;
        Mock::given(method("POST"))
            .and(path("/wp-json/wp/v2/posts/55"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({"id": 55})))
            .expect(1)
            .mount(&target)
            .await;

        let url = format!("{}/img/full.jpg", image.uri());
        let result = attach(&http(), &portal(&target.uri()), "post", 55, &url).await;

        assert!(result.is_ok());
    }

    #[tokio::test]
    async fn failed_upload_skips_binding() {
        let image = image_server().await;
        let target = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path("/wp-json/wp/v2/media"))
            .respond_with(ResponseTemplate::new(401))
            .expect(1)
            .mount(&target)
            .await;

        let url = format!("{}/img/full.jpg", image.uri());
        let result = attach(&http(), &portal(&target.uri()), "post", 55, &url).await;

        assert!(result.is_err());
        let binds: Vec<_> = target
            .received_requests()
            .await
            .unwrap()
            .into_iter()
            .filter(|r| r.url.path().contains("/posts/"))
            .collect();
        assert!(binds.is_empty());
    }

    #[tokio::test]
    async fn unreachable_media_url_touches_no_portal_route() {
        let target = MockServer::start().await;
        // No mocks mounted: any request to the portal would 404 and be
        // visible in received_requests.

        let result =
            attach(&http(), &portal(&target.uri()), "post", 55, "http://127.0.0.1:9/img.jpg")
                .await;

        assert!(result.is_err());
        assert!(target.received_requests().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn custom_type_binds_against_type_route() {
        let image = image_server().await;
        let target = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path("/wp-json/wp/v2/media"))
            .respond_with(ResponseTemplate::new(201).set_body_json(json!({"id": 9})))
            .mount(&target)
            .await;
        Mock::given(method("PUT"))
            .and(path("/wp-json/wp/v2/recipe/55"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({"id": 55})))
            .expect(1)
            .mount(&target)
            .await;

        let url = format!("{}/img/full.jpg", image.uri());
        let result = attach(&http(), &portal(&target.uri()), "recipe", 55, &url).await;

        assert!(result.is_ok());
    }
}
