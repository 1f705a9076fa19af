use serde::Deserialize;
use tracing::debug;

use crate::foundation::error::{ReelError, ReelResult};

/// One image search result.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ImageHit {
    /// Direct URL of the image file.
    pub image_url: String,
    /// Photographer credit to carry onto the imported media item.
    pub photographer: String,
}

/// Stock image search collaborator.
pub trait ImageSearchProvider {
    /// Search for up to `count` images matching `query`, in relevance order.
    fn search(&self, query: &str, count: usize) -> ReelResult<Vec<ImageHit>>;
}

/// Client for the Pexels photo search REST API.
pub struct PexelsClient {
    api_key: String,
    base_url: String,
    http: reqwest::blocking::Client,
}

impl PexelsClient {
    /// Create a client against the public Pexels endpoint.
    pub fn new(api_key: impl Into<String>) -> Self {
        Self::with_base_url(api_key, "https://api.pexels.com/v1")
    }

    /// Create a client against a custom endpoint (tests, proxies).
    pub fn with_base_url(api_key: impl Into<String>, base_url: impl Into<String>) -> Self {
        Self {
            api_key: api_key.into(),
            base_url: base_url.into(),
            http: reqwest::blocking::Client::new(),
        }
    }
}

impl ImageSearchProvider for PexelsClient {
    fn search(&self, query: &str, count: usize) -> ReelResult<Vec<ImageHit>> {
        if query.trim().is_empty() {
            return Err(ReelError::validation("search query must be non-empty"));
        }
        if count == 0 {
            return Err(ReelError::validation("search count must be >= 1"));
        }
        if self.api_key.trim().is_empty() {
            return Err(ReelError::validation("image search requires an API key"));
        }

        let url = format!("{}/search", self.base_url);
        debug!(query, count, "image search request");
        let per_page = count.to_string();
        let response = self
            .http
            .get(&url)
            .header("Authorization", &self.api_key)
            .query(&[("query", query), ("per_page", per_page.as_str())])
            .send()
            .map_err(|e| ReelError::external("image search", None, e.to_string()))?;

        let status = response.status();
        let body = response
            .text()
            .map_err(|e| ReelError::external("image search", None, e.to_string()))?;
        if !status.is_success() {
            return Err(ReelError::external(
                "image search",
                Some(status.as_u16()),
                body.trim().to_string(),
            ));
        }

        let mut hits = parse_search_response(&body)?;
        hits.truncate(count);
        Ok(hits)
    }
}

#[derive(Debug, Deserialize)]
struct SearchResponse {
    photos: Vec<PhotoEntry>,
}

#[derive(Debug, Deserialize)]
struct PhotoEntry {
    photographer: String,
    src: PhotoSrc,
}

#[derive(Debug, Deserialize)]
struct PhotoSrc {
    large: String,
}

/// Parse a Pexels search response body into hits.
pub(crate) fn parse_search_response(body: &str) -> ReelResult<Vec<ImageHit>> {
    let parsed: SearchResponse = serde_json::from_str(body).map_err(|e| {
        ReelError::external(
            "image search",
            None,
            format!("unexpected response shape: {e}"),
        )
    })?;
    Ok(parsed
        .photos
        .into_iter()
        .map(|p| ImageHit {
            image_url: p.src.large,
            photographer: p.photographer,
        })
        .collect())
}

/// Download a file over HTTP into memory.
///
/// Non-success statuses surface as [`ReelError::ExternalService`] with the
/// HTTP status attached.
pub fn fetch_bytes(url: &str) -> ReelResult<Vec<u8>> {
    let response = reqwest::blocking::get(url)
        .map_err(|e| ReelError::external("image download", None, e.to_string()))?;
    let status = response.status();
    if !status.is_success() {
        return Err(ReelError::external(
            "image download",
            Some(status.as_u16()),
            format!("GET {url}"),
        ));
    }
    let bytes = response
        .bytes()
        .map_err(|e| ReelError::external("image download", None, e.to_string()))?;
    Ok(bytes.to_vec())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_pexels_response_shape() {
        let body = r#"{
            "page": 1,
            "per_page": 2,
            "photos": [
                {"id": 1, "photographer": "Ada", "src": {"large": "https://img/1.jpg", "tiny": "https://img/1s.jpg"}},
                {"id": 2, "photographer": "Grace", "src": {"large": "https://img/2.jpg"}}
            ]
        }"#;
        let hits = parse_search_response(body).unwrap();
        assert_eq!(
            hits,
            vec![
                ImageHit {
                    image_url: "https://img/1.jpg".into(),
                    photographer: "Ada".into()
                },
                ImageHit {
                    image_url: "https://img/2.jpg".into(),
                    photographer: "Grace".into()
                },
            ]
        );
    }

    #[test]
    fn malformed_body_is_an_external_error() {
        let err = parse_search_response("{\"photos\": [{}]}").unwrap_err();
        assert!(matches!(err, ReelError::ExternalService { .. }));
    }

    #[test]
    fn search_validates_inputs_without_network() {
        let client = PexelsClient::new("key");
        assert!(client.search("  ", 5).is_err());
        assert!(client.search("cats", 0).is_err());
        assert!(PexelsClient::new("").search("cats", 5).is_err());
    }
}
