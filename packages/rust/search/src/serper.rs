//! Serper (google.serper.dev) search client.

use std::time::Duration;

use reqwest::Client;
use serde::{Deserialize, Serialize};
use tracing::{debug, instrument};

use articlecast_shared::{ArticlecastError, Result, SearchConfig, truncate_body};

use crate::SearchProvider;

const USER_AGENT: &str = concat!("Articlecast/", env!("CARGO_PKG_VERSION"));

// ---------------------------------------------------------------------------
// Wire types
// ---------------------------------------------------------------------------

/// One search response. Only the organic list is consumed.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SearchResults {
    #[serde(default)]
    pub organic: Option<Vec<OrganicResult>>,
}

impl SearchResults {
    /// Every `link` present in the organic list, in result order.
    pub fn links(&self) -> impl Iterator<Item = &str> {
        self.organic
            .iter()
            .flatten()
            .filter_map(|r| r.link.as_deref())
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct OrganicResult {
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub link: Option<String>,
    #[serde(default)]
    pub snippet: Option<String>,
}

#[derive(Debug, Serialize)]
struct SearchRequest<'a> {
    q: &'a str,
}

// ---------------------------------------------------------------------------
// Client
// ---------------------------------------------------------------------------

pub struct SerperClient {
    client: Client,
    endpoint: String,
    api_key: String,
}

impl std::fmt::Debug for SerperClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SerperClient")
            .field("endpoint", &self.endpoint)
            .field("api_key", &"<redacted>")
            .finish()
    }
}

impl SerperClient {
    pub fn new(config: &SearchConfig, api_key: impl Into<String>) -> Result<Self> {
        let client = Client::builder()
            .user_agent(USER_AGENT)
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(|e| ArticlecastError::Search(format!("failed to build HTTP client: {e}")))?;

        Ok(Self {
            client,
            endpoint: config.endpoint.clone(),
            api_key: api_key.into(),
        })
    }
}

#[async_trait::async_trait]
impl SearchProvider for SerperClient {
    #[instrument(skip_all, fields(keyword = %keyword))]
    async fn search(&self, keyword: &str) -> Result<SearchResults> {
        let resp = self
            .client
            .post(&self.endpoint)
            .header("X-API-KEY", &self.api_key)
            .json(&SearchRequest { q: keyword })
            .send()
            .await
            .map_err(|e| ArticlecastError::Search(format!("{}: {e}", self.endpoint)))?;

        let status = resp.status();
        if !status.is_success() {
            let body = resp.text().await.unwrap_or_default();
            return Err(ArticlecastError::Search(format!(
                "HTTP {status} for keyword {keyword:?}: {}",
                truncate_body(&body, 200)
            )));
        }

        let results: SearchResults = resp
            .json()
            .await
            .map_err(|e| ArticlecastError::Search(format!("invalid search response: {e}")))?;

        debug!(
            organic = results.organic.as_ref().map_or(0, Vec::len),
            "search results received"
        );
        Ok(results)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use wiremock::matchers::{body_json, header, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn client_for(server: &MockServer) -> SerperClient {
        let config = SearchConfig {
            endpoint: format!("{}/search", server.uri()),
            ..SearchConfig::default()
        };
        SerperClient::new(&config, "test-key").unwrap()
    }

    #[tokio::test]
    async fn search_sends_key_and_query() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/search"))
            .and(header("X-API-KEY", "test-key"))
            .and(body_json(serde_json::json!({ "q": "rust" })))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "searchParameters": { "q": "rust" },
                "organic": [
                    { "title": "Rust", "link": "https://en.wikipedia.org/wiki/Rust", "position": 1 },
                    { "title": "No link here" }
                ]
            })))
            .expect(1)
            .mount(&server)
            .await;

        let results = client_for(&server).search("rust").await.unwrap();
        let links: Vec<_> = results.links().collect();
        assert_eq!(links, vec!["https://en.wikipedia.org/wiki/Rust"]);
    }

    #[tokio::test]
    async fn search_tolerates_missing_organic() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "knowledgeGraph": {}
            })))
            .mount(&server)
            .await;

        let results = client_for(&server).search("nothing").await.unwrap();
        assert!(results.organic.is_none());
        assert_eq!(results.links().count(), 0);
    }

    #[tokio::test]
    async fn search_maps_error_status() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(403).set_body_string("Unauthorized."))
            .mount(&server)
            .await;

        let err = client_for(&server).search("rust").await.unwrap_err();
        assert!(matches!(err, ArticlecastError::Search(_)));
        assert!(err.to_string().contains("403"));
        assert!(!err.to_string().contains("test-key"));
    }

    #[test]
    fn debug_redacts_api_key() {
        let client = SerperClient::new(&SearchConfig::default(), "super-secret").unwrap();
        assert!(!format!("{client:?}").contains("super-secret"));
    }
}
