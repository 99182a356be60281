//! HTTP page fetcher: download, pick the article body, convert to text.

use std::time::Duration;

use reqwest::Client;
use scraper::Html;
use tracing::{debug, instrument};
use url::Url;

use articlecast_shared::{ArticlecastError, FetchConfig, Result};

use crate::adapters::AdapterRegistry;
use crate::{FetchedPage, PageFetcher};

/// Default User-Agent for page requests.
const USER_AGENT: &str = concat!("Articlecast/", env!("CARGO_PKG_VERSION"));

pub struct HttpPageFetcher {
    client: Client,
    registry: AdapterRegistry,
}

impl HttpPageFetcher {
    pub fn new(config: &FetchConfig) -> Result<Self> {
        let user_agent = config.user_agent.as_deref().unwrap_or(USER_AGENT);
        let client = Client::builder()
            .user_agent(user_agent)
            .redirect(reqwest::redirect::Policy::limited(config.max_redirects))
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(|e| ArticlecastError::Network(format!("failed to build HTTP client: {e}")))?;

        Ok(Self {
            client,
            registry: AdapterRegistry::new(),
        })
    }

    /// Parse a downloaded page into zero or one documents.
    ///
    /// Kept synchronous: `scraper::Html` is not `Send` and must not live across an await.
    fn extract_pages(&self, html: &str, url: &Url) -> Result<Vec<FetchedPage>> {
        let content_html = {
            let doc = Html::parse_document(html);
            let (content, adapter) = self.registry.extract(&doc, url);
            debug!(%url, adapter, content_len = content.len(), "content extracted");
            content
        };

        let converted = articlecast_markdown::convert(&content_html)?;
        if converted.text.is_empty() {
            debug!(%url, "page has no readable content");
            return Ok(Vec::new());
        }

        Ok(vec![FetchedPage {
            content: converted.text,
            word_count: converted.word_count,
        }])
    }
}

#[async_trait::async_trait]
impl PageFetcher for HttpPageFetcher {
    #[instrument(skip_all, fields(url = %url))]
    async fn fetch(&self, url: &str) -> Result<Vec<FetchedPage>> {
        let parsed = Url::parse(url)
            .map_err(|e| ArticlecastError::validation(format!("invalid URL {url}: {e}")))?;

        let resp = self
            .client
            .get(parsed.clone())
            .send()
            .await
            .map_err(|e| ArticlecastError::Network(format!("{url}: {e}")))?;

        let status = resp.status();
        if !status.is_success() {
            return Err(ArticlecastError::Network(format!("{url}: HTTP {status}")));
        }

        let html = resp
            .text()
            .await
            .map_err(|e| ArticlecastError::Network(format!("{url}: failed to read body: {e}")))?;

        self.extract_pages(&html, &parsed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use wiremock::matchers::{method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn fetcher() -> HttpPageFetcher {
        HttpPageFetcher::new(&FetchConfig::default()).unwrap()
    }

    #[tokio::test]
    async fn fetch_converts_page_to_text() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/post"))
            .respond_with(ResponseTemplate::new(200).set_body_raw(
                "<html><body><nav>Menu</nav><article><h2>Title</h2><p>Readable <a href=\"/x\">prose</a>.</p></article></body></html>",
                "text/html",
            ))
            .mount(&server)
            .await;

        let pages = fetcher()
            .fetch(&format!("{}/post", server.uri()))
            .await
            .unwrap();

        assert_eq!(pages.len(), 1);
        assert!(pages[0].content.contains("Readable prose."));
        assert!(!pages[0].content.contains("Menu"));
        assert!(pages[0].word_count > 0);
    }

    #[tokio::test]
    async fn fetch_reports_error_status() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(404))
            .mount(&server)
            .await;

        let err = fetcher()
            .fetch(&format!("{}/missing", server.uri()))
            .await
            .unwrap_err();
        assert!(matches!(err, ArticlecastError::Network(_)));
        assert!(err.to_string().contains("404"));
    }

    #[tokio::test]
    async fn fetch_empty_page_yields_no_documents() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(
                ResponseTemplate::new(200).set_body_raw("<html><body></body></html>", "text/html"),
            )
            .mount(&server)
            .await;

        let pages = fetcher().fetch(&server.uri()).await.unwrap();
        assert!(pages.is_empty());
    }

    #[tokio::test]
    async fn fetch_rejects_invalid_url() {
        let err = fetcher().fetch("not a url").await.unwrap_err();
        assert!(matches!(err, ArticlecastError::Validation { .. }));
    }
}
