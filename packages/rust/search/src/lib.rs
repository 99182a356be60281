//! Article search: turns the keyword line into Wikipedia and Medium URLs.
//!
//! Each keyword is sent to a [`SearchProvider`], every organic link is
//! classified by host, and the survivors are pooled per source, deduplicated
//! in first-seen order, and capped.

mod serper;

use std::collections::HashSet;
use std::sync::Arc;

use tracing::{debug, info, instrument};
use url::Url;

use articlecast_shared::{Result, SourceKind, WorkflowState};

pub use serper::{OrganicResult, SearchResults, SerperClient};

/// Separator the keyword prompt asks the model to use.
pub const KEYWORD_SEPARATOR: &str = ", ";

/// A web-search backend.
#[async_trait::async_trait]
pub trait SearchProvider: Send + Sync {
    async fn search(&self, keyword: &str) -> Result<SearchResults>;
}

// ---------------------------------------------------------------------------
// Keyword splitting
// ---------------------------------------------------------------------------

/// Split the raw keyword line into individual keywords.
///
/// Splits on `", "`, trims whitespace and stray quotes from each piece,
/// and drops empty pieces. Order is preserved.
pub fn split_keywords(raw: &str) -> Vec<String> {
    raw.split(KEYWORD_SEPARATOR)
        .map(|k| k.trim().trim_matches(|c| c == '"' || c == '\'').trim())
        .filter(|k| !k.is_empty())
        .map(str::to_string)
        .collect()
}

// ---------------------------------------------------------------------------
// URL pooling
// ---------------------------------------------------------------------------

/// Ordered, deduplicated URL list with a hard cap.
#[derive(Debug, Default)]
struct UrlPool {
    seen: HashSet<String>,
    urls: Vec<String>,
}

impl UrlPool {
    fn insert(&mut self, url: &str) {
        if self.seen.insert(url.to_string()) {
            self.urls.push(url.to_string());
        }
    }

    fn into_capped(mut self, cap: usize) -> Vec<String> {
        self.urls.truncate(cap);
        self.urls
    }
}

// ---------------------------------------------------------------------------
// ArticleSearcher
// ---------------------------------------------------------------------------

/// Search stage of the pipeline.
pub struct ArticleSearcher {
    provider: Arc<dyn SearchProvider>,
    max_urls_per_source: usize,
}

impl ArticleSearcher {
    pub fn new(provider: Arc<dyn SearchProvider>, max_urls_per_source: usize) -> Self {
        Self {
            provider,
            max_urls_per_source,
        }
    }

    /// Fill `wikipedia_urls` and `medium_urls` from `state.keywords`.
    ///
    /// A provider error for any keyword aborts the stage.
    #[instrument(skip_all, fields(keywords = %state.keywords))]
    pub async fn search(&self, state: &WorkflowState) -> Result<WorkflowState> {
        let keywords = split_keywords(&state.keywords);
        let mut wikipedia = UrlPool::default();
        let mut medium = UrlPool::default();

        for keyword in &keywords {
            let results = self.provider.search(keyword).await?;

            for link in results.links() {
                let link = link.trim();
                let Ok(url) = Url::parse(link) else {
                    debug!(link, "dropping unparseable link");
                    continue;
                };
                match SourceKind::classify(&url) {
                    Some(SourceKind::Wikipedia) => wikipedia.insert(link),
                    Some(SourceKind::Medium) => medium.insert(link),
                    None => {}
                }
            }
        }

        let wikipedia_urls = wikipedia.into_capped(self.max_urls_per_source);
        let medium_urls = medium.into_capped(self.max_urls_per_source);

        info!(
            keywords = keywords.len(),
            wikipedia = wikipedia_urls.len(),
            medium = medium_urls.len(),
            "search complete"
        );

        Ok(state.with_urls(wikipedia_urls, medium_urls))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use articlecast_shared::ArticlecastError;
    use std::collections::HashMap;
    use std::sync::Mutex;

    /// Returns canned links per keyword and records every call.
    #[derive(Default)]
    struct StubSearch {
        links: HashMap<String, Vec<&'static str>>,
        fail_on: Option<&'static str>,
        calls: Mutex<Vec<String>>,
    }

    impl StubSearch {
        fn with(mut self, keyword: &str, links: Vec<&'static str>) -> Self {
            self.links.insert(keyword.to_string(), links);
            self
        }
    }

    #[async_trait::async_trait]
    impl SearchProvider for StubSearch {
        async fn search(&self, keyword: &str) -> Result<SearchResults> {
            self.calls.lock().unwrap().push(keyword.to_string());
            if self.fail_on == Some(keyword) {
                return Err(ArticlecastError::Search("quota exceeded".into()));
            }
            let organic = self.links.get(keyword).map(|links| {
                links
                    .iter()
                    .map(|l| OrganicResult {
                        link: Some(l.to_string()),
                        ..OrganicResult::default()
                    })
                    .collect()
            });
            Ok(SearchResults { organic })
        }
    }

    fn state_with(keywords: &str) -> WorkflowState {
        WorkflowState::new("q").with_keywords(keywords)
    }

    #[test]
    fn split_keywords_trims_and_preserves_order() {
        assert_eq!(
            split_keywords("machine learning, AI, deep learning \n"),
            vec!["machine learning", "AI", "deep learning"]
        );
        assert_eq!(split_keywords("\"rust\", 'cargo'"), vec!["rust", "cargo"]);
        assert!(split_keywords("").is_empty());
        assert_eq!(split_keywords("one, , two"), vec!["one", "two"]);
    }

    #[test]
    fn split_keywords_count_follows_model_output() {
        assert_eq!(split_keywords("a").len(), 1);
        assert_eq!(split_keywords("a, b, c").len(), 3);
        // Nothing is enforced beyond what the model returns.
        assert_eq!(split_keywords("a, b, c, d, e").len(), 5);
        // Only ", " separates; a bare comma stays inside the keyword.
        assert_eq!(split_keywords("a,b"), vec!["a,b"]);
    }

    #[tokio::test]
    async fn search_classifies_dedupes_and_caps() {
        let stub = StubSearch::default()
            .with(
                "one",
                vec![
                    "https://en.wikipedia.org/wiki/A",
                    "https://example.com/x",
                    "https://medium.com/@a/post-a",
                    "https://en.wikipedia.org/wiki/B",
                ],
            )
            .with(
                "two",
                vec![
                    "https://en.wikipedia.org/wiki/A",
                    "https://en.wikipedia.org/wiki/C",
                    "https://en.wikipedia.org/wiki/D",
                    "https://medium.com/@a/post-a",
                    "not a url",
                ],
            );
        let searcher = ArticleSearcher::new(Arc::new(stub), 3);

        let out = searcher.search(&state_with("one, two")).await.unwrap();

        assert_eq!(
            out.wikipedia_urls,
            vec![
                "https://en.wikipedia.org/wiki/A",
                "https://en.wikipedia.org/wiki/B",
                "https://en.wikipedia.org/wiki/C",
            ]
        );
        assert_eq!(out.medium_urls, vec!["https://medium.com/@a/post-a"]);
    }

    #[tokio::test]
    async fn search_queries_each_keyword_once_in_order() {
        let stub = Arc::new(StubSearch::default());
        let searcher = ArticleSearcher::new(stub.clone(), 3);

        let out = searcher
            .search(&state_with("alpha, beta, gamma"))
            .await
            .unwrap();

        assert_eq!(*stub.calls.lock().unwrap(), vec!["alpha", "beta", "gamma"]);
        assert!(out.wikipedia_urls.is_empty());
        assert!(out.medium_urls.is_empty());
        assert_eq!(out.keywords, "alpha, beta, gamma");
    }

    #[tokio::test]
    async fn search_aborts_on_provider_error() {
        let stub = StubSearch {
            fail_on: Some("beta"),
            ..StubSearch::default()
        }
        .with("alpha", vec!["https://en.wikipedia.org/wiki/A"]);
        let stub = Arc::new(stub);
        let searcher = ArticleSearcher::new(stub.clone(), 3);

        let err = searcher
            .search(&state_with("alpha, beta, gamma"))
            .await
            .unwrap_err();

        assert!(matches!(err, ArticlecastError::Search(_)));
        assert_eq!(*stub.calls.lock().unwrap(), vec!["alpha", "beta"]);
    }
}
