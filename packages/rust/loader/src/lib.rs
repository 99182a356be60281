//! Article loading: fetch each found URL and turn it into [`ArticleDocument`]s.
//!
//! Failures are isolated per URL. A page that cannot be fetched or parsed is
//! logged and skipped; the remaining URLs are still loaded.

pub mod adapters;
mod fetcher;

use std::sync::Arc;

use tracing::{info, instrument, warn};
use url::Url;

use articlecast_shared::{ArticleDocument, Result, SourceKind, WorkflowState};

pub use fetcher::HttpPageFetcher;

/// One text document produced from a fetched page.
#[derive(Debug, Clone, PartialEq)]
pub struct FetchedPage {
    pub content: String,
    pub word_count: usize,
}

impl FetchedPage {
    pub fn new(content: impl Into<String>) -> Self {
        let content = content.into();
        let word_count = content.split_whitespace().count();
        Self {
            content,
            word_count,
        }
    }
}

/// Turns a URL into zero or more text documents.
#[async_trait::async_trait]
pub trait PageFetcher: Send + Sync {
    async fn fetch(&self, url: &str) -> Result<Vec<FetchedPage>>;
}

// ---------------------------------------------------------------------------
// Title derivation
// ---------------------------------------------------------------------------

/// Derive a display title from an article URL.
///
/// Wikipedia: last path segment, underscores to spaces.
/// Medium: last non-empty segment, hyphens to spaces.
pub fn derive_title(source: SourceKind, url: &str) -> String {
    let segment = last_segment(url);
    let decoded = urlencoding::decode(&segment)
        .map(|s| s.into_owned())
        .unwrap_or(segment);

    match source {
        SourceKind::Wikipedia => decoded.replace('_', " "),
        SourceKind::Medium => decoded.replace('-', " "),
    }
}

fn last_segment(url: &str) -> String {
    if let Ok(parsed) = Url::parse(url) {
        if let Some(last) = parsed
            .path_segments()
            .and_then(|mut segs| segs.rfind(|s| !s.is_empty()))
        {
            return last.to_string();
        }
    }
    url.trim_end_matches('/')
        .rsplit('/')
        .next()
        .unwrap_or(url)
        .to_string()
}

/// Cut `text` to at most `max_chars` characters on a char boundary.
fn cap_chars(text: String, max_chars: Option<usize>) -> String {
    match max_chars {
        Some(max) if text.chars().count() > max => text.chars().take(max).collect(),
        _ => text,
    }
}

// ---------------------------------------------------------------------------
// ArticleLoader
// ---------------------------------------------------------------------------

/// Load stage of the pipeline.
pub struct ArticleLoader {
    fetcher: Arc<dyn PageFetcher>,
    max_document_chars: Option<usize>,
}

impl ArticleLoader {
    pub fn new(fetcher: Arc<dyn PageFetcher>, max_document_chars: Option<usize>) -> Self {
        Self {
            fetcher,
            max_document_chars,
        }
    }

    /// Fetch Wikipedia URLs, then Medium URLs, and attach source metadata.
    ///
    /// Never fails: each URL error is logged and that URL is skipped.
    #[instrument(
        skip_all,
        fields(wikipedia = state.wikipedia_urls.len(), medium = state.medium_urls.len())
    )]
    pub async fn load(&self, state: &WorkflowState) -> WorkflowState {
        let mut documents = Vec::new();
        let mut failed = 0usize;

        for (source, url) in state.urls_in_load_order() {
            let pages = match self.fetcher.fetch(url).await {
                Ok(pages) => pages,
                Err(e) => {
                    warn!(url = %url, error = %e, "failed to load article, skipping");
                    failed += 1;
                    continue;
                }
            };

            let title = derive_title(source, url);
            documents.extend(pages.into_iter().map(|page| ArticleDocument {
                content: cap_chars(page.content, self.max_document_chars),
                source,
                title: title.clone(),
                source_url: Some(url.to_string()),
            }));
        }

        info!(documents = documents.len(), failed, "load complete");
        state.with_documents(documents)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use articlecast_shared::ArticlecastError;
    use std::collections::HashMap;

    struct StubFetcher {
        pages: HashMap<&'static str, Vec<&'static str>>,
    }

    #[async_trait::async_trait]
    impl PageFetcher for StubFetcher {
        async fn fetch(&self, url: &str) -> Result<Vec<FetchedPage>> {
            match self.pages.get(url) {
                Some(pages) => Ok(pages.iter().map(|p| FetchedPage::new(*p)).collect()),
                None => Err(ArticlecastError::Network(format!("{url}: connection refused"))),
            }
        }
    }

    #[test]
    fn title_from_wikipedia_url() {
        assert_eq!(
            derive_title(
                SourceKind::Wikipedia,
                "https://en.wikipedia.org/wiki/Machine_learning"
            ),
            "Machine learning"
        );
        assert_eq!(
            derive_title(SourceKind::Wikipedia, "https://en.wikipedia.org/wiki/C%2B%2B"),
            "C++"
        );
    }

    #[test]
    fn title_from_medium_url() {
        assert_eq!(
            derive_title(SourceKind::Medium, "https://medium.com/@a/my-article-slug"),
            "my article slug"
        );
        assert_eq!(
            derive_title(
                SourceKind::Medium,
                "https://medium.com/@a/my-article-slug/?source=rss"
            ),
            "my article slug"
        );
    }

    #[test]
    fn cap_chars_respects_boundaries() {
        assert_eq!(cap_chars("héllo".into(), Some(2)), "hé");
        assert_eq!(cap_chars("short".into(), Some(100)), "short");
        assert_eq!(cap_chars("uncapped".into(), None), "uncapped");
    }

    #[tokio::test]
    async fn load_skips_failed_urls_and_keeps_order() {
        let fetcher = StubFetcher {
            pages: HashMap::from([
                ("https://en.wikipedia.org/wiki/A_b", vec!["wiki A"]),
                ("https://medium.com/@x/post-one", vec!["medium 1", "medium 1 part 2"]),
            ]),
        };
        let loader = ArticleLoader::new(Arc::new(fetcher), None);
        let state = WorkflowState::new("q").with_urls(
            vec![
                "https://en.wikipedia.org/wiki/Broken".into(),
                "https://en.wikipedia.org/wiki/A_b".into(),
            ],
            vec!["https://medium.com/@x/post-one".into()],
        );

        let out = loader.load(&state).await;

        let summary: Vec<_> = out
            .documents
            .iter()
            .map(|d| (d.source, d.title.as_str(), d.content.as_str()))
            .collect();
        assert_eq!(
            summary,
            vec![
                (SourceKind::Wikipedia, "A b", "wiki A"),
                (SourceKind::Medium, "post one", "medium 1"),
                (SourceKind::Medium, "post one", "medium 1 part 2"),
            ]
        );
        assert_eq!(
            out.documents[0].source_url.as_deref(),
            Some("https://en.wikipedia.org/wiki/A_b")
        );
        assert!(state.documents.is_empty());
    }

    #[tokio::test]
    async fn load_applies_document_cap() {
        let fetcher = StubFetcher {
            pages: HashMap::from([("https://en.wikipedia.org/wiki/Long", vec!["abcdefghij"])]),
        };
        let loader = ArticleLoader::new(Arc::new(fetcher), Some(4));
        let state =
            WorkflowState::new("q").with_urls(vec!["https://en.wikipedia.org/wiki/Long".into()], vec![]);

        let out = loader.load(&state).await;
        assert_eq!(out.documents[0].content, "abcd");
    }
}
