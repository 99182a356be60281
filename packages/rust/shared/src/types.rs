//! Core domain types shared by every pipeline stage.

use serde::{Deserialize, Serialize};
use url::Url;
use uuid::Uuid;

// ---------------------------------------------------------------------------
// RunId
// ---------------------------------------------------------------------------

/// A UUID v7 wrapper identifying one pipeline run (time-sortable).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RunId(pub Uuid);

impl RunId {
    pub fn new() -> Self {
        Self(Uuid::now_v7())
    }
}

impl Default for RunId {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Display for RunId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

// ---------------------------------------------------------------------------
// SourceKind
// ---------------------------------------------------------------------------

/// The article sources the pipeline keeps. Anything else is dropped at search time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SourceKind {
    Wikipedia,
    Medium,
}

impl SourceKind {
    /// Registrable domain matched against URL hosts.
    pub fn domain(self) -> &'static str {
        match self {
            Self::Wikipedia => "wikipedia.org",
            Self::Medium => "medium.com",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Self::Wikipedia => "Wikipedia",
            Self::Medium => "Medium",
        }
    }

    /// Classify a URL by host suffix. `None` means "other".
    ///
    /// The host must equal the domain or end with `.` + domain, so
    /// `en.wikipedia.org` matches and `notwikipedia.org` does not.
    pub fn classify(url: &Url) -> Option<Self> {
        let host = url.host_str()?.trim_end_matches('.').to_ascii_lowercase();
        [Self::Wikipedia, Self::Medium].into_iter().find(|kind| {
            let domain = kind.domain();
            host == domain
                || host
                    .strip_suffix(domain)
                    .is_some_and(|prefix| prefix.ends_with('.'))
        })
    }

    /// Parse and classify a raw link string.
    pub fn classify_str(link: &str) -> Option<Self> {
        Url::parse(link.trim()).ok().as_ref().and_then(Self::classify)
    }
}

impl std::fmt::Display for SourceKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}

// ---------------------------------------------------------------------------
// ArticleDocument
// ---------------------------------------------------------------------------

/// A fetched article plus the metadata the summarizer needs.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ArticleDocument {
    /// Cleaned page text.
    pub content: String,
    pub source: SourceKind,
    /// Derived from the URL path.
    pub title: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub source_url: Option<String>,
}

// ---------------------------------------------------------------------------
// WorkflowState
// ---------------------------------------------------------------------------

/// The record carried between pipeline stages.
///
/// Stages never mutate a state they were handed. Each one returns a new value
/// with only its own fields filled in, via the `with_*` methods.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct WorkflowState {
    pub query: String,
    /// Raw keyword line exactly as the model returned it.
    pub keywords: String,
    pub wikipedia_urls: Vec<String>,
    pub medium_urls: Vec<String>,
    pub documents: Vec<ArticleDocument>,
    pub summary: Option<String>,
}

impl WorkflowState {
    /// Fresh state for a new query.
    pub fn new(query: impl Into<String>) -> Self {
        Self {
            query: query.into(),
            ..Self::default()
        }
    }

    pub fn with_keywords(&self, keywords: impl Into<String>) -> Self {
        Self {
            keywords: keywords.into(),
            ..self.clone()
        }
    }

    pub fn with_urls(&self, wikipedia_urls: Vec<String>, medium_urls: Vec<String>) -> Self {
        Self {
            wikipedia_urls,
            medium_urls,
            ..self.clone()
        }
    }

    pub fn with_documents(&self, documents: Vec<ArticleDocument>) -> Self {
        Self {
            documents,
            ..self.clone()
        }
    }

    pub fn with_summary(&self, summary: impl Into<String>) -> Self {
        Self {
            summary: Some(summary.into()),
            ..self.clone()
        }
    }

    /// URLs in load order: all Wikipedia first, then all Medium.
    pub fn urls_in_load_order(&self) -> impl Iterator<Item = (SourceKind, &str)> {
        self.wikipedia_urls
            .iter()
            .map(|u| (SourceKind::Wikipedia, u.as_str()))
            .chain(
                self.medium_urls
                    .iter()
                    .map(|u| (SourceKind::Medium, u.as_str())),
            )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn classify_by_host_suffix() {
        assert_eq!(
            SourceKind::classify_str("https://en.wikipedia.org/wiki/X"),
            Some(SourceKind::Wikipedia)
        );
        assert_eq!(
            SourceKind::classify_str("https://medium.com/@a/b"),
            Some(SourceKind::Medium)
        );
        assert_eq!(
            SourceKind::classify_str("https://towardsdatascience.medium.com/post-1"),
            Some(SourceKind::Medium)
        );
        assert_eq!(SourceKind::classify_str("https://example.com"), None);
    }

    #[test]
    fn classify_rejects_lookalike_hosts() {
        assert_eq!(SourceKind::classify_str("https://notwikipedia.org/wiki/X"), None);
        assert_eq!(SourceKind::classify_str("https://medium.com.evil.io/a"), None);
        assert_eq!(SourceKind::classify_str("not a url"), None);
    }

    #[test]
    fn classify_ignores_case() {
        assert_eq!(
            SourceKind::classify_str("https://EN.Wikipedia.ORG/wiki/Rust"),
            Some(SourceKind::Wikipedia)
        );
    }

    #[test]
    fn with_methods_leave_prior_state_untouched() {
        let start = WorkflowState::new("rust");
        let next = start.with_keywords("rust, cargo");
        assert_eq!(start.keywords, "");
        assert_eq!(next.query, "rust");
        assert_eq!(next.keywords, "rust, cargo");

        let done = next.with_summary("done");
        assert_eq!(next.summary, None);
        assert_eq!(done.summary.as_deref(), Some("done"));
        assert_eq!(done.keywords, "rust, cargo");
    }

    #[test]
    fn load_order_puts_wikipedia_first() {
        let state = WorkflowState::new("q").with_urls(
            vec!["https://en.wikipedia.org/wiki/A".into()],
            vec!["https://medium.com/@x/b".into()],
        );
        let kinds: Vec<_> = state.urls_in_load_order().map(|(k, _)| k).collect();
        assert_eq!(kinds, vec![SourceKind::Wikipedia, SourceKind::Medium]);
    }

    #[test]
    fn run_id_display_is_uuid() {
        let id = RunId::new();
        assert_eq!(id.to_string().len(), 36);
    }
}
