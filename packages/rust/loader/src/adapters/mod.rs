//! Site adapters for locating the article body inside a fetched page.
//!
//! Adapters are tried in priority order; [`GenericAdapter`] is the always-last
//! fallback and accepts any page.

mod generic;
mod medium;
mod wikipedia;

use scraper::{Html, Selector};
use url::Url;

pub use generic::GenericAdapter;
pub use medium::MediumAdapter;
pub use wikipedia::WikipediaAdapter;

// ---------------------------------------------------------------------------
// Trait
// ---------------------------------------------------------------------------

/// Site-specific article extraction.
pub trait ContentAdapter: Send + Sync {
    /// Whether this adapter should try the page at `url`.
    fn matches(&self, url: &Url) -> bool;

    /// Extract the article body as HTML, or `None` if the expected container is missing.
    fn extract_content(&self, doc: &Html) -> Option<String>;

    /// Human-readable adapter name for tracing.
    fn name(&self) -> &str;
}

// ---------------------------------------------------------------------------
// Registry
// ---------------------------------------------------------------------------

/// Holds registered adapters in priority order.
pub struct AdapterRegistry {
    adapters: Vec<Box<dyn ContentAdapter>>,
}

impl AdapterRegistry {
    /// Create a registry with all built-in adapters (site-specific first, generic last).
    pub fn new() -> Self {
        Self {
            adapters: vec![
                Box::new(WikipediaAdapter),
                Box::new(MediumAdapter),
                Box::new(GenericAdapter),
            ],
        }
    }

    /// Extract content with the first matching adapter that finds a body.
    /// Returns the adapter name alongside the HTML.
    pub fn extract(&self, doc: &Html, url: &Url) -> (String, &str) {
        for adapter in &self.adapters {
            if !adapter.matches(url) {
                continue;
            }
            if let Some(html) = adapter.extract_content(doc) {
                return (html, adapter.name());
            }
        }
        (String::new(), "none")
    }
}

impl Default for AdapterRegistry {
    fn default() -> Self {
        Self::new()
    }
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

/// Inner HTML of the first element matching any selector, in order.
pub(crate) fn first_match(doc: &Html, selectors: &[&str]) -> Option<String> {
    selectors.iter().find_map(|sel_str| {
        let sel = Selector::parse(sel_str).ok()?;
        doc.select(&sel).next().map(|el| el.inner_html())
    })
}

/// Remove every element matching `selectors` from an HTML fragment.
pub(crate) fn strip_elements(html: &str, selectors: &str) -> String {
    let Ok(sel) = Selector::parse(selectors) else {
        return html.to_string();
    };
    let doc = Html::parse_fragment(html);

    let mut result = html.to_string();
    for el in doc.select(&sel) {
        result = result.replace(&el.html(), "");
    }
    result
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn registry_prefers_site_adapter() {
        let registry = AdapterRegistry::new();
        let html = r#"<html><body><div id="mw-content-text"><div class="mw-parser-output"><p>Wiki body</p></div></div><footer>f</footer></body></html>"#;
        let doc = Html::parse_document(html);
        let url = Url::parse("https://en.wikipedia.org/wiki/Rust").unwrap();

        let (content, adapter) = registry.extract(&doc, &url);
        assert_eq!(adapter, "wikipedia");
        assert!(content.contains("Wiki body"));
        assert!(!content.contains("<footer>"));
    }

    #[test]
    fn registry_falls_back_to_generic() {
        let registry = AdapterRegistry::new();
        // Wikipedia URL, but the page lacks the expected container.
        let doc = Html::parse_document("<html><body><main><p>Mirror text</p></main></body></html>");
        let url = Url::parse("https://en.wikipedia.org/wiki/Rust").unwrap();

        let (content, adapter) = registry.extract(&doc, &url);
        assert_eq!(adapter, "generic");
        assert!(content.contains("Mirror text"));
    }

    #[test]
    fn strip_elements_removes_matches() {
        let html = r#"<p>Keep</p><sup class="reference">[1]</sup><p>Also keep</p>"#;
        let out = strip_elements(html, "sup.reference");
        assert!(out.contains("Keep"));
        assert!(out.contains("Also keep"));
        assert!(!out.contains("[1]"));
    }
}
