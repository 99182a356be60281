//! Generic (fallback) adapter.
//!
//! Always matches. Tries common semantic containers, then falls back to the
//! body with navigation chrome stripped.

use scraper::Html;
use url::Url;

use super::{ContentAdapter, first_match, strip_elements};

const CHROME: &str = "nav, header, footer, aside, script, style, .sidebar, .nav";

pub struct GenericAdapter;

impl ContentAdapter for GenericAdapter {
    fn matches(&self, _url: &Url) -> bool {
        true
    }

    fn extract_content(&self, doc: &Html) -> Option<String> {
        let html = first_match(doc, &["article", "main", r#"[role="main"]"#, ".content", "body"])
            .unwrap_or_default();
        Some(strip_elements(&html, CHROME))
    }

    fn name(&self) -> &str {
        "generic"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn body_fallback_strips_chrome() {
        let html = r#"<html><body>
            <header>Site</header>
            <h1>Direct Body</h1><p>Content in body.</p>
            <footer>Copyright 2024</footer>
        </body></html>"#;
        let doc = Html::parse_document(html);

        let out = GenericAdapter.extract_content(&doc).unwrap();
        assert!(out.contains("Content in body."));
        assert!(!out.contains("Copyright 2024"));
        assert!(!out.contains("Site"));
    }

    #[test]
    fn prefers_main_container() {
        let doc = Html::parse_document(
            "<html><body><div>Noise</div><main><p>Signal</p></main></body></html>",
        );
        let out = GenericAdapter.extract_content(&doc).unwrap();
        assert!(out.contains("Signal"));
        assert!(!out.contains("Noise"));
    }
}
