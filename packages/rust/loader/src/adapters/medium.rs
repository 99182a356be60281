//! Medium adapter.

use scraper::Html;
use url::Url;

use articlecast_shared::SourceKind;

use super::{ContentAdapter, first_match, strip_elements};

/// Follow/clap/share controls and author chrome inside the article element.
const NOISE: &str = "button, svg, figure, nav, header, footer, aside, \
    [data-testid=\"headerSocialActions\"], [aria-label=\"responses\"], .speechify-ignore";

pub struct MediumAdapter;

impl ContentAdapter for MediumAdapter {
    fn matches(&self, url: &Url) -> bool {
        SourceKind::classify(url) == Some(SourceKind::Medium)
    }

    fn extract_content(&self, doc: &Html) -> Option<String> {
        let html = first_match(doc, &["article section", "article"])?;
        Some(strip_elements(&html, NOISE))
    }

    fn name(&self) -> &str {
        "medium"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn extracts_story_body() {
        let html = r#"<html><body>
            <nav>Sign in</nav>
            <article><section>
              <h1>Intro to Transformers</h1>
              <div class="speechify-ignore"><button>Follow</button> 5 min read</div>
              <p>Attention is all you need.</p>
            </section></article>
        </body></html>"#;
        let doc = Html::parse_document(html);

        let out = MediumAdapter.extract_content(&doc).unwrap();
        assert!(out.contains("Intro to Transformers"));
        assert!(out.contains("Attention is all you need."));
        assert!(!out.contains("Follow"));
        assert!(!out.contains("Sign in"));
    }

    #[test]
    fn missing_article_yields_none() {
        let doc = Html::parse_document("<html><body><p>Paywall</p></body></html>");
        assert!(MediumAdapter.extract_content(&doc).is_none());
    }
}
