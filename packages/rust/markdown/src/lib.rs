//! HTML-to-text conversion for article bodies.
//!
//! Converts extracted article HTML to Markdown using the `htmd` crate, then
//! applies cleanup passes that leave prose a language model can read:
//! links flattened to their text, images and citation markers removed,
//! blank lines and whitespace normalized.

mod cleanup;

use std::sync::LazyLock;

use regex::Regex;
use tracing::{debug, instrument};

use articlecast_shared::{ArticlecastError, Result};

/// Tags whose content never reaches the output.
const SKIP_TAGS: [&str; 9] = [
    "script", "style", "nav", "iframe", "noscript", "svg", "button", "form", "figure",
];

/// Result of converting article HTML to text.
#[derive(Debug, Clone)]
pub struct ConvertResult {
    /// Cleaned article text (lightweight Markdown).
    pub text: String,
    /// Approximate word count, excluding code blocks.
    pub word_count: usize,
}

/// Convert pre-extracted article HTML to clean text.
#[instrument(skip_all, fields(html_len = content_html.len()))]
pub fn convert(content_html: &str) -> Result<ConvertResult> {
    let converter = htmd::HtmlToMarkdown::builder()
        .skip_tags(SKIP_TAGS.to_vec())
        .build();

    let raw = converter
        .convert(content_html)
        .map_err(|e| ArticlecastError::Conversion(format!("htmd conversion failed: {e}")))?;

    debug!(raw_len = raw.len(), "htmd conversion complete");

    let text = cleanup::run_pipeline(&raw);
    let word_count = count_words(&text);

    debug!(word_count, final_len = text.len(), "conversion complete");

    Ok(ConvertResult { text, word_count })
}

/// Count words, ignoring fenced code blocks.
fn count_words(md: &str) -> usize {
    static CODE_BLOCK_RE: LazyLock<Regex> =
        LazyLock::new(|| Regex::new(r"(?s)```.*?```").expect("valid regex"));

    CODE_BLOCK_RE.replace_all(md, "").split_whitespace().count()
}
