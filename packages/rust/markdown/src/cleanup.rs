//! Post-conversion cleanup pipeline for article text.
//!
//! Each cleanup pass is a function `&str -> String` applied in sequence.

use std::sync::LazyLock;

use regex::Regex;

/// Run the full cleanup pipeline on raw Markdown text.
pub(crate) fn run_pipeline(md: &str) -> String {
    let mut result = md.to_string();

    result = fix_code_block_languages(&result);
    result = strip_leftover_html(&result);
    result = strip_images(&result);
    result = flatten_links(&result);
    result = strip_citation_markers(&result);
    result = normalize_whitespace(&result);
    result = clean_blank_lines(&result);

    result.trim().to_string()
}

// ---------------------------------------------------------------------------
// Pass 1: Fix code block language annotations
// ---------------------------------------------------------------------------

/// Strip `language-` prefixes that some sites put on code fences.
fn fix_code_block_languages(md: &str) -> String {
    static LANG_RE: LazyLock<Regex> =
        LazyLock::new(|| Regex::new(r"(?m)^```language-(\w+)").expect("valid regex"));

    LANG_RE.replace_all(md, "```$1").to_string()
}

// ---------------------------------------------------------------------------
// Pass 2: Strip leftover HTML
// ---------------------------------------------------------------------------

/// Remove block-level wrapper tags htmd passed through, outside code fences.
fn strip_leftover_html(md: &str) -> String {
    static HTML_TAG_RE: LazyLock<Regex> = LazyLock::new(|| {
        Regex::new(
            r"</?(?:div|span|section|article|aside|header|footer|figure|figcaption|details|summary|sup|sub)(?:\s[^>]*)?>",
        )
        .expect("valid regex")
    });

    let mut in_code = false;
    md.lines()
        .map(|line| {
            if line.trim_start().starts_with("```") {
                in_code = !in_code;
                return line.to_string();
            }
            if in_code {
                line.to_string()
            } else {
                HTML_TAG_RE.replace_all(line, "").to_string()
            }
        })
        .collect::<Vec<_>>()
        .join("\n")
}

// ---------------------------------------------------------------------------
// Pass 3: Strip images
// ---------------------------------------------------------------------------

fn strip_images(md: &str) -> String {
    static IMAGE_RE: LazyLock<Regex> =
        LazyLock::new(|| Regex::new(r"!\[[^\]]*\]\([^)]*\)").expect("valid regex"));

    IMAGE_RE.replace_all(md, "").to_string()
}

// ---------------------------------------------------------------------------
// Pass 4: Flatten links
// ---------------------------------------------------------------------------

/// Replace `[text](url)` with `text`. Runs after image removal.
fn flatten_links(md: &str) -> String {
    static LINK_RE: LazyLock<Regex> =
        LazyLock::new(|| Regex::new(r"\[([^\]]*)\]\([^)]*\)").expect("valid regex"));

    LINK_RE.replace_all(md, "$1").to_string()
}

// ---------------------------------------------------------------------------
// Pass 5: Strip citation markers
// ---------------------------------------------------------------------------

/// Remove Wikipedia-style `[1]`, `[a]`, `[edit]`, `[citation needed]` markers.
///
/// htmd escapes brackets, so both `[1]` and `\[1\]` forms are handled.
fn strip_citation_markers(md: &str) -> String {
    static CITE_RE: LazyLock<Regex> = LazyLock::new(|| {
        Regex::new(r"\\?\[(?:\d+|[a-z]|edit|citation needed|clarification needed|note \d+)\\?\]")
            .expect("valid regex")
    });

    CITE_RE.replace_all(md, "").to_string()
}

// ---------------------------------------------------------------------------
// Pass 6: Normalize whitespace
// ---------------------------------------------------------------------------

/// Trim trailing whitespace on every line.
fn normalize_whitespace(md: &str) -> String {
    md.lines()
        .map(|line| line.trim_end())
        .collect::<Vec<_>>()
        .join("\n")
}

// ---------------------------------------------------------------------------
// Pass 7: Clean blank lines
// ---------------------------------------------------------------------------

/// Collapse runs of blank lines to a single blank line.
fn clean_blank_lines(md: &str) -> String {
    let mut result = String::with_capacity(md.len());
    let mut blank_run = 0;

    for line in md.lines() {
        if line.trim().is_empty() {
            blank_run += 1;
            if blank_run > 1 {
                continue;
            }
        } else {
            blank_run = 0;
        }
        result.push_str(line);
        result.push('\n');
    }

    result
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
