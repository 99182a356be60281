//! Error types for Articlecast.
//!
//! Library crates use [`ArticlecastError`] via `thiserror`.
//! App crates (cli/tui) wrap this with `color-eyre` for rich diagnostics.

use std::path::PathBuf;

/// Top-level error type for all Articlecast operations.
#[derive(Debug, thiserror::Error)]
pub enum ArticlecastError {
    /// Configuration loading, validation, or missing secrets.
    #[error("config error: {message}")]
    Config { message: String },

    /// Transport-level HTTP failure or unexpected status while fetching a page.
    #[error("network error: {0}")]
    Network(String),

    /// Generative model call failed or returned an unusable response.
    #[error("model error: {0}")]
    Model(String),

    /// Search provider call failed.
    #[error("search error: {0}")]
    Search(String),

    /// Messaging channel rejected or failed to deliver a message.
    #[error("publish error: {0}")]
    Publish(String),

    /// HTML parsing or response decoding error.
    #[error("parse error: {message}")]
    Parse { message: String },

    /// Filesystem I/O error.
    #[error("I/O error at {path:?}: {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },

    /// Data validation error (bad URL, out-of-range setting, etc.).
    #[error("validation error: {message}")]
    Validation { message: String },

    /// HTML-to-text conversion error.
    #[error("conversion error: {0}")]
    Conversion(String),
}

/// Convenience alias used throughout the codebase.
pub type Result<T> = std::result::Result<T, ArticlecastError>;

impl ArticlecastError {
    /// Create a config error from any displayable message.
    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config {
            message: msg.into(),
        }
    }

    /// Create a parse error from any displayable message.
    pub fn parse(msg: impl Into<String>) -> Self {
        Self::Parse {
            message: msg.into(),
        }
    }

    /// Create a validation error from any displayable message.
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation {
            message: msg.into(),
        }
    }

    /// Wrap a `std::io::Error` with a path for context.
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }
}

/// Shorten an HTTP error body so it can be embedded in an error message.
pub fn truncate_body(body: &str, max_chars: usize) -> String {
    let body = body.trim();
    if body.chars().count() <= max_chars {
        return body.to_string();
    }
    let cut: String = body.chars().take(max_chars).collect();
    format!("{cut}…")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn error_display_formatting() {
        let err = ArticlecastError::config("missing SERPER_API_KEY");
        assert_eq!(err.to_string(), "config error: missing SERPER_API_KEY");

        let err = ArticlecastError::Search("HTTP 403".into());
        assert_eq!(err.to_string(), "search error: HTTP 403");

        let err = ArticlecastError::validation("max_urls_per_source must be at least 1");
        assert!(err.to_string().contains("max_urls_per_source"));
    }

    #[test]
    fn truncate_body_keeps_short_text() {
        assert_eq!(truncate_body("  not found \n", 50), "not found");
    }

    #[test]
    fn truncate_body_cuts_long_text() {
        let body = "x".repeat(500);
        let out = truncate_body(&body, 10);
        assert_eq!(out.chars().count(), 11);
        assert!(out.ends_with('…'));
    }
}
