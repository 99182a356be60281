//! Core pipeline orchestration and domain logic for Articlecast.
//!
//! This crate owns the keyword and summary stages and ties them together
//! with search, loading, and publishing into one run per query
//! ([`Pipeline::run`]).

pub mod keywords;
pub mod pipeline;
pub mod summarize;

pub use keywords::{KeywordSuggester, keyword_prompt};
pub use pipeline::{
    NO_SUMMARY_FALLBACK, Pipeline, PipelineSettings, ProgressReporter, RunReport, SilentProgress,
    Stage,
};
pub use summarize::{
    NO_RESULTS_MESSAGE, SUMMARY_ERROR_MESSAGE, Summarizer, compose_message, truncate_message,
};
