//! Shared types, error model, and configuration for Articlecast.
//!
//! This crate is the foundation depended on by all other Articlecast crates.
//! It provides:
//! - [`ArticlecastError`], the unified error type
//! - Domain types ([`WorkflowState`], [`ArticleDocument`], [`SourceKind`], [`RunId`])
//! - Configuration ([`AppConfig`], [`RuntimeConfig`], [`Secrets`], config loading)

pub mod config;
pub mod error;
pub mod types;

// Re-export public API at crate root for ergonomic imports.
pub use config::{
    AppConfig, FetchConfig, ModelConfig, PipelineConfig, RuntimeConfig, SearchConfig, Secrets,
    TRUNCATION_PLACEHOLDER, TelegramConfig, config_dir, config_file_path, init_config,
    init_config_in, load_config, load_config_from,
};
pub use error::{ArticlecastError, Result, truncate_body};
pub use types::{ArticleDocument, RunId, SourceKind, WorkflowState};
