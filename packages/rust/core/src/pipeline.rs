//! End-to-end run: query → keywords → search → load → summarize → publish.
//!
//! Each stage reads the previous [`WorkflowState`] and returns a new one.
//! Stages run strictly one after another; nothing overlaps.

use std::sync::Arc;
use std::time::{Duration, Instant};

use serde::Serialize;
use tracing::{info, instrument, warn};

use articlecast_llm::{LanguageModel, OllamaModel};
use articlecast_loader::{ArticleLoader, HttpPageFetcher, PageFetcher};
use articlecast_publish::{Publisher, TelegramPublisher};
use articlecast_search::{ArticleSearcher, SearchProvider, SerperClient};
use articlecast_shared::{PipelineConfig, Result, RunId, RuntimeConfig, WorkflowState};

use crate::keywords::KeywordSuggester;
use crate::summarize::Summarizer;

/// Message published when the state carries no summary at all.
pub const NO_SUMMARY_FALLBACK: &str = "No summary available.";

// ---------------------------------------------------------------------------
// Stages + progress
// ---------------------------------------------------------------------------

/// Pipeline states, visited strictly in declaration order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum Stage {
    Keywords,
    Search,
    Load,
    Summarize,
    Publish,
    Done,
}

impl std::fmt::Display for Stage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let label = match self {
            Self::Keywords => "Suggesting keywords",
            Self::Search => "Searching articles",
            Self::Load => "Loading articles",
            Self::Summarize => "Summarizing",
            Self::Publish => "Publishing",
            Self::Done => "Done",
        };
        f.write_str(label)
    }
}

/// Progress callback for reporting pipeline status.
pub trait ProgressReporter: Send + Sync {
    /// Called when entering a new stage.
    fn stage(&self, stage: Stage);
    /// Called after search with the number of URLs kept per source.
    fn urls_found(&self, wikipedia: usize, medium: usize);
    /// Called after loading with the number of documents.
    fn documents_loaded(&self, count: usize);
    /// Called when the pipeline completes.
    fn done(&self, report: &RunReport);
}

/// No-op progress reporter for headless/test usage.
pub struct SilentProgress;

impl ProgressReporter for SilentProgress {
    fn stage(&self, _stage: Stage) {}
    fn urls_found(&self, _wikipedia: usize, _medium: usize) {}
    fn documents_loaded(&self, _count: usize) {}
    fn done(&self, _report: &RunReport) {}
}

// ---------------------------------------------------------------------------
// Settings + report
// ---------------------------------------------------------------------------

/// Limits applied by the stages.
#[derive(Debug, Clone, Copy)]
pub struct PipelineSettings {
    pub max_urls_per_source: usize,
    pub max_message_chars: usize,
    pub max_document_chars: Option<usize>,
}

impl Default for PipelineSettings {
    fn default() -> Self {
        Self::from(&PipelineConfig::default())
    }
}

impl From<&PipelineConfig> for PipelineSettings {
    fn from(config: &PipelineConfig) -> Self {
        Self {
            max_urls_per_source: config.max_urls_per_source,
            max_message_chars: config.max_message_chars,
            max_document_chars: config.max_document_chars,
        }
    }
}

/// Outcome of one run.
#[derive(Debug, Clone, Serialize)]
pub struct RunReport {
    pub run_id: RunId,
    pub state: WorkflowState,
    /// Whether the publisher accepted the message.
    pub published: bool,
    #[serde(rename = "elapsed_ms", serialize_with = "serialize_millis")]
    pub elapsed: Duration,
}

fn serialize_millis<S: serde::Serializer>(
    d: &Duration,
    s: S,
) -> std::result::Result<S::Ok, S::Error> {
    s.serialize_u64(u64::try_from(d.as_millis()).unwrap_or(u64::MAX))
}

// ---------------------------------------------------------------------------
// Pipeline
// ---------------------------------------------------------------------------

/// The five-stage orchestrator.
pub struct Pipeline {
    keywords: KeywordSuggester,
    searcher: ArticleSearcher,
    loader: ArticleLoader,
    summarizer: Summarizer,
    publisher: Arc<dyn Publisher>,
}

impl Pipeline {
    pub fn new(
        model: Arc<dyn LanguageModel>,
        search: Arc<dyn SearchProvider>,
        fetcher: Arc<dyn PageFetcher>,
        publisher: Arc<dyn Publisher>,
        settings: PipelineSettings,
    ) -> Self {
        Self {
            keywords: KeywordSuggester::new(model.clone()),
            searcher: ArticleSearcher::new(search, settings.max_urls_per_source),
            loader: ArticleLoader::new(fetcher, settings.max_document_chars),
            summarizer: Summarizer::new(model, settings.max_message_chars),
            publisher,
        }
    }

    /// Build the production pipeline: Ollama, Serper, HTTP fetcher, Telegram.
    pub fn from_config(config: &RuntimeConfig) -> Result<Self> {
        let app = &config.app;
        let secrets = &config.secrets;

        let model = Arc::new(OllamaModel::new(&app.model)?);
        let search = Arc::new(SerperClient::new(&app.search, &secrets.serper_api_key)?);
        let fetcher = Arc::new(HttpPageFetcher::new(&app.fetch)?);
        let publisher = Arc::new(TelegramPublisher::new(
            &app.telegram,
            &secrets.telegram_bot_token,
            &secrets.telegram_channel_id,
        )?);

        Ok(Self::new(
            model,
            search,
            fetcher,
            publisher,
            PipelineSettings::from(&app.pipeline),
        ))
    }

    /// Swap the publisher, e.g. for a dry run.
    pub fn with_publisher(mut self, publisher: Arc<dyn Publisher>) -> Self {
        self.publisher = publisher;
        self
    }

    /// Run one query to completion.
    ///
    /// Keyword and search failures abort the run with `Err`. Load, summarize
    /// and publish failures degrade into skipped URLs, placeholder text, or
    /// `published == false`.
    #[instrument(skip_all, fields(query = %query))]
    pub async fn run(&self, query: &str, progress: &dyn ProgressReporter) -> Result<RunReport> {
        let start = Instant::now();
        let run_id = RunId::new();

        info!(%run_id, "starting pipeline");

        let state = WorkflowState::new(query);

        progress.stage(Stage::Keywords);
        let state = self.keywords.suggest(&state).await?;

        progress.stage(Stage::Search);
        let state = self.searcher.search(&state).await?;
        progress.urls_found(state.wikipedia_urls.len(), state.medium_urls.len());

        progress.stage(Stage::Load);
        let state = self.loader.load(&state).await;
        progress.documents_loaded(state.documents.len());

        progress.stage(Stage::Summarize);
        let state = self.summarizer.summarize(&state).await;

        progress.stage(Stage::Publish);
        let message = state.summary.as_deref().unwrap_or(NO_SUMMARY_FALLBACK);
        let published = match self.publisher.publish(message).await {
            Ok(()) => true,
            Err(e) => {
                warn!(error = %e, "publish failed");
                false
            }
        };

        progress.stage(Stage::Done);
        let report = RunReport {
            run_id,
            state,
            published,
            elapsed: start.elapsed(),
        };

        info!(
            %run_id,
            documents = report.state.documents.len(),
            published,
            elapsed_ms = report.elapsed.as_millis() as u64,
            "pipeline complete"
        );

        progress.done(&report);
        Ok(report)
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
