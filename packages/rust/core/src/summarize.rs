//! Per-document summaries and the final channel message.

use std::sync::Arc;

use tracing::{debug, error, info, instrument};

use articlecast_llm::LanguageModel;
use articlecast_shared::{ArticleDocument, Result, TRUNCATION_PLACEHOLDER, WorkflowState};

/// Summary used when no documents were loaded.
pub const NO_RESULTS_MESSAGE: &str = "🔍 No relevant articles found for the given query.";

/// Summary used when any per-document model call fails.
pub const SUMMARY_ERROR_MESSAGE: &str = "⚠️ Error generating summary. Please try again.";

// ---------------------------------------------------------------------------
// Prompt + formatting
// ---------------------------------------------------------------------------

/// Build the per-document summary prompt.
pub fn summary_prompt(doc: &ArticleDocument) -> String {
    format!(
        "Summarize the following {source} article in a concise and informative way.\n\
         Follow these rules:\n\
         - Keep the summary under 350 characters (for Telegram).\n\
         - Start with a clear definition or overview.\n\
         - Include the key points or main ideas.\n\
         - Use bullet points for readability if needed.\n\
         - Keep the tone appropriate to the source.\n\
         \n\
         Article:\n\
         {content}\n\
         \n\
         Summary:",
        source = doc.source,
        content = doc.content,
    )
}

/// One labeled summary block with its source attribution.
pub fn format_block(doc: &ArticleDocument, summary: &str) -> String {
    let mut block = format!(
        "📌 {} Summary:\n{}\n\n🔗 Source: {}",
        doc.source, summary, doc.title
    );
    if let Some(url) = &doc.source_url {
        block.push('\n');
        block.push_str(url);
    }
    block
}

/// Header lines followed by every block, blank-line separated.
pub fn compose_message(query: &str, keywords: &str, blocks: &[String]) -> String {
    format!(
        "📚 Article Summaries for: {query}\n\n🔍 Search Keywords: {keywords}\n\n{}",
        blocks.join("\n\n")
    )
}

/// Bound `text` to `max_chars` characters without splitting a word.
///
/// Text that fits is returned unchanged. Otherwise the text is cut at the
/// last whitespace that leaves room for [`TRUNCATION_PLACEHOLDER`], trailing
/// whitespace is dropped, and the placeholder is appended. With no usable
/// boundary only the placeholder remains.
pub fn truncate_message(text: &str, max_chars: usize) -> String {
    if text.chars().count() <= max_chars {
        return text.to_string();
    }

    let budget = max_chars.saturating_sub(TRUNCATION_PLACEHOLDER.chars().count());
    let cut = text
        .char_indices()
        .nth(budget)
        .map_or(text.len(), |(i, _)| i);

    let boundary = if text[cut..].starts_with(char::is_whitespace) {
        Some(cut)
    } else {
        text[..cut].rfind(char::is_whitespace)
    };

    match boundary.map(|b| text[..b].trim_end()) {
        Some(kept) if !kept.is_empty() => format!("{kept}{TRUNCATION_PLACEHOLDER}"),
        _ => TRUNCATION_PLACEHOLDER.to_string(),
    }
}

// ---------------------------------------------------------------------------
// Summarizer
// ---------------------------------------------------------------------------

/// Summarize stage of the pipeline.
pub struct Summarizer {
    model: Arc<dyn LanguageModel>,
    max_message_chars: usize,
}

impl Summarizer {
    pub fn new(model: Arc<dyn LanguageModel>, max_message_chars: usize) -> Self {
        Self {
            model,
            max_message_chars,
        }
    }

    /// Produce the final message for `state.documents`.
    ///
    /// Never fails. No documents gives [`NO_RESULTS_MESSAGE`] without calling
    /// the model; any model error gives [`SUMMARY_ERROR_MESSAGE`] and drops
    /// the summaries generated so far.
    #[instrument(skip_all, fields(documents = state.documents.len()))]
    pub async fn summarize(&self, state: &WorkflowState) -> WorkflowState {
        if state.documents.is_empty() {
            info!("no documents loaded, using placeholder");
            return state.with_summary(NO_RESULTS_MESSAGE);
        }

        match self.summarize_documents(&state.documents).await {
            Ok(blocks) => {
                let message = compose_message(&state.query, &state.keywords, &blocks);
                let summary = truncate_message(&message, self.max_message_chars);
                info!(
                    blocks = blocks.len(),
                    chars = summary.chars().count(),
                    truncated = summary.len() != message.len(),
                    "summary assembled"
                );
                state.with_summary(summary)
            }
            Err(e) => {
                error!(error = %e, "summary generation failed");
                state.with_summary(SUMMARY_ERROR_MESSAGE)
            }
        }
    }

    async fn summarize_documents(&self, documents: &[ArticleDocument]) -> Result<Vec<String>> {
        let mut blocks = Vec::with_capacity(documents.len());
        for doc in documents {
            let summary = self.model.complete(&summary_prompt(doc)).await?;
            debug!(title = %doc.title, chars = summary.chars().count(), "document summarized");
            blocks.push(format_block(doc, summary.trim()));
        }
        Ok(blocks)
    }
}
