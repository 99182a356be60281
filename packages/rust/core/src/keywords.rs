//! Keyword suggestion: query in, comma-separated keyword line out.

use std::sync::Arc;

use tracing::{info, instrument};

use articlecast_llm::LanguageModel;
use articlecast_shared::{Result, WorkflowState};

/// Build the keyword prompt for `query`.
pub fn keyword_prompt(query: &str) -> String {
    format!(
        "Suggest up to 3 search keywords related to the following query. \
         Return only a comma-separated list of keywords, without any additional text.\n\
         Example: machine learning, artificial intelligence, deep learning\n\
         Query: {query}\n\
         Keywords:"
    )
}

/// Keyword stage of the pipeline.
pub struct KeywordSuggester {
    model: Arc<dyn LanguageModel>,
}

impl KeywordSuggester {
    pub fn new(model: Arc<dyn LanguageModel>) -> Self {
        Self { model }
    }

    /// Ask the model for keywords and store its line verbatim (trimmed).
    ///
    /// Splitting happens in the search stage. Model errors propagate.
    #[instrument(skip_all, fields(query = %state.query, model = self.model.name()))]
    pub async fn suggest(&self, state: &WorkflowState) -> Result<WorkflowState> {
        let response = self.model.complete(&keyword_prompt(&state.query)).await?;
        let keywords = response.trim();

        info!(keywords, "keywords suggested");
        Ok(state.with_keywords(keywords))
    }
}
