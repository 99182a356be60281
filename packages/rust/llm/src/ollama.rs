//! Ollama `/api/generate` client.

use std::time::Duration;

use reqwest::Client;
use serde::{Deserialize, Serialize};
use tracing::{debug, instrument};

use articlecast_shared::{ArticlecastError, ModelConfig, Result, truncate_body};

use crate::LanguageModel;

const USER_AGENT: &str = concat!("Articlecast/", env!("CARGO_PKG_VERSION"));

#[derive(Debug, Serialize)]
struct GenerateRequest<'a> {
    model: &'a str,
    prompt: &'a str,
    stream: bool,
    options: GenerateOptions,
}

#[derive(Debug, Serialize)]
struct GenerateOptions {
    temperature: f32,
}

#[derive(Debug, Deserialize)]
struct GenerateResponse {
    response: String,
}

/// Non-streaming client for a local or remote Ollama server.
#[derive(Debug, Clone)]
pub struct OllamaModel {
    client: Client,
    base_url: String,
    model: String,
    temperature: f32,
}

impl OllamaModel {
    pub fn new(config: &ModelConfig) -> Result<Self> {
        let client = Client::builder()
            .user_agent(USER_AGENT)
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(|e| ArticlecastError::Model(format!("failed to build HTTP client: {e}")))?;

        Ok(Self {
            client,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            model: config.model.clone(),
            temperature: config.temperature,
        })
    }

    fn generate_url(&self) -> String {
        format!("{}/api/generate", self.base_url)
    }
}

#[async_trait::async_trait]
impl LanguageModel for OllamaModel {
    fn name(&self) -> &str {
        &self.model
    }

    #[instrument(skip_all, fields(model = %self.model, prompt_chars = prompt.len()))]
    async fn complete(&self, prompt: &str) -> Result<String> {
        let request = GenerateRequest {
            model: &self.model,
            prompt,
            stream: false,
            options: GenerateOptions {
                temperature: self.temperature,
            },
        };

        let resp = self
            .client
            .post(self.generate_url())
            .json(&request)
            .send()
            .await
            .map_err(|e| ArticlecastError::Model(format!("{}: {e}", self.generate_url())))?;

        let status = resp.status();
        if !status.is_success() {
            let body = resp.text().await.unwrap_or_default();
            return Err(ArticlecastError::Model(format!(
                "HTTP {status} from {}: {}",
                self.generate_url(),
                truncate_body(&body, 200)
            )));
        }

        let body: GenerateResponse = resp
            .json()
            .await
            .map_err(|e| ArticlecastError::Model(format!("invalid generate response: {e}")))?;

        debug!(response_chars = body.response.len(), "model completion received");
        Ok(body.response)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use wiremock::matchers::{body_partial_json, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn config_for(server: &MockServer) -> ModelConfig {
        ModelConfig {
            base_url: format!("{}/", server.uri()),
            ..ModelConfig::default()
        }
    }

    #[tokio::test]
    async fn complete_posts_non_streaming_request() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/api/generate"))
            .and(body_partial_json(serde_json::json!({
                "model": "qwen2.5:latest",
                "prompt": "Say hi",
                "stream": false,
                "options": { "temperature": 0.0 }
            })))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "model": "qwen2.5:latest",
                "response": "hi",
                "done": true
            })))
            .expect(1)
            .mount(&server)
            .await;

        let model = OllamaModel::new(&config_for(&server)).unwrap();
        let out = model.complete("Say hi").await.unwrap();
        assert_eq!(out, "hi");
        assert_eq!(model.name(), "qwen2.5:latest");
    }

    #[tokio::test]
    async fn complete_maps_error_status() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/api/generate"))
            .respond_with(ResponseTemplate::new(404).set_body_string("model not found"))
            .mount(&server)
            .await;

        let model = OllamaModel::new(&config_for(&server)).unwrap();
        let err = model.complete("Say hi").await.unwrap_err();
        assert!(matches!(err, ArticlecastError::Model(_)));
        assert!(err.to_string().contains("model not found"));
    }

    #[tokio::test]
    async fn complete_rejects_malformed_body() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/api/generate"))
            .respond_with(ResponseTemplate::new(200).set_body_string("not json"))
            .mount(&server)
            .await;

        let model = OllamaModel::new(&config_for(&server)).unwrap();
        let err = model.complete("x").await.unwrap_err();
        assert!(err.to_string().contains("invalid generate response"));
    }
}
