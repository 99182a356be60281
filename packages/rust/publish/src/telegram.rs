//! Telegram Bot API `sendMessage` client.

use std::time::Duration;

use reqwest::Client;
use serde::{Deserialize, Serialize};
use tracing::{debug, instrument};

use articlecast_shared::{ArticlecastError, Result, TelegramConfig};

use crate::Publisher;

const USER_AGENT: &str = concat!("Articlecast/", env!("CARGO_PKG_VERSION"));

#[derive(Debug, Serialize)]
struct SendMessage<'a> {
    chat_id: &'a str,
    text: &'a str,
}

#[derive(Debug, Deserialize)]
struct ApiResponse {
    ok: bool,
    #[serde(default)]
    description: Option<String>,
}

pub struct TelegramPublisher {
    client: Client,
    api_base: String,
    bot_token: String,
    channel_id: String,
}

impl std::fmt::Debug for TelegramPublisher {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TelegramPublisher")
            .field("api_base", &self.api_base)
            .field("bot_token", &"<redacted>")
            .field("channel_id", &self.channel_id)
            .finish()
    }
}

impl TelegramPublisher {
    pub fn new(
        config: &TelegramConfig,
        bot_token: impl Into<String>,
        channel_id: impl Into<String>,
    ) -> Result<Self> {
        let client = Client::builder()
            .user_agent(USER_AGENT)
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(|e| ArticlecastError::Publish(format!("failed to build HTTP client: {e}")))?;

        Ok(Self {
            client,
            api_base: config.api_base.trim_end_matches('/').to_string(),
            bot_token: bot_token.into(),
            channel_id: channel_id.into(),
        })
    }

    fn send_message_url(&self) -> String {
        format!("{}/bot{}/sendMessage", self.api_base, self.bot_token)
    }
}

#[async_trait::async_trait]
impl Publisher for TelegramPublisher {
    #[instrument(skip_all, fields(channel = %self.channel_id, chars = text.chars().count()))]
    async fn publish(&self, text: &str) -> Result<()> {
        let resp = self
            .client
            .post(self.send_message_url())
            .json(&SendMessage {
                chat_id: &self.channel_id,
                text,
            })
            .send()
            .await
            // reqwest errors embed the URL, which contains the token.
            .map_err(|e| ArticlecastError::Publish(format!("request failed: {}", e.without_url())))?;

        let status = resp.status();
        let body: Option<ApiResponse> = resp.json().await.ok();

        match body {
            Some(ApiResponse { ok: true, .. }) if status.is_success() => {
                debug!("message delivered");
                Ok(())
            }
            Some(ApiResponse { description, .. }) => Err(ArticlecastError::Publish(format!(
                "HTTP {status}: {}",
                description.unwrap_or_else(|| "no description".into())
            ))),
            None => Err(ArticlecastError::Publish(format!(
                "HTTP {status}: unreadable response"
            ))),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use wiremock::matchers::{body_json, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn publisher_for(server: &MockServer) -> TelegramPublisher {
        let config = TelegramConfig {
            api_base: server.uri(),
            ..TelegramConfig::default()
        };
        TelegramPublisher::new(&config, "123:secret", "@articles").unwrap()
    }

    #[tokio::test]
    async fn publish_posts_send_message() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/bot123:secret/sendMessage"))
            .and(body_json(serde_json::json!({
                "chat_id": "@articles",
                "text": "hello channel"
            })))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "ok": true,
                "result": { "message_id": 7 }
            })))
            .expect(1)
            .mount(&server)
            .await;

        publisher_for(&server).publish("hello channel").await.unwrap();
    }

    #[tokio::test]
    async fn publish_surfaces_api_description() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(400).set_body_json(serde_json::json!({
                "ok": false,
                "error_code": 400,
                "description": "Bad Request: chat not found"
            })))
            .mount(&server)
            .await;

        let err = publisher_for(&server).publish("hi").await.unwrap_err();
        assert!(matches!(err, ArticlecastError::Publish(_)));
        assert!(err.to_string().contains("chat not found"));
        assert!(!err.to_string().contains("secret"));
    }

    #[tokio::test]
    async fn publish_rejects_ok_false_with_success_status() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(
                ResponseTemplate::new(200).set_body_json(serde_json::json!({ "ok": false })),
            )
            .mount(&server)
            .await;

        let err = publisher_for(&server).publish("hi").await.unwrap_err();
        assert!(err.to_string().contains("no description"));
    }

    #[tokio::test]
    async fn publish_transport_error_hides_token() {
        let config = TelegramConfig {
            // Nothing listens on port 9 (discard) locally.
            api_base: "http://127.0.0.1:9".into(),
            timeout_secs: 2,
            ..TelegramConfig::default()
        };
        let publisher = TelegramPublisher::new(&config, "123:secret", "@c").unwrap();

        let err = publisher.publish("hi").await.unwrap_err();
        assert!(!err.to_string().contains("secret"));
    }

    #[test]
    fn debug_redacts_token() {
        let publisher =
            TelegramPublisher::new(&TelegramConfig::default(), "123:secret", "@c").unwrap();
        assert!(!format!("{publisher:?}").contains("secret"));
    }
}
