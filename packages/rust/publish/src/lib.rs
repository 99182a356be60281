//! Delivery of the final message to a messaging channel.
//!
//! [`TelegramPublisher`] posts to a Telegram channel through the Bot API.
//! [`DryRunPublisher`] only logs, for local runs without a bot.

mod telegram;

pub use telegram::TelegramPublisher;

use tracing::info;

use articlecast_shared::Result;

/// One-shot message delivery to a fixed target.
#[async_trait::async_trait]
pub trait Publisher: Send + Sync {
    async fn publish(&self, text: &str) -> Result<()>;
}

/// Publisher that logs the message instead of sending it.
#[derive(Debug, Default, Clone, Copy)]
pub struct DryRunPublisher;

#[async_trait::async_trait]
impl Publisher for DryRunPublisher {
    async fn publish(&self, text: &str) -> Result<()> {
        info!(chars = text.chars().count(), "dry run, message not sent");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn dry_run_always_succeeds() {
        assert!(DryRunPublisher.publish("hello").await.is_ok());
    }
}
