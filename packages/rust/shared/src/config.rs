//! Application configuration for Articlecast.
//!
//! User config lives at `~/.articlecast/articlecast.toml`.
//! Secrets never live in the file: each section names the environment
//! variable that holds its credential, and [`Secrets::from_env`] resolves
//! them once at startup.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::{ArticlecastError, Result};

/// Default configuration file name.
const CONFIG_FILE_NAME: &str = "articlecast.toml";

/// Default config directory name under the user's home.
const CONFIG_DIR_NAME: &str = ".articlecast";

/// Placeholder appended when the final message is truncated.
pub const TRUNCATION_PLACEHOLDER: &str = "... [read full article]";

// ---------------------------------------------------------------------------
// Config structs (matching articlecast.toml schema)
// ---------------------------------------------------------------------------

/// Top-level application config, deserialized from TOML.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AppConfig {
    /// Generative model service.
    #[serde(default)]
    pub model: ModelConfig,

    /// Web-search provider.
    #[serde(default)]
    pub search: SearchConfig,

    /// Telegram channel the final message is published to.
    #[serde(default)]
    pub telegram: TelegramConfig,

    /// Page fetching.
    #[serde(default)]
    pub fetch: FetchConfig,

    /// Pipeline limits.
    #[serde(default)]
    pub pipeline: PipelineConfig,
}

/// `[model]` section.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ModelConfig {
    /// Base URL of the Ollama server.
    #[serde(default = "default_model_base_url")]
    pub base_url: String,

    /// Model tag to generate with.
    #[serde(default = "default_model_name")]
    pub model: String,

    /// Sampling temperature.
    #[serde(default)]
    pub temperature: f32,

    /// Per-request timeout in seconds.
    #[serde(default = "default_model_timeout")]
    pub timeout_secs: u64,
}

impl Default for ModelConfig {
    fn default() -> Self {
        Self {
            base_url: default_model_base_url(),
            model: default_model_name(),
            temperature: 0.0,
            timeout_secs: default_model_timeout(),
        }
    }
}

fn default_model_base_url() -> String {
    "http://localhost:11434".into()
}
fn default_model_name() -> String {
    "qwen2.5:latest".into()
}
fn default_model_timeout() -> u64 {
    120
}

/// `[search]` section.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SearchConfig {
    /// Serper search endpoint.
    #[serde(default = "default_search_endpoint")]
    pub endpoint: String,

    /// Name of the env var holding the API key (never store the key itself).
    #[serde(default = "default_search_key_env")]
    pub api_key_env: String,

    #[serde(default = "default_http_timeout")]
    pub timeout_secs: u64,
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            endpoint: default_search_endpoint(),
            api_key_env: default_search_key_env(),
            timeout_secs: default_http_timeout(),
        }
    }
}

fn default_search_endpoint() -> String {
    "https://google.serper.dev/search".into()
}
fn default_search_key_env() -> String {
    "SERPER_API_KEY".into()
}
fn default_http_timeout() -> u64 {
    30
}

/// `[telegram]` section.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TelegramConfig {
    /// Bot API base URL.
    #[serde(default = "default_telegram_api_base")]
    pub api_base: String,

    /// Name of the env var holding the bot token.
    #[serde(default = "default_bot_token_env")]
    pub bot_token_env: String,

    /// Name of the env var holding the target channel id.
    #[serde(default = "default_channel_id_env")]
    pub channel_id_env: String,

    #[serde(default = "default_http_timeout")]
    pub timeout_secs: u64,
}

impl Default for TelegramConfig {
    fn default() -> Self {
        Self {
            api_base: default_telegram_api_base(),
            bot_token_env: default_bot_token_env(),
            channel_id_env: default_channel_id_env(),
            timeout_secs: default_http_timeout(),
        }
    }
}

fn default_telegram_api_base() -> String {
    "https://api.telegram.org".into()
}
fn default_bot_token_env() -> String {
    "TELEGRAM_BOT_TOKEN".into()
}
fn default_channel_id_env() -> String {
    "TELEGRAM_CHANNEL_ID".into()
}

/// `[fetch]` section.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FetchConfig {
    #[serde(default = "default_http_timeout")]
    pub timeout_secs: u64,

    /// Maximum redirects followed per page.
    #[serde(default = "default_max_redirects")]
    pub max_redirects: usize,

    /// Override for the `User-Agent` header.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub user_agent: Option<String>,
}

impl Default for FetchConfig {
    fn default() -> Self {
        Self {
            timeout_secs: default_http_timeout(),
            max_redirects: default_max_redirects(),
            user_agent: None,
        }
    }
}

fn default_max_redirects() -> usize {
    5
}

/// `[pipeline]` section.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PipelineConfig {
    /// Cap on URLs kept per source after dedup.
    #[serde(default = "default_max_urls")]
    pub max_urls_per_source: usize,

    /// Upper bound on the published message, in characters.
    #[serde(default = "default_max_message_chars")]
    pub max_message_chars: usize,

    /// Optional cap on the text of each loaded document before summarizing.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_document_chars: Option<usize>,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            max_urls_per_source: default_max_urls(),
            max_message_chars: default_max_message_chars(),
            max_document_chars: None,
        }
    }
}

fn default_max_urls() -> usize {
    3
}
fn default_max_message_chars() -> usize {
    4000
}

impl AppConfig {
    /// Check value ranges and URL schemes.
    pub fn validate(&self) -> Result<()> {
        if self.pipeline.max_urls_per_source == 0 {
            return Err(ArticlecastError::validation(
                "pipeline.max_urls_per_source must be at least 1",
            ));
        }

        let floor = TRUNCATION_PLACEHOLDER.chars().count();
        if self.pipeline.max_message_chars < floor {
            return Err(ArticlecastError::validation(format!(
                "pipeline.max_message_chars must be at least {floor}"
            )));
        }

        for (field, value) in [
            ("model.base_url", &self.model.base_url),
            ("search.endpoint", &self.search.endpoint),
            ("telegram.api_base", &self.telegram.api_base),
        ] {
            let parsed = url::Url::parse(value).map_err(|e| {
                ArticlecastError::validation(format!("{field} is not a valid URL: {e}"))
            })?;
            if !matches!(parsed.scheme(), "http" | "https") {
                return Err(ArticlecastError::validation(format!(
                    "{field} must use http or https"
                )));
            }
        }

        Ok(())
    }
}

// ---------------------------------------------------------------------------
// Secrets + runtime config
// ---------------------------------------------------------------------------

/// Credentials resolved from the environment.
#[derive(Clone)]
pub struct Secrets {
    pub serper_api_key: String,
    pub telegram_bot_token: String,
    pub telegram_channel_id: String,
}

impl std::fmt::Debug for Secrets {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Secrets")
            .field("serper_api_key", &"[REDACTED]")
            .field("telegram_bot_token", &"[REDACTED]")
            .field("telegram_channel_id", &self.telegram_channel_id)
            .finish()
    }
}

impl Secrets {
    /// Read every credential named in `config` from the process environment.
    ///
    /// Fails with a single error listing all missing or blank variables.
    pub fn from_env(config: &AppConfig) -> Result<Self> {
        Self::from_lookup(config, |name| std::env::var(name).ok())
    }

    /// Same as [`Secrets::from_env`] with a caller-supplied lookup.
    pub fn from_lookup(
        config: &AppConfig,
        lookup: impl Fn(&str) -> Option<String>,
    ) -> Result<Self> {
        let mut missing = Vec::new();
        let mut read = |name: &str| match lookup(name) {
            Some(v) if !v.trim().is_empty() => v.trim().to_string(),
            _ => {
                missing.push(name.to_string());
                String::new()
            }
        };

        let serper_api_key = read(&config.search.api_key_env);
        let telegram_bot_token = read(&config.telegram.bot_token_env);
        let telegram_channel_id = read(&config.telegram.channel_id_env);

        if !missing.is_empty() {
            return Err(ArticlecastError::config(format!(
                "missing required environment variables: {}",
                missing.join(", ")
            )));
        }

        Ok(Self {
            serper_api_key,
            telegram_bot_token,
            telegram_channel_id,
        })
    }
}

/// Everything the pipeline needs, assembled once at process start.
#[derive(Debug, Clone)]
pub struct RuntimeConfig {
    pub app: AppConfig,
    pub secrets: Secrets,
}

impl RuntimeConfig {
    /// Validate `app` and resolve its secrets from the environment.
    pub fn from_env(app: AppConfig) -> Result<Self> {
        app.validate()?;
        let secrets = Secrets::from_env(&app)?;
        Ok(Self { app, secrets })
    }
}

// ---------------------------------------------------------------------------
// Config loading
// ---------------------------------------------------------------------------

/// Get the path to the config directory (`~/.articlecast/`).
pub fn config_dir() -> Result<PathBuf> {
    let home = dirs::home_dir()
        .ok_or_else(|| ArticlecastError::config("could not determine home directory"))?;
    Ok(home.join(CONFIG_DIR_NAME))
}

/// Get the path to the config file (`~/.articlecast/articlecast.toml`).
pub fn config_file_path() -> Result<PathBuf> {
    Ok(config_dir()?.join(CONFIG_FILE_NAME))
}

/// Load the application config from disk. Returns defaults if the file does not exist.
pub fn load_config() -> Result<AppConfig> {
    let path = config_file_path()?;

    if !path.exists() {
        tracing::debug!(?path, "config file not found, using defaults");
        return Ok(AppConfig::default());
    }

    load_config_from(&path)
}

/// Load the application config from a specific file path.
pub fn load_config_from(path: &Path) -> Result<AppConfig> {
    let content = std::fs::read_to_string(path).map_err(|e| ArticlecastError::io(path, e))?;

    toml::from_str(&content).map_err(|e| {
        ArticlecastError::config(format!("failed to parse {}: {e}", path.display()))
    })
}

/// Create the config directory and write a default config file.
/// Refuses to overwrite an existing file. Returns the path to the created file.
pub fn init_config() -> Result<PathBuf> {
    init_config_in(&config_dir()?)
}

/// Write a default config file into `dir`.
pub fn init_config_in(dir: &Path) -> Result<PathBuf> {
    std::fs::create_dir_all(dir).map_err(|e| ArticlecastError::io(dir, e))?;

    let path = dir.join(CONFIG_FILE_NAME);
    if path.exists() {
        return Err(ArticlecastError::config(format!(
            "{} already exists",
            path.display()
        )));
    }

    let content = toml::to_string_pretty(&AppConfig::default())
        .map_err(|e| ArticlecastError::config(e.to_string()))?;

    std::fs::write(&path, content).map_err(|e| ArticlecastError::io(&path, e))?;
    tracing::info!(?path, "created default config file");

    Ok(path)
}
