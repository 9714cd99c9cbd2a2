use anyhow::{Context, Result};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::{Path, PathBuf};
use tokio::fs;

pub const DEFAULT_LASTFM_URL: &str = "https://ws.audioscrobbler.com/2.0/";
pub const DEFAULT_TELEGRAM_URL: &str = "https://api.telegram.org";

#[derive(Deserialize, Debug, Clone)]
pub struct Config {
    pub api_credentials: ApiCredentials,
    pub user_credentials: UserCredentials,
    pub telegram: TelegramConfig,
    #[serde(default)]
    pub report: ReportConfig,
    #[serde(default)]
    pub endpoints: Endpoints,
}

#[derive(Deserialize, Clone)]
pub struct ApiCredentials {
    pub api_key: String,
    /// Only needed for signed (write) methods, which this tool never calls.
    #[serde(default)]
    pub api_secret: Option<String>,
}

impl fmt::Debug for ApiCredentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ApiCredentials")
            .field("api_key", &"<redacted>")
            .field("api_secret", &self.api_secret.as_ref().map(|_| "<redacted>"))
            .finish()
    }
}

#[derive(Deserialize, Debug, Clone)]
pub struct UserCredentials {
    pub username: String,
}

#[derive(Deserialize, Clone)]
pub struct TelegramConfig {
    pub bot_token: String,
    pub chat_id: ChatId,
}

impl fmt::Debug for TelegramConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TelegramConfig")
            .field("bot_token", &"<redacted>")
            .field("chat_id", &self.chat_id)
            .finish()
    }
}

/// Telegram accepts either a numeric chat id or an `@channelname`.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
#[serde(untagged)]
pub enum ChatId {
    Id(i64),
    Username(String),
}

impl fmt::Display for ChatId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ChatId::Id(id) => write!(f, "{id}"),
            ChatId::Username(name) => f.write_str(name),
        }
    }
}

#[derive(Deserialize, Debug, Clone)]
pub struct ReportConfig {
    #[serde(default = "default_from")]
    pub from: NaiveDate,
    #[serde(default = "default_output_dir")]
    pub output_dir: PathBuf,
}

impl Default for ReportConfig {
    fn default() -> Self {
        Self {
            from: default_from(),
            output_dir: default_output_dir(),
        }
    }
}

fn default_from() -> NaiveDate {
    NaiveDate::from_ymd_opt(2025, 1, 1).unwrap_or_default()
}

fn default_output_dir() -> PathBuf {
    PathBuf::from(".")
}

#[derive(Deserialize, Debug, Clone)]
pub struct Endpoints {
    #[serde(default = "default_lastfm_url")]
    pub lastfm: String,
    #[serde(default = "default_telegram_url")]
    pub telegram: String,
}

impl Default for Endpoints {
    fn default() -> Self {
        Self {
            lastfm: default_lastfm_url(),
            telegram: default_telegram_url(),
        }
    }
}

fn default_lastfm_url() -> String {
    DEFAULT_LASTFM_URL.to_string()
}

fn default_telegram_url() -> String {
    DEFAULT_TELEGRAM_URL.to_string()
}

impl Config {
    pub fn parse(content: &str) -> Result<Self> {
        toml::from_str(content).context("Failed to parse config file")
    }
}

pub async fn load_config(path: &Path) -> Result<Config> {
    let content = fs::read_to_string(path)
        .await
        .with_context(|| format!("Failed to read config file: {}", path.display()))?;

    Config::parse(&content)
}
