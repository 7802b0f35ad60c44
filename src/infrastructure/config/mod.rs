//! Configuration management
//!
//! Values come from an optional `config.yaml` file with environment
//! variables layered on top; the environment wins. `BOT_TOKEN` and
//! `ADMIN_CHAT_ID` are required and validated before the bot starts.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

use crate::application::errors::ConfigError;

/// Shop bot configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(rename_all = "kebab-case")]
pub struct Config {
    pub bot: BotConfig,
    pub storage: StorageConfig,
    pub shop: ShopConfig,
    pub http: HttpConfig,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(rename_all = "kebab-case")]
pub struct BotConfig {
    /// Telegram bot token; startup is fatal without one
    pub token: Option<String>,
    /// Numeric id of the single administrator
    pub admin_chat_id: Option<i64>,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(rename_all = "kebab-case")]
pub struct StorageConfig {
    pub db_path: PathBuf,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(rename_all = "kebab-case")]
pub struct ShopConfig {
    /// Externally-hosted promo image; overrides the stored photo file id
    pub photo_url: Option<String>,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(rename_all = "kebab-case")]
pub struct HttpConfig {
    /// Liveness probe port; the endpoint is only bound when set
    pub port: Option<u16>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            bot: BotConfig {
                token: None,
                admin_chat_id: None,
            },
            storage: StorageConfig {
                db_path: PathBuf::from("shop.db"),
            },
            shop: ShopConfig { photo_url: None },
            http: HttpConfig { port: None },
        }
    }
}

impl Config {
    pub fn load(path: impl Into<PathBuf>) -> Result<Self, ConfigError> {
        let path = path.into();
        let content =
            std::fs::read_to_string(&path).map_err(|e| ConfigError::Parse(e.to_string()))?;
        serde_yaml::from_str(&content).map_err(|e| ConfigError::Parse(e.to_string()))
    }

    pub fn save(&self, path: impl Into<PathBuf>) -> Result<(), ConfigError> {
        let content =
            serde_yaml::to_string(self).map_err(|e| ConfigError::Parse(e.to_string()))?;
        std::fs::write(path.into(), content).map_err(|e| ConfigError::Parse(e.to_string()))
    }

    /// Layer environment variables over the current values
    pub fn apply_env(&mut self) -> Result<(), ConfigError> {
        if let Ok(token) = std::env::var("BOT_TOKEN") {
            self.bot.token = Some(token);
        }
        if let Ok(raw) = std::env::var("ADMIN_CHAT_ID") {
            let id = raw.parse().map_err(|_| {
                ConfigError::InvalidValue(format!("ADMIN_CHAT_ID must be numeric, got '{}'", raw))
            })?;
            self.bot.admin_chat_id = Some(id);
        }
        if let Ok(path) = std::env::var("DB_PATH") {
            self.storage.db_path = PathBuf::from(path);
        }
        if let Ok(url) = std::env::var("PHOTO_URL") {
            self.shop.photo_url = Some(url);
        }
        if let Ok(raw) = std::env::var("PORT") {
            let port = raw.parse().map_err(|_| {
                ConfigError::InvalidValue(format!("PORT must be a port number, got '{}'", raw))
            })?;
            self.http.port = Some(port);
        }
        Ok(())
    }

    /// Check that the required settings are present
    pub fn validate(&self) -> Result<ValidConfig, ConfigError> {
        let token = self
            .bot
            .token
            .clone()
            .filter(|t| !t.is_empty())
            .ok_or_else(|| ConfigError::MissingField("BOT_TOKEN".to_string()))?;
        let admin_chat_id = self
            .bot
            .admin_chat_id
            .ok_or_else(|| ConfigError::MissingField("ADMIN_CHAT_ID".to_string()))?;

        Ok(ValidConfig {
            token,
            admin_chat_id,
            db_path: self.storage.db_path.clone(),
            photo_url: self.shop.photo_url.clone(),
            port: self.http.port,
        })
    }
}

/// Configuration after validation, with the required fields guaranteed
#[derive(Debug, Clone)]
pub struct ValidConfig {
    pub token: String,
    pub admin_chat_id: i64,
    pub db_path: PathBuf,
    pub photo_url: Option<String>,
    pub port: Option<u16>,
}
