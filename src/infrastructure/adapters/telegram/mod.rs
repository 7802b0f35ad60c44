//! Telegram adapter

use async_trait::async_trait;
use reqwest::Client;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

use crate::application::errors::BotError;
use crate::domain::traits::{Bot, BotInfo, KeyboardButton};

/// Telegram API base URL
const API_BASE: &str = "https://api.telegram.org";

/// Telegram update type
#[derive(Debug, Clone, Deserialize)]
pub struct Update {
    pub update_id: i64,
    pub message: Option<Message>,
    pub callback_query: Option<CallbackQuery>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Message {
    pub message_id: i64,
    pub from: Option<User>,
    pub chat: Chat,
    pub text: Option<String>,
    pub reply_to_message: Option<Box<Message>>,
    pub photo: Option<Vec<PhotoSize>>,
}

impl Message {
    /// File id of the largest photo attached to the message Telegram
    /// lists sizes smallest first
    pub fn largest_photo(&self) -> Option<&str> {
        self.photo
            .as_ref()
            .and_then(|sizes| sizes.last())
            .map(|p| p.file_id.as_str())
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct PhotoSize {
    pub file_id: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct User {
    pub id: i64,
    pub username: Option<String>,
    pub first_name: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Chat {
    pub id: i64,
}

#[derive(Debug, Clone, Deserialize)]
pub struct CallbackQuery {
    pub id: String,
    pub from: User,
    pub message: Option<Message>,
    pub data: Option<String>,
}

#[derive(Serialize)]
struct InlineKeyboardButton {
    text: String,
    callback_data: Option<String>,
}

#[derive(Serialize)]
struct ReplyMarkup {
    inline_keyboard: Vec<Vec<InlineKeyboardButton>>,
}

impl ReplyMarkup {
    fn from_buttons(buttons: &[Vec<KeyboardButton>]) -> Option<Self> {
        if buttons.is_empty() {
            return None;
        }
        Some(Self {
            inline_keyboard: buttons
                .iter()
                .map(|row| {
                    row.iter()
                        .map(|btn| InlineKeyboardButton {
                            text: btn.text.clone(),
                            callback_data: btn.callback_data.clone(),
                        })
                        .collect()
                })
                .collect(),
        })
    }
}

/// Telegram bot adapter, long-polling via getUpdates
pub struct TelegramAdapter {
    token: String,
    client: Client,
    info: BotInfo,
}

impl TelegramAdapter {
    pub fn new(token: impl Into<String>) -> Self {
        Self {
            token: token.into(),
            client: Client::new(),
            info: BotInfo {
                id: 0,
                name: "chaser-shop-bot".to_string(),
                username: "chaser_shop_bot".to_string(),
            },
        }
    }

    /// Get the API URL for a method
    fn api_url(&self, method: &str) -> String {
        format!("{}/bot{}/{}", API_BASE, self.token, method)
    }

    /// POST a method call and unwrap Telegram's `{ok, result}` envelope
    async fn call<T: DeserializeOwned>(
        &self,
        method: &str,
        request: &impl Serialize,
    ) -> Result<T, BotError> {
        #[derive(Deserialize)]
        struct Envelope<T> {
            result: T,
        }

        let response = self
            .client
            .post(self.api_url(method))
            .json(request)
            .send()
            .await
            .map_err(|e| BotError::Network(e.to_string()))?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(BotError::Network(format!(
                "Telegram API error on {}: {} {}",
                method, status, body
            )));
        }

        let data: Envelope<T> = response
            .json()
            .await
            .map_err(|e| BotError::Parse(e.to_string()))?;
        Ok(data.result)
    }

    /// Fetch bot info from the Telegram API
    pub async fn fetch_bot_info(&mut self) -> Result<(), BotError> {
        #[derive(Deserialize)]
        struct Me {
            id: i64,
            first_name: String,
            username: String,
        }

        let me: Me = self.call("getMe", &serde_json::json!({})).await?;
        self.info = BotInfo {
            id: me.id,
            name: me.first_name,
            username: me.username,
        };
        Ok(())
    }

    /// Long-poll for updates
    pub async fn get_updates(&self, offset: i64, timeout: i64) -> Result<Vec<Update>, BotError> {
        #[derive(Serialize)]
        struct GetUpdatesRequest {
            offset: i64,
            timeout: i64,
            allowed_updates: Vec<String>,
        }

        let request = GetUpdatesRequest {
            offset,
            timeout,
            allowed_updates: vec!["message".to_string(), "callback_query".to_string()],
        };
        self.call("getUpdates", &request).await
    }

    /// Next offset to acknowledge everything in `updates`
    pub fn get_next_offset(updates: &[Update], current: i64) -> i64 {
        updates
            .iter()
            .map(|u| u.update_id + 1)
            .max()
            .unwrap_or(current)
    }

    /// Register the public command menu with Telegram. Administrative
    /// commands are left out on purpose.
    pub async fn register_commands(&self) -> Result<(), BotError> {
        #[derive(Serialize)]
        struct Command {
            command: String,
            description: String,
        }

        #[derive(Serialize)]
        struct SetMyCommandsRequest {
            commands: Vec<Command>,
        }

        let request = SetMyCommandsRequest {
            commands: vec![Command {
                command: "start".to_string(),
                description: "Меню смаків".to_string(),
            }],
        };
        let _: bool = self.call("setMyCommands", &request).await?;
        tracing::info!("Registered bot commands with Telegram");
        Ok(())
    }
}

#[derive(Deserialize)]
struct MessageResult {
    message_id: i64,
}

#[async_trait]
impl Bot for TelegramAdapter {
    async fn send_message(&self, chat_id: i64, text: &str) -> Result<i64, BotError> {
        #[derive(Serialize)]
        struct SendMessageRequest<'a> {
            chat_id: i64,
            text: &'a str,
        }

        tracing::debug!("Sending to {}: {}", chat_id, text);
        let result: MessageResult = self
            .call("sendMessage", &SendMessageRequest { chat_id, text })
            .await?;
        Ok(result.message_id)
    }

    async fn send_with_keyboard(
        &self,
        chat_id: i64,
        text: &str,
        buttons: &[Vec<KeyboardButton>],
    ) -> Result<i64, BotError> {
        #[derive(Serialize)]
        struct SendMessageRequest<'a> {
            chat_id: i64,
            text: &'a str,
            #[serde(skip_serializing_if = "Option::is_none")]
            reply_markup: Option<ReplyMarkup>,
        }

        let result: MessageResult = self
            .call(
                "sendMessage",
                &SendMessageRequest {
                    chat_id,
                    text,
                    reply_markup: ReplyMarkup::from_buttons(buttons),
                },
            )
            .await?;
        Ok(result.message_id)
    }

    async fn edit_with_keyboard(
        &self,
        chat_id: i64,
        message_id: i64,
        text: &str,
        buttons: &[Vec<KeyboardButton>],
    ) -> Result<(), BotError> {
        #[derive(Serialize)]
        struct EditMessageTextRequest<'a> {
            chat_id: i64,
            message_id: i64,
            text: &'a str,
            #[serde(skip_serializing_if = "Option::is_none")]
            reply_markup: Option<ReplyMarkup>,
        }

        // editMessageText returns the edited message; we only need success
        let _: serde_json::Value = self
            .call(
                "editMessageText",
                &EditMessageTextRequest {
                    chat_id,
                    message_id,
                    text,
                    reply_markup: ReplyMarkup::from_buttons(buttons),
                },
            )
            .await?;
        Ok(())
    }

    async fn send_photo(
        &self,
        chat_id: i64,
        photo: &str,
        caption: &str,
        buttons: &[Vec<KeyboardButton>],
    ) -> Result<i64, BotError> {
        #[derive(Serialize)]
        struct SendPhotoRequest<'a> {
            chat_id: i64,
            photo: &'a str,
            caption: &'a str,
            #[serde(skip_serializing_if = "Option::is_none")]
            reply_markup: Option<ReplyMarkup>,
        }

        let result: MessageResult = self
            .call(
                "sendPhoto",
                &SendPhotoRequest {
                    chat_id,
                    photo,
                    caption,
                    reply_markup: ReplyMarkup::from_buttons(buttons),
                },
            )
            .await?;
        Ok(result.message_id)
    }

    async fn edit_photo(
        &self,
        chat_id: i64,
        message_id: i64,
        photo: &str,
        caption: &str,
        buttons: &[Vec<KeyboardButton>],
    ) -> Result<(), BotError> {
        #[derive(Serialize)]
        struct InputMediaPhoto<'a> {
            #[serde(rename = "type")]
            kind: &'a str,
            media: &'a str,
            caption: &'a str,
        }

        #[derive(Serialize)]
        struct EditMessageMediaRequest<'a> {
            chat_id: i64,
            message_id: i64,
            media: InputMediaPhoto<'a>,
            #[serde(skip_serializing_if = "Option::is_none")]
            reply_markup: Option<ReplyMarkup>,
        }

        let _: serde_json::Value = self
            .call(
                "editMessageMedia",
                &EditMessageMediaRequest {
                    chat_id,
                    message_id,
                    media: InputMediaPhoto {
                        kind: "photo",
                        media: photo,
                        caption,
                    },
                    reply_markup: ReplyMarkup::from_buttons(buttons),
                },
            )
            .await?;
        Ok(())
    }

    async fn answer_callback(&self, callback_id: &str, text: Option<&str>) -> Result<(), BotError> {
        #[derive(Serialize)]
        struct AnswerCallbackRequest<'a> {
            callback_query_id: &'a str,
            #[serde(skip_serializing_if = "Option::is_none")]
            text: Option<&'a str>,
            show_alert: bool,
        }

        let _: bool = self
            .call(
                "answerCallbackQuery",
                &AnswerCallbackRequest {
                    callback_query_id: callback_id,
                    text,
                    show_alert: text.is_some(),
                },
            )
            .await?;
        Ok(())
    }

    fn bot_info(&self) -> BotInfo {
        self.info.clone()
    }
}
