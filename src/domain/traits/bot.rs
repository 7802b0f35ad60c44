use async_trait::async_trait;

use crate::application::errors::BotError;

/// Bot trait - abstraction for messaging platform adapters
#[async_trait]
pub trait Bot: Send + Sync {
    /// Send a plain text message to a chat
    async fn send_message(&self, chat_id: i64, text: &str) -> Result<i64, BotError>;

    /// Send a message with an inline keyboard
    async fn send_with_keyboard(
        &self,
        chat_id: i64,
        text: &str,
        buttons: &[Vec<KeyboardButton>],
    ) -> Result<i64, BotError>;

    /// Edit an existing message's text and keyboard in place
    async fn edit_with_keyboard(
        &self,
        chat_id: i64,
        message_id: i64,
        text: &str,
        buttons: &[Vec<KeyboardButton>],
    ) -> Result<(), BotError>;

    /// Send a photo message with caption and keyboard
    async fn send_photo(
        &self,
        chat_id: i64,
        photo: &str,
        caption: &str,
        buttons: &[Vec<KeyboardButton>],
    ) -> Result<i64, BotError>;

    /// Replace an existing message's media and caption in place
    async fn edit_photo(
        &self,
        chat_id: i64,
        message_id: i64,
        photo: &str,
        caption: &str,
        buttons: &[Vec<KeyboardButton>],
    ) -> Result<(), BotError>;

    /// Answer a callback query, optionally with an alert text
    async fn answer_callback(&self, callback_id: &str, text: Option<&str>) -> Result<(), BotError>;

    /// Get bot info
    fn bot_info(&self) -> BotInfo;
}

/// Keyboard button for inline keyboards
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KeyboardButton {
    pub text: String,
    pub callback_data: Option<String>,
}

impl KeyboardButton {
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            callback_data: None,
        }
    }

    pub fn with_callback(mut self, data: impl Into<String>) -> Self {
        self.callback_data = Some(data.into());
        self
    }
}

/// Bot information
#[derive(Debug, Clone)]
pub struct BotInfo {
    pub id: i64,
    pub name: String,
    pub username: String,
}
