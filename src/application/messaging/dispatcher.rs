//! Shop dispatcher - routes inbound actions to the service and replies

use std::sync::Arc;

use crate::application::errors::BotError;
use crate::application::messaging::parser::{self, ParsedCommand};
use crate::application::services::views::{self, View};
use crate::application::services::ShopService;
use crate::domain::entities::{product, CheckoutOutcome, Intent};
use crate::domain::traits::Bot;

/// Identity of the person behind an inbound action
#[derive(Debug, Clone)]
pub struct Caller {
    pub user_id: i64,
    pub chat_id: i64,
    pub username: Option<String>,
}

/// Where a rendered view should go
enum Target {
    /// New message in the chat
    Send,
    /// Edit the message the pressed keyboard is attached to
    Edit(i64),
}

/// Routes commands and callback presses to the shop service and renders
/// the results back through the chat adapter. Administrative commands are
/// gated on an exact user-id match; everyone else is ignored silently.
pub struct ShopDispatcher {
    bot: Arc<dyn Bot>,
    service: ShopService,
    admin_chat_id: i64,
}

impl ShopDispatcher {
    pub fn new(bot: Arc<dyn Bot>, service: ShopService, admin_chat_id: i64) -> Self {
        Self {
            bot,
            service,
            admin_chat_id,
        }
    }

    fn is_admin(&self, user_id: i64) -> bool {
        user_id == self.admin_chat_id
    }

    /// Handle a text message. `reply_photo` carries the file id of a photo
    /// the message replies to, which `/setphoto` captures.
    pub async fn handle_text(
        &self,
        caller: &Caller,
        text: &str,
        reply_photo: Option<&str>,
    ) -> Result<(), BotError> {
        let Some(command) = parser::parse_command(text) else {
            // Plain chatter is not part of the ordering flow
            return Ok(());
        };

        match command.name.as_str() {
            "start" => {
                let view = self.service.main_menu().await?;
                self.render(caller.chat_id, Target::Send, &view).await
            }
            "list" if self.is_admin(caller.user_id) => {
                let listing = self.service.catalog_listing();
                self.bot.send_message(caller.chat_id, &listing).await?;
                Ok(())
            }
            "stock" if self.is_admin(caller.user_id) => {
                let report = self.service.stock_report().await?;
                self.bot.send_message(caller.chat_id, &report).await?;
                Ok(())
            }
            "setstock" if self.is_admin(caller.user_id) => {
                self.handle_set_stock(caller, &command).await
            }
            "addstock" if self.is_admin(caller.user_id) => {
                self.handle_add_stock(caller, &command).await
            }
            "setphoto" if self.is_admin(caller.user_id) => {
                let reply = match reply_photo {
                    Some(file_id) => {
                        self.service.set_promo_photo(file_id).await?;
                        "Фото збережено.".to_string()
                    }
                    None => "Будь ласка, відповідайте на повідомлення з фото.".to_string(),
                };
                self.bot.send_message(caller.chat_id, &reply).await?;
                Ok(())
            }
            // Admin commands from non-admins fall through here and are
            // rejected without revealing that the command exists
            "list" | "stock" | "setstock" | "addstock" | "setphoto" => {
                tracing::debug!(
                    "Ignoring admin command /{} from user {}",
                    command.name,
                    caller.user_id
                );
                Ok(())
            }
            _ => {
                self.bot
                    .send_message(caller.chat_id, "Невідома команда.")
                    .await?;
                Ok(())
            }
        }
    }

    async fn handle_set_stock(
        &self,
        caller: &Caller,
        command: &ParsedCommand,
    ) -> Result<(), BotError> {
        let reply = match Self::parse_stock_args(command) {
            StockArgs::Usage => "Використання: /setstock <id> <qty>".to_string(),
            StockArgs::NotNumbers => "ID та qty мають бути числами.".to_string(),
            StockArgs::Parsed(id, qty) => {
                if product::find_product(id).is_none() {
                    "Невірний ID смаку.".to_string()
                } else if qty < 0 {
                    "qty має бути >= 0.".to_string()
                } else {
                    self.service.set_stock(id, qty).await?
                }
            }
        };
        self.bot.send_message(caller.chat_id, &reply).await?;
        Ok(())
    }

    async fn handle_add_stock(
        &self,
        caller: &Caller,
        command: &ParsedCommand,
    ) -> Result<(), BotError> {
        let reply = match Self::parse_stock_args(command) {
            StockArgs::Usage => "Використання: /addstock <id> <delta>".to_string(),
            StockArgs::NotNumbers => "ID та delta мають бути числами.".to_string(),
            StockArgs::Parsed(id, delta) => {
                if product::find_product(id).is_none() {
                    "Невірний ID смаку.".to_string()
                } else {
                    // Negative deltas are allowed; the store floors at zero
                    self.service.add_stock(id, delta).await?
                }
            }
        };
        self.bot.send_message(caller.chat_id, &reply).await?;
        Ok(())
    }

    fn parse_stock_args(command: &ParsedCommand) -> StockArgs {
        if command.args.len() != 2 {
            return StockArgs::Usage;
        }
        match (command.args[0].parse(), command.args[1].parse()) {
            (Ok(id), Ok(value)) => StockArgs::Parsed(id, value),
            _ => StockArgs::NotNumbers,
        }
    }

    /// Handle an inline-keyboard press
    pub async fn handle_callback(
        &self,
        caller: &Caller,
        message_id: i64,
        callback_id: &str,
        data: &str,
    ) -> Result<(), BotError> {
        let Some(intent) = parser::parse_callback(data) else {
            tracing::debug!("Dropping unrecognized callback data: {}", data);
            self.bot.answer_callback(callback_id, None).await?;
            return Ok(());
        };

        let target = Target::Edit(message_id);
        match intent {
            Intent::Noop => self.bot.answer_callback(callback_id, None).await,
            Intent::ViewCatalog => {
                self.bot.answer_callback(callback_id, None).await?;
                let view = self.service.main_menu().await?;
                self.render(caller.chat_id, target, &view).await
            }
            Intent::ViewProduct(id) => {
                self.bot.answer_callback(callback_id, None).await?;
                self.show_product(caller, target, id).await
            }
            Intent::ViewCart => {
                self.bot.answer_callback(callback_id, None).await?;
                let view = self.service.cart_view(caller.user_id).await?;
                self.render(caller.chat_id, target, &view).await
            }
            Intent::AddToCart(id) => {
                self.adjust_and_answer(caller, callback_id, id, 1).await?;
                self.show_product(caller, target, id).await
            }
            Intent::IncrementCartLine(id) => {
                self.adjust_and_answer(caller, callback_id, id, 1).await?;
                let view = self.service.cart_view(caller.user_id).await?;
                self.render(caller.chat_id, target, &view).await
            }
            Intent::DecrementCartLine(id) => {
                self.adjust_and_answer(caller, callback_id, id, -1).await?;
                let view = self.service.cart_view(caller.user_id).await?;
                self.render(caller.chat_id, target, &view).await
            }
            Intent::ClearCart => {
                self.bot.answer_callback(callback_id, None).await?;
                self.service.clear_cart(caller.user_id).await?;
                let view = self.service.cart_view(caller.user_id).await?;
                self.render(caller.chat_id, target, &view).await
            }
            Intent::Checkout => {
                self.bot.answer_callback(callback_id, None).await?;
                self.handle_checkout(caller, target).await
            }
        }
    }

    /// Apply a cart delta and answer the callback, alerting when the
    /// attempt was capped by available stock
    async fn adjust_and_answer(
        &self,
        caller: &Caller,
        callback_id: &str,
        product_id: u32,
        delta: i64,
    ) -> Result<(), BotError> {
        let adjustment = self
            .service
            .adjust_cart_line(caller.user_id, product_id, delta)
            .await?;
        let alert = if delta > 0 && adjustment.capped() {
            Some("Більше немає в наявності.")
        } else {
            None
        };
        self.bot.answer_callback(callback_id, alert).await
    }

    async fn show_product(
        &self,
        caller: &Caller,
        target: Target,
        product_id: u32,
    ) -> Result<(), BotError> {
        match self.service.product_view(product_id).await {
            Ok(view) => self.render(caller.chat_id, target, &view).await,
            Err(BotError::NotFound(_)) => {
                self.bot
                    .send_message(caller.chat_id, "Невірний ID смаку.")
                    .await?;
                Ok(())
            }
            Err(e) => Err(e),
        }
    }

    async fn handle_checkout(&self, caller: &Caller, target: Target) -> Result<(), BotError> {
        match self.service.checkout(caller.user_id).await? {
            CheckoutOutcome::EmptyCart => {
                let view = self.service.cart_view(caller.user_id).await?;
                self.render(caller.chat_id, target, &view).await
            }
            CheckoutOutcome::Completed(lines) => {
                let confirmation = views::checkout_confirmation();
                self.render(
                    caller.chat_id,
                    target,
                    &View::text_only(confirmation, Vec::new()),
                )
                .await?;

                // The order is committed; a failed notification must not
                // undo it. The shopper just gets a warning instead.
                let notification = views::order_notification(
                    caller.user_id,
                    caller.username.as_deref(),
                    &lines,
                );
                if let Err(e) = self
                    .bot
                    .send_message(self.admin_chat_id, &notification)
                    .await
                {
                    tracing::warn!("Failed to deliver order notification: {}", e);
                    let _ = self
                        .bot
                        .send_message(caller.chat_id, &views::delivery_warning())
                        .await;
                }
                Ok(())
            }
        }
    }

    /// Deliver a view, editing in place where possible. Telegram refuses
    /// edits that change the message kind (text vs photo), so a rejected
    /// edit falls back to a fresh message.
    async fn render(&self, chat_id: i64, target: Target, view: &View) -> Result<(), BotError> {
        match target {
            Target::Edit(message_id) => {
                let edited = match &view.photo {
                    Some(photo) => {
                        self.bot
                            .edit_photo(chat_id, message_id, photo, &view.text, &view.keyboard)
                            .await
                    }
                    None => {
                        self.bot
                            .edit_with_keyboard(chat_id, message_id, &view.text, &view.keyboard)
                            .await
                    }
                };
                if let Err(e) = edited {
                    tracing::debug!("Edit rejected ({}), sending a new message", e);
                    self.send_view(chat_id, view).await?;
                }
                Ok(())
            }
            Target::Send => {
                self.send_view(chat_id, view).await?;
                Ok(())
            }
        }
    }

    async fn send_view(&self, chat_id: i64, view: &View) -> Result<i64, BotError> {
        match &view.photo {
            Some(photo) => {
                self.bot
                    .send_photo(chat_id, photo, &view.text, &view.keyboard)
                    .await
            }
            None => {
                self.bot
                    .send_with_keyboard(chat_id, &view.text, &view.keyboard)
                    .await
            }
        }
    }
}

enum StockArgs {
    Usage,
    NotNumbers,
    Parsed(u32, i64),
}
