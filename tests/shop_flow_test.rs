//! End-to-end dispatch tests with a recording chat adapter
//! Run with: cargo test --test shop_flow_test

use async_trait::async_trait;
use std::sync::{Arc, Mutex};

use chaser_shop_bot::application::errors::BotError;
use chaser_shop_bot::application::messaging::{Caller, ShopDispatcher};
use chaser_shop_bot::application::services::ShopService;
use chaser_shop_bot::domain::traits::{Bot, BotInfo, KeyboardButton};
use chaser_shop_bot::infrastructure::database::SqliteStore;

const ADMIN_ID: i64 = 1000;
const SHOPPER_ID: i64 = 7;

/// Chat adapter double that records outbound traffic
#[derive(Default)]
struct RecordingBot {
    sent: Mutex<Vec<(i64, String)>>,
    edits: Mutex<Vec<(i64, String)>>,
    alerts: Mutex<Vec<Option<String>>>,
    /// Sends to this chat fail, simulating an unreachable administrator
    fail_chat: Option<i64>,
}

impl RecordingBot {
    fn sent_to(&self, chat_id: i64) -> Vec<String> {
        self.sent
            .lock()
            .unwrap()
            .iter()
            .filter(|(id, _)| *id == chat_id)
            .map(|(_, text)| text.clone())
            .collect()
    }

    fn edits_in(&self, chat_id: i64) -> Vec<String> {
        self.edits
            .lock()
            .unwrap()
            .iter()
            .filter(|(id, _)| *id == chat_id)
            .map(|(_, text)| text.clone())
            .collect()
    }

    fn alerts(&self) -> Vec<Option<String>> {
        self.alerts.lock().unwrap().clone()
    }
}

#[async_trait]
impl Bot for RecordingBot {
    async fn send_message(&self, chat_id: i64, text: &str) -> Result<i64, BotError> {
        if self.fail_chat == Some(chat_id) {
            return Err(BotError::Network("chat unreachable".to_string()));
        }
        self.sent.lock().unwrap().push((chat_id, text.to_string()));
        Ok(1)
    }

    async fn send_with_keyboard(
        &self,
        chat_id: i64,
        text: &str,
        _buttons: &[Vec<KeyboardButton>],
    ) -> Result<i64, BotError> {
        self.send_message(chat_id, text).await
    }

    async fn edit_with_keyboard(
        &self,
        chat_id: i64,
        _message_id: i64,
        text: &str,
        _buttons: &[Vec<KeyboardButton>],
    ) -> Result<(), BotError> {
        self.edits.lock().unwrap().push((chat_id, text.to_string()));
        Ok(())
    }

    async fn send_photo(
        &self,
        chat_id: i64,
        _photo: &str,
        caption: &str,
        _buttons: &[Vec<KeyboardButton>],
    ) -> Result<i64, BotError> {
        self.send_message(chat_id, caption).await
    }

    async fn edit_photo(
        &self,
        chat_id: i64,
        message_id: i64,
        _photo: &str,
        caption: &str,
        buttons: &[Vec<KeyboardButton>],
    ) -> Result<(), BotError> {
        self.edit_with_keyboard(chat_id, message_id, caption, buttons)
            .await
    }

    async fn answer_callback(
        &self,
        _callback_id: &str,
        text: Option<&str>,
    ) -> Result<(), BotError> {
        self.alerts
            .lock()
            .unwrap()
            .push(text.map(|t| t.to_string()));
        Ok(())
    }

    fn bot_info(&self) -> BotInfo {
        BotInfo {
            id: 0,
            name: "test".to_string(),
            username: "test_bot".to_string(),
        }
    }
}

struct Fixture {
    bot: Arc<RecordingBot>,
    store: Arc<SqliteStore>,
    dispatcher: ShopDispatcher,
}

fn fixture() -> Fixture {
    fixture_with_bot(RecordingBot::default())
}

fn fixture_with_bot(bot: RecordingBot) -> Fixture {
    let bot = Arc::new(bot);
    let store = Arc::new(SqliteStore::open_in_memory().expect("in-memory store"));
    let service = ShopService::new(store.clone(), None);
    let dispatcher = ShopDispatcher::new(bot.clone(), service, ADMIN_ID);
    Fixture {
        bot,
        store,
        dispatcher,
    }
}

fn shopper() -> Caller {
    Caller {
        user_id: SHOPPER_ID,
        chat_id: SHOPPER_ID,
        username: Some("vapelord".to_string()),
    }
}

fn admin() -> Caller {
    Caller {
        user_id: ADMIN_ID,
        chat_id: ADMIN_ID,
        username: None,
    }
}

#[tokio::test]
async fn start_shows_the_flavor_menu() {
    let fx = fixture();
    fx.dispatcher
        .handle_text(&shopper(), "/start", None)
        .await
        .expect("handle /start");

    let sent = fx.bot.sent_to(SHOPPER_ID);
    assert_eq!(sent, vec!["Оберіть смак Chaser 30 мл:".to_string()]);
}

#[tokio::test]
async fn unknown_command_gets_a_short_reply() {
    let fx = fixture();
    fx.dispatcher
        .handle_text(&shopper(), "/frobnicate", None)
        .await
        .expect("handle command");

    assert_eq!(fx.bot.sent_to(SHOPPER_ID), vec!["Невідома команда.".to_string()]);
}

#[tokio::test]
async fn admin_commands_are_gated_on_exact_id() {
    use chaser_shop_bot::domain::traits::ShopStore;

    let fx = fixture();

    // Non-admin: silently ignored, stock untouched
    fx.dispatcher
        .handle_text(&shopper(), "/setstock 1 10", None)
        .await
        .expect("non-admin setstock");
    assert!(fx.bot.sent_to(SHOPPER_ID).is_empty());
    assert_eq!(fx.store.stock().await.unwrap()[&1], 5);

    // Admin: applied and confirmed
    fx.dispatcher
        .handle_text(&admin(), "/setstock 1 10", None)
        .await
        .expect("admin setstock");
    assert_eq!(
        fx.bot.sent_to(ADMIN_ID),
        vec!["Оновлено склад для ЧЕРЕШНЯ → 10".to_string()]
    );
    assert_eq!(fx.store.stock().await.unwrap()[&1], 10);

    // Non-admin retry after the admin change: still ignored
    fx.dispatcher
        .handle_text(&shopper(), "/setstock 1 99", None)
        .await
        .expect("non-admin setstock again");
    assert_eq!(fx.store.stock().await.unwrap()[&1], 10);
}

#[tokio::test]
async fn admin_setstock_validates_arguments() {
    let fx = fixture();
    let cases = [
        ("/setstock", "Використання: /setstock <id> <qty>"),
        ("/setstock x y", "ID та qty мають бути числами."),
        ("/setstock 999 5", "Невірний ID смаку."),
        ("/setstock 1 -2", "qty має бути >= 0."),
    ];
    for (input, expected) in cases {
        fx.dispatcher
            .handle_text(&admin(), input, None)
            .await
            .expect("handle command");
        assert_eq!(fx.bot.sent_to(ADMIN_ID).last().unwrap(), expected);
    }
}

#[tokio::test]
async fn purchase_flow_notifies_the_admin() {
    use chaser_shop_bot::domain::traits::ShopStore;

    let fx = fixture();
    let caller = shopper();

    // Two presses on "add to cart", then checkout
    for _ in 0..2 {
        fx.dispatcher
            .handle_callback(&caller, 1, "cb", "cart:add:1")
            .await
            .expect("add to cart");
    }
    fx.dispatcher
        .handle_callback(&caller, 1, "cb", "cart:checkout")
        .await
        .expect("checkout");

    // Shopper sees the confirmation in place of the cart screen
    let edits = fx.bot.edits_in(SHOPPER_ID);
    assert_eq!(
        edits.last().unwrap(),
        "✅ Замовлення прийнято! Чекайте повідомлення від менеджера."
    );

    // Admin receives the structured order notification
    let notifications = fx.bot.sent_to(ADMIN_ID);
    assert_eq!(notifications.len(), 1);
    let text = &notifications[0];
    assert!(text.starts_with("Нове замовлення:"));
    assert!(text.contains(&format!("tg://user?id={}", SHOPPER_ID)));
    assert!(text.contains("username: vapelord"));
    assert!(text.contains("- ЧЕРЕШНЯ × 2"));

    // Stock decremented, cart cleared
    assert_eq!(fx.store.stock().await.unwrap()[&1], 3);
    assert!(fx.store.cart(SHOPPER_ID).await.unwrap().is_empty());
}

#[tokio::test]
async fn checkout_with_empty_cart_shows_the_cart() {
    let fx = fixture();
    fx.dispatcher
        .handle_callback(&shopper(), 1, "cb", "cart:checkout")
        .await
        .expect("checkout");

    let edits = fx.bot.edits_in(SHOPPER_ID);
    assert_eq!(edits.last().unwrap(), "Корзина порожня.");
    assert!(fx.bot.sent_to(ADMIN_ID).is_empty());
}

#[tokio::test]
async fn capped_add_raises_an_alert() {
    use chaser_shop_bot::domain::traits::ShopStore;

    let fx = fixture();
    fx.store.set_stock(1, 1).await.expect("set stock");

    let caller = shopper();
    fx.dispatcher
        .handle_callback(&caller, 1, "cb", "cart:add:1")
        .await
        .expect("first add");
    fx.dispatcher
        .handle_callback(&caller, 1, "cb", "cart:add:1")
        .await
        .expect("second add");

    let alerts = fx.bot.alerts();
    assert_eq!(alerts[0], None);
    assert_eq!(alerts[1].as_deref(), Some("Більше немає в наявності."));
}

#[tokio::test]
async fn failed_notification_keeps_the_order_and_warns_the_shopper() {
    use chaser_shop_bot::domain::traits::ShopStore;

    let fx = fixture_with_bot(RecordingBot {
        fail_chat: Some(ADMIN_ID),
        ..RecordingBot::default()
    });
    let caller = shopper();

    fx.dispatcher
        .handle_callback(&caller, 1, "cb", "cart:add:1")
        .await
        .expect("add to cart");
    fx.dispatcher
        .handle_callback(&caller, 1, "cb", "cart:checkout")
        .await
        .expect("checkout");

    // The business transaction stands: stock decremented, cart cleared
    assert_eq!(fx.store.stock().await.unwrap()[&1], 4);
    assert!(fx.store.cart(SHOPPER_ID).await.unwrap().is_empty());

    // The shopper is told the manager was not reached
    let sent = fx.bot.sent_to(SHOPPER_ID);
    assert_eq!(
        sent.last().unwrap(),
        "⚠️ Не вдалося сповістити менеджера, напишіть йому напряму."
    );
}

#[tokio::test]
async fn setphoto_requires_a_replied_photo() {
    let fx = fixture();

    fx.dispatcher
        .handle_text(&admin(), "/setphoto", None)
        .await
        .expect("setphoto without reply");
    assert_eq!(
        fx.bot.sent_to(ADMIN_ID).last().unwrap(),
        "Будь ласка, відповідайте на повідомлення з фото."
    );

    fx.dispatcher
        .handle_text(&admin(), "/setphoto", Some("photo-file-id"))
        .await
        .expect("setphoto with reply");
    assert_eq!(fx.bot.sent_to(ADMIN_ID).last().unwrap(), "Фото збережено.");

    // The stored reference now shows up on product cards
    fx.dispatcher
        .handle_callback(&shopper(), 1, "cb", "flavor:1")
        .await
        .expect("view product");
    let edits = fx.bot.edits_in(SHOPPER_ID);
    assert!(edits.last().unwrap().contains("ЧЕРЕШНЯ"));
}
