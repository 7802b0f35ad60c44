//! View building - message texts and inline keyboards for the shop screens

use chrono::Utc;
use std::collections::HashMap;

use crate::domain::entities::{product, OrderLine, Product, ProductId};
use crate::domain::traits::KeyboardButton;

/// A rendered screen: text (or photo caption) plus inline keyboard
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct View {
    pub text: String,
    pub keyboard: Vec<Vec<KeyboardButton>>,
    /// Promo image reference; when set the view is delivered as a photo
    pub photo: Option<String>,
}

impl View {
    pub fn text_only(text: impl Into<String>, keyboard: Vec<Vec<KeyboardButton>>) -> Self {
        Self {
            text: text.into(),
            keyboard,
            photo: None,
        }
    }
}

/// Main menu: one button per in-stock flavor, plus the cart
pub fn main_menu(stock: &HashMap<ProductId, i64>) -> View {
    let mut keyboard: Vec<Vec<KeyboardButton>> = product::CATALOG
        .iter()
        .filter(|p| stock.get(&p.id).copied().unwrap_or(0) > 0)
        .map(|p| {
            vec![KeyboardButton::new(p.name).with_callback(format!("flavor:{}", p.id))]
        })
        .collect();
    keyboard.push(vec![
        KeyboardButton::new("🧺 Корзина").with_callback("cart:view")
    ]);

    View::text_only("Оберіть смак Chaser 30 мл:", keyboard)
}

/// Product card: tagged name, description and remaining stock
pub fn product_card(product: &Product, stock_qty: i64, photo: Option<String>) -> View {
    let text = format!(
        "{}\n{}\nЗалишок: {}",
        product.tagged_name(),
        product.description,
        stock_qty
    );
    let keyboard = vec![
        vec![KeyboardButton::new("➕ В корзину").with_callback(format!("cart:add:{}", product.id))],
        vec![KeyboardButton::new("🧺 Корзина").with_callback("cart:view")],
        vec![KeyboardButton::new("⬅️ До смаків").with_callback("menu:main")],
    ];

    View {
        text,
        keyboard,
        photo,
    }
}

/// Cart screen with per-line inc/dec buttons
pub fn cart_view(cart: &HashMap<ProductId, i64>) -> View {
    let mut keyboard = Vec::new();
    // Render lines in catalog order so repeated refreshes look stable
    for p in product::CATALOG {
        if let Some(&qty) = cart.get(&p.id) {
            keyboard.push(vec![
                KeyboardButton::new("➖").with_callback(format!("cart:dec:{}", p.id)),
                KeyboardButton::new(format!("{} × {}", p.name, qty)).with_callback("noop"),
                KeyboardButton::new("➕").with_callback(format!("cart:inc:{}", p.id)),
            ]);
        }
    }
    keyboard.push(vec![
        KeyboardButton::new("✅ Оформити замовлення").with_callback("cart:checkout")
    ]);
    keyboard.push(vec![
        KeyboardButton::new("🗑 Очистити корзину").with_callback("cart:clear")
    ]);
    keyboard.push(vec![KeyboardButton::new("⬅️ Назад").with_callback("menu:main")]);

    View::text_only(cart_summary(cart), keyboard)
}

/// Text part of the cart screen
pub fn cart_summary(cart: &HashMap<ProductId, i64>) -> String {
    if cart.is_empty() {
        return "Корзина порожня.".to_string();
    }
    let mut lines = vec!["Ваші товари:".to_string()];
    for p in product::CATALOG {
        if let Some(&qty) = cart.get(&p.id) {
            lines.push(format!("- {} × {}", p.name, qty));
        }
    }
    lines.join("\n")
}

/// Confirmation shown to the shopper after a committed checkout
pub fn checkout_confirmation() -> String {
    "✅ Замовлення прийнято! Чекайте повідомлення від менеджера.".to_string()
}

/// Appended to the confirmation when the admin notification failed to send.
/// The order is already committed at that point and stays committed.
pub fn delivery_warning() -> String {
    "⚠️ Не вдалося сповістити менеджера, напишіть йому напряму.".to_string()
}

/// Structured order notification for the administrator
pub fn order_notification(user_id: i64, username: Option<&str>, lines: &[OrderLine]) -> String {
    let mut out = vec![
        "Нове замовлення:".to_string(),
        format!("Профіль: tg://user?id={}", user_id),
        format!("user_id: {}", user_id),
        format!("username: {}", username.unwrap_or("нема username")),
        format!("Час: {}", Utc::now().format("%Y-%m-%d %H:%M UTC")),
        "Позиції:".to_string(),
    ];
    for line in lines {
        out.push(format!("- {} × {}", product::product_name(line.product_id), line.qty));
    }
    out.join("\n")
}

/// Admin flavor listing (`/list`)
pub fn catalog_listing() -> String {
    let mut lines = vec!["Смаки:".to_string()];
    for p in product::CATALOG {
        lines.push(format!("{}: {}", p.id, p.name));
    }
    lines.join("\n")
}

/// Admin stock report (`/stock`)
pub fn stock_report(stock: &HashMap<ProductId, i64>) -> String {
    let mut lines = vec!["Склад:".to_string()];
    for p in product::CATALOG {
        let qty = stock.get(&p.id).copied().unwrap_or(0);
        lines.push(format!("{}: {} — {}", p.id, p.name, qty));
    }
    lines.join("\n")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn main_menu_hides_sold_out_flavors() {
        let mut stock = HashMap::new();
        stock.insert(1, 5);
        stock.insert(2, 0);

        let view = main_menu(&stock);
        // Flavor 1 plus the cart button
        assert_eq!(view.keyboard.len(), 2);
        assert_eq!(view.keyboard[0][0].text, "ЧЕРЕШНЯ");
        assert_eq!(
            view.keyboard[0][0].callback_data.as_deref(),
            Some("flavor:1")
        );
    }

    #[test]
    fn empty_cart_summary() {
        assert_eq!(cart_summary(&HashMap::new()), "Корзина порожня.");
    }

    #[test]
    fn cart_summary_lists_lines_in_catalog_order() {
        let mut cart = HashMap::new();
        cart.insert(6, 2);
        cart.insert(1, 3);

        let summary = cart_summary(&cart);
        assert_eq!(summary, "Ваші товари:\n- ЧЕРЕШНЯ × 3\n- ВИШНЯ × 2");
    }

    #[test]
    fn product_card_shows_tag_and_stock() {
        let p = product::find_product(2).unwrap();
        let view = product_card(p, 4, None);
        assert!(view.text.starts_with("[LIMITED] ГРЕЙПФРУТ"));
        assert!(view.text.ends_with("Залишок: 4"));
        assert!(view.photo.is_none());
    }

    #[test]
    fn notification_lists_order_lines() {
        let lines = vec![
            OrderLine { product_id: 1, qty: 2 },
            OrderLine { product_id: 5, qty: 1 },
        ];
        let text = order_notification(42, Some("vapelord"), &lines);
        assert!(text.contains("Профіль: tg://user?id=42"));
        assert!(text.contains("username: vapelord"));
        assert!(text.contains("- ЧЕРЕШНЯ × 2"));
        assert!(text.contains("- ВИНОГРАД × 1"));
    }

    #[test]
    fn notification_without_username() {
        let text = order_notification(42, None, &[]);
        assert!(text.contains("username: нема username"));
    }
}
