//! Shop service - orchestrates store operations and builds the screens

use std::sync::Arc;

use crate::application::errors::BotError;
use crate::application::services::views::{self, View};
use crate::domain::entities::{product, CartAdjustment, CheckoutOutcome, ProductId};
use crate::domain::traits::ShopStore;

/// Settings key holding the uploaded promo photo reference
pub const PHOTO_FILE_ID_KEY: &str = "PHOTO_FILE_ID";

/// Service tying the static catalog to the inventory/cart store
pub struct ShopService {
    store: Arc<dyn ShopStore>,
    /// Externally-hosted promo image; takes precedence over the stored one
    photo_url: Option<String>,
}

impl ShopService {
    pub fn new(store: Arc<dyn ShopStore>, photo_url: Option<String>) -> Self {
        Self { store, photo_url }
    }

    /// The flavor menu, listing only in-stock products
    pub async fn main_menu(&self) -> Result<View, BotError> {
        let stock = self.store.stock().await?;
        Ok(views::main_menu(&stock))
    }

    /// A single product card with current stock and the promo photo
    pub async fn product_view(&self, product_id: ProductId) -> Result<View, BotError> {
        let product = product::find_product(product_id)
            .ok_or_else(|| BotError::NotFound(format!("product {}", product_id)))?;
        let stock = self.store.stock().await?;
        let qty = stock.get(&product_id).copied().unwrap_or(0);
        let photo = self.photo_source().await?;
        Ok(views::product_card(product, qty, photo))
    }

    /// The user's cart screen
    pub async fn cart_view(&self, user_id: i64) -> Result<View, BotError> {
        let cart = self.store.cart(user_id).await?;
        Ok(views::cart_view(&cart))
    }

    /// Mutate one cart line by `delta`; the store clamps into valid range
    pub async fn adjust_cart_line(
        &self,
        user_id: i64,
        product_id: ProductId,
        delta: i64,
    ) -> Result<CartAdjustment, BotError> {
        let adjustment = self
            .store
            .adjust_cart_line(user_id, product_id, delta)
            .await?;
        Ok(adjustment)
    }

    pub async fn clear_cart(&self, user_id: i64) -> Result<(), BotError> {
        self.store.clear_cart(user_id).await?;
        Ok(())
    }

    /// Run the transactional checkout. The store commits (or not) atomically;
    /// notifying the administrator is the dispatcher's concern.
    pub async fn checkout(&self, user_id: i64) -> Result<CheckoutOutcome, BotError> {
        let outcome = self.store.checkout(user_id).await?;
        if let CheckoutOutcome::Completed(lines) = &outcome {
            tracing::info!(
                "Checkout committed for user {}: {} line(s)",
                user_id,
                lines.len()
            );
        }
        Ok(outcome)
    }

    /// Promo image reference: config URL first, stored file id second
    pub async fn photo_source(&self) -> Result<Option<String>, BotError> {
        if let Some(url) = &self.photo_url {
            return Ok(Some(url.clone()));
        }
        Ok(self.store.setting(PHOTO_FILE_ID_KEY).await?)
    }

    // Administrative operations

    pub async fn stock_report(&self) -> Result<String, BotError> {
        let stock = self.store.stock().await?;
        Ok(views::stock_report(&stock))
    }

    pub fn catalog_listing(&self) -> String {
        views::catalog_listing()
    }

    pub async fn set_stock(&self, product_id: ProductId, qty: i64) -> Result<String, BotError> {
        self.store.set_stock(product_id, qty).await?;
        Ok(format!(
            "Оновлено склад для {} → {}",
            product::product_name(product_id),
            qty
        ))
    }

    pub async fn add_stock(&self, product_id: ProductId, delta: i64) -> Result<String, BotError> {
        let qty = self.store.add_stock(product_id, delta).await?;
        Ok(format!(
            "Оновлено склад для {} → {}",
            product::product_name(product_id),
            qty
        ))
    }

    pub async fn set_promo_photo(&self, file_id: &str) -> Result<(), BotError> {
        self.store.set_setting(PHOTO_FILE_ID_KEY, file_id).await?;
        Ok(())
    }
}
