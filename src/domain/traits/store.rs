use async_trait::async_trait;
use std::collections::HashMap;

use crate::application::errors::StorageError;
use crate::domain::entities::{CartAdjustment, CheckoutOutcome, ProductId};

/// ShopStore trait - abstraction over the inventory and cart persistence.
///
/// Every mutating operation is atomic with respect to concurrent callers:
/// the clamp is computed from reads taken inside the same read-modify-write
/// unit as the write, never from a snapshot supplied by the caller.
#[async_trait]
pub trait ShopStore: Send + Sync {
    /// Snapshot of available quantity per product
    async fn stock(&self) -> Result<HashMap<ProductId, i64>, StorageError>;

    /// Snapshot of a user's cart; empty map when the user has none
    async fn cart(&self, user_id: i64) -> Result<HashMap<ProductId, i64>, StorageError>;

    /// Apply `delta` to a cart line, clamping the result into
    /// `0..=available_stock`. The line is deleted when it reaches zero.
    async fn adjust_cart_line(
        &self,
        user_id: i64,
        product_id: ProductId,
        delta: i64,
    ) -> Result<CartAdjustment, StorageError>;

    /// Delete every cart line of the user; no error when already empty
    async fn clear_cart(&self, user_id: i64) -> Result<(), StorageError>;

    /// Convert the cart into committed order lines, decrementing stock and
    /// clearing the cart in one transaction. Lines whose stock shrank since
    /// they were added are clamped down; lines clamped to zero are dropped
    /// without aborting the rest of the order.
    async fn checkout(&self, user_id: i64) -> Result<CheckoutOutcome, StorageError>;

    /// Administrative absolute stock override
    async fn set_stock(&self, product_id: ProductId, qty: i64) -> Result<(), StorageError>;

    /// Administrative relative stock adjustment, clamped to non-negative;
    /// returns the resulting quantity
    async fn add_stock(&self, product_id: ProductId, delta: i64) -> Result<i64, StorageError>;

    /// Read a settings value
    async fn setting(&self, key: &str) -> Result<Option<String>, StorageError>;

    /// Upsert a settings value
    async fn set_setting(&self, key: &str, value: &str) -> Result<(), StorageError>;
}
