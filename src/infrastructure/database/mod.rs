//! SQLite-backed inventory and cart store
//!
//! One connection behind a mutex; every read-modify-write unit runs in a
//! `BEGIN IMMEDIATE` transaction so concurrent cart mutations and checkouts
//! on the same products serialize instead of racing on stale reads.

use async_trait::async_trait;
use rusqlite::{params, Connection, OptionalExtension, TransactionBehavior};
use std::collections::HashMap;
use std::path::Path;
use std::sync::{Mutex, MutexGuard};
use std::time::Duration;

use crate::application::errors::StorageError;
use crate::domain::entities::{product, CartAdjustment, CheckoutOutcome, OrderLine, ProductId};
use crate::domain::traits::ShopStore;

/// Quantity each product is seeded with on first run
pub const DEFAULT_SEED_QTY: i64 = 5;

const BUSY_TIMEOUT: Duration = Duration::from_secs(5);

/// SQLite store for stock, carts and settings
pub struct SqliteStore {
    conn: Mutex<Connection>,
}

impl SqliteStore {
    /// Open (or create) the database file and initialize the schema.
    /// Initialization is idempotent: tables are created if absent and
    /// stock is seeded only when the table is empty.
    pub fn open(path: impl AsRef<Path>) -> Result<Self, StorageError> {
        let conn = Connection::open(path)?;
        Self::from_connection(conn)
    }

    /// In-memory store for tests
    pub fn open_in_memory() -> Result<Self, StorageError> {
        let conn = Connection::open_in_memory()?;
        Self::from_connection(conn)
    }

    fn from_connection(conn: Connection) -> Result<Self, StorageError> {
        conn.busy_timeout(BUSY_TIMEOUT)?;
        // journal_mode returns a row, so query instead of execute
        let _mode: String = conn.query_row("PRAGMA journal_mode=WAL", [], |row| row.get(0))?;

        let store = Self {
            conn: Mutex::new(conn),
        };
        store.init_schema()?;
        Ok(store)
    }

    fn init_schema(&self) -> Result<(), StorageError> {
        let conn = self.lock();
        conn.execute(
            "CREATE TABLE IF NOT EXISTS stock (
                product_id INTEGER PRIMARY KEY,
                qty INTEGER NOT NULL
            )",
            [],
        )?;
        conn.execute(
            "CREATE TABLE IF NOT EXISTS carts (
                user_id INTEGER NOT NULL,
                product_id INTEGER NOT NULL,
                qty INTEGER NOT NULL,
                PRIMARY KEY (user_id, product_id)
            )",
            [],
        )?;
        conn.execute(
            "CREATE TABLE IF NOT EXISTS settings (
                key TEXT PRIMARY KEY,
                value TEXT NOT NULL
            )",
            [],
        )?;

        let existing: i64 = conn.query_row("SELECT COUNT(*) FROM stock", [], |row| row.get(0))?;
        if existing == 0 {
            let mut stmt =
                conn.prepare("INSERT INTO stock (product_id, qty) VALUES (?1, ?2)")?;
            for p in product::CATALOG {
                stmt.execute(params![p.id, DEFAULT_SEED_QTY])?;
            }
            tracing::info!(
                "Seeded stock for {} products at qty {}",
                product::CATALOG.len(),
                DEFAULT_SEED_QTY
            );
        }
        Ok(())
    }

    fn lock(&self) -> MutexGuard<'_, Connection> {
        // A poisoned lock only means another thread panicked mid-operation;
        // the transaction it held has rolled back, so the data is consistent
        self.conn.lock().unwrap_or_else(|e| e.into_inner())
    }

    fn ensure_known(product_id: ProductId) -> Result<(), StorageError> {
        if product::find_product(product_id).is_none() {
            return Err(StorageError::UnknownProduct(product_id));
        }
        Ok(())
    }

    fn stock_of(tx: &rusqlite::Transaction<'_>, product_id: ProductId) -> Result<i64, StorageError> {
        let qty = tx
            .query_row(
                "SELECT qty FROM stock WHERE product_id = ?1",
                [product_id],
                |row| row.get(0),
            )
            .optional()?;
        Ok(qty.unwrap_or(0))
    }
}

#[async_trait]
impl ShopStore for SqliteStore {
    async fn stock(&self) -> Result<HashMap<ProductId, i64>, StorageError> {
        let conn = self.lock();
        let mut stmt = conn.prepare("SELECT product_id, qty FROM stock")?;
        let rows = stmt.query_map([], |row| Ok((row.get(0)?, row.get(1)?)))?;
        let mut snapshot = HashMap::new();
        for row in rows {
            let (product_id, qty) = row?;
            snapshot.insert(product_id, qty);
        }
        Ok(snapshot)
    }

    async fn cart(&self, user_id: i64) -> Result<HashMap<ProductId, i64>, StorageError> {
        let conn = self.lock();
        let mut stmt = conn.prepare("SELECT product_id, qty FROM carts WHERE user_id = ?1")?;
        let rows = stmt.query_map([user_id], |row| Ok((row.get(0)?, row.get(1)?)))?;
        let mut cart = HashMap::new();
        for row in rows {
            let (product_id, qty) = row?;
            cart.insert(product_id, qty);
        }
        Ok(cart)
    }

    async fn adjust_cart_line(
        &self,
        user_id: i64,
        product_id: ProductId,
        delta: i64,
    ) -> Result<CartAdjustment, StorageError> {
        Self::ensure_known(product_id)?;

        let mut conn = self.lock();
        let tx = conn.transaction_with_behavior(TransactionBehavior::Immediate)?;

        let available = Self::stock_of(&tx, product_id)?;
        let current: i64 = tx
            .query_row(
                "SELECT qty FROM carts WHERE user_id = ?1 AND product_id = ?2",
                params![user_id, product_id],
                |row| row.get(0),
            )
            .optional()?
            .unwrap_or(0);

        let requested = current + delta;
        let new_qty = requested.clamp(0, available);

        if new_qty == 0 {
            tx.execute(
                "DELETE FROM carts WHERE user_id = ?1 AND product_id = ?2",
                params![user_id, product_id],
            )?;
        } else {
            tx.execute(
                "INSERT INTO carts (user_id, product_id, qty) VALUES (?1, ?2, ?3)
                 ON CONFLICT(user_id, product_id) DO UPDATE SET qty = excluded.qty",
                params![user_id, product_id, new_qty],
            )?;
        }
        tx.commit()?;

        Ok(CartAdjustment { requested, new_qty })
    }

    async fn clear_cart(&self, user_id: i64) -> Result<(), StorageError> {
        let conn = self.lock();
        conn.execute("DELETE FROM carts WHERE user_id = ?1", [user_id])?;
        Ok(())
    }

    async fn checkout(&self, user_id: i64) -> Result<CheckoutOutcome, StorageError> {
        let mut conn = self.lock();
        let tx = conn.transaction_with_behavior(TransactionBehavior::Immediate)?;

        let cart: Vec<(ProductId, i64)> = {
            let mut stmt =
                tx.prepare("SELECT product_id, qty FROM carts WHERE user_id = ?1")?;
            let rows = stmt.query_map([user_id], |row| Ok((row.get(0)?, row.get(1)?)))?;
            rows.collect::<Result<_, _>>()?
        };
        if cart.is_empty() {
            return Ok(CheckoutOutcome::EmptyCart);
        }

        // Re-validate against stock inside the transaction: another checkout
        // may have shrunk it since the lines were added. Shrunken lines are
        // clamped down, not rejected; fully sold-out lines are dropped.
        let mut lines = Vec::new();
        for (product_id, requested) in cart {
            let available = Self::stock_of(&tx, product_id)?;
            let qty = requested.min(available);
            if qty > 0 {
                tx.execute(
                    "UPDATE stock SET qty = qty - ?1 WHERE product_id = ?2",
                    params![qty, product_id],
                )?;
                lines.push(OrderLine { product_id, qty });
            }
        }
        tx.execute("DELETE FROM carts WHERE user_id = ?1", [user_id])?;
        tx.commit()?;

        Ok(CheckoutOutcome::Completed(lines))
    }

    async fn set_stock(&self, product_id: ProductId, qty: i64) -> Result<(), StorageError> {
        Self::ensure_known(product_id)?;
        let conn = self.lock();
        conn.execute(
            "INSERT INTO stock (product_id, qty) VALUES (?1, ?2)
             ON CONFLICT(product_id) DO UPDATE SET qty = excluded.qty",
            params![product_id, qty.max(0)],
        )?;
        Ok(())
    }

    async fn add_stock(&self, product_id: ProductId, delta: i64) -> Result<i64, StorageError> {
        Self::ensure_known(product_id)?;
        let mut conn = self.lock();
        let tx = conn.transaction_with_behavior(TransactionBehavior::Immediate)?;

        let current = Self::stock_of(&tx, product_id)?;
        let new_qty = (current + delta).max(0);
        tx.execute(
            "INSERT INTO stock (product_id, qty) VALUES (?1, ?2)
             ON CONFLICT(product_id) DO UPDATE SET qty = excluded.qty",
            params![product_id, new_qty],
        )?;
        tx.commit()?;

        Ok(new_qty)
    }

    async fn setting(&self, key: &str) -> Result<Option<String>, StorageError> {
        let conn = self.lock();
        let value = conn
            .query_row(
                "SELECT value FROM settings WHERE key = ?1",
                [key],
                |row| row.get(0),
            )
            .optional()?;
        Ok(value)
    }

    async fn set_setting(&self, key: &str, value: &str) -> Result<(), StorageError> {
        let conn = self.lock();
        conn.execute(
            "INSERT INTO settings (key, value) VALUES (?1, ?2)
             ON CONFLICT(key) DO UPDATE SET value = excluded.value",
            params![key, value],
        )?;
        Ok(())
    }
}
