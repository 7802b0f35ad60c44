//! Integration tests for the file-backed store
//! Run with: cargo test --test store_test

use std::sync::Arc;

use tempfile::TempDir;

use chaser_shop_bot::domain::entities::{product, CheckoutOutcome};
use chaser_shop_bot::domain::traits::ShopStore;
use chaser_shop_bot::infrastructure::database::{SqliteStore, DEFAULT_SEED_QTY};

#[tokio::test]
async fn stock_persists_across_reopen() {
    let dir = TempDir::new().expect("temp dir");
    let path = dir.path().join("shop.db");

    {
        let store = SqliteStore::open(&path).expect("open store");
        store.set_stock(1, 42).await.expect("set stock");
        store.adjust_cart_line(7, 2, 3).await.expect("adjust cart");
    }

    let store = SqliteStore::open(&path).expect("reopen store");
    let stock = store.stock().await.expect("stock snapshot");
    assert_eq!(stock[&1], 42);

    let cart = store.cart(7).await.expect("cart snapshot");
    assert_eq!(cart[&2], 3);
}

#[tokio::test]
async fn reopen_does_not_reseed() {
    let dir = TempDir::new().expect("temp dir");
    let path = dir.path().join("shop.db");

    {
        let store = SqliteStore::open(&path).expect("open store");
        // Sell out one flavor entirely
        store.set_stock(1, 0).await.expect("set stock");
    }

    // Seeding is create-if-absent/seed-if-empty only; a zeroed row must
    // not bounce back to the default on restart
    let store = SqliteStore::open(&path).expect("reopen store");
    let stock = store.stock().await.expect("stock snapshot");
    assert_eq!(stock[&1], 0);
    assert_eq!(stock[&2], DEFAULT_SEED_QTY);
    assert_eq!(stock.len(), product::CATALOG.len());
}

/// The one bug class the store must rule out by construction: two
/// checkouts racing on the same product must never oversell it.
#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn concurrent_checkouts_never_oversell() {
    let dir = TempDir::new().expect("temp dir");
    let store = Arc::new(SqliteStore::open(dir.path().join("shop.db")).expect("open store"));

    let product_id = 1;
    let initial = DEFAULT_SEED_QTY; // 5

    // Each cart is individually within stock, but together they exceed it
    store
        .adjust_cart_line(100, product_id, 4)
        .await
        .expect("cart for user 100");
    store
        .adjust_cart_line(200, product_id, 3)
        .await
        .expect("cart for user 200");

    let a = {
        let store = store.clone();
        tokio::spawn(async move { store.checkout(100).await })
    };
    let b = {
        let store = store.clone();
        tokio::spawn(async move { store.checkout(200).await })
    };

    let mut committed = 0;
    for handle in [a, b] {
        match handle.await.expect("join").expect("checkout") {
            CheckoutOutcome::Completed(lines) => {
                committed += lines.iter().map(|l| l.qty).sum::<i64>();
            }
            CheckoutOutcome::EmptyCart => {}
        }
    }

    let remaining = store.stock().await.expect("stock snapshot")[&product_id];
    assert!(remaining >= 0, "stock went negative: {}", remaining);
    assert!(
        committed <= initial,
        "oversold: committed {} from stock {}",
        committed,
        initial
    );
    assert_eq!(committed + remaining, initial);

    // Both carts are gone either way
    assert!(store.cart(100).await.expect("cart").is_empty());
    assert!(store.cart(200).await.expect("cart").is_empty());
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn concurrent_increments_respect_the_stock_ceiling() {
    let dir = TempDir::new().expect("temp dir");
    let store = Arc::new(SqliteStore::open(dir.path().join("shop.db")).expect("open store"));
    store.set_stock(1, 3).await.expect("set stock");

    // Two shoppers hammer +1 on the same near-ceiling product
    let mut handles = Vec::new();
    for user_id in [100, 200] {
        for _ in 0..5 {
            let store = store.clone();
            handles.push(tokio::spawn(async move {
                store.adjust_cart_line(user_id, 1, 1).await
            }));
        }
    }
    for handle in handles {
        handle.await.expect("join").expect("adjust");
    }

    // Each cart individually clamped to available stock
    assert_eq!(store.cart(100).await.expect("cart")[&1], 3);
    assert_eq!(store.cart(200).await.expect("cart")[&1], 3);
}
