//! Domain entities - Core business objects with no external dependencies

pub mod intent;
pub mod order;
pub mod product;

pub use intent::Intent;
pub use order::{CartAdjustment, CheckoutOutcome, OrderLine};
pub use product::{Product, ProductId, ProductTag};
