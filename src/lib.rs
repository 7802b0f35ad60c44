//! Telegram storefront for the Chaser 30 ml flavor range.
//!
//! The interesting logic is the inventory/cart store
//! ([`infrastructure::database::SqliteStore`]): clamped cart mutation and
//! the transactional checkout that cannot oversell. Everything else is
//! chat glue around it.

pub mod application;
pub mod domain;
pub mod infrastructure;
