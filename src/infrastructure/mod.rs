//! Infrastructure layer - External concerns
//!
//! This layer contains:
//! - Config: Configuration loading
//! - Database: SQLite-backed inventory/cart store
//! - Adapters: Platform integrations (Telegram)
//! - Http: Liveness probe endpoint

pub mod adapters;
pub mod config;
pub mod database;
pub mod http;
