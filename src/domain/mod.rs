//! Domain layer - Core business logic with no external dependencies
//!
//! This layer contains:
//! - Entities: Core business objects (Product, Intent, order outcomes)
//! - Traits: Abstractions for infrastructure (Bot, ShopStore)

pub mod entities;
pub mod traits;
