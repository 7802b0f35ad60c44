//! Application services - Business logic orchestration

pub mod shop_service;
pub mod views;

pub use shop_service::ShopService;
pub use views::View;
