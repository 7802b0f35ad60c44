//! Inbound intents - what a button press or command resolves to

use super::product::ProductId;

/// Shopper-facing intents carried by inline-keyboard callback data.
/// Administrative commands are parsed separately by the dispatcher.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Intent {
    ViewCatalog,
    ViewProduct(ProductId),
    ViewCart,
    AddToCart(ProductId),
    IncrementCartLine(ProductId),
    DecrementCartLine(ProductId),
    ClearCart,
    Checkout,
    /// Inert button (the cart line label)
    Noop,
}
