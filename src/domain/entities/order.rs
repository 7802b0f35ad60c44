//! Order outcomes - results of cart mutation and checkout

use super::product::ProductId;

/// One committed line of an order
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OrderLine {
    pub product_id: ProductId,
    pub qty: i64,
}

/// Result of `checkout`. An empty cart is a no-op outcome, not an error;
/// storage failures use the error channel instead.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CheckoutOutcome {
    /// Stock decremented and cart cleared; lines clamped to zero are dropped
    Completed(Vec<OrderLine>),
    /// Nothing to do
    EmptyCart,
}

/// Result of `adjust_cart_line`. The stored quantity is the requested one
/// clamped into `0..=available_stock`; comparing the two tells the caller
/// whether the attempt was capped.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CartAdjustment {
    /// What the caller asked for (current + delta), before clamping
    pub requested: i64,
    /// What was actually persisted (0 means the line is gone)
    pub new_qty: i64,
}

impl CartAdjustment {
    pub fn capped(&self) -> bool {
        self.new_qty != self.requested
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn adjustment_detects_capping() {
        let full = CartAdjustment { requested: 3, new_qty: 3 };
        assert!(!full.capped());

        let capped = CartAdjustment { requested: 10, new_qty: 5 };
        assert!(capped.capped());

        let floored = CartAdjustment { requested: -1, new_qty: 0 };
        assert!(floored.capped());
    }
}
