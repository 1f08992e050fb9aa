//! Snapshot handed to the order service at checkout.

use chrono::{DateTime, Utc};
use serde::Serialize;
use thiserror::Error;
use toolshed_core::{CartItem, Price};

/// Errors raised when preparing an order.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum OrderError {
    /// Checkout was requested with nothing in the cart.
    #[error("cart is empty")]
    EmptyCart,
}

/// Items and totals the order service consumes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderDraft {
    pub items: Vec<CartItem>,
    pub total: Price,
    pub item_count: u64,
    pub created_at: DateTime<Utc>,
}
