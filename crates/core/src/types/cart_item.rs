//! Cart line items.

use serde::{Deserialize, Serialize};

use super::{Price, Product, ProductId};

/// A line in the cart.
///
/// Cart items are a point-in-time copy of the product, not a live reference
/// to it. `name`, `price`, `main_image_url` and `stock` are captured when the
/// item is added and are never re-synced, so a cart stays usable if the
/// catalog changes mid-session.
///
/// The cart keeps `1 <= quantity <= stock` after every mutation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CartItem {
    pub id: ProductId,
    pub name: String,
    pub price: Price,
    #[serde(default)]
    pub main_image_url: String,
    pub stock: u32,
    pub quantity: u32,
}

impl CartItem {
    /// Snapshot `product` into a line item holding `quantity` units.
    #[must_use]
    pub fn from_product(product: &Product, quantity: u32) -> Self {
        Self {
            id: product.id,
            name: product.name.clone(),
            price: product.price,
            main_image_url: product.main_image_url.clone(),
            stock: product.stock,
            quantity,
        }
    }

    /// `price * quantity`.
    #[must_use]
    pub fn line_total(&self) -> Price {
        self.price.times(self.quantity)
    }

    /// Clamp a requested quantity into `[1, stock]`.
    ///
    /// Returns `None` when no legal quantity exists (stock is zero).
    #[must_use]
    pub fn clamp_quantity(&self, requested: i64) -> Option<u32> {
        if self.stock == 0 {
            return None;
        }
        let clamped = requested.clamp(1, i64::from(self.stock));
        u32::try_from(clamped).ok()
    }
}
