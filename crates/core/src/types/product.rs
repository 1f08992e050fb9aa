//! Product records as returned by the upstream product service.

use serde::{Deserialize, Serialize};

use super::{Price, ProductId, ProductStatus};

/// A purchasable catalog product.
///
/// This is the shape the product lookup returns; the cart copies the display
/// fields out of it when an item is added (see [`crate::CartItem`]).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Product {
    pub id: ProductId,
    pub name: String,
    pub price: Price,
    #[serde(default)]
    pub main_image_url: String,
    /// Units currently available for sale.
    pub stock: u32,
    pub status: ProductStatus,
}

impl Product {
    /// Whether the product can be put in a cart right now.
    #[must_use]
    pub const fn is_available(&self) -> bool {
        self.status.is_purchasable() && self.stock > 0
    }
}
