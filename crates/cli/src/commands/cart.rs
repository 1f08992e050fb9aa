//! Cart subcommands.
//!
//! Each invocation mounts the cart from storage, applies one command and
//! exits; persistence happens inside the facade.

use toolshed_cart::{CartFacade, KeyValueStore, Notifier};
use toolshed_core::ProductId;
use tracing::info;

use super::CommandError;
use crate::catalog::Catalog;

/// Log every line and the totals.
pub fn show<S: KeyValueStore, N: Notifier>(cart: &CartFacade<S, N>) {
    if cart.cart_items().is_empty() {
        info!("Cart is empty");
        return;
    }

    for item in cart.cart_items() {
        info!(
            id = %item.id,
            "{} x {} @ {} = {}",
            item.quantity,
            item.name,
            item.price,
            item.line_total()
        );
    }
    info!(
        items = cart.cart_items_count(),
        "Total: {}",
        cart.cart_total()
    );
}

/// Add `quantity` units of catalog product `id`.
///
/// # Errors
///
/// Returns `CommandError::Rejected` if validation refused the add.
pub fn add<S: KeyValueStore, N: Notifier>(
    cart: &mut CartFacade<S, N>,
    catalog: &Catalog,
    id: ProductId,
    quantity: i64,
) -> Result<(), CommandError> {
    if cart.add_to_cart(catalog.get(id), quantity) {
        info!(
            %id,
            in_cart = cart.cart_item_quantity(id),
            "Cart now holds {} items",
            cart.cart_items_count()
        );
        Ok(())
    } else {
        Err(CommandError::Rejected(id))
    }
}

/// Remove product `id`.
pub fn remove<S: KeyValueStore, N: Notifier>(cart: &mut CartFacade<S, N>, id: ProductId) {
    if !cart.is_in_cart(id) {
        info!(%id, "Product not in cart");
    }
    cart.remove_from_cart(id);
}

/// Set the quantity of product `id`; zero or less removes it.
pub fn update<S: KeyValueStore, N: Notifier>(
    cart: &mut CartFacade<S, N>,
    id: ProductId,
    quantity: i64,
) {
    cart.update_quantity(id, quantity);
    info!(%id, quantity = cart.cart_item_quantity(id), "Line updated");
}

/// Empty the cart.
pub fn clear<S: KeyValueStore, N: Notifier>(cart: &mut CartFacade<S, N>) {
    cart.clear_cart();
    info!("Cart cleared");
}

/// Discard the stored cart if it is older than `days`.
pub fn expire<S: KeyValueStore, N: Notifier>(cart: &mut CartFacade<S, N>, days: u32) {
    if cart.storage().is_expired(days) {
        cart.clean_expired_cart();
        info!(days, "Stored cart expired and was discarded");
    } else {
        info!(days, "Stored cart is still fresh");
    }
}

/// Log the order draft; with `confirm`, empty the cart afterwards.
///
/// # Errors
///
/// Returns an error if the cart is empty or the draft cannot be serialized.
pub fn checkout<S: KeyValueStore, N: Notifier>(
    cart: &mut CartFacade<S, N>,
    confirm: bool,
) -> Result<(), Box<dyn std::error::Error>> {
    let draft = cart.order_draft()?;
    info!("Order draft:\n{}", serde_json::to_string_pretty(&draft)?);

    if confirm {
        cart.confirm_order();
    }
    Ok(())
}
