//! Cart state and its transition function.
//!
//! [`reduce`] is total: every action applies to every state, and requests
//! outside `[1, stock]` are clamped rather than rejected. Rejection with a
//! user-facing message happens in the facade before an action is built.

use toolshed_core::{CartItem, Price, ProductId};

/// The cart aggregate.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CartState {
    /// Line items in insertion order, unique by id.
    pub items: Vec<CartItem>,
    /// True only while the initial load from storage is in progress.
    pub loading: bool,
    /// Last error message, cleared by the next successful mutation.
    pub error: Option<String>,
}

impl CartState {
    /// State used before storage has been read.
    #[must_use]
    pub fn loading_with(items: Vec<CartItem>) -> Self {
        Self {
            items: normalize_items(items),
            loading: true,
            error: None,
        }
    }

    /// Find a line item by product id.
    #[must_use]
    pub fn item(&self, id: ProductId) -> Option<&CartItem> {
        self.items.iter().find(|item| item.id == id)
    }

    /// Sum of `price * quantity` over all items.
    #[must_use]
    pub fn total(&self) -> Price {
        self.items.iter().map(CartItem::line_total).sum()
    }

    /// Sum of all quantities.
    #[must_use]
    pub fn items_count(&self) -> u64 {
        self.items.iter().map(|item| u64::from(item.quantity)).sum()
    }
}

/// Every transition the cart supports.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CartAction {
    /// Replace the items with a snapshot read from storage.
    Load(Vec<CartItem>),
    /// Add a line, merging into an existing line with the same id.
    AddItem(CartItem),
    /// Drop the line with this id.
    RemoveItem(ProductId),
    /// Set a line's quantity.
    UpdateQuantity { id: ProductId, quantity: i64 },
    /// Drop every line.
    Clear,
    SetLoading(bool),
    SetError(Option<String>),
}

impl CartAction {
    /// Whether the resulting items must be written back to storage.
    #[must_use]
    pub const fn persists(&self) -> bool {
        match self {
            Self::AddItem(_) | Self::RemoveItem(_) | Self::UpdateQuantity { .. } | Self::Clear => {
                true
            }
            Self::Load(_) | Self::SetLoading(_) | Self::SetError(_) => false,
        }
    }

    /// Short name for logs.
    #[must_use]
    pub const fn kind(&self) -> &'static str {
        match self {
            Self::Load(_) => "load",
            Self::AddItem(_) => "add_item",
            Self::RemoveItem(_) => "remove_item",
            Self::UpdateQuantity { .. } => "update_quantity",
            Self::Clear => "clear",
            Self::SetLoading(_) => "set_loading",
            Self::SetError(_) => "set_error",
        }
    }
}

/// Compute the next state.
#[must_use]
pub fn reduce(mut state: CartState, action: CartAction) -> CartState {
    match action {
        CartAction::Load(items) => {
            state.items = normalize_items(items);
            state.loading = false;
        }
        CartAction::AddItem(item) => add_item(&mut state.items, item),
        CartAction::RemoveItem(id) => state.items.retain(|item| item.id != id),
        CartAction::UpdateQuantity { id, quantity } => {
            update_quantity(&mut state.items, id, quantity);
        }
        CartAction::Clear => state.items.clear(),
        CartAction::SetLoading(loading) => state.loading = loading,
        CartAction::SetError(error) => {
            state.error = error;
            state.loading = false;
        }
    }
    state
}

fn add_item(items: &mut Vec<CartItem>, mut item: CartItem) {
    if let Some(pos) = items.iter().position(|existing| existing.id == item.id) {
        let Some(existing) = items.get_mut(pos) else {
            return;
        };
        let requested = i64::from(existing.quantity) + i64::from(item.quantity);
        match existing.clamp_quantity(requested) {
            Some(quantity) => existing.quantity = quantity,
            None => {
                items.remove(pos);
            }
        }
        return;
    }

    if let Some(quantity) = item.clamp_quantity(i64::from(item.quantity)) {
        item.quantity = quantity;
        items.push(item);
    }
}

fn update_quantity(items: &mut Vec<CartItem>, id: ProductId, quantity: i64) {
    let Some(pos) = items.iter().position(|item| item.id == id) else {
        return;
    };
    let Some(item) = items.get_mut(pos) else {
        return;
    };
    match item.clamp_quantity(quantity) {
        Some(quantity) => item.quantity = quantity,
        None => {
            items.remove(pos);
        }
    }
}

/// Restore the item invariants on an externally supplied list.
///
/// Keeps the first occurrence of each id, drops lines holding no units or
/// with no stock, and caps the rest at their stock. A zero quantity is never
/// raised to one.
#[must_use]
pub fn normalize_items(items: Vec<CartItem>) -> Vec<CartItem> {
    let mut normalized: Vec<CartItem> = Vec::with_capacity(items.len());
    for mut item in items {
        if item.quantity == 0 || normalized.iter().any(|seen| seen.id == item.id) {
            continue;
        }
        if let Some(quantity) = item.clamp_quantity(i64::from(item.quantity)) {
            item.quantity = quantity;
            normalized.push(item);
        }
    }
    normalized
}
