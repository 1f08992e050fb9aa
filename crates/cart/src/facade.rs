//! The cart's public command and query surface.
//!
//! [`CartFacade`] owns the in-memory [`CartState`] and is the only thing
//! that dispatches [`CartAction`]s. Commands validate first, dispatch
//! second and notify last:
//!
//! 1. Validation rules reject bad requests with a user-visible message and
//!    nothing is dispatched.
//! 2. The reducer computes the next state; item mutations are persisted.
//! 3. The notification gate reports the outcome.

use tracing::{debug, info, instrument};

use toolshed_core::{CartItem, Price, Product, ProductId};

use crate::config::CartConfig;
use crate::notify::{NotificationCategory, NotificationGate, Notifier};
use crate::order::{OrderDraft, OrderError};
use crate::state::{CartAction, CartState, reduce};
use crate::storage::{CartStorage, KeyValueStore};
use crate::validation::{
    ValidationError, validate_product, validate_quantity, validate_stock, validate_target_quantity,
};

/// Cart commands and queries over persisted state.
pub struct CartFacade<S, N> {
    state: CartState,
    storage: CartStorage<S>,
    gate: NotificationGate<N>,
    expiry_days: u32,
}

impl<S: KeyValueStore, N: Notifier> CartFacade<S, N> {
    /// Build the cart from storage.
    ///
    /// The state is seeded from storage, re-synced with a `Load`, and
    /// discarded if the stored snapshot is older than `expiry_days`.
    pub fn mount(storage: CartStorage<S>, gate: NotificationGate<N>, expiry_days: u32) -> Self {
        let seeded = CartState::loading_with(storage.load());
        let mut facade = Self {
            state: seeded,
            storage,
            gate,
            expiry_days,
        };

        let items = facade.storage.load();
        facade.dispatch(CartAction::Load(items));

        if facade.is_expired() {
            info!(
                key = facade.storage.key(),
                expiry_days, "Stored cart expired, discarding"
            );
            facade.clean_expired_cart();
        }

        info!(
            items = facade.state.items.len(),
            count = facade.state.items_count(),
            "Cart mounted"
        );
        facade
    }

    /// Build the cart using the namespace and timing from `config`.
    pub fn from_config(store: S, notifier: N, config: &CartConfig) -> Self {
        Self::mount(
            CartStorage::new(store, &config.namespace),
            NotificationGate::new(notifier, config.notifications),
            config.expiry_days,
        )
    }

    // =========================================================================
    // Commands
    // =========================================================================

    /// Add `quantity` units of `product`.
    ///
    /// Returns `false` (and shows an error notification) when the product is
    /// missing, not purchasable, the quantity is not positive, or the cart
    /// would hold more than the product's stock.
    #[instrument(skip(self, product), fields(product_id = ?product.map(|p| p.id)))]
    pub fn add_to_cart(&mut self, product: Option<&Product>, quantity: i64) -> bool {
        let product = match self.check_add(product, quantity) {
            Ok(product) => product,
            Err(e) => {
                debug!(error = %e, "Add rejected");
                self.gate.error(e.to_string());
                return false;
            }
        };

        // Validation guarantees 1 <= quantity <= stock.
        let Ok(units) = u32::try_from(quantity) else {
            return false;
        };

        self.dispatch(CartAction::AddItem(CartItem::from_product(product, units)));
        self.clear_error();
        self.gate.success(
            NotificationCategory::Cart,
            format!("{} added to cart", product.name),
        );
        true
    }

    /// Remove the line for `id`. Missing ids are ignored.
    #[instrument(skip(self))]
    pub fn remove_from_cart(&mut self, id: ProductId) {
        let Some(name) = self.state.item(id).map(|item| item.name.clone()) else {
            debug!("Remove ignored, item not in cart");
            return;
        };

        self.dispatch(CartAction::RemoveItem(id));
        self.clear_error();
        self.gate.success(
            NotificationCategory::Cart,
            format!("{name} removed from cart"),
        );
    }

    /// Set the quantity of the line for `id`.
    ///
    /// Zero or negative quantities remove the line. Quantities above the
    /// line's recorded stock are rejected with an error notification.
    #[instrument(skip(self))]
    pub fn update_quantity(&mut self, id: ProductId, quantity: i64) {
        if quantity <= 0 {
            self.remove_from_cart(id);
            return;
        }

        let Some(stock) = self.state.item(id).map(|item| item.stock) else {
            debug!("Update ignored, item not in cart");
            return;
        };

        if let Err(e) = validate_target_quantity(quantity, stock) {
            debug!(error = %e, "Update rejected");
            self.gate.error(e.to_string());
            return;
        }

        self.dispatch(CartAction::UpdateQuantity { id, quantity });
        self.clear_error();
    }

    /// Remove every line.
    #[instrument(skip(self))]
    pub fn clear_cart(&mut self) {
        self.dispatch(CartAction::Clear);
        self.clear_error();
    }

    /// Drop the stored record and the in-memory items.
    ///
    /// Callers check [`Self::is_expired`] first; this does not.
    pub fn clean_expired_cart(&mut self) {
        self.storage.clear();
        self.apply(CartAction::Clear);
    }

    /// Record an error reported by a collaborator (e.g. order submission).
    pub fn report_error(&mut self, message: impl Into<String>) {
        self.dispatch(CartAction::SetError(Some(message.into())));
    }

    /// Snapshot the cart for the order service.
    ///
    /// # Errors
    ///
    /// Returns [`OrderError::EmptyCart`] when there is nothing to order.
    pub fn order_draft(&self) -> Result<OrderDraft, OrderError> {
        if self.state.items.is_empty() {
            return Err(OrderError::EmptyCart);
        }
        Ok(OrderDraft {
            items: self.state.items.clone(),
            total: self.cart_total(),
            item_count: self.cart_items_count(),
            created_at: self.storage.now(),
        })
    }

    /// Empty the cart after the order service accepted the order.
    #[instrument(skip(self))]
    pub fn confirm_order(&mut self) {
        self.dispatch(CartAction::Clear);
        self.clear_error();
        self.gate
            .success(NotificationCategory::General, "Order placed");
    }

    // =========================================================================
    // Queries
    // =========================================================================

    /// Current line items in insertion order.
    #[must_use]
    pub fn cart_items(&self) -> &[CartItem] {
        &self.state.items
    }

    /// Sum of `price * quantity`.
    #[must_use]
    pub fn cart_total(&self) -> Price {
        self.state.total()
    }

    /// Sum of quantities.
    #[must_use]
    pub fn cart_items_count(&self) -> u64 {
        self.state.items_count()
    }

    #[must_use]
    pub fn is_in_cart(&self, id: ProductId) -> bool {
        self.state.item(id).is_some()
    }

    /// Units of `id` in the cart, 0 if absent.
    #[must_use]
    pub fn cart_item_quantity(&self, id: ProductId) -> u32 {
        self.state.item(id).map_or(0, |item| item.quantity)
    }

    /// Whether the stored snapshot is older than the configured expiry.
    #[must_use]
    pub fn is_expired(&self) -> bool {
        self.storage.is_expired(self.expiry_days)
    }

    #[must_use]
    pub const fn is_loading(&self) -> bool {
        self.state.loading
    }

    #[must_use]
    pub fn error(&self) -> Option<&str> {
        self.state.error.as_deref()
    }

    #[must_use]
    pub const fn state(&self) -> &CartState {
        &self.state
    }

    #[must_use]
    pub const fn storage(&self) -> &CartStorage<S> {
        &self.storage
    }

    #[must_use]
    pub const fn gate(&self) -> &NotificationGate<N> {
        &self.gate
    }

    // =========================================================================
    // Internals
    // =========================================================================

    fn check_add<'p>(
        &self,
        product: Option<&'p Product>,
        quantity: i64,
    ) -> Result<&'p Product, ValidationError> {
        validate_product(product)?;
        let product = product.ok_or(ValidationError::InvalidProduct)?;
        validate_quantity(quantity)?;

        // A merged line is capped at the stock recorded when it was first added.
        let (available, current) = self.state.item(product.id).map_or(
            (product.stock, 0),
            |line| (product.stock.min(line.stock), line.quantity),
        );
        validate_stock(quantity, available, current)?;
        Ok(product)
    }

    /// Apply `action` and persist if it touched the items.
    fn dispatch(&mut self, action: CartAction) {
        let persists = action.persists();
        self.apply(action);
        if persists {
            self.storage.save(&self.state.items);
        }
    }

    fn apply(&mut self, action: CartAction) {
        let kind = action.kind();
        let state = std::mem::take(&mut self.state);
        self.state = reduce(state, action);
        debug!(
            action = kind,
            items = self.state.items.len(),
            "Applied cart action"
        );
    }

    fn clear_error(&mut self) {
        if self.state.error.is_some() {
            self.dispatch(CartAction::SetError(None));
        }
    }
}
