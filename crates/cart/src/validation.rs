//! Pre-dispatch validation rules.
//!
//! These checks run in the facade before any action reaches the reducer.
//! They are pure and side-effect free; the first failing rule wins and its
//! `Display` text is what the user sees.

use thiserror::Error;
use toolshed_core::Product;

/// Reasons an add or quantity change is rejected.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    /// No product, or a product without an assigned id.
    #[error("invalid product")]
    InvalidProduct,

    /// Product exists but is not in `Active` status.
    #[error("{name} is not available")]
    NotAvailable {
        /// Product display name.
        name: String,
    },

    /// Product has no units left.
    #[error("{name} is out of stock")]
    OutOfStock {
        /// Product display name.
        name: String,
    },

    /// Requested quantity is zero or negative.
    #[error("quantity must be greater than 0")]
    NonPositiveQuantity,

    /// Cart plus request would exceed known stock.
    #[error("only {available} units available ({remaining} more can be added)")]
    InsufficientStock {
        /// Units in stock.
        available: u32,
        /// Units that can still be added on top of the cart.
        remaining: u32,
    },

    /// Requested line quantity is above the item's recorded stock.
    #[error("only {available} units available")]
    ExceedsStock {
        /// Units in stock when the item was added.
        available: u32,
    },
}

/// Check that a product exists and can be purchased.
///
/// # Errors
///
/// Returns [`ValidationError::InvalidProduct`] for a missing product or
/// unassigned id, [`ValidationError::NotAvailable`] for non-active products
/// and [`ValidationError::OutOfStock`] when stock is zero.
pub fn validate_product(product: Option<&Product>) -> Result<(), ValidationError> {
    let product = product
        .filter(|p| p.id.is_assigned())
        .ok_or(ValidationError::InvalidProduct)?;

    if !product.status.is_purchasable() {
        return Err(ValidationError::NotAvailable {
            name: product.name.clone(),
        });
    }

    if product.stock == 0 {
        return Err(ValidationError::OutOfStock {
            name: product.name.clone(),
        });
    }

    Ok(())
}

/// Check that a requested quantity is positive.
///
/// # Errors
///
/// Returns [`ValidationError::NonPositiveQuantity`] when `quantity <= 0`.
pub const fn validate_quantity(quantity: i64) -> Result<(), ValidationError> {
    if quantity <= 0 {
        return Err(ValidationError::NonPositiveQuantity);
    }
    Ok(())
}

/// Check that `current + requested` stays within `available`.
///
/// # Errors
///
/// Returns [`ValidationError::InsufficientStock`] when the new total would
/// exceed the available stock.
pub fn validate_stock(requested: i64, available: u32, current: u32) -> Result<(), ValidationError> {
    let new_total = i64::from(current).saturating_add(requested);
    if new_total > i64::from(available) {
        return Err(ValidationError::InsufficientStock {
            available,
            remaining: available.saturating_sub(current),
        });
    }
    Ok(())
}

/// Check that a line can be set to `quantity` units.
///
/// # Errors
///
/// Returns [`ValidationError::ExceedsStock`] when `quantity > available`.
pub fn validate_target_quantity(quantity: i64, available: u32) -> Result<(), ValidationError> {
    if quantity > i64::from(available) {
        return Err(ValidationError::ExceedsStock { available });
    }
    Ok(())
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use toolshed_core::{Price, ProductId, ProductStatus};

    fn product(stock: u32, status: ProductStatus) -> Product {
        Product {
            id: ProductId::new(1),
            name: "Tape Measure".to_string(),
            price: Price::from_units(12),
            main_image_url: String::new(),
            stock,
            status,
        }
    }

    #[test]
    fn test_missing_product_is_invalid() {
        assert_eq!(validate_product(None), Err(ValidationError::InvalidProduct));
    }

    #[test]
    fn test_unassigned_id_is_invalid() {
        let mut p = product(3, ProductStatus::Active);
        p.id = ProductId::new(0);
        assert_eq!(
            validate_product(Some(&p)),
            Err(ValidationError::InvalidProduct)
        );
    }

    #[test]
    fn test_inactive_and_deleted_are_unavailable() {
        for status in [ProductStatus::Inactive, ProductStatus::Deleted] {
            assert!(matches!(
                validate_product(Some(&product(3, status))),
                Err(ValidationError::NotAvailable { .. })
            ));
        }
    }

    #[test]
    fn test_status_checked_before_stock() {
        assert!(matches!(
            validate_product(Some(&product(0, ProductStatus::Inactive))),
            Err(ValidationError::NotAvailable { .. })
        ));
    }

    #[test]
    fn test_zero_stock_is_out_of_stock() {
        let err = validate_product(Some(&product(0, ProductStatus::Active))).unwrap_err();
        assert_eq!(err.to_string(), "Tape Measure is out of stock");
    }

    #[test]
    fn test_active_in_stock_is_valid() {
        assert!(validate_product(Some(&product(1, ProductStatus::Active))).is_ok());
    }

    #[test]
    fn test_quantity_must_be_positive() {
        assert_eq!(validate_quantity(0), Err(ValidationError::NonPositiveQuantity));
        assert_eq!(validate_quantity(-2), Err(ValidationError::NonPositiveQuantity));
        assert!(validate_quantity(1).is_ok());
    }

    #[test]
    fn test_stock_counts_cart_quantity() {
        assert!(validate_stock(2, 5, 3).is_ok());
        let err = validate_stock(4, 5, 3).unwrap_err();
        assert_eq!(
            err,
            ValidationError::InsufficientStock {
                available: 5,
                remaining: 2
            }
        );
        assert_eq!(err.to_string(), "only 5 units available (2 more can be added)");
    }

    #[test]
    fn test_stock_exact_fit_is_valid() {
        assert!(validate_stock(5, 5, 0).is_ok());
        assert!(validate_stock(6, 5, 0).is_err());
    }

    #[test]
    fn test_target_quantity_bounded_by_stock() {
        assert!(validate_target_quantity(5, 5).is_ok());
        let err = validate_target_quantity(10, 5).unwrap_err();
        assert_eq!(err.to_string(), "only 5 units available");
    }
}
