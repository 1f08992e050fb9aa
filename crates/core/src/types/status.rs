//! Status enums for catalog entities.

use serde::{Deserialize, Serialize};

/// Lifecycle status of a catalog product.
///
/// Maps to the product service's status values. Only [`ProductStatus::Active`]
/// products may be added to a cart.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ProductStatus {
    Active,
    Inactive,
    Deleted,
}

impl ProductStatus {
    /// Whether products in this status can be purchased.
    #[must_use]
    pub const fn is_purchasable(self) -> bool {
        matches!(self, Self::Active)
    }
}

impl std::fmt::Display for ProductStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Active => write!(f, "Active"),
            Self::Inactive => write!(f, "Inactive"),
            Self::Deleted => write!(f, "Deleted"),
        }
    }
}

impl std::str::FromStr for ProductStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "Active" | "active" => Ok(Self::Active),
            "Inactive" | "inactive" => Ok(Self::Inactive),
            "Deleted" | "deleted" => Ok(Self::Deleted),
            _ => Err(format!("invalid product status: {s}")),
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_only_active_is_purchasable() {
        assert!(ProductStatus::Active.is_purchasable());
        assert!(!ProductStatus::Inactive.is_purchasable());
        assert!(!ProductStatus::Deleted.is_purchasable());
    }

    #[test]
    fn test_display_from_str_agree() {
        for status in [
            ProductStatus::Active,
            ProductStatus::Inactive,
            ProductStatus::Deleted,
        ] {
            assert_eq!(status.to_string().parse::<ProductStatus>().unwrap(), status);
        }
        assert!("Archived".parse::<ProductStatus>().is_err());
    }

    #[test]
    fn test_wire_names_match_product_service() {
        assert_eq!(
            serde_json::to_string(&ProductStatus::Inactive).unwrap(),
            "\"Inactive\""
        );
    }
}
