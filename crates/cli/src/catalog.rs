//! Local product catalog.
//!
//! Stands in for the product service: a YAML sequence of products using the
//! same camelCase field names the service returns.
//!
//! ```yaml
//! - id: 1
//!   name: Claw Hammer
//!   price: 24.5
//!   mainImageUrl: /img/hammer.jpg
//!   stock: 12
//!   status: Active
//! ```

use std::collections::HashMap;
use std::path::Path;

use thiserror::Error;
use toolshed_core::{Product, ProductId};
use tracing::info;

/// Errors that can occur when loading a catalog.
#[derive(Debug, Error)]
pub enum CatalogError {
    #[error("Failed to read catalog {path}: {source}")]
    Read {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to parse catalog: {0}")]
    Parse(#[from] serde_yaml::Error),

    #[error("Duplicate product id {0} in catalog")]
    DuplicateId(ProductId),
}

/// Products indexed by id.
#[derive(Debug, Default)]
pub struct Catalog {
    products: HashMap<ProductId, Product>,
}

impl Catalog {
    /// Read and parse a catalog file.
    ///
    /// # Errors
    ///
    /// Returns `CatalogError` if the file cannot be read, is not a valid
    /// product list, or repeats an id.
    pub async fn load(path: &Path) -> Result<Self, CatalogError> {
        let content = tokio::fs::read_to_string(path)
            .await
            .map_err(|source| CatalogError::Read {
                path: path.display().to_string(),
                source,
            })?;

        let catalog = Self::parse(&content)?;
        info!(path = %path.display(), products = catalog.len(), "Loaded catalog");
        Ok(catalog)
    }

    /// Parse catalog YAML.
    ///
    /// # Errors
    ///
    /// Returns `CatalogError` on invalid YAML or duplicate ids.
    pub fn parse(content: &str) -> Result<Self, CatalogError> {
        let list: Vec<Product> = serde_yaml::from_str(content)?;

        let mut products = HashMap::with_capacity(list.len());
        for product in list {
            let id = product.id;
            if products.insert(id, product).is_some() {
                return Err(CatalogError::DuplicateId(id));
            }
        }
        Ok(Self { products })
    }

    /// Look up a product.
    #[must_use]
    pub fn get(&self, id: ProductId) -> Option<&Product> {
        self.products.get(&id)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.products.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.products.is_empty()
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use toolshed_core::{Price, ProductStatus};

    use super::*;

    const CATALOG: &str = r"
- id: 1
  name: Claw Hammer
  price: 24.5
  mainImageUrl: /img/hammer.jpg
  stock: 12
  status: Active
- id: 2
  name: Hand Saw
  price: 18
  stock: 0
  status: Inactive
";

    #[test]
    fn test_parse_catalog() {
        let catalog = Catalog::parse(CATALOG).unwrap();
        assert_eq!(catalog.len(), 2);

        let hammer = catalog.get(ProductId::new(1)).unwrap();
        assert_eq!(hammer.price, Price::from_cents(2450));
        assert_eq!(hammer.main_image_url, "/img/hammer.jpg");

        let saw = catalog.get(ProductId::new(2)).unwrap();
        assert_eq!(saw.status, ProductStatus::Inactive);
        assert!(saw.main_image_url.is_empty());
    }

    #[test]
    fn test_duplicate_ids_rejected() {
        let doubled = format!("{CATALOG}- id: 1\n  name: Again\n  price: 1\n  stock: 1\n  status: Active\n");
        assert!(matches!(
            Catalog::parse(&doubled),
            Err(CatalogError::DuplicateId(id)) if id == ProductId::new(1)
        ));
    }

    #[test]
    fn test_row_without_status_rejected() {
        let result = Catalog::parse("- id: 3\n  name: Level\n  price: 9\n  stock: 4\n");
        assert!(matches!(result, Err(CatalogError::Parse(_))));
    }

    #[test]
    fn test_unknown_id_is_none() {
        let catalog = Catalog::parse(CATALOG).unwrap();
        assert!(catalog.get(ProductId::new(99)).is_none());
    }

    #[tokio::test]
    async fn test_load_missing_file() {
        let tmp = tempfile::tempdir().unwrap();
        let err = Catalog::load(&tmp.path().join("missing.yaml")).await.unwrap_err();
        assert!(matches!(err, CatalogError::Read { .. }));
    }
}
