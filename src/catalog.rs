//! Catalog
//!
//! Read-only access to the products on sale. The cart, wishlist and checkout
//! only ever hold copies of what the catalog hands out.

use std::fmt::Debug;

use rustc_hash::FxHashMap;
use serde::Deserialize;
use thiserror::Error;

use crate::products::{Product, ProductId};

const BUNDLED_PRODUCTS_YAML: &str = include_str!("../fixtures/products/storefront.yml");

/// Number of related products shown on a product page.
pub const RELATED_PRODUCTS_LIMIT: usize = 4;

/// Catalog errors
#[derive(Debug, Error)]
pub enum CatalogError {
    /// No product with the given id exists.
    #[error("product {0} not found")]
    NotFound(ProductId),

    /// Two catalog entries share an id.
    #[error("duplicate product id {0}")]
    DuplicateProduct(ProductId),

    /// The catalog fixture could not be parsed.
    #[error("failed to parse catalog: {0}")]
    Yaml(#[from] serde_norway::Error),
}

/// Read-only product source.
pub trait Catalog: Debug + Send + Sync {
    /// All products in catalog order.
    fn list_all(&self) -> &[Product];

    /// Look up a single product.
    ///
    /// # Errors
    ///
    /// Returns [`CatalogError::NotFound`] if no product has this id.
    fn find_by_id(&self, id: &ProductId) -> Result<&Product, CatalogError>;

    /// Products in the same category as `product`, excluding it, in catalog order.
    fn related(&self, product: &Product, limit: usize) -> Vec<&Product> {
        self.list_all()
            .iter()
            .filter(|candidate| candidate.category == product.category && candidate.id != product.id)
            .take(limit)
            .collect()
    }

    /// Featured products in catalog order.
    fn featured(&self) -> Vec<&Product> {
        self.list_all()
            .iter()
            .filter(|product| product.is_featured())
            .collect()
    }
}

/// Wrapper for products in YAML
#[derive(Debug, Deserialize)]
struct ProductsFixture {
    products: Vec<Product>,
}

/// In-memory catalog backed by a fixed product list.
#[derive(Debug, Clone, Default)]
pub struct StaticCatalog {
    products: Vec<Product>,
    index: FxHashMap<ProductId, usize>,
}

impl StaticCatalog {
    /// Build a catalog from a product list.
    ///
    /// # Errors
    ///
    /// Returns [`CatalogError::DuplicateProduct`] if two products share an id.
    pub fn new(products: impl Into<Vec<Product>>) -> Result<Self, CatalogError> {
        let products = products.into();
        let mut index = FxHashMap::default();

        for (position, product) in products.iter().enumerate() {
            if index.insert(product.id.clone(), position).is_some() {
                return Err(CatalogError::DuplicateProduct(product.id.clone()));
            }
        }

        Ok(Self { products, index })
    }

    /// Parse a catalog from YAML (`products: [...]`).
    ///
    /// # Errors
    ///
    /// Returns an error if the YAML is malformed or contains duplicate ids.
    pub fn from_yaml(yaml: &str) -> Result<Self, CatalogError> {
        let fixture: ProductsFixture = serde_norway::from_str(yaml)?;

        Self::new(fixture.products)
    }

    /// The catalog shipped with the crate.
    ///
    /// # Errors
    ///
    /// Returns an error if the bundled fixture is invalid.
    pub fn bundled() -> Result<Self, CatalogError> {
        Self::from_yaml(BUNDLED_PRODUCTS_YAML)
    }

    /// Number of products.
    pub fn len(&self) -> usize {
        self.products.len()
    }

    /// Check if the catalog is empty.
    pub fn is_empty(&self) -> bool {
        self.products.is_empty()
    }
}

impl Catalog for StaticCatalog {
    fn list_all(&self) -> &[Product] {
        &self.products
    }

    fn find_by_id(&self, id: &ProductId) -> Result<&Product, CatalogError> {
        self.index
            .get(id)
            .and_then(|position| self.products.get(*position))
            .ok_or_else(|| CatalogError::NotFound(id.clone()))
    }
}
