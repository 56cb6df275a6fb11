//! Products

use std::fmt;

use serde::{Deserialize, Serialize};

/// Stable product identifier.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ProductId(String);

impl ProductId {
    /// Create a product identifier.
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// The identifier as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ProductId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for ProductId {
    fn from(id: &str) -> Self {
        Self::new(id)
    }
}

impl From<String> for ProductId {
    fn from(id: String) -> Self {
        Self(id)
    }
}

/// Product category. Names this build does not know are kept verbatim.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum Category {
    /// Necklaces and pendants
    Necklaces,

    /// Rings and bands
    Rings,

    /// Earrings
    Earrings,

    /// Bracelets
    Bracelets,

    /// Matching sets
    Sets,

    /// Any other category, holding the stored name
    Other(String),
}

impl Category {
    /// All categories shown in the shop filters.
    pub const ALL: [Category; 5] = [
        Category::Rings,
        Category::Necklaces,
        Category::Earrings,
        Category::Bracelets,
        Category::Sets,
    ];

    /// Wire name of the category.
    pub fn as_str(&self) -> &str {
        match self {
            Category::Necklaces => "necklaces",
            Category::Rings => "rings",
            Category::Earrings => "earrings",
            Category::Bracelets => "bracelets",
            Category::Sets => "sets",
            Category::Other(name) => name,
        }
    }

    /// Parse a known category name, ignoring case.
    pub fn parse(name: &str) -> Option<Self> {
        Self::ALL
            .into_iter()
            .find(|category| category.as_str().eq_ignore_ascii_case(name.trim()))
    }
}

impl From<String> for Category {
    fn from(name: String) -> Self {
        Self::ALL
            .into_iter()
            .find(|category| category.as_str() == name)
            .unwrap_or(Category::Other(name))
    }
}

impl From<Category> for String {
    fn from(category: Category) -> Self {
        match category {
            Category::Other(name) => name,
            known => known.as_str().to_string(),
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// How a product is fulfilled.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ProductType {
    /// Sold through a partner link
    Affiliate,

    /// Shipped by a supplier
    Dropshipping,

    /// Stocked and shipped by the shop
    Local,
}

/// Fulfilment details. Every field is optional and omitted when absent.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Sourcing {
    /// Fulfilment channel
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub product_type: Option<ProductType>,

    /// Partner link for affiliate products
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub affiliate_url: Option<String>,

    /// Units on hand
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub stock: Option<u32>,

    /// Supplier page for dropshipped products
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub supplier_link: Option<String>,
}

/// Catalog product. Never mutated by the cart, wishlist or checkout.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Product {
    /// Unique, stable id
    pub id: ProductId,

    /// Display name
    pub name: String,

    /// Price in whole rupees
    pub price: u64,

    /// Category
    pub category: Category,

    /// Image reference
    #[serde(default)]
    pub image: String,

    /// Long description
    #[serde(default)]
    pub description: String,

    /// Shown in the featured collection
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub featured: Option<bool>,

    /// Primary material, e.g. "Rose Gold"
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub material: Option<String>,

    /// Fulfilment details
    #[serde(flatten)]
    pub sourcing: Sourcing,
}

impl Product {
    /// Whether the product is marked as featured.
    pub fn is_featured(&self) -> bool {
        self.featured.unwrap_or(false)
    }
}
