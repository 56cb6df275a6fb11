//! Filters
//!
//! Pure filtering and sorting over a product sequence. The input is never
//! reordered; results borrow from it.

use std::{cmp::Reverse, str::FromStr};

use serde::{Deserialize, Serialize};
use smallvec::SmallVec;
use thiserror::Error;

use crate::products::{Category, Product};

/// Lowest price selectable in the shop filters.
pub const DEFAULT_MIN_PRICE: u64 = 0;

/// Highest price selectable in the shop filters.
pub const DEFAULT_MAX_PRICE: u64 = 500_000;

/// Inclusive price range.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "Bounds")]
pub struct PriceRange {
    /// Lowest accepted price
    pub min: u64,

    /// Highest accepted price
    pub max: u64,
}

impl PriceRange {
    /// Create a range; bounds are swapped if given in the wrong order.
    pub fn new(min: u64, max: u64) -> Self {
        if min <= max {
            Self { min, max }
        } else {
            Self { min: max, max: min }
        }
    }

    /// Whether `price` falls inside the range.
    pub fn contains(&self, price: u64) -> bool {
        (self.min..=self.max).contains(&price)
    }
}

#[derive(Deserialize)]
struct Bounds {
    min: u64,
    max: u64,
}

impl From<Bounds> for PriceRange {
    fn from(bounds: Bounds) -> Self {
        Self::new(bounds.min, bounds.max)
    }
}

impl Default for PriceRange {
    fn default() -> Self {
        Self::new(DEFAULT_MIN_PRICE, DEFAULT_MAX_PRICE)
    }
}

/// Shop filter selections. Empty category/material sets mean "no filter".
#[derive(Debug, Clone, PartialEq, Default)]
pub struct FilterCriteria {
    /// Selected categories
    pub categories: SmallVec<[Category; 5]>,

    /// Selected materials, matched case-insensitively as substrings
    pub materials: SmallVec<[String; 5]>,

    /// Accepted price range
    pub price_range: PriceRange,

    /// Free-text search over name and description
    pub search: String,
}

impl FilterCriteria {
    /// Select `category` if unselected, otherwise unselect it.
    pub fn toggle_category(&mut self, category: Category) {
        if let Some(position) = self.categories.iter().position(|c| *c == category) {
            self.categories.remove(position);
        } else {
            self.categories.push(category);
        }
    }

    /// Select `material` if unselected, otherwise unselect it.
    pub fn toggle_material(&mut self, material: &str) {
        if let Some(position) = self
            .materials
            .iter()
            .position(|m| m.eq_ignore_ascii_case(material))
        {
            self.materials.remove(position);
        } else {
            self.materials.push(material.to_string());
        }
    }

    /// Clear categories and materials and restore `price_range`. Search is kept.
    pub fn reset(&mut self, price_range: PriceRange) {
        self.categories.clear();
        self.materials.clear();
        self.price_range = price_range;
    }

    /// Whether `product` passes every active filter.
    pub fn matches(&self, product: &Product) -> bool {
        self.matches_category(product)
            && self.matches_material(product)
            && self.price_range.contains(product.price)
            && self.matches_search(product)
    }

    fn matches_category(&self, product: &Product) -> bool {
        self.categories.is_empty() || self.categories.contains(&product.category)
    }

    fn matches_material(&self, product: &Product) -> bool {
        if self.materials.is_empty() {
            return true;
        }

        let Some(material) = product.material.as_deref() else {
            return false;
        };
        let material = material.to_lowercase();

        self.materials
            .iter()
            .any(|selected| material.contains(&selected.to_lowercase()))
    }

    fn matches_search(&self, product: &Product) -> bool {
        let needle = self.search.trim().to_lowercase();

        needle.is_empty()
            || product.name.to_lowercase().contains(&needle)
            || product.description.to_lowercase().contains(&needle)
    }
}

/// Error parsing a sort key.
#[derive(Debug, Error, PartialEq, Eq)]
#[error("unknown sort key: {0}")]
pub struct SortKeyError(String);

/// Result ordering.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SortKey {
    /// Reverse id order, a stand-in for recency
    #[default]
    Newest,

    /// Cheapest first
    PriceLowToHigh,

    /// Most expensive first
    PriceHighToLow,

    /// Featured products first, otherwise catalog order
    Featured,
}

impl FromStr for SortKey {
    type Err = SortKeyError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "newest" => Ok(SortKey::Newest),
            "price-low" | "price-asc" => Ok(SortKey::PriceLowToHigh),
            "price-high" | "price-desc" => Ok(SortKey::PriceHighToLow),
            "featured" | "best-sellers" => Ok(SortKey::Featured),
            other => Err(SortKeyError(other.to_string())),
        }
    }
}

/// Products passing `criteria`, in catalog order.
pub fn filter_products<'a>(products: &'a [Product], criteria: &FilterCriteria) -> Vec<&'a Product> {
    products
        .iter()
        .filter(|product| criteria.matches(product))
        .collect()
}

/// Reorder `products` by `key`. All sorts are stable.
pub fn sort_products<'a>(mut products: Vec<&'a Product>, key: SortKey) -> Vec<&'a Product> {
    match key {
        SortKey::Newest => products.sort_by(|a, b| b.id.cmp(&a.id)),
        SortKey::PriceLowToHigh => products.sort_by_key(|product| product.price),
        SortKey::PriceHighToLow => products.sort_by_key(|product| Reverse(product.price)),
        SortKey::Featured => products.sort_by_key(|product| !product.is_featured()),
    }

    products
}

/// Filter criteria plus a sort key.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct ShopQuery {
    /// Filters to apply
    pub criteria: FilterCriteria,

    /// Ordering of the filtered results
    pub sort: SortKey,
}

impl ShopQuery {
    /// Filter then sort `products`.
    pub fn apply<'a>(&self, products: &'a [Product]) -> Vec<&'a Product> {
        sort_products(filter_products(products, &self.criteria), self.sort)
    }
}
