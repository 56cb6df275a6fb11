//! Cart
//!
//! One line item per product id, each with a quantity of at least one. Count
//! and total are always derived from the line items, never stored.

use std::sync::Arc;

use rusty_money::{Money, iso::Currency};
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::{
    pricing::{PricingError, line_total, total_price},
    products::{Product, ProductId},
    storage::{BlobStore, PersistedCollection, StorageError, StoreKey},
};

/// A product and how many of it are in the cart.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CartLineItem {
    #[serde(flatten)]
    product: Product,
    quantity: u32,
}

impl CartLineItem {
    /// Create a line item. A zero quantity is raised to one.
    pub fn new(product: Product, quantity: u32) -> Self {
        Self {
            product,
            quantity: quantity.max(1),
        }
    }

    /// The product on this line.
    pub fn product(&self) -> &Product {
        &self.product
    }

    /// Product id of this line.
    pub fn id(&self) -> &ProductId {
        &self.product.id
    }

    /// Quantity, always at least one.
    pub fn quantity(&self) -> u32 {
        self.quantity
    }

    /// Unit price times quantity.
    pub fn line_total(&self) -> u64 {
        line_total(self.product.price, self.quantity)
    }
}

/// Shopping cart, persisted after every mutation.
#[derive(Debug)]
pub struct Cart {
    items: Vec<CartLineItem>,
    collection: PersistedCollection<CartLineItem>,
    warning: Option<StorageError>,
}

impl Cart {
    /// Hydrate the cart from the store, or start empty.
    pub fn load(store: Arc<dyn BlobStore>) -> Self {
        let collection = PersistedCollection::new(store, StoreKey::Cart);
        let items = normalize(collection.load());

        debug!(lines = items.len(), "hydrated cart");

        Self {
            items,
            collection,
            warning: None,
        }
    }

    /// Add one unit of `product`, appending a new line if it is not in the cart yet.
    pub fn add(&mut self, product: &Product) {
        if let Some(item) = self.line_mut(&product.id) {
            item.quantity = item.quantity.saturating_add(1);
        } else {
            self.items.push(CartLineItem::new(product.clone(), 1));
        }

        debug!(product = %product.id, "added to cart");

        self.persist();
    }

    /// Remove the line for `id`. Missing ids are ignored.
    pub fn remove(&mut self, id: &ProductId) {
        let before = self.items.len();

        self.items.retain(|item| item.id() != id);

        if self.items.len() != before {
            debug!(product = %id, "removed from cart");

            self.persist();
        }
    }

    /// Set the quantity for `id`; zero or less removes the line. Missing ids are ignored.
    pub fn update_quantity(&mut self, id: &ProductId, quantity: i64) {
        if quantity <= 0 {
            self.remove(id);
            return;
        }

        let quantity = u32::try_from(quantity).unwrap_or(u32::MAX);

        if let Some(item) = self.line_mut(id) {
            item.quantity = quantity;

            debug!(product = %id, quantity, "updated cart quantity");

            self.persist();
        }
    }

    /// Add one to the quantity for `id`.
    pub fn increment(&mut self, id: &ProductId) {
        if let Some(quantity) = self.quantity_of(id) {
            self.update_quantity(id, i64::from(quantity).saturating_add(1));
        }
    }

    /// Take one from the quantity for `id`, removing the line at zero.
    pub fn decrement(&mut self, id: &ProductId) {
        if let Some(quantity) = self.quantity_of(id) {
            self.update_quantity(id, i64::from(quantity).saturating_sub(1));
        }
    }

    /// Empty the cart.
    pub fn clear(&mut self) {
        self.items.clear();

        debug!("cleared cart");

        self.persist();
    }

    /// Take ordered quantities out of the cart, dropping lines that reach zero.
    /// Lines added or raised since `ordered` was taken keep the difference.
    pub fn remove_ordered(&mut self, ordered: &[CartLineItem]) {
        for line in ordered {
            if let Some(item) = self.line_mut(line.id()) {
                item.quantity = item.quantity.saturating_sub(line.quantity);
            }
        }

        self.items.retain(|item| item.quantity > 0);

        debug!(lines = ordered.len(), "removed ordered lines from cart");

        self.persist();
    }

    /// Line items in the order they were first added.
    pub fn items(&self) -> &[CartLineItem] {
        &self.items
    }

    /// Line item for `id`, if present.
    pub fn get(&self, id: &ProductId) -> Option<&CartLineItem> {
        self.items.iter().find(|item| item.id() == id)
    }

    /// Whether `id` has a line in the cart.
    pub fn contains(&self, id: &ProductId) -> bool {
        self.get(id).is_some()
    }

    /// Sum of all quantities.
    pub fn count(&self) -> u64 {
        self.items.iter().map(|item| u64::from(item.quantity)).sum()
    }

    /// Sum of price times quantity over all lines.
    pub fn total(&self) -> u64 {
        self.items
            .iter()
            .fold(0, |total: u64, item| total.saturating_add(item.line_total()))
    }

    /// Total as money in the storefront currency.
    ///
    /// # Errors
    ///
    /// Returns a [`PricingError`] if the total cannot be represented.
    pub fn total_money(&self) -> Result<Money<'static, Currency>, PricingError> {
        total_price(&self.items)
    }

    /// Number of distinct lines.
    pub fn len(&self) -> usize {
        self.items.len()
    }

    /// Check if the cart is empty.
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Copy of the current line items.
    pub fn snapshot(&self) -> Vec<CartLineItem> {
        self.items.clone()
    }

    /// Take the last persistence failure, if one happened since the previous call.
    pub fn take_warning(&mut self) -> Option<StorageError> {
        self.warning.take()
    }

    fn quantity_of(&self, id: &ProductId) -> Option<u32> {
        self.get(id).map(CartLineItem::quantity)
    }

    fn line_mut(&mut self, id: &ProductId) -> Option<&mut CartLineItem> {
        self.items.iter_mut().find(|item| item.id() == id)
    }

    fn persist(&mut self) {
        if let Err(error) = self.collection.save(&self.items) {
            warn!(%error, "failed to persist cart; keeping in-memory state");

            self.warning = Some(error);
        }
    }
}

/// Merge duplicate ids and drop empty lines from stored data.
fn normalize(stored: Vec<CartLineItem>) -> Vec<CartLineItem> {
    let mut items: Vec<CartLineItem> = Vec::with_capacity(stored.len());

    for item in stored.into_iter().filter(|item| item.quantity > 0) {
        if let Some(existing) = items.iter_mut().find(|existing| existing.id() == item.id()) {
            existing.quantity = existing.quantity.saturating_add(item.quantity);
        } else {
            items.push(item);
        }
    }

    items
}
