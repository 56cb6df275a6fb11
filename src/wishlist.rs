//! Wishlist

use std::sync::Arc;

use tracing::{debug, warn};

use crate::{
    products::{Product, ProductId},
    storage::{BlobStore, PersistedCollection, StorageError, StoreKey},
};

/// Saved products, at most one entry per product id.
#[derive(Debug)]
pub struct Wishlist {
    entries: Vec<Product>,
    collection: PersistedCollection<Product>,
    warning: Option<StorageError>,
}

impl Wishlist {
    /// Hydrate the wishlist from the store, or start empty.
    pub fn load(store: Arc<dyn BlobStore>) -> Self {
        let collection: PersistedCollection<Product> =
            PersistedCollection::new(store, StoreKey::Wishlist);
        let mut entries: Vec<Product> = Vec::new();

        for product in collection.load() {
            if !entries.iter().any(|existing| existing.id == product.id) {
                entries.push(product);
            }
        }

        Self {
            entries,
            collection,
            warning: None,
        }
    }

    /// Save `product`. Adding a product that is already saved does nothing.
    pub fn add(&mut self, product: &Product) {
        if self.contains(&product.id) {
            return;
        }

        self.entries.push(product.clone());

        debug!(product = %product.id, "added to wishlist");

        self.persist();
    }

    /// Remove the entry for `id`. Missing ids are ignored.
    pub fn remove(&mut self, id: &ProductId) {
        let before = self.entries.len();

        self.entries.retain(|product| &product.id != id);

        if self.entries.len() != before {
            debug!(product = %id, "removed from wishlist");

            self.persist();
        }
    }

    /// Add `product` if absent, remove it if present. Returns whether it is now saved.
    pub fn toggle(&mut self, product: &Product) -> bool {
        if self.contains(&product.id) {
            self.remove(&product.id);
            false
        } else {
            self.add(product);
            true
        }
    }

    /// Whether `id` is saved.
    pub fn contains(&self, id: &ProductId) -> bool {
        self.entries.iter().any(|product| &product.id == id)
    }

    /// Saved products in the order they were added.
    pub fn entries(&self) -> &[Product] {
        &self.entries
    }

    /// Number of saved products.
    pub fn count(&self) -> usize {
        self.entries.len()
    }

    /// Check if the wishlist is empty.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Take the last persistence failure, if one happened since the previous call.
    pub fn take_warning(&mut self) -> Option<StorageError> {
        self.warning.take()
    }

    fn persist(&mut self) {
        if let Err(error) = self.collection.save(&self.entries) {
            warn!(%error, "failed to persist wishlist; keeping in-memory state");

            self.warning = Some(error);
        }
    }
}

#[cfg(test)]
mod tests {
    use testresult::TestResult;

    use crate::{
        products::{Category, Sourcing},
        storage::MemoryBlobStore,
    };

    use super::*;

    fn product(id: &str) -> Product {
        Product {
            id: ProductId::new(id),
            name: format!("Product {id}"),
            price: 1000,
            category: Category::Earrings,
            image: String::new(),
            description: String::new(),
            featured: Some(true),
            material: Some("Gold".to_string()),
            sourcing: Sourcing::default(),
        }
    }

    fn empty_wishlist() -> (Arc<MemoryBlobStore>, Wishlist) {
        let store = Arc::new(MemoryBlobStore::new());
        let wishlist = Wishlist::load(store.clone());

        (store, wishlist)
    }

    #[test]
    fn add_is_idempotent() {
        let (_, mut wishlist) = empty_wishlist();
        let earrings = product("3");

        wishlist.add(&earrings);
        wishlist.add(&earrings);

        assert_eq!(wishlist.count(), 1);
        assert!(wishlist.contains(&earrings.id));
    }

    #[test]
    fn remove_missing_is_noop() {
        let (_, mut wishlist) = empty_wishlist();

        wishlist.add(&product("1"));
        wishlist.remove(&ProductId::new("2"));

        assert_eq!(wishlist.count(), 1);
    }

    #[test]
    fn remove_then_contains_is_false() {
        let (_, mut wishlist) = empty_wishlist();
        let ring = product("1");

        wishlist.add(&ring);
        wishlist.remove(&ring.id);

        assert!(!wishlist.contains(&ring.id));
        assert!(wishlist.is_empty());
    }

    #[test]
    fn toggle_flips_membership() {
        let (_, mut wishlist) = empty_wishlist();
        let ring = product("1");

        assert!(wishlist.toggle(&ring));
        assert!(!wishlist.toggle(&ring));
        assert!(wishlist.is_empty());
    }

    #[test]
    fn insertion_order_is_preserved_across_reloads() {
        let (store, mut wishlist) = empty_wishlist();

        wishlist.add(&product("5"));
        wishlist.add(&product("2"));
        wishlist.add(&product("7"));

        let reloaded = Wishlist::load(store);
        let ids: Vec<&str> = reloaded.entries().iter().map(|p| p.id.as_str()).collect();

        assert_eq!(ids, vec!["5", "2", "7"]);
    }

    #[test]
    fn hydration_drops_duplicate_ids() -> TestResult {
        let store = Arc::new(MemoryBlobStore::new());
        store.set(
            "wishlist",
            r#"[
                {"id":"1","name":"A","price":10,"category":"rings"},
                {"id":"1","name":"A","price":10,"category":"rings"}
            ]"#,
        )?;

        let wishlist = Wishlist::load(store);

        assert_eq!(wishlist.count(), 1);

        Ok(())
    }
}
