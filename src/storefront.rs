//! Storefront
//!
//! Wires the catalog, the persisted engines and the session together over one
//! blob store. This is what a front end holds for the lifetime of a visit.

use std::sync::Arc;

use thiserror::Error;
use tracing::info;

use crate::{
    cart::Cart,
    catalog::{Catalog, CatalogError, RELATED_PRODUCTS_LIMIT, StaticCatalog},
    checkout::{Checkout, CheckoutError, CheckoutForm, CheckoutValidator},
    config::{ConfigError, StorefrontConfig},
    filters::{FilterCriteria, ShopQuery},
    orders::{AccessError, Order, OrderHistory, OrderSummary},
    products::{Product, ProductId},
    session::Session,
    storage::BlobStore,
    wishlist::Wishlist,
};

/// Storefront start-up errors
#[derive(Debug, Error)]
pub enum StorefrontInitError {
    /// The catalog could not be loaded.
    #[error(transparent)]
    Catalog(#[from] CatalogError),

    /// The configuration is invalid.
    #[error(transparent)]
    Config(#[from] ConfigError),
}

/// A product with the related products shown beneath it.
#[derive(Debug, Clone, PartialEq)]
pub struct ProductPage<'a> {
    /// The product
    pub product: &'a Product,

    /// Same-category suggestions
    pub related: Vec<&'a Product>,
}

/// One shopper's storefront state.
#[derive(Debug)]
pub struct Storefront {
    /// Products on sale
    pub catalog: Arc<dyn Catalog>,

    /// Shopping cart
    pub cart: Cart,

    /// Saved products
    pub wishlist: Wishlist,

    /// Placed orders
    pub orders: OrderHistory,

    /// Signed-in user
    pub session: Session,

    config: StorefrontConfig,
    validator: CheckoutValidator,
}

impl Storefront {
    /// Open the storefront, hydrating every engine from `store`.
    ///
    /// # Errors
    ///
    /// Returns [`StorefrontInitError::Config`] if a configured pattern is invalid.
    pub fn open(
        catalog: Arc<dyn Catalog>,
        store: Arc<dyn BlobStore>,
        config: StorefrontConfig,
    ) -> Result<Self, StorefrontInitError> {
        let validator = CheckoutValidator::new(&config.validation)?;

        let storefront = Self {
            catalog,
            cart: Cart::load(store.clone()),
            wishlist: Wishlist::load(store.clone()),
            orders: OrderHistory::load(store.clone()),
            session: Session::restore(store),
            config,
            validator,
        };

        info!(
            cart_items = storefront.cart.count(),
            wishlist = storefront.wishlist.count(),
            orders = storefront.orders.len(),
            signed_in = storefront.session.is_authenticated(),
            "storefront opened"
        );

        Ok(storefront)
    }

    /// Open the storefront over the bundled catalog.
    ///
    /// # Errors
    ///
    /// Returns an error if the bundled catalog or the configuration is invalid.
    pub fn with_bundled_catalog(
        store: Arc<dyn BlobStore>,
        config: StorefrontConfig,
    ) -> Result<Self, StorefrontInitError> {
        Self::open(Arc::new(StaticCatalog::bundled()?), store, config)
    }

    /// Active configuration.
    pub fn config(&self) -> &StorefrontConfig {
        &self.config
    }

    /// A shop query starting from the configured price range.
    pub fn shop_query(&self) -> ShopQuery {
        ShopQuery {
            criteria: FilterCriteria {
                price_range: self.config.shop.price_range,
                ..FilterCriteria::default()
            },
            ..ShopQuery::default()
        }
    }

    /// Products matching `query`, sorted.
    pub fn browse(&self, query: &ShopQuery) -> Vec<&Product> {
        query.apply(self.catalog.list_all())
    }

    /// Product detail with related products.
    ///
    /// # Errors
    ///
    /// Returns [`CatalogError::NotFound`] for an unknown id.
    pub fn product_page(&self, id: &ProductId) -> Result<ProductPage<'_>, CatalogError> {
        let product = self.catalog.find_by_id(id)?;

        Ok(ProductPage {
            product,
            related: self.catalog.related(product, RELATED_PRODUCTS_LIMIT),
        })
    }

    /// Add one unit of the product `id` to the cart.
    ///
    /// # Errors
    ///
    /// Returns [`CatalogError::NotFound`] for an unknown id.
    pub fn add_to_cart(&mut self, id: &ProductId) -> Result<(), CatalogError> {
        let product = self.catalog.find_by_id(id)?;

        self.cart.add(product);

        Ok(())
    }

    /// Save the product `id` to the wishlist, or remove it if saved.
    /// Returns whether it is now saved.
    ///
    /// # Errors
    ///
    /// Returns [`CatalogError::NotFound`] for an unknown id.
    pub fn toggle_wishlist(&mut self, id: &ProductId) -> Result<bool, CatalogError> {
        let product = self.catalog.find_by_id(id)?;

        Ok(self.wishlist.toggle(product))
    }

    /// Open checkout for the current cart.
    ///
    /// # Errors
    ///
    /// Returns [`CheckoutError::EmptyCart`] if the cart is empty.
    pub fn checkout(&self) -> Result<Checkout, CheckoutError> {
        Checkout::enter(
            &self.cart,
            self.validator.clone(),
            self.config.checkout.processing_delay(),
        )
    }

    /// Open checkout and submit `form` in one go.
    ///
    /// # Errors
    ///
    /// See [`Checkout::enter`] and [`Checkout::submit`].
    pub async fn place_order(&mut self, form: &CheckoutForm) -> Result<Order, CheckoutError> {
        let mut checkout = self.checkout()?;

        checkout.submit(form, &mut self.cart, &mut self.orders).await
    }

    /// Admin dashboard totals for the current session.
    ///
    /// # Errors
    ///
    /// Returns [`AccessError`] unless an administrator is signed in.
    pub fn order_summary(&self) -> Result<OrderSummary, AccessError> {
        self.orders.summary(&self.session)
    }
}
