//! Vitrine prelude.
//!
//! Convenience exports for common library consumers.

pub use crate::{
    accounts::{
        Accounts, AccountsError, AuthService, Credentials, NewAccount, RemoteServiceError,
        SignInForm, SignUpForm,
    },
    cart::{Cart, CartLineItem},
    catalog::{Catalog, CatalogError, StaticCatalog},
    checkout::{
        Checkout, CheckoutError, CheckoutForm, CheckoutValidator, OrderDraft, Payment,
        PaymentDetails, PaymentMethod, Submission,
    },
    config::{ConfigError, StorefrontConfig},
    contact::{ContactForm, ContactMessage},
    filters::{FilterCriteria, PriceRange, ShopQuery, SortKey},
    orders::{AccessError, Order, OrderHistory, OrderSummary, PaymentStatus},
    pricing::{PricingError, format_price},
    products::{Category, Product, ProductId, ProductType, Sourcing},
    session::{Role, Session, SessionUser},
    storage::{BlobStore, FileBlobStore, MemoryBlobStore, StorageError, StoreKey},
    storefront::{ProductPage, Storefront, StorefrontInitError},
    validation::{Field, ValidationErrors},
    wishlist::Wishlist,
};
