//! Vitrine
//!
//! Vitrine is the storefront core of a jewelry shop: a read-only product
//! catalog, a persisted cart and wishlist, shop filters, and a checkout
//! pipeline that validates payment-method dependent forms and records orders.

pub mod accounts;
pub mod cart;
pub mod catalog;
pub mod checkout;
pub mod config;
pub mod contact;
pub mod filters;
pub mod orders;
pub mod prelude;
pub mod pricing;
pub mod products;
pub mod session;
pub mod storage;
pub mod storefront;
pub mod validation;
pub mod wishlist;
