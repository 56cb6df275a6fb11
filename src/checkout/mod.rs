//! Checkout
//!
//! Form state, validation and the submission lifecycle that turns a cart into
//! an [`Order`](crate::orders::Order).

pub mod form;
pub mod submission;
pub mod validator;

pub use form::{AddressDetails, CheckoutForm, ContactDetails, PaymentDetails, PaymentMethod};
pub use submission::{Checkout, CheckoutError, Submission};
pub use validator::{CheckoutValidator, Customer, OrderDraft, Payment, ShippingAddress};
