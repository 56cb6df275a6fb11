//! Checkout submission
//!
//! A submission is split in two around the simulated payment delay:
//! [`Checkout::begin`] validates and snapshots the cart, and
//! [`Checkout::complete`] records the order and takes the ordered lines out
//! of the cart, leaving anything added in the meantime. Only one
//! submission may be in flight, and [`Checkout::abandon`] turns a pending one
//! stale so that its late completion changes nothing.

use std::time::Duration;

use jiff::Timestamp;
use thiserror::Error;
use tracing::{debug, info, warn};

use crate::{
    cart::{Cart, CartLineItem},
    checkout::{
        form::CheckoutForm,
        validator::{CheckoutValidator, OrderDraft},
    },
    orders::{Order, OrderHistory},
    storage::StorageError,
    validation::{Field, ValidationErrors},
};

/// Checkout errors
#[derive(Debug, Error)]
pub enum CheckoutError {
    /// Checkout was opened with nothing in the cart.
    #[error("your cart is empty")]
    EmptyCart,

    /// A submission is already being processed.
    #[error("an order is already being placed")]
    InFlight,

    /// The submission was abandoned before it completed.
    #[error("checkout was abandoned")]
    Stale,

    /// The form has invalid fields.
    #[error("please correct the highlighted fields: {0}")]
    Invalid(ValidationErrors),

    /// The order could not be recorded.
    #[error("failed to place order: {0}")]
    Persistence(#[source] StorageError),
}

/// A validated submission waiting out the processing delay.
#[derive(Debug, Clone)]
pub struct Submission {
    ticket: u64,
    draft: OrderDraft,
    items: Vec<CartLineItem>,
    total: u64,
}

impl Submission {
    /// The normalized form.
    pub fn draft(&self) -> &OrderDraft {
        &self.draft
    }

    /// Cart lines at submission time.
    pub fn items(&self) -> &[CartLineItem] {
        &self.items
    }

    /// Cart total at submission time.
    pub fn total(&self) -> u64 {
        self.total
    }
}

/// One visit to the checkout page.
#[derive(Debug)]
pub struct Checkout {
    validator: CheckoutValidator,
    processing_delay: Duration,
    errors: ValidationErrors,
    next_ticket: u64,
    in_flight: Option<u64>,
}

impl Checkout {
    /// Open checkout for `cart`.
    ///
    /// # Errors
    ///
    /// Returns [`CheckoutError::EmptyCart`] if the cart has no items.
    pub fn enter(
        cart: &Cart,
        validator: CheckoutValidator,
        processing_delay: Duration,
    ) -> Result<Self, CheckoutError> {
        if cart.is_empty() {
            return Err(CheckoutError::EmptyCart);
        }

        Ok(Self {
            validator,
            processing_delay,
            errors: ValidationErrors::new(),
            next_ticket: 0,
            in_flight: None,
        })
    }

    /// Validate `form` without recording anything.
    ///
    /// # Errors
    ///
    /// Returns every invalid field.
    pub fn validate(&self, form: &CheckoutForm) -> Result<OrderDraft, ValidationErrors> {
        self.validator.validate(form)
    }

    /// Re-validate the whole form after `field` loses focus and update that
    /// field's inline message. Returns the message, if any.
    pub fn blur(&mut self, form: &CheckoutForm, field: Field) -> Option<&str> {
        let message = self.validator.field_error(form, field);
        let mut errors = ValidationErrors::new();

        for (recorded, text) in self.errors.iter().filter(|(recorded, _)| *recorded != field) {
            errors.add(recorded, text);
        }

        if let Some(message) = message {
            errors.add(field, message);
        }

        self.errors = errors;
        self.errors.get(field)
    }

    /// Inline messages currently shown.
    pub fn errors(&self) -> &ValidationErrors {
        &self.errors
    }

    /// Whether a submission is in flight.
    pub fn is_submitting(&self) -> bool {
        self.in_flight.is_some()
    }

    /// Validate `form` and snapshot `cart`.
    ///
    /// # Errors
    ///
    /// - [`CheckoutError::InFlight`]: another submission has not finished.
    /// - [`CheckoutError::Invalid`]: the form has invalid fields.
    pub fn begin(&mut self, form: &CheckoutForm, cart: &Cart) -> Result<Submission, CheckoutError> {
        if self.in_flight.is_some() {
            return Err(CheckoutError::InFlight);
        }

        let draft = match self.validator.validate(form) {
            Ok(draft) => draft,
            Err(errors) => {
                debug!(fields = errors.len(), "checkout form rejected");

                self.errors = errors.clone();

                return Err(CheckoutError::Invalid(errors));
            }
        };

        self.errors = ValidationErrors::new();

        let ticket = self.next_ticket;
        self.next_ticket = self.next_ticket.wrapping_add(1);
        self.in_flight = Some(ticket);

        debug!(ticket, method = %draft.payment.method(), "checkout submission started");

        Ok(Submission {
            ticket,
            draft,
            items: cart.snapshot(),
            total: cart.total(),
        })
    }

    /// Record the order for `submission` and remove the ordered quantities
    /// from `cart`.
    ///
    /// # Errors
    ///
    /// - [`CheckoutError::Stale`]: the submission was abandoned; nothing changes.
    /// - [`CheckoutError::Persistence`]: the order history could not be written;
    ///   the cart is left as it was.
    pub fn complete(
        &mut self,
        submission: Submission,
        cart: &mut Cart,
        history: &mut OrderHistory,
    ) -> Result<Order, CheckoutError> {
        if self.in_flight != Some(submission.ticket) {
            warn!(ticket = submission.ticket, "ignoring stale checkout submission");

            return Err(CheckoutError::Stale);
        }

        self.in_flight = None;

        let order = Order::place(
            submission.draft,
            submission.items,
            submission.total,
            Timestamp::now(),
        );

        history
            .append(order.clone())
            .map_err(CheckoutError::Persistence)?;

        cart.remove_ordered(&order.items);

        info!(
            order = %order.order_number,
            total = order.total,
            status = %order.payment_status,
            "order placed"
        );

        Ok(order)
    }

    /// Drop the in-flight submission, if any.
    pub fn abandon(&mut self) {
        if let Some(ticket) = self.in_flight.take() {
            debug!(ticket, "checkout submission abandoned");
        }
    }

    /// Validate, wait out the processing delay, then place the order.
    ///
    /// # Errors
    ///
    /// See [`Checkout::begin`] and [`Checkout::complete`].
    pub async fn submit(
        &mut self,
        form: &CheckoutForm,
        cart: &mut Cart,
        history: &mut OrderHistory,
    ) -> Result<Order, CheckoutError> {
        let submission = self.begin(form, cart)?;

        tokio::time::sleep(self.processing_delay).await;

        self.complete(submission, cart, history)
    }
}
