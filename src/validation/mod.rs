//! Form validation
//!
//! Shared building blocks for the checkout, account and contact forms. Every
//! form collects all of its violations into [`ValidationErrors`] rather than
//! stopping at the first one.

use std::{collections::BTreeMap, fmt};

use serde::{Serialize, Serializer};

pub mod rules;

pub use rules::{PatternError, Patterns};

/// Form field names, as shown next to inline errors.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Field {
    /// Full name
    Name,
    /// Email address
    Email,
    /// Phone number
    Phone,
    /// Street address
    Address,
    /// City
    City,
    /// Postal code
    PostalCode,
    /// Card number
    CardNumber,
    /// Name on card
    CardName,
    /// Card expiry (MM/YY)
    CardExpiry,
    /// Card security code
    CardCvv,
    /// Net banking bank
    Bank,
    /// Digital wallet provider
    WalletProvider,
    /// UPI id
    UpiId,
    /// EMI provider
    EmiProvider,
    /// EMI tenure
    EmiTenure,
    /// `PayPal` account email
    PaypalEmail,
    /// Gift card or promo code
    GiftCardCode,
    /// Account password
    Password,
    /// Password confirmation
    ConfirmPassword,
    /// Contact message body
    Message,
}

impl Field {
    /// Wire name of the field.
    pub fn as_str(self) -> &'static str {
        match self {
            Field::Name => "name",
            Field::Email => "email",
            Field::Phone => "phone",
            Field::Address => "address",
            Field::City => "city",
            Field::PostalCode => "postalCode",
            Field::CardNumber => "cardNumber",
            Field::CardName => "cardName",
            Field::CardExpiry => "cardExpiry",
            Field::CardCvv => "cardCvv",
            Field::Bank => "bank",
            Field::WalletProvider => "walletProvider",
            Field::UpiId => "upiId",
            Field::EmiProvider => "emiProvider",
            Field::EmiTenure => "emiTenure",
            Field::PaypalEmail => "paypalEmail",
            Field::GiftCardCode => "giftCardCode",
            Field::Password => "password",
            Field::ConfirmPassword => "confirmPassword",
            Field::Message => "message",
        }
    }
}

impl fmt::Display for Field {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl Serialize for Field {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

/// Field-scoped validation messages. Only the first message per field is kept.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct ValidationErrors {
    errors: BTreeMap<Field, String>,
}

impl ValidationErrors {
    /// No errors.
    pub fn new() -> Self {
        Self::default()
    }

    /// Record `message` for `field` unless the field already has one.
    pub fn add(&mut self, field: Field, message: impl Into<String>) {
        self.errors.entry(field).or_insert_with(|| message.into());
    }

    /// Record the error of `result` under `field`, passing an `Ok` value through.
    pub fn check<T>(&mut self, field: Field, result: Result<T, String>) -> Option<T> {
        match result {
            Ok(value) => Some(value),
            Err(message) => {
                self.add(field, message);
                None
            }
        }
    }

    /// Message for `field`, if it failed.
    pub fn get(&self, field: Field) -> Option<&str> {
        self.errors.get(&field).map(String::as_str)
    }

    /// Whether `field` failed.
    pub fn contains(&self, field: Field) -> bool {
        self.errors.contains_key(&field)
    }

    /// Failed fields in declaration order.
    pub fn fields(&self) -> impl Iterator<Item = Field> + '_ {
        self.errors.keys().copied()
    }

    /// Failed fields with their messages.
    pub fn iter(&self) -> impl Iterator<Item = (Field, &str)> + '_ {
        self.errors
            .iter()
            .map(|(field, message)| (*field, message.as_str()))
    }

    /// The first message, for a summary toast.
    pub fn first(&self) -> Option<(Field, &str)> {
        self.iter().next()
    }

    /// Number of failed fields.
    pub fn len(&self) -> usize {
        self.errors.len()
    }

    /// Check if there are no errors.
    pub fn is_empty(&self) -> bool {
        self.errors.is_empty()
    }

    /// `Ok(value)` when there are no errors, otherwise `Err(self)`.
    ///
    /// # Errors
    ///
    /// Returns `self` if any field failed.
    pub fn into_result<T>(self, value: impl FnOnce() -> Option<T>) -> Result<T, Self> {
        if !self.is_empty() {
            return Err(self);
        }

        value().ok_or(self)
    }
}

impl fmt::Display for ValidationErrors {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (position, (field, message)) in self.iter().enumerate() {
            if position > 0 {
                f.write_str("; ")?;
            }

            write!(f, "{field}: {message}")?;
        }

        Ok(())
    }
}

impl std::error::Error for ValidationErrors {}
