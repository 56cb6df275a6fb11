//! Checkout form state
//!
//! The raw values the shopper typed, before validation. Each payment method
//! carries only its own fields, so switching method discards the others.

use serde::{Deserialize, Serialize};

use crate::validation::Field;

/// Contact step.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ContactDetails {
    /// Full name
    pub name: String,

    /// Email address
    pub email: String,

    /// Phone number
    pub phone: String,
}

/// Shipping step.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct AddressDetails {
    /// Street address
    pub address: String,

    /// City
    pub city: String,

    /// Postal code
    #[serde(alias = "pincode")]
    pub postal_code: String,
}

/// Payment method discriminator.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum PaymentMethod {
    /// Credit or debit card
    Card,
    /// Net banking
    NetBanking,
    /// Digital wallet
    Wallet,
    /// UPI
    Upi,
    /// Card EMI
    Emi,
    /// Cash on delivery
    CashOnDelivery,
    /// `PayPal`
    #[serde(rename = "paypal")]
    PayPal,
    /// Gift card or promo code
    GiftCard,
}

impl PaymentMethod {
    /// Every method, in the order the payment step lists them.
    pub const ALL: [PaymentMethod; 8] = [
        PaymentMethod::Card,
        PaymentMethod::NetBanking,
        PaymentMethod::Wallet,
        PaymentMethod::Upi,
        PaymentMethod::Emi,
        PaymentMethod::CashOnDelivery,
        PaymentMethod::PayPal,
        PaymentMethod::GiftCard,
    ];

    /// Wire name.
    pub fn as_str(self) -> &'static str {
        match self {
            PaymentMethod::Card => "card",
            PaymentMethod::NetBanking => "netBanking",
            PaymentMethod::Wallet => "wallet",
            PaymentMethod::Upi => "upi",
            PaymentMethod::Emi => "emi",
            PaymentMethod::CashOnDelivery => "cashOnDelivery",
            PaymentMethod::PayPal => "paypal",
            PaymentMethod::GiftCard => "giftCard",
        }
    }

    /// Whether payment is collected on delivery rather than up front.
    pub fn settles_on_delivery(self) -> bool {
        matches!(self, PaymentMethod::CashOnDelivery)
    }
}

impl std::fmt::Display for PaymentMethod {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Payment step, tagged by `paymentMethod`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "paymentMethod", rename_all = "camelCase")]
pub enum PaymentDetails {
    /// Card payment
    #[serde(rename_all = "camelCase")]
    Card {
        /// Card number as typed
        #[serde(default)]
        card_number: String,

        /// Name on card
        #[serde(default)]
        card_name: String,

        /// Expiry, `MM/YY`
        #[serde(default)]
        card_expiry: String,

        /// Security code
        #[serde(default)]
        card_cvv: String,
    },

    /// Net banking
    NetBanking {
        /// Selected bank
        #[serde(default)]
        bank: String,
    },

    /// Digital wallet
    #[serde(rename_all = "camelCase")]
    Wallet {
        /// Selected wallet
        #[serde(default)]
        wallet_provider: String,
    },

    /// UPI
    #[serde(rename_all = "camelCase")]
    Upi {
        /// UPI id, `name@bank`
        #[serde(default)]
        upi_id: String,
    },

    /// Card EMI
    #[serde(rename_all = "camelCase")]
    Emi {
        /// Issuing bank
        #[serde(default)]
        emi_provider: String,

        /// Tenure in months
        #[serde(default)]
        emi_tenure: String,
    },

    /// Cash on delivery
    CashOnDelivery,

    /// `PayPal`
    #[serde(rename = "paypal", rename_all = "camelCase")]
    PayPal {
        /// `PayPal` account email
        #[serde(default)]
        paypal_email: String,
    },

    /// Gift card or promo code
    #[serde(rename_all = "camelCase")]
    GiftCard {
        /// Code as typed
        #[serde(default)]
        gift_card_code: String,
    },
}

impl PaymentDetails {
    /// Blank details for `method`.
    pub fn empty(method: PaymentMethod) -> Self {
        match method {
            PaymentMethod::Card => PaymentDetails::Card {
                card_number: String::new(),
                card_name: String::new(),
                card_expiry: String::new(),
                card_cvv: String::new(),
            },
            PaymentMethod::NetBanking => PaymentDetails::NetBanking {
                bank: String::new(),
            },
            PaymentMethod::Wallet => PaymentDetails::Wallet {
                wallet_provider: String::new(),
            },
            PaymentMethod::Upi => PaymentDetails::Upi {
                upi_id: String::new(),
            },
            PaymentMethod::Emi => PaymentDetails::Emi {
                emi_provider: String::new(),
                emi_tenure: String::new(),
            },
            PaymentMethod::CashOnDelivery => PaymentDetails::CashOnDelivery,
            PaymentMethod::PayPal => PaymentDetails::PayPal {
                paypal_email: String::new(),
            },
            PaymentMethod::GiftCard => PaymentDetails::GiftCard {
                gift_card_code: String::new(),
            },
        }
    }

    /// The selected method.
    pub fn method(&self) -> PaymentMethod {
        match self {
            PaymentDetails::Card { .. } => PaymentMethod::Card,
            PaymentDetails::NetBanking { .. } => PaymentMethod::NetBanking,
            PaymentDetails::Wallet { .. } => PaymentMethod::Wallet,
            PaymentDetails::Upi { .. } => PaymentMethod::Upi,
            PaymentDetails::Emi { .. } => PaymentMethod::Emi,
            PaymentDetails::CashOnDelivery => PaymentMethod::CashOnDelivery,
            PaymentDetails::PayPal { .. } => PaymentMethod::PayPal,
            PaymentDetails::GiftCard { .. } => PaymentMethod::GiftCard,
        }
    }

    /// Fields shown for the selected method.
    pub fn fields(&self) -> &'static [Field] {
        match self {
            PaymentDetails::Card { .. } => &[
                Field::CardNumber,
                Field::CardName,
                Field::CardExpiry,
                Field::CardCvv,
            ],
            PaymentDetails::NetBanking { .. } => &[Field::Bank],
            PaymentDetails::Wallet { .. } => &[Field::WalletProvider],
            PaymentDetails::Upi { .. } => &[Field::UpiId],
            PaymentDetails::Emi { .. } => &[Field::EmiProvider, Field::EmiTenure],
            PaymentDetails::CashOnDelivery => &[],
            PaymentDetails::PayPal { .. } => &[Field::PaypalEmail],
            PaymentDetails::GiftCard { .. } => &[Field::GiftCardCode],
        }
    }
}

impl Default for PaymentDetails {
    fn default() -> Self {
        Self::empty(PaymentMethod::Card)
    }
}

/// Everything the checkout page collects.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CheckoutForm {
    /// Contact step
    #[serde(flatten)]
    pub contact: ContactDetails,

    /// Shipping step
    #[serde(flatten)]
    pub address: AddressDetails,

    /// Payment step
    #[serde(flatten)]
    pub payment: PaymentDetails,
}

impl CheckoutForm {
    /// Switch payment method. Details entered for the previous method are discarded.
    pub fn select_payment_method(&mut self, method: PaymentMethod) {
        if self.payment.method() != method {
            self.payment = PaymentDetails::empty(method);
        }
    }
}
