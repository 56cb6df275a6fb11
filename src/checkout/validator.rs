//! Checkout validation
//!
//! Turns a [`CheckoutForm`] into a normalized [`OrderDraft`], or reports every
//! invalid field at once.

use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::{
    checkout::form::{CheckoutForm, PaymentDetails, PaymentMethod},
    config::{ConfigError, ValidationConfig},
    validation::{
        Field, Patterns, ValidationErrors,
        rules::{self, card_number, required, text},
    },
};

/// Who placed the order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Customer {
    /// Trimmed full name
    pub name: String,

    /// Lowercased email
    pub email: String,

    /// Phone digits with an optional leading `+`
    pub phone: String,
}

/// Where the order ships.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ShippingAddress {
    /// Street address
    pub address: String,

    /// City
    pub city: String,

    /// Postal code
    pub postal_code: String,
}

/// Payment as recorded on an order. Card numbers are reduced to their last four digits.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "method", rename_all = "camelCase")]
pub enum Payment {
    /// Card payment
    #[serde(rename_all = "camelCase")]
    Card {
        /// Name on card
        holder: String,
        /// Last four digits
        last_four: String,
        /// Expiry, `MM/YY`
        expiry: String,
    },

    /// Net banking
    NetBanking {
        /// Bank
        bank: String,
    },

    /// Digital wallet
    Wallet {
        /// Wallet provider
        provider: String,
    },

    /// UPI
    #[serde(rename_all = "camelCase")]
    Upi {
        /// UPI id
        upi_id: String,
    },

    /// Card EMI
    Emi {
        /// Issuing bank
        provider: String,
        /// Tenure in months
        tenure: String,
    },

    /// Cash on delivery
    CashOnDelivery,

    /// `PayPal`
    #[serde(rename = "paypal")]
    PayPal {
        /// Account email
        email: String,
    },

    /// Gift card
    GiftCard {
        /// Uppercased code
        code: String,
    },
}

impl Payment {
    /// The method used.
    pub fn method(&self) -> PaymentMethod {
        match self {
            Payment::Card { .. } => PaymentMethod::Card,
            Payment::NetBanking { .. } => PaymentMethod::NetBanking,
            Payment::Wallet { .. } => PaymentMethod::Wallet,
            Payment::Upi { .. } => PaymentMethod::Upi,
            Payment::Emi { .. } => PaymentMethod::Emi,
            Payment::CashOnDelivery => PaymentMethod::CashOnDelivery,
            Payment::PayPal { .. } => PaymentMethod::PayPal,
            Payment::GiftCard { .. } => PaymentMethod::GiftCard,
        }
    }
}

/// A validated, normalized checkout form.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrderDraft {
    /// Contact details
    pub customer: Customer,

    /// Shipping address
    pub shipping: ShippingAddress,

    /// Payment details
    pub payment: Payment,
}

/// Validates checkout forms against the configured rules.
#[derive(Debug, Clone)]
pub struct CheckoutValidator {
    patterns: &'static Patterns,
    postal_code: Regex,
    gift_card_min_length: usize,
}

impl CheckoutValidator {
    /// Build a validator from configuration.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Pattern`] if a pattern does not compile.
    pub fn new(config: &ValidationConfig) -> Result<Self, ConfigError> {
        Ok(Self {
            patterns: Patterns::builtin()?,
            postal_code: rules::compile(&config.postal_code_pattern)?,
            gift_card_min_length: config.gift_card_min_length,
        })
    }

    /// Validate the whole form.
    ///
    /// # Errors
    ///
    /// Returns every failing field with its first message.
    pub fn validate(&self, form: &CheckoutForm) -> Result<OrderDraft, ValidationErrors> {
        let mut errors = ValidationErrors::new();

        let customer = self.customer(form, &mut errors);
        let shipping = self.shipping(form, &mut errors);
        let payment = self.payment(&form.payment, &mut errors);

        errors.into_result(|| {
            Some(OrderDraft {
                customer: customer?,
                shipping: shipping?,
                payment: payment?,
            })
        })
    }

    /// Message for `field` after the whole form is validated, as shown on blur.
    pub fn field_error(&self, form: &CheckoutForm, field: Field) -> Option<String> {
        self.validate(form)
            .err()
            .and_then(|errors| errors.get(field).map(str::to_string))
    }

    fn customer(&self, form: &CheckoutForm, errors: &mut ValidationErrors) -> Option<Customer> {
        let contact = &form.contact;

        let name = errors.check(Field::Name, self.patterns.person_name(&contact.name));
        let email = errors.check(Field::Email, self.patterns.email(&contact.email, "Email"));
        let phone = errors.check(Field::Phone, self.patterns.phone(&contact.phone));

        Some(Customer {
            name: name?,
            email: email?,
            phone: phone?,
        })
    }

    fn shipping(
        &self,
        form: &CheckoutForm,
        errors: &mut ValidationErrors,
    ) -> Option<ShippingAddress> {
        let details = &form.address;

        let address = errors.check(Field::Address, text(&details.address, "Address", 10, 500));
        let city = errors.check(Field::City, text(&details.city, "City", 2, 100));
        let postal_code = errors.check(
            Field::PostalCode,
            required(&details.postal_code, "Postal code is required").and_then(|code| {
                rules::matching(code, &self.postal_code, "Invalid postal code")
            }),
        );

        Some(ShippingAddress {
            address: address?,
            city: city?,
            postal_code: postal_code?,
        })
    }

    fn payment(&self, details: &PaymentDetails, errors: &mut ValidationErrors) -> Option<Payment> {
        match details {
            PaymentDetails::Card {
                card_number: number,
                card_name,
                card_expiry,
                card_cvv,
            } => {
                let number = errors.check(Field::CardNumber, card_number(number));
                let holder = errors.check(
                    Field::CardName,
                    required(card_name, "Name on card is required"),
                );
                let expiry = errors.check(Field::CardExpiry, self.patterns.card_expiry(card_expiry));
                let cvv = errors.check(Field::CardCvv, self.patterns.card_cvv(card_cvv));

                let number = number?;
                cvv?;

                Some(Payment::Card {
                    holder: holder?,
                    last_four: number.get(number.len().saturating_sub(4)..)?.to_string(),
                    expiry: expiry?,
                })
            }
            PaymentDetails::NetBanking { bank } => {
                let bank = errors.check(Field::Bank, required(bank, "Please select a bank"));

                Some(Payment::NetBanking { bank: bank? })
            }
            PaymentDetails::Wallet { wallet_provider } => {
                let provider = errors.check(
                    Field::WalletProvider,
                    required(wallet_provider, "Please select a wallet"),
                );

                Some(Payment::Wallet {
                    provider: provider?,
                })
            }
            PaymentDetails::Upi { upi_id } => {
                let upi_id = errors.check(Field::UpiId, self.patterns.upi_id(upi_id));

                Some(Payment::Upi { upi_id: upi_id? })
            }
            PaymentDetails::Emi {
                emi_provider,
                emi_tenure,
            } => {
                let provider = errors.check(
                    Field::EmiProvider,
                    required(emi_provider, "Please select an EMI provider"),
                );
                let tenure = errors.check(
                    Field::EmiTenure,
                    required(emi_tenure, "Please select an EMI tenure"),
                );

                Some(Payment::Emi {
                    provider: provider?,
                    tenure: tenure?,
                })
            }
            PaymentDetails::CashOnDelivery => Some(Payment::CashOnDelivery),
            PaymentDetails::PayPal { paypal_email } => {
                let email = errors.check(
                    Field::PaypalEmail,
                    self.patterns.email(paypal_email, "PayPal email"),
                );

                Some(Payment::PayPal { email: email? })
            }
            PaymentDetails::GiftCard { gift_card_code } => {
                let code = errors.check(Field::GiftCardCode, self.gift_card(gift_card_code));

                Some(Payment::GiftCard { code: code? })
            }
        }
    }

    fn gift_card(&self, value: &str) -> Result<String, String> {
        let code = required(value, "Gift card code is required")?;

        if code.chars().count() < self.gift_card_min_length {
            return Err(format!(
                "Gift card code must be at least {} characters",
                self.gift_card_min_length
            ));
        }

        Ok(code.to_uppercase())
    }
}

#[cfg(test)]
mod tests {
    use testresult::TestResult;

    use crate::checkout::form::{AddressDetails, ContactDetails};

    use super::*;

    fn validator() -> Result<CheckoutValidator, ConfigError> {
        CheckoutValidator::new(&ValidationConfig::default())
    }

    fn form(payment: PaymentDetails) -> CheckoutForm {
        CheckoutForm {
            contact: ContactDetails {
                name: " Asha Rao ".to_string(),
                email: "Asha@Example.com".to_string(),
                phone: "+91 98765-43210".to_string(),
            },
            address: AddressDetails {
                address: "12 MG Road, Indiranagar".to_string(),
                city: "Bengaluru".to_string(),
                postal_code: "560038".to_string(),
            },
            payment,
        }
    }

    #[test]
    fn valid_card_form_is_normalized() -> TestResult {
        let draft = validator()?.validate(&form(PaymentDetails::Card {
            card_number: "4111 1111 1111 1234".to_string(),
            card_name: "ASHA RAO".to_string(),
            card_expiry: "09/28".to_string(),
            card_cvv: "123".to_string(),
        }))?;

        assert_eq!(draft.customer.name, "Asha Rao");
        assert_eq!(draft.customer.email, "asha@example.com");
        assert_eq!(draft.customer.phone, "+919876543210");
        assert_eq!(
            draft.payment,
            Payment::Card {
                holder: "ASHA RAO".to_string(),
                last_four: "1234".to_string(),
                expiry: "09/28".to_string(),
            }
        );

        Ok(())
    }

    #[test]
    fn empty_card_fields_report_all_four_errors() -> TestResult {
        let errors = validator()?
            .validate(&form(PaymentDetails::empty(PaymentMethod::Card)))
            .err()
            .ok_or("expected validation errors")?;

        let fields: Vec<Field> = errors.fields().collect();

        assert_eq!(
            fields,
            vec![
                Field::CardNumber,
                Field::CardName,
                Field::CardExpiry,
                Field::CardCvv
            ]
        );

        Ok(())
    }

    #[test]
    fn empty_form_reports_every_section() -> TestResult {
        let errors = validator()?
            .validate(&CheckoutForm::default())
            .err()
            .ok_or("expected validation errors")?;

        for field in [Field::Name, Field::Email, Field::Phone, Field::Address, Field::City, Field::PostalCode] {
            assert!(errors.contains(field), "missing {field}");
        }
        assert_eq!(errors.get(Field::Name), Some("Name is required"));

        Ok(())
    }

    #[test]
    fn invalid_upi_id_is_reported_on_upi_field() -> TestResult {
        let errors = validator()?
            .validate(&form(PaymentDetails::Upi {
                upi_id: "not-an-email-shape".to_string(),
            }))
            .err()
            .ok_or("expected validation errors")?;

        assert_eq!(errors.fields().collect::<Vec<_>>(), vec![Field::UpiId]);

        Ok(())
    }

    #[test]
    fn cash_on_delivery_needs_no_payment_fields() -> TestResult {
        let draft = validator()?.validate(&form(PaymentDetails::CashOnDelivery))?;

        assert_eq!(draft.payment, Payment::CashOnDelivery);

        Ok(())
    }

    #[test]
    fn emi_requires_provider_and_tenure() -> TestResult {
        let errors = validator()?
            .validate(&form(PaymentDetails::Emi {
                emi_provider: "HDFC".to_string(),
                emi_tenure: String::new(),
            }))
            .err()
            .ok_or("expected validation errors")?;

        assert!(errors.contains(Field::EmiTenure));
        assert!(!errors.contains(Field::EmiProvider));

        Ok(())
    }

    #[test]
    fn gift_card_minimum_length_is_configurable() -> TestResult {
        let strict = CheckoutValidator::new(&ValidationConfig {
            gift_card_min_length: 12,
            ..ValidationConfig::default()
        })?;
        let payment = PaymentDetails::GiftCard {
            gift_card_code: "gift-2024x".to_string(),
        };

        assert!(strict.validate(&form(payment.clone())).is_err());

        let draft = validator()?.validate(&form(payment))?;
        assert_eq!(
            draft.payment,
            Payment::GiftCard {
                code: "GIFT-2024X".to_string()
            }
        );

        Ok(())
    }

    #[test]
    fn postal_code_pattern_is_configurable() -> TestResult {
        let us = CheckoutValidator::new(&ValidationConfig {
            postal_code_pattern: r"^\d{5}$".to_string(),
            ..ValidationConfig::default()
        })?;

        let errors = us
            .validate(&form(PaymentDetails::CashOnDelivery))
            .err()
            .ok_or("expected validation errors")?;

        assert_eq!(errors.get(Field::PostalCode), Some("Invalid postal code"));

        Ok(())
    }

    #[test]
    fn bad_postal_pattern_fails_construction() {
        let result = CheckoutValidator::new(&ValidationConfig {
            postal_code_pattern: "([".to_string(),
            ..ValidationConfig::default()
        });

        assert!(matches!(result, Err(ConfigError::Pattern(_))));
    }

    #[test]
    fn field_error_reports_only_touched_field() -> TestResult {
        let validator = validator()?;
        let mut form = form(PaymentDetails::PayPal {
            paypal_email: "nope".to_string(),
        });
        form.contact.email = String::new();

        assert_eq!(
            validator.field_error(&form, Field::PaypalEmail),
            Some("Invalid email address".to_string())
        );
        assert_eq!(
            validator.field_error(&form, Field::Email),
            Some("Email is required".to_string())
        );
        assert_eq!(validator.field_error(&form, Field::City), None);

        Ok(())
    }
}
