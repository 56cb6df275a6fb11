//! Contact form

use serde::{Deserialize, Serialize};

use crate::validation::{Field, Patterns, ValidationErrors, rules::text};

/// Contact form as typed.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ContactForm {
    /// Name
    pub name: String,

    /// Email
    pub email: String,

    /// Phone, optional
    pub phone: String,

    /// Message body
    pub message: String,
}

/// A validated contact enquiry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContactMessage {
    /// Trimmed name
    pub name: String,

    /// Lowercased email
    pub email: String,

    /// Normalized phone, if given
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,

    /// Trimmed message
    pub message: String,
}

impl ContactForm {
    /// Validate the form.
    ///
    /// # Errors
    ///
    /// Returns every invalid field.
    pub fn validate(&self, patterns: &Patterns) -> Result<ContactMessage, ValidationErrors> {
        let mut errors = ValidationErrors::new();

        let name = errors.check(Field::Name, text(&self.name, "Name", 2, 100));
        let email = errors.check(Field::Email, patterns.email(&self.email, "Email"));
        let phone = if self.phone.trim().is_empty() {
            Some(None)
        } else {
            errors
                .check(Field::Phone, patterns.phone(&self.phone))
                .map(Some)
        };
        let message = errors.check(Field::Message, text(&self.message, "Message", 10, 2000));

        errors.into_result(|| {
            Some(ContactMessage {
                name: name?,
                email: email?,
                phone: phone?,
                message: message?,
            })
        })
    }
}

#[cfg(test)]
mod tests {
    use testresult::TestResult;

    use super::*;

    #[test]
    fn valid_enquiry_without_phone() -> TestResult {
        let form = ContactForm {
            name: "Asha".to_string(),
            email: "ASHA@example.com ".to_string(),
            phone: "  ".to_string(),
            message: "Do you resize rings?".to_string(),
        };

        let message = form.validate(Patterns::builtin()?)?;

        assert_eq!(message.email, "asha@example.com");
        assert_eq!(message.phone, None);

        Ok(())
    }

    #[test]
    fn short_message_and_bad_phone_are_both_reported() -> TestResult {
        let form = ContactForm {
            name: "Asha".to_string(),
            email: "asha@example.com".to_string(),
            phone: "call me".to_string(),
            message: "Hi".to_string(),
        };

        let errors = form
            .validate(Patterns::builtin()?)
            .err()
            .ok_or("expected validation errors")?;

        assert_eq!(
            errors.get(Field::Message),
            Some("Message must be at least 10 characters")
        );
        assert!(errors.contains(Field::Phone));
        assert_eq!(errors.len(), 2);

        Ok(())
    }
}
