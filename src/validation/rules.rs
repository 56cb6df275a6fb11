//! Field rules
//!
//! Each rule takes the raw input and returns either the normalized value or
//! the message to show next to the field.

use once_cell::sync::OnceCell;
use regex::Regex;
use thiserror::Error;

/// Longest accepted email address.
pub const MAX_EMAIL_LENGTH: usize = 255;

static BUILTIN: OnceCell<Patterns> = OnceCell::new();

/// A validation pattern failed to compile.
#[derive(Debug, Error)]
#[error("invalid pattern `{pattern}`: {source}")]
pub struct PatternError {
    pattern: String,

    #[source]
    source: regex::Error,
}

/// Compile `pattern`, keeping it in the error on failure.
///
/// # Errors
///
/// Returns [`PatternError`] if the pattern is not a valid regex.
pub fn compile(pattern: &str) -> Result<Regex, PatternError> {
    Regex::new(pattern).map_err(|source| PatternError {
        pattern: pattern.to_string(),
        source,
    })
}

/// Fixed patterns shared by every form.
#[derive(Debug)]
pub struct Patterns {
    person_name: Regex,
    email: Regex,
    phone: Regex,
    card_expiry: Regex,
    card_cvv: Regex,
    upi_id: Regex,
}

impl Patterns {
    /// The process-wide pattern set, compiled on first use.
    ///
    /// # Errors
    ///
    /// Returns [`PatternError`] if a built-in pattern fails to compile.
    pub fn builtin() -> Result<&'static Patterns, PatternError> {
        BUILTIN.get_or_try_init(Self::compile)
    }

    fn compile() -> Result<Self, PatternError> {
        Ok(Self {
            person_name: compile(r"^[\p{L}\s]+$")?,
            email: compile(r"^[^\s@]+@[^\s@]+\.[^\s@]+$")?,
            phone: compile(r"^\+?[1-9]\d{9,14}$")?,
            card_expiry: compile(r"^(0[1-9]|1[0-2])/\d{2}$")?,
            card_cvv: compile(r"^\d{3,4}$")?,
            upi_id: compile(r"^[A-Za-z0-9._\-]{2,256}@[A-Za-z]{2,64}$")?,
        })
    }

    /// Full name: 2 to 100 characters, letters and spaces only.
    pub(crate) fn person_name(&self, value: &str) -> Result<String, String> {
        let name = text(value, "Name", 2, 100)?;

        matching(name, &self.person_name, "Name can only contain letters and spaces")
    }

    /// Email address, lowercased.
    pub(crate) fn email(&self, value: &str, label: &str) -> Result<String, String> {
        let email = value.trim();

        if email.is_empty() {
            return Err(format!("{label} is required"));
        }

        if email.chars().count() > MAX_EMAIL_LENGTH {
            return Err(format!("{label} is too long"));
        }

        matching(email.to_lowercase(), &self.email, "Invalid email address")
    }

    /// Phone number with spaces, dashes and parentheses removed.
    pub(crate) fn phone(&self, value: &str) -> Result<String, String> {
        let phone: String = value
            .chars()
            .filter(|c| !matches!(c, ' ' | '-' | '(' | ')'))
            .collect();

        if phone.is_empty() {
            return Err("Phone number is required".to_string());
        }

        matching(phone, &self.phone, "Invalid phone number (e.g. +919876543210)")
    }

    /// Card expiry in `MM/YY` form.
    pub(crate) fn card_expiry(&self, value: &str) -> Result<String, String> {
        matching(
            value.trim().to_string(),
            &self.card_expiry,
            "Expiry must be in MM/YY format",
        )
    }

    /// Card security code, 3 or 4 digits.
    pub(crate) fn card_cvv(&self, value: &str) -> Result<String, String> {
        matching(value.trim().to_string(), &self.card_cvv, "CVV must be 3 or 4 digits")
    }

    /// UPI id (`name@bank`), lowercased.
    pub(crate) fn upi_id(&self, value: &str) -> Result<String, String> {
        let upi_id = value.trim();

        if upi_id.is_empty() {
            return Err("UPI ID is required".to_string());
        }

        matching(
            upi_id.to_lowercase(),
            &self.upi_id,
            "Invalid UPI ID (e.g. name@bank)",
        )
    }
}

/// Trimmed text between `min` and `max` characters.
pub(crate) fn text(value: &str, label: &str, min: usize, max: usize) -> Result<String, String> {
    let trimmed = value.trim();
    let length = trimmed.chars().count();

    if length == 0 {
        return Err(format!("{label} is required"));
    }

    if length < min {
        return Err(format!("{label} must be at least {min} characters"));
    }

    if length > max {
        return Err(format!("{label} must be at most {max} characters"));
    }

    Ok(trimmed.to_string())
}

/// Trimmed, non-empty text.
pub(crate) fn required(value: &str, message: &str) -> Result<String, String> {
    let trimmed = value.trim();

    if trimmed.is_empty() {
        Err(message.to_string())
    } else {
        Ok(trimmed.to_string())
    }
}

/// 16-digit card number; spaces and dashes are ignored.
pub(crate) fn card_number(value: &str) -> Result<String, String> {
    let digits: String = value
        .chars()
        .filter(|c| !c.is_whitespace() && *c != '-')
        .collect();

    if digits.len() == 16 && digits.chars().all(|c| c.is_ascii_digit()) {
        Ok(digits)
    } else {
        Err("Card number must be 16 digits".to_string())
    }
}

/// `value` unchanged if it matches `pattern`.
pub(crate) fn matching(value: String, pattern: &Regex, message: &str) -> Result<String, String> {
    if pattern.is_match(&value) {
        Ok(value)
    } else {
        Err(message.to_string())
    }
}

#[cfg(test)]
mod tests {
    use testresult::TestResult;

    use super::*;

    #[test]
    fn person_name_rules() -> TestResult {
        let patterns = Patterns::builtin()?;

        assert_eq!(patterns.person_name("  Asha Rao "), Ok("Asha Rao".to_string()));
        assert_eq!(patterns.person_name("Zoë Ångström"), Ok("Zoë Ångström".to_string()));
        assert!(patterns.person_name("A").is_err());
        assert!(patterns.person_name("R2-D2").is_err());
        assert_eq!(patterns.person_name("   "), Err("Name is required".to_string()));

        Ok(())
    }

    #[test]
    fn email_is_lowercased() -> TestResult {
        let patterns = Patterns::builtin()?;

        assert_eq!(
            patterns.email(" Asha@Example.COM ", "Email"),
            Ok("asha@example.com".to_string())
        );
        assert_eq!(
            patterns.email("asha@example", "Email"),
            Err("Invalid email address".to_string())
        );

        Ok(())
    }

    #[test]
    fn phone_strips_separators() -> TestResult {
        let patterns = Patterns::builtin()?;

        assert_eq!(
            patterns.phone("+91 (98765) 432-10"),
            Ok("+919876543210".to_string())
        );
        assert!(patterns.phone("12345").is_err());
        assert!(patterns.phone("0987654321").is_err());

        Ok(())
    }

    #[test]
    fn card_rules() -> TestResult {
        let patterns = Patterns::builtin()?;

        assert_eq!(
            card_number("4111 1111-1111 1111"),
            Ok("4111111111111111".to_string())
        );
        assert!(card_number("4111 1111").is_err());
        assert!(card_number("4111a11111111111").is_err());

        assert!(patterns.card_expiry("12/27").is_ok());
        assert!(patterns.card_expiry("13/27").is_err());
        assert!(patterns.card_cvv("1234").is_ok());
        assert!(patterns.card_cvv("12").is_err());

        Ok(())
    }

    #[test]
    fn upi_id_needs_handle_and_bank() -> TestResult {
        let patterns = Patterns::builtin()?;

        assert_eq!(patterns.upi_id("Asha.Rao@OkBank"), Ok("asha.rao@okbank".to_string()));
        assert!(patterns.upi_id("not-an-email-shape").is_err());
        assert!(patterns.upi_id("a@b").is_err());

        Ok(())
    }

    #[test]
    fn text_counts_characters_not_bytes() {
        assert_eq!(text("₹₹", "City", 2, 3), Ok("₹₹".to_string()));
        assert_eq!(
            text("abcd", "City", 2, 3),
            Err("City must be at most 3 characters".to_string())
        );
    }

    #[test]
    fn compile_reports_bad_pattern() {
        let error = compile("(").map(|_| ()).err();

        assert!(error.is_some_and(|e| e.to_string().starts_with("invalid pattern `(`")));
    }
}
