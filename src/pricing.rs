//! Pricing
//!
//! Prices are whole rupees held as `u64`. Arithmetic that needs a currency
//! goes through [`rusty_money`] in INR.

use rusty_money::{
    Money, MoneyError,
    iso::{self, Currency},
};
use thiserror::Error;

use crate::cart::CartLineItem;

/// Storefront currency.
pub const CURRENCY: &Currency = iso::INR;

const CURRENCY_SYMBOL: &str = "₹";

/// Minor units per rupee.
const MINOR_PER_MAJOR: i64 = 100;

/// Errors that can occur while converting or totalling prices.
#[derive(Debug, Error, PartialEq)]
pub enum PricingError {
    /// The amount cannot be represented in minor units.
    #[error("amount {0} is too large to price")]
    Overflow(u64),

    /// The money value is negative or has a fractional rupee part.
    #[error("amount of {0} minor units is not a whole, non-negative rupee value")]
    NotWholeAmount(i64),

    /// Wrapped money arithmetic or currency mismatch error.
    #[error(transparent)]
    Money(#[from] MoneyError),
}

/// Price of `quantity` units, saturating on overflow.
pub fn line_total(price: u64, quantity: u32) -> u64 {
    price.saturating_mul(u64::from(quantity))
}

/// Convert a whole-rupee amount into [`Money`].
///
/// # Errors
///
/// Returns [`PricingError::Overflow`] if the amount does not fit in minor units.
pub fn to_money(amount: u64) -> Result<Money<'static, Currency>, PricingError> {
    let minor = i64::try_from(amount)
        .ok()
        .and_then(|major| major.checked_mul(MINOR_PER_MAJOR))
        .ok_or(PricingError::Overflow(amount))?;

    Ok(Money::from_minor(minor, CURRENCY))
}

/// Convert [`Money`] back into a whole-rupee amount.
///
/// # Errors
///
/// Returns [`PricingError::NotWholeAmount`] for negative or fractional values.
pub fn from_money(money: &Money<'_, Currency>) -> Result<u64, PricingError> {
    let minor = money.to_minor_units();

    if minor % MINOR_PER_MAJOR != 0 {
        return Err(PricingError::NotWholeAmount(minor));
    }

    u64::try_from(minor / MINOR_PER_MAJOR).map_err(|_overflow| PricingError::NotWholeAmount(minor))
}

/// Calculates the total price of a list of line items.
///
/// # Errors
///
/// - [`PricingError::Overflow`]: a line total could not be represented.
/// - [`PricingError::Money`]: wrapped money arithmetic error.
pub fn total_price<'a>(
    items: impl IntoIterator<Item = &'a CartLineItem>,
) -> Result<Money<'static, Currency>, PricingError> {
    items
        .into_iter()
        .try_fold(Money::from_minor(0, CURRENCY), |acc, item| {
            let line = to_money(item.line_total())?;

            Ok(acc.add(line)?)
        })
}

/// Format a whole-rupee amount with Indian digit grouping, e.g. `₹1,23,456`.
pub fn format_price(amount: u64) -> String {
    let digits: Vec<char> = amount.to_string().chars().collect();
    let len = digits.len();
    let mut formatted = String::with_capacity(len.saturating_mul(2).saturating_add(3));

    formatted.push_str(CURRENCY_SYMBOL);

    for (position, digit) in digits.iter().enumerate() {
        let remaining = len.saturating_sub(position);

        // Last group is three digits, every group before it is two.
        if position > 0 && remaining >= 3 && remaining.saturating_sub(3) % 2 == 0 {
            formatted.push(',');
        }

        formatted.push(*digit);
    }

    formatted
}

#[cfg(test)]
mod tests {
    use testresult::TestResult;

    use crate::products::{Category, Product, ProductId, Sourcing};

    use super::*;

    fn line(id: &str, price: u64, quantity: u32) -> CartLineItem {
        CartLineItem::new(
            Product {
                id: ProductId::new(id),
                name: format!("Product {id}"),
                price,
                category: Category::Rings,
                image: String::new(),
                description: String::new(),
                featured: None,
                material: None,
                sourcing: Sourcing::default(),
            },
            quantity,
        )
    }

    #[test]
    fn format_price_groups_indian_style() {
        assert_eq!(format_price(0), "₹0");
        assert_eq!(format_price(999), "₹999");
        assert_eq!(format_price(1000), "₹1,000");
        assert_eq!(format_price(45999), "₹45,999");
        assert_eq!(format_price(123_456), "₹1,23,456");
        assert_eq!(format_price(10_000_000), "₹1,00,00,000");
    }

    #[test]
    fn money_round_trips_whole_amounts() -> TestResult {
        let money = to_money(45999)?;

        assert_eq!(money, Money::from_minor(4_599_900, CURRENCY));
        assert_eq!(from_money(&money)?, 45999);

        Ok(())
    }

    #[test]
    fn from_money_rejects_fractional_amounts() {
        let money = Money::from_minor(150, CURRENCY);

        assert_eq!(from_money(&money), Err(PricingError::NotWholeAmount(150)));
    }

    #[test]
    fn to_money_rejects_overflow() {
        assert_eq!(to_money(u64::MAX), Err(PricingError::Overflow(u64::MAX)));
    }

    #[test]
    fn total_price_sums_line_totals() -> TestResult {
        let items = [line("1", 45999, 2), line("2", 100, 3)];

        let total = total_price(&items)?;

        assert_eq!(from_money(&total)?, 92298);

        Ok(())
    }

    #[test]
    fn total_price_of_nothing_is_zero() -> TestResult {
        let items: [CartLineItem; 0] = [];

        assert_eq!(total_price(&items)?, Money::from_minor(0, CURRENCY));

        Ok(())
    }

    #[test]
    fn line_total_saturates() {
        assert_eq!(line_total(u64::MAX, 2), u64::MAX);
        assert_eq!(line_total(45999, 2), 91998);
    }
}
