//! Product Fixtures

use rust_decimal::Decimal;
use rusty_money::{Money, iso::Currency};
use serde::Deserialize;

use crate::{fixtures::FixtureError, pricing::find_currency, products::Product};

/// Wrapper for products in YAML
#[derive(Debug, Deserialize)]
pub struct ProductsFixture {
    /// Products in catalog order
    pub products: Vec<ProductFixture>,
}

/// Product Fixture
#[derive(Debug, Deserialize)]
pub struct ProductFixture {
    /// Catalog identifier
    pub id: String,

    /// Product name
    pub name: String,

    /// Image token
    #[serde(default)]
    pub image: String,

    /// Price per kilogram (e.g., "45000 VND")
    pub price_per_kg: String,
}

impl TryFrom<ProductFixture> for Product {
    type Error = FixtureError;

    fn try_from(fixture: ProductFixture) -> Result<Self, Self::Error> {
        let (amount, currency) = parse_price(&fixture.price_per_kg)?;

        if amount.is_sign_negative() {
            return Err(FixtureError::NegativePrice(fixture.id));
        }

        Ok(Product::new(
            fixture.id,
            fixture.name,
            fixture.image,
            Money::from_decimal(amount, currency),
        ))
    }
}

/// Parse price string (e.g., "45000 VND") into an amount and currency
///
/// # Errors
///
/// Returns an error if the string is not in the format "AMOUNT CURRENCY",
/// if the amount cannot be parsed as a decimal, or if the currency code
/// is not recognized.
pub fn parse_price(s: &str) -> Result<(Decimal, &'static Currency), FixtureError> {
    let parts: Vec<&str> = s.split_whitespace().collect();

    let [amount, currency_code] = parts.as_slice() else {
        return Err(FixtureError::InvalidPrice(format!(
            "Expected format 'AMOUNT CURRENCY', got: {s}"
        )));
    };

    let amount = amount
        .parse::<Decimal>()
        .map_err(|_err| FixtureError::InvalidPrice(s.to_string()))?;

    let currency = find_currency(currency_code)
        .ok_or_else(|| FixtureError::UnknownCurrency((*currency_code).to_string()))?;

    Ok((amount, currency))
}
