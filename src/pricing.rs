//! Pricing

use rust_decimal::Decimal;
use rusty_money::{
    Money,
    iso::{Currency, EUR, GBP, USD, VND},
};

use crate::items::LineItem;

/// Look up one of the supported currencies by ISO code.
pub fn find_currency(code: &str) -> Option<&'static Currency> {
    match code {
        "GBP" => Some(GBP),
        "USD" => Some(USD),
        "EUR" => Some(EUR),
        "VND" => Some(VND),
        _ => None,
    }
}

/// Price of `grams` of a product sold at `price_per_kg`.
///
/// Computed as `price_per_kg * grams / 1000` in decimal arithmetic, so no rounding is applied.
pub fn line_price(price_per_kg: Money<'static, Currency>, grams: u32) -> Money<'static, Currency> {
    let amount = *price_per_kg.amount() * Decimal::from(grams) / Decimal::ONE_THOUSAND;

    Money::from_decimal(amount, price_per_kg.currency())
}

/// Calculates the total price of a list of line items.
///
/// An empty list totals zero in `currency`.
pub fn total_price<'a>(
    items: impl IntoIterator<Item = &'a LineItem>,
    currency: &'static Currency,
) -> Money<'static, Currency> {
    let amount = items
        .into_iter()
        .map(|item| *item.price().amount())
        .sum::<Decimal>();

    Money::from_decimal(amount, currency)
}
