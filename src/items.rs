//! Items

use std::{fmt, sync::Arc};

use rusty_money::{Money, iso::Currency};

use crate::{pricing::line_price, products::Product};

/// Line item identifier, unique across every basket of an order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ItemId(u64);

impl ItemId {
    /// Wrap a raw identifier.
    pub const fn new(id: u64) -> Self {
        Self(id)
    }

    /// Raw identifier value.
    pub const fn get(self) -> u64 {
        self.0
    }
}

impl fmt::Display for ItemId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "item-{}", self.0)
    }
}

/// A weighed quantity of one product, held by exactly one basket
#[derive(Debug, Clone, PartialEq)]
pub struct LineItem {
    id: ItemId,
    product: Arc<Product>,
    grams: u32,
    price: Money<'static, Currency>,
}

impl LineItem {
    /// Creates a new line item of `grams` of `product`
    pub fn new(id: ItemId, product: Arc<Product>, grams: u32) -> Self {
        let price = line_price(product.price_per_kg, grams);

        Self {
            id,
            product,
            grams,
            price,
        }
    }

    /// Returns the item identifier
    pub fn id(&self) -> ItemId {
        self.id
    }

    /// Returns the product this item is a quantity of
    pub fn product(&self) -> &Arc<Product> {
        &self.product
    }

    /// Returns the quantity in grams
    pub fn grams(&self) -> u32 {
        self.grams
    }

    /// Returns the price of the item
    pub fn price(&self) -> &Money<'static, Currency> {
        &self.price
    }

    /// Replace the quantity, re-deriving the price.
    pub(crate) fn set_grams(&mut self, grams: u32) {
        self.grams = grams;
        self.price = line_price(self.product.price_per_kg, grams);
    }
}
