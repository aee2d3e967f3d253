//! Basket

use std::fmt;

use rusty_money::{Money, iso::Currency};

use crate::{
    items::{ItemId, LineItem},
    pricing::total_price,
};

/// Weight a basket holds unless configured otherwise.
pub const DEFAULT_CAPACITY_GRAMS: u32 = 1000;

/// Basket identifier, never reused within an order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct BasketId(u64);

impl BasketId {
    /// Wrap a raw identifier.
    pub const fn new(id: u64) -> Self {
        Self(id)
    }

    /// Raw identifier value.
    pub const fn get(self) -> u64 {
        self.0
    }
}

impl fmt::Display for BasketId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "basket-{}", self.0)
    }
}

/// Basket
///
/// A capacity-bounded, ordered container of line items. Totals are derived from the items
/// on every read, so they can never drift from the contents.
#[derive(Debug, Clone, PartialEq)]
pub struct Basket {
    id: BasketId,
    name: String,
    items: Vec<LineItem>,
    capacity: u32,
    currency: &'static Currency,
}

impl Basket {
    /// Create a new, empty basket.
    pub fn new(
        id: BasketId,
        name: impl Into<String>,
        capacity: u32,
        currency: &'static Currency,
    ) -> Self {
        Basket {
            id,
            name: name.into(),
            items: Vec::new(),
            capacity,
            currency,
        }
    }

    /// Basket identifier.
    pub fn id(&self) -> BasketId {
        self.id
    }

    /// Display name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Maximum grams the basket may hold.
    pub fn capacity(&self) -> u32 {
        self.capacity
    }

    /// Get the currency of the basket.
    pub fn currency(&self) -> &'static Currency {
        self.currency
    }

    /// Sum of the grams of every item.
    pub fn total_grams(&self) -> u32 {
        self.items.iter().map(LineItem::grams).sum()
    }

    /// Sum of the prices of every item.
    pub fn total_price(&self) -> Money<'static, Currency> {
        total_price(&self.items, self.currency)
    }

    /// Grams that still fit before the basket reaches capacity.
    pub fn available_grams(&self) -> u32 {
        self.capacity.saturating_sub(self.total_grams())
    }

    /// Whether no more grams fit.
    pub fn is_full(&self) -> bool {
        self.available_grams() == 0
    }

    /// Get an item by id.
    pub fn item(&self, id: ItemId) -> Option<&LineItem> {
        self.items.iter().find(|item| item.id() == id)
    }

    pub(crate) fn item_mut(&mut self, id: ItemId) -> Option<&mut LineItem> {
        self.items.iter_mut().find(|item| item.id() == id)
    }

    /// Iterate over the items in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = &LineItem> {
        self.items.iter()
    }

    /// Get the number of items in the basket.
    pub fn len(&self) -> usize {
        self.items.len()
    }

    /// Check if the basket is empty.
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub(crate) fn push(&mut self, item: LineItem) {
        self.items.push(item);
    }

    pub(crate) fn remove(&mut self, id: ItemId) -> Option<LineItem> {
        let position = self.items.iter().position(|item| item.id() == id)?;

        Some(self.items.remove(position))
    }
}
