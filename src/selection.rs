//! Selection
//!
//! What the user is currently working on: a product waiting for a quantity, or an existing
//! line item being edited.

use std::sync::Arc;

use crate::{
    basket::{Basket, BasketId},
    items::ItemId,
    products::Product,
};

/// Current selection.
#[derive(Debug, Clone, Default, PartialEq)]
pub enum Selection {
    /// Nothing selected.
    #[default]
    Closed,

    /// A product is waiting for a quantity to allocate.
    Adding {
        /// Product to allocate.
        product: Arc<Product>,

        /// Basket the allocation starts at, or `None` to walk every basket.
        basket: Option<BasketId>,
    },

    /// An existing item is being edited.
    Editing {
        /// Basket holding the item.
        basket: BasketId,

        /// Item being edited.
        item: ItemId,
    },
}

impl Selection {
    /// Whether anything is selected.
    pub fn is_open(&self) -> bool {
        !matches!(self, Self::Closed)
    }

    /// Whether the selection still refers to something in `baskets`.
    ///
    /// Product selections without a target basket never go stale.
    pub fn is_valid_for(&self, baskets: &[Basket]) -> bool {
        match self {
            Self::Closed | Self::Adding { basket: None, .. } => true,
            Self::Adding {
                basket: Some(basket),
                ..
            } => baskets.iter().any(|candidate| candidate.id() == *basket),
            Self::Editing { basket, item } => baskets
                .iter()
                .find(|candidate| candidate.id() == *basket)
                .is_some_and(|candidate| candidate.item(*item).is_some()),
        }
    }

    /// Close the selection if it no longer refers to something in `baskets`.
    ///
    /// Returns `true` if the selection was closed.
    pub fn revalidate(&mut self, baskets: &[Basket]) -> bool {
        if self.is_valid_for(baskets) {
            return false;
        }

        *self = Self::Closed;

        true
    }
}
