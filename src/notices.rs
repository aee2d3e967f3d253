//! Notices
//!
//! Advisory signals raised by order operations, and the observer that receives them along
//! with every committed state change.

use crate::{
    basket::{Basket, BasketId},
    items::ItemId,
};

/// Advisory, fire-and-forget signal for a notification surface.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Notice {
    /// A product was allocated across one or more baskets.
    ItemsAdded {
        /// Product display name.
        product: String,

        /// Grams allocated.
        grams: u32,

        /// Number of baskets that received a line item.
        baskets: usize,
    },

    /// A basket filled up while grams were still left to place.
    BasketFull {
        /// First basket that filled up.
        basket: BasketId,

        /// Grams that went on to later or new baskets.
        spilled: u32,
    },

    /// An item's quantity was changed.
    ItemUpdated {
        /// Basket holding the item.
        basket: BasketId,

        /// Updated item.
        item: ItemId,

        /// Grams the item holds now.
        grams: u32,
    },

    /// Part of an edit did not fit and was moved to later baskets.
    ExcessMoved {
        /// Grams moved.
        grams: u32,
    },

    /// An item was removed.
    ItemRemoved {
        /// Basket that held the item.
        basket: BasketId,

        /// Removed item.
        item: ItemId,

        /// Grams the item held.
        grams: u32,
    },

    /// The last change was reverted.
    UndoPerformed,
}

/// Receives notices and state changes from an order.
///
/// Both callbacks run synchronously at the end of the operation that caused them, after the
/// state is fully consistent.
pub trait OrderObserver {
    /// Called for every advisory notice.
    fn on_notice(&mut self, notice: &Notice);

    /// Called after the basket sequence changed.
    fn on_change(&mut self, _baskets: &[Basket]) {}
}

/// Observer that ignores everything.
#[derive(Debug, Default, Clone, Copy)]
pub struct NoopObserver;

impl OrderObserver for NoopObserver {
    fn on_notice(&mut self, _notice: &Notice) {}
}

/// Observer that records notices and counts state changes.
#[derive(Debug, Default, Clone)]
pub struct NoticeLog {
    notices: Vec<Notice>,
    changes: usize,
}

impl NoticeLog {
    /// Notices received so far, oldest first.
    pub fn notices(&self) -> &[Notice] {
        &self.notices
    }

    /// Number of state changes observed.
    pub fn changes(&self) -> usize {
        self.changes
    }

    /// Take the recorded notices, leaving the log empty.
    pub fn drain(&mut self) -> Vec<Notice> {
        std::mem::take(&mut self.notices)
    }
}

impl OrderObserver for NoticeLog {
    fn on_notice(&mut self, notice: &Notice) {
        self.notices.push(notice.clone());
    }

    fn on_change(&mut self, _baskets: &[Basket]) {
        self.changes += 1;
    }
}

impl<O: OrderObserver + ?Sized> OrderObserver for &mut O {
    fn on_notice(&mut self, notice: &Notice) {
        (**self).on_notice(notice);
    }

    fn on_change(&mut self, baskets: &[Basket]) {
        (**self).on_change(baskets);
    }
}
