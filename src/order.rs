//! Order
//!
//! The cart state owned by the application: the basket sequence, its undo history and the
//! current selection. Every change goes through the operations here, each of which runs to
//! completion, snapshots the baskets first when it is going to change them, and then tells
//! the observer.

use std::sync::Arc;

use jiff::Timestamp;
use rusty_money::{Money, iso::Currency};
use thiserror::Error;
use tracing::{debug, info};

use crate::{
    allocation::{self, Allocation, Ids, Plan, PlannedPlacement, Target, Walk},
    basket::{Basket, BasketId},
    history::{History, Snapshot},
    items::{ItemId, LineItem},
    notices::{NoopObserver, Notice, OrderObserver},
    pricing::total_price,
    products::Product,
    selection::Selection,
    settings::{OrderSettings, SettingsError},
};

/// Errors rejecting an order operation before anything changes.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum OrderError {
    /// The product is priced in a different currency from the order.
    #[error("product is priced in {found}, but the order is in {expected}")]
    CurrencyMismatch {
        /// Order currency code
        expected: &'static str,

        /// Product currency code
        found: &'static str,
    },
}

/// Outcome of an item edit.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ItemUpdate {
    /// Basket holding the edited item.
    pub basket: BasketId,

    /// Edited item.
    pub item: ItemId,

    /// Grams the item held before the edit.
    pub previous_grams: u32,

    /// Grams the item holds now.
    pub grams: u32,

    /// Where the grams that did not fit went.
    pub spill: Option<Allocation>,
}

impl ItemUpdate {
    /// Grams moved out to later baskets.
    pub fn moved(&self) -> u32 {
        self.spill.as_ref().map_or(0, Allocation::grams)
    }
}

/// Order
#[derive(Debug)]
pub struct Order<O: OrderObserver = NoopObserver> {
    baskets: Vec<Basket>,
    history: History,
    selection: Selection,
    ids: Ids,
    capacity: u32,
    currency: &'static Currency,
    observer: O,
}

impl Order {
    /// Create an order with default settings in `currency`.
    pub fn new(currency: &'static Currency) -> Self {
        let settings = OrderSettings::default();

        Self::build(&settings, currency, NoopObserver)
    }

    /// Create an order from settings.
    ///
    /// # Errors
    ///
    /// Returns a [`SettingsError`] if the settings are invalid.
    pub fn with_settings(settings: &OrderSettings) -> Result<Self, SettingsError> {
        Self::with_observer(settings, NoopObserver)
    }
}

impl<O: OrderObserver> Order<O> {
    /// Create an order from settings that reports to `observer`.
    ///
    /// # Errors
    ///
    /// Returns a [`SettingsError`] if the settings are invalid.
    pub fn with_observer(settings: &OrderSettings, observer: O) -> Result<Self, SettingsError> {
        settings.validate()?;

        Ok(Self::build(settings, settings.currency()?, observer))
    }

    fn build(settings: &OrderSettings, currency: &'static Currency, observer: O) -> Self {
        let mut ids = Ids::new();
        let baskets = (1..=settings.initial_baskets.max(1))
            .map(|n| {
                Basket::new(
                    ids.basket(),
                    format!("Basket {n}"),
                    settings.capacity_grams,
                    currency,
                )
            })
            .collect();

        Self {
            baskets,
            history: History::new(settings.history_limit),
            selection: Selection::Closed,
            ids,
            capacity: settings.capacity_grams,
            currency,
            observer,
        }
    }

    /// Replace the observer, keeping all state.
    pub fn observe<P: OrderObserver>(self, observer: P) -> Order<P> {
        Order {
            baskets: self.baskets,
            history: self.history,
            selection: self.selection,
            ids: self.ids,
            capacity: self.capacity,
            currency: self.currency,
            observer,
        }
    }

    /// The observer.
    pub fn observer(&self) -> &O {
        &self.observer
    }

    /// The observer, mutably.
    pub fn observer_mut(&mut self) -> &mut O {
        &mut self.observer
    }

    /// Every basket, in order.
    pub fn baskets(&self) -> &[Basket] {
        &self.baskets
    }

    /// Look up a basket.
    pub fn basket(&self, id: BasketId) -> Option<&Basket> {
        self.baskets.iter().find(|basket| basket.id() == id)
    }

    /// Grams each basket holds.
    pub fn capacity(&self) -> u32 {
        self.capacity
    }

    /// Currency of every price in the order.
    pub fn currency(&self) -> &'static Currency {
        self.currency
    }

    /// Grams held by a basket, or 0 if there is no such basket.
    pub fn total_grams_of(&self, basket: BasketId) -> u32 {
        self.basket(basket).map_or(0, Basket::total_grams)
    }

    /// Grams held across every basket.
    pub fn total_grams(&self) -> u64 {
        self.baskets
            .iter()
            .map(|basket| u64::from(basket.total_grams()))
            .sum()
    }

    /// Grams held by an item, or 0 if there is no such item.
    pub fn item_grams(&self, basket: BasketId, item: ItemId) -> u32 {
        self.basket(basket)
            .and_then(|basket| basket.item(item))
            .map_or(0, LineItem::grams)
    }

    /// Sum of every basket's total price.
    pub fn grand_total(&self) -> Money<'static, Currency> {
        total_price(self.baskets.iter().flat_map(Basket::iter), self.currency)
    }

    /// Whether there is a change to undo.
    pub fn can_undo(&self) -> bool {
        !self.history.is_empty()
    }

    /// Number of undo steps available.
    pub fn undo_depth(&self) -> usize {
        self.history.len()
    }

    /// When the most recent undoable change was made.
    pub fn last_change_at(&self) -> Option<Timestamp> {
        self.history.latest().map(|snapshot| snapshot.taken_at)
    }

    /// Allocate `grams` of `product` across the baskets, appending baskets as needed.
    ///
    /// Allocating 0 grams changes nothing.
    ///
    /// # Errors
    ///
    /// Returns [`OrderError::CurrencyMismatch`] if the product is priced in another currency.
    pub fn allocate(
        &mut self,
        product: &Arc<Product>,
        grams: u32,
    ) -> Result<Allocation, OrderError> {
        self.allocate_with(product, grams, Walk::default())
    }

    /// Allocate like [`Order::allocate`], leaving `exclude` untouched.
    ///
    /// # Errors
    ///
    /// Returns [`OrderError::CurrencyMismatch`] if the product is priced in another currency.
    pub fn allocate_excluding(
        &mut self,
        product: &Arc<Product>,
        grams: u32,
        exclude: BasketId,
    ) -> Result<Allocation, OrderError> {
        self.allocate_with(product, grams, Walk::excluding(exclude))
    }

    /// Allocate starting at `basket`, spilling into the baskets after it and then into new
    /// ones. Earlier baskets are left alone.
    ///
    /// An unknown basket changes nothing.
    ///
    /// # Errors
    ///
    /// Returns [`OrderError::CurrencyMismatch`] if the product is priced in another currency.
    pub fn allocate_into(
        &mut self,
        basket: BasketId,
        product: &Arc<Product>,
        grams: u32,
    ) -> Result<Allocation, OrderError> {
        self.check_currency(product)?;

        let Some(start) = self.position(basket) else {
            debug!(basket = %basket, "ignoring allocation into unknown basket");
            return Ok(Allocation::default());
        };

        self.allocate_with(product, grams, Walk { start, exclude: None })
    }

    #[tracing::instrument(skip_all, fields(product = %product.id, grams = grams))]
    fn allocate_with(
        &mut self,
        product: &Arc<Product>,
        grams: u32,
        walk: Walk,
    ) -> Result<Allocation, OrderError> {
        self.check_currency(product)?;

        if grams == 0 {
            debug!("nothing to allocate");
            return Ok(Allocation::default());
        }

        self.checkpoint();

        let allocation = self.place(product, grams, walk);

        info!(
            baskets = allocation.placements.len(),
            created = allocation.created_baskets.len(),
            "allocated product"
        );

        self.observer.on_notice(&Notice::ItemsAdded {
            product: product.name.clone(),
            grams,
            baskets: allocation.placements.len(),
        });

        if let Some(overflow) = allocation.overflow {
            self.observer.on_notice(&Notice::BasketFull {
                basket: overflow.basket,
                spilled: overflow.spilled,
            });
        }

        if matches!(self.selection, Selection::Adding { .. }) {
            self.selection = Selection::Closed;
        }

        self.observer.on_change(&self.baskets);

        Ok(allocation)
    }

    /// Change an item to `grams`.
    ///
    /// If the item's basket cannot hold the new amount, the item keeps what fits and the
    /// rest is allocated to the baskets after it. Unknown baskets or items, 0 grams and
    /// unchanged amounts are ignored.
    #[tracing::instrument(skip_all, fields(basket = %basket, item = %item, grams = grams))]
    pub fn update_item(
        &mut self,
        basket: BasketId,
        item: ItemId,
        grams: u32,
    ) -> Option<ItemUpdate> {
        let Some((index, product, previous, others)) = self.locate(basket, item) else {
            debug!("ignoring update of unknown item");
            return None;
        };

        if grams == 0 || grams == previous {
            return None;
        }

        let kept = grams.min(self.capacity.saturating_sub(others));
        let excess = grams - kept;

        self.checkpoint();

        if let Some(line) = self
            .baskets
            .get_mut(index)
            .and_then(|target| target.item_mut(item))
        {
            line.set_grams(kept);
        }

        let spill = (excess > 0).then(|| {
            let walk = Walk {
                start: index + 1,
                exclude: Some(basket),
            };

            self.place(&product, excess, walk)
        });

        info!(previous, kept, excess, "updated item");

        self.observer.on_notice(&Notice::ItemUpdated {
            basket,
            item,
            grams: kept,
        });

        if excess > 0 {
            self.observer
                .on_notice(&Notice::ExcessMoved { grams: excess });
        }

        if let Some(overflow) = spill.as_ref().and_then(|spill| spill.overflow) {
            self.observer.on_notice(&Notice::BasketFull {
                basket: overflow.basket,
                spilled: overflow.spilled,
            });
        }

        if self.selection == (Selection::Editing { basket, item }) {
            self.selection = Selection::Closed;
        }

        self.observer.on_change(&self.baskets);

        Some(ItemUpdate {
            basket,
            item,
            previous_grams: previous,
            grams: kept,
            spill,
        })
    }

    /// Remove an item from its basket. The basket stays, even if emptied.
    ///
    /// Unknown baskets or items are ignored.
    #[tracing::instrument(skip_all, fields(basket = %basket, item = %item))]
    pub fn remove_item(&mut self, basket: BasketId, item: ItemId) -> Option<LineItem> {
        let Some((index, ..)) = self.locate(basket, item) else {
            debug!("ignoring removal of unknown item");
            return None;
        };

        self.checkpoint();

        let removed = self
            .baskets
            .get_mut(index)
            .and_then(|target| target.remove(item))?;

        info!(grams = removed.grams(), "removed item");

        self.observer.on_notice(&Notice::ItemRemoved {
            basket,
            item,
            grams: removed.grams(),
        });

        self.selection.revalidate(&self.baskets);
        self.observer.on_change(&self.baskets);

        Some(removed)
    }

    /// Revert the most recent change. Returns `false` if there was nothing to undo.
    #[tracing::instrument(skip_all)]
    pub fn undo(&mut self) -> bool {
        let Some(snapshot) = self.history.pop() else {
            debug!("nothing to undo");
            return false;
        };

        info!(taken_at = %snapshot.taken_at, "restored snapshot");

        self.baskets = snapshot.baskets;

        self.selection.revalidate(&self.baskets);
        self.observer.on_notice(&Notice::UndoPerformed);
        self.observer.on_change(&self.baskets);

        true
    }

    /// Where `grams` would go if allocated now.
    pub fn preview_allocation(&self, grams: u32) -> Plan {
        allocation::plan(&self.baskets, self.capacity, grams, Walk::default())
    }

    /// Where `grams` would go if allocated into `basket` now, or `None` for an unknown basket.
    pub fn preview_allocation_into(&self, basket: BasketId, grams: u32) -> Option<Plan> {
        let start = self.position(basket)?;

        Some(allocation::plan(
            &self.baskets,
            self.capacity,
            grams,
            Walk { start, exclude: None },
        ))
    }

    /// Where an item edit to `grams` would go.
    ///
    /// The first placement is the edited item itself, holding its new amount; any further
    /// placements are the spill. Returns `None` for unknown baskets or items, and for 0 grams
    /// or the item's current amount, which [`Order::update_item`] ignores.
    pub fn preview_update(&self, basket: BasketId, item: ItemId, grams: u32) -> Option<Plan> {
        let (index, _, previous, others) = self.locate(basket, item)?;

        if grams == 0 || grams == previous {
            return None;
        }

        let target = self.baskets.get(index)?;

        let kept = grams.min(self.capacity.saturating_sub(others));
        let excess = grams - kept;

        let walk = Walk {
            start: index + 1,
            exclude: Some(basket),
        };
        let spill = allocation::plan(&self.baskets, self.capacity, excess, walk);

        let mut plan = Plan {
            overflow_at: (excess > 0).then_some(0),
            ..Plan::default()
        };

        plan.placements.push(PlannedPlacement {
            target: Target::Existing(basket),
            basket_name: target.name().to_string(),
            grams: kept,
            resulting_grams: others + kept,
        });
        plan.placements.extend(spill.placements);

        Some(plan)
    }

    /// Current selection.
    pub fn selection(&self) -> &Selection {
        &self.selection
    }

    /// Select a product to allocate, optionally into a specific basket.
    ///
    /// Returns `false` and closes the selection if the basket does not exist.
    pub fn select_product(&mut self, product: Arc<Product>, basket: Option<BasketId>) -> bool {
        self.selection = Selection::Adding { product, basket };

        !self.selection.revalidate(&self.baskets)
    }

    /// Start editing an item.
    ///
    /// Returns `false` and closes the selection if the item no longer exists.
    pub fn edit_item(&mut self, basket: BasketId, item: ItemId) -> bool {
        self.selection = Selection::Editing { basket, item };

        !self.selection.revalidate(&self.baskets)
    }

    /// Clear the selection.
    pub fn close_selection(&mut self) {
        self.selection = Selection::Closed;
    }

    fn position(&self, basket: BasketId) -> Option<usize> {
        self.baskets
            .iter()
            .position(|candidate| candidate.id() == basket)
    }

    fn check_currency(&self, product: &Product) -> Result<(), OrderError> {
        if product.currency() != self.currency {
            return Err(OrderError::CurrencyMismatch {
                expected: self.currency.iso_alpha_code,
                found: product.currency().iso_alpha_code,
            });
        }

        Ok(())
    }

    /// Basket index, product, grams and the grams of the rest of the basket for an item.
    fn locate(&self, basket: BasketId, item: ItemId) -> Option<(usize, Arc<Product>, u32, u32)> {
        let index = self.position(basket)?;
        let target = self.baskets.get(index)?;
        let line = target.item(item)?;

        Some((
            index,
            Arc::clone(line.product()),
            line.grams(),
            target.total_grams() - line.grams(),
        ))
    }

    fn checkpoint(&mut self) {
        if let Some(evicted) = self.history.push(Snapshot::capture(&self.baskets)) {
            debug!(taken_at = %evicted.taken_at, "history full, dropped oldest snapshot");
        }
    }

    fn place(&mut self, product: &Arc<Product>, grams: u32, walk: Walk) -> Allocation {
        let plan = allocation::plan(&self.baskets, self.capacity, grams, walk);

        for placement in &plan.placements {
            debug!(
                basket = %placement.basket_name,
                grams = placement.grams,
                total = placement.resulting_grams,
                "placing"
            );
        }

        allocation::apply(
            &mut self.baskets,
            plan,
            product,
            &mut self.ids,
            self.capacity,
            self.currency,
        )
    }
}
