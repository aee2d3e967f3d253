//! Allocation
//!
//! Spreads a requested weight of a product across the basket sequence. Baskets are walked in
//! order and each one with room receives a fresh line item holding as much as fits; whatever
//! is left once the existing baskets are exhausted goes into newly appended baskets, so every
//! requested gram is always placed.
//!
//! Allocation is split into a pure [`plan`] over the current baskets and an apply step that
//! commits the plan. Previews run the planner alone.

use std::sync::Arc;

use rusty_money::iso::Currency;
use smallvec::SmallVec;

use crate::{
    basket::{Basket, BasketId},
    items::{ItemId, LineItem},
    products::Product,
};

/// Where an allocation walk starts and which basket it must leave alone.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Walk {
    /// Index of the first basket considered.
    pub start: usize,

    /// Basket that receives nothing, even if it has room.
    pub exclude: Option<BasketId>,
}

impl Walk {
    /// Walk every basket except `exclude`.
    pub fn excluding(exclude: BasketId) -> Self {
        Self {
            start: 0,
            exclude: Some(exclude),
        }
    }
}

/// Basket a planned placement lands in.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Target {
    /// A basket already in the sequence.
    Existing(BasketId),

    /// A basket that will be appended, with the name it will be given.
    New(String),
}

/// A single step of an allocation plan.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlannedPlacement {
    /// Receiving basket.
    pub target: Target,

    /// Display name of the receiving basket.
    pub basket_name: String,

    /// Grams placed into the basket.
    pub grams: u32,

    /// Basket total once the placement lands.
    pub resulting_grams: u32,
}

/// Ordered placements covering a whole request.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Plan {
    /// Placements in walk order.
    pub placements: SmallVec<[PlannedPlacement; 4]>,

    /// Index of the first placement that filled its basket while grams were still left.
    pub overflow_at: Option<usize>,
}

impl Plan {
    /// Whether some basket was filled to capacity while grams were still left to place.
    pub fn overflowed(&self) -> bool {
        self.overflow_at.is_some()
    }

    /// Total grams covered by the plan.
    pub fn grams(&self) -> u32 {
        self.placements.iter().map(|placement| placement.grams).sum()
    }

    /// Number of baskets the plan appends.
    pub fn new_baskets(&self) -> usize {
        self.placements
            .iter()
            .filter(|placement| matches!(placement.target, Target::New(_)))
            .count()
    }
}

/// Plan how `grams` would be spread over `baskets`.
///
/// Baskets without room are skipped rather than given empty items. New baskets are named
/// `"Basket N"` after their position in the sequence and hold up to `capacity` grams each.
pub fn plan(baskets: &[Basket], capacity: u32, grams: u32, walk: Walk) -> Plan {
    let mut plan = Plan::default();
    let mut remaining = grams;

    for basket in baskets.iter().skip(walk.start) {
        if remaining == 0 {
            break;
        }

        if walk.exclude == Some(basket.id()) {
            continue;
        }

        let available = basket.available_grams();
        let placed = remaining.min(available);

        if placed == 0 {
            continue;
        }

        remaining -= placed;

        if placed == available && remaining > 0 {
            plan.overflow_at = plan.overflow_at.or(Some(plan.placements.len()));
        }

        plan.placements.push(PlannedPlacement {
            target: Target::Existing(basket.id()),
            basket_name: basket.name().to_string(),
            grams: placed,
            resulting_grams: basket.total_grams() + placed,
        });
    }

    let mut count = baskets.len();

    while remaining > 0 {
        let placed = remaining.min(capacity);

        if placed == 0 {
            break;
        }

        remaining -= placed;
        count += 1;

        if remaining > 0 {
            plan.overflow_at = plan.overflow_at.or(Some(plan.placements.len()));
        }

        let name = format!("Basket {count}");

        plan.placements.push(PlannedPlacement {
            target: Target::New(name.clone()),
            basket_name: name,
            grams: placed,
            resulting_grams: placed,
        });
    }

    plan
}

/// Grams committed to one basket by an allocation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Placement {
    /// Receiving basket.
    pub basket: BasketId,

    /// Line item created for the placement.
    pub item: ItemId,

    /// Grams placed.
    pub grams: u32,
}

/// The first basket an allocation filled up, and what went past it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Overflow {
    /// Basket that filled up.
    pub basket: BasketId,

    /// Grams placed in the baskets after it.
    pub spilled: u32,
}

/// Outcome of a committed allocation.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Allocation {
    /// Placements in walk order.
    pub placements: SmallVec<[Placement; 4]>,

    /// Baskets appended to hold the remainder.
    pub created_baskets: SmallVec<[BasketId; 2]>,

    /// Set when a basket filled up while grams were still left to place.
    pub overflow: Option<Overflow>,
}

impl Allocation {
    /// Total grams placed.
    pub fn grams(&self) -> u32 {
        self.placements.iter().map(|placement| placement.grams).sum()
    }

    /// Whether nothing was placed.
    pub fn is_empty(&self) -> bool {
        self.placements.is_empty()
    }
}

/// Identifier sequences for items and baskets.
///
/// Counters only ever move forward, including across undo, so identifiers stay unique.
#[derive(Debug, Clone)]
pub(crate) struct Ids {
    next_item: u64,
    next_basket: u64,
}

impl Ids {
    pub(crate) fn new() -> Self {
        Self {
            next_item: 1,
            next_basket: 1,
        }
    }

    pub(crate) fn item(&mut self) -> ItemId {
        let id = ItemId::new(self.next_item);
        self.next_item += 1;
        id
    }

    pub(crate) fn basket(&mut self) -> BasketId {
        let id = BasketId::new(self.next_basket);
        self.next_basket += 1;
        id
    }
}

/// Commit a plan made against `baskets`, creating one line item per placement.
pub(crate) fn apply(
    baskets: &mut Vec<Basket>,
    plan: Plan,
    product: &Arc<Product>,
    ids: &mut Ids,
    capacity: u32,
    currency: &'static Currency,
) -> Allocation {
    let overflow_at = plan.overflow_at;
    let mut allocation = Allocation::default();

    for planned in plan.placements {
        let basket = match planned.target {
            Target::Existing(id) => baskets.iter_mut().find(|basket| basket.id() == id),
            Target::New(name) => {
                let id = ids.basket();
                baskets.push(Basket::new(id, name, capacity, currency));
                allocation.created_baskets.push(id);
                baskets.last_mut()
            }
        };

        let Some(basket) = basket else {
            continue;
        };

        let item = ids.item();
        basket.push(LineItem::new(item, Arc::clone(product), planned.grams));

        allocation.placements.push(Placement {
            basket: basket.id(),
            item,
            grams: planned.grams,
        });
    }

    allocation.overflow = overflow_at.and_then(|idx| {
        let full = allocation.placements.get(idx)?;

        Some(Overflow {
            basket: full.basket,
            spilled: allocation
                .placements
                .iter()
                .skip(idx + 1)
                .map(|placement| placement.grams)
                .sum(),
        })
    });

    allocation
}

#[cfg(test)]
mod tests {
    use rusty_money::{Money, iso::VND};
    use testresult::TestResult;

    use crate::basket::DEFAULT_CAPACITY_GRAMS;

    use super::*;

    fn pineapple() -> Arc<Product> {
        Arc::new(Product::new(
            "5",
            "Pineapple",
            "pineapple",
            Money::from_major(30_000, VND),
        ))
    }

    fn sequence(loads: &[u32], ids: &mut Ids) -> Vec<Basket> {
        let product = pineapple();

        loads
            .iter()
            .enumerate()
            .map(|(idx, load)| {
                let mut basket = Basket::new(
                    ids.basket(),
                    format!("Basket {}", idx + 1),
                    DEFAULT_CAPACITY_GRAMS,
                    VND,
                );

                if *load > 0 {
                    basket.push(LineItem::new(ids.item(), Arc::clone(&product), *load));
                }

                basket
            })
            .collect()
    }

    fn loads(baskets: &[Basket]) -> Vec<u32> {
        baskets.iter().map(Basket::total_grams).collect()
    }

    #[test]
    fn plan_fits_in_first_basket() {
        let mut ids = Ids::new();
        let baskets = sequence(&[0], &mut ids);

        let plan = plan(&baskets, DEFAULT_CAPACITY_GRAMS, 300, Walk::default());

        assert_eq!(plan.placements.len(), 1);
        assert_eq!(plan.grams(), 300);
        assert_eq!(plan.new_baskets(), 0);
        assert!(!plan.overflowed());
    }

    #[test]
    fn plan_spills_into_new_baskets() {
        let mut ids = Ids::new();
        let baskets = sequence(&[0], &mut ids);

        let plan = plan(&baskets, DEFAULT_CAPACITY_GRAMS, 2500, Walk::default());

        let grams: Vec<u32> = plan.placements.iter().map(|p| p.grams).collect();
        let names: Vec<&str> = plan
            .placements
            .iter()
            .map(|p| p.basket_name.as_str())
            .collect();

        assert_eq!(grams, vec![1000, 1000, 500]);
        assert_eq!(names, vec!["Basket 1", "Basket 2", "Basket 3"]);
        assert_eq!(plan.new_baskets(), 2);
        assert_eq!(plan.overflow_at, Some(0));
    }

    #[test]
    fn plan_skips_full_and_excluded_baskets() {
        let mut ids = Ids::new();
        let baskets = sequence(&[1000, 200, 0], &mut ids);
        let excluded = baskets.get(1).map(Basket::id);

        let walk = Walk {
            start: 0,
            exclude: excluded,
        };
        let plan = plan(&baskets, DEFAULT_CAPACITY_GRAMS, 400, walk);

        assert_eq!(plan.placements.len(), 1);
        assert_eq!(
            plan.placements.first().map(|p| p.basket_name.as_str()),
            Some("Basket 3")
        );
        assert!(!plan.overflowed());
    }

    #[test]
    fn plan_respects_start_index() {
        let mut ids = Ids::new();
        let baskets = sequence(&[0, 0], &mut ids);

        let walk = Walk {
            start: 1,
            exclude: None,
        };
        let plan = plan(&baskets, DEFAULT_CAPACITY_GRAMS, 300, walk);

        assert_eq!(
            plan.placements.first().map(|p| p.basket_name.as_str()),
            Some("Basket 2")
        );
    }

    #[test]
    fn plan_exact_fill_is_not_overflow() {
        let mut ids = Ids::new();
        let baskets = sequence(&[600], &mut ids);

        let plan = plan(&baskets, DEFAULT_CAPACITY_GRAMS, 400, Walk::default());

        assert_eq!(plan.placements.first().map(|p| p.resulting_grams), Some(1000));
        assert!(!plan.overflowed());
    }

    #[test]
    fn plan_of_zero_grams_is_empty() {
        let mut ids = Ids::new();
        let baskets = sequence(&[0], &mut ids);

        let plan = plan(&baskets, DEFAULT_CAPACITY_GRAMS, 0, Walk::default());

        assert!(plan.placements.is_empty());
        assert!(!plan.overflowed());
    }

    #[test]
    fn apply_creates_items_and_baskets() -> TestResult {
        let mut ids = Ids::new();
        let mut baskets = sequence(&[700], &mut ids);
        let product = pineapple();

        let planned = plan(&baskets, DEFAULT_CAPACITY_GRAMS, 1500, Walk::default());
        let allocation = apply(
            &mut baskets,
            planned,
            &product,
            &mut ids,
            DEFAULT_CAPACITY_GRAMS,
            VND,
        );

        assert_eq!(loads(&baskets), vec![1000, 1000, 200]);
        assert_eq!(allocation.grams(), 1500);
        assert_eq!(allocation.created_baskets.len(), 2);

        let first = baskets.first().ok_or("missing basket")?;
        assert_eq!(
            allocation.overflow,
            Some(Overflow {
                basket: first.id(),
                spilled: 1200,
            })
        );

        let last = baskets.last().ok_or("missing basket")?;
        assert_eq!(last.name(), "Basket 3");
        assert_eq!(last.len(), 1);

        Ok(())
    }

    #[test]
    fn apply_never_merges_items() -> TestResult {
        let mut ids = Ids::new();
        let mut baskets = sequence(&[100], &mut ids);
        let product = pineapple();

        let planned = plan(&baskets, DEFAULT_CAPACITY_GRAMS, 100, Walk::default());
        apply(
            &mut baskets,
            planned,
            &product,
            &mut ids,
            DEFAULT_CAPACITY_GRAMS,
            VND,
        );

        let first = baskets.first().ok_or("missing basket")?;
        assert_eq!(first.len(), 2);
        assert_eq!(first.total_grams(), 200);

        Ok(())
    }

    #[test]
    fn ids_are_sequential() {
        let mut ids = Ids::new();

        assert_eq!(ids.item(), ItemId::new(1));
        assert_eq!(ids.item(), ItemId::new(2));
        assert_eq!(ids.basket(), BasketId::new(1));
    }
}
