//! Integration tests for basket allocation, edits, removal and undo.
//!
//! Each test drives an [`Order`] through its public operations and checks the properties
//! every committed state must have: no basket over capacity, every requested gram placed,
//! prices derived from grams, and undo restoring exactly the previous baskets.

use std::sync::Arc;

use rust_decimal::Decimal;
use rusty_money::{Money, iso::VND};
use testresult::TestResult;

use heft::prelude::*;

fn product(id: &str, name: &str, price_per_kg: i64) -> Arc<Product> {
    Arc::new(Product::new(id, name, id, Money::from_major(price_per_kg, VND)))
}

fn apples() -> Arc<Product> {
    product("1", "Red Apples", 45_000)
}

fn bananas() -> Arc<Product> {
    product("2", "Bananas", 25_000)
}

fn loads<O: OrderObserver>(order: &Order<O>) -> Vec<u32> {
    order.baskets().iter().map(Basket::total_grams).collect()
}

fn item_counts<O: OrderObserver>(order: &Order<O>) -> Vec<usize> {
    order.baskets().iter().map(Basket::len).collect()
}

fn assert_within_capacity<O: OrderObserver>(order: &Order<O>) {
    for basket in order.baskets() {
        assert!(
            basket.total_grams() <= order.capacity(),
            "{} holds {}g",
            basket.name(),
            basket.total_grams()
        );
    }
}

#[test]
fn capacity_holds_after_every_operation() -> TestResult {
    let mut order = Order::new(VND);
    let quantities = [250, 999, 1, 1000, 3333, 420, 75];

    for (idx, grams) in quantities.into_iter().enumerate() {
        let product = if idx % 2 == 0 { apples() } else { bananas() };

        order.allocate(&product, grams)?;
        assert_within_capacity(&order);
    }

    let targets: Vec<(BasketId, ItemId)> = order
        .baskets()
        .iter()
        .flat_map(|basket| basket.iter().map(move |item| (basket.id(), item.id())))
        .collect();

    for (step, (basket, item)) in targets.into_iter().enumerate() {
        if step % 2 == 0 {
            order.update_item(basket, item, 950);
        } else {
            order.remove_item(basket, item);
        }

        assert_within_capacity(&order);
    }

    while order.undo() {
        assert_within_capacity(&order);
    }

    Ok(())
}

#[test]
fn allocation_conserves_grams() -> TestResult {
    let mut order = Order::new(VND);
    order.allocate(&apples(), 640)?;

    for grams in [1, 359, 1000, 2500, 17] {
        let before = order.total_grams();

        order.allocate(&bananas(), grams)?;

        assert_eq!(order.total_grams(), before + u64::from(grams));
    }

    Ok(())
}

#[test]
fn zero_grams_leaves_sequence_unchanged() -> TestResult {
    let mut order = Order::new(VND);
    order.allocate(&apples(), 300)?;
    let before = order.baskets().to_vec();
    let depth = order.undo_depth();

    order.allocate(&apples(), 0)?;

    assert_eq!(order.baskets(), before.as_slice());
    assert_eq!(order.undo_depth(), depth);

    Ok(())
}

#[test]
fn spillover_creates_baskets_only_as_needed() -> TestResult {
    let mut order = Order::new(VND);

    order.allocate(&apples(), 2500)?;

    assert_eq!(loads(&order), vec![1000, 1000, 500]);

    let names: Vec<&str> = order.baskets().iter().map(Basket::name).collect();
    assert_eq!(names, vec!["Basket 1", "Basket 2", "Basket 3"]);

    Ok(())
}

#[test]
fn spillover_fills_existing_baskets_before_creating() -> TestResult {
    let settings = OrderSettings {
        initial_baskets: 3,
        ..OrderSettings::default()
    };
    let mut order = Order::with_settings(&settings)?;

    order.allocate(&apples(), 1200)?;
    order.allocate(&bananas(), 1500)?;

    assert_eq!(loads(&order), vec![1000, 1000, 700]);
    assert_eq!(item_counts(&order), vec![1, 2, 1]);

    Ok(())
}

#[test]
fn edit_without_overflow_stays_in_basket() -> TestResult {
    let mut order = Order::new(VND);
    let allocation = order.allocate(&apples(), 400)?;
    let placement = allocation.placements.first().ok_or("nothing placed")?;

    let update = order
        .update_item(placement.basket, placement.item, 600)
        .ok_or("update ignored")?;

    assert!(update.spill.is_none());
    assert_eq!(loads(&order), vec![600]);
    assert_eq!(order.item_grams(placement.basket, placement.item), 600);

    Ok(())
}

#[test]
fn edit_to_exact_capacity_creates_no_basket() -> TestResult {
    let mut order = Order::new(VND);
    order.allocate(&bananas(), 400)?;
    let allocation = order.allocate(&apples(), 300)?;
    let placement = allocation.placements.first().ok_or("nothing placed")?;

    let update = order
        .update_item(placement.basket, placement.item, 600)
        .ok_or("update ignored")?;

    assert_eq!(update.moved(), 0);
    assert_eq!(loads(&order), vec![1000]);
    assert_eq!(item_counts(&order), vec![2]);

    let basket = order.basket(placement.basket).ok_or("missing basket")?;
    let item = basket.item(placement.item).ok_or("missing item")?;
    assert_eq!(*item.price(), Money::from_major(27_000, VND));

    Ok(())
}

#[test]
fn edit_with_overflow_spills_forward_not_backward() -> TestResult {
    let settings = OrderSettings {
        initial_baskets: 2,
        ..OrderSettings::default()
    };
    let mut order = Order::with_observer(&settings, NoticeLog::default())?;

    order.allocate(&bananas(), 400)?;
    let allocation = order.allocate(&apples(), 400)?;
    let edited = allocation.placements.first().ok_or("nothing placed")?;
    assert_eq!(loads(&order), vec![800, 0]);

    let update = order
        .update_item(edited.basket, edited.item, 900)
        .ok_or("update ignored")?;

    assert_eq!(update.grams, 600);
    assert_eq!(update.moved(), 300);
    assert_eq!(loads(&order), vec![1000, 300]);
    assert_eq!(order.baskets().len(), 2);
    assert!(
        order
            .observer()
            .notices()
            .contains(&Notice::ExcessMoved { grams: 300 })
    );

    let second = order.baskets().get(1).ok_or("missing second basket")?;
    let spilled = second.iter().next().ok_or("nothing spilled")?;
    assert_eq!(spilled.product().id, "1");

    Ok(())
}

#[test]
fn edit_spill_skips_earlier_baskets() -> TestResult {
    let settings = OrderSettings {
        initial_baskets: 3,
        ..OrderSettings::default()
    };
    let mut order = Order::with_settings(&settings)?;

    let allocation = order.allocate(&apples(), 1100)?;
    let [first, second] = allocation.placements.as_slice() else {
        return Err("expected two placements".into());
    };

    order.remove_item(first.basket, first.item);
    assert_eq!(loads(&order), vec![0, 100, 0]);

    order.update_item(second.basket, second.item, 1400);

    assert_eq!(loads(&order), vec![0, 1000, 400]);

    Ok(())
}

#[test]
fn undo_restores_exact_prior_totals() -> TestResult {
    let mut order = Order::new(VND);
    order.allocate(&apples(), 700)?;
    order.allocate(&bananas(), 150)?;
    let grams = loads(&order);
    let counts = item_counts(&order);
    let total = order.grand_total();

    order.allocate(&apples(), 1800)?;
    assert_ne!(loads(&order), grams);

    assert!(order.undo());

    assert_eq!(loads(&order), grams);
    assert_eq!(item_counts(&order), counts);
    assert_eq!(order.grand_total(), total);

    Ok(())
}

#[test]
fn history_keeps_only_ten_steps() -> TestResult {
    let mut order = Order::new(VND);

    for _ in 0..12 {
        order.allocate(&apples(), 100)?;
    }

    assert_eq!(order.undo_depth(), 10);

    let mut undone = 0;
    while order.undo() {
        undone += 1;
    }

    assert_eq!(undone, 10);
    assert_eq!(loads(&order), vec![200]);

    Ok(())
}

#[test]
fn removing_only_item_keeps_basket() -> TestResult {
    let mut order = Order::new(VND);
    let allocation = order.allocate(&apples(), 2000)?;
    let last = allocation.placements.last().ok_or("nothing placed")?;

    order
        .remove_item(last.basket, last.item)
        .ok_or("nothing removed")?;

    let basket = order.basket(last.basket).ok_or("basket was deleted")?;
    assert_eq!(basket.total_grams(), 0);
    assert_eq!(basket.total_price(), Money::from_major(0, VND));
    assert_eq!(order.baskets().len(), 2);

    Ok(())
}

#[test]
fn removal_is_undoable() -> TestResult {
    let mut order = Order::new(VND);
    let allocation = order.allocate(&bananas(), 300)?;
    let placement = allocation.placements.first().ok_or("nothing placed")?;

    order.remove_item(placement.basket, placement.item);
    assert_eq!(loads(&order), vec![0]);

    assert!(order.undo());
    assert_eq!(order.item_grams(placement.basket, placement.item), 300);

    Ok(())
}

#[test]
fn price_is_derived_from_grams() -> TestResult {
    let mut order = Order::new(VND);
    let strawberries = product("7", "Strawberries", 120_000);

    order.allocate(&strawberries, 2345)?;

    for item in order.baskets().iter().flat_map(Basket::iter) {
        let expected = Decimal::from(120_000) * Decimal::from(item.grams()) / Decimal::from(1000);

        assert_eq!(*item.price().amount(), expected);
    }

    assert_eq!(
        *order.grand_total().amount(),
        Decimal::from(281_400),
        "2345g at 120000/kg"
    );

    Ok(())
}

#[test]
fn referential_misses_are_silent() -> TestResult {
    let mut order = Order::with_observer(&OrderSettings::default(), NoticeLog::default())?;
    order.allocate(&apples(), 100)?;
    order.observer_mut().drain();

    assert!(order.update_item(BasketId::new(77), ItemId::new(1), 50).is_none());
    assert!(order.remove_item(BasketId::new(77), ItemId::new(1)).is_none());
    assert_eq!(order.total_grams_of(BasketId::new(77)), 0);
    assert!(order.observer().notices().is_empty());
    assert_eq!(order.undo_depth(), 1);

    Ok(())
}
