//! Order Example
//!
//! This example loads a product catalog and spreads the requested quantities across baskets.
//!
//! Use `-f` to load a fixture set by name
//! Use `-a PRODUCT_ID=GRAMS` (repeatable) to allocate a product
//! Use `-e GRAMS` to edit the first item of the first basket
//! Use `-u N` to undo the last N changes before printing
//!
//! Set `RUST_LOG=heft=debug` to see each placement.

use std::io;

use anyhow::{Context, Result};
use clap::Parser;
use heft::{
    fixtures::Fixture,
    notices::NoticeLog,
    order::Order,
    quantity::parse_grams,
    receipt::OrderSummary,
    settings::OrderSettings,
    utils::ExampleOrderArgs,
};
use tracing_subscriber::EnvFilter;

/// Order Example
#[expect(clippy::print_stdout, reason = "Example code")]
pub fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let args = ExampleOrderArgs::parse();

    let fixture = Fixture::from_set(&args.fixture)?;
    let settings = match args.settings.as_deref() {
        Some(path) => OrderSettings::load(path)?,
        None => OrderSettings::default(),
    };

    let mut order = Order::with_observer(&settings, NoticeLog::default())?;

    for (id, grams) in &args.add {
        let product = fixture.product(id)?;
        let grams = parse_grams(grams).with_context(|| format!("quantity for product {id}"))?;

        order.allocate(product, grams)?;
    }

    if let Some(grams) = args.edit.as_deref() {
        let grams = parse_grams(grams).context("edited quantity")?;
        let target = order
            .baskets()
            .first()
            .and_then(|basket| basket.iter().next().map(|item| (basket.id(), item.id())));

        if let Some((basket, item)) = target {
            order.update_item(basket, item, grams);
        }
    }

    for _ in 0..args.undo {
        if !order.undo() {
            break;
        }
    }

    for notice in order.observer_mut().drain() {
        println!("{notice:?}");
    }

    let stdout = io::stdout();
    let mut handle = stdout.lock();

    OrderSummary::from_order(&order).write_to(&mut handle)?;

    println!("\nUndo steps available: {}", order.undo_depth());

    Ok(())
}
