//! Receipt
//!
//! Printable order summary: every basket with its items, then the grand total.

use std::io;

use rusty_money::{Money, iso::Currency};
use tabled::{
    builder::Builder,
    grid::config::HorizontalLine,
    settings::{Alignment, Style, Theme, object::Columns},
};
use thiserror::Error;

use crate::{basket::Basket, notices::OrderObserver, order::Order};

/// Errors that can occur when writing a summary.
#[derive(Debug, Error)]
pub enum ReceiptError {
    /// IO error
    #[error("Failed to write summary: {0}")]
    Io(#[from] io::Error),
}

/// Summary of an order, borrowed from its current state.
#[derive(Debug, Clone)]
pub struct OrderSummary<'a> {
    baskets: &'a [Basket],
    grand_total: Money<'static, Currency>,
}

impl<'a> OrderSummary<'a> {
    /// Summarise the order as it is now.
    pub fn from_order<O: OrderObserver>(order: &'a Order<O>) -> Self {
        Self {
            baskets: order.baskets(),
            grand_total: order.grand_total(),
        }
    }

    /// Number of baskets.
    pub fn basket_count(&self) -> usize {
        self.baskets.len()
    }

    /// Number of line items across every basket.
    pub fn item_count(&self) -> usize {
        self.baskets.iter().map(Basket::len).sum()
    }

    /// Grams across every basket.
    pub fn total_grams(&self) -> u64 {
        self.baskets
            .iter()
            .map(|basket| u64::from(basket.total_grams()))
            .sum()
    }

    /// Sum of every basket's price.
    pub fn grand_total(&self) -> Money<'static, Currency> {
        self.grand_total
    }

    /// Writes the summary table followed by the totals.
    ///
    /// # Errors
    ///
    /// Returns an error if the summary cannot be written.
    pub fn write_to(&self, mut out: impl io::Write) -> Result<(), ReceiptError> {
        let mut builder = Builder::default();
        let mut boundaries = Vec::with_capacity(self.baskets.len());

        builder.push_record(["", "Basket", "Item", "Weight", "Price/kg", "Price"]);

        let mut row = 1;

        for basket in self.baskets {
            boundaries.push(row);
            row += append_basket_rows(&mut builder, basket);
        }

        let mut table = builder.build();
        let mut theme = Theme::from(Style::modern_rounded());
        let separator = HorizontalLine::new(Some('─'), Some('┼'), Some('├'), Some('┤'));

        theme.remove_horizontal_lines();

        for boundary in boundaries {
            theme.insert_horizontal_line(boundary, separator);
        }

        table.with(theme);
        table.modify(Columns::new(3..6), Alignment::right());

        writeln!(out, "\n{table}")?;
        writeln!(out, " Baskets:     {}", self.basket_count())?;
        writeln!(out, " Weight:      {}g", self.total_grams())?;
        writeln!(out, " Grand total: {}", self.grand_total)?;

        Ok(())
    }
}

/// Pushes one row per item plus a basket total row, returning the number of rows written.
fn append_basket_rows(builder: &mut Builder, basket: &Basket) -> usize {
    let mut rows = 0;

    for (idx, item) in basket.iter().enumerate() {
        let basket_name = if idx == 0 {
            basket.name().to_string()
        } else {
            String::new()
        };

        builder.push_record([
            format!("#{:<3}", idx + 1),
            basket_name,
            item.product().name.clone(),
            format!("{}g", item.grams()),
            format!("{}", item.product().price_per_kg),
            format!("{}", item.price()),
        ]);

        rows += 1;
    }

    let basket_name = if basket.is_empty() {
        basket.name().to_string()
    } else {
        String::new()
    };

    builder.push_record([
        String::new(),
        basket_name,
        "Total".to_string(),
        format!("{}g / {}g", basket.total_grams(), basket.capacity()),
        String::new(),
        format!("{}", basket.total_price()),
    ]);

    rows + 1
}
