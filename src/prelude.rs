//! Heft prelude.
//!
//! Convenience exports for common library consumers.

pub use crate::{
    allocation::{Allocation, Overflow, Placement, Plan, PlannedPlacement, Target, Walk},
    basket::{Basket, BasketId, DEFAULT_CAPACITY_GRAMS},
    fixtures::{Fixture, FixtureError},
    history::{History, Snapshot},
    items::{ItemId, LineItem},
    notices::{NoopObserver, Notice, NoticeLog, OrderObserver},
    order::{ItemUpdate, Order, OrderError},
    products::{Catalog, Product, ProductKey},
    quantity::{QuantityError, parse_grams},
    receipt::{OrderSummary, ReceiptError},
    selection::Selection,
    settings::{OrderSettings, SettingsError},
};
