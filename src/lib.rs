//! Heft
//!
//! Heft splits weighed orders across fixed-capacity baskets. Requested quantities spill into
//! later baskets, and new ones are appended as needed. Totals are derived from the contents,
//! edits redistribute anything that no longer fits, and recent changes can be undone.

pub mod allocation;
pub mod basket;
pub mod fixtures;
pub mod history;
pub mod items;
pub mod notices;
pub mod order;
pub mod prelude;
pub mod pricing;
pub mod products;
pub mod quantity;
pub mod receipt;
pub mod selection;
pub mod settings;
pub mod utils;
