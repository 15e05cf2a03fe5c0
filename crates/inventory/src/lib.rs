//! Inventory module: the store-wide, authoritative stock.
//!
//! Also home of the [`StockContainer`] contract that the shopping cart
//! implements too, and of the default seed catalog.

pub mod catalog;
pub mod container;
pub mod inventory;
pub mod seed;

pub use catalog::Catalog;
pub use container::{StockContainer, StockEntry};
pub use inventory::Inventory;
pub use seed::{DEFAULT_CATALOG, SeedItem};
