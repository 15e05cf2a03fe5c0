use serde::{Deserialize, Serialize};

use shopledger_core::{LedgerResult, ProductId};
use shopledger_products::Product;

/// A product together with the quantity one container holds of it.
///
/// Values handed out by [`StockContainer::list_entries`] are snapshots; the
/// live entry never leaves its container.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StockEntry {
    pub product: Product,
    pub quantity: u32,
}

impl StockEntry {
    pub fn new(product: Product, quantity: u32) -> Self {
        Self { product, quantity }
    }

    pub fn product_id(&self) -> ProductId {
        self.product.id_typed()
    }
}

/// "A collection of products, each with a quantity."
///
/// Implemented by the inventory and by every shopping cart. Both take `&self`
/// and lock internally so a container can be shared across threads.
///
/// The one behavioral difference between implementations is what happens at
/// zero: the inventory keeps the entry (out of stock, still in the catalog),
/// a cart deletes it.
pub trait StockContainer {
    /// Current quantity of a product.
    ///
    /// Fails when the container has no entry for it.
    fn quantity(&self, product_id: &ProductId) -> LedgerResult<u32>;

    /// Add `units` (at least 1) of `product`, creating the entry if needed.
    fn increase(&self, product: &Product, units: u32) -> LedgerResult<()>;

    /// Remove `units` (at least 1) of a product.
    ///
    /// Fails without mutating anything if the entry is missing or holds fewer
    /// than `units`.
    fn decrease(&self, product_id: &ProductId, units: u32) -> LedgerResult<()>;

    /// Number of distinct product entries.
    fn count(&self) -> usize;

    /// Owned snapshot of every entry.
    fn list_entries(&self) -> Vec<StockEntry>;

    /// Sum of quantities across all entries.
    fn total_units(&self) -> u64 {
        self.list_entries()
            .iter()
            .map(|e| u64::from(e.quantity))
            .sum()
    }
}
