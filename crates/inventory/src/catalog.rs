//! Read-only catalog view consumed by outer layers.

use shopledger_core::{LedgerResult, ProductId};
use shopledger_products::Product;

use crate::container::StockEntry;

/// Catalog lookups. The inventory is the only implementation; outer layers
/// depend on this trait instead of the full stock container.
pub trait Catalog {
    /// Product by id.
    fn lookup(&self, product_id: &ProductId) -> LedgerResult<Product>;

    /// Every catalog product with its available quantity.
    fn list(&self) -> Vec<StockEntry>;
}
