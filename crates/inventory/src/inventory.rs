use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};

use tracing::{debug, info, warn};

use shopledger_core::{LedgerError, LedgerResult, ProductId, ensure_units};
use shopledger_products::{NewProduct, Product};

use crate::catalog::Catalog;
use crate::container::{StockContainer, StockEntry};
use crate::seed::{DEFAULT_CATALOG, SeedItem};

type Slot = Arc<Mutex<StockEntry>>;

#[derive(Debug, Default)]
struct Index {
    order: Vec<ProductId>,
    slots: HashMap<ProductId, Slot>,
}

impl Index {
    fn insert(&mut self, entry: StockEntry) {
        let id = entry.product_id();
        if self.slots.insert(id, Arc::new(Mutex::new(entry))).is_none() {
            self.order.push(id);
        }
    }
}

/// The authoritative stock for the whole store.
///
/// Each product sits behind its own mutex, so mutations of one product are
/// serialized while different products proceed in parallel. The index of
/// products is behind an `RwLock` and only write-locked when a product is
/// added. Entries are never removed: a product at 0 is out of stock but
/// stays in the catalog.
#[derive(Debug, Default)]
pub struct Inventory {
    index: RwLock<Index>,
}

impl Inventory {
    /// Empty inventory with no catalog.
    pub fn new() -> Self {
        Self::default()
    }

    /// Inventory seeded with [`DEFAULT_CATALOG`].
    pub fn with_default_catalog() -> Self {
        Self::seeded(&DEFAULT_CATALOG)
    }

    /// Inventory seeded from `items`.
    ///
    /// A seed item that fails validation is logged and skipped; the rest
    /// still load. The store must start even with one bad line.
    pub fn seeded(items: &[SeedItem]) -> Self {
        let inventory = Self::new();
        for item in items {
            if let Err(err) = inventory.add_new_product(item.to_new_product()) {
                warn!(product = item.name, error = %err, "skipping invalid seed item");
            }
        }
        info!(products = inventory.count(), "inventory seeded");
        inventory
    }

    /// Mint a new catalog product with its initial stock.
    ///
    /// This is the only way quantity enters the system.
    pub fn add_new_product(&self, request: NewProduct) -> LedgerResult<ProductId> {
        let id = ProductId::new();
        let product = Product::mint(id, &request)?;

        info!(
            product_id = %id,
            name = product.name(),
            unit_price = %product.unit_price(),
            initial_stock = request.initial_stock,
            "product added to inventory"
        );

        self.write_index()?
            .insert(StockEntry::new(product, request.initial_stock));
        Ok(id)
    }

    /// Catalog lookup by id.
    pub fn product(&self, product_id: &ProductId) -> LedgerResult<Product> {
        let slot = self.slot(product_id)?;
        let entry = lock_entry(&slot)?;
        Ok(entry.product.clone())
    }

    /// Add stock to a product that is already in the catalog.
    ///
    /// Unlike [`StockContainer::increase`], this never creates an entry.
    /// Returns the new quantity.
    pub fn restock(&self, product_id: &ProductId, units: u32) -> LedgerResult<u32> {
        ensure_units(units)?;
        let slot = self.slot(product_id)?;
        let mut entry = lock_entry(&slot)?;
        entry.quantity = checked_add(entry.quantity, units)?;
        info!(product_id = %product_id, units, quantity = entry.quantity, "restocked");
        Ok(entry.quantity)
    }

    pub fn contains(&self, product_id: &ProductId) -> bool {
        self.slot(product_id).is_ok()
    }

    fn slot(&self, product_id: &ProductId) -> LedgerResult<Slot> {
        self.read_index()?
            .slots
            .get(product_id)
            .cloned()
            .ok_or(LedgerError::UnknownProduct(*product_id))
    }

    fn read_index(&self) -> LedgerResult<RwLockReadGuard<'_, Index>> {
        self.index
            .read()
            .map_err(|_| LedgerError::poisoned("inventory index"))
    }

    fn write_index(&self) -> LedgerResult<RwLockWriteGuard<'_, Index>> {
        self.index
            .write()
            .map_err(|_| LedgerError::poisoned("inventory index"))
    }
}

fn lock_entry(slot: &Slot) -> LedgerResult<MutexGuard<'_, StockEntry>> {
    slot.lock().map_err(|_| LedgerError::poisoned("inventory entry"))
}

fn checked_add(quantity: u32, units: u32) -> LedgerResult<u32> {
    quantity
        .checked_add(units)
        .ok_or_else(|| LedgerError::invalid("quantity overflow"))
}

impl StockContainer for Inventory {
    fn quantity(&self, product_id: &ProductId) -> LedgerResult<u32> {
        let slot = self.slot(product_id)?;
        let entry = lock_entry(&slot)?;
        Ok(entry.quantity)
    }

    fn increase(&self, product: &Product, units: u32) -> LedgerResult<()> {
        ensure_units(units)?;
        let id = product.id_typed();

        if let Ok(slot) = self.slot(&id) {
            let mut entry = lock_entry(&slot)?;
            entry.quantity = checked_add(entry.quantity, units)?;
            debug!(product_id = %id, units, quantity = entry.quantity, "inventory increased");
            return Ok(());
        }

        // Another thread may have inserted it between the read and the write lock.
        let mut index = self.write_index()?;
        match index.slots.get(&id).cloned() {
            Some(slot) => {
                let mut entry = lock_entry(&slot)?;
                entry.quantity = checked_add(entry.quantity, units)?;
            }
            None => index.insert(StockEntry::new(product.clone(), units)),
        }
        debug!(product_id = %id, units, "inventory increased");
        Ok(())
    }

    fn decrease(&self, product_id: &ProductId, units: u32) -> LedgerResult<()> {
        ensure_units(units)?;
        let slot = self.slot(product_id)?;
        let mut entry = lock_entry(&slot)?;

        if entry.quantity < units {
            return Err(LedgerError::insufficient(*product_id, units, entry.quantity));
        }
        entry.quantity -= units;
        debug!(product_id = %product_id, units, quantity = entry.quantity, "inventory decreased");
        Ok(())
    }

    fn count(&self) -> usize {
        self.index
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .order
            .len()
    }

    fn list_entries(&self) -> Vec<StockEntry> {
        let index = self.index.read().unwrap_or_else(PoisonError::into_inner);
        index
            .order
            .iter()
            .filter_map(|id| index.slots.get(id))
            .map(|slot| slot.lock().unwrap_or_else(PoisonError::into_inner).clone())
            .collect()
    }
}

impl Catalog for Inventory {
    fn lookup(&self, product_id: &ProductId) -> LedgerResult<Product> {
        self.product(product_id)
    }

    fn list(&self) -> Vec<StockEntry> {
        self.list_entries()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal::Decimal;
    use rust_decimal_macros::dec;

    fn inventory_with(name: &str, price: Decimal, stock: u32) -> (Inventory, ProductId) {
        let inventory = Inventory::new();
        let id = inventory
            .add_new_product(NewProduct::new(name, price, stock))
            .unwrap();
        (inventory, id)
    }

    #[test]
    fn default_catalog_has_eight_valid_products() {
        let inventory = Inventory::with_default_catalog();
        let entries = inventory.list_entries();

        assert_eq!(inventory.count(), 8);
        assert_eq!(entries.len(), 8);

        let mut ids: Vec<_> = entries.iter().map(StockEntry::product_id).collect();
        ids.sort();
        ids.dedup();
        assert_eq!(ids.len(), 8, "product ids must be distinct");

        for entry in &entries {
            assert!(!entry.product.name().is_empty());
            assert!(entry.product.unit_price().amount() >= Decimal::ZERO);
        }
    }

    #[test]
    fn listing_keeps_seed_order() {
        let inventory = Inventory::with_default_catalog();
        let names: Vec<_> = inventory
            .list_entries()
            .iter()
            .map(|e| e.product.name().to_string())
            .collect();
        let expected: Vec<_> = DEFAULT_CATALOG.iter().map(|s| s.name.to_string()).collect();
        assert_eq!(names, expected);
    }

    #[test]
    fn invalid_seed_item_is_skipped_and_the_rest_load() {
        let items = [
            SeedItem::new("milk", 1599, 10),
            SeedItem::new("broken", -100, 5),
            SeedItem::new("", 100, 5),
            SeedItem::new("bread", 599, 14),
        ];
        let inventory = Inventory::seeded(&items);

        let names: Vec<_> = inventory
            .list_entries()
            .iter()
            .map(|e| e.product.name().to_string())
            .collect();
        assert_eq!(names, vec!["milk", "bread"]);
    }

    #[test]
    fn add_new_product_validates_price_and_name() {
        let inventory = Inventory::new();
        assert!(matches!(
            inventory.add_new_product(NewProduct::new("x", dec!(-1), 1)),
            Err(LedgerError::InvalidArgument(_))
        ));
        assert!(matches!(
            inventory.add_new_product(NewProduct::new(" ", dec!(1), 1)),
            Err(LedgerError::InvalidArgument(_))
        ));
        assert_eq!(inventory.count(), 0);
    }

    #[test]
    fn zero_initial_stock_is_a_valid_catalog_member() {
        let (inventory, id) = inventory_with("cheese", dec!(12.95), 0);
        assert_eq!(inventory.quantity(&id).unwrap(), 0);
        assert_eq!(inventory.count(), 1);
    }

    #[test]
    fn decrease_subtracts_and_keeps_zero_entries() {
        let (inventory, id) = inventory_with("milk", dec!(15.99), 10);

        inventory.decrease(&id, 4).unwrap();
        assert_eq!(inventory.quantity(&id).unwrap(), 6);

        inventory.decrease(&id, 6).unwrap();
        assert_eq!(inventory.quantity(&id).unwrap(), 0);
        assert_eq!(inventory.count(), 1);
    }

    #[test]
    fn decrease_validates_before_mutating() {
        let (inventory, id) = inventory_with("milk", dec!(15.99), 3);

        assert!(matches!(inventory.decrease(&id, 0), Err(LedgerError::InvalidArgument(_))));
        let unknown = ProductId::new();
        assert_eq!(inventory.decrease(&unknown, 1), Err(LedgerError::UnknownProduct(unknown)));
        assert_eq!(
            inventory.decrease(&id, 4),
            Err(LedgerError::insufficient(id, 4, 3))
        );
        assert_eq!(inventory.quantity(&id).unwrap(), 3);
    }

    #[test]
    fn quantity_of_unknown_product_fails() {
        let inventory = Inventory::new();
        let id = ProductId::new();
        assert_eq!(inventory.quantity(&id), Err(LedgerError::UnknownProduct(id)));
    }

    #[test]
    fn increase_adds_to_existing_entry_or_creates_one() {
        let (inventory, id) = inventory_with("bread", dec!(5.99), 2);
        let product = inventory.product(&id).unwrap();

        inventory.increase(&product, 3).unwrap();
        assert_eq!(inventory.quantity(&id).unwrap(), 5);

        let other = Product::mint(ProductId::new(), &NewProduct::new("jam", dec!(3.50), 0)).unwrap();
        inventory.increase(&other, 7).unwrap();
        assert_eq!(inventory.quantity(&other.id_typed()).unwrap(), 7);
        assert_eq!(inventory.count(), 2);

        assert!(matches!(inventory.increase(&product, 0), Err(LedgerError::InvalidArgument(_))));
    }

    #[test]
    fn increase_rejects_overflow() {
        let (inventory, id) = inventory_with("rice", dec!(1), u32::MAX);
        let product = inventory.product(&id).unwrap();
        assert!(matches!(inventory.increase(&product, 1), Err(LedgerError::InvalidArgument(_))));
        assert_eq!(inventory.quantity(&id).unwrap(), u32::MAX);
    }

    #[test]
    fn restock_requires_a_known_product() {
        let (inventory, id) = inventory_with("lettuce", dec!(6.79), 23);
        assert_eq!(inventory.restock(&id, 15).unwrap(), 38);

        let unknown = ProductId::new();
        assert_eq!(inventory.restock(&unknown, 5), Err(LedgerError::UnknownProduct(unknown)));
        assert!(matches!(inventory.restock(&id, 0), Err(LedgerError::InvalidArgument(_))));
    }

    #[test]
    fn catalog_lookup_delegates_to_inventory() {
        let (inventory, id) = inventory_with("kids meal", dec!(2.99), 429);
        let product = Catalog::lookup(&inventory, &id).unwrap();
        assert_eq!(product.name(), "kids meal");
        assert_eq!(Catalog::list(&inventory).len(), 1);
        assert!(inventory.contains(&id));
    }

    #[test]
    fn concurrent_decrements_never_oversell() {
        let (inventory, id) = inventory_with("deli sandwich", dec!(89.99), 50);
        let successes = std::sync::atomic::AtomicU32::new(0);

        std::thread::scope(|s| {
            for _ in 0..8 {
                s.spawn(|| {
                    for _ in 0..20 {
                        if inventory.decrease(&id, 1).is_ok() {
                            successes.fetch_add(1, std::sync::atomic::Ordering::SeqCst);
                        }
                    }
                });
            }
        });

        assert_eq!(successes.into_inner(), 50);
        assert_eq!(inventory.quantity(&id).unwrap(), 0);
    }

    mod proptest_tests {
        use super::*;
        use proptest::prelude::*;

        proptest! {
            /// Property: quantity never goes below zero and failed decreases change nothing.
            #[test]
            fn decrease_never_goes_negative(
                initial in 0u32..100,
                ops in proptest::collection::vec((any::<bool>(), 1u32..20), 0..50)
            ) {
                let (inventory, id) = inventory_with("milk", dec!(1), initial);
                let product = inventory.product(&id).unwrap();
                let mut expected = initial;

                for (up, units) in ops {
                    if up {
                        inventory.increase(&product, units).unwrap();
                        expected += units;
                    } else if units <= expected {
                        inventory.decrease(&id, units).unwrap();
                        expected -= units;
                    } else {
                        let err = inventory.decrease(&id, units).unwrap_err();
                        prop_assert_eq!(err, LedgerError::insufficient(id, units, expected));
                    }
                    prop_assert_eq!(inventory.quantity(&id).unwrap(), expected);
                }
            }
        }
    }
}
