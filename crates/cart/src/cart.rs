use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use tracing::debug;

use shopledger_core::{CartId, LedgerError, LedgerResult, ProductId, ensure_units};
use shopledger_inventory::{Inventory, StockContainer, StockEntry};
use shopledger_products::Product;

/// A session's in-progress reservation of units taken from one inventory.
///
/// Entries keep insertion order and never sit at quantity 0.
///
/// Every operation that touches both containers holds the cart's lock for
/// its whole duration, and always locks the cart before the inventory entry.
/// The inventory never locks a cart, so the order can't invert.
#[derive(Debug)]
pub struct ShoppingCart {
    id: CartId,
    owner: String,
    opened_at: DateTime<Utc>,
    inventory: Arc<Inventory>,
    state: Mutex<CartState>,
}

/// Lock-protected cart state. `closed` lives under the same lock as the
/// entries so a reservation can't slip in after the cart was emptied.
#[derive(Debug, Default)]
struct CartState {
    entries: Vec<StockEntry>,
    closed: bool,
}

impl ShoppingCart {
    /// Empty cart bound to `inventory` for its whole life.
    pub fn new(inventory: Arc<Inventory>) -> Self {
        Self::with_owner(inventory, "")
    }

    pub fn with_owner(inventory: Arc<Inventory>, owner: impl Into<String>) -> Self {
        Self {
            id: CartId::new(),
            owner: owner.into(),
            opened_at: Utc::now(),
            inventory,
            state: Mutex::new(CartState::default()),
        }
    }

    pub fn id_typed(&self) -> CartId {
        self.id
    }

    pub fn owner(&self) -> &str {
        &self.owner
    }

    pub fn opened_at(&self) -> DateTime<Utc> {
        self.opened_at
    }

    pub fn inventory(&self) -> &Arc<Inventory> {
        &self.inventory
    }

    /// Whether this cart draws from exactly `inventory`.
    pub fn is_bound_to(&self, inventory: &Arc<Inventory>) -> bool {
        Arc::ptr_eq(&self.inventory, inventory)
    }

    /// Move `units` of a product from the inventory into this cart.
    ///
    /// The inventory is debited first; the cart only records the units once
    /// that succeeded. On any error neither container has changed.
    ///
    /// A closed cart refuses with `UnknownSession`.
    pub fn reserve(&self, product_id: &ProductId, units: u32) -> LedgerResult<()> {
        ensure_units(units)?;
        let mut state = self.lock()?;
        if state.closed {
            return Err(LedgerError::UnknownSession(self.id));
        }
        let entries = &mut state.entries;

        let held = entries.iter().position(|e| e.product_id() == *product_id);
        let updated = match held {
            Some(i) => {
                let updated = entries[i]
                    .quantity
                    .checked_add(units)
                    .ok_or_else(|| LedgerError::invalid("cart quantity overflow"))?;
                self.inventory.decrease(product_id, units)?;
                entries[i].quantity = updated;
                updated
            }
            None => {
                let product = self.inventory.product(product_id)?;
                self.inventory.decrease(product_id, units)?;
                entries.push(StockEntry::new(product, units));
                units
            }
        };

        debug!(cart_id = %self.id, product_id = %product_id, units, quantity = updated, "reserved");
        Ok(())
    }

    /// Move `units` of a product from this cart back into the inventory.
    ///
    /// The entry is deleted when it reaches 0.
    pub fn release(&self, product_id: &ProductId, units: u32) -> LedgerResult<()> {
        ensure_units(units)?;
        let mut state = self.lock()?;
        let entries = &mut state.entries;

        let i = entries
            .iter()
            .position(|e| e.product_id() == *product_id)
            .ok_or(LedgerError::NotInCart(*product_id))?;
        let held = entries[i].quantity;
        if held < units {
            return Err(LedgerError::insufficient(*product_id, units, held));
        }

        self.inventory.increase(&entries[i].product, units)?;

        if held == units {
            entries.remove(i);
        } else {
            entries[i].quantity = held - units;
        }

        debug!(cart_id = %self.id, product_id = %product_id, units, quantity = held - units, "released");
        Ok(())
    }

    /// Hand every reserved unit back to the inventory.
    ///
    /// Used when a session ends without checking out. Returns the number of
    /// units returned. If the inventory refuses an entry, that entry and the
    /// ones after it stay in the cart.
    pub fn release_all(&self) -> LedgerResult<u64> {
        let mut state = self.lock()?;
        self.return_entries(&mut state.entries)
    }

    /// Release everything and refuse any later reservation, atomically.
    ///
    /// Ends the cart's life as a session. Closing twice returns 0 the second
    /// time. If the inventory refuses an entry the cart stays open.
    pub fn close(&self) -> LedgerResult<u64> {
        let mut state = self.lock()?;
        let returned = self.return_entries(&mut state.entries)?;
        state.closed = true;
        debug!(cart_id = %self.id, "closed");
        Ok(returned)
    }

    pub fn is_closed(&self) -> bool {
        self.snapshot().closed
    }

    fn return_entries(&self, entries: &mut Vec<StockEntry>) -> LedgerResult<u64> {
        let mut returned = 0u64;

        while let Some(entry) = entries.first() {
            self.inventory.increase(&entry.product, entry.quantity)?;
            returned += u64::from(entry.quantity);
            entries.remove(0);
        }

        debug!(cart_id = %self.id, units = returned, "released all");
        Ok(returned)
    }

    /// Empty the cart **without** returning anything to the inventory.
    ///
    /// This destroys the reserved quantity and exists only for checkout,
    /// where the units have been sold. Anything else must use
    /// [`release`](Self::release) or [`release_all`](Self::release_all).
    pub fn drain_sold(&self) -> LedgerResult<Vec<StockEntry>> {
        let mut state = self.lock()?;
        Ok(std::mem::take(&mut state.entries))
    }

    /// Exact price of everything currently in the cart.
    pub fn total(&self) -> LedgerResult<Decimal> {
        let state = self.lock()?;
        Ok(state
            .entries
            .iter()
            .map(|e| e.product.unit_price().line_total(e.quantity))
            .sum())
    }

    pub fn is_empty(&self) -> bool {
        self.count() == 0
    }

    fn lock(&self) -> LedgerResult<MutexGuard<'_, CartState>> {
        self.state.lock().map_err(|_| LedgerError::poisoned("cart"))
    }

    fn snapshot(&self) -> MutexGuard<'_, CartState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

/// Through the container contract, `increase` is [`ShoppingCart::reserve`]
/// and `decrease` is [`ShoppingCart::release`]: a cart can't mint or destroy
/// quantity.
impl StockContainer for ShoppingCart {
    fn quantity(&self, product_id: &ProductId) -> LedgerResult<u32> {
        self.lock()?
            .entries
            .iter()
            .find(|e| e.product_id() == *product_id)
            .map(|e| e.quantity)
            .ok_or(LedgerError::NotInCart(*product_id))
    }

    fn increase(&self, product: &Product, units: u32) -> LedgerResult<()> {
        self.reserve(&product.id_typed(), units)
    }

    fn decrease(&self, product_id: &ProductId, units: u32) -> LedgerResult<()> {
        self.release(product_id, units)
    }

    fn count(&self) -> usize {
        self.snapshot().entries.len()
    }

    fn list_entries(&self) -> Vec<StockEntry> {
        self.snapshot().entries.clone()
    }
}
