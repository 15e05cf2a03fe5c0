use std::sync::Arc;

use chrono::Utc;
use rust_decimal::Decimal;
use tracing::{info, warn};

use shopledger_cart::ShoppingCart;
use shopledger_core::{CartId, LedgerError, LedgerResult, ProductId};
use shopledger_inventory::{Catalog, Inventory, StockContainer, StockEntry};
use shopledger_products::{NewProduct, Product};

use crate::receipt::Receipt;
use crate::registry::{SessionInfo, SessionRegistry};

/// What was still open when the store shut down.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TeardownSummary {
    pub sessions: usize,
    pub reserved_units: u64,
}

/// Owns the inventory and the registry of carts, and runs checkout.
#[derive(Debug)]
pub struct StoreManager {
    inventory: Arc<Inventory>,
    sessions: SessionRegistry,
}

impl StoreManager {
    pub fn new(inventory: Arc<Inventory>) -> Self {
        Self {
            inventory,
            sessions: SessionRegistry::new(),
        }
    }

    /// Start a store on the default catalog.
    pub fn init() -> Self {
        let store = Self::new(Arc::new(Inventory::with_default_catalog()));
        info!(products = store.inventory.count(), "store initialized");
        store
    }

    /// Shut the store down, dropping every session.
    ///
    /// Units still reserved in open carts are reported, not returned: the
    /// process is going away with the ledger.
    pub fn teardown(self) -> TeardownSummary {
        let carts = self.sessions.drain();
        let summary = TeardownSummary {
            sessions: carts.len(),
            reserved_units: carts.iter().map(|c| c.total_units()).sum(),
        };
        info!(
            sessions = summary.sessions,
            reserved_units = summary.reserved_units,
            "store shut down"
        );
        summary
    }

    pub fn inventory(&self) -> &Arc<Inventory> {
        &self.inventory
    }

    // -------------------------
    // Catalog administration
    // -------------------------

    pub fn add_product(&self, request: NewProduct) -> LedgerResult<ProductId> {
        self.inventory.add_new_product(request)
    }

    /// Add stock to an existing product. Returns the new quantity.
    pub fn restock(&self, product_id: &ProductId, units: u32) -> LedgerResult<u32> {
        self.inventory.restock(product_id, units)
    }

    /// Take stock out of the inventory outside any cart (damaged goods, audits).
    pub fn withdraw_stock(&self, product_id: &ProductId, units: u32) -> LedgerResult<u32> {
        self.inventory.decrease(product_id, units)?;
        let remaining = self.inventory.quantity(product_id)?;
        info!(product_id = %product_id, units, remaining, "stock withdrawn");
        Ok(remaining)
    }

    // -------------------------
    // Sessions
    // -------------------------

    /// Register a cart under its id.
    ///
    /// Registering an id that is already present is a no-op and returns
    /// `false`. A cart drawing from another inventory is refused.
    pub fn register_session(&self, cart: Arc<ShoppingCart>) -> LedgerResult<bool> {
        if !cart.is_bound_to(&self.inventory) {
            return Err(LedgerError::invalid("cart is bound to a different inventory"));
        }
        let id = cart.id_typed();
        let added = self.sessions.register(cart)?;
        if added {
            info!(cart_id = %id, "session registered");
        }
        Ok(added)
    }

    /// Create a cart on this store's inventory and register it.
    pub fn open_session(&self, owner: impl Into<String>) -> LedgerResult<Arc<ShoppingCart>> {
        let cart = Arc::new(ShoppingCart::with_owner(self.inventory.clone(), owner));
        self.register_session(cart.clone())?;
        Ok(cart)
    }

    pub fn session(&self, cart_id: &CartId) -> LedgerResult<Arc<ShoppingCart>> {
        self.sessions.get(cart_id)
    }

    pub fn sessions(&self) -> Vec<SessionInfo> {
        self.sessions.infos()
    }

    pub fn session_count(&self) -> usize {
        self.sessions.len()
    }

    /// Unregister a session, returning whatever it still holds to the
    /// inventory. Returns the number of units handed back.
    ///
    /// The cart is closed before it leaves the registry, so a reservation
    /// racing the end is either returned here or refused.
    pub fn end_session(&self, cart_id: &CartId) -> LedgerResult<u64> {
        let cart = self.sessions.get(cart_id)?;
        let returned = cart.close()?;
        self.sessions.remove(cart_id)?;
        info!(cart_id = %cart_id, units_returned = returned, "session ended");
        Ok(returned)
    }

    pub fn reserve(&self, cart_id: &CartId, product_id: &ProductId, units: u32) -> LedgerResult<()> {
        self.session(cart_id)?.reserve(product_id, units)
    }

    pub fn release(&self, cart_id: &CartId, product_id: &ProductId, units: u32) -> LedgerResult<()> {
        self.session(cart_id)?.release(product_id, units)
    }

    // -------------------------
    // Checkout
    // -------------------------

    /// Finalize a cart into a sale and return the total price.
    ///
    /// The units left the inventory when they were reserved; checkout only
    /// discards them from the cart. An empty cart checks out at 0.
    pub fn checkout(&self, cart: &ShoppingCart) -> LedgerResult<Decimal> {
        Ok(self.checkout_receipt(cart)?.total)
    }

    /// Same as [`checkout`](Self::checkout), keeping the line detail.
    pub fn checkout_receipt(&self, cart: &ShoppingCart) -> LedgerResult<Receipt> {
        if !cart.is_bound_to(&self.inventory) {
            return Err(LedgerError::invalid("cart is bound to a different inventory"));
        }

        // Taking the entries is atomic with any other operation on the cart.
        let sold = cart.drain_sold()?;
        let receipt = Receipt::from_entries(cart.id_typed(), &sold, Utc::now());

        if receipt.is_empty() {
            warn!(cart_id = %cart.id_typed(), "checkout of empty cart");
        } else {
            info!(
                cart_id = %cart.id_typed(),
                lines = receipt.lines.len(),
                units = receipt.units(),
                total = %receipt.total,
                "checkout completed"
            );
        }
        Ok(receipt)
    }

    pub fn checkout_session(&self, cart_id: &CartId) -> LedgerResult<Receipt> {
        let cart = self.session(cart_id)?;
        self.checkout_receipt(&cart)
    }
}

impl Catalog for StoreManager {
    fn lookup(&self, product_id: &ProductId) -> LedgerResult<Product> {
        self.inventory.lookup(product_id)
    }

    fn list(&self) -> Vec<StockEntry> {
        self.inventory.list()
    }
}
