use std::collections::HashMap;
use std::sync::{Arc, PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use shopledger_cart::ShoppingCart;
use shopledger_core::{CartId, LedgerError, LedgerResult};
use shopledger_inventory::StockContainer;

/// Public view of a registered session.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionInfo {
    pub cart_id: CartId,
    pub owner: String,
    pub opened_at: DateTime<Utc>,
    pub products: usize,
    pub reserved_units: u64,
}

impl SessionInfo {
    fn of(cart: &ShoppingCart) -> Self {
        Self {
            cart_id: cart.id_typed(),
            owner: cart.owner().to_string(),
            opened_at: cart.opened_at(),
            products: cart.count(),
            reserved_units: cart.total_units(),
        }
    }
}

#[derive(Debug, Default)]
struct Inner {
    order: Vec<CartId>,
    carts: HashMap<CartId, Arc<ShoppingCart>>,
}

/// Active carts keyed by id, enumerated in arrival order.
#[derive(Debug, Default)]
pub struct SessionRegistry {
    inner: RwLock<Inner>,
}

impl SessionRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a cart. Returns `false` (and changes nothing) if a cart with
    /// the same id is already present.
    pub fn register(&self, cart: Arc<ShoppingCart>) -> LedgerResult<bool> {
        let mut inner = self.write()?;
        let id = cart.id_typed();
        if inner.carts.contains_key(&id) {
            return Ok(false);
        }
        inner.carts.insert(id, cart);
        inner.order.push(id);
        Ok(true)
    }

    pub fn get(&self, cart_id: &CartId) -> LedgerResult<Arc<ShoppingCart>> {
        self.read()?
            .carts
            .get(cart_id)
            .cloned()
            .ok_or(LedgerError::UnknownSession(*cart_id))
    }

    pub fn remove(&self, cart_id: &CartId) -> LedgerResult<Arc<ShoppingCart>> {
        let mut inner = self.write()?;
        let cart = inner
            .carts
            .remove(cart_id)
            .ok_or(LedgerError::UnknownSession(*cart_id))?;
        inner.order.retain(|id| id != cart_id);
        Ok(cart)
    }

    pub fn infos(&self) -> Vec<SessionInfo> {
        let inner = self.inner.read().unwrap_or_else(PoisonError::into_inner);
        inner
            .order
            .iter()
            .filter_map(|id| inner.carts.get(id))
            .map(|cart| SessionInfo::of(cart))
            .collect()
    }

    pub fn len(&self) -> usize {
        self.inner
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .order
            .len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Remove every cart, in arrival order.
    pub fn drain(&self) -> Vec<Arc<ShoppingCart>> {
        let mut inner = self.inner.write().unwrap_or_else(PoisonError::into_inner);
        let order = std::mem::take(&mut inner.order);
        order
            .into_iter()
            .filter_map(|id| inner.carts.remove(&id))
            .collect()
    }

    fn read(&self) -> LedgerResult<RwLockReadGuard<'_, Inner>> {
        self.inner.read().map_err(|_| LedgerError::poisoned("session registry"))
    }

    fn write(&self) -> LedgerResult<RwLockWriteGuard<'_, Inner>> {
        self.inner.write().map_err(|_| LedgerError::poisoned("session registry"))
    }
}
