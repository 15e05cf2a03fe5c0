//! Default catalog loaded at store start.

use rust_decimal::Decimal;

use shopledger_products::NewProduct;

/// One seed line. Prices are stored in cents so the table stays `const`.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct SeedItem {
    pub name: &'static str,
    pub price_cents: i64,
    pub stock: u32,
}

impl SeedItem {
    pub const fn new(name: &'static str, price_cents: i64, stock: u32) -> Self {
        Self {
            name,
            price_cents,
            stock,
        }
    }

    pub fn unit_price(&self) -> Decimal {
        Decimal::new(self.price_cents, 2)
    }

    pub fn to_new_product(&self) -> NewProduct {
        NewProduct::new(self.name, self.unit_price(), self.stock)
    }
}

pub const DEFAULT_CATALOG: [SeedItem; 8] = [
    SeedItem::new("milk", 1599, 10),
    SeedItem::new("cheese", 1295, 80),
    SeedItem::new("deli sandwich", 8999, 3),
    SeedItem::new("bread", 599, 14),
    SeedItem::new("chicken nuggets", 6969, 2),
    SeedItem::new("4 gal soda", 42069, 8),
    SeedItem::new("kids meal", 299, 429),
    SeedItem::new("lettuce", 679, 23),
];
