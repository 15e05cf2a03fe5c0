use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use shopledger_core::{CartId, ProductId};
use shopledger_inventory::StockEntry;
use shopledger_products::Price;

/// One sold line.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReceiptLine {
    pub product_id: ProductId,
    pub name: String,
    pub unit_price: Price,
    pub quantity: u32,
    pub line_total: Decimal,
}

/// Result of a checkout. Immutable record of what was sold.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Receipt {
    pub cart_id: CartId,
    pub lines: Vec<ReceiptLine>,
    pub total: Decimal,
    pub completed_at: DateTime<Utc>,
}

impl Receipt {
    pub fn from_entries(cart_id: CartId, entries: &[StockEntry], completed_at: DateTime<Utc>) -> Self {
        let lines: Vec<ReceiptLine> = entries
            .iter()
            .map(|e| {
                let unit_price = e.product.unit_price();
                ReceiptLine {
                    product_id: e.product_id(),
                    name: e.product.name().to_string(),
                    unit_price,
                    quantity: e.quantity,
                    line_total: unit_price.line_total(e.quantity),
                }
            })
            .collect();
        let total = lines.iter().map(|l| l.line_total).sum();

        Self {
            cart_id,
            lines,
            total,
            completed_at,
        }
    }

    pub fn units(&self) -> u64 {
        self.lines.iter().map(|l| u64::from(l.quantity)).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }
}
