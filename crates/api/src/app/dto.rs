use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use shopledger_core::{CartId, ProductId};
use shopledger_inventory::StockEntry;
use shopledger_products::NewProduct;

// -------------------------
// Request DTOs
// -------------------------

#[derive(Debug, Deserialize)]
pub struct AddProductRequest {
    pub name: String,
    pub unit_price: Decimal,
    pub initial_stock: u32,
    pub image_ref: Option<String>,
    pub description: Option<String>,
}

impl From<AddProductRequest> for NewProduct {
    fn from(body: AddProductRequest) -> Self {
        NewProduct {
            name: body.name,
            unit_price: body.unit_price,
            initial_stock: body.initial_stock,
            image_ref: body.image_ref,
            description: body.description,
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct RestockRequest {
    pub units: u32,
}

#[derive(Debug, Default, Deserialize)]
pub struct OpenSessionRequest {
    #[serde(default)]
    pub owner: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct TransferRequest {
    pub product_id: ProductId,
    pub units: u32,
}

// -------------------------
// Response DTOs
// -------------------------

#[derive(Debug, Serialize)]
pub struct CartResponse {
    pub cart_id: CartId,
    pub owner: String,
    pub entries: Vec<StockEntry>,
    pub total: Decimal,
}
