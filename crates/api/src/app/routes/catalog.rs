use std::sync::Arc;

use axum::{
    Json, Router,
    extract::{Extension, Path, rejection::JsonRejection},
    http::StatusCode,
    response::IntoResponse,
    routing::{get, post},
};

use shopledger_core::ProductId;
use shopledger_inventory::{Catalog, StockContainer};
use shopledger_store::StoreManager;

use crate::app::{dto, errors};

pub fn router() -> Router {
    Router::new()
        .route("/", get(list_catalog).post(add_product))
        .route("/:id", get(get_product))
        .route("/:id/restock", post(restock))
}

pub async fn list_catalog(Extension(store): Extension<Arc<StoreManager>>) -> axum::response::Response {
    Json(store.list()).into_response()
}

pub async fn add_product(
    Extension(store): Extension<Arc<StoreManager>>,
    body: Result<Json<dto::AddProductRequest>, JsonRejection>,
) -> axum::response::Response {
    let Json(body) = match body {
        Ok(v) => v,
        Err(rejection) => return errors::json_rejection(rejection),
    };
    match store.add_product(body.into()) {
        Ok(id) => (
            StatusCode::CREATED,
            Json(serde_json::json!({ "id": id.to_string() })),
        )
            .into_response(),
        Err(e) => errors::ledger_error_to_response(e),
    }
}

pub async fn get_product(
    Extension(store): Extension<Arc<StoreManager>>,
    Path(id): Path<String>,
) -> axum::response::Response {
    let id: ProductId = match errors::parse_id(&id) {
        Ok(v) => v,
        Err(resp) => return resp,
    };

    let product = match store.lookup(&id) {
        Ok(p) => p,
        Err(e) => return errors::ledger_error_to_response(e),
    };
    let quantity = match store.inventory().quantity(&id) {
        Ok(q) => q,
        Err(e) => return errors::ledger_error_to_response(e),
    };

    Json(serde_json::json!({
        "product": product,
        "quantity": quantity,
    }))
    .into_response()
}

pub async fn restock(
    Extension(store): Extension<Arc<StoreManager>>,
    Path(id): Path<String>,
    body: Result<Json<dto::RestockRequest>, JsonRejection>,
) -> axum::response::Response {
    let Json(body) = match body {
        Ok(v) => v,
        Err(rejection) => return errors::json_rejection(rejection),
    };
    let id: ProductId = match errors::parse_id(&id) {
        Ok(v) => v,
        Err(resp) => return resp,
    };

    match store.restock(&id, body.units) {
        Ok(quantity) => Json(serde_json::json!({
            "id": id.to_string(),
            "quantity": quantity,
        }))
        .into_response(),
        Err(e) => errors::ledger_error_to_response(e),
    }
}
