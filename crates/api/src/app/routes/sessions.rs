use std::sync::Arc;

use axum::{
    Json, Router,
    extract::{Extension, Path, rejection::JsonRejection},
    http::StatusCode,
    response::IntoResponse,
    routing::{get, post},
};

use shopledger_core::CartId;
use shopledger_inventory::StockContainer;
use shopledger_store::StoreManager;

use crate::app::{dto, errors};

pub fn router() -> Router {
    Router::new()
        .route("/", get(list_sessions).post(open_session))
        .route("/:id", axum::routing::delete(end_session))
        .route("/:id/cart", get(get_cart))
        .route("/:id/reserve", post(reserve))
        .route("/:id/release", post(release))
        .route("/:id/checkout", post(checkout))
}

pub async fn open_session(
    Extension(store): Extension<Arc<StoreManager>>,
    body: Result<Json<dto::OpenSessionRequest>, JsonRejection>,
) -> axum::response::Response {
    // The body is optional; only a body that is present and malformed is an error.
    let owner = match body {
        Ok(Json(b)) => b.owner.unwrap_or_default(),
        Err(JsonRejection::MissingJsonContentType(_)) => String::new(),
        Err(rejection) => return errors::json_rejection(rejection),
    };

    match store.open_session(owner) {
        Ok(cart) => (
            StatusCode::CREATED,
            Json(serde_json::json!({ "cart_id": cart.id_typed().to_string() })),
        )
            .into_response(),
        Err(e) => errors::ledger_error_to_response(e),
    }
}

pub async fn list_sessions(Extension(store): Extension<Arc<StoreManager>>) -> axum::response::Response {
    Json(store.sessions()).into_response()
}

pub async fn get_cart(
    Extension(store): Extension<Arc<StoreManager>>,
    Path(id): Path<String>,
) -> axum::response::Response {
    let cart_id: CartId = match errors::parse_id(&id) {
        Ok(v) => v,
        Err(resp) => return resp,
    };

    let cart = match store.session(&cart_id) {
        Ok(c) => c,
        Err(e) => return errors::ledger_error_to_response(e),
    };
    let total = match cart.total() {
        Ok(t) => t,
        Err(e) => return errors::ledger_error_to_response(e),
    };

    Json(dto::CartResponse {
        cart_id,
        owner: cart.owner().to_string(),
        entries: cart.list_entries(),
        total,
    })
    .into_response()
}

pub async fn reserve(
    Extension(store): Extension<Arc<StoreManager>>,
    Path(id): Path<String>,
    body: Result<Json<dto::TransferRequest>, JsonRejection>,
) -> axum::response::Response {
    let Json(body) = match body {
        Ok(v) => v,
        Err(rejection) => return errors::json_rejection(rejection),
    };
    let cart_id: CartId = match errors::parse_id(&id) {
        Ok(v) => v,
        Err(resp) => return resp,
    };

    match store.reserve(&cart_id, &body.product_id, body.units) {
        Ok(()) => StatusCode::NO_CONTENT.into_response(),
        Err(e) => errors::ledger_error_to_response(e),
    }
}

pub async fn release(
    Extension(store): Extension<Arc<StoreManager>>,
    Path(id): Path<String>,
    body: Result<Json<dto::TransferRequest>, JsonRejection>,
) -> axum::response::Response {
    let Json(body) = match body {
        Ok(v) => v,
        Err(rejection) => return errors::json_rejection(rejection),
    };
    let cart_id: CartId = match errors::parse_id(&id) {
        Ok(v) => v,
        Err(resp) => return resp,
    };

    match store.release(&cart_id, &body.product_id, body.units) {
        Ok(()) => StatusCode::NO_CONTENT.into_response(),
        Err(e) => errors::ledger_error_to_response(e),
    }
}

pub async fn checkout(
    Extension(store): Extension<Arc<StoreManager>>,
    Path(id): Path<String>,
) -> axum::response::Response {
    let cart_id: CartId = match errors::parse_id(&id) {
        Ok(v) => v,
        Err(resp) => return resp,
    };

    match store.checkout_session(&cart_id) {
        Ok(receipt) => Json(receipt).into_response(),
        Err(e) => errors::ledger_error_to_response(e),
    }
}

pub async fn end_session(
    Extension(store): Extension<Arc<StoreManager>>,
    Path(id): Path<String>,
) -> axum::response::Response {
    let cart_id: CartId = match errors::parse_id(&id) {
        Ok(v) => v,
        Err(resp) => return resp,
    };

    match store.end_session(&cart_id) {
        Ok(units) => Json(serde_json::json!({
            "cart_id": cart_id.to_string(),
            "units_returned": units,
        }))
        .into_response(),
        Err(e) => errors::ledger_error_to_response(e),
    }
}
