use axum::extract::rejection::JsonRejection;
use axum::http::StatusCode;
use axum::response::IntoResponse;
use serde_json::json;

use shopledger_core::LedgerError;

pub fn ledger_error_to_response(err: LedgerError) -> axum::response::Response {
    let message = err.to_string();
    match err {
        LedgerError::InvalidArgument(_) => json_error(StatusCode::BAD_REQUEST, "invalid_argument", message),
        LedgerError::UnknownProduct(_) => json_error(StatusCode::NOT_FOUND, "unknown_product", message),
        LedgerError::UnknownSession(_) => json_error(StatusCode::NOT_FOUND, "unknown_session", message),
        LedgerError::NotInCart(_) => json_error(StatusCode::NOT_FOUND, "not_in_cart", message),
        LedgerError::InsufficientQuantity { .. } => {
            json_error(StatusCode::CONFLICT, "insufficient_quantity", message)
        }
        LedgerError::Internal(_) => json_error(StatusCode::INTERNAL_SERVER_ERROR, "internal_error", message),
    }
}

pub fn json_error(
    status: StatusCode,
    code: &'static str,
    message: impl Into<String>,
) -> axum::response::Response {
    (
        status,
        axum::Json(json!({
            "error": code,
            "message": message.into(),
        })),
    )
        .into_response()
}

/// Body that failed to parse as the expected JSON, in the same error shape
/// as ledger errors. Keeps the extractor's status (400, 415 or 422).
pub fn json_rejection(rejection: JsonRejection) -> axum::response::Response {
    json_error(rejection.status(), "invalid_body", rejection.body_text())
}

/// Parse a path segment into a typed id, or a 400 response.
pub fn parse_id<T>(raw: &str) -> Result<T, axum::response::Response>
where
    T: core::str::FromStr<Err = LedgerError>,
{
    raw.parse()
        .map_err(|e: LedgerError| json_error(StatusCode::BAD_REQUEST, "invalid_id", e.to_string()))
}
