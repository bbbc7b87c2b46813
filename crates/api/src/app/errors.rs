use axum::http::StatusCode;
use axum::response::IntoResponse;
use serde_json::json;

use cashbook_checkout::CheckoutError;
use cashbook_core::CashbookId;
use cashbook_infra::DispatchError;

pub fn dispatch_error_to_response(err: DispatchError) -> axum::response::Response {
    match err {
        DispatchError::Conflict(msg) => json_error(StatusCode::CONFLICT, "conflict", msg),
        DispatchError::Validation(msg) => json_error(StatusCode::BAD_REQUEST, "validation_error", msg),
        DispatchError::InvariantViolation(msg) => {
            json_error(StatusCode::UNPROCESSABLE_ENTITY, "invariant_violation", msg)
        }
        DispatchError::NotFound => json_error(StatusCode::NOT_FOUND, "not_found", "cashbook not found"),
        DispatchError::Deserialize(msg) => {
            tracing::error!(error = %msg, "stored event could not be read");
            json_error(StatusCode::INTERNAL_SERVER_ERROR, "deserialize_error", msg)
        }
        DispatchError::Store(e) => {
            tracing::error!(error = %e, "event store failure");
            json_error(StatusCode::INTERNAL_SERVER_ERROR, "store_error", e.to_string())
        }
    }
}

pub fn checkout_error_to_response(err: CheckoutError) -> axum::response::Response {
    let code = match &err {
        e if e.is_invalid_input() => "invalid_input",
        CheckoutError::UnknownPayer { .. } => "unknown_payer",
        _ => "invalid_amount",
    };
    json_error(StatusCode::UNPROCESSABLE_ENTITY, code, err.to_string())
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

pub fn parse_cashbook_id(raw: &str) -> Result<CashbookId, axum::response::Response> {
    raw.parse()
        .map_err(|_| json_error(StatusCode::BAD_REQUEST, "invalid_id", "invalid cashbook id"))
}
