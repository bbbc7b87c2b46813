use std::sync::Arc;

use axum::{
    Json,
    extract::{Extension, Path},
    http::StatusCode,
    response::IntoResponse,
};

use crate::app::services::AppServices;
use crate::app::{dto, errors};

pub async fn get_checkout(
    Extension(services): Extension<Arc<AppServices>>,
    Path(cashbook_id): Path<String>,
) -> axum::response::Response {
    let cashbook_id = match errors::parse_cashbook_id(&cashbook_id) {
        Ok(v) => v,
        Err(resp) => return resp,
    };

    let cashbook = match services.cashbook(cashbook_id) {
        Ok(c) => c,
        Err(e) => return errors::dispatch_error_to_response(e),
    };

    match cashbook.checkout() {
        Ok(result) => (StatusCode::OK, Json(dto::checkout_to_json(&result))).into_response(),
        Err(e) => {
            tracing::warn!(%cashbook_id, error = %e, "checkout rejected");
            errors::checkout_error_to_response(e)
        }
    }
}
