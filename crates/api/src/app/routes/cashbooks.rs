use std::sync::Arc;

use axum::{
    Json,
    extract::{Extension, Path},
    http::StatusCode,
    response::IntoResponse,
};
use chrono::Utc;

use cashbook_core::CashbookId;
use cashbook_ledger::{CashbookCommand, CreateCashbook};

use crate::app::services::AppServices;
use crate::app::{dto, errors};

pub async fn create_cashbook(
    Extension(services): Extension<Arc<AppServices>>,
    Json(body): Json<dto::CreateCashbookRequest>,
) -> axum::response::Response {
    let cashbook_id = CashbookId::new();
    let cmd = CashbookCommand::CreateCashbook(CreateCashbook {
        cashbook_id,
        trip_name: body.trip_name,
        occurred_at: Utc::now(),
    });

    match services.dispatch(cmd) {
        Ok(cashbook) => (StatusCode::CREATED, Json(dto::cashbook_to_json(&cashbook))).into_response(),
        Err(e) => errors::dispatch_error_to_response(e),
    }
}

pub async fn get_cashbook(
    Extension(services): Extension<Arc<AppServices>>,
    Path(cashbook_id): Path<String>,
) -> axum::response::Response {
    let cashbook_id = match errors::parse_cashbook_id(&cashbook_id) {
        Ok(v) => v,
        Err(resp) => return resp,
    };

    match services.cashbook(cashbook_id) {
        Ok(cashbook) => (StatusCode::OK, Json(dto::cashbook_to_json(&cashbook))).into_response(),
        Err(e) => errors::dispatch_error_to_response(e),
    }
}

pub async fn get_costs(
    Extension(services): Extension<Arc<AppServices>>,
    Path(cashbook_id): Path<String>,
) -> axum::response::Response {
    let cashbook_id = match errors::parse_cashbook_id(&cashbook_id) {
        Ok(v) => v,
        Err(resp) => return resp,
    };

    match services.cashbook(cashbook_id) {
        Ok(cashbook) => (StatusCode::OK, Json(dto::costs_to_json(&cashbook))).into_response(),
        Err(e) => errors::dispatch_error_to_response(e),
    }
}
