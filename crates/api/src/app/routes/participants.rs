use std::sync::Arc;

use axum::{
    Json,
    extract::{Extension, Path},
    http::StatusCode,
    response::IntoResponse,
};
use chrono::Utc;

use cashbook_ledger::{AddParticipant, CashbookCommand};

use crate::app::services::AppServices;
use crate::app::{dto, errors};

pub async fn list_participants(
    Extension(services): Extension<Arc<AppServices>>,
    Path(cashbook_id): Path<String>,
) -> axum::response::Response {
    let cashbook_id = match errors::parse_cashbook_id(&cashbook_id) {
        Ok(v) => v,
        Err(resp) => return resp,
    };

    match services.cashbook(cashbook_id) {
        Ok(cashbook) => (StatusCode::OK, Json(dto::participants_to_json(&cashbook))).into_response(),
        Err(e) => errors::dispatch_error_to_response(e),
    }
}

pub async fn add_participant(
    Extension(services): Extension<Arc<AppServices>>,
    Path(cashbook_id): Path<String>,
    Json(body): Json<dto::AddParticipantRequest>,
) -> axum::response::Response {
    let cashbook_id = match errors::parse_cashbook_id(&cashbook_id) {
        Ok(v) => v,
        Err(resp) => return resp,
    };

    let cmd = CashbookCommand::AddParticipant(AddParticipant {
        cashbook_id,
        name: body.name,
        occurred_at: Utc::now(),
    });

    match services.dispatch(cmd) {
        Ok(cashbook) => (StatusCode::OK, Json(dto::cashbook_to_json(&cashbook))).into_response(),
        Err(e) => errors::dispatch_error_to_response(e),
    }
}
