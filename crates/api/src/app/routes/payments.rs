use std::sync::Arc;

use axum::{
    Json,
    extract::{Extension, Path},
    http::StatusCode,
    response::IntoResponse,
};
use chrono::Utc;

use cashbook_core::PaymentId;
use cashbook_ledger::{CashbookCommand, RecordPayment};

use crate::app::services::AppServices;
use crate::app::{dto, errors};

pub async fn record_payment(
    Extension(services): Extension<Arc<AppServices>>,
    Path(cashbook_id): Path<String>,
    Json(body): Json<dto::RecordPaymentRequest>,
) -> axum::response::Response {
    let cashbook_id = match errors::parse_cashbook_id(&cashbook_id) {
        Ok(v) => v,
        Err(resp) => return resp,
    };

    let cmd = CashbookCommand::RecordPayment(RecordPayment {
        cashbook_id,
        payment_id: PaymentId::new(),
        amount: body.amount,
        description: body.description,
        payer: body.payer,
        occurred_at: Utc::now(),
    });

    match services.dispatch(cmd) {
        Ok(cashbook) => (StatusCode::OK, Json(dto::cashbook_to_json(&cashbook))).into_response(),
        Err(e) => errors::dispatch_error_to_response(e),
    }
}
