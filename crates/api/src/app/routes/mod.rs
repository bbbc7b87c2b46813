use axum::{
    Router,
    routing::{get, post},
};

pub mod cashbooks;
pub mod checkout;
pub mod participants;
pub mod payments;
pub mod system;

/// Router for every endpoint, relative to the configured base path.
pub fn router() -> Router {
    Router::new()
        .route("/health", get(system::health))
        .route("/cashbooks", post(cashbooks::create_cashbook))
        .route("/cashbooks/:cashbook_id", get(cashbooks::get_cashbook))
        .route("/cashbooks/:cashbook_id/costs", get(cashbooks::get_costs))
        .route(
            "/cashbooks/:cashbook_id/participants",
            get(participants::list_participants).post(participants::add_participant),
        )
        .route("/cashbooks/:cashbook_id/payments", post(payments::record_payment))
        .route("/cashbooks/:cashbook_id/checkout", get(checkout::get_checkout))
}
