//! HTTP API application wiring (Axum router + service wiring).
//!
//! - `services.rs`: infrastructure wiring (event store, dispatcher)
//! - `routes/`: HTTP routes + handlers (one file per resource)
//! - `dto.rs`: request DTOs and JSON mapping helpers
//! - `errors.rs`: consistent error responses

use std::sync::Arc;

use axum::{Extension, Router};
use tower::ServiceBuilder;

use crate::config::ApiConfig;
use crate::middleware;

pub mod dto;
pub mod errors;
pub mod routes;
pub mod services;

/// Build the full HTTP router (public entrypoint used by `main.rs`).
pub fn build_app(config: &ApiConfig) -> Router {
    build_app_with(config, Arc::new(services::AppServices::in_memory()))
}

/// Like [`build_app`], with caller-provided services (tests share a store this way).
pub fn build_app_with(config: &ApiConfig, services: Arc<services::AppServices>) -> Router {
    let routes = routes::router().layer(Extension(services));

    let app = if config.base_path == "/" {
        routes
    } else {
        Router::new().nest(&config.base_path, routes)
    };

    app.layer(ServiceBuilder::new().layer(axum::middleware::from_fn(middleware::profile_request)))
}
