pub mod cli;
pub mod config;
pub mod directory;
pub mod domain;
pub mod error;
pub mod handlers;
pub mod ledger;
pub mod middleware;
pub mod parser;
pub mod random;
pub mod remote;
pub mod resolver;
pub mod services;
pub mod validation;

use axum::{
    middleware::from_fn,
    routing::{get, post},
    Router,
};
use std::sync::Arc;
use std::time::Duration;
use tower_http::cors::CorsLayer;

use crate::directory::MerchantDirectory;
use crate::ledger::TransactionLedger;
use crate::resolver::TransactionResolver;

#[derive(Clone)]
pub struct AppState {
    pub ledger: TransactionLedger,
    pub directory: Arc<MerchantDirectory>,
    pub resolver: TransactionResolver,
    pub processing_delay: Duration,
}

pub fn create_app(state: AppState) -> Router {
    Router::new()
        .route("/health", get(handlers::health))
        .route("/generate-qr", post(handlers::qr::generate_qr))
        .route("/scan-qr", post(handlers::qr::scan_qr))
        .route("/validate-upi", post(handlers::qr::validate_upi))
        .route("/pay", post(handlers::payments::pay))
        .route("/transaction/:id", get(handlers::payments::get_transaction))
        .route("/transactions", get(handlers::payments::list_transactions))
        .layer(from_fn(
            middleware::request_logger::request_logger_middleware,
        ))
        .layer(CorsLayer::permissive())
        .with_state(state)
}
