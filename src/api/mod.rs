//! HTTP API surface
//!
//! Thin JSON layer over the notary service for surrounding application
//! code: claim submission, public token verification, and the account
//! balance probe. No sessions, no auth - those belong to the outer
//! application.

pub mod routes;

use std::sync::Arc;

use axum::response::{IntoResponse, Response};
use axum::routing::{get, post};
use axum::{Json, Router};
use serde::Serialize;

use crate::service::NotaryService;
use crate::types::NotaryError;

/// Shared handler state
#[derive(Clone)]
pub struct ApiState {
    pub service: Arc<NotaryService>,
}

/// Build the API router
pub fn create_router(service: Arc<NotaryService>) -> Router {
    Router::new()
        .route("/api/claims", post(routes::submit_claim))
        .route("/api/evaluate", post(routes::evaluate))
        .route("/api/verify/:token", get(routes::verify_token))
        .route("/api/balance", get(routes::balance))
        .route("/health", get(routes::health))
        .with_state(ApiState { service })
}

/// JSON error body
#[derive(Debug, Serialize)]
pub struct ErrorBody {
    pub error: String,
}

impl IntoResponse for NotaryError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        let body = ErrorBody {
            error: self.to_string(),
        };
        (status, Json(body)).into_response()
    }
}
