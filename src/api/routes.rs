//! API route handlers

use axum::extract::{Path, State};
use axum::response::{IntoResponse, Json};

use super::ApiState;
use crate::chain::units::format_native;
use crate::ledger::Claim;
use crate::service::{ClaimDraft, ClaimReceipt, EligibilityVerdict};
use crate::types::NotaryError;

/// POST /api/claims - run the full notarization pipeline
pub async fn submit_claim(
    State(state): State<ApiState>,
    Json(draft): Json<ClaimDraft>,
) -> Result<Json<ClaimReceipt>, NotaryError> {
    let receipt = state.service.submit_claim(&draft).await?;
    Ok(Json(receipt))
}

/// POST /api/evaluate - eligibility decision only, nothing notarized
pub async fn evaluate(
    State(state): State<ApiState>,
    Json(draft): Json<ClaimDraft>,
) -> Json<EligibilityVerdict> {
    Json(state.service.evaluate(&draft))
}

/// GET /api/verify/:token - public token re-verification
#[derive(serde::Serialize)]
pub struct VerifyResponse {
    pub valid: bool,
    pub claim: Option<Claim>,
}

pub async fn verify_token(
    State(state): State<ApiState>,
    Path(token): Path<String>,
) -> Result<Json<VerifyResponse>, NotaryError> {
    let claim = state.service.verify_token(&token)?;
    Ok(Json(VerifyResponse {
        valid: claim.is_some(),
        claim,
    }))
}

/// GET /api/balance - notarization account balance
#[derive(serde::Serialize)]
pub struct BalanceResponse {
    pub address: String,
    /// Balance in base units, as a decimal string
    pub base: String,
    /// Balance formatted in native units
    pub native: String,
}

pub async fn balance(
    State(state): State<ApiState>,
) -> Result<Json<BalanceResponse>, NotaryError> {
    let base = state.service.balance().await?;
    Ok(Json(BalanceResponse {
        address: state.service.address().to_string(),
        base: base.to_string(),
        native: format_native(base),
    }))
}

/// GET /health
pub async fn health() -> impl IntoResponse {
    "OK"
}
