use std::sync::Arc;

use axum::extract::rejection::JsonRejection;
use axum::extract::State;
use axum::routing::post;
use axum::{Json, Router};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::entities::user_balance::UserId;
use crate::middleware::ctx::Ctx;
use crate::middleware::error::{AppError, CtxError, CtxResult};
use crate::middleware::mw_ctx::CtxState;
use crate::services::claim_service::ClaimService;

pub fn routes() -> Router<Arc<CtxState>> {
    Router::new().route("/api/claim", post(claim_reward))
}

#[derive(Debug, Deserialize, Serialize)]
pub struct ClaimInput {
    pub user_id: UserId,
    pub task_id: String,
}

#[derive(Debug, Deserialize, Serialize)]
pub struct ClaimResponse {
    pub status: String,
    /// Amount credited by this claim.
    pub new_balance: Decimal,
    pub message: String,
}

async fn claim_reward(
    ctx: Ctx,
    State(ctx_state): State<Arc<CtxState>>,
    payload: Result<Json<ClaimInput>, JsonRejection>,
) -> CtxResult<Json<ClaimResponse>> {
    let Json(input) = payload.map_err(|rejection| {
        ctx.to_ctx_error(AppError::Validation {
            description: rejection.body_text(),
        })
    })?;

    // runs detached so a dropped connection can not stop the ledger writes half way
    let state = ctx_state.clone();
    let receipt = tokio::spawn(async move {
        ClaimService::new(
            &state.db.tasks,
            &state.db.ledger,
            state.reward_split,
            state.store_timeout,
        )
        .claim(&input.task_id, &input.user_id)
        .await
    })
    .await
    .map_err(|join_err| {
        ctx.to_ctx_error(AppError::Internal {
            source: join_err.to_string(),
        })
    })?
    .map_err(CtxError::from(&ctx))?;

    Ok(Json(ClaimResponse {
        status: "success".to_string(),
        new_balance: receipt.credited,
        message: format!("Reward of {} credited for task {}", receipt.credited, receipt.task_id),
    }))
}
