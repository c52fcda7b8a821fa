use std::sync::Arc;

use axum::extract::{Path, State};
use axum::routing::{get, post};
use axum::{Json, Router};
use serde::{Deserialize, Serialize};

use crate::entities::user_balance::{UserBalance, UserId};
use crate::middleware::ctx::Ctx;
use crate::middleware::error::{AppError, CtxResult};
use crate::middleware::mw_ctx::CtxState;
use crate::middleware::utils::extractor_utils::JsonOrFormValidated;
use crate::services::user_service::{RegisterInput, UserService};

pub fn routes() -> Router<Arc<CtxState>> {
    Router::new()
        .route("/api/users/register", post(register_user))
        .route("/api/users/:user_id/balance", get(get_user_balance))
}

#[derive(Debug, Deserialize, Serialize)]
pub struct RegisterResponse {
    pub created: bool,
}

async fn register_user(
    ctx: Ctx,
    State(ctx_state): State<Arc<CtxState>>,
    JsonOrFormValidated(input): JsonOrFormValidated<RegisterInput>,
) -> CtxResult<Json<RegisterResponse>> {
    let created = UserService::new(&ctx_state.db.ledger, &ctx)
        .register(input)
        .await?;
    Ok(Json(RegisterResponse { created }))
}

async fn get_user_balance(
    ctx: Ctx,
    State(ctx_state): State<Arc<CtxState>>,
    Path(user_id): Path<String>,
) -> CtxResult<Json<UserBalance>> {
    let user_id = UserId::new(user_id.as_str()).ok_or_else(|| {
        ctx.to_ctx_error(AppError::Validation {
            description: format!("invalid user id {user_id}"),
        })
    })?;
    let balance = UserService::new(&ctx_state.db.ledger, &ctx)
        .get_balance(&user_id)
        .await?;
    Ok(Json(balance))
}
