use std::sync::Arc;

use axum::extract::{Query, State};
use axum::routing::{get, post};
use axum::{Json, Router};
use serde::{Deserialize, Serialize};

use crate::entities::task::TaskId;
use crate::entities::user_balance::SystemWallet;
use crate::middleware::ctx::Ctx;
use crate::middleware::error::{AppError, CtxResult};
use crate::middleware::mw_ctx::CtxState;
use crate::middleware::utils::extractor_utils::JsonOrFormValidated;
use crate::services::task_service::{TaskInput, TaskService};
use crate::services::user_service::UserService;

pub fn routes() -> Router<Arc<CtxState>> {
    Router::new()
        .route("/admin/tasks", post(create_task))
        .route("/admin/wallet", get(get_system_wallet))
}

#[derive(Debug, Deserialize, Serialize)]
pub struct CreatedTaskResponse {
    pub id: TaskId,
}

#[derive(Debug, Deserialize)]
pub struct AdminQuery {
    #[serde(default)]
    pub password: String,
}

fn check_password(ctx: &Ctx, ctx_state: &CtxState, password: &str) -> CtxResult<()> {
    if password.is_empty() || password != ctx_state.admin_password {
        return Err(ctx.to_ctx_error(AppError::AuthorizationFail));
    }
    Ok(())
}

async fn create_task(
    ctx: Ctx,
    State(ctx_state): State<Arc<CtxState>>,
    JsonOrFormValidated(input): JsonOrFormValidated<TaskInput>,
) -> CtxResult<Json<CreatedTaskResponse>> {
    check_password(&ctx, &ctx_state, &input.password)?;
    let id = TaskService::new(&ctx_state.db.tasks, &ctx)
        .create(input)
        .await?;
    Ok(Json(CreatedTaskResponse { id }))
}

async fn get_system_wallet(
    ctx: Ctx,
    State(ctx_state): State<Arc<CtxState>>,
    Query(query): Query<AdminQuery>,
) -> CtxResult<Json<SystemWallet>> {
    check_password(&ctx, &ctx_state, &query.password)?;
    let wallet = UserService::new(&ctx_state.db.ledger, &ctx)
        .system_wallet()
        .await?;
    Ok(Json(wallet))
}
