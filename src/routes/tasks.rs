use std::sync::Arc;

use axum::extract::rejection::QueryRejection;
use axum::extract::{Query, State};
use axum::routing::get;
use axum::{Json, Router};

use crate::entities::task::TaskSummary;
use crate::middleware::ctx::Ctx;
use crate::middleware::error::{AppError, CtxResult};
use crate::middleware::mw_ctx::{CtxState, MAX_CATALOG_LIMIT};
use crate::middleware::utils::extractor_utils::LimitParams;
use crate::services::catalog_service::CatalogService;

pub fn routes() -> Router<Arc<CtxState>> {
    Router::new().route("/api/tasks", get(list_active_tasks))
}

async fn list_active_tasks(
    ctx: Ctx,
    State(ctx_state): State<Arc<CtxState>>,
    params: Result<Query<LimitParams>, QueryRejection>,
) -> CtxResult<Json<Vec<TaskSummary>>> {
    let Query(params) = params.map_err(|rejection| {
        ctx.to_ctx_error(AppError::Validation {
            description: rejection.body_text(),
        })
    })?;
    let limit = params
        .limit
        .unwrap_or(ctx_state.catalog_limit)
        .min(MAX_CATALOG_LIMIT);
    let tasks = CatalogService::new(&ctx_state.db.tasks, ctx_state.reward_split, &ctx)
        .list_active(limit)
        .await?;
    Ok(Json(tasks))
}
