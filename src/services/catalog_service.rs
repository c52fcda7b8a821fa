use crate::entities::claim::RewardSplit;
use crate::entities::task::TaskSummary;
use crate::interfaces::repositories::task_ifce::TaskRepositoryInterface;
use crate::middleware::ctx::Ctx;
use crate::middleware::error::{AppError, CtxResult};

pub struct CatalogService<'a, T>
where
    T: TaskRepositoryInterface,
{
    tasks_repository: &'a T,
    split: RewardSplit,
    ctx: &'a Ctx,
}

impl<'a, T> CatalogService<'a, T>
where
    T: TaskRepositoryInterface,
{
    pub fn new(tasks_repository: &'a T, split: RewardSplit, ctx: &'a Ctx) -> Self {
        Self {
            tasks_repository,
            split,
            ctx,
        }
    }

    /// Newest active tasks first, each priced at the user's share.
    pub async fn list_active(&self, limit: usize) -> CtxResult<Vec<TaskSummary>> {
        let tasks = self
            .tasks_repository
            .list_active(limit)
            .await
            .map_err(|e| self.ctx.to_ctx_error(AppError::from(e)))?;

        Ok(tasks
            .into_iter()
            .map(|task| TaskSummary {
                id: task.id,
                title: task.title,
                reward: self.split.user_share(task.full_price),
                duration_seconds: task.duration_seconds,
                link: task.link,
            })
            .collect())
    }
}
