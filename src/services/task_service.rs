use std::str::FromStr;

use rust_decimal::Decimal;
use serde::Deserialize;
use tracing::info;
use validator::{Validate, ValidationError};

use crate::entities::task::{NewTask, TaskId};
use crate::interfaces::repositories::task_ifce::TaskRepositoryInterface;
use crate::middleware::ctx::Ctx;
use crate::middleware::error::{AppError, CtxResult};

pub fn validate_price(price: &str) -> Result<(), ValidationError> {
    match Decimal::from_str(price.trim()) {
        Ok(value) if value >= Decimal::ZERO && value.scale() <= 2 => Ok(()),
        _ => Err(ValidationError::new("price")
            .with_message("Price must be a non-negative amount with at most 2 decimals".into())),
    }
}

#[derive(Debug, Deserialize, Validate)]
pub struct TaskInput {
    #[validate(length(min = 1, max = 200, message = "Title must be 1 to 200 characters"))]
    pub title: String,
    #[validate(url(message = "Url is not valid"))]
    pub url: String,
    #[validate(custom(function = validate_price))]
    pub price: String,
    #[validate(range(max = 86400, message = "Seconds must be at most 86400"))]
    pub seconds: u32,
    pub password: String,
}

pub struct TaskService<'a, T>
where
    T: TaskRepositoryInterface,
{
    tasks_repository: &'a T,
    ctx: &'a Ctx,
}

impl<'a, T> TaskService<'a, T>
where
    T: TaskRepositoryInterface,
{
    pub fn new(tasks_repository: &'a T, ctx: &'a Ctx) -> Self {
        Self {
            tasks_repository,
            ctx,
        }
    }

    pub async fn create(&self, input: TaskInput) -> CtxResult<TaskId> {
        let full_price = Decimal::from_str(input.price.trim()).map_err(|_| {
            self.ctx.to_ctx_error(AppError::Validation {
                description: format!("invalid price {}", input.price),
            })
        })?;

        let task_id = self
            .tasks_repository
            .create_task(NewTask {
                title: input.title.trim().to_string(),
                link: input.url.trim().to_string(),
                full_price,
                duration_seconds: input.seconds,
            })
            .await
            .map_err(|e| self.ctx.to_ctx_error(e.into()))?;

        info!("task created id={task_id} price={full_price}");
        Ok(task_id)
    }
}
