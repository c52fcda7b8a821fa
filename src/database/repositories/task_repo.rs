use std::sync::Arc;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::Deserialize;
use surrealdb::sql::Thing;

use crate::database::client::Db;
use crate::database::surrdb_utils::take_error_messages;
use crate::database::table_names::TASK_TABLE_NAME;
use crate::entities::money::{from_cents, round_money, to_cents};
use crate::entities::task::{NewTask, Task, TaskId};
use crate::interfaces::repositories::task_ifce::{TaskRepositoryInterface, TaskStoreError};
use crate::middleware::error::AppError;

#[derive(Debug, Deserialize)]
struct TaskRecord {
    id: Thing,
    title: String,
    link: String,
    price: i64,
    seconds: i64,
    active: bool,
    created_at: DateTime<Utc>,
}

impl TryFrom<TaskRecord> for Task {
    type Error = TaskStoreError;

    fn try_from(record: TaskRecord) -> Result<Self, Self::Error> {
        let raw_id = record.id.id.to_raw();
        let id = raw_id
            .parse::<TaskId>()
            .map_err(|_| TaskStoreError::InvalidData(format!("stored task id {raw_id}")))?;
        let duration_seconds = u32::try_from(record.seconds)
            .map_err(|_| TaskStoreError::InvalidData(format!("task {id} duration")))?;
        Ok(Task {
            id,
            title: record.title,
            link: record.link,
            full_price: from_cents(record.price),
            duration_seconds,
            active: record.active,
            created_at: record.created_at,
        })
    }
}

fn store_error(err: surrealdb::Error) -> TaskStoreError {
    TaskStoreError::Store(err.to_string())
}

#[derive(Debug)]
pub struct TaskRepository {
    client: Arc<Db>,
}

impl TaskRepository {
    pub fn new(client: Arc<Db>) -> Self {
        Self { client }
    }

    pub(in crate::database) async fn mutate_db(&self) -> Result<(), AppError> {
        let sql = format!("
    DEFINE TABLE IF NOT EXISTS {TASK_TABLE_NAME} SCHEMAFULL;
    DEFINE FIELD IF NOT EXISTS title ON TABLE {TASK_TABLE_NAME} TYPE string;
    DEFINE FIELD IF NOT EXISTS link ON TABLE {TASK_TABLE_NAME} TYPE string;
    DEFINE FIELD IF NOT EXISTS price ON TABLE {TASK_TABLE_NAME} TYPE int ASSERT $value >= 0;
    DEFINE FIELD IF NOT EXISTS seconds ON TABLE {TASK_TABLE_NAME} TYPE int ASSERT $value >= 0;
    DEFINE FIELD IF NOT EXISTS active ON TABLE {TASK_TABLE_NAME} TYPE bool DEFAULT true;
    DEFINE FIELD IF NOT EXISTS created_at ON TABLE {TASK_TABLE_NAME} TYPE datetime DEFAULT time::now() VALUE $before OR time::now();
    DEFINE INDEX IF NOT EXISTS active_created_idx ON TABLE {TASK_TABLE_NAME} FIELDS active, created_at;
    ");
        let mutation = self.client.query(sql).await?;
        mutation.check()?;
        Ok(())
    }
}

#[async_trait]
impl TaskRepositoryInterface for TaskRepository {
    async fn get_task(&self, task_id: &TaskId) -> Result<Option<Task>, TaskStoreError> {
        let record: Option<TaskRecord> = self
            .client
            .select((TASK_TABLE_NAME, task_id.to_string()))
            .await
            .map_err(store_error)?;
        record.map(Task::try_from).transpose()
    }

    async fn create_task(&self, task: NewTask) -> Result<TaskId, TaskStoreError> {
        if round_money(task.full_price) != task.full_price {
            return Err(TaskStoreError::InvalidData(format!(
                "price {} has more than 2 decimals",
                task.full_price
            )));
        }
        let price = to_cents(task.full_price)
            .filter(|cents| *cents >= 0)
            .ok_or_else(|| TaskStoreError::InvalidData(format!("price {}", task.full_price)))?;
        let id = TaskId::generate();

        let qry = format!(
            "CREATE type::thing('{TASK_TABLE_NAME}', $id) SET
                title = $title,
                link = $link,
                price = $price,
                seconds = $seconds,
                active = true
            RETURN NONE;"
        );
        let mut res = self
            .client
            .query(qry)
            .bind(("id", id.to_string()))
            .bind(("title", task.title))
            .bind(("link", task.link))
            .bind(("price", price))
            .bind(("seconds", i64::from(task.duration_seconds)))
            .await
            .map_err(store_error)?;

        let errors = take_error_messages(&mut res);
        if !errors.is_empty() {
            return Err(TaskStoreError::Store(errors.join("; ")));
        }
        Ok(id)
    }

    async fn list_active(&self, limit: usize) -> Result<Vec<Task>, TaskStoreError> {
        if limit == 0 {
            return Ok(vec![]);
        }
        let qry = format!(
            "SELECT * FROM {TASK_TABLE_NAME} WHERE active = true ORDER BY created_at DESC LIMIT $limit;"
        );
        let mut res = self
            .client
            .query(qry)
            .bind(("limit", limit as i64))
            .await
            .map_err(store_error)?;
        let records: Vec<TaskRecord> = res.take(0).map_err(store_error)?;
        records.into_iter().map(Task::try_from).collect()
    }
}
