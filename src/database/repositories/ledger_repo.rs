use std::sync::Arc;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::Deserialize;
use tracing::warn;

use crate::database::client::Db;
use crate::database::surrdb_utils::{
    is_record_exists, is_retryable_conflict, is_unique_violation, take_error_messages,
};
use crate::database::table_names::{
    SYSTEM_WALLET_ID, SYSTEM_WALLET_TABLE_NAME, TASK_CLAIM_TABLE_NAME, USER_BALANCE_TABLE_NAME,
};
use crate::entities::claim::ClaimRecord;
use crate::entities::money::{from_cents, to_cents};
use crate::entities::task::TaskId;
use crate::entities::user_balance::{SystemWallet, UserBalance, UserId};
use crate::interfaces::repositories::ledger_ifce::{LedgerError, LedgerRepositoryInterface};
use crate::middleware::error::AppError;

pub const THROW_ALREADY_CLAIMED: &str = "Task already claimed";
const TX_CONFLICT_ATTEMPTS: u32 = 3;

#[derive(Debug, Deserialize)]
struct UserBalanceRecord {
    name: Option<String>,
    balance: i64,
    completed_tasks: i64,
    joined_at: DateTime<Utc>,
}

#[derive(Debug, Deserialize)]
struct SystemWalletRecord {
    balance: i64,
}

fn store_error(err: surrealdb::Error) -> LedgerError {
    LedgerError::Store(err.to_string())
}

fn amount_cents(amount: Decimal) -> Result<i64, LedgerError> {
    to_cents(amount)
        .filter(|cents| *cents >= 0)
        .ok_or(LedgerError::InvalidAmount(amount))
}

#[derive(Debug)]
pub struct LedgerRepository {
    client: Arc<Db>,
}

impl LedgerRepository {
    pub fn new(client: Arc<Db>) -> Self {
        Self { client }
    }

    pub(in crate::database) async fn mutate_db(&self) -> Result<(), AppError> {
        let sql = format!("
    DEFINE TABLE IF NOT EXISTS {USER_BALANCE_TABLE_NAME} SCHEMAFULL;
    DEFINE FIELD IF NOT EXISTS name ON TABLE {USER_BALANCE_TABLE_NAME} TYPE option<string>;
    DEFINE FIELD IF NOT EXISTS balance ON TABLE {USER_BALANCE_TABLE_NAME} TYPE int DEFAULT 0 ASSERT $value >= 0;
    DEFINE FIELD IF NOT EXISTS completed_tasks ON TABLE {USER_BALANCE_TABLE_NAME} TYPE int DEFAULT 0 ASSERT $value >= 0;
    DEFINE FIELD IF NOT EXISTS joined_at ON TABLE {USER_BALANCE_TABLE_NAME} TYPE datetime DEFAULT time::now() VALUE $before OR time::now();

    DEFINE TABLE IF NOT EXISTS {SYSTEM_WALLET_TABLE_NAME} SCHEMAFULL;
    DEFINE FIELD IF NOT EXISTS balance ON TABLE {SYSTEM_WALLET_TABLE_NAME} TYPE int DEFAULT 0 ASSERT $value >= 0;
    DEFINE FIELD IF NOT EXISTS r_updated ON TABLE {SYSTEM_WALLET_TABLE_NAME} TYPE option<datetime> DEFAULT time::now() VALUE time::now();

    DEFINE TABLE IF NOT EXISTS {TASK_CLAIM_TABLE_NAME} SCHEMAFULL;
    DEFINE FIELD IF NOT EXISTS user_id ON TABLE {TASK_CLAIM_TABLE_NAME} TYPE string;
    DEFINE FIELD IF NOT EXISTS task_id ON TABLE {TASK_CLAIM_TABLE_NAME} TYPE string;
    DEFINE FIELD IF NOT EXISTS user_share ON TABLE {TASK_CLAIM_TABLE_NAME} TYPE int;
    DEFINE FIELD IF NOT EXISTS system_share ON TABLE {TASK_CLAIM_TABLE_NAME} TYPE int;
    DEFINE FIELD IF NOT EXISTS r_created ON TABLE {TASK_CLAIM_TABLE_NAME} TYPE option<datetime> DEFAULT time::now() VALUE $before OR time::now();
    DEFINE INDEX IF NOT EXISTS user_task_unique_idx ON TABLE {TASK_CLAIM_TABLE_NAME} FIELDS user_id, task_id UNIQUE;
    ");
        let mutation = self.client.query(sql).await?;
        mutation.check()?;
        Ok(())
    }

    async fn run_write(
        &self,
        qry: String,
        bindings: Vec<(&'static str, serde_json::Value)>,
    ) -> Result<Vec<String>, LedgerError> {
        let mut res = bindings
            .into_iter()
            .fold(self.client.query(qry), |query, binding| query.bind(binding))
            .await
            .map_err(store_error)?;
        Ok(take_error_messages(&mut res))
    }

    async fn commit_claim_tx(&self, claim: &ClaimRecord) -> Result<(), LedgerError> {
        let user_share = amount_cents(claim.user_share)?;
        let system_share = amount_cents(claim.system_share)?;
        let qry = format!(
            "BEGIN TRANSACTION;
            LET $existing = (SELECT VALUE id FROM {TASK_CLAIM_TABLE_NAME} WHERE user_id = $user_id AND task_id = $task_id);
            IF array::len($existing) > 0 {{
                THROW \"{THROW_ALREADY_CLAIMED}\";
            }};
            CREATE {TASK_CLAIM_TABLE_NAME} SET
                user_id = $user_id,
                task_id = $task_id,
                user_share = $user_share,
                system_share = $system_share
            RETURN NONE;
            UPSERT type::thing('{USER_BALANCE_TABLE_NAME}', $user_id) SET
                balance = (balance ?? 0) + $user_share,
                completed_tasks = (completed_tasks ?? 0) + 1
            RETURN NONE;
            UPSERT type::thing('{SYSTEM_WALLET_TABLE_NAME}', '{SYSTEM_WALLET_ID}') SET
                balance = (balance ?? 0) + $system_share
            RETURN NONE;
            COMMIT TRANSACTION;"
        );

        let mut attempt = 0;
        loop {
            attempt += 1;
            let errors = self
                .run_write(
                    qry.clone(),
                    vec![
                        ("user_id", claim.user_id.as_str().into()),
                        ("task_id", claim.task_id.to_string().into()),
                        ("user_share", user_share.into()),
                        ("system_share", system_share.into()),
                    ],
                )
                .await?;

            if errors.is_empty() {
                return Ok(());
            }
            if errors
                .iter()
                .any(|msg| msg.contains(THROW_ALREADY_CLAIMED) || is_unique_violation(msg))
            {
                return Err(LedgerError::DuplicateClaim {
                    user_id: claim.user_id.clone(),
                    task_id: claim.task_id,
                });
            }
            if attempt < TX_CONFLICT_ATTEMPTS && errors.iter().any(|msg| is_retryable_conflict(msg)) {
                warn!(
                    "claim transaction conflict user={} task={} attempt={attempt}",
                    claim.user_id, claim.task_id
                );
                continue;
            }
            return Err(LedgerError::Store(errors.join("; ")));
        }
    }
}

#[async_trait]
impl LedgerRepositoryInterface for LedgerRepository {
    async fn get_user(&self, user_id: &UserId) -> Result<Option<UserBalance>, LedgerError> {
        let record: Option<UserBalanceRecord> = self
            .client
            .select((USER_BALANCE_TABLE_NAME, user_id.as_str()))
            .await
            .map_err(store_error)?;
        Ok(record.map(|record| UserBalance {
            user_id: user_id.clone(),
            name: record.name,
            balance: from_cents(record.balance),
            completed_tasks: u64::try_from(record.completed_tasks).unwrap_or_default(),
            joined_at: record.joined_at,
        }))
    }

    async fn register_user(
        &self,
        user_id: &UserId,
        display_name: &str,
    ) -> Result<bool, LedgerError> {
        let qry = format!(
            "CREATE type::thing('{USER_BALANCE_TABLE_NAME}', $user_id) SET
                name = $name,
                balance = 0,
                completed_tasks = 0
            RETURN NONE;"
        );
        let errors = self
            .run_write(
                qry,
                vec![
                    ("user_id", user_id.as_str().into()),
                    ("name", display_name.into()),
                ],
            )
            .await?;
        match errors.first() {
            None => Ok(true),
            Some(msg) if is_record_exists(msg) => Ok(false),
            Some(_) => Err(LedgerError::Store(errors.join("; "))),
        }
    }

    async fn increment_user_balance(
        &self,
        user_id: &UserId,
        amount: Decimal,
    ) -> Result<(), LedgerError> {
        let cents = amount_cents(amount)?;
        let qry = format!(
            "UPSERT type::thing('{USER_BALANCE_TABLE_NAME}', $user_id) SET
                balance = (balance ?? 0) + $amount,
                completed_tasks = (completed_tasks ?? 0) + 1
            RETURN NONE;"
        );
        let errors = self
            .run_write(
                qry,
                vec![("user_id", user_id.as_str().into()), ("amount", cents.into())],
            )
            .await?;
        if errors.is_empty() {
            Ok(())
        } else {
            Err(LedgerError::Store(errors.join("; ")))
        }
    }

    async fn revert_user_credit(
        &self,
        user_id: &UserId,
        amount: Decimal,
    ) -> Result<(), LedgerError> {
        let cents = amount_cents(amount)?;
        let qry = format!(
            "UPDATE type::thing('{USER_BALANCE_TABLE_NAME}', $user_id) SET
                balance -= $amount,
                completed_tasks -= 1
            RETURN NONE;"
        );
        let errors = self
            .run_write(
                qry,
                vec![("user_id", user_id.as_str().into()), ("amount", cents.into())],
            )
            .await?;
        if errors.is_empty() {
            Ok(())
        } else {
            Err(LedgerError::Store(errors.join("; ")))
        }
    }

    async fn increment_system_wallet(&self, amount: Decimal) -> Result<(), LedgerError> {
        let cents = amount_cents(amount)?;
        let qry = format!(
            "UPSERT type::thing('{SYSTEM_WALLET_TABLE_NAME}', '{SYSTEM_WALLET_ID}') SET
                balance = (balance ?? 0) + $amount
            RETURN NONE;"
        );
        let errors = self.run_write(qry, vec![("amount", cents.into())]).await?;
        if errors.is_empty() {
            Ok(())
        } else {
            Err(LedgerError::Store(errors.join("; ")))
        }
    }

    async fn get_system_wallet(&self) -> Result<SystemWallet, LedgerError> {
        let record: Option<SystemWalletRecord> = self
            .client
            .select((SYSTEM_WALLET_TABLE_NAME, SYSTEM_WALLET_ID))
            .await
            .map_err(store_error)?;
        Ok(SystemWallet {
            balance: from_cents(record.map(|r| r.balance).unwrap_or_default()),
        })
    }

    async fn insert_claim(&self, claim: &ClaimRecord) -> Result<(), LedgerError> {
        let qry = format!(
            "CREATE {TASK_CLAIM_TABLE_NAME} SET
                user_id = $user_id,
                task_id = $task_id,
                user_share = $user_share,
                system_share = $system_share
            RETURN NONE;"
        );
        let errors = self
            .run_write(
                qry,
                vec![
                    ("user_id", claim.user_id.as_str().into()),
                    ("task_id", claim.task_id.to_string().into()),
                    ("user_share", amount_cents(claim.user_share)?.into()),
                    ("system_share", amount_cents(claim.system_share)?.into()),
                ],
            )
            .await?;
        match errors.first() {
            None => Ok(()),
            Some(msg) if is_unique_violation(msg) => Err(LedgerError::DuplicateClaim {
                user_id: claim.user_id.clone(),
                task_id: claim.task_id,
            }),
            Some(_) => Err(LedgerError::Store(errors.join("; "))),
        }
    }

    async fn remove_claim(&self, user_id: &UserId, task_id: &TaskId) -> Result<(), LedgerError> {
        let qry = format!(
            "DELETE {TASK_CLAIM_TABLE_NAME} WHERE user_id = $user_id AND task_id = $task_id;"
        );
        let errors = self
            .run_write(
                qry,
                vec![
                    ("user_id", user_id.as_str().into()),
                    ("task_id", task_id.to_string().into()),
                ],
            )
            .await?;
        if errors.is_empty() {
            Ok(())
        } else {
            Err(LedgerError::Store(errors.join("; ")))
        }
    }

    async fn commit_claim(&self, claim: &ClaimRecord) -> Option<Result<(), LedgerError>> {
        Some(self.commit_claim_tx(claim).await)
    }
}
