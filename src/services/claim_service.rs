use std::time::Duration;

use thiserror::Error;
use tracing::{error, info, warn};

use crate::entities::claim::{ClaimReceipt, ClaimRecord, RewardSplit};
use crate::entities::task::TaskId;
use crate::entities::user_balance::UserId;
use crate::interfaces::repositories::ledger_ifce::{LedgerError, LedgerRepositoryInterface};
use crate::interfaces::repositories::task_ifce::TaskRepositoryInterface;
use crate::services::store_call::{bounded, StoreCallError};

#[derive(Debug, Clone, PartialEq, Error)]
pub enum ClaimError {
    #[error("invalid task id `{0}`")]
    InvalidTaskId(String),
    #[error("task {0} not found")]
    TaskNotFound(TaskId),
    #[error("task {0} is inactive")]
    TaskInactive(TaskId),
    #[error("task {task_id} already claimed by user {user_id}")]
    AlreadyClaimed { user_id: UserId, task_id: TaskId },
    #[error("store unavailable: {0}")]
    StoreUnavailable(String),
    #[error("ledgers out of balance: {0}")]
    PartialFailure(String),
}

/// Validates a task claim and credits both ledgers.
///
/// Ledgers that commit the whole claim in one transaction are used as is.
/// Otherwise the claim record is written first, then the user credit, then the
/// system credit. A failed system credit is retried once and then compensated
/// by reverting the user credit and releasing the claim record.
pub struct ClaimService<'a, T, L>
where
    T: TaskRepositoryInterface,
    L: LedgerRepositoryInterface,
{
    tasks_repository: &'a T,
    ledger_repository: &'a L,
    split: RewardSplit,
    store_timeout: Duration,
}

impl<'a, T, L> ClaimService<'a, T, L>
where
    T: TaskRepositoryInterface,
    L: LedgerRepositoryInterface,
{
    pub fn new(
        tasks_repository: &'a T,
        ledger_repository: &'a L,
        split: RewardSplit,
        store_timeout: Duration,
    ) -> Self {
        Self {
            tasks_repository,
            ledger_repository,
            split,
            store_timeout,
        }
    }

    pub async fn claim(&self, task_id: &str, user_id: &UserId) -> Result<ClaimReceipt, ClaimError> {
        let task_id: TaskId = task_id
            .parse()
            .map_err(|_| ClaimError::InvalidTaskId(task_id.to_string()))?;

        let task = bounded(self.store_timeout, self.tasks_repository.get_task(&task_id))
            .await
            .map_err(|e| ClaimError::StoreUnavailable(e.to_string()))?
            .ok_or(ClaimError::TaskNotFound(task_id))?;

        if !task.active {
            return Err(ClaimError::TaskInactive(task_id));
        }

        let claim = ClaimRecord {
            user_id: user_id.clone(),
            task_id,
            user_share: self.split.user_share(task.full_price),
            system_share: self.split.system_share(task.full_price),
        };

        let committed = bounded(self.store_timeout, async {
            self.ledger_repository.commit_claim(&claim).await.transpose()
        })
        .await
        .map_err(|e| self.to_claim_error(&claim, e))?;

        if committed.is_none() {
            self.apply_stepwise(&claim).await?;
        }

        info!(
            "claim credited user={} task={} user_share={} system_share={}",
            claim.user_id, claim.task_id, claim.user_share, claim.system_share
        );
        Ok(ClaimReceipt {
            user_id: claim.user_id,
            task_id: claim.task_id,
            credited: claim.user_share,
        })
    }

    async fn apply_stepwise(&self, claim: &ClaimRecord) -> Result<(), ClaimError> {
        bounded(self.store_timeout, self.ledger_repository.insert_claim(claim))
            .await
            .map_err(|e| self.to_claim_error(claim, e))?;

        if let Err(credit_err) = bounded(
            self.store_timeout,
            self.ledger_repository
                .increment_user_balance(&claim.user_id, claim.user_share),
        )
        .await
        {
            warn!(
                "user credit failed user={} task={} err={credit_err}",
                claim.user_id, claim.task_id
            );
            self.release_claim(claim, "user credit").await?;
            return Err(ClaimError::StoreUnavailable(credit_err.to_string()));
        }

        let mut system_credit = self.credit_system(claim).await;
        if let Err(first_err) = &system_credit {
            warn!(
                "system credit failed, retrying user={} task={} err={first_err}",
                claim.user_id, claim.task_id
            );
            system_credit = self.credit_system(claim).await;
        }

        if let Err(system_err) = system_credit {
            if let Err(revert_err) = bounded(
                self.store_timeout,
                self.ledger_repository
                    .revert_user_credit(&claim.user_id, claim.user_share),
            )
            .await
            {
                let detail = format!(
                    "user {} credited {} for task {} but system wallet credit of {} failed ({system_err}) and the revert failed ({revert_err})",
                    claim.user_id, claim.user_share, claim.task_id, claim.system_share
                );
                error!("PARTIAL FAILURE step=revert_user_credit {detail}");
                return Err(ClaimError::PartialFailure(detail));
            }
            self.release_claim(claim, "system credit").await?;
            return Err(ClaimError::StoreUnavailable(system_err.to_string()));
        }
        Ok(())
    }

    async fn credit_system(&self, claim: &ClaimRecord) -> Result<(), StoreCallError<LedgerError>> {
        bounded(
            self.store_timeout,
            self.ledger_repository
                .increment_system_wallet(claim.system_share),
        )
        .await
    }

    /// Drops the claim record after its credits were undone.
    async fn release_claim(&self, claim: &ClaimRecord, failed_step: &str) -> Result<(), ClaimError> {
        bounded(
            self.store_timeout,
            self.ledger_repository
                .remove_claim(&claim.user_id, &claim.task_id),
        )
        .await
        .map_err(|remove_err| {
            let detail = format!(
                "claim of task {} by user {} (user share {}, system share {}) stays recorded after the {failed_step} failed; removing it failed ({remove_err})",
                claim.task_id, claim.user_id, claim.user_share, claim.system_share
            );
            error!("PARTIAL FAILURE step=remove_claim {detail}");
            ClaimError::PartialFailure(detail)
        })
    }

    fn to_claim_error(&self, claim: &ClaimRecord, err: StoreCallError<LedgerError>) -> ClaimError {
        match err {
            StoreCallError::Failed(LedgerError::DuplicateClaim { .. }) => ClaimError::AlreadyClaimed {
                user_id: claim.user_id.clone(),
                task_id: claim.task_id,
            },
            other => {
                error!(
                    "claim store failure user={} task={} err={other}",
                    claim.user_id, claim.task_id
                );
                ClaimError::StoreUnavailable(other.to_string())
            }
        }
    }
}
