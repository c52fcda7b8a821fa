use async_trait::async_trait;
use rust_decimal::Decimal;
use thiserror::Error;

use crate::entities::claim::ClaimRecord;
use crate::entities::task::TaskId;
use crate::entities::user_balance::{SystemWallet, UserBalance, UserId};

#[derive(Debug, Clone, PartialEq, Error)]
pub enum LedgerError {
    #[error("task {task_id} was already claimed by user {user_id}")]
    DuplicateClaim { user_id: UserId, task_id: TaskId },
    #[error("amount {0} can not be stored")]
    InvalidAmount(Decimal),
    #[error("ledger store failure: {0}")]
    Store(String),
}

/// Per-user balances, the system wallet and the claim records guarding them.
///
/// Every increment is a single indivisible store operation. Stores able to run
/// several writes in one transaction override [`commit_claim`](Self::commit_claim);
/// for the others the caller sequences the single-record operations itself.
#[async_trait]
pub trait LedgerRepositoryInterface: Send + Sync {
    async fn get_user(&self, user_id: &UserId) -> Result<Option<UserBalance>, LedgerError>;

    /// Seeds a zero balance. Returns `false` without touching anything when the user exists.
    async fn register_user(&self, user_id: &UserId, display_name: &str)
        -> Result<bool, LedgerError>;

    /// Adds `amount` to the balance and counts one completed task.
    /// Creates the balance record when the user never registered.
    async fn increment_user_balance(
        &self,
        user_id: &UserId,
        amount: Decimal,
    ) -> Result<(), LedgerError>;

    /// Undoes one [`increment_user_balance`](Self::increment_user_balance).
    async fn revert_user_credit(&self, user_id: &UserId, amount: Decimal)
        -> Result<(), LedgerError>;

    /// Creates the wallet on first use.
    async fn increment_system_wallet(&self, amount: Decimal) -> Result<(), LedgerError>;

    /// Zero balance when the wallet was never credited.
    async fn get_system_wallet(&self) -> Result<SystemWallet, LedgerError>;

    /// Fails with [`LedgerError::DuplicateClaim`] when the pair is already recorded.
    async fn insert_claim(&self, claim: &ClaimRecord) -> Result<(), LedgerError>;

    async fn remove_claim(&self, user_id: &UserId, task_id: &TaskId) -> Result<(), LedgerError>;

    /// Records the claim and applies both credits in one transaction.
    /// `None` means the store has no multi-record transactions.
    async fn commit_claim(&self, _claim: &ClaimRecord) -> Option<Result<(), LedgerError>> {
        None
    }
}
