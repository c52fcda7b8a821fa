#![allow(dead_code)]

use std::collections::{HashMap, HashSet};
use std::sync::atomic::{AtomicBool, AtomicU64, AtomicUsize, Ordering};
use std::sync::Mutex;
use std::time::Duration;

use async_trait::async_trait;
use chrono::{TimeDelta, Utc};
use rust_decimal::Decimal;

use reward_server::entities::claim::ClaimRecord;
use reward_server::entities::task::{NewTask, Task, TaskId};
use reward_server::entities::user_balance::{SystemWallet, UserBalance, UserId};
use reward_server::interfaces::repositories::ledger_ifce::{LedgerError, LedgerRepositoryInterface};
use reward_server::interfaces::repositories::task_ifce::{TaskRepositoryInterface, TaskStoreError};

#[derive(Default)]
pub struct InMemoryTaskStore {
    tasks: Mutex<HashMap<TaskId, Task>>,
    pub reads: AtomicUsize,
    pub unavailable: AtomicBool,
}

impl InMemoryTaskStore {
    /// Adds a task created `age_minutes` ago.
    pub fn add(&self, full_price: Decimal, active: bool, age_minutes: i64) -> TaskId {
        let id = TaskId::generate();
        let task = Task {
            id,
            title: format!("task {id}"),
            link: "https://example.com/ad".to_string(),
            full_price,
            duration_seconds: 30,
            active,
            created_at: Utc::now() - TimeDelta::minutes(age_minutes),
        };
        self.tasks.lock().unwrap().insert(id, task);
        id
    }

    fn check_available(&self) -> Result<(), TaskStoreError> {
        if self.unavailable.load(Ordering::SeqCst) {
            return Err(TaskStoreError::Store("task store down".to_string()));
        }
        Ok(())
    }
}

#[async_trait]
impl TaskRepositoryInterface for InMemoryTaskStore {
    async fn get_task(&self, task_id: &TaskId) -> Result<Option<Task>, TaskStoreError> {
        self.reads.fetch_add(1, Ordering::SeqCst);
        self.check_available()?;
        Ok(self.tasks.lock().unwrap().get(task_id).cloned())
    }

    async fn create_task(&self, task: NewTask) -> Result<TaskId, TaskStoreError> {
        self.check_available()?;
        let id = TaskId::generate();
        self.tasks.lock().unwrap().insert(
            id,
            Task {
                id,
                title: task.title,
                link: task.link,
                full_price: task.full_price,
                duration_seconds: task.duration_seconds,
                active: true,
                created_at: Utc::now(),
            },
        );
        Ok(id)
    }

    async fn list_active(&self, limit: usize) -> Result<Vec<Task>, TaskStoreError> {
        self.reads.fetch_add(1, Ordering::SeqCst);
        self.check_available()?;
        let mut tasks: Vec<Task> = self
            .tasks
            .lock()
            .unwrap()
            .values()
            .filter(|task| task.active)
            .cloned()
            .collect();
        tasks.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        tasks.truncate(limit);
        Ok(tasks)
    }
}

#[derive(Debug, Default, Clone, PartialEq)]
pub struct LedgerSnapshot {
    pub users: HashMap<UserId, (Decimal, u64)>,
    pub system: Decimal,
    pub claims: HashSet<(UserId, TaskId)>,
}

impl LedgerSnapshot {
    pub fn user_balance(&self, user_id: &UserId) -> Decimal {
        self.users
            .get(user_id)
            .map(|(balance, _)| *balance)
            .unwrap_or_default()
    }

    pub fn completed_tasks(&self, user_id: &UserId) -> u64 {
        self.users
            .get(user_id)
            .map(|(_, completed)| *completed)
            .unwrap_or_default()
    }
}

/// Ledger double. Without `atomic` it has no multi-record transactions and the
/// engine sequences the single writes itself.
#[derive(Default)]
pub struct InMemoryLedger {
    state: Mutex<LedgerSnapshot>,
    names: Mutex<HashMap<UserId, String>>,
    pub atomic: bool,
    pub fail_user_credit: AtomicBool,
    /// Number of upcoming system wallet credits that fail.
    pub failing_system_credits: AtomicUsize,
    pub fail_revert: AtomicBool,
    pub fail_remove: AtomicBool,
    pub delay_ms: AtomicU64,
    pub calls: AtomicUsize,
}

impl InMemoryLedger {
    pub fn atomic() -> Self {
        Self {
            atomic: true,
            ..Default::default()
        }
    }

    pub fn snapshot(&self) -> LedgerSnapshot {
        self.state.lock().unwrap().clone()
    }

    async fn enter(&self) {
        self.calls.fetch_add(1, Ordering::SeqCst);
        let delay = self.delay_ms.load(Ordering::SeqCst);
        if delay > 0 {
            tokio::time::sleep(Duration::from_millis(delay)).await;
        } else {
            tokio::task::yield_now().await;
        }
    }

    fn down(what: &str) -> LedgerError {
        LedgerError::Store(format!("{what} unavailable"))
    }
}

#[async_trait]
impl LedgerRepositoryInterface for InMemoryLedger {
    async fn get_user(&self, user_id: &UserId) -> Result<Option<UserBalance>, LedgerError> {
        self.enter().await;
        let state = self.state.lock().unwrap();
        Ok(state.users.get(user_id).map(|(balance, completed)| UserBalance {
            user_id: user_id.clone(),
            name: self.names.lock().unwrap().get(user_id).cloned(),
            balance: *balance,
            completed_tasks: *completed,
            joined_at: Utc::now(),
        }))
    }

    async fn register_user(&self, user_id: &UserId, display_name: &str) -> Result<bool, LedgerError> {
        self.enter().await;
        let mut state = self.state.lock().unwrap();
        if state.users.contains_key(user_id) {
            return Ok(false);
        }
        state.users.insert(user_id.clone(), (Decimal::ZERO, 0));
        self.names
            .lock()
            .unwrap()
            .insert(user_id.clone(), display_name.to_string());
        Ok(true)
    }

    async fn increment_user_balance(&self, user_id: &UserId, amount: Decimal) -> Result<(), LedgerError> {
        self.enter().await;
        if self.fail_user_credit.load(Ordering::SeqCst) {
            return Err(Self::down("user balance"));
        }
        let mut state = self.state.lock().unwrap();
        let entry = state.users.entry(user_id.clone()).or_default();
        entry.0 += amount;
        entry.1 += 1;
        Ok(())
    }

    async fn revert_user_credit(&self, user_id: &UserId, amount: Decimal) -> Result<(), LedgerError> {
        self.enter().await;
        if self.fail_revert.load(Ordering::SeqCst) {
            return Err(Self::down("user balance"));
        }
        let mut state = self.state.lock().unwrap();
        let entry = state.users.entry(user_id.clone()).or_default();
        entry.0 -= amount;
        entry.1 = entry.1.saturating_sub(1);
        Ok(())
    }

    async fn increment_system_wallet(&self, amount: Decimal) -> Result<(), LedgerError> {
        self.enter().await;
        let failing = self
            .failing_system_credits
            .fetch_update(Ordering::SeqCst, Ordering::SeqCst, |n| n.checked_sub(1));
        if failing.is_ok() {
            return Err(Self::down("system wallet"));
        }
        self.state.lock().unwrap().system += amount;
        Ok(())
    }

    async fn get_system_wallet(&self) -> Result<SystemWallet, LedgerError> {
        self.enter().await;
        Ok(SystemWallet {
            balance: self.state.lock().unwrap().system,
        })
    }

    async fn insert_claim(&self, claim: &ClaimRecord) -> Result<(), LedgerError> {
        self.enter().await;
        let mut state = self.state.lock().unwrap();
        if !state.claims.insert((claim.user_id.clone(), claim.task_id)) {
            return Err(LedgerError::DuplicateClaim {
                user_id: claim.user_id.clone(),
                task_id: claim.task_id,
            });
        }
        Ok(())
    }

    async fn remove_claim(&self, user_id: &UserId, task_id: &TaskId) -> Result<(), LedgerError> {
        self.enter().await;
        if self.fail_remove.load(Ordering::SeqCst) {
            return Err(Self::down("claims"));
        }
        self.state
            .lock()
            .unwrap()
            .claims
            .remove(&(user_id.clone(), *task_id));
        Ok(())
    }

    async fn commit_claim(&self, claim: &ClaimRecord) -> Option<Result<(), LedgerError>> {
        if !self.atomic {
            return None;
        }
        self.enter().await;
        if self.fail_user_credit.load(Ordering::SeqCst)
            || self.failing_system_credits.load(Ordering::SeqCst) > 0
        {
            return Some(Err(Self::down("ledger")));
        }
        let mut state = self.state.lock().unwrap();
        if !state.claims.insert((claim.user_id.clone(), claim.task_id)) {
            return Some(Err(LedgerError::DuplicateClaim {
                user_id: claim.user_id.clone(),
                task_id: claim.task_id,
            }));
        }
        let entry = state.users.entry(claim.user_id.clone()).or_default();
        entry.0 += claim.user_share;
        entry.1 += 1;
        state.system += claim.system_share;
        Some(Ok(()))
    }
}
