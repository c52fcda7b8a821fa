use std::fmt::{Debug, Formatter};
use std::sync::Arc;
use std::time::Duration;

use crate::config::AppConfig;
use crate::database::client::Database;
use crate::entities::claim::RewardSplit;
use crate::middleware::error::AppResult;

pub const MAX_CATALOG_LIMIT: usize = 100;

pub struct CtxState {
    pub db: Database,
    pub admin_password: String,
    pub reward_split: RewardSplit,
    pub store_timeout: Duration,
    pub catalog_limit: usize,
}

impl Debug for CtxState {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CtxState")
            .field("reward_split", &self.reward_split)
            .field("store_timeout", &self.store_timeout)
            .field("catalog_limit", &self.catalog_limit)
            .finish_non_exhaustive()
    }
}

pub fn create_ctx_state(db: Database, config: &AppConfig) -> AppResult<Arc<CtxState>> {
    let reward_split = RewardSplit::new(config.user_percentage, config.system_percentage)?;
    let ctx_state = CtxState {
        db,
        admin_password: config.admin_password.clone(),
        reward_split,
        store_timeout: Duration::from_millis(config.store_timeout_ms),
        catalog_limit: config.catalog_limit.min(MAX_CATALOG_LIMIT),
    };
    Ok(Arc::new(ctx_state))
}
