use serde::Deserialize;
use tracing::info;
use validator::Validate;

use crate::entities::user_balance::{SystemWallet, UserBalance, UserId};
use crate::interfaces::repositories::ledger_ifce::LedgerRepositoryInterface;
use crate::middleware::ctx::Ctx;
use crate::middleware::error::{AppError, CtxResult};

#[derive(Debug, Deserialize, Validate)]
pub struct RegisterInput {
    pub user_id: UserId,
    #[validate(length(max = 128, message = "Name is too long"))]
    #[serde(default)]
    pub name: String,
}

pub struct UserService<'a, L>
where
    L: LedgerRepositoryInterface,
{
    ledger_repository: &'a L,
    ctx: &'a Ctx,
}

impl<'a, L> UserService<'a, L>
where
    L: LedgerRepositoryInterface,
{
    pub fn new(ledger_repository: &'a L, ctx: &'a Ctx) -> Self {
        Self {
            ledger_repository,
            ctx,
        }
    }

    /// Returns `true` when a new zero balance was seeded.
    pub async fn register(&self, input: RegisterInput) -> CtxResult<bool> {
        let created = self
            .ledger_repository
            .register_user(&input.user_id, input.name.trim())
            .await
            .map_err(|e| self.ctx.to_ctx_error(e.into()))?;
        if created {
            info!("user registered user_id={}", input.user_id);
        }
        Ok(created)
    }

    pub async fn get_balance(&self, user_id: &UserId) -> CtxResult<UserBalance> {
        self.ledger_repository
            .get_user(user_id)
            .await
            .map_err(|e| self.ctx.to_ctx_error(e.into()))?
            .ok_or_else(|| {
                self.ctx.to_ctx_error(AppError::EntityFailIdNotFound {
                    ident: user_id.to_string(),
                })
            })
    }

    pub async fn system_wallet(&self) -> CtxResult<SystemWallet> {
        self.ledger_repository
            .get_system_wallet()
            .await
            .map_err(|e| self.ctx.to_ctx_error(e.into()))
    }
}
