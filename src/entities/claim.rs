use rust_decimal::Decimal;
use thiserror::Error;

use super::money::round_money;
use super::task::TaskId;
use super::user_balance::UserId;

#[derive(Debug, Clone, PartialEq, Error)]
pub enum SplitError {
    #[error("{name} must be between 0 and 1, got {value}")]
    OutOfRange { name: &'static str, value: Decimal },
    #[error("user and system percentages add up to {sum}, more than 1")]
    SumAboveOne { sum: Decimal },
}

/// How the full price of a claimed task is divided between the user and the system wallet.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RewardSplit {
    user_percentage: Decimal,
    system_percentage: Decimal,
}

impl RewardSplit {
    pub fn new(user_percentage: Decimal, system_percentage: Decimal) -> Result<Self, SplitError> {
        for (name, value) in [
            ("user percentage", user_percentage),
            ("system percentage", system_percentage),
        ] {
            if value < Decimal::ZERO || value > Decimal::ONE {
                return Err(SplitError::OutOfRange { name, value });
            }
        }
        let sum = user_percentage + system_percentage;
        if sum > Decimal::ONE {
            return Err(SplitError::SumAboveOne { sum });
        }
        Ok(Self {
            user_percentage,
            system_percentage,
        })
    }

    pub fn user_percentage(&self) -> Decimal {
        self.user_percentage
    }

    pub fn system_percentage(&self) -> Decimal {
        self.system_percentage
    }

    pub fn user_share(&self, full_price: Decimal) -> Decimal {
        round_money(full_price * self.user_percentage)
    }

    pub fn system_share(&self, full_price: Decimal) -> Decimal {
        round_money(full_price * self.system_percentage)
    }

    /// Fraction of every price that neither ledger receives.
    pub fn retained_fraction(&self) -> Decimal {
        Decimal::ONE - self.user_percentage - self.system_percentage
    }
}

/// One accepted claim. At most one exists per (user, task).
#[derive(Debug, Clone, PartialEq)]
pub struct ClaimRecord {
    pub user_id: UserId,
    pub task_id: TaskId,
    pub user_share: Decimal,
    pub system_share: Decimal,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ClaimReceipt {
    pub user_id: UserId,
    pub task_id: TaskId,
    pub credited: Decimal,
}
