pub mod claim;
pub mod money;
pub mod task;
pub mod user_balance;
