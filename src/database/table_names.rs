pub const TASK_TABLE_NAME: &'static str = "task";
pub const USER_BALANCE_TABLE_NAME: &'static str = "user_balance";
pub const SYSTEM_WALLET_TABLE_NAME: &'static str = "system_wallet";
pub const TASK_CLAIM_TABLE_NAME: &'static str = "task_claim";
pub const SYSTEM_WALLET_ID: &'static str = "main";
