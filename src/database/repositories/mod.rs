pub mod ledger_repo;
pub mod task_repo;
