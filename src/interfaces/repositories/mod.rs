pub mod ledger_ifce;
pub mod task_ifce;
