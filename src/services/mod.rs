pub mod catalog_service;
pub mod claim_service;
pub mod store_call;
pub mod task_service;
pub mod user_service;
