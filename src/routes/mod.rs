pub mod admin;
pub mod claim;
pub mod tasks;
pub mod users;
