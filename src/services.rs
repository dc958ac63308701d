pub mod tasks;
pub mod transfer;
