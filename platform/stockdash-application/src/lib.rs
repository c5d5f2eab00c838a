pub mod config;
pub mod dashboard;
pub mod layout;
pub mod snapshot;
