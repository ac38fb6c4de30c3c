pub mod bidding;
pub mod config_manager;
pub mod models;
pub mod observability;
pub mod pipeline;
pub mod report;
