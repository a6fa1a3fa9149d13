pub mod api;
pub mod config;
pub mod dispatch;
pub mod error;
pub mod fleet;
pub mod geo;
pub mod identity;
pub mod models;
pub mod notify;
pub mod observability;
pub mod state;
pub mod tracker;
