// src/core/mod.rs
//! Configuration and the outbound HTTP plumbing shared across features.

pub mod app_state;
pub mod config_manager;
pub mod service_client;

pub use app_state::AppState;
pub use config_manager::ConfigManager;
pub use service_client::ServiceClient;
