//! Data models for the environment gate

pub mod config;
pub mod mode;
pub mod secret;

// Re-export main model types
pub use config::{AppConfig, ClientConfig, FieldValues, ServerConfig};
pub use mode::DeploymentMode;
pub use secret::Secret;
