//! Process-wide validated configuration
//!
//! Installed once after a successful validation pass and read without locking
//! for the rest of the process lifetime.

use crate::error::{AppError, Result};
use crate::models::AppConfig;
use std::sync::OnceLock;

static APP_CONFIG: OnceLock<AppConfig> = OnceLock::new();

/// Install the validated configuration.
///
/// Fails if a configuration was already installed; the first one stays.
pub fn install(config: AppConfig) -> Result<&'static AppConfig> {
    APP_CONFIG
        .set(config)
        .map_err(|_| AppError::config("Application configuration is already initialized"))?;
    get().ok_or_else(|| AppError::internal("Application configuration vanished after install"))
}

/// Installed configuration, if startup validation has run
pub fn get() -> Option<&'static AppConfig> {
    APP_CONFIG.get()
}
