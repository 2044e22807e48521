//! Records Env
//!
//! Startup gate for the records web application. Reads the process
//! environment (optionally seeded from a `.env` file), checks it against a
//! declarative schema and hands back two read-only views: one for the server
//! process and one that is safe to ship to a client runtime. Every problem is
//! collected and reported at once.

pub mod app;
pub mod cli;
pub mod config;
pub mod error;
pub mod logging;
pub mod models;
pub mod output;

// Re-export commonly used types
pub use config::{validate_client, validate_server, ConfigValidator, EnvSchema, EnvSnapshot, PlatformPolicy};
pub use error::{AppError, FieldViolation, Result, ValidationFailure, ViolationKind};
pub use models::{AppConfig, ClientConfig, DeploymentMode, Secret, ServerConfig};

/// Application version information
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
pub const PKG_NAME: &str = env!("CARGO_PKG_NAME");
pub const BUILD_TIME: &str = env!("BUILD_TIME");
pub const GIT_COMMIT: Option<&str> = option_env!("GIT_COMMIT");

/// Version line with build metadata
pub fn version_string() -> String {
    match GIT_COMMIT {
        Some(commit) => format!("{} v{} ({}, built {})", PKG_NAME, VERSION, commit, BUILD_TIME),
        None => format!("{} v{} (built {})", PKG_NAME, VERSION, BUILD_TIME),
    }
}

/// Environment variable names read by the gate
pub mod vars {
    pub const DATABASE_URL: &str = "DATABASE_URL";
    pub const NODE_ENV: &str = "NODE_ENV";
    pub const NEXTAUTH_SECRET: &str = "NEXTAUTH_SECRET";
    pub const NEXTAUTH_URL: &str = "NEXTAUTH_URL";
    pub const GOOGLE_CLIENT_ID: &str = "GOOGLE_CLIENT_ID";
    pub const GOOGLE_CLIENT_SECRET: &str = "GOOGLE_CLIENT_SECRET";
    pub const JWT_SECRET: &str = "JWT_SECRET";

    /// Hosting platform's deployment URL; substitutes `NEXTAUTH_URL`
    pub const VERCEL_URL: &str = "VERCEL_URL";
    /// Set by the hosting platform on every deployment
    pub const VERCEL: &str = "VERCEL";
}

/// Default configuration values
pub mod defaults {
    /// Prefix that marks a variable as safe to expose to the client
    pub const CLIENT_PREFIX: &str = "NEXT_PUBLIC_";
    /// File read before validation when no path is given
    pub const DEFAULT_ENV_FILE: &str = ".env";
    /// Allowed shape of a declared variable name
    pub const VAR_NAME_PATTERN: &str = r"^[A-Z][A-Z0-9_]*$";
    pub const DEFAULT_ENABLE_COLOR: bool = true;
}
