//! Configuration management module

pub mod env;
pub mod global;
pub mod parser;
pub mod schema;
pub mod validation;

// Re-export main functionality
pub use env::{EnvFileMerge, EnvManager, EnvSnapshot};
pub use parser::{display_config_summary, ConfigParser, LoadedConfig};
pub use schema::{EnvSchema, Exposure, FieldRule, Requiredness, ValueRule};
pub use validation::{
    validate_client, validate_server, ConfigValidator, PlatformPolicy, ValidationLevel, ValidationWarning,
};
