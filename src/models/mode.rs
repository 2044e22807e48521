//! Deployment mode

use crate::error::{AppError, Result};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Closed set of deployment modes, as carried by `NODE_ENV`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DeploymentMode {
    #[default]
    Development,
    Test,
    Production,
}

impl DeploymentMode {
    /// Every mode, in declaration order
    pub const ALL: [DeploymentMode; 3] = [Self::Development, Self::Test, Self::Production];

    /// Accepted spellings, in declaration order
    pub const VALUES: [&'static str; 3] = ["development", "test", "production"];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Development => "development",
            Self::Test => "test",
            Self::Production => "production",
        }
    }

    pub fn is_production(&self) -> bool {
        matches!(self, Self::Production)
    }

    /// Mode implied by a raw `NODE_ENV` value.
    ///
    /// Only an exact `production` turns on production strictness. Unknown or
    /// missing values fall back to development; the value itself is still
    /// checked against the enumerated set by the validator.
    pub fn from_env_value(value: Option<&str>) -> Self {
        match value {
            Some("production") => Self::Production,
            Some("test") => Self::Test,
            _ => Self::Development,
        }
    }
}

impl fmt::Display for DeploymentMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for DeploymentMode {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_lowercase().as_str() {
            "development" | "dev" => Ok(Self::Development),
            "test" => Ok(Self::Test),
            "production" | "prod" => Ok(Self::Production),
            other => Err(AppError::parse(format!(
                "Invalid deployment mode '{}' (expected one of: {})",
                other,
                Self::VALUES.join(", ")
            ))),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_env_value_is_exact() {
        assert_eq!(DeploymentMode::from_env_value(Some("production")), DeploymentMode::Production);
        assert_eq!(DeploymentMode::from_env_value(Some("test")), DeploymentMode::Test);
        assert_eq!(DeploymentMode::from_env_value(Some("Production")), DeploymentMode::Development);
        assert_eq!(DeploymentMode::from_env_value(Some("staging")), DeploymentMode::Development);
        assert_eq!(DeploymentMode::from_env_value(None), DeploymentMode::Development);
    }

    #[test]
    fn test_from_str_accepts_aliases() {
        assert_eq!("prod".parse::<DeploymentMode>().unwrap(), DeploymentMode::Production);
        assert_eq!(" Development ".parse::<DeploymentMode>().unwrap(), DeploymentMode::Development);
        assert!("staging".parse::<DeploymentMode>().is_err());
    }

    #[test]
    fn test_values_match_modes() {
        for (mode, value) in DeploymentMode::ALL.iter().zip(DeploymentMode::VALUES) {
            assert_eq!(mode.as_str(), value);
            assert_eq!(mode.to_string(), value);
        }
        assert!(DeploymentMode::Production.is_production());
        assert!(!DeploymentMode::Test.is_production());
    }
}
