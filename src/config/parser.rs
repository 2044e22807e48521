//! Startup pipeline: snapshot the environment, merge .env, pick the mode and
//! validate

use crate::{
    cli::Cli,
    config::env::{EnvFileMerge, EnvManager, EnvSnapshot},
    config::schema::EnvSchema,
    config::validation::{ConfigValidator, PlatformPolicy, ValidationLevel, ValidationWarning},
    error::{AppError, Result},
    models::{AppConfig, DeploymentMode},
    vars,
};
use serde::Serialize;

/// Everything a successful startup pass produced
#[derive(Debug, Clone, Serialize)]
pub struct LoadedConfig {
    pub config: AppConfig,
    pub warnings: Vec<ValidationWarning>,
    /// Set when a .env file was read
    #[serde(skip)]
    pub env_file: Option<EnvFileMerge>,
}

/// Configuration parser that combines CLI arguments with an environment
/// snapshot
pub struct ConfigParser {
    cli: Cli,
    base_env: Option<EnvSnapshot>,
}

impl ConfigParser {
    /// Parser over the live process environment
    pub fn new(cli: Cli) -> Self {
        Self { cli, base_env: None }
    }

    /// Parser over an injected environment instead of the process one
    pub fn with_env(cli: Cli, env: EnvSnapshot) -> Self {
        Self {
            cli,
            base_env: Some(env),
        }
    }

    /// Platform policy selected by the CLI flags
    pub fn policy(&self) -> PlatformPolicy {
        if self.cli.strict_platform_url {
            PlatformPolicy::strict()
        } else {
            PlatformPolicy::default()
        }
    }

    /// Mode from `--mode`, falling back to `NODE_ENV`
    pub fn resolve_mode(&self, env: &EnvSnapshot) -> DeploymentMode {
        self.cli
            .mode
            .unwrap_or_else(|| DeploymentMode::from_env_value(env.get(vars::NODE_ENV)))
    }

    /// Parse and validate the complete configuration
    pub fn parse(&self) -> Result<LoadedConfig> {
        self.cli.validate().map_err(AppError::config)?;

        let schema = EnvSchema::records_app();
        schema.check()?;

        let policy = self.policy();
        let mut env = self.base_env.clone().unwrap_or_else(EnvSnapshot::from_process);
        let mut warnings = Vec::new();

        let env_file = self.merge_env_file(&mut env, &schema, &policy, &mut warnings)?;

        let mode = self.resolve_mode(&env);
        let validator = ConfigValidator::new(&schema, &policy);
        let config = validator.validate_all(&env, mode)?;

        warnings.extend(validator.advisories(&env, &config));

        Ok(LoadedConfig {
            config,
            warnings,
            env_file,
        })
    }

    /// Merge the selected .env file, if any, and lint its undeclared keys
    fn merge_env_file(
        &self,
        env: &mut EnvSnapshot,
        schema: &EnvSchema,
        policy: &PlatformPolicy,
        warnings: &mut Vec<ValidationWarning>,
    ) -> Result<Option<EnvFileMerge>> {
        if self.cli.no_env_file {
            return Ok(None);
        }

        let path = match EnvManager::resolve_env_file(self.cli.env_file.as_deref())? {
            Some(path) => path,
            None => return Ok(None),
        };

        let file_vars = EnvManager::read_env_file(&path)?;
        let merge = EnvManager::merge_into(env, &file_vars, &path);

        let mut known_extra: Vec<&str> = schema.override_vars();
        known_extra.push(policy.presence_var.as_str());
        for key in EnvManager::undeclared_keys(&file_vars, schema, &known_extra) {
            warnings.push(ValidationWarning::new(
                ValidationLevel::Warning,
                format!("{} in {} is not a declared variable", key, path.display()),
            ));
        }

        Ok(Some(merge))
    }
}

/// Display configuration summary with secrets masked
pub fn display_config_summary(config: &AppConfig) -> String {
    let mut summary = Vec::new();

    summary.push(format!("Mode: {}", config.mode));
    for (name, value) in config.server.display_entries() {
        summary.push(format!("{}: {}", name, value));
    }
    summary.push(format!("Client variables: {}", config.client.len()));

    summary.join("\n")
}
