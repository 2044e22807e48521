//! Table-driven validation of an environment snapshot
//!
//! Every rule is checked even after a failure; violations are collected and
//! returned together so an operator can fix the whole environment in one go.

use crate::config::env::EnvSnapshot;
use crate::config::schema::{EnvSchema, Exposure, FieldRule, Requiredness, ValueRule};
use crate::defaults;
use crate::error::{FieldViolation, ValidationFailure};
use crate::models::{AppConfig, ClientConfig, DeploymentMode, FieldValues, ServerConfig};
use crate::vars;

/// How the hosting platform's URL override is treated.
///
/// When the platform flag is present the override carries a bare host name
/// (no scheme), so the URL check on overridden fields is relaxed to
/// "non-empty". Turning `relax_url_on_platform` off keeps the strict check.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlatformPolicy {
    /// Variable whose presence means "running on the platform"
    pub presence_var: String,
    pub relax_url_on_platform: bool,
}

impl Default for PlatformPolicy {
    fn default() -> Self {
        Self {
            presence_var: vars::VERCEL.to_string(),
            relax_url_on_platform: true,
        }
    }
}

impl PlatformPolicy {
    /// Same platform, strict URL checks everywhere
    pub fn strict() -> Self {
        Self {
            relax_url_on_platform: false,
            ..Self::default()
        }
    }

    /// Whether the snapshot says we are on the platform
    pub fn is_active(&self, env: &EnvSnapshot) -> bool {
        env.get(&self.presence_var).is_some_and(|v| !v.is_empty())
    }
}

/// Value of one field after substitution
#[derive(Debug, Clone, PartialEq, Eq)]
struct ResolvedValue<'a> {
    value: Option<&'a str>,
    /// Set when the value came from the field's override variable
    source: Option<&'static str>,
}

/// Configuration validator over a schema and a platform policy
pub struct ConfigValidator<'a> {
    schema: &'a EnvSchema,
    policy: &'a PlatformPolicy,
}

impl<'a> ConfigValidator<'a> {
    pub fn new(schema: &'a EnvSchema, policy: &'a PlatformPolicy) -> Self {
        Self { schema, policy }
    }

    /// Check every field of one exposure class.
    ///
    /// Returns the resolved values of all fields that passed; absent optional
    /// fields are left out.
    pub fn validate_fields(
        &self,
        exposure: Exposure,
        env: &EnvSnapshot,
        mode: DeploymentMode,
    ) -> std::result::Result<FieldValues, ValidationFailure> {
        let mut values = FieldValues::new();
        let mut failure = ValidationFailure::default();

        for field in self.schema.fields_for(exposure) {
            match self.check_field(field, env, mode) {
                Ok(Some(value)) => values.insert(field.name, value),
                Ok(None) => {}
                Err(violation) => failure.push(violation),
            }
        }

        failure.into_result(values)
    }

    /// Validate the server-only fields
    pub fn validate_server(
        &self,
        env: &EnvSnapshot,
        mode: DeploymentMode,
    ) -> std::result::Result<ServerConfig, ValidationFailure> {
        let values = self.validate_fields(Exposure::Server, env, mode)?;
        ServerConfig::from_values(&values)
    }

    /// Validate the client-exposed fields.
    ///
    /// Client requiredness never depends on the mode beyond what the rule
    /// table says, so development strictness is used.
    pub fn validate_client(&self, env: &EnvSnapshot) -> std::result::Result<ClientConfig, ValidationFailure> {
        self.validate_client_in(env, DeploymentMode::Development)
    }

    fn validate_client_in(
        &self,
        env: &EnvSnapshot,
        mode: DeploymentMode,
    ) -> std::result::Result<ClientConfig, ValidationFailure> {
        let values = self.validate_fields(Exposure::Client, env, mode)?;
        Ok(ClientConfig::from_values(&values))
    }

    /// Validate both views; violations from either side are merged
    pub fn validate_all(
        &self,
        env: &EnvSnapshot,
        mode: DeploymentMode,
    ) -> std::result::Result<AppConfig, ValidationFailure> {
        let server = self.validate_server(env, mode);
        let client = self.validate_client_in(env, mode);

        match (server, client) {
            (Ok(server), Ok(client)) => Ok(AppConfig { mode, server, client }),
            (server, client) => {
                let mut failure = ValidationFailure::default();
                if let Err(e) = server {
                    failure.merge(e);
                }
                if let Err(e) = client {
                    failure.merge(e);
                }
                Err(failure)
            }
        }
    }

    /// Check a single field against its rule
    pub fn check_field(
        &self,
        field: &FieldRule,
        env: &EnvSnapshot,
        mode: DeploymentMode,
    ) -> std::result::Result<Option<String>, FieldViolation> {
        let resolved = self.resolve(field, env);
        let attach_source = |violation: FieldViolation| match resolved.source {
            Some(source) => violation.with_source(source),
            None => violation,
        };

        if env.is_unreadable(resolved.source.unwrap_or(field.name)) {
            return Err(attach_source(FieldViolation::invalid_format(
                field.name,
                "value is not valid UTF-8",
            )));
        }

        // Empty strings count as unset
        let value = match resolved.value.filter(|v| !v.is_empty()) {
            Some(value) => value,
            None if field.requiredness.is_required(mode) => {
                return Err(attach_source(FieldViolation::missing(field.name)));
            }
            None => return Ok(None),
        };

        match &field.rule {
            ValueRule::Url => {
                if field.override_var.is_some() && self.url_check_relaxed(env) {
                    return Ok(Some(value.to_string()));
                }
                url::Url::parse(value).map_err(|e| {
                    attach_source(FieldViolation::invalid_format(
                        field.name,
                        format!("not a valid URL: {}", e),
                    ))
                })?;
            }
            ValueRule::OneOf(allowed) => {
                if !allowed.contains(&value) {
                    return Err(attach_source(FieldViolation::invalid_enum(field.name, value, allowed)));
                }
            }
            ValueRule::NonEmpty => {}
        }

        Ok(Some(value.to_string()))
    }

    /// Advisory checks on an environment that already validated
    pub fn advisories(&self, env: &EnvSnapshot, config: &AppConfig) -> Vec<ValidationWarning> {
        let mut warnings = Vec::new();

        for field in self.schema.fields() {
            if let Some(override_var) = field.override_var {
                if env.contains(override_var) {
                    warnings.push(ValidationWarning::new(
                        ValidationLevel::Info,
                        format!("{} is taken from {} set by the hosting platform", field.name, override_var),
                    ));
                }
            }

            if field.requiredness == Requiredness::InProduction
                && !config.mode.is_production()
                && env.get(field.name).map_or(true, str::is_empty)
            {
                warnings.push(ValidationWarning::new(
                    ValidationLevel::Warning,
                    format!("{} is not set; it becomes required in production", field.name),
                ));
            }
        }

        if config.mode.is_production() && config.server.nextauth_url.starts_with("http://") {
            warnings.push(ValidationWarning::new(
                ValidationLevel::Warning,
                format!("{} uses plain HTTP in production", vars::NEXTAUTH_URL),
            ));
        }

        let undeclared: Vec<&str> = env
            .keys()
            .filter(|key| key.starts_with(defaults::CLIENT_PREFIX) && self.schema.field(key).is_none())
            .collect();
        for key in undeclared {
            warnings.push(ValidationWarning::new(
                ValidationLevel::Warning,
                format!("{} is set but not declared in the client schema; it will not reach the client", key),
            ));
        }

        warnings
    }

    fn resolve<'e>(&self, field: &FieldRule, env: &'e EnvSnapshot) -> ResolvedValue<'e> {
        if let Some(override_var) = field.override_var {
            if env.contains(override_var) {
                return ResolvedValue {
                    value: env.get(override_var),
                    source: Some(override_var),
                };
            }
        }

        ResolvedValue {
            value: env.get(field.name),
            source: None,
        }
    }

    fn url_check_relaxed(&self, env: &EnvSnapshot) -> bool {
        self.policy.relax_url_on_platform && self.policy.is_active(env)
    }
}

/// Validation warning levels
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ValidationLevel {
    Info,
    Warning,
}

impl ValidationLevel {
    /// Get display string for level
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Info => "INFO",
            Self::Warning => "WARNING",
        }
    }
}

/// Non-fatal finding about a valid configuration
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize)]
pub struct ValidationWarning {
    pub level: ValidationLevel,
    pub message: String,
}

impl ValidationWarning {
    /// Create a new validation warning
    pub fn new(level: ValidationLevel, message: String) -> Self {
        Self { level, message }
    }

    /// Format warning for display
    pub fn format(&self) -> String {
        format!("[{}] {}", self.level.as_str(), self.message)
    }
}

/// Validate the server fields of the records app schema
pub fn validate_server(
    env: &EnvSnapshot,
    mode: DeploymentMode,
) -> std::result::Result<ServerConfig, ValidationFailure> {
    let schema = EnvSchema::records_app();
    let policy = PlatformPolicy::default();
    ConfigValidator::new(&schema, &policy).validate_server(env, mode)
}

/// Validate the client fields of the records app schema
pub fn validate_client(env: &EnvSnapshot) -> std::result::Result<ClientConfig, ValidationFailure> {
    let schema = EnvSchema::records_app();
    let policy = PlatformPolicy::default();
    ConfigValidator::new(&schema, &policy).validate_client(env)
}
