//! JSON formatter for machine consumers
//!
//! Each report is one pretty-printed document on stdout. Secrets are masked by
//! their `Serialize` impls, so nothing here needs to filter values.

use super::formatter::OutputFormatter;
use crate::{
    config::{LoadedConfig, ValidationWarning},
    error::{Result, ValidationFailure},
    models::AppConfig,
};
use serde_json::{json, Value};

/// JSON formatter implementation
#[derive(Debug, Clone, Default)]
pub struct JsonFormatter;

impl JsonFormatter {
    pub fn new() -> Self {
        Self
    }

    fn render(value: &Value) -> Result<String> {
        Ok(serde_json::to_string_pretty(value)?)
    }

    fn message(kind: &str, message: &str) -> Result<String> {
        Self::render(&json!({ "status": kind, "message": message }))
    }
}

impl OutputFormatter for JsonFormatter {
    fn format_header(&self, _title: &str) -> Result<String> {
        Ok(String::new())
    }

    fn format_config_summary(&self, config: &AppConfig) -> Result<String> {
        Self::render(&serde_json::to_value(config)?)
    }

    fn format_warnings(&self, warnings: &[ValidationWarning]) -> Result<String> {
        Self::render(&serde_json::to_value(warnings)?)
    }

    fn format_failure(&self, failure: &ValidationFailure) -> Result<String> {
        Self::render(&serde_json::to_value(failure.violations())?)
    }

    fn format_error(&self, error: &str) -> Result<String> {
        Self::message("error", error)
    }

    fn format_success(&self, message: &str) -> Result<String> {
        Self::message("ok", message)
    }

    fn format_report(&self, loaded: &LoadedConfig) -> Result<String> {
        Self::render(&json!({
            "status": "ok",
            "mode": loaded.config.mode,
            "config": loaded.config,
            "warnings": loaded.warnings,
        }))
    }

    fn format_failure_report(&self, failure: &ValidationFailure) -> Result<String> {
        Self::render(&json!({
            "status": "invalid",
            "error_count": failure.len(),
            "violations": failure.violations(),
        }))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{ConfigValidator, EnvSchema, EnvSnapshot, PlatformPolicy};
    use crate::error::FieldViolation;
    use crate::models::DeploymentMode;
    use crate::vars;

    #[test]
    fn test_failure_document() {
        let failure = ValidationFailure::new(vec![
            FieldViolation::missing(vars::NEXTAUTH_URL).with_source(vars::VERCEL_URL),
            FieldViolation::invalid_enum(vars::NODE_ENV, "staging", &DeploymentMode::VALUES),
        ]);

        let output = JsonFormatter::new().format_failure_report(&failure).unwrap();
        let doc: Value = serde_json::from_str(&output).unwrap();

        assert_eq!(doc["status"], "invalid");
        assert_eq!(doc["error_count"], 2);
        assert_eq!(doc["violations"][0]["field"], "NEXTAUTH_URL");
        assert_eq!(doc["violations"][0]["kind"], "missing_required");
        assert_eq!(doc["violations"][0]["source"], "VERCEL_URL");
        assert_eq!(doc["violations"][1]["value"], "staging");
        assert_eq!(doc["violations"][1]["allowed"].as_array().map(Vec::len), Some(3));
    }

    #[test]
    fn test_report_document_masks_secrets() {
        let schema = EnvSchema::records_app();
        let policy = PlatformPolicy::default();
        let env = EnvSnapshot::new()
            .with(vars::DATABASE_URL, "postgres://app:hunter2@db/records")
            .with(vars::NODE_ENV, "test")
            .with(vars::NEXTAUTH_URL, "http://localhost:3000")
            .with(vars::GOOGLE_CLIENT_ID, "client-id")
            .with(vars::GOOGLE_CLIENT_SECRET, "client-secret")
            .with(vars::JWT_SECRET, "jwt-secret");
        let config = ConfigValidator::new(&schema, &policy)
            .validate_all(&env, DeploymentMode::Test)
            .unwrap();
        let loaded = LoadedConfig {
            config,
            warnings: Vec::new(),
            env_file: None,
        };

        let output = JsonFormatter::new().format_report(&loaded).unwrap();
        let doc: Value = serde_json::from_str(&output).unwrap();

        assert_eq!(doc["status"], "ok");
        assert_eq!(doc["mode"], "test");
        assert_eq!(doc["config"]["server"]["google_client_id"], "client-id");
        assert_eq!(doc["config"]["server"]["jwt_secret"], "********");
        assert!(doc["config"]["server"]["nextauth_secret"].is_null());
        assert!(!output.contains("hunter2"));
        assert!(!output.contains("client-secret"));
    }

    #[test]
    fn test_status_messages_are_documents() {
        let doc: Value = serde_json::from_str(&JsonFormatter::new().format_error("boom").unwrap()).unwrap();
        assert_eq!(doc["status"], "error");
        assert_eq!(doc["message"], "boom");
    }
}
