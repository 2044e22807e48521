//! Topic help for the environment gate
//!
//! Each topic is rendered from the live schema so the text never drifts from
//! what the validator actually checks.

use crate::config::{EnvManager, EnvSchema, PlatformPolicy};
use crate::models::DeploymentMode;
use crate::vars;
use colored::*;

/// Topic help system for the CLI application
pub struct HelpSystem {
    schema: EnvSchema,
    policy: PlatformPolicy,
}

impl HelpSystem {
    /// Topics accepted by `--help-topic`
    pub const TOPICS: [&'static str; 3] = ["env", "modes", "platform"];

    pub fn new() -> Self {
        Self {
            schema: EnvSchema::records_app(),
            policy: PlatformPolicy::default(),
        }
    }

    /// Display help for a topic, or `None` when the topic is unknown
    pub fn display_topic_help(&self, topic: &str, use_colors: bool) -> Option<String> {
        match topic.trim().to_lowercase().as_str() {
            "env" | "environment" => Some(self.format_environment_help(use_colors)),
            "modes" | "mode" => Some(self.format_modes_help(use_colors)),
            "platform" | "vercel" => Some(self.format_platform_help(use_colors)),
            _ => None,
        }
    }

    fn header(title: &str, use_colors: bool) -> String {
        if use_colors {
            title.bright_green().bold().to_string()
        } else {
            title.to_string()
        }
    }

    /// Format detailed environment help
    fn format_environment_help(&self, use_colors: bool) -> String {
        let mut help = format!("{}\n\n", Self::header("ENVIRONMENT VARIABLES REFERENCE:", use_colors));

        help.push_str("LOADING ORDER:\n");
        help.push_str("1. Process environment\n");
        help.push_str("2. .env file (only fills variables the process does not set)\n\n");

        help.push_str("EMPTY VALUES:\n");
        help.push_str("A variable set to the empty string counts as not set.\n\n");

        help.push_str(&EnvManager::display_env_help(&self.schema));
        help.push('\n');

        help.push_str("EXAMPLE .env FILE:\n");
        help.push_str(&EnvManager::create_example_env_content(&self.schema));

        help
    }

    /// Format deployment mode help
    fn format_modes_help(&self, use_colors: bool) -> String {
        let mut help = format!("{}\n\n", Self::header("DEPLOYMENT MODES:", use_colors));

        help.push_str(&format!(
            "{} must be one of: {}\n\n",
            vars::NODE_ENV,
            DeploymentMode::VALUES.join(", ")
        ));

        help.push_str("MODE SELECTION:\n");
        help.push_str("- --mode wins when given\n");
        help.push_str(&format!(
            "- otherwise {}=production selects production, {}=test selects test\n",
            vars::NODE_ENV,
            vars::NODE_ENV
        ));
        help.push_str("- anything else selects development\n\n");

        help.push_str("REQUIRED ONLY IN PRODUCTION:\n");
        let production_only: Vec<_> = self
            .schema
            .fields()
            .iter()
            .filter(|f| !f.requiredness.is_required(DeploymentMode::Development))
            .filter(|f| f.requiredness.is_required(DeploymentMode::Production))
            .collect();
        if production_only.is_empty() {
            help.push_str("  (none)\n");
        }
        for field in production_only {
            let name = if use_colors {
                field.name.bright_yellow().bold().to_string()
            } else {
                field.name.to_string()
            };
            help.push_str(&format!("  {}: {}\n", name, field.description));
        }

        help
    }

    /// Format hosting platform help
    fn format_platform_help(&self, use_colors: bool) -> String {
        let mut help = format!("{}\n\n", Self::header("HOSTING PLATFORM:", use_colors));

        help.push_str(&format!(
            "The platform is detected when {} is set to a non-empty value.\n\n",
            self.policy.presence_var
        ));

        help.push_str("SUBSTITUTIONS:\n");
        for field in self.schema.fields().iter().filter(|f| f.override_var.is_some()) {
            if let Some(override_var) = field.override_var {
                help.push_str(&format!("  {} is used in place of {} when set\n", override_var, field.name));
            }
        }
        help.push('\n');

        help.push_str("URL CHECK:\n");
        help.push_str("On the platform, substituted variables only need to be non-empty because the\n");
        help.push_str("platform reports bare host names such as my-app.vercel.app.\n");
        help.push_str("Pass --strict-platform-url to require a full URL everywhere.\n");

        help
    }
}

impl Default for HelpSystem {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_every_topic_renders() {
        let help_system = HelpSystem::new();
        for topic in HelpSystem::TOPICS {
            let text = help_system.display_topic_help(topic, false).unwrap();
            assert!(!text.is_empty(), "empty help for {}", topic);
        }
        assert!(help_system.display_topic_help("database", false).is_none());
    }

    #[test]
    fn test_environment_help_lists_schema() {
        let help = HelpSystem::new().display_topic_help("ENV", false).unwrap();
        assert!(help.contains("ENVIRONMENT VARIABLES REFERENCE"));
        assert!(help.contains(vars::GOOGLE_CLIENT_SECRET));
        assert!(help.contains("EXAMPLE .env FILE"));
    }

    #[test]
    fn test_modes_help_names_production_only_fields() {
        let help = HelpSystem::new().display_topic_help("modes", false).unwrap();
        assert!(help.contains("development, test, production"));
        assert!(help.contains(vars::NEXTAUTH_SECRET));
        assert!(!help.contains(&format!("  {}:", vars::JWT_SECRET)));
    }

    #[test]
    fn test_platform_help() {
        let help = HelpSystem::new().display_topic_help("platform", false).unwrap();
        assert!(help.contains("VERCEL_URL is used in place of NEXTAUTH_URL"));
        assert!(help.contains("--strict-platform-url"));
    }

    #[test]
    fn test_plain_help_has_no_ansi() {
        let help = HelpSystem::new().display_topic_help("modes", false).unwrap();
        assert!(!help.contains("\u{1b}["));
    }
}
