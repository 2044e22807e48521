//! Library-level validation tests
//!
//! Exercise the public validator API the way the web application calls it at
//! startup, plus a few properties checked over generated environments.

use proptest::prelude::*;
use records_env::{
    config::EnvSnapshot, validate_client, validate_server, vars, DeploymentMode, ViolationKind,
};

const SERVER_FIELDS: [&str; 6] = [
    vars::DATABASE_URL,
    vars::NODE_ENV,
    vars::NEXTAUTH_URL,
    vars::GOOGLE_CLIENT_ID,
    vars::GOOGLE_CLIENT_SECRET,
    vars::JWT_SECRET,
];

fn complete_env() -> EnvSnapshot {
    EnvSnapshot::new()
        .with(vars::DATABASE_URL, "postgres://records:pw@localhost:5432/records")
        .with(vars::NODE_ENV, "production")
        .with(vars::NEXTAUTH_SECRET, "session-secret")
        .with(vars::NEXTAUTH_URL, "https://records.example.com")
        .with(vars::GOOGLE_CLIENT_ID, "client-id.apps.googleusercontent.com")
        .with(vars::GOOGLE_CLIENT_SECRET, "client-secret")
        .with(vars::JWT_SECRET, "jwt-secret")
}

#[test]
fn test_complete_production_environment() {
    let server = validate_server(&complete_env(), DeploymentMode::Production).unwrap();

    assert_eq!(server.node_env, DeploymentMode::Production);
    assert_eq!(server.nextauth_secret.as_ref().map(|s| s.expose()), Some("session-secret"));
    assert_eq!(server.database_url.host_str(), Some("localhost"));
    assert_eq!(server.nextauth_url, "https://records.example.com");
}

#[test]
fn test_development_without_session_secret() {
    let env = complete_env()
        .with(vars::NODE_ENV, "development")
        .without(vars::NEXTAUTH_SECRET);

    let server = validate_server(&env, DeploymentMode::Development).unwrap();
    assert!(server.nextauth_secret.is_none());
}

#[test]
fn test_debug_output_never_leaks_secrets() {
    let server = validate_server(&complete_env(), DeploymentMode::Production).unwrap();
    let debug = format!("{:?}", server);

    assert!(!debug.contains("session-secret"));
    assert!(!debug.contains("jwt-secret"));
    assert!(!debug.contains("client-secret"));
}

#[test]
fn test_platform_deployment() {
    let env = complete_env()
        .without(vars::NEXTAUTH_URL)
        .with(vars::VERCEL, "1")
        .with(vars::VERCEL_URL, "records-abc123.vercel.app");

    let server = validate_server(&env, DeploymentMode::Production).unwrap();
    assert_eq!(server.nextauth_url, "records-abc123.vercel.app");
}

#[test]
fn test_client_view_is_empty_for_records_app() {
    let client = validate_client(&complete_env()).unwrap();
    assert!(client.is_empty());
    assert_eq!(serde_json::to_string(&client).unwrap(), "{}");
}

/// Generators for environment-shaped data
mod generators {
    use super::*;

    /// Index into the always-required server fields
    pub fn required_field() -> impl Strategy<Value = usize> {
        0..SERVER_FIELDS.len()
    }

    /// Non-empty subsets of the always-required server fields
    pub fn field_subset() -> impl Strategy<Value = Vec<bool>> {
        proptest::collection::vec(any::<bool>(), SERVER_FIELDS.len())
            .prop_filter("at least one field removed", |mask| mask.iter().any(|&m| m))
    }

    /// Values that are not one of the accepted modes
    pub fn unknown_mode() -> impl Strategy<Value = String> {
        "[a-zA-Z]{1,12}".prop_filter("not a valid mode", |s| !DeploymentMode::VALUES.contains(&s.as_str()))
    }
}

mod property_tests {
    use super::*;

    proptest! {
        /// Removing any required field yields exactly one MissingRequired naming it
        #[test]
        fn omitted_field_is_named(idx in generators::required_field()) {
            let field = SERVER_FIELDS[idx];
            let env = complete_env().without(field);

            let failure = validate_server(&env, DeploymentMode::Production).unwrap_err();

            prop_assert_eq!(failure.len(), 1);
            prop_assert_eq!(&failure.violations()[0].field, field);
            prop_assert_eq!(&failure.violations()[0].kind, &ViolationKind::MissingRequired);
        }

        /// Every removed field is reported in one pass, nothing else is
        #[test]
        fn all_violations_are_aggregated(mask in generators::field_subset()) {
            let mut env = complete_env();
            let mut removed = Vec::new();
            for (field, remove) in SERVER_FIELDS.iter().zip(&mask) {
                if *remove {
                    env = env.without(field);
                    removed.push(*field);
                }
            }

            let failure = validate_server(&env, DeploymentMode::Production).unwrap_err();

            prop_assert_eq!(failure.field_names(), removed);
        }

        /// Setting a field to the empty string is the same as removing it
        #[test]
        fn empty_equals_absent(idx in generators::required_field()) {
            let field = SERVER_FIELDS[idx];
            let emptied = validate_server(&complete_env().with(field, ""), DeploymentMode::Production).unwrap_err();
            let removed = validate_server(&complete_env().without(field), DeploymentMode::Production).unwrap_err();

            prop_assert_eq!(emptied, removed);
        }

        /// Unknown NODE_ENV spellings are rejected with the allowed set
        #[test]
        fn unknown_mode_is_rejected(mode in generators::unknown_mode()) {
            let env = complete_env().with(vars::NODE_ENV, mode.clone());
            let failure = validate_server(&env, DeploymentMode::Production).unwrap_err();

            let violation = failure.get(vars::NODE_ENV).unwrap();
            prop_assert_eq!(
                &violation.kind,
                &ViolationKind::InvalidEnum {
                    value: mode,
                    allowed: DeploymentMode::VALUES.iter().map(|s| s.to_string()).collect(),
                }
            );
        }

        /// Requiredness of the session secret depends on the mode alone
        #[test]
        fn session_secret_only_required_in_production(production in any::<bool>()) {
            let mode = if production { DeploymentMode::Production } else { DeploymentMode::Test };
            let env = complete_env().without(vars::NEXTAUTH_SECRET);

            prop_assert_eq!(validate_server(&env, mode).is_err(), production);
        }
    }
}
