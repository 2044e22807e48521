//! Validated configuration views
//!
//! These structures are only ever built from a successful validation pass.
//! The server view carries secrets and never leaves the backend process; the
//! client view holds nothing but `NEXT_PUBLIC_` values.

use crate::error::{FieldViolation, ValidationFailure};
use crate::models::{DeploymentMode, Secret};
use crate::vars;
use serde::{Serialize, Serializer};
use std::collections::BTreeMap;
use url::Url;

/// Resolved, rule-checked values keyed by declared field name.
///
/// Absent optional fields simply have no entry.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FieldValues {
    values: BTreeMap<String, String>,
}

impl FieldValues {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert<K: Into<String>, V: Into<String>>(&mut self, field: K, value: V) {
        self.values.insert(field.into(), value.into());
    }

    pub fn get(&self, field: &str) -> Option<&str> {
        self.values.get(field).map(String::as_str)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.values.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Value for a field the schema marks as required
    fn require(&self, field: &str, failure: &mut ValidationFailure) -> Option<&str> {
        let value = self.get(field);
        if value.is_none() {
            failure.push(FieldViolation::missing(field));
        }
        value
    }
}

/// Server-only configuration
#[derive(Debug, Clone, Serialize)]
pub struct ServerConfig {
    /// Database connection string
    #[serde(serialize_with = "serialize_redacted_url")]
    pub database_url: Url,
    /// Value of `NODE_ENV`
    pub node_env: DeploymentMode,
    /// Session signing secret; only guaranteed in production
    pub nextauth_secret: Option<Secret>,
    /// Canonical auth callback base. On the hosting platform this may be a
    /// bare host name taken from the platform override.
    pub nextauth_url: String,
    pub google_client_id: String,
    pub google_client_secret: Secret,
    pub jwt_secret: Secret,
}

impl ServerConfig {
    /// Build the typed view from values that already passed the rule table.
    ///
    /// Re-checks the few conversions it performs so that a custom schema
    /// missing one of the fields still yields a violation, not a panic.
    pub fn from_values(values: &FieldValues) -> std::result::Result<Self, ValidationFailure> {
        let mut failure = ValidationFailure::default();

        let database_url = values
            .require(vars::DATABASE_URL, &mut failure)
            .and_then(|raw| match Url::parse(raw) {
                Ok(url) => Some(url),
                Err(e) => {
                    failure.push(FieldViolation::invalid_format(
                        vars::DATABASE_URL,
                        format!("not a valid URL: {}", e),
                    ));
                    None
                }
            });

        let node_env = values
            .require(vars::NODE_ENV, &mut failure)
            .and_then(|raw| match raw.parse::<DeploymentMode>() {
                Ok(mode) => Some(mode),
                Err(_) => {
                    failure.push(FieldViolation::invalid_enum(vars::NODE_ENV, raw, &DeploymentMode::VALUES));
                    None
                }
            });

        let nextauth_url = values.require(vars::NEXTAUTH_URL, &mut failure);
        let google_client_id = values.require(vars::GOOGLE_CLIENT_ID, &mut failure);
        let google_client_secret = values.require(vars::GOOGLE_CLIENT_SECRET, &mut failure);
        let jwt_secret = values.require(vars::JWT_SECRET, &mut failure);

        match (
            database_url,
            node_env,
            nextauth_url,
            google_client_id,
            google_client_secret,
            jwt_secret,
        ) {
            (
                Some(database_url),
                Some(node_env),
                Some(nextauth_url),
                Some(google_client_id),
                Some(google_client_secret),
                Some(jwt_secret),
            ) if failure.is_empty() => Ok(Self {
                database_url,
                node_env,
                nextauth_secret: values.get(vars::NEXTAUTH_SECRET).map(Secret::new),
                nextauth_url: nextauth_url.to_string(),
                google_client_id: google_client_id.to_string(),
                google_client_secret: Secret::new(google_client_secret),
                jwt_secret: Secret::new(jwt_secret),
            }),
            _ => Err(failure),
        }
    }

    /// Database URL with any password masked, safe for logs
    pub fn database_url_redacted(&self) -> String {
        redact_url(&self.database_url)
    }

    /// Variable name and display value pairs, secrets masked
    pub fn display_entries(&self) -> Vec<(&'static str, String)> {
        vec![
            (vars::DATABASE_URL, self.database_url_redacted()),
            (vars::NODE_ENV, self.node_env.to_string()),
            (
                vars::NEXTAUTH_SECRET,
                self.nextauth_secret
                    .as_ref()
                    .map_or_else(|| "(not set)".to_string(), ToString::to_string),
            ),
            (vars::NEXTAUTH_URL, self.nextauth_url.clone()),
            (vars::GOOGLE_CLIENT_ID, self.google_client_id.clone()),
            (vars::GOOGLE_CLIENT_SECRET, self.google_client_secret.to_string()),
            (vars::JWT_SECRET, self.jwt_secret.to_string()),
        ]
    }
}

/// Client-exposed configuration
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct ClientConfig {
    values: BTreeMap<String, String>,
}

impl ClientConfig {
    pub fn from_values(values: &FieldValues) -> Self {
        Self {
            values: values
                .iter()
                .map(|(k, v)| (k.to_string(), v.to_string()))
                .collect(),
        }
    }

    pub fn get(&self, field: &str) -> Option<&str> {
        self.values.get(field).map(String::as_str)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.values.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

/// Everything the rest of the application reads after startup
#[derive(Debug, Clone, Serialize)]
pub struct AppConfig {
    /// Mode the validation ran under
    pub mode: DeploymentMode,
    pub server: ServerConfig,
    pub client: ClientConfig,
}

fn redact_url(url: &Url) -> String {
    let mut redacted = url.clone();
    if redacted.password().is_some() {
        // Cannot fail for URLs that already carry credentials
        let _ = redacted.set_password(Some("****"));
    }
    redacted.to_string()
}

fn serialize_redacted_url<S: Serializer>(url: &Url, serializer: S) -> std::result::Result<S::Ok, S::Error> {
    serializer.serialize_str(&redact_url(url))
}
