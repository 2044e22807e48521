//! Field-level validation violations and the aggregate failure
//!
//! Validation never stops at the first problem. Every rule in the schema is
//! checked and each broken one contributes a [`FieldViolation`]; the whole
//! list travels as one [`ValidationFailure`].

use serde::Serialize;
use std::fmt;

/// What went wrong with a single field
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ViolationKind {
    /// Field is required in the active mode but absent or empty
    MissingRequired,
    /// Value is present but does not have the expected shape
    InvalidFormat { reason: String },
    /// Value is not one of the enumerated choices
    InvalidEnum { value: String, allowed: Vec<String> },
}

impl ViolationKind {
    /// Stable machine-readable code
    pub fn code(&self) -> &'static str {
        match self {
            Self::MissingRequired => "missing_required",
            Self::InvalidFormat { .. } => "invalid_format",
            Self::InvalidEnum { .. } => "invalid_enum",
        }
    }
}

/// A violation attributed to one schema field
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FieldViolation {
    /// Declared field name
    pub field: String,
    /// Variable the value was actually read from, when it was substituted
    #[serde(skip_serializing_if = "Option::is_none")]
    pub source: Option<String>,
    #[serde(flatten)]
    pub kind: ViolationKind,
}

impl FieldViolation {
    pub fn missing<S: Into<String>>(field: S) -> Self {
        Self {
            field: field.into(),
            source: None,
            kind: ViolationKind::MissingRequired,
        }
    }

    pub fn invalid_format<S: Into<String>, R: Into<String>>(field: S, reason: R) -> Self {
        Self {
            field: field.into(),
            source: None,
            kind: ViolationKind::InvalidFormat {
                reason: reason.into(),
            },
        }
    }

    pub fn invalid_enum<S, V>(field: S, value: V, allowed: &[&str]) -> Self
    where
        S: Into<String>,
        V: Into<String>,
    {
        Self {
            field: field.into(),
            source: None,
            kind: ViolationKind::InvalidEnum {
                value: value.into(),
                allowed: allowed.iter().map(|s| s.to_string()).collect(),
            },
        }
    }

    /// Record that the value came from a substitute variable
    pub fn with_source<S: Into<String>>(mut self, source: S) -> Self {
        self.source = Some(source.into());
        self
    }

    pub fn code(&self) -> &'static str {
        self.kind.code()
    }

    /// Human-readable description without the field name
    pub fn describe(&self) -> String {
        let detail = match &self.kind {
            ViolationKind::MissingRequired => "required but not set".to_string(),
            ViolationKind::InvalidFormat { reason } => format!("invalid format ({})", reason),
            ViolationKind::InvalidEnum { value, allowed } => {
                format!("'{}' is not one of: {}", value, allowed.join(", "))
            }
        };

        match &self.source {
            Some(source) => format!("{} (read from {})", detail, source),
            None => detail,
        }
    }
}

impl fmt::Display for FieldViolation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.field, self.describe())
    }
}

/// Every violation found in one validation pass
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ValidationFailure {
    violations: Vec<FieldViolation>,
}

impl ValidationFailure {
    pub fn new(violations: Vec<FieldViolation>) -> Self {
        Self { violations }
    }

    pub fn push(&mut self, violation: FieldViolation) {
        self.violations.push(violation);
    }

    /// Append all violations from another pass
    pub fn merge(&mut self, other: ValidationFailure) {
        self.violations.extend(other.violations);
    }

    pub fn violations(&self) -> &[FieldViolation] {
        &self.violations
    }

    pub fn len(&self) -> usize {
        self.violations.len()
    }

    pub fn is_empty(&self) -> bool {
        self.violations.is_empty()
    }

    /// Names of the failing fields, in schema order
    pub fn field_names(&self) -> Vec<&str> {
        self.violations.iter().map(|v| v.field.as_str()).collect()
    }

    /// Violation for `field`, if any
    pub fn get(&self, field: &str) -> Option<&FieldViolation> {
        self.violations.iter().find(|v| v.field == field)
    }

    pub fn contains(&self, field: &str) -> bool {
        self.get(field).is_some()
    }

    /// `Ok(value)` when nothing was recorded, otherwise `Err(self)`
    pub fn into_result<T>(self, value: T) -> std::result::Result<T, Self> {
        if self.is_empty() {
            Ok(value)
        } else {
            Err(self)
        }
    }
}

impl fmt::Display for ValidationFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Invalid environment variables ({}):", self.violations.len())?;
        for violation in &self.violations {
            write!(f, "\n  - {}", violation)?;
        }
        Ok(())
    }
}

impl std::error::Error for ValidationFailure {}

impl From<FieldViolation> for ValidationFailure {
    fn from(violation: FieldViolation) -> Self {
        Self::new(vec![violation])
    }
}
