//! Environment snapshots and .env file management

use crate::config::schema::{EnvSchema, Exposure};
use crate::defaults;
use crate::error::{AppError, ErrorContext, Result};
use std::collections::{BTreeMap, BTreeSet};
use std::ffi::OsString;
use std::path::{Path, PathBuf};

/// Immutable-by-convention copy of an environment.
///
/// The validator only ever reads from a snapshot, never from the live
/// process environment, so tests can inject any map they like.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EnvSnapshot {
    vars: BTreeMap<String, String>,
    /// Keys that are set but whose value is not valid Unicode
    unreadable: BTreeSet<String>,
}

impl EnvSnapshot {
    pub fn new() -> Self {
        Self::default()
    }

    /// Capture the current process environment
    pub fn from_process() -> Self {
        Self::from_os_vars(std::env::vars_os())
    }

    /// Build a snapshot from raw OS pairs.
    ///
    /// A value that is not valid Unicode keeps its key marked as set but
    /// unreadable. Keys that are not valid Unicode cannot name a declared
    /// variable and are dropped.
    pub fn from_os_vars<I: IntoIterator<Item = (OsString, OsString)>>(vars: I) -> Self {
        let mut snapshot = Self::new();
        for (key, value) in vars {
            let Ok(key) = key.into_string() else {
                continue;
            };
            match value.into_string() {
                Ok(value) => snapshot.set(key, value),
                Err(_) => {
                    snapshot.unreadable.insert(key);
                }
            }
        }
        snapshot
    }

    /// Builder-style insert
    pub fn with<K: Into<String>, V: Into<String>>(mut self, key: K, value: V) -> Self {
        self.set(key, value);
        self
    }

    /// Builder-style removal
    pub fn without(mut self, key: &str) -> Self {
        self.remove(key);
        self
    }

    pub fn set<K: Into<String>, V: Into<String>>(&mut self, key: K, value: V) {
        let key = key.into();
        self.unreadable.remove(&key);
        self.vars.insert(key, value.into());
    }

    pub fn remove(&mut self, key: &str) -> Option<String> {
        self.unreadable.remove(key);
        self.vars.remove(key)
    }

    /// Readable value of `key`; `None` for unset and unreadable keys alike
    pub fn get(&self, key: &str) -> Option<&str> {
        self.vars.get(key).map(String::as_str)
    }

    /// Whether `key` is set, readable or not
    pub fn contains(&self, key: &str) -> bool {
        self.vars.contains_key(key) || self.unreadable.contains(key)
    }

    /// Whether `key` is set to a value that is not valid Unicode
    pub fn is_unreadable(&self, key: &str) -> bool {
        self.unreadable.contains(key)
    }

    /// Insert `key` only when it is not already present.
    ///
    /// Returns whether the value was taken.
    pub fn set_if_absent<K: Into<String>, V: Into<String>>(&mut self, key: K, value: V) -> bool {
        let key = key.into();
        if self.contains(&key) {
            return false;
        }
        self.vars.insert(key, value.into());
        true
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.vars.keys().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.vars.len()
    }

    pub fn is_empty(&self) -> bool {
        self.vars.is_empty()
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for EnvSnapshot {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self {
            vars: iter.into_iter().map(|(k, v)| (k.into(), v.into())).collect(),
            unreadable: BTreeSet::new(),
        }
    }
}

/// Result of merging a .env file into a snapshot
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EnvFileMerge {
    /// File that was read
    pub path: PathBuf,
    /// Keys taken from the file
    pub applied: Vec<String>,
    /// Keys ignored because the process environment already had them
    pub shadowed: Vec<String>,
}

/// Environment variable configuration manager
pub struct EnvManager;

impl EnvManager {
    /// Parse a .env file into a snapshot without touching the process
    /// environment.
    ///
    /// `$VAR` and `${VAR}` references are expanded by `dotenv` from the real
    /// process environment first, then from keys defined earlier in the same
    /// file. They never see an injected [`EnvSnapshot`], so a file meant for
    /// injected tests should only reference its own keys.
    pub fn read_env_file(path: &Path) -> Result<EnvSnapshot> {
        let iter = dotenv::from_path_iter(path)
            .with_context(|| format!("Failed to open env file {}", path.display()))?;

        let mut snapshot = EnvSnapshot::new();
        for item in iter {
            let (key, value) =
                item.with_context(|| format!("Failed to parse env file {}", path.display()))?;
            snapshot.set(key, value);
        }

        Ok(snapshot)
    }

    /// Merge a .env file into `snapshot`; existing variables win
    pub fn merge_env_file(snapshot: &mut EnvSnapshot, path: &Path) -> Result<EnvFileMerge> {
        let file_vars = Self::read_env_file(path)?;
        Ok(Self::merge_into(snapshot, &file_vars, path))
    }

    /// Merge already-read file variables into `snapshot`
    pub fn merge_into(snapshot: &mut EnvSnapshot, file_vars: &EnvSnapshot, path: &Path) -> EnvFileMerge {
        let mut merge = EnvFileMerge {
            path: path.to_path_buf(),
            ..EnvFileMerge::default()
        };

        for key in file_vars.keys() {
            let value = file_vars.get(key).unwrap_or_default();
            if snapshot.set_if_absent(key, value) {
                merge.applied.push(key.to_string());
            } else {
                merge.shadowed.push(key.to_string());
            }
        }

        merge
    }

    /// Pick the .env file to read.
    ///
    /// An explicit path must exist. Without one, `./.env` is used when
    /// present and silently skipped otherwise.
    pub fn resolve_env_file(explicit: Option<&Path>) -> Result<Option<PathBuf>> {
        match explicit {
            Some(path) => {
                if path.is_file() {
                    Ok(Some(path.to_path_buf()))
                } else {
                    Err(AppError::config(format!("Env file not found: {}", path.display())))
                }
            }
            None => {
                let default_path = Path::new(defaults::DEFAULT_ENV_FILE);
                Ok(default_path.is_file().then(|| default_path.to_path_buf()))
            }
        }
    }

    /// Create example .env file content from the schema
    pub fn create_example_env_content(schema: &EnvSchema) -> String {
        let mut content = String::new();
        content.push_str("# Records App Environment\n");
        content.push_str("#\n");
        content.push_str("# Every variable below is checked at startup. Server variables stay on the\n");
        content.push_str(&format!(
            "# backend; client variables must start with {} and are shipped to browsers.\n",
            defaults::CLIENT_PREFIX
        ));

        for exposure in [Exposure::Server, Exposure::Client] {
            let fields: Vec<_> = schema.fields_for(exposure).collect();

            content.push('\n');
            content.push_str(&format!("# --- {} ---\n", exposure.label()));
            if fields.is_empty() {
                content.push_str("# (none declared)\n");
                continue;
            }

            for field in fields {
                content.push_str(&format!("\n# {} ({})\n", field.description, field.requiredness.describe()));
                if let Some(override_var) = field.override_var {
                    content.push_str(&format!("# Replaced by {} when the hosting platform sets it.\n", override_var));
                }
                content.push_str(&format!("{}={}\n", field.name, field.example));
            }
        }

        content
    }

    /// Save example .env file to disk
    pub fn save_example_env_file(path: &Path, schema: &EnvSchema) -> Result<()> {
        let content = Self::create_example_env_content(schema);
        std::fs::write(path, content)
            .with_context(|| format!("Failed to write example env file {}", path.display()))?;
        Ok(())
    }

    /// Display environment variable help
    pub fn display_env_help(schema: &EnvSchema) -> String {
        let mut help = String::new();
        help.push_str("Supported Environment Variables:\n\n");

        for field in schema.fields() {
            help.push_str(&format!(
                "  {:<22} [{}] {}\n",
                field.name,
                field.exposure.label(),
                field.description
            ));
            help.push_str(&format!("  {:<22} Required: {}\n", "", field.requiredness.describe()));
            help.push_str(&format!("  {:<22} Example: {}\n\n", "", field.example));
        }

        help.push_str("Resolution Order (highest to lowest):\n");
        help.push_str("  1. Process environment\n");
        help.push_str("  2. .env file values\n");

        help
    }

    /// Keys in a .env file that the schema does not declare.
    ///
    /// Platform-provided variables are not reported.
    pub fn undeclared_keys(file_vars: &EnvSnapshot, schema: &EnvSchema, known_extra: &[&str]) -> Vec<String> {
        file_vars
            .keys()
            .filter(|key| schema.field(key).is_none() && !known_extra.contains(key))
            .map(String::from)
            .collect()
    }
}
