//! Typed access to raw plugin arguments.
//!
//! Plugins receive their `arguments` section as an untyped TOML table.
//! Every accessor checks the value kind and reports a mismatch instead of
//! coercing, so a plugin can turn misconfiguration into a warning.

use serde::{Deserialize, Serialize};

use crate::error::ArgumentError;

/// Raw key/value arguments for a single plugin.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Arguments(toml::Table);

impl Arguments {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_table(table: toml::Table) -> Self {
        Self(table)
    }

    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<toml::Value>) {
        self.0.insert(key.into(), value.into());
    }

    pub fn get(&self, key: &str) -> Option<&toml::Value> {
        self.0.get(key)
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Look up a nested table.
    pub fn get_table(&self, key: &str) -> Result<Option<&toml::Table>, ArgumentError> {
        match self.0.get(key) {
            None => Ok(None),
            Some(toml::Value::Table(t)) => Ok(Some(t)),
            Some(other) => Err(mismatch(key, "a table", other)),
        }
    }

    pub fn get_i64(&self, key: &str) -> Result<Option<i64>, ArgumentError> {
        match self.0.get(key) {
            None => Ok(None),
            Some(toml::Value::Integer(i)) => Ok(Some(*i)),
            Some(other) => Err(mismatch(key, "an integer", other)),
        }
    }
}

fn mismatch(key: &str, expected: &'static str, found: &toml::Value) -> ArgumentError {
    ArgumentError {
        key: key.to_string(),
        expected,
        found: found.type_str(),
    }
}
