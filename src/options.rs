//! Option values resolved from the command line.

use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};

/// A single option value: a flag or a scalar.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum OptionValue {
    Flag(bool),
    Value(String),
}

impl OptionValue {
    /// Returns the value as a string if it is a scalar.
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Self::Value(s) => Some(s),
            Self::Flag(_) => None,
        }
    }

    /// Truthiness: flags by value, scalars are always true.
    pub fn is_true(&self) -> bool {
        match self {
            Self::Flag(b) => *b,
            Self::Value(_) => true,
        }
    }
}

impl fmt::Display for OptionValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Flag(b) => write!(f, "{b}"),
            Self::Value(s) => f.write_str(s),
        }
    }
}

impl From<bool> for OptionValue {
    fn from(b: bool) -> Self {
        Self::Flag(b)
    }
}

impl From<&str> for OptionValue {
    fn from(s: &str) -> Self {
        Self::Value(s.to_string())
    }
}

impl From<String> for OptionValue {
    fn from(s: String) -> Self {
        Self::Value(s)
    }
}

/// Options keyed by name.
///
/// Built while switches are parsed; read-only once dispatch starts.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct OptionSet {
    values: BTreeMap<String, OptionValue>,
}

impl OptionSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set(&mut self, key: impl Into<String>, value: impl Into<OptionValue>) {
        self.values.insert(key.into(), value.into());
    }

    /// Sets `key` to `true`.
    pub fn set_flag(&mut self, key: impl Into<String>) {
        self.set(key, true);
    }

    pub fn get(&self, key: &str) -> Option<&OptionValue> {
        self.values.get(key)
    }

    /// Returns the scalar value for `key`, if any.
    pub fn get_str(&self, key: &str) -> Option<&str> {
        self.get(key).and_then(OptionValue::as_str)
    }

    /// Whether `key` has been given any value at all.
    pub fn contains(&self, key: &str) -> bool {
        self.values.contains_key(key)
    }

    /// Whether `key` is present and truthy.
    pub fn is_true(&self, key: &str) -> bool {
        self.get(key).is_some_and(OptionValue::is_true)
    }

    /// Copies every entry of `defaults` whose key is not already set.
    pub fn merge_defaults(&mut self, defaults: &OptionSet) {
        for (key, value) in &defaults.values {
            self.values
                .entry(key.clone())
                .or_insert_with(|| value.clone());
        }
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &OptionValue)> {
        self.values.iter().map(|(k, v)| (k.as_str(), v))
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}
