//! Typed setting values and the store abstraction.
//!
//! A [`SettingsStore`] is a flat name → [`SettingValue`] map with an explicit
//! [`flush`](SettingsStore::flush). Stores use interior mutability, so one
//! store can be shared between the option pages that read and write it.

use std::collections::BTreeMap;
use std::fmt;

use parking_lot::RwLock;
use serde::{Deserialize, Serialize};

use super::error::SettingsResult;

/// A value held by a settings store.
///
/// An empty list carries no element type once written: JSON reads `[]` back
/// as an empty `IntList`, INI reads `string[]:` back as an empty
/// `StringList`. The list accessors therefore accept an empty list of
/// either kind.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum SettingValue {
    /// A boolean flag.
    Bool(bool),
    /// A 64-bit signed integer.
    Int(i64),
    /// A string.
    String(String),
    /// A list of integers.
    IntList(Vec<i64>),
    /// A list of strings.
    StringList(Vec<String>),
}

impl SettingValue {
    /// The type tag used by text encodings.
    pub fn type_name(&self) -> &'static str {
        match self {
            SettingValue::Bool(_) => "bool",
            SettingValue::Int(_) => "int",
            SettingValue::String(_) => "string",
            SettingValue::IntList(_) => "int[]",
            SettingValue::StringList(_) => "string[]",
        }
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self {
            SettingValue::Bool(v) => Some(*v),
            _ => None,
        }
    }

    pub fn as_int(&self) -> Option<i64> {
        match self {
            SettingValue::Int(v) => Some(*v),
            _ => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            SettingValue::String(v) => Some(v),
            _ => None,
        }
    }

    pub fn as_int_list(&self) -> Option<&[i64]> {
        match self {
            SettingValue::IntList(v) => Some(v),
            SettingValue::StringList(v) if v.is_empty() => Some(&[]),
            _ => None,
        }
    }

    pub fn as_string_list(&self) -> Option<&[String]> {
        match self {
            SettingValue::StringList(v) => Some(v),
            SettingValue::IntList(v) if v.is_empty() => Some(&[]),
            _ => None,
        }
    }
}

impl fmt::Display for SettingValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SettingValue::Bool(v) => write!(f, "{v}"),
            SettingValue::Int(v) => write!(f, "{v}"),
            SettingValue::String(v) => f.write_str(v),
            SettingValue::IntList(v) => {
                let parts: Vec<String> = v.iter().map(i64::to_string).collect();
                f.write_str(&parts.join(","))
            }
            SettingValue::StringList(v) => f.write_str(&v.join(",")),
        }
    }
}

impl From<bool> for SettingValue {
    fn from(v: bool) -> Self {
        SettingValue::Bool(v)
    }
}

impl From<i32> for SettingValue {
    fn from(v: i32) -> Self {
        SettingValue::Int(v as i64)
    }
}

impl From<i64> for SettingValue {
    fn from(v: i64) -> Self {
        SettingValue::Int(v)
    }
}

impl From<String> for SettingValue {
    fn from(v: String) -> Self {
        SettingValue::String(v)
    }
}

impl From<&str> for SettingValue {
    fn from(v: &str) -> Self {
        SettingValue::String(v.to_string())
    }
}

impl From<Vec<i64>> for SettingValue {
    fn from(v: Vec<i64>) -> Self {
        SettingValue::IntList(v)
    }
}

impl From<Vec<String>> for SettingValue {
    fn from(v: Vec<String>) -> Self {
        SettingValue::StringList(v)
    }
}

/// Persistent name → value storage for one settings section.
pub trait SettingsStore: Send + Sync {
    /// Reads a value. Missing and undecodable entries both read as `None`.
    fn get(&self, name: &str) -> Option<SettingValue>;

    /// Stores a value, replacing any previous one.
    fn set(&self, name: &str, value: SettingValue);

    /// Deletes an entry. Removing a missing entry is a no-op.
    fn remove(&self, name: &str);

    /// Names of all stored entries.
    fn names(&self) -> Vec<String>;

    /// Writes pending changes to the backing medium.
    fn flush(&self) -> SettingsResult<()>;

    /// Returns `true` if an entry exists for `name`.
    fn contains(&self, name: &str) -> bool {
        self.get(name).is_some()
    }
}

/// An in-process store. Nothing is persisted; `flush` always succeeds.
#[derive(Debug, Default)]
pub struct MemoryStore {
    values: RwLock<BTreeMap<String, SettingValue>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of stored entries.
    pub fn len(&self) -> usize {
        self.values.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.read().is_empty()
    }
}

impl SettingsStore for MemoryStore {
    fn get(&self, name: &str) -> Option<SettingValue> {
        self.values.read().get(name).cloned()
    }

    fn set(&self, name: &str, value: SettingValue) {
        self.values.write().insert(name.to_string(), value);
    }

    fn remove(&self, name: &str) {
        self.values.write().remove(name);
    }

    fn names(&self) -> Vec<String> {
        self.values.read().keys().cloned().collect()
    }

    fn flush(&self) -> SettingsResult<()> {
        Ok(())
    }
}

static_assertions::assert_impl_all!(MemoryStore: Send, Sync);
