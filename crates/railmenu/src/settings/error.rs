//! Error types for settings persistence.

use std::path::PathBuf;

/// Result type alias for settings operations.
pub type SettingsResult<T> = std::result::Result<T, SettingsError>;

/// Errors that can occur while loading or writing settings.
#[derive(Debug, thiserror::Error)]
pub enum SettingsError {
    /// Reading or writing the backing file failed.
    #[error("Failed to access settings file '{path}': {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The INI file could not be parsed.
    #[error("Failed to parse INI file '{path}': {message}")]
    Ini { path: PathBuf, message: String },

    /// The JSON file could not be parsed or serialized.
    #[error("Invalid JSON settings file '{path}': {source}")]
    Json {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    /// A stored value does not decode to a setting.
    #[error("Invalid value for setting '{name}': {value:?}")]
    InvalidValue { name: String, value: String },
}

impl SettingsError {
    /// Create an I/O error.
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }

    /// Create an INI error.
    pub(crate) fn ini(path: impl Into<PathBuf>, error: ini::Error) -> Self {
        match error {
            ini::Error::Io(source) => Self::io(path, source),
            ini::Error::Parse(parse) => Self::Ini {
                path: path.into(),
                message: parse.to_string(),
            },
        }
    }

    /// Create a JSON error.
    pub fn json(path: impl Into<PathBuf>, source: serde_json::Error) -> Self {
        Self::Json {
            path: path.into(),
            source,
        }
    }

    /// Create a value error.
    pub fn invalid_value(name: impl Into<String>, value: impl Into<String>) -> Self {
        Self::InvalidValue {
            name: name.into(),
            value: value.into(),
        }
    }
}
