//! Error types for the settings store

use std::io;
use std::path::PathBuf;
use thiserror::Error;

/// Errors surfaced by [`SettingsStore`](crate::SettingsStore) operations
#[derive(Debug, Error)]
pub enum SettingsError {
    /// Construction failed: the settings file is missing with creation
    /// disabled, could not be created, or could not be read. No store
    /// instance exists after this error.
    #[error("cannot open settings file '{}'", path.display())]
    Construct {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// Key absent during a lookup in strict mode, or a write refused
    /// because the key is absent and appending new settings is disabled.
    #[error("key '{0}' not found")]
    NotFound(String),

    /// Value present but not convertible to the requested type.
    #[error("value '{value}' for key '{key}' is not an integer")]
    Conversion { key: String, value: String },

    /// The store hit an unrecoverable fault and refuses all further
    /// operations.
    #[error("settings store is not ready")]
    NotReady,

    /// I/O failure while persisting the store.
    #[error("failed to write settings file")]
    Io(#[from] io::Error),
}

impl SettingsError {
    /// Whether this error is the strict-mode "key not found" kind
    pub fn is_not_found(&self) -> bool {
        matches!(self, SettingsError::NotFound(_))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_construct_error_carries_source() {
        let err = SettingsError::Construct {
            path: PathBuf::from("Settings.ini"),
            source: io::Error::new(io::ErrorKind::NotFound, "missing"),
        };
        assert!(err.to_string().contains("Settings.ini"));
        assert!(std::error::Error::source(&err).is_some());
    }

    #[test]
    fn test_is_not_found() {
        assert!(SettingsError::NotFound("k".to_string()).is_not_found());
        assert!(!SettingsError::NotReady.is_not_found());
    }
}
