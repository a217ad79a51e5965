//! Construction and configuration surface for the settings store

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

use crate::encoding::{DEFAULT_KV_SEPARATOR, DEFAULT_PAIR_SEPARATOR};
use crate::error::SettingsError;

/// Options controlling how a [`SettingsStore`](crate::SettingsStore) is
/// opened and how it behaves afterwards
///
/// All fields have serde defaults, so a JSON profile only needs to name the
/// fields it changes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StoreOptions {
    /// Settings file path
    #[serde(default = "default_path")]
    pub path: PathBuf,

    /// Create the settings file when it does not exist
    #[serde(default = "default_true")]
    pub create_if_missing: bool,

    /// Separator between a key and its value
    #[serde(default = "default_kv_separator")]
    pub kv_separator: String,

    /// Separator between consecutive pairs
    #[serde(default = "default_pair_separator")]
    pub pair_separator: String,

    /// Persist to the file automatically after each mutating call
    #[serde(default = "default_true")]
    pub autosave: bool,

    /// Strict mode: lookup misses and refused writes become errors instead
    /// of sentinel returns
    #[serde(default)]
    pub throw_on_missing: bool,

    /// Allow `set_value` to insert keys the file does not already contain
    #[serde(default = "default_true")]
    pub append_new_settings: bool,
}

fn default_path() -> PathBuf {
    PathBuf::from("Settings.ini")
}

fn default_true() -> bool {
    true
}

fn default_kv_separator() -> String {
    DEFAULT_KV_SEPARATOR.to_string()
}

fn default_pair_separator() -> String {
    DEFAULT_PAIR_SEPARATOR.to_string()
}

impl Default for StoreOptions {
    fn default() -> Self {
        Self {
            path: default_path(),
            create_if_missing: true,
            kv_separator: default_kv_separator(),
            pair_separator: default_pair_separator(),
            autosave: true,
            throw_on_missing: false,
            append_new_settings: true,
        }
    }
}

impl StoreOptions {
    /// Default options pointed at the given file
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            ..Self::default()
        }
    }

    /// Load options from a JSON profile file
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, SettingsError> {
        let path = path.as_ref();
        let text = fs::read_to_string(path).map_err(|e| SettingsError::Construct {
            path: path.to_path_buf(),
            source: e,
        })?;

        serde_json::from_str(&text).map_err(|e| SettingsError::Construct {
            path: path.to_path_buf(),
            source: std::io::Error::new(std::io::ErrorKind::InvalidData, e),
        })
    }
}
