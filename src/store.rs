use std::collections::BTreeMap;
use std::fmt;
use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};

use tempfile::NamedTempFile;
use tracing::{debug, warn};

use crate::config::StoreOptions;
use crate::encoding::PairCodec;
use crate::error::SettingsError;

/// Persistent key-value settings store backed by a flat delimited text file
///
/// The file is read once at construction. Mutations happen in memory and
/// are persisted by [`save`](Self::save), or automatically after each
/// mutating call when autosave is enabled. A store whose construction
/// failed never exists; a store whose save failed refuses all further
/// operations.
#[derive(Debug)]
pub struct SettingsStore {
    path: PathBuf,
    codec: PairCodec,
    autosave: bool,
    throw_on_missing: bool,
    append_new_settings: bool,
    ready: bool,
    entries: BTreeMap<String, String>,
}

impl SettingsStore {
    /// Open a store with the given options
    ///
    /// Creates the settings file when it is absent and
    /// `create_if_missing` is set; fails with
    /// [`SettingsError::Construct`] otherwise. Duplicate keys in the file
    /// resolve last-wins.
    pub fn open(options: StoreOptions) -> Result<Self, SettingsError> {
        let path = options.path;
        let codec = PairCodec::new(options.kv_separator, options.pair_separator);

        match fs::metadata(&path) {
            Ok(_) => {}
            Err(e) if e.kind() == io::ErrorKind::NotFound => {
                if options.create_if_missing {
                    fs::File::create(&path).map_err(|e| construct_error(&path, e))?;
                    debug!("created empty settings file '{}'", path.display());
                } else {
                    return Err(construct_error(&path, e));
                }
            }
            Err(e) => return Err(construct_error(&path, e)),
        }

        let text = fs::read_to_string(&path).map_err(|e| construct_error(&path, e))?;

        // Last occurrence of a duplicated key wins
        let mut entries = BTreeMap::new();
        for (key, value) in codec.decode(&text) {
            entries.insert(key, value);
        }
        debug!(
            "loaded {} settings from '{}'",
            entries.len(),
            path.display()
        );

        Ok(Self {
            path,
            codec,
            autosave: options.autosave,
            throw_on_missing: options.throw_on_missing,
            append_new_settings: options.append_new_settings,
            ready: true,
            entries,
        })
    }

    /// Open a store at the given path with default options
    pub fn open_path(path: impl Into<PathBuf>) -> Result<Self, SettingsError> {
        Self::open(StoreOptions::new(path))
    }

    /// Path of the backing settings file
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Whether the store still accepts operations
    pub fn is_ready(&self) -> bool {
        self.ready
    }

    /// Codec used for the backing file
    pub fn codec(&self) -> &PairCodec {
        &self.codec
    }

    /// Number of in-memory entries
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether the store holds no entries
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Iterate over the in-memory entries in key order
    ///
    /// This is a snapshot of memory, not of the file: entries with empty
    /// values appear here even though they are never persisted.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    /// Get the value for a key
    ///
    /// An absent key yields `Ok(None)`, or [`SettingsError::NotFound`] in
    /// strict mode.
    pub fn get(&self, key: &str) -> Result<Option<&str>, SettingsError> {
        self.ensure_ready()?;
        match self.entries.get(key) {
            Some(value) => Ok(Some(value)),
            None if self.throw_on_missing => Err(SettingsError::NotFound(key.to_string())),
            None => Ok(None),
        }
    }

    /// Get the value for a key as an integer, with -1 for an absent key
    pub fn get_numeric(&self, key: &str) -> Result<i64, SettingsError> {
        self.get_numeric_or(key, -1)
    }

    /// Get the value for a key as an integer
    ///
    /// An absent key yields `fallback` (strict mode still errors). A value
    /// that is present but not an integer yields
    /// [`SettingsError::Conversion`] in either mode.
    pub fn get_numeric_or(&self, key: &str, fallback: i64) -> Result<i64, SettingsError> {
        let Some(raw) = self.get(key)? else {
            return Ok(fallback);
        };
        raw.parse::<i64>().map_err(|_| SettingsError::Conversion {
            key: key.to_string(),
            value: raw.to_string(),
        })
    }

    /// Insert defaults, never overwriting existing keys
    ///
    /// Saves once after the whole batch when autosave is enabled.
    pub fn set_defaults<K, V>(
        &mut self,
        pairs: impl IntoIterator<Item = (K, V)>,
    ) -> Result<(), SettingsError>
    where
        K: Into<String>,
        V: Into<String>,
    {
        self.ensure_ready()?;
        for (key, value) in pairs {
            self.entries.entry(key.into()).or_insert_with(|| value.into());
        }
        if self.autosave {
            self.save()?;
        }
        Ok(())
    }

    /// Insert defaults from one delimited text blob
    ///
    /// Example: `store.set_defaults_text("Name:Bob\nAge:18")`
    pub fn set_defaults_text(&mut self, text: &str) -> Result<(), SettingsError> {
        self.ensure_ready()?;
        let pairs = self.codec.decode(text);
        self.set_defaults(pairs)
    }

    /// Insert defaults from delimited pair strings, each decoded
    /// independently
    ///
    /// Example: `store.set_defaults_lines(["Name:Bob", "Age:18"])`
    pub fn set_defaults_lines<'a>(
        &mut self,
        lines: impl IntoIterator<Item = &'a str>,
    ) -> Result<(), SettingsError> {
        self.ensure_ready()?;
        let mut pairs = Vec::new();
        for line in lines {
            pairs.extend(self.codec.decode(line));
        }
        self.set_defaults(pairs)
    }

    /// Set the value for a key, overwriting any existing value
    ///
    /// When the key is absent and `append_new_settings` is disabled, the
    /// write is refused: `Ok(false)` in lenient mode,
    /// [`SettingsError::NotFound`] in strict mode. Returns `Ok(true)` once
    /// the value is stored (and persisted, when autosave is enabled).
    pub fn set_value(
        &mut self,
        key: &str,
        value: impl fmt::Display,
    ) -> Result<bool, SettingsError> {
        self.ensure_ready()?;
        if !self.append_new_settings && !self.entries.contains_key(key) {
            if self.throw_on_missing {
                return Err(SettingsError::NotFound(key.to_string()));
            }
            return Ok(false);
        }
        self.entries.insert(key.to_string(), value.to_string());
        if self.autosave {
            self.save()?;
        }
        Ok(true)
    }

    /// Persist the in-memory entries to the settings file
    ///
    /// Entries with an empty key or value are skipped but stay in memory.
    /// The file is replaced via write-temp-then-rename, so a failed save
    /// never leaves a truncated file behind. A failed save permanently
    /// marks the store not ready.
    pub fn save(&mut self) -> Result<(), SettingsError> {
        self.ensure_ready()?;
        let text = self
            .codec
            .encode(self.entries.iter().map(|(k, v)| (k.as_str(), v.as_str())));

        if let Err(e) = self.write_atomic(&text) {
            self.ready = false;
            warn!(
                "failed to save settings to '{}', store disabled: {}",
                self.path.display(),
                e
            );
            return Err(SettingsError::Io(e));
        }
        debug!(
            "saved {} settings to '{}'",
            self.entries.len(),
            self.path.display()
        );
        Ok(())
    }

    fn write_atomic(&self, text: &str) -> io::Result<()> {
        let dir = self
            .path
            .parent()
            .filter(|p| !p.as_os_str().is_empty())
            .unwrap_or(Path::new("."));
        let mut tmp = NamedTempFile::new_in(dir)?;
        tmp.write_all(text.as_bytes())?;
        tmp.persist(&self.path).map_err(|e| e.error)?;
        Ok(())
    }

    fn ensure_ready(&self) -> Result<(), SettingsError> {
        if self.ready {
            Ok(())
        } else {
            Err(SettingsError::NotReady)
        }
    }
}

fn construct_error(path: &Path, source: io::Error) -> SettingsError {
    SettingsError::Construct {
        path: path.to_path_buf(),
        source,
    }
}
