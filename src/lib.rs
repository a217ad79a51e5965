//! Minimal persistent key-value settings store backed by a flat delimited
//! text file
//!
//! The store loads `key:value` pairs (separators are configurable) from a
//! file at construction, merges in defaults without overwriting, upserts
//! values, and writes the whole state back.
//!
//! ```no_run
//! use settings_store::SettingsStore;
//!
//! let mut store = SettingsStore::open_path("Settings.ini")?;
//! store.set_defaults([("Name", "Bob"), ("Age", "18")])?;
//! store.set_value("Age", 19)?;
//! assert_eq!(store.get("Name")?, Some("Bob"));
//! # Ok::<(), settings_store::SettingsError>(())
//! ```

pub mod config;
pub mod encoding;
pub mod error;
pub mod store;

pub use config::StoreOptions;
pub use encoding::PairCodec;
pub use error::SettingsError;
pub use store::SettingsStore;
