//! Text encoding/decoding for the settings file
//!
//! This module owns the flat delimited format the store persists: pairs
//! joined by a pair separator, each pair `key<sep>value` joined by a
//! key-value separator.

pub mod pairs;

/// Default separator between a key and its value
pub const DEFAULT_KV_SEPARATOR: &str = ":";

/// Default separator between consecutive pairs
pub const DEFAULT_PAIR_SEPARATOR: &str = "\n";

pub use pairs::PairCodec;
